//! Goal schema normalization: collapse goals that differ only in *which*
//! declared objects they name into one cache key.

use std::collections::BTreeMap;
use std::fmt::Write;

use retrograde_model::{Atom, Constraint, Objects, Sym, Term};

/// Cache key of a normalized goal: the canonical serialization of its
/// schema-level atoms and constraints.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct SchemaKey(String);

impl SchemaKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A goal rewritten to schema level, together with the object binding
/// needed to instantiate schema-level results back to the concrete objects
/// of the original goal.
#[derive(Debug, Clone)]
pub struct GoalSchema {
    pub atoms: Vec<Atom>,
    pub constraints: Vec<Constraint>,
    /// Declared object -> schema variable, in first-occurrence order.
    binding: BTreeMap<Sym, Sym>,
    key: SchemaKey,
}

impl GoalSchema {
    pub fn key(&self) -> &SchemaKey {
        &self.key
    }

    /// The schema variable standing for a concrete object, if any.
    pub fn schema_var(&self, object: &Sym) -> Option<&Sym> {
        self.binding.get(object)
    }

    /// Re-applies the object mapping in reverse: schema variables
    /// introduced by normalization become the concrete objects of the
    /// original goal again. Other terms pass through.
    pub fn instantiate_term(&self, term: &Term) -> Term {
        if let Term::Var(v) = term {
            for (object, var) in &self.binding {
                if var == v {
                    return Term::Object(object.clone());
                }
            }
        }
        term.clone()
    }

    pub fn instantiate_atom(&self, atom: &Atom) -> Atom {
        Atom::new(
            atom.name.clone(),
            atom.args.iter().map(|t| self.instantiate_term(t)),
            atom.positive,
        )
    }
}

/// Rewrites the goal's declared-object tokens into position-based schema
/// variables `?arg0, ?arg1, ...` in first-occurrence order. Numeric and
/// quoted literals, and identifiers absent from the object list, are left
/// unchanged. Idempotent: schema variables are not declared objects, so a
/// second pass maps nothing new.
pub fn normalize_goal(goal: &[Atom], constraints: &[Constraint], objects: &Objects) -> GoalSchema {
    let mut binding: BTreeMap<Sym, Sym> = BTreeMap::new();
    let mut next = 0usize;
    let mut map_term = |term: &Term| -> Term {
        match term {
            Term::Object(name) if objects.is_declared(name) => {
                let var = binding.entry(name.clone()).or_insert_with(|| {
                    let var = Sym::from(format!("?arg{next}"));
                    next += 1;
                    var
                });
                Term::Var(var.clone())
            }
            other => other.clone(),
        }
    };

    let atoms: Vec<Atom> = goal
        .iter()
        .map(|a| Atom::new(a.name.clone(), a.args.iter().map(&mut map_term), a.positive))
        .collect();
    let constraints: Vec<Constraint> = constraints
        .iter()
        .map(|c| Constraint::new(map_term(c.a()), map_term(c.b()), c.relation()))
        .collect();

    let key = serialize(&atoms, &constraints);
    GoalSchema {
        atoms,
        constraints,
        binding,
        key,
    }
}

fn serialize(atoms: &[Atom], constraints: &[Constraint]) -> SchemaKey {
    let mut out = String::new();
    for a in atoms {
        let _ = write!(out, "{a}");
    }
    if !constraints.is_empty() {
        let _ = write!(out, "|");
        for c in constraints {
            let _ = write!(out, "[{c}]");
        }
    }
    SchemaKey(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn objects() -> Objects {
        ["a", "b", "c", "d"].into_iter().collect()
    }

    fn on(a: Term, b: Term) -> Atom {
        Atom::positive("on", [a, b])
    }

    #[test]
    fn structurally_identical_goals_share_a_key() {
        let g1 = normalize_goal(&[on(Term::object("a"), Term::object("b"))], &[], &objects());
        let g2 = normalize_goal(&[on(Term::object("c"), Term::object("d"))], &[], &objects());
        assert_eq!(g1.key(), g2.key());
        assert_eq!(g1.key().as_str(), "(on ?arg0 ?arg1)");
    }

    #[test]
    fn repeated_objects_reuse_their_variable() {
        let g = normalize_goal(
            &[
                on(Term::object("a"), Term::object("b")),
                on(Term::object("b"), Term::object("c")),
            ],
            &[],
            &objects(),
        );
        assert_eq!(g.key().as_str(), "(on ?arg0 ?arg1)(on ?arg1 ?arg2)");
    }

    #[test]
    fn normalization_is_idempotent() {
        let g1 = normalize_goal(&[on(Term::object("a"), Term::object("b"))], &[], &objects());
        let g2 = normalize_goal(&g1.atoms, &[], &objects());
        assert_eq!(g1.key(), g2.key());
        assert_eq!(g1.atoms, g2.atoms);
    }

    #[test]
    fn non_object_tokens_pass_through() {
        let g = normalize_goal(
            &[Atom::positive("at", [Term::object("a"), Term::object("depot"), Term::Int(3)])],
            &[],
            &objects(),
        );
        assert_eq!(g.key().as_str(), "(at ?arg0 depot 3)");
    }

    #[test]
    fn instantiation_inverts_the_mapping() {
        let goal = [on(Term::object("c"), Term::object("d"))];
        let g = normalize_goal(&goal, &[], &objects());
        assert_eq!(g.instantiate_atom(&g.atoms[0]), goal[0]);
        assert_eq!(g.schema_var(&Sym::from("c")).unwrap().as_str(), "?arg0");
    }

    #[test]
    fn constraints_participate_in_the_key() {
        let atoms = [on(Term::object("a"), Term::object("b"))];
        let plain = normalize_goal(&atoms, &[], &objects());
        let constrained = normalize_goal(
            &atoms,
            &[Constraint::neq(Term::object("a"), Term::object("b"))],
            &objects(),
        );
        assert_ne!(plain.key(), constrained.key());
    }
}
