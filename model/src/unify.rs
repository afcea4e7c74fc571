use crate::{Atom, Substitution, Term};

/// Unifies two terms under an existing substitution, returning the extended
/// substitution on success.
///
/// Constants unify only if identical; a variable unifies with anything by
/// extending the substitution (existing bindings are applied first). Terms
/// are flat, so no occurs-check is needed. Pure: the input substitution is
/// never modified.
pub fn unify_term(t1: &Term, t2: &Term, subst: &Substitution) -> Option<Substitution> {
    let mut out = subst.clone();
    unify_term_into(t1, t2, &mut out).then_some(out)
}

/// Unifies two atoms: requires equal relation name, arity and polarity, then
/// unifies arguments pairwise left to right, failing fast on any mismatch.
pub fn unify_atom(a1: &Atom, a2: &Atom, subst: &Substitution) -> Option<Substitution> {
    let mut out = subst.clone();
    unify_atom_into(a1, a2, &mut out).then_some(out)
}

/// In-place variant used by the matcher to avoid one clone per argument.
pub(crate) fn unify_term_into(t1: &Term, t2: &Term, subst: &mut Substitution) -> bool {
    let r1 = subst.resolve(t1);
    let r2 = subst.resolve(t2);
    match (&r1, &r2) {
        (Term::Var(v), _) => subst.bind(v, &r2).is_ok(),
        (_, Term::Var(v)) => subst.bind(v, &r1).is_ok(),
        _ => r1 == r2,
    }
}

pub(crate) fn unify_atom_into(a1: &Atom, a2: &Atom, subst: &mut Substitution) -> bool {
    a1.name == a2.name
        && a1.positive == a2.positive
        && a1.arity() == a2.arity()
        && a1
            .args
            .iter()
            .zip(a2.args.iter())
            .all(|(t1, t2)| unify_term_into(t1, t2, subst))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ground_atom_unifies_with_itself() {
        let a = Atom::positive("on", [Term::object("a"), Term::object("b")]);
        let s = unify_atom(&a, &a, &Substitution::new()).unwrap();
        assert!(s.is_empty());
    }

    #[test]
    fn distinct_constants_fail() {
        let p1 = Atom::positive("p", [Term::object("c1")]);
        let p2 = Atom::positive("p", [Term::object("c2")]);
        assert!(unify_atom(&p1, &p2, &Substitution::new()).is_none());
    }

    #[test]
    fn variable_binds_and_propagates() {
        let lifted = Atom::positive("on", [Term::var("?a"), Term::var("?b")]);
        let ground = Atom::positive("on", [Term::object("a"), Term::object("b")]);
        let s = unify_atom(&lifted, &ground, &Substitution::new()).unwrap();
        assert_eq!(s.sub_atom(&lifted), ground);
    }

    #[test]
    fn repeated_variable_must_agree() {
        let lifted = Atom::positive("on", [Term::var("?a"), Term::var("?a")]);
        let ground = Atom::positive("on", [Term::object("a"), Term::object("b")]);
        assert!(unify_atom(&lifted, &ground, &Substitution::new()).is_none());
        let same = Atom::positive("on", [Term::object("a"), Term::object("a")]);
        assert!(unify_atom(&lifted, &same, &Substitution::new()).is_some());
    }

    #[test]
    fn polarity_and_arity_must_match() {
        let a = Atom::positive("p", [Term::object("a")]);
        assert!(unify_atom(&a, &a.negated(), &Substitution::new()).is_none());
        let longer = Atom::positive("p", [Term::object("a"), Term::object("b")]);
        assert!(unify_atom(&a, &longer, &Substitution::new()).is_none());
    }

    #[test]
    fn existing_bindings_are_applied_first() {
        let mut s = Substitution::new();
        s.bind(&"?x".into(), &Term::object("a")).unwrap();
        assert!(unify_term(&Term::var("?x"), &Term::object("b"), &s).is_none());
        assert!(unify_term(&Term::var("?x"), &Term::object("a"), &s).is_some());
    }
}
