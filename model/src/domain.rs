use std::fmt::Display;

use crate::errors::{DomainError, GoalError};
use crate::{ActionSchema, Actions, Atom, Sym, Term};

/// Declared relation names and their arities.
///
/// The upstream parser guarantees preconditions are flat conjunctions of
/// positive/negative atoms; this registry is what lets us reject an action
/// or goal that references a relation the domain never declared.
#[derive(Clone, Default, Debug)]
pub struct Relations {
    relations: hashbrown::HashMap<Sym, usize>,
}

impl Relations {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn declare(&mut self, name: impl Into<Sym>, arity: usize) -> Result<(), DomainError> {
        let name = name.into();
        if self.relations.contains_key(&name) {
            return Err(DomainError::DuplicateRelation(name));
        }
        self.relations.insert(name, arity);
        Ok(())
    }

    pub fn arity(&self, name: &Sym) -> Option<usize> {
        self.relations.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.relations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.relations.is_empty()
    }
}

/// A validated planning domain: relation declarations plus action schemas.
///
/// Construction runs all boundary checks of the error taxonomy, so the
/// engine can assume every atom it meets during search is well formed.
#[derive(Debug)]
pub struct Domain {
    relations: Relations,
    actions: Actions,
}

impl Domain {
    pub fn new(relations: Relations, actions: Actions) -> Result<Domain, DomainError> {
        for action in actions.iter() {
            validate_schema(action, &relations)?;
        }
        Ok(Domain { relations, actions })
    }

    pub fn relations(&self) -> &Relations {
        &self.relations
    }

    pub fn actions(&self) -> impl Iterator<Item = &ActionSchema> {
        self.actions.iter()
    }

    pub fn action(&self, name: impl Into<Sym>) -> Option<&ActionSchema> {
        self.actions.get(name).ok()
    }

    /// Boundary check for an incoming goal conjunction.
    pub fn validate_goal(&self, goal: &[Atom]) -> Result<(), GoalError> {
        if goal.is_empty() {
            return Err(GoalError::Empty);
        }
        for atom in goal {
            let Some(expected) = self.relations.arity(&atom.name) else {
                return Err(GoalError::UndeclaredRelation {
                    relation: atom.name.clone(),
                });
            };
            if atom.arity() != expected {
                return Err(GoalError::ArityMismatch {
                    relation: atom.name.clone(),
                    expected,
                    actual: atom.arity(),
                });
            }
        }
        Ok(())
    }
}

impl Display for Domain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Domain ({} relations):", self.relations.len())?;
        for action in self.actions.iter() {
            writeln!(f, "  {action}")?;
        }
        Ok(())
    }
}

fn validate_schema(action: &ActionSchema, relations: &Relations) -> Result<(), DomainError> {
    if action.outcomes.is_empty() {
        return Err(DomainError::NoOutcome {
            action: action.name.clone(),
        });
    }
    for (i, p) in action.parameters.iter().enumerate() {
        if action.parameters[..i].contains(p) {
            return Err(DomainError::DuplicateParameter {
                action: action.name.clone(),
                parameter: p.clone(),
            });
        }
    }
    let check_atom = |atom: &Atom| -> Result<(), DomainError> {
        let Some(expected) = relations.arity(&atom.name) else {
            return Err(DomainError::UndeclaredRelation {
                action: action.name.clone(),
                relation: atom.name.clone(),
            });
        };
        if atom.arity() != expected {
            return Err(DomainError::ArityMismatch {
                action: action.name.clone(),
                relation: atom.name.clone(),
                expected,
                actual: atom.arity(),
            });
        }
        for var in atom.variables() {
            if !action.parameters.contains(var) {
                return Err(DomainError::UnknownParameter {
                    action: action.name.clone(),
                    variable: var.clone(),
                });
            }
        }
        Ok(())
    };
    for atom in &action.preconditions {
        check_atom(atom)?;
    }
    for branch in &action.outcomes {
        for entry in &branch.entries {
            check_atom(&entry.atom)?;
        }
    }
    for c in &action.constraints {
        for term in [c.a(), c.b()] {
            match term {
                Term::Var(v) if action.parameters.contains(v) => {}
                Term::Var(_) | Term::Object(_) | Term::Int(_) | Term::Quoted(_) => {
                    return Err(DomainError::NonParameterConstraint {
                        action: action.name.clone(),
                        term: term.to_string(),
                    });
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Constraint, EffectEntry, OutcomeBranch};

    fn relations() -> Relations {
        let mut r = Relations::new();
        r.declare("on", 2).unwrap();
        r.declare("clear", 1).unwrap();
        r
    }

    fn schema(pre: Vec<Atom>, eff: Vec<EffectEntry>) -> ActionSchema {
        let mut a = ActionSchema::new("move", vec!["?a".into(), "?b".into()]);
        a.preconditions = pre;
        a.outcomes = vec![OutcomeBranch::new(eff)];
        a
    }

    #[test]
    fn undeclared_relation_is_fatal() {
        let mut actions = Actions::new();
        actions
            .add(schema(
                vec![Atom::positive("under", [Term::var("?a"), Term::var("?b")])],
                vec![EffectEntry::add(Atom::positive("clear", [Term::var("?a")]))],
            ))
            .unwrap();
        assert!(matches!(
            Domain::new(relations(), actions),
            Err(DomainError::UndeclaredRelation { .. })
        ));
    }

    #[test]
    fn arity_mismatch_is_fatal() {
        let mut actions = Actions::new();
        actions
            .add(schema(
                vec![Atom::positive("on", [Term::var("?a")])],
                vec![EffectEntry::add(Atom::positive("clear", [Term::var("?a")]))],
            ))
            .unwrap();
        assert!(matches!(
            Domain::new(relations(), actions),
            Err(DomainError::ArityMismatch { .. })
        ));
    }

    #[test]
    fn non_parameter_variable_is_fatal() {
        let mut actions = Actions::new();
        actions
            .add(schema(
                vec![Atom::positive("on", [Term::var("?a"), Term::var("?c")])],
                vec![EffectEntry::add(Atom::positive("clear", [Term::var("?a")]))],
            ))
            .unwrap();
        assert!(matches!(
            Domain::new(relations(), actions),
            Err(DomainError::UnknownParameter { .. })
        ));
    }

    #[test]
    fn constraint_endpoints_must_be_parameters() {
        let mut a = schema(
            vec![Atom::positive("on", [Term::var("?a"), Term::var("?b")])],
            vec![EffectEntry::add(Atom::positive("clear", [Term::var("?a")]))],
        );
        a.constraints.push(Constraint::neq(Term::var("?a"), Term::var("?z")));
        let mut actions = Actions::new();
        actions.add(a).unwrap();
        assert!(matches!(
            Domain::new(relations(), actions),
            Err(DomainError::NonParameterConstraint { .. })
        ));
    }

    #[test]
    fn goal_validation() {
        let actions = {
            let mut a = Actions::new();
            a.add(schema(
                vec![Atom::positive("on", [Term::var("?a"), Term::var("?b")])],
                vec![EffectEntry::add(Atom::positive("clear", [Term::var("?a")]))],
            ))
            .unwrap();
            a
        };
        let domain = Domain::new(relations(), actions).unwrap();
        assert!(domain.validate_goal(&[]).is_err());
        assert!(
            domain
                .validate_goal(&[Atom::positive("on", [Term::object("a"), Term::object("b")])])
                .is_ok()
        );
        assert!(
            domain
                .validate_goal(&[Atom::positive("held", [Term::object("a")])])
                .is_err()
        );
    }
}
