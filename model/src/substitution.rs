use std::collections::BTreeMap;
use std::fmt::{Debug, Display};

use itertools::Itertools;
use thiserror::Error;

use crate::{Atom, Constraint, Sym, Term};

#[derive(Error, Debug)]
pub enum BindingError {
    #[error("variable {0} is already bound to a different term")]
    Conflict(Sym),
}

/// A variable-to-term mapping built incrementally by unification.
///
/// Backed by a `BTreeMap` so that iteration (and therefore everything
/// derived from a substitution, like successor states) is deterministic.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct Substitution {
    bindings: BTreeMap<Sym, Term>,
}

impl Substitution {
    pub fn new() -> Substitution {
        Substitution::default()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn get(&self, var: &Sym) -> Option<&Term> {
        self.bindings.get(var)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Sym, &Term)> {
        self.bindings.iter()
    }

    /// Follows variable bindings until reaching a constant or an unbound
    /// variable. Terms are flat so chains cannot cycle, but we still cap the
    /// walk at the number of bindings.
    pub fn resolve(&self, term: &Term) -> Term {
        let mut current = term.clone();
        for _ in 0..=self.bindings.len() {
            match &current {
                Term::Var(v) => match self.bindings.get(v) {
                    Some(next) => current = next.clone(),
                    None => return current,
                },
                _ => return current,
            }
        }
        current
    }

    /// Binds `var` to `term` (both resolved first). Binding a variable to
    /// itself is a no-op; rebinding to a different term is a conflict.
    pub fn bind(&mut self, var: &Sym, term: &Term) -> Result<(), BindingError> {
        let target = self.resolve(term);
        match self.resolve(&Term::Var(var.clone())) {
            Term::Var(v) => {
                if Term::Var(v.clone()) != target {
                    self.bindings.insert(v, target);
                }
                Ok(())
            }
            existing if existing == target => Ok(()),
            _ => Err(BindingError::Conflict(var.clone())),
        }
    }

    /// Applies the substitution to a term.
    pub fn sub_term(&self, term: &Term) -> Term {
        self.resolve(term)
    }

    /// Applies the substitution to every argument of an atom.
    pub fn sub_atom(&self, atom: &Atom) -> Atom {
        Atom {
            name: atom.name.clone(),
            args: atom.args.iter().map(|t| self.sub_term(t)).collect(),
            positive: atom.positive,
        }
    }

    /// Applies the substitution to both endpoints of a constraint.
    pub fn sub_constraint(&self, c: &Constraint) -> Constraint {
        Constraint::new(self.sub_term(c.a()), self.sub_term(c.b()), c.relation())
    }

    /// Merges two substitutions, failing if some variable would end up bound
    /// to two different terms.
    pub fn merge(&self, other: &Substitution) -> Option<Substitution> {
        let mut merged = self.clone();
        for (var, term) in other.iter() {
            merged.bind(var, term).ok()?;
        }
        Some(merged)
    }
}

impl Display for Substitution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{{{}}}",
            self.bindings.iter().map(|(v, t)| format!("{v} <- {t}")).format(", ")
        )
    }
}

impl Debug for Substitution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn var(name: &str) -> Sym {
        Sym::from(name)
    }

    #[test]
    fn resolve_follows_chains() {
        let mut s = Substitution::new();
        s.bind(&var("?x"), &Term::var("?y")).unwrap();
        s.bind(&var("?y"), &Term::object("a")).unwrap();
        assert_eq!(s.resolve(&Term::var("?x")), Term::object("a"));
    }

    #[test]
    fn rebinding_same_target_is_ok() {
        let mut s = Substitution::new();
        s.bind(&var("?x"), &Term::object("a")).unwrap();
        assert!(s.bind(&var("?x"), &Term::object("a")).is_ok());
        assert!(s.bind(&var("?x"), &Term::object("b")).is_err());
    }

    #[test]
    fn merge_detects_conflicts() {
        let mut s1 = Substitution::new();
        s1.bind(&var("?x"), &Term::object("a")).unwrap();
        let mut s2 = Substitution::new();
        s2.bind(&var("?x"), &Term::object("b")).unwrap();
        assert!(s1.merge(&s2).is_none());
        let mut s3 = Substitution::new();
        s3.bind(&var("?y"), &Term::object("c")).unwrap();
        let merged = s1.merge(&s3).unwrap();
        assert_eq!(merged.len(), 2);
    }
}
