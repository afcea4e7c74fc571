use std::fmt::{Debug, Display};

use derive_more::Display;

use crate::Term;

/// Relation between the two endpoints of a [`Constraint`].
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Display)]
pub enum Relation {
    #[display("!=")]
    Neq,
    #[display("=")]
    Eq,
}

/// A binary constraint between two terms, typically two variables coming
/// from a `(not (= ?x ?y))` clause of an action schema.
///
/// Constraints are canonical by construction: the endpoints are stored in
/// term order, so `?x != ?y` and `?y != ?x` compare equal.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Constraint {
    a: Term,
    b: Term,
    relation: Relation,
}

impl Constraint {
    pub fn new(a: Term, b: Term, relation: Relation) -> Constraint {
        let (a, b) = if a <= b { (a, b) } else { (b, a) };
        Constraint { a, b, relation }
    }

    pub fn neq(a: Term, b: Term) -> Constraint {
        Constraint::new(a, b, Relation::Neq)
    }

    pub fn eq(a: Term, b: Term) -> Constraint {
        Constraint::new(a, b, Relation::Eq)
    }

    pub fn a(&self) -> &Term {
        &self.a
    }

    pub fn b(&self) -> &Term {
        &self.b
    }

    pub fn relation(&self) -> Relation {
        self.relation
    }

    /// True if both endpoints are syntactically identical.
    pub fn endpoints_equal(&self) -> bool {
        self.a == self.b
    }

    /// True if the endpoints are two distinct constants, i.e. the constraint
    /// can never change truth value under further substitution.
    pub fn settled_distinct(&self) -> bool {
        self.a.is_constant() && self.b.is_constant() && self.a != self.b
    }
}

impl Display for Constraint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {}", self.a, self.relation, self.b)
    }
}

impl Debug for Constraint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_endpoint_order() {
        let x = Term::var("?x");
        let y = Term::var("?y");
        assert_eq!(Constraint::neq(x.clone(), y.clone()), Constraint::neq(y, x));
    }

    #[test]
    fn settled() {
        let c = Constraint::neq(Term::object("a"), Term::object("b"));
        assert!(c.settled_distinct());
        assert!(!c.endpoints_equal());
        let c = Constraint::neq(Term::object("a"), Term::object("a"));
        assert!(c.endpoints_equal());
    }
}
