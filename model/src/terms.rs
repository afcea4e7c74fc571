use std::fmt::{Debug, Display};

use crate::Sym;

/// A term of the flat relational language: either a constant or a logic
/// variable. There are no compound terms, which is what makes unification
/// occurs-check free.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Term {
    /// An object identifier declared by the planning problem.
    Object(Sym),
    /// A numeric literal.
    Int(i64),
    /// A quoted literal, kept verbatim.
    Quoted(Sym),
    /// A logic variable (action parameter or schema placeholder).
    Var(Sym),
}

impl Term {
    pub fn object(name: impl Into<Sym>) -> Term {
        Term::Object(name.into())
    }

    pub fn var(name: impl Into<Sym>) -> Term {
        Term::Var(name.into())
    }

    pub fn is_var(&self) -> bool {
        matches!(self, Term::Var(_))
    }

    pub fn is_constant(&self) -> bool {
        !self.is_var()
    }

    pub fn as_var(&self) -> Option<&Sym> {
        match self {
            Term::Var(name) => Some(name),
            _ => None,
        }
    }
}

impl Display for Term {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Term::Object(s) | Term::Var(s) => write!(f, "{s}"),
            Term::Int(i) => write!(f, "{i}"),
            Term::Quoted(s) => write!(f, "\"{s}\""),
        }
    }
}

impl Debug for Term {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self}")
    }
}
