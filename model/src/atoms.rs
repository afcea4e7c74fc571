use std::fmt::{Debug, Display};

use itertools::Itertools;
use smallvec::SmallVec;

use crate::{Sym, Term};

/// Argument list of an atom. Inline storage covers the arities seen in
/// practice (most relations are binary or ternary).
pub type Args = SmallVec<[Term; 4]>;

/// A relational atom: relation name, ordered arguments and a polarity flag.
///
/// Atoms are immutable; every transformation (substitution, negation)
/// produces a new value. Equality is structural over all three components.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Atom {
    pub name: Sym,
    pub args: Args,
    pub positive: bool,
}

impl Atom {
    pub fn new(name: impl Into<Sym>, args: impl IntoIterator<Item = Term>, positive: bool) -> Atom {
        Atom {
            name: name.into(),
            args: args.into_iter().collect(),
            positive,
        }
    }

    /// An asserted atom `(name args...)`.
    pub fn positive(name: impl Into<Sym>, args: impl IntoIterator<Item = Term>) -> Atom {
        Atom::new(name, args, true)
    }

    /// A negated atom `(not (name args...))`.
    pub fn negative(name: impl Into<Sym>, args: impl IntoIterator<Item = Term>) -> Atom {
        Atom::new(name, args, false)
    }

    pub fn arity(&self) -> usize {
        self.args.len()
    }

    /// The same atom with flipped polarity.
    pub fn negated(&self) -> Atom {
        Atom {
            name: self.name.clone(),
            args: self.args.clone(),
            positive: !self.positive,
        }
    }

    pub fn is_ground(&self) -> bool {
        self.args.iter().all(Term::is_constant)
    }

    /// Variables occurring in the arguments, left to right, with repeats.
    pub fn variables(&self) -> impl Iterator<Item = &Sym> {
        self.args.iter().filter_map(Term::as_var)
    }
}

impl Display for Atom {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.positive {
            write!(f, "({}", self.name)?;
        } else {
            write!(f, "(not ({}", self.name)?;
        }
        if !self.args.is_empty() {
            write!(f, " {}", self.args.iter().format(" "))?;
        }
        if self.positive { write!(f, ")") } else { write!(f, "))") }
    }
}

impl Debug for Atom {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self}")
    }
}
