use std::collections::BTreeSet;
use std::fmt::Display;

use itertools::Itertools;

use crate::{Sym, Term};

/// The concrete object identifiers declared for a planning problem.
///
/// Consumed by the goal normalizer to tell abstractable objects apart from
/// plain constants: a token in this set may be rewritten to a schema
/// variable, anything else is left untouched.
#[derive(Clone, Default, Debug)]
pub struct Objects {
    objects: BTreeSet<Sym>,
}

impl Objects {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn declare(&mut self, name: impl Into<Sym>) {
        self.objects.insert(name.into());
    }

    pub fn is_declared(&self, name: &Sym) -> bool {
        self.objects.contains(name)
    }

    /// True if the term is a declared, abstractable object.
    pub fn covers(&self, term: &Term) -> bool {
        match term {
            Term::Object(name) => self.is_declared(name),
            _ => false,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Sym> {
        self.objects.iter()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

impl<S: Into<Sym>> FromIterator<S> for Objects {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        let mut objects = Objects::new();
        for o in iter {
            objects.declare(o);
        }
        objects
    }
}

impl Display for Objects {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{{}}}", self.objects.iter().format(", "))
    }
}
