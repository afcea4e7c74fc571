use std::fmt::{Debug, Display};
use std::hash::{Hash, Hasher};

use itertools::Itertools;
use retrograde_model::{Atom, Constraint, Relation, Substitution, Term};

use crate::consistency::Consistency;

/// An abstract situation: a canonically ordered set of atoms (possibly
/// containing variables) plus a set of constraints between terms, and the
/// depth at which exploration first reached it.
///
/// Depth is metadata, not identity: `PartialEq`/`Hash` are implemented by
/// hand to ignore it, so two states with the same (atoms, constraints) pair
/// deduplicate to one graph node regardless of when they were found.
///
/// States are only built through [`AbstractState::build`], which
/// canonicalizes and validates; they are never mutated afterwards.
#[derive(Clone)]
pub struct AbstractState {
    atoms: Vec<Atom>,
    constraints: Vec<Constraint>,
    depth: u32,
}

impl AbstractState {
    /// Validating constructor: deduplicates and canonicalizes the proposed
    /// content, then runs the consistency rules. Returns `None` when the
    /// candidate is rejected; rejection is expected control flow, not an
    /// error.
    pub fn build(
        atoms: Vec<Atom>,
        constraints: Vec<Constraint>,
        depth: u32,
        consistency: &Consistency,
    ) -> Option<AbstractState> {
        let (atoms, constraints) = canonicalize(atoms, constraints);
        if !consistency.admits(&atoms, &constraints) {
            return None;
        }
        Some(AbstractState {
            atoms,
            constraints,
            depth,
        })
    }

    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Exact membership test over the canonical atom list.
    pub fn contains(&self, atom: &Atom) -> bool {
        self.atoms.binary_search(atom).is_ok()
    }
}

/// Equality-constraint elimination, redundancy filtering, sorting and
/// deduplication. Equality constraints with a variable endpoint are resolved
/// by substituting one endpoint for the other throughout the state; trivially
/// satisfied constraints are dropped; violated ones are left in place for the
/// consistency rules to reject.
fn canonicalize(mut atoms: Vec<Atom>, constraints: Vec<Constraint>) -> (Vec<Atom>, Vec<Constraint>) {
    let mut eq = Substitution::new();
    for c in &constraints {
        if c.relation() == Relation::Eq {
            match (c.a(), c.b()) {
                (Term::Var(v), other) | (other, Term::Var(v)) => {
                    // a conflicting equality chain stays unresolved and is
                    // rejected by the constraint rule below
                    let _ = eq.bind(v, other);
                }
                _ => {}
            }
        }
    }
    let mut constraints: Vec<Constraint> = constraints
        .iter()
        .map(|c| eq.sub_constraint(c))
        .filter(|c| match c.relation() {
            Relation::Eq => !c.endpoints_equal(),
            Relation::Neq => !c.settled_distinct(),
        })
        .collect();
    if !eq.is_empty() {
        atoms = atoms.iter().map(|a| eq.sub_atom(a)).collect();
    }
    atoms.sort();
    atoms.dedup();
    constraints.sort();
    constraints.dedup();
    (atoms, constraints)
}

impl PartialEq for AbstractState {
    fn eq(&self, other: &Self) -> bool {
        self.atoms == other.atoms && self.constraints == other.constraints
    }
}

impl Eq for AbstractState {}

impl Hash for AbstractState {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.atoms.hash(state);
        self.constraints.hash(state);
    }
}

impl Display for AbstractState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.atoms.iter().format(" "))?;
        if !self.constraints.is_empty() {
            write!(f, " | {}", self.constraints.iter().format(", "))?;
        }
        Ok(())
    }
}

impl Debug for AbstractState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[d{}] {self}", self.depth)
    }
}
