use std::collections::BTreeMap;
use std::fmt::Display;

use itertools::Itertools;
use thiserror::Error;

use crate::{Atom, Constraint, Sym};

#[derive(Error, Debug)]
pub enum ActionsError {
    #[error("duplicate action {0}")]
    DuplicateAction(Sym),
    #[error("unknown action {0}")]
    UnknownAction(Sym),
}

/// Add or delete, the two kinds of entries in an outcome branch.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum EffectKind {
    Add,
    Delete,
}

/// One entry of an outcome branch: add or remove an atom.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct EffectEntry {
    pub kind: EffectKind,
    pub atom: Atom,
}

impl EffectEntry {
    pub fn add(atom: Atom) -> EffectEntry {
        EffectEntry {
            kind: EffectKind::Add,
            atom,
        }
    }

    pub fn delete(atom: Atom) -> EffectEntry {
        EffectEntry {
            kind: EffectKind::Delete,
            atom,
        }
    }
}

/// One non-deterministic outcome of an action: an ordered list of add/delete
/// entries applied over the parent state's atoms.
#[derive(Clone, Default, Debug)]
pub struct OutcomeBranch {
    pub entries: Vec<EffectEntry>,
}

impl OutcomeBranch {
    pub fn new(entries: Vec<EffectEntry>) -> OutcomeBranch {
        OutcomeBranch { entries }
    }

    pub fn adds(&self) -> impl Iterator<Item = &Atom> {
        self.entries
            .iter()
            .filter(|e| e.kind == EffectKind::Add)
            .map(|e| &e.atom)
    }

    pub fn deletes(&self) -> impl Iterator<Item = &Atom> {
        self.entries
            .iter()
            .filter(|e| e.kind == EffectKind::Delete)
            .map(|e| &e.atom)
    }
}

/// A lifted action: parameters, preconditions (positive and negative atoms
/// over the parameters), parameter constraints coming from explicit
/// `(not (= ?x ?y))` clauses, and one or more outcome branches.
///
/// Schemas are loaded once from the external domain description and are
/// immutable for the process lifetime.
#[derive(Debug)]
pub struct ActionSchema {
    pub name: Sym,
    pub parameters: Vec<Sym>,
    pub preconditions: Vec<Atom>,
    pub constraints: Vec<Constraint>,
    pub outcomes: Vec<OutcomeBranch>,
}

impl ActionSchema {
    pub fn new(name: impl Into<Sym>, parameters: Vec<Sym>) -> Self {
        Self {
            name: name.into(),
            parameters,
            preconditions: Default::default(),
            constraints: Default::default(),
            outcomes: Default::default(),
        }
    }

    pub fn positive_preconditions(&self) -> impl Iterator<Item = &Atom> {
        self.preconditions.iter().filter(|a| a.positive)
    }

    pub fn negative_preconditions(&self) -> impl Iterator<Item = &Atom> {
        self.preconditions.iter().filter(|a| !a.positive)
    }
}

impl Display for ActionSchema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", self.name, self.parameters.iter().format(", "))?;
        write!(f, "\n    preconditions:")?;
        for p in &self.preconditions {
            write!(f, "\n      {p}")?;
        }
        for c in &self.constraints {
            write!(f, "\n      {c}")?;
        }
        for (i, branch) in self.outcomes.iter().enumerate() {
            write!(f, "\n    outcome {i}:")?;
            for e in &branch.entries {
                match e.kind {
                    EffectKind::Add => write!(f, "\n      + {}", e.atom)?,
                    EffectKind::Delete => write!(f, "\n      - {}", e.atom)?,
                }
            }
        }
        Ok(())
    }
}

/// Registry of the domain's action schemas, keyed by name.
#[derive(Default, Debug)]
pub struct Actions {
    actions: BTreeMap<Sym, ActionSchema>,
}

impl Actions {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn add(&mut self, action: ActionSchema) -> Result<(), ActionsError> {
        if self.actions.contains_key(&action.name) {
            return Err(ActionsError::DuplicateAction(action.name));
        }
        self.actions.insert(action.name.clone(), action);
        Ok(())
    }

    pub fn get(&self, name: impl Into<Sym>) -> Result<&ActionSchema, ActionsError> {
        let name = name.into();
        self.actions.get(&name).ok_or(ActionsError::UnknownAction(name))
    }

    pub fn iter(&self) -> impl Iterator<Item = &ActionSchema> {
        self.actions.values()
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}
