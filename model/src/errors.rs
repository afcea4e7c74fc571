//! Boundary errors: everything here is raised before exploration starts.
//! Failures *during* search (unification misses, rejected states, dropped
//! branches) are expected control flow and never surface as errors.

use thiserror::Error;

use crate::{ActionsError, Sym};

/// A malformed domain description, rejected at load time.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("duplicate relation declaration {0}")]
    DuplicateRelation(Sym),
    #[error("action {action} references undeclared relation {relation}")]
    UndeclaredRelation { action: Sym, relation: Sym },
    #[error("action {action}: relation {relation} expects {expected} arguments, got {actual}")]
    ArityMismatch {
        action: Sym,
        relation: Sym,
        expected: usize,
        actual: usize,
    },
    #[error("action {action} uses variable {variable} which is not one of its parameters")]
    UnknownParameter { action: Sym, variable: Sym },
    #[error("action {action}: constraint endpoint {term} is not a parameter variable")]
    NonParameterConstraint { action: Sym, term: String },
    #[error("action {action} declares parameter {parameter} twice")]
    DuplicateParameter { action: Sym, parameter: Sym },
    #[error("action {action} has no outcome branch")]
    NoOutcome { action: Sym },
    #[error(transparent)]
    Actions(#[from] ActionsError),
}

/// A malformed goal, rejected before normalization.
#[derive(Error, Debug)]
pub enum GoalError {
    #[error("goal references undeclared relation {relation}")]
    UndeclaredRelation { relation: Sym },
    #[error("goal: relation {relation} expects {expected} arguments, got {actual}")]
    ArityMismatch {
        relation: Sym,
        expected: usize,
        actual: usize,
    },
    #[error("goal is empty")]
    Empty,
    #[error("goal atoms are mutually inconsistent")]
    Inconsistent,
}
