//! Symbolic vocabulary of the planner: terms, relational atoms, variable
//! constraints, substitutions, unification and action schemas, plus the
//! validated [`Domain`] container that the exploration engine consumes.
//!
//! Everything in this crate is immutable once constructed and free of
//! interior mutability, so values can be shared across threads freely.

mod actions;
mod atoms;
mod constraints;
mod domain;
pub mod errors;
mod objects;
mod substitution;
mod sym;
mod terms;
mod unify;

pub use actions::*;
pub use atoms::*;
pub use constraints::*;
pub use domain::*;
pub use objects::*;
pub use substitution::*;
pub use sym::*;
pub use terms::*;
pub use unify::*;

pub type Res<T> = anyhow::Result<T>;
