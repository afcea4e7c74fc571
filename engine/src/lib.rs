//! Lifted, unification-based exploration engine.
//!
//! From a symbolic goal (a conjunction of relational atoms) the engine
//! builds the graph of situations from which an action sequence can reach
//! that goal, and for each situation the shortest route back. Goals are
//! canonicalized into structural schemas first, so goals differing only in
//! which concrete objects they name share one exploration through the
//! schema cache.
//!
//! The [`Planner`] facade wires the pieces together:
//! normalize → cache lookup → (on miss) explore → path projection → result.

pub mod cache;
pub mod consistency;
pub mod explore;
pub mod fmt;
pub mod graph;
pub mod matcher;
pub mod normalize;
mod paths;
pub mod state;

use std::fmt::Display;
use std::sync::Arc;

use itertools::Itertools;
use retrograde_model::{Atom, Constraint, Domain, Objects, Res, Sym, Term};

use crate::cache::SchemaCache;
use crate::explore::{Cfg, explore};
use crate::graph::{NodeId, StateGraph};
use crate::normalize::{GoalSchema, normalize_goal};

/// Owns a validated domain, the declared object list, the exploration
/// configuration and the schema cache. One planner instance corresponds to
/// one pipeline run; it is safe to share across threads.
pub struct Planner {
    domain: Domain,
    objects: Objects,
    cfg: Cfg,
    cache: SchemaCache,
}

impl Planner {
    pub fn new(domain: Domain, objects: Objects) -> Planner {
        Planner::with_cfg(domain, objects, Cfg::default())
    }

    pub fn with_cfg(domain: Domain, objects: Objects, cfg: Cfg) -> Planner {
        Planner {
            domain,
            objects,
            cfg,
            cache: SchemaCache::new(),
        }
    }

    pub fn domain(&self) -> &Domain {
        &self.domain
    }

    pub fn cache(&self) -> &SchemaCache {
        &self.cache
    }

    /// Solves one goal conjunction: validates it, normalizes it to schema
    /// level, then serves the graph from cache or runs a fresh exploration.
    pub fn solve(&self, goal: &[Atom]) -> Res<Projection> {
        self.solve_constrained(goal, &[])
    }

    /// Like [`Planner::solve`], with additional constraints over the goal's
    /// terms.
    pub fn solve_constrained(&self, goal: &[Atom], constraints: &[Constraint]) -> Res<Projection> {
        self.domain.validate_goal(goal)?;
        let schema = normalize_goal(goal, constraints, &self.objects);
        let (graph, cache_hit) = self
            .cache
            .get_or_build(schema.key(), || explore(&self.domain, &schema.atoms, &schema.constraints, &self.cfg))?;
        Ok(Projection {
            graph,
            schema,
            cache_hit,
        })
    }
}

/// One step of an instantiated plan: action name plus arguments with the
/// goal's concrete objects restored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanStep {
    pub action: Sym,
    pub args: Vec<Term>,
}

impl Display for PlanStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}", self.action)?;
        if !self.args.is_empty() {
            write!(f, " {}", self.args.iter().format(" "))?;
        }
        write!(f, ")")
    }
}

/// Result of solving one goal: the (possibly cached) schema-level graph and
/// the binding required to speak about the goal's concrete objects again.
pub struct Projection {
    pub graph: Arc<StateGraph>,
    pub schema: GoalSchema,
    /// True when the graph came from the schema cache with zero new
    /// exploration.
    pub cache_hit: bool,
}

impl Projection {
    pub fn is_partial(&self) -> bool {
        self.graph.is_partial()
    }

    /// The shortest plan from `node` back to the goal, instantiated with
    /// the concrete objects of the original goal. `None` for states flagged
    /// unreachable.
    pub fn plan_from(&self, node: NodeId) -> Option<Vec<PlanStep>> {
        let route = self.graph.route_to_goal(node)?;
        Some(
            route
                .iter()
                .map(|t| PlanStep {
                    action: t.action.clone(),
                    args: t.args.iter().map(|a| self.schema.instantiate_term(a)).collect(),
                })
                .collect(),
        )
    }

    /// DOT rendering of the underlying graph (diagnostics).
    pub fn to_dot(&self) -> String {
        fmt::to_dot(&self.graph)
    }
}

pub use crate::explore::depth_budget_for;
pub use crate::graph::{Termination, Transition};
pub use crate::matcher::MatchStrategy;
pub use crate::state::AbstractState;
