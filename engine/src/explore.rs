//! The exploration engine: goal completion followed by a budgeted
//! breadth-first construction of the state graph.

use std::collections::VecDeque;

use itertools::Itertools;
use retrograde_model::{Atom, Constraint, Domain, Substitution, errors::GoalError, unify_atom};
use tracing::{debug, trace};

use crate::consistency::Consistency;
use crate::graph::{StateGraph, Termination, Transition};
use crate::matcher::{MatchStrategy, VarSupply, apply_schema, carried_constraints};
use crate::state::AbstractState;

/// Exploration configuration. Defaults match the reference behavior.
#[derive(Clone, Debug)]
pub struct Cfg {
    /// Cap on the number of states admitted into one graph. Hitting it
    /// yields a `Partial` result, not an error.
    pub max_states: usize,
    /// Depth bound override. When `None`, the bound is derived from the
    /// number of distinct goal atoms (see [`depth_budget_for`]).
    pub depth_budget: Option<u32>,
    /// Precondition matching strategy.
    pub strategy: MatchStrategy,
}

impl Default for Cfg {
    fn default() -> Self {
        Cfg {
            max_states: 1024,
            depth_budget: None,
            strategy: MatchStrategy::default(),
        }
    }
}

/// Depth bound as a function of goal size: a goal touching few atoms only
/// warrants a shallow neighbourhood, a larger conjunction a deeper one.
pub fn depth_budget_for(distinct_goal_atoms: usize) -> u32 {
    match distinct_goal_atoms {
        0..=1 => 3,
        2..=3 => 5,
        4..=6 => 7,
        _ => 9,
    }
}

/// Builds the full state graph for one (schema-level) goal conjunction.
///
/// The goal is first *completed*: for every action schema whose
/// preconditions can absorb all goal atoms under one substitution, the
/// substituted precondition set is unioned into the goal, so that the goal
/// state actually satisfies at least one action (a minimal goal usually
/// satisfies none). Exploration then proceeds breadth-first from the
/// completed goal within the configured budgets, and finishes with path
/// projection.
pub fn explore(
    domain: &Domain,
    goal: &[Atom],
    goal_constraints: &[Constraint],
    cfg: &Cfg,
) -> Result<StateGraph, GoalError> {
    let _span = tracing::span!(tracing::Level::TRACE, "EXPLORE").entered();
    let consistency = Consistency::for_domain(domain);
    let mut supply = VarSupply::new();

    let distinct_goal_atoms = goal.iter().unique().count();
    let budget = cfg.depth_budget.unwrap_or_else(|| depth_budget_for(distinct_goal_atoms));

    let (atoms, constraints) = complete_goal(domain, goal, goal_constraints, &mut supply);
    let goal_state =
        AbstractState::build(atoms, constraints, 0, &consistency).ok_or(GoalError::Inconsistent)?;
    debug!(
        goal_atoms = distinct_goal_atoms,
        completed_atoms = goal_state.atoms().len(),
        budget,
        "completed goal state"
    );

    let mut graph = StateGraph::new(goal_state);
    let mut queue: VecDeque<_> = VecDeque::new();
    queue.push_back(graph.goal());
    let mut partial = false;

    while let Some(id) = queue.pop_front() {
        let state = graph.node(id).clone();
        trace!(node = usize::from(id), depth = state.depth(), "expanding {state}");
        for schema in domain.actions() {
            for succ in apply_schema(schema, &state, &mut supply, cfg.strategy, &consistency) {
                match graph.lookup(&succ.state) {
                    // transitions to already-known states are always
                    // recorded; these back-edges are what make the graph
                    // cyclic and give later states short routes to the goal
                    Some(existing) => graph.add_transition(Transition {
                        source: id,
                        target: existing,
                        action: succ.action,
                        args: succ.args,
                        subst: succ.subst,
                        branch: succ.branch,
                    }),
                    None if graph.len() >= cfg.max_states => {
                        // stop admitting new states, keep draining the queue
                        // so edges between known states are not lost
                        partial = true;
                    }
                    None if succ.state.depth() > budget => {
                        // states beyond the depth boundary are suppressed;
                        // the boundary states themselves were still expanded
                        partial = true;
                    }
                    None => {
                        let (target, _) = graph.insert_state(succ.state);
                        graph.add_transition(Transition {
                            source: id,
                            target,
                            action: succ.action,
                            args: succ.args,
                            subst: succ.subst,
                            branch: succ.branch,
                        });
                        queue.push_back(target);
                    }
                }
            }
        }
    }

    graph.set_termination(if partial { Termination::Partial } else { Termination::Done });
    crate::paths::project_routes(&mut graph);
    debug!(
        states = graph.len(),
        transitions = graph.transitions().len(),
        partial,
        "exploration finished"
    );
    Ok(graph)
}

/// Goal completion: every schema able to absorb the whole goal conjunction
/// into its precondition set contributes its substituted preconditions (and
/// any still-open parameter constraints) to the goal state.
fn complete_goal(
    domain: &Domain,
    goal: &[Atom],
    goal_constraints: &[Constraint],
    supply: &mut VarSupply,
) -> (Vec<Atom>, Vec<Constraint>) {
    let mut atoms: Vec<Atom> = goal.to_vec();
    let mut constraints: Vec<Constraint> = goal_constraints.to_vec();
    for schema in domain.actions() {
        let renamed = supply.rename(schema);
        let Some(subst) = absorb(goal, &renamed.preconditions, &Substitution::new()) else {
            continue;
        };
        let Some(carried) = carried_constraints(&renamed, &subst) else {
            continue;
        };
        trace!(action = %renamed.name, "schema supports the goal");
        atoms.extend(renamed.preconditions.iter().map(|p| subst.sub_atom(p)));
        constraints.extend(carried);
    }
    (atoms, constraints)
}

/// Finds one substitution under which every goal atom unifies with some
/// precondition of equal polarity. Backtracks over candidates; goal
/// conjunctions are small, so the exhaustive search is cheap.
fn absorb(goal: &[Atom], preconditions: &[Atom], subst: &Substitution) -> Option<Substitution> {
    let Some((g, rest)) = goal.split_first() else {
        return Some(subst.clone());
    };
    preconditions
        .iter()
        .filter(|p| p.positive == g.positive)
        .filter_map(|p| unify_atom(p, g, subst))
        .find_map(|extended| absorb(rest, preconditions, &extended))
}

#[cfg(test)]
mod tests {
    use super::*;
    use retrograde_model::{ActionSchema, Actions, EffectEntry, OutcomeBranch, Relations, Term};

    fn pick_up_domain() -> Domain {
        let mut relations = Relations::new();
        relations.declare("on", 2).unwrap();
        relations.declare("clear", 1).unwrap();
        relations.declare("handempty", 0).unwrap();
        relations.declare("holding", 1).unwrap();

        let mut a = ActionSchema::new("pick-up", vec!["?a".into(), "?b".into()]);
        a.preconditions = vec![
            Atom::positive("on", [Term::var("?a"), Term::var("?b")]),
            Atom::positive("clear", [Term::var("?a")]),
            Atom::positive("handempty", []),
        ];
        a.outcomes = vec![OutcomeBranch::new(vec![
            EffectEntry::add(Atom::positive("holding", [Term::var("?a")])),
            EffectEntry::add(Atom::positive("clear", [Term::var("?b")])),
            EffectEntry::delete(Atom::positive("on", [Term::var("?a"), Term::var("?b")])),
            EffectEntry::delete(Atom::positive("clear", [Term::var("?a")])),
            EffectEntry::delete(Atom::positive("handempty", [])),
        ])];
        let mut actions = Actions::new();
        actions.add(a).unwrap();
        Domain::new(relations, actions).unwrap()
    }

    #[test]
    fn completion_unions_supporting_preconditions() {
        let domain = pick_up_domain();
        let goal = [Atom::positive("on", [Term::object("a"), Term::object("b")])];
        let graph = explore(&domain, &goal, &[], &Cfg::default()).unwrap();
        let goal_state = graph.node(graph.goal());
        assert!(goal_state.contains(&Atom::positive("on", [Term::object("a"), Term::object("b")])));
        assert!(goal_state.contains(&Atom::positive("clear", [Term::object("a")])));
        assert!(goal_state.contains(&Atom::positive("handempty", [])));
    }

    #[test]
    fn state_cap_yields_partial() {
        let domain = pick_up_domain();
        let goal = [Atom::positive("on", [Term::object("a"), Term::object("b")])];
        let cfg = Cfg {
            max_states: 1,
            ..Cfg::default()
        };
        let graph = explore(&domain, &goal, &[], &cfg).unwrap();
        assert!(graph.is_partial());
        assert!(graph.len() <= 1);
    }

    #[test]
    fn depth_budget_bounds_state_depth() {
        let domain = pick_up_domain();
        let goal = [Atom::positive("on", [Term::object("a"), Term::object("b")])];
        let cfg = Cfg {
            depth_budget: Some(0),
            ..Cfg::default()
        };
        let graph = explore(&domain, &goal, &[], &cfg).unwrap();
        assert!(graph.nodes().all(|(_, s)| s.depth() == 0));
    }

    #[test]
    fn inconsistent_goal_is_rejected_at_the_boundary() {
        let domain = pick_up_domain();
        let a = Atom::positive("on", [Term::object("a"), Term::object("b")]);
        assert!(matches!(
            explore(&domain, &[a.clone(), a.negated()], &[], &Cfg::default()),
            Err(GoalError::Inconsistent)
        ));
    }

    #[test]
    fn derived_budget_grows_with_goal_size() {
        assert!(depth_budget_for(1) < depth_budget_for(3));
        assert!(depth_budget_for(3) < depth_budget_for(8));
    }
}
