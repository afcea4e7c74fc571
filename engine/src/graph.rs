use std::sync::Arc;

use retrograde_model::{Substitution, Sym, Term};

use crate::state::AbstractState;

/// Identifier of a node (abstract state) inside one [`StateGraph`].
#[derive(Debug, Clone, Copy, Ord, PartialOrd, Eq, PartialEq, Hash)]
pub struct NodeId(u32);

impl From<NodeId> for usize {
    fn from(n: NodeId) -> Self {
        n.0 as usize
    }
}

impl From<usize> for NodeId {
    fn from(x: usize) -> Self {
        NodeId(x as u32)
    }
}

/// A directed edge: applying one outcome branch of an action in `source`
/// leads to `target`. The graph permits cycles, which is what lets states
/// far from the goal discover short routes back to it.
#[derive(Debug, Clone)]
pub struct Transition {
    pub source: NodeId,
    pub target: NodeId,
    pub action: Sym,
    /// Parameter instantiation of the action, unresolved parameters staying
    /// variables.
    pub args: Vec<Term>,
    pub subst: Substitution,
    pub branch: usize,
}

/// Whether exploration ran to exhaustion or hit a budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    Done,
    Partial,
}

/// Shortest-route entry for one node, filled in by the path projector.
#[derive(Debug, Clone, Copy)]
pub(crate) struct RouteStep {
    /// Number of transitions on a shortest route to the goal.
    pub distance: u32,
    /// Index of the first transition of that route; `None` only for the
    /// goal node itself.
    pub next: Option<usize>,
}

/// The set of all states reached from one (completed) goal within budget,
/// plus every transition between them. Immutable once exploration and path
/// projection finish; shared behind an `Arc` by the schema cache.
pub struct StateGraph {
    nodes: Vec<Arc<AbstractState>>,
    transitions: Vec<Transition>,
    outgoing: Vec<Vec<usize>>,
    incoming: Vec<Vec<usize>>,
    index: hashbrown::HashMap<Arc<AbstractState>, NodeId>,
    goal: NodeId,
    termination: Termination,
    routes: Vec<Option<RouteStep>>,
}

impl StateGraph {
    /// Creates a graph holding only the (completed) goal state.
    pub(crate) fn new(goal_state: AbstractState) -> StateGraph {
        let mut graph = StateGraph {
            nodes: Vec::new(),
            transitions: Vec::new(),
            outgoing: Vec::new(),
            incoming: Vec::new(),
            index: hashbrown::HashMap::new(),
            goal: NodeId(0),
            termination: Termination::Done,
            routes: Vec::new(),
        };
        let (goal, _) = graph.insert_state(goal_state);
        graph.goal = goal;
        graph
    }

    /// Looks up a structurally equal state (canonical equality, depth
    /// ignored).
    pub fn lookup(&self, state: &AbstractState) -> Option<NodeId> {
        self.index.get(state).copied()
    }

    /// Inserts a state, deduplicating against canonical equality. Returns
    /// the node id and whether the state was new.
    pub(crate) fn insert_state(&mut self, state: AbstractState) -> (NodeId, bool) {
        if let Some(existing) = self.lookup(&state) {
            return (existing, false);
        }
        let id = NodeId::from(self.nodes.len());
        let state = Arc::new(state);
        self.nodes.push(state.clone());
        self.outgoing.push(Vec::new());
        self.incoming.push(Vec::new());
        self.index.insert(state, id);
        (id, true)
    }

    pub(crate) fn add_transition(&mut self, transition: Transition) {
        let idx = self.transitions.len();
        self.outgoing[usize::from(transition.source)].push(idx);
        self.incoming[usize::from(transition.target)].push(idx);
        self.transitions.push(transition);
    }

    pub(crate) fn set_termination(&mut self, termination: Termination) {
        self.termination = termination;
    }

    pub(crate) fn set_routes(&mut self, routes: Vec<Option<RouteStep>>) {
        debug_assert_eq!(routes.len(), self.nodes.len());
        self.routes = routes;
    }

    pub fn goal(&self) -> NodeId {
        self.goal
    }

    pub fn termination(&self) -> Termination {
        self.termination
    }

    pub fn is_partial(&self) -> bool {
        self.termination == Termination::Partial
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> &Arc<AbstractState> {
        &self.nodes[usize::from(id)]
    }

    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &Arc<AbstractState>)> {
        self.nodes.iter().enumerate().map(|(i, s)| (NodeId::from(i), s))
    }

    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    pub fn outgoing(&self, id: NodeId) -> impl Iterator<Item = &Transition> {
        self.outgoing[usize::from(id)].iter().map(|&i| &self.transitions[i])
    }

    pub fn incoming(&self, id: NodeId) -> impl Iterator<Item = &Transition> {
        self.incoming[usize::from(id)].iter().map(|&i| &self.transitions[i])
    }

    pub(crate) fn incoming_indices(&self, id: NodeId) -> &[usize] {
        &self.incoming[usize::from(id)]
    }

    /// True if a route from this state back to the goal exists in the graph.
    pub fn is_reachable(&self, id: NodeId) -> bool {
        self.routes.get(usize::from(id)).copied().flatten().is_some()
    }

    /// Length (in transitions) of the shortest route to the goal.
    pub fn distance_to_goal(&self, id: NodeId) -> Option<u32> {
        self.routes.get(usize::from(id)).copied().flatten().map(|r| r.distance)
    }

    /// The minimal transition sequence leading from `id` to the goal, or
    /// `None` for states flagged unreachable. The goal itself yields an
    /// empty route.
    pub fn route_to_goal(&self, id: NodeId) -> Option<Vec<&Transition>> {
        let mut route = Vec::new();
        let mut current = id;
        while current != self.goal {
            let step = self.routes.get(usize::from(current)).copied().flatten()?;
            let transition = &self.transitions[step.next?];
            route.push(transition);
            current = transition.target;
        }
        Some(route)
    }
}
