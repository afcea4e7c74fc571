//! Path projection: for every state of a finished graph, the shortest
//! transition sequence leading back to the goal.

use std::collections::VecDeque;

use fixedbitset::FixedBitSet;
use tracing::debug;

use crate::graph::{NodeId, RouteStep, StateGraph};

/// Breadth-first search from the goal over reversed edges. Fills the
/// per-node route table: distance to the goal and the first transition of
/// one shortest route. Nodes never reached are left unmarked, which is how
/// they end up flagged unreachable and excluded from plan projection.
pub(crate) fn project_routes(graph: &mut StateGraph) {
    let n = graph.len();
    let mut routes: Vec<Option<RouteStep>> = vec![None; n];
    let mut seen = FixedBitSet::with_capacity(n);

    let goal = graph.goal();
    routes[usize::from(goal)] = Some(RouteStep { distance: 0, next: None });
    seen.insert(usize::from(goal));

    let mut queue: VecDeque<NodeId> = VecDeque::new();
    queue.push_back(goal);
    while let Some(node) = queue.pop_front() {
        let distance = routes[usize::from(node)]
            .map(|r| r.distance)
            .unwrap_or_default();
        for &t in graph.incoming_indices(node) {
            let source = graph.transitions()[t].source;
            if !seen.contains(usize::from(source)) {
                seen.insert(usize::from(source));
                routes[usize::from(source)] = Some(RouteStep {
                    distance: distance + 1,
                    next: Some(t),
                });
                queue.push_back(source);
            }
        }
    }

    let unreachable = n - seen.count_ones(..);
    if unreachable > 0 {
        debug!(unreachable, total = n, "states with no route back to the goal");
    }
    graph.set_routes(routes);
}
