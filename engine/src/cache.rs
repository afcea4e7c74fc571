//! Process-lifetime cache of explored goal schemas.

use std::sync::{Arc, Mutex};

use tracing::debug;

use crate::graph::StateGraph;
use crate::normalize::SchemaKey;

/// Map from normalized-goal key to the finished graph built for it.
///
/// A hit returns the existing graph unchanged, with zero new exploration.
/// Entries are never evicted during a pipeline run; graphs are immutable
/// once stored, so sharing them behind an `Arc` is sound. The whole
/// check-else-build-and-insert sequence runs under the lock, so concurrent
/// callers cannot build the same schema twice.
#[derive(Default)]
pub struct SchemaCache {
    inner: Mutex<hashbrown::HashMap<SchemaKey, Arc<StateGraph>>>,
}

impl SchemaCache {
    pub fn new() -> SchemaCache {
        SchemaCache::default()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().expect("cache lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the cached graph for `key`, or builds, stores and returns
    /// it. The boolean is true on a cache hit.
    pub fn get_or_build<E, F>(&self, key: &SchemaKey, build: F) -> Result<(Arc<StateGraph>, bool), E>
    where
        F: FnOnce() -> Result<StateGraph, E>,
    {
        let mut cache = self.inner.lock().expect("cache lock poisoned");
        if let Some(graph) = cache.get(key) {
            debug!(key = key.as_str(), "schema cache hit");
            return Ok((graph.clone(), true));
        }
        let graph = Arc::new(build()?);
        cache.insert(key.clone(), graph.clone());
        debug!(key = key.as_str(), states = graph.len(), "schema cache insert");
        Ok((graph, false))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consistency::Consistency;
    use crate::state::AbstractState;
    use retrograde_model::{Atom, Objects, Term};

    fn key(goal_object: &str) -> SchemaKey {
        let objects: Objects = ["a", "b"].into_iter().collect();
        crate::normalize::normalize_goal(
            &[Atom::positive("clear", [Term::object(goal_object)])],
            &[],
            &objects,
        )
        .key()
        .clone()
    }

    fn trivial_graph() -> StateGraph {
        let state = AbstractState::build(
            vec![Atom::positive("clear", [Term::var("?arg0")])],
            vec![],
            0,
            &Consistency::new(),
        )
        .unwrap();
        StateGraph::new(state)
    }

    type BuildResult = Result<(Arc<StateGraph>, bool), ()>;

    #[test]
    fn second_lookup_is_served_from_cache() {
        let cache = SchemaCache::new();
        let k = key("a");
        let first: BuildResult = cache.get_or_build(&k, || Ok(trivial_graph()));
        let (first, hit) = first.unwrap();
        assert!(!hit);
        let second: BuildResult = cache.get_or_build(&k, || panic!("must not rebuild a cached schema"));
        let (second, hit) = second.unwrap();
        assert!(hit);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn build_errors_are_not_cached() {
        let cache = SchemaCache::new();
        let k = key("a");
        assert!(cache.get_or_build(&k, || Err("nope")).is_err());
        assert!(cache.is_empty());
        let rebuilt: BuildResult = cache.get_or_build(&k, || Ok(trivial_graph()));
        assert!(rebuilt.is_ok());
    }
}
