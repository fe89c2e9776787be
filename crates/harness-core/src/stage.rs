//! Run-scoped actor registry

use crate::actor::Actor;
use crate::error::{HarnessError, Result};
use dashmap::DashMap;
use std::sync::Arc;
use tracing::{debug, info};

type ActorRegistry = DashMap<String, Arc<Actor>>;

/// Every actor taking part in one test run, looked up by name.
///
/// Create one per run and hand it to the step context and to the isolation
/// manager; call [`dispose`](Stage::dispose) when the run ends.
#[derive(Debug, Default)]
pub struct Stage {
    actors: ActorRegistry,
}

impl Stage {
    pub fn new() -> Self {
        Self::default()
    }

    /// The actor called `name`, created on first reference.
    pub fn actor_called(&self, name: &str) -> Arc<Actor> {
        self.actors
            .entry(name.to_string())
            .or_insert_with(|| {
                debug!(actor = name, "actor enters the stage");
                Arc::new(Actor::new(name))
            })
            .value()
            .clone()
    }

    /// The actor called `name`, failing if it was never referenced.
    pub fn find(&self, name: &str) -> Result<Arc<Actor>> {
        self.actors
            .get(name)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| HarnessError::ActorNotFound {
                name: name.to_string(),
            })
    }

    /// Names of all registered actors, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.actors.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.actors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actors.is_empty()
    }

    /// End the run: retire every actor and empty the registry.
    pub fn dispose(&self) {
        let count = self.actors.len();
        for entry in self.actors.iter() {
            entry.value().retire();
        }
        self.actors.clear();
        info!(actors = count, "stage disposed");
    }
}
