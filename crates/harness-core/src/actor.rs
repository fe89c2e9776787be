//! Actors and their per-run memory

use crate::error::{HarnessError, Result};
use crate::memory::{FromRemembered, Remembered};
use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, instrument};

pub type Memory = HashMap<String, Remembered>;

/// A named participant driving interactions against the agent.
///
/// Memory is owned by the actor; the harness assumes a single writer per actor
/// at any time, the lock only keeps handles `Send + Sync`.
#[derive(Debug)]
pub struct Actor {
    name: String,
    memory: RwLock<Memory>,
    retired: AtomicBool,
}

impl Actor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            memory: RwLock::new(HashMap::new()),
            retired: AtomicBool::new(false),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Insert or overwrite `key`.
    #[instrument(skip(self, value), fields(actor = %self.name))]
    pub fn remember(&self, key: &str, value: impl Into<Remembered>) {
        let value = value.into();
        debug!(kind = value.kind(), "remembering");
        self.memory.write().insert(key.to_string(), value);
    }

    /// Read `key` as `T`.
    pub fn recall<T: FromRemembered>(&self, key: &str) -> Result<T> {
        let value = self
            .memory
            .read()
            .get(key)
            .cloned()
            .ok_or_else(|| HarnessError::KeyNotFound {
                actor: self.name.clone(),
                key: key.to_string(),
            })?;

        T::from_remembered(value).map_err(|found| HarnessError::TypeMismatch {
            actor: self.name.clone(),
            key: key.to_string(),
            expected: T::EXPECTED,
            found: found.kind(),
        })
    }

    /// Read a structured record and decode it into `T`.
    pub fn recall_record<T: DeserializeOwned>(&self, key: &str) -> Result<T> {
        let record: serde_json::Value = self.recall(key)?;
        serde_json::from_value(record).map_err(|_| HarnessError::TypeMismatch {
            actor: self.name.clone(),
            key: key.to_string(),
            expected: std::any::type_name::<T>(),
            found: "record",
        })
    }

    /// Snapshot of everything the actor currently remembers.
    pub fn recall_all(&self) -> Memory {
        self.memory.read().clone()
    }

    pub fn knows(&self, key: &str) -> bool {
        self.memory.read().contains_key(key)
    }

    pub fn keys(&self) -> Vec<String> {
        self.memory.read().keys().cloned().collect()
    }

    /// Remove `key`, returning what was stored. Absent keys are not an error.
    #[instrument(skip(self), fields(actor = %self.name))]
    pub fn forget(&self, key: &str) -> Option<Remembered> {
        self.memory.write().remove(key)
    }

    /// Like [`forget`](Self::forget), but refuses to touch a retired actor.
    pub fn try_forget(&self, key: &str) -> Result<Option<Remembered>> {
        if self.is_retired() {
            return Err(HarnessError::ActorRetired {
                name: self.name.clone(),
            });
        }
        Ok(self.forget(key))
    }

    pub fn is_retired(&self) -> bool {
        self.retired.load(Ordering::Acquire)
    }

    pub(crate) fn retire(&self) {
        self.retired.store(true, Ordering::Release);
        self.memory.write().clear();
    }
}
