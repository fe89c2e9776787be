//! Error types for the Stagehand harness

use std::time::Duration;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, HarnessError>;

/// Boxed source error carried by probe failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Error, Debug)]
pub enum HarnessError {
    #[error("Actor '{actor}' has no memory of key '{key}'")]
    KeyNotFound { actor: String, key: String },

    #[error("Actor '{actor}' remembers '{key}' as {found}, expected {expected}")]
    TypeMismatch {
        actor: String,
        key: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("Actor not found: {name}")]
    ActorNotFound { name: String },

    #[error("Actor '{name}' was retired when its stage was disposed")]
    ActorRetired { name: String },

    #[error(
        "{message} (gave up after {elapsed:?} and {attempts} probes{})",
        last_error_suffix(.last_error)
    )]
    PollTimeout {
        message: String,
        elapsed: Duration,
        attempts: u32,
        last_error: Option<String>,
    },

    #[error("{message}: probe failed: {source}")]
    ProbeFailed {
        message: String,
        #[source]
        source: BoxError,
    },

    #[error("Isolation cleanup failed for actor '{actor}': {reason}")]
    IsolationCleanup { actor: String, reason: String },

    #[error("HTTP request failed: {reason}")]
    Http { reason: String },

    #[error("Unexpected status {status} for {method} {path}: expected {expected}")]
    UnexpectedStatus {
        method: String,
        path: String,
        status: u16,
        expected: u16,
    },

    #[error("Decode error: {source}")]
    Decode {
        #[from]
        source: serde_json::Error,
    },

    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },
}

fn last_error_suffix(last_error: &Option<String>) -> String {
    last_error
        .as_ref()
        .map(|e| format!(", last probe error: {e}"))
        .unwrap_or_default()
}

impl HarnessError {
    /// Whether the error comes from housekeeping rather than from the scenario
    /// under test. Housekeeping errors are logged and never fail a scenario.
    pub fn is_housekeeping(&self) -> bool {
        matches!(
            self,
            HarnessError::ActorNotFound { .. }
                | HarnessError::ActorRetired { .. }
                | HarnessError::IsolationCleanup { .. }
        )
    }
}
