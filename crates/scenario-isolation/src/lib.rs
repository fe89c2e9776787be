pub use harness_core;

mod isolation;

pub use isolation::{IsolationReport, Roster, ScenarioIsolation, ScrubPolicy};

// Re-export core types for convenience
pub use harness_core::{Actor, HarnessError, PreservedKeySet, Result, Stage};
