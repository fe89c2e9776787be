pub use harness_core;
pub use poll_metrics;

mod clock;
mod poller;

pub use clock::{Clock, ManualClock, TokioClock};
pub use poller::{PollConfig, PollOutcome, Poller, ProbeErrorPolicy};

// Re-export core types for convenience
pub use harness_core::{BoxError, HarnessError, Result};
