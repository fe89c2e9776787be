//! # Stagehand Core
//!
//! Core types for driving a cloud agent from behaviour tests.
//!
//! ## Contents
//! - Actors with per-run key/value memory, looked up through a run-scoped [`Stage`]
//! - The allow-list of configuration keys that survive scenario isolation
//! - Harness configuration and the shared error taxonomy

pub mod actor;
pub mod config;
pub mod error;
pub mod keys;
pub mod memory;
pub mod stage;

pub use actor::{Actor, Memory};
pub use config::HarnessConfig;
pub use error::{BoxError, HarnessError, Result};
pub use keys::{connection_key, PreservedKeySet, DEFAULT_ROSTER};
pub use memory::{FromRemembered, Remembered};
pub use stage::Stage;

/// Current Stagehand version for compatibility checks
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build information for logs and the CLI banner
pub const BUILD_INFO: &str = concat!(
    "Stagehand ",
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("CARGO_PKG_NAME"),
    ")"
);

/// Agent endpoints the harness talks to
pub mod endpoints {
    pub const HEALTH: &str = "/_system/health";
    pub const DID_REGISTRAR_DIDS: &str = "/did-registrar/dids";
    pub const DIDS: &str = "/dids";
    pub const CONNECTIONS: &str = "/connections";
    pub const EVENT_WEBHOOKS: &str = "/events/webhooks";
    pub const VDR_ENTRIES: &str = "/vdr/entries";
    pub const PRESENTATIONS: &str = "/present-proof/presentations";
}
