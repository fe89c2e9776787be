//! # Agent Client
//!
//! The narrow contract the harness needs from the cloud agent: a
//! request/response primitive with JSON decoding, a polled feed of webhook
//! events, and waits that turn both into "until converged or timed out".

pub use harness_core;

mod client;
pub mod events;
pub mod models;
pub mod waits;

pub use client::{decode, AgentClient, ApiResponse, RequestBody};
pub use events::{AgentEvent, EventBuffer, EventFeed, WebhookListener};

// Re-export core types for convenience
pub use harness_core::{HarnessError, Result};
