//! # Poll Metrics
//!
//! Counters the bounded poller bumps so tooling can spot external operations
//! that are slow to converge or flaky under probing.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

/// Live counters, shared between pollers through an `Arc`.
#[derive(Debug, Default)]
pub struct PollMetrics {
    polls_started: AtomicU64,
    polls_succeeded: AtomicU64,
    status_change_timeouts: AtomicU64,
    probe_errors_suppressed: AtomicU64,
    probe_errors_propagated: AtomicU64,
}

/// Point-in-time copy of [`PollMetrics`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollMetricsSnapshot {
    pub polls_started: u64,
    pub polls_succeeded: u64,
    pub status_change_timeouts: u64,
    pub probe_errors_suppressed: u64,
    pub probe_errors_propagated: u64,
}

impl PollMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn poll_started(&self) {
        self.polls_started.fetch_add(1, Ordering::Relaxed);
    }

    pub fn poll_succeeded(&self) {
        self.polls_succeeded.fetch_add(1, Ordering::Relaxed);
    }

    /// A poll ran out of time or attempts before the condition held.
    pub fn status_change_timeout(&self) {
        let total = self.status_change_timeouts.fetch_add(1, Ordering::Relaxed) + 1;
        debug!(total, "status change timeout recorded");
    }

    pub fn probe_error_suppressed(&self) {
        self.probe_errors_suppressed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn probe_error_propagated(&self) {
        self.probe_errors_propagated.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> PollMetricsSnapshot {
        PollMetricsSnapshot {
            polls_started: self.polls_started.load(Ordering::Relaxed),
            polls_succeeded: self.polls_succeeded.load(Ordering::Relaxed),
            status_change_timeouts: self.status_change_timeouts.load(Ordering::Relaxed),
            probe_errors_suppressed: self.probe_errors_suppressed.load(Ordering::Relaxed),
            probe_errors_propagated: self.probe_errors_propagated.load(Ordering::Relaxed),
        }
    }
}

impl PollMetricsSnapshot {
    /// Polls that started but neither succeeded nor timed out, i.e. aborted by
    /// a propagated probe error.
    pub fn aborted(&self) -> u64 {
        self.polls_started
            .saturating_sub(self.polls_succeeded)
            .saturating_sub(self.status_change_timeouts)
    }

    /// The snapshot's serialized fields plus the derived `polls_aborted`.
    pub fn to_json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(SnapshotReport {
            snapshot: self,
            polls_aborted: self.aborted(),
        })
    }
}

#[derive(Serialize)]
struct SnapshotReport<'a> {
    #[serde(flatten)]
    snapshot: &'a PollMetricsSnapshot,
    polls_aborted: u64,
}
