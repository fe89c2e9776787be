//! Bounded poller
//!
//! Repeatedly evaluates a probe until it reports the awaited condition or the
//! deadline passes. The interval is constant (no backoff) and every probe is
//! preceded by one interval of sleep, so a condition that holds on the N-th
//! probe is observed after N intervals.

use crate::clock::{Clock, TokioClock};
use harness_core::{BoxError, HarnessConfig, HarnessError, Result};
use poll_metrics::PollMetrics;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// What to do when a single probe fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProbeErrorPolicy {
    /// Log the error and probe again at the next interval.
    Suppress,
    /// Abort the poll with the probe's error.
    #[default]
    Propagate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollConfig {
    pub interval: Duration,
    pub timeout: Duration,
    /// Optional cap on probes, checked alongside the deadline.
    pub max_attempts: Option<u32>,
    pub probe_errors: ProbeErrorPolicy,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self::from(&HarnessConfig::default())
    }
}

impl From<&HarnessConfig> for PollConfig {
    fn from(config: &HarnessConfig) -> Self {
        Self {
            interval: Duration::from_millis(config.poll_interval_ms),
            timeout: Duration::from_secs(config.poll_timeout_secs),
            max_attempts: config.poll_max_attempts,
            probe_errors: ProbeErrorPolicy::default(),
        }
    }
}

/// How a successful poll went.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollOutcome {
    pub attempts: u32,
    pub elapsed: Duration,
}

#[derive(Debug, Clone)]
pub struct Poller {
    config: PollConfig,
    clock: Arc<dyn Clock>,
    metrics: Arc<PollMetrics>,
}

impl Poller {
    pub fn new(config: PollConfig) -> Self {
        Self {
            config,
            clock: Arc::new(TokioClock),
            metrics: Arc::new(PollMetrics::new()),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_metrics(mut self, metrics: Arc<PollMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    /// A copy of this poller using `policy` for probe errors.
    pub fn with_policy(&self, policy: ProbeErrorPolicy) -> Self {
        let mut poller = self.clone();
        poller.config.probe_errors = policy;
        poller
    }

    /// A copy of this poller with a different deadline.
    pub fn with_timeout(&self, timeout: Duration) -> Self {
        let mut poller = self.clone();
        poller.config.timeout = timeout;
        poller
    }

    pub fn config(&self) -> &PollConfig {
        &self.config
    }

    pub fn metrics(&self) -> &Arc<PollMetrics> {
        &self.metrics
    }

    /// Wait until `probe` returns `Ok(true)`.
    ///
    /// `message` describes the awaited condition and is carried by the
    /// timeout error.
    pub async fn wait_until<F, Fut, E>(&self, message: &str, mut probe: F) -> Result<PollOutcome>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = std::result::Result<bool, E>>,
        E: Into<BoxError>,
    {
        self.poll_for(message, || {
            let fut = probe();
            async move { fut.await.map(|done| done.then_some(())) }
        })
        .await
        .map(|((), outcome)| outcome)
    }

    /// Wait until `probe` yields a value and return it.
    #[instrument(
        skip(self, probe),
        fields(interval = ?self.config.interval, timeout = ?self.config.timeout)
    )]
    pub async fn poll_for<T, F, Fut, E>(
        &self,
        message: &str,
        mut probe: F,
    ) -> Result<(T, PollOutcome)>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = std::result::Result<Option<T>, E>>,
        E: Into<BoxError>,
    {
        let start = self.clock.now();
        let mut attempts: u32 = 0;
        let mut last_error: Option<String> = None;
        self.metrics.poll_started();

        loop {
            self.clock.sleep(self.config.interval).await;
            attempts += 1;

            match probe().await {
                Ok(Some(value)) => {
                    let elapsed = self.clock.now().saturating_duration_since(start);
                    self.metrics.poll_succeeded();
                    debug!(attempts, ?elapsed, "condition met");
                    return Ok((value, PollOutcome { attempts, elapsed }));
                }
                Ok(None) => {}
                Err(err) => {
                    let err: BoxError = err.into();
                    match self.config.probe_errors {
                        ProbeErrorPolicy::Propagate => {
                            self.metrics.probe_error_propagated();
                            return Err(HarnessError::ProbeFailed {
                                message: message.to_string(),
                                source: err,
                            });
                        }
                        ProbeErrorPolicy::Suppress => {
                            self.metrics.probe_error_suppressed();
                            warn!(attempt = attempts, error = %err, "probe failed, retrying");
                            last_error = Some(err.to_string());
                        }
                    }
                }
            }

            let elapsed = self.clock.now().saturating_duration_since(start);
            let out_of_attempts = self
                .config
                .max_attempts
                .is_some_and(|max| attempts >= max);
            if elapsed >= self.config.timeout || out_of_attempts {
                self.metrics.status_change_timeout();
                warn!(attempts, ?elapsed, "{message}");
                return Err(HarnessError::PollTimeout {
                    message: message.to_string(),
                    elapsed,
                    attempts,
                    last_error,
                });
            }
        }
    }
}

impl Default for Poller {
    fn default() -> Self {
        Self::new(PollConfig::default())
    }
}
