//! # Stagehand CLI
//!
//! One-shot versions of the harness waits, for load scripts and manual
//! checks against a running agent.

pub mod args;

pub use args::{Cli, Commands, DidAction, ProofAction};

use agent_client::waits::{
    wait_did_deactivated, wait_did_published_event, wait_did_resolvable, wait_presentation_state,
    wait_proof_request,
};
use agent_client::{AgentClient, WebhookListener};
use bounded_poller::{PollConfig, PollOutcome, Poller};
use harness_core::HarnessConfig;
use poll_metrics::{PollMetrics, PollMetricsSnapshot};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::info;

/// Client, poller and counters for one invocation.
#[derive(Debug)]
pub struct Session {
    config: HarnessConfig,
    client: AgentClient,
    poller: Poller,
    metrics: Arc<PollMetrics>,
}

impl Session {
    pub fn from_cli(cli: &Cli) -> anyhow::Result<Self> {
        let config = cli.harness_config()?;
        let metrics = Arc::new(PollMetrics::new());
        let poller = Poller::new(PollConfig::from(&config)).with_metrics(metrics.clone());
        Ok(Self {
            client: AgentClient::from_config(&config),
            config,
            poller,
            metrics,
        })
    }

    pub fn poller(&self) -> &Poller {
        &self.poller
    }

    pub fn metrics(&self) -> PollMetricsSnapshot {
        self.metrics.snapshot()
    }

    pub async fn execute(&self, command: &Commands) -> anyhow::Result<Value> {
        match command {
            Commands::Health => Ok(self.client.health().await?),
            Commands::Did { action } => self.did(action).await,
            Commands::Proof { action } => self.proof(action).await,
        }
    }

    async fn did(&self, action: &DidAction) -> anyhow::Result<Value> {
        let outcome = match action {
            DidAction::WaitPublished { did, via_webhook: false } => {
                wait_did_resolvable(&self.poller, &self.client, did).await?
            }
            DidAction::WaitPublished { did, via_webhook: true } => {
                let listener = WebhookListener::bind(&self.config.webhook_bind).await?;
                self.client.register_webhook(&listener.url()).await?;
                let outcome = wait_did_published_event(&self.poller, &listener, did).await;
                listener.shutdown().await;
                outcome?
            }
            DidAction::WaitDeactivated { did } => {
                wait_did_deactivated(&self.poller, &self.client, did).await?
            }
        };
        Ok(outcome_json(outcome))
    }

    async fn proof(&self, action: &ProofAction) -> anyhow::Result<Value> {
        match action {
            ProofAction::WaitState {
                presentation_id,
                state,
            } => {
                let outcome =
                    wait_presentation_state(&self.poller, &self.client, presentation_id, state)
                        .await?;
                Ok(outcome_json(outcome))
            }
            ProofAction::WaitRequest { thid } => {
                let presentation = wait_proof_request(&self.poller, &self.client, thid).await?;
                info!(presentation_id = %presentation.presentation_id, "proof request received");
                Ok(serde_json::to_value(presentation)?)
            }
        }
    }
}

fn outcome_json(outcome: PollOutcome) -> Value {
    json!({
        "attempts": outcome.attempts,
        "elapsed_ms": outcome.elapsed.as_millis() as u64,
    })
}
