//! Command-line surface

use clap::{Args, Parser, Subcommand};
use harness_core::{HarnessConfig, Result};

#[derive(Debug, Parser)]
#[command(name = "stagehand")]
#[command(about = "Stagehand CLI - wait for a cloud agent to converge")]
#[command(version = harness_core::VERSION)]
pub struct Cli {
    #[command(flatten)]
    pub agent: AgentArgs,

    #[command(flatten)]
    pub poll: PollArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Flags override the `AGENT_*` and `WEBHOOK_BIND` variables read by
/// [`HarnessConfig::from_env`].
#[derive(Debug, Args)]
pub struct AgentArgs {
    /// Base url of the cloud agent
    #[arg(long)]
    pub agent_url: Option<String>,

    #[arg(long)]
    pub api_key: Option<String>,

    #[arg(long)]
    pub api_key_header: Option<String>,

    /// Local address the webhook listener binds to
    #[arg(long)]
    pub webhook_bind: Option<String>,
}

/// Flags override the `POLL_*` variables.
#[derive(Debug, Args)]
pub struct PollArgs {
    #[arg(long)]
    pub interval_ms: Option<u64>,

    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Give up after this many probes even if time remains
    #[arg(long)]
    pub max_attempts: Option<u32>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Check that the agent answers its health endpoint
    Health,
    /// DID lifecycle waits
    Did {
        #[command(subcommand)]
        action: DidAction,
    },
    /// Present-proof waits
    Proof {
        #[command(subcommand)]
        action: ProofAction,
    },
}

#[derive(Debug, Subcommand)]
pub enum DidAction {
    /// Wait until a DID is published to the ledger
    WaitPublished {
        did: String,
        /// Wait for the agent's status event instead of polling resolution
        #[arg(long)]
        via_webhook: bool,
    },
    /// Wait until a DID is reported deactivated
    WaitDeactivated { did: String },
}

#[derive(Debug, Subcommand)]
pub enum ProofAction {
    /// Wait until a presentation reaches a state
    WaitState {
        presentation_id: String,
        #[arg(long, default_value = "RequestReceived")]
        state: String,
    },
    /// Wait for the proof request on thread `thid` and print it
    WaitRequest { thid: String },
}

impl Cli {
    /// Environment configuration with the explicit flags applied on top.
    pub fn harness_config(&self) -> Result<HarnessConfig> {
        self.harness_config_with(|name| std::env::var(name).ok())
    }

    /// Same as [`harness_config`](Self::harness_config) with an injectable
    /// variable source.
    pub fn harness_config_with<F>(&self, lookup: F) -> Result<HarnessConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = HarnessConfig::from_lookup(lookup)?;

        if let Some(url) = &self.agent.agent_url {
            config.agent_url = url.clone();
        }
        if let Some(key) = &self.agent.api_key {
            config.api_key = Some(key.clone()).filter(|key| !key.is_empty());
        }
        if let Some(header) = &self.agent.api_key_header {
            config.api_key_header = header.clone();
        }
        if let Some(bind) = &self.agent.webhook_bind {
            config.webhook_bind = bind.clone();
        }
        if let Some(interval_ms) = self.poll.interval_ms {
            config.poll_interval_ms = interval_ms;
        }
        if let Some(timeout_secs) = self.poll.timeout_secs {
            config.poll_timeout_secs = timeout_secs;
        }
        if self.poll.max_attempts.is_some() {
            config.poll_max_attempts = self.poll.max_attempts;
        }

        config.validate()?;
        Ok(config)
    }
}
