//! BDD tests for the Stagehand CLI

use agent_client::models::CreateManagedDidRequest;
use agent_client::AgentClient;
use bounded_poller::{PollConfig, ProbeErrorPolicy};
use clap::Parser;
use cucumber::{given, then, when, World};
use harness_cli::{Cli, Session};
use harness_core::HarnessConfig;
use mock_agent::{MockAgent, MockAgentConfig};
use poll_metrics::PollMetricsSnapshot;
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;

#[derive(Debug, World)]
#[world(init = Self::new)]
struct CliWorld {
    agent: Option<MockAgent>,
    did: Option<String>,
    parsed: Option<Result<Cli, String>>,
    output: Option<Result<Value, String>>,
    metrics: PollMetricsSnapshot,
    env: HashMap<String, String>,
}

impl CliWorld {
    fn new() -> Self {
        Self {
            agent: None,
            did: None,
            parsed: None,
            output: None,
            metrics: PollMetricsSnapshot::default(),
            env: HashMap::new(),
        }
    }

    fn agent_url(&self) -> String {
        self.agent.as_ref().expect("a mock agent should be running").url()
    }

    fn client(&self) -> AgentClient {
        AgentClient::new(self.agent_url())
    }

    fn command_line(&self, command: &str) -> Vec<String> {
        let mut args = vec!["stagehand".to_string()];
        let command = match &self.did {
            Some(did) => command.replace("<did>", did),
            None => command.to_string(),
        };
        args.extend(command.split_whitespace().map(str::to_string));
        args
    }

    fn harness_config(&self) -> harness_core::Result<HarnessConfig> {
        self.cli().harness_config_with(|name| self.env.get(name).cloned())
    }

    fn poll_config(&self) -> PollConfig {
        PollConfig::from(&self.harness_config().unwrap())
    }

    fn cli(&self) -> &Cli {
        self.parsed
            .as_ref()
            .expect("a command line should have been parsed")
            .as_ref()
            .expect("the command line should parse")
    }
}

#[given("a running mock agent")]
async fn given_running_agent(world: &mut CliWorld) {
    let agent = MockAgent::spawn(&MockAgentConfig {
        addr: "127.0.0.1:0".to_string(),
        settle: Duration::from_millis(100),
    })
    .await
    .expect("mock agent should start");
    world.agent = Some(agent);
}

#[given("an unpublished DID on the agent")]
async fn given_unpublished_did(world: &mut CliWorld) {
    let client = world.client();
    let created = client
        .create_did(&CreateManagedDidRequest::standard())
        .await
        .unwrap();
    let managed = client.managed_did(&created.long_form_did).await.unwrap();
    world.did = Some(managed.did);
}

#[given("the DID publication was requested")]
async fn given_publication_requested(world: &mut CliWorld) {
    let did = world.did.clone().expect("a DID should exist");
    world.client().publish_did(&did).await.unwrap();
}

#[given(expr = "the environment sets {word} to {string}")]
async fn given_environment(world: &mut CliWorld, name: String, value: String) {
    world.env.insert(name, value);
}

#[when(expr = "I parse {string}")]
async fn when_parse(world: &mut CliWorld, command: String) {
    let args = world.command_line(&command);
    world.parsed = Some(Cli::try_parse_from(args).map_err(|e| e.to_string()));
}

#[when(expr = "I run {string}")]
async fn when_run(world: &mut CliWorld, command: String) {
    let mut args = world.command_line(&command);
    args.splice(
        1..1,
        [
            "--agent-url".to_string(),
            world.agent_url(),
            "--interval-ms".to_string(),
            "50".to_string(),
            "--timeout-secs".to_string(),
            "5".to_string(),
        ],
    );

    let cli = Cli::try_parse_from(args).expect("command line should parse");
    let session = Session::from_cli(&cli).expect("session should build");
    world.output = Some(session.execute(&cli.command).await.map_err(|e| e.to_string()));
    world.metrics = session.metrics();
}

#[then(expr = "the poll interval is {int} ms and the timeout is {int} s")]
async fn then_poll_config(world: &mut CliWorld, interval_ms: u64, timeout_secs: u64) {
    let config = world.poll_config();
    assert_eq!(config.interval, Duration::from_millis(interval_ms));
    assert_eq!(config.timeout, Duration::from_secs(timeout_secs));
}

#[then(expr = "at most {int} probes are made")]
async fn then_max_attempts(world: &mut CliWorld, attempts: u32) {
    assert_eq!(world.poll_config().max_attempts, Some(attempts));
}

#[then("probe errors abort the wait by default")]
async fn then_probe_errors_propagate(world: &mut CliWorld) {
    assert_eq!(world.poll_config().probe_errors, ProbeErrorPolicy::Propagate);
}

#[then(expr = "the configuration is rejected with {string}")]
async fn then_config_rejected(world: &mut CliWorld, message: String) {
    let err = world.harness_config().unwrap_err();
    assert!(err.to_string().contains(&message), "unexpected error: {err}");
}

#[then("the command line is rejected")]
async fn then_command_line_rejected(world: &mut CliWorld) {
    assert!(matches!(world.parsed, Some(Err(_))));
}

#[then("the command succeeds")]
async fn then_command_succeeds(world: &mut CliWorld) {
    match &world.output {
        Some(Ok(_)) => {}
        other => panic!("expected success, got {other:?}"),
    }
}

#[then(expr = "the output has field {word}")]
async fn then_output_field(world: &mut CliWorld, field: String) {
    let output = world.output.as_ref().unwrap().as_ref().unwrap();
    assert!(output.get(&field).is_some(), "missing {field} in {output}");
}

#[then(expr = "the command fails with {string}")]
async fn then_command_fails(world: &mut CliWorld, message: String) {
    let err = world
        .output
        .as_ref()
        .unwrap()
        .as_ref()
        .expect_err("command should fail");
    assert!(err.contains(&message), "unexpected error: {err}");
}

#[then(expr = "{int} poll succeeded and {int} timed out")]
async fn then_metrics(world: &mut CliWorld, succeeded: u64, timed_out: u64) {
    assert_eq!(world.metrics.polls_succeeded, succeeded);
    assert_eq!(world.metrics.status_change_timeouts, timed_out);
}

#[tokio::main]
async fn main() {
    CliWorld::cucumber()
        .fail_on_skipped()
        .run_and_exit("tests/features")
        .await;
}
