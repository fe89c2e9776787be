use cucumber::{given, then, when, World};
use poll_metrics::PollMetrics;

#[derive(Debug, World)]
#[world(init = Self::new)]
struct MetricsWorld {
    metrics: PollMetrics,
}

impl MetricsWorld {
    fn new() -> Self {
        Self {
            metrics: PollMetrics::new(),
        }
    }
}

#[given("a fresh set of poll metrics")]
async fn given_fresh_metrics(world: &mut MetricsWorld) {
    assert_eq!(world.metrics.snapshot().polls_started, 0);
}

#[when(expr = "{int} polls time out")]
async fn when_polls_time_out(world: &mut MetricsWorld, count: u64) {
    for _ in 0..count {
        world.metrics.poll_started();
        world.metrics.status_change_timeout();
    }
}

#[when(expr = "{int} polls succeed")]
async fn when_polls_succeed(world: &mut MetricsWorld, count: u64) {
    for _ in 0..count {
        world.metrics.poll_started();
        world.metrics.poll_succeeded();
    }
}

#[then(expr = "the status change timeout counter should be {int}")]
async fn then_timeout_counter(world: &mut MetricsWorld, expected: u64) {
    assert_eq!(world.metrics.snapshot().status_change_timeouts, expected);
}

#[then(expr = "{int} polls should have started")]
async fn then_polls_started(world: &mut MetricsWorld, expected: u64) {
    assert_eq!(world.metrics.snapshot().polls_started, expected);
}

#[tokio::main]
async fn main() {
    MetricsWorld::cucumber()
        .fail_on_skipped()
        .run_and_exit("tests/features")
        .await;
}
