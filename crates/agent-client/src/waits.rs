//! Waits for agent operations that settle asynchronously
//!
//! Each wait pairs one probe with the probe-error policy its call site needs.
//! Resolution before publication answers 404, so that probe suppresses errors.
//! Every other probe propagates, whatever policy the caller's poller carries.

use crate::client::AgentClient;
use crate::events::{EventFeed, DID_STATUS_UPDATED};
use crate::models::{DidResolutionResult, PresentationStatus};
use bounded_poller::{PollOutcome, Poller, ProbeErrorPolicy};
use harness_core::{HarnessError, Result};
use parking_lot::Mutex;
use std::future::ready;
use tracing::instrument;

pub const DID_PUBLISHED: &str = "PUBLISHED";
pub const PRESENTATION_REQUEST_RECEIVED: &str = "RequestReceived";

/// Wait for the last status event about `did` to report it published.
#[instrument(skip(poller, feed))]
pub async fn wait_did_published_event(
    poller: &Poller,
    feed: &dyn EventFeed,
    did: &str,
) -> Result<PollOutcome> {
    poller
        .wait_until("ERROR: DID was not published to ledger!", || {
            let published = feed
                .latest_events(DID_STATUS_UPDATED)
                .iter()
                .filter_map(|event| event.did_status())
                .filter(|update| update.did == did)
                .last()
                .is_some_and(|update| update.status == DID_PUBLISHED);
            ready(Ok::<_, HarnessError>(published))
        })
        .await
}

/// Wait until `did` resolves with HTTP 200. Transport errors are retried.
#[instrument(skip(poller, client))]
pub async fn wait_did_resolvable(
    poller: &Poller,
    client: &AgentClient,
    did: &str,
) -> Result<PollOutcome> {
    poller
        .with_policy(ProbeErrorPolicy::Suppress)
        .wait_until("ERROR: DID was not published to ledger!", || async move {
            let response = client.resolve_did(did).await?;
            Ok::<_, HarnessError>(response.status == 200)
        })
        .await
}

/// Wait until the resolution metadata of `did` marks it deactivated.
#[instrument(skip(poller, client))]
pub async fn wait_did_deactivated(
    poller: &Poller,
    client: &AgentClient,
    did: &str,
) -> Result<PollOutcome> {
    poller
        .with_policy(ProbeErrorPolicy::Propagate)
        .wait_until(
            "ERROR: DID deactivate operation did not succeed on the ledger!",
            || async move {
                let result: DidResolutionResult = client.resolve_did_document(did).await?;
                Ok::<_, HarnessError>(result.is_deactivated())
            },
        )
        .await
}

/// Wait until presentation `presentation_id` reaches `required`.
///
/// On timeout the error names the state the presentation was last seen in.
#[instrument(skip(poller, client))]
pub async fn wait_presentation_state(
    poller: &Poller,
    client: &AgentClient,
    presentation_id: &str,
    required: &str,
) -> Result<PollOutcome> {
    let last_state: Mutex<Option<String>> = Mutex::new(None);
    let last_state = &last_state;

    let result = poller
        .with_policy(ProbeErrorPolicy::Propagate)
        .wait_until("Presentation did not reach the required state", || async move {
            let presentation = client.presentation(presentation_id).await?;
            let reached = presentation.status == required;
            *last_state.lock() = Some(presentation.status);
            Ok::<_, HarnessError>(reached)
        })
        .await;

    result.map_err(|err| match err {
        HarnessError::PollTimeout {
            elapsed,
            attempts,
            last_error,
            ..
        } => HarnessError::PollTimeout {
            message: format!(
                "Presentation state is {}, required {required}",
                last_state.lock().as_deref().unwrap_or("unknown")
            ),
            elapsed,
            attempts,
            last_error,
        },
        other => other,
    })
}

/// Wait for the proof request with thread id `thid` to arrive and return it.
#[instrument(skip(poller, client))]
pub async fn wait_proof_request(
    poller: &Poller,
    client: &AgentClient,
    thid: &str,
) -> Result<PresentationStatus> {
    let (presentation, _) = poller
        .with_policy(ProbeErrorPolicy::Propagate)
        .poll_for(
            "Presentation with offerId not achieved during the waiting loop",
            || async move {
                let presentations = client.presentations_by_thid(thid).await?;
                Ok::<_, HarnessError>(presentations.into_iter().find(|p| {
                    p.thid == thid && p.status == PRESENTATION_REQUEST_RECEIVED
                }))
            },
        )
        .await?;
    Ok(presentation)
}
