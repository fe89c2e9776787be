//! Agent events delivered by webhook
//!
//! The agent pushes events to a registered webhook url; the harness never
//! waits on the push itself. Events are buffered in arrival order and the
//! poller re-reads the buffer on every probe.

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use harness_core::{HarnessError, Result};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

pub const DID_STATUS_UPDATED: &str = "DIDStatusUpdated";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentEvent {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub ts: Option<String>,
    pub data: Value,
}

/// Payload of a `DIDStatusUpdated` event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DidStatusUpdate {
    pub did: String,
    pub status: String,
}

impl AgentEvent {
    pub fn did_status(&self) -> Option<DidStatusUpdate> {
        if self.kind != DID_STATUS_UPDATED {
            return None;
        }
        serde_json::from_value(self.data.clone()).ok()
    }
}

/// A polled source of agent events.
pub trait EventFeed: Send + Sync {
    /// Events of `kind` received so far, oldest first.
    fn latest_events(&self, kind: &str) -> Vec<AgentEvent>;
}

/// In-memory event store shared between the webhook endpoint and readers.
#[derive(Debug, Clone, Default)]
pub struct EventBuffer {
    events: Arc<RwLock<Vec<AgentEvent>>>,
}

impl EventBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, event: AgentEvent) {
        self.events.write().push(event);
    }

    pub fn len(&self) -> usize {
        self.events.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.read().is_empty()
    }

    pub fn clear(&self) {
        self.events.write().clear();
    }
}

impl EventFeed for EventBuffer {
    fn latest_events(&self, kind: &str) -> Vec<AgentEvent> {
        self.events
            .read()
            .iter()
            .filter(|event| event.kind == kind)
            .cloned()
            .collect()
    }
}

/// HTTP endpoint receiving the agent's webhook calls.
pub struct WebhookListener {
    buffer: EventBuffer,
    local_addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

impl std::fmt::Debug for WebhookListener {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebhookListener")
            .field("local_addr", &self.local_addr)
            .field("events", &self.buffer.len())
            .finish()
    }
}

impl WebhookListener {
    /// Start listening on `addr` (use port 0 for an ephemeral port).
    pub async fn bind(addr: &str) -> Result<Self> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| HarnessError::Http {
                reason: format!("cannot bind webhook listener on {addr}: {e}"),
            })?;
        let local_addr = listener.local_addr().map_err(|e| HarnessError::Http {
            reason: e.to_string(),
        })?;

        let buffer = EventBuffer::new();
        let app = Router::new()
            .route("/", post(receive_event))
            .with_state(buffer.clone());

        let (tx, rx) = oneshot::channel();
        let task = tokio::spawn(async move {
            let server = axum::serve(listener, app).with_graceful_shutdown(async move {
                rx.await.ok();
            });
            if let Err(e) = server.await {
                warn!(error = %e, "webhook listener stopped");
            }
        });

        info!("Webhook listener on {}", local_addr);
        Ok(Self {
            buffer,
            local_addr,
            shutdown: Some(tx),
            task,
        })
    }

    /// Url to register with the agent.
    pub fn url(&self) -> String {
        format!("http://{}/", self.local_addr)
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn feed(&self) -> EventBuffer {
        self.buffer.clone()
    }

    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        let _ = (&mut self.task).await;
    }
}

impl EventFeed for WebhookListener {
    fn latest_events(&self, kind: &str) -> Vec<AgentEvent> {
        self.buffer.latest_events(kind)
    }
}

async fn receive_event(
    State(buffer): State<EventBuffer>,
    Json(event): Json<AgentEvent>,
) -> StatusCode {
    debug!(kind = %event.kind, id = %event.id, "event received");
    buffer.push(event);
    StatusCode::OK
}
