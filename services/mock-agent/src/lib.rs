//! # Mock Agent
//!
//! A cloud agent double for running the behaviour suites without a ledger.
//!
//! Ledger-bound operations (publication, deactivation, proof request
//! delivery) are accepted immediately and settle after a configurable delay,
//! so callers have to poll for the outcome the same way they would against
//! a real agent. Status changes are pushed to the registered webhook.

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use bytes::Bytes;
use dashmap::DashMap;
use harness_core::config::parse_var;
use harness_core::{endpoints, VERSION};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

pub const DEFAULT_ADDR: &str = "127.0.0.1:8085";
pub const DEFAULT_SETTLE_MS: u64 = 500;

pub const DID_STATUS_UPDATED: &str = "DIDStatusUpdated";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockAgentConfig {
    pub addr: String,
    /// Delay before an accepted ledger operation takes effect.
    pub settle: Duration,
}

impl Default for MockAgentConfig {
    fn default() -> Self {
        Self {
            addr: DEFAULT_ADDR.to_string(),
            settle: Duration::from_millis(DEFAULT_SETTLE_MS),
        }
    }
}

impl MockAgentConfig {
    /// Defaults overridden by `MOCK_AGENT_ADDR` and `MOCK_AGENT_SETTLE_MS`.
    pub fn from_env() -> harness_core::Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> harness_core::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(addr) = lookup("MOCK_AGENT_ADDR") {
            config.addr = addr;
        }
        if let Some(raw) = lookup("MOCK_AGENT_SETTLE_MS") {
            config.settle = Duration::from_millis(parse_var("MOCK_AGENT_SETTLE_MS", &raw)?);
        }
        Ok(config)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DidStatus {
    Created,
    PublicationPending,
    Published,
}

#[derive(Debug, Clone)]
struct DidRecord {
    long_form_did: String,
    status: DidStatus,
    deactivated: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct PresentationRecord {
    presentation_id: String,
    thid: String,
    status: String,
    connection_id: String,
}

/// Everything the agent knows, keyed the way the REST surface looks it up.
#[derive(Debug, Default)]
pub struct AgentState {
    settle: Duration,
    /// Keyed by short-form DID.
    dids: DashMap<String, DidRecord>,
    /// Long-form DID to short-form DID.
    long_forms: DashMap<String, String>,
    vdr: DashMap<String, Bytes>,
    connections: DashMap<String, Value>,
    presentations: DashMap<String, PresentationRecord>,
    webhook: RwLock<Option<String>>,
    http: reqwest::Client,
}

impl AgentState {
    pub fn new(settle: Duration) -> Self {
        Self {
            settle,
            ..Self::default()
        }
    }

    pub fn did_status(&self, did: &str) -> Option<DidStatus> {
        let short = self.short_form(did)?;
        self.dids.get(&short).map(|record| record.status)
    }

    pub fn webhook_url(&self) -> Option<String> {
        self.webhook.read().clone()
    }

    fn short_form(&self, did: &str) -> Option<String> {
        if self.dids.contains_key(did) {
            return Some(did.to_string());
        }
        self.long_forms.get(did).map(|short| short.value().clone())
    }

    async fn emit(&self, kind: &str, data: Value) {
        let Some(url) = self.webhook_url() else {
            debug!(kind, "no webhook registered, event dropped");
            return;
        };
        let event = json!({
            "id": Uuid::new_v4().to_string(),
            "type": kind,
            "data": data,
        });
        if let Err(e) = self.http.post(&url).json(&event).send().await {
            warn!(error = %e, url = %url, kind, "webhook delivery failed");
        }
    }

    async fn emit_did_status(&self, did: &str, status: &str) {
        self.emit(DID_STATUS_UPDATED, json!({ "did": did, "status": status }))
            .await;
    }
}

pub fn router(state: Arc<AgentState>) -> Router {
    Router::new()
        .route(endpoints::HEALTH, get(health_check))
        .route(endpoints::DID_REGISTRAR_DIDS, post(create_did))
        .route("/did-registrar/dids/{did}", get(managed_did))
        .route("/did-registrar/dids/{did}/publications", post(publish_did))
        .route("/did-registrar/dids/{did}/deactivations", post(deactivate_did))
        .route("/dids/{did}", get(resolve_did))
        .route(endpoints::EVENT_WEBHOOKS, post(register_webhook))
        .route(endpoints::CONNECTIONS, post(create_connection))
        .route(
            endpoints::VDR_ENTRIES,
            get(resolve_vdr_entry)
                .post(create_vdr_entry)
                .put(update_vdr_entry)
                .delete(delete_vdr_entry),
        )
        .route(
            endpoints::PRESENTATIONS,
            get(list_presentations).post(request_presentation),
        )
        .route("/present-proof/presentations/{id}", get(get_presentation))
        .with_state(state)
}

/// A running agent bound to a local port.
pub struct MockAgent {
    state: Arc<AgentState>,
    local_addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

impl std::fmt::Debug for MockAgent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockAgent")
            .field("local_addr", &self.local_addr)
            .finish()
    }
}

impl MockAgent {
    pub async fn spawn(config: &MockAgentConfig) -> anyhow::Result<Self> {
        let listener = TcpListener::bind(&config.addr).await?;
        let local_addr = listener.local_addr()?;
        let state = Arc::new(AgentState::new(config.settle));
        let app = router(state.clone());

        let (tx, rx) = oneshot::channel();
        let task = tokio::spawn(async move {
            let server = axum::serve(listener, app).with_graceful_shutdown(async move {
                rx.await.ok();
            });
            if let Err(e) = server.await {
                warn!(error = %e, "mock agent stopped");
            }
        });

        info!("Mock agent listening on {}", local_addr);
        Ok(Self {
            state,
            local_addr,
            shutdown: Some(tx),
            task,
        })
    }

    pub fn url(&self) -> String {
        format!("http://{}", self.local_addr)
    }

    pub fn state(&self) -> &Arc<AgentState> {
        &self.state
    }

    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        let _ = (&mut self.task).await;
    }
}

/// Bind `config.addr` and serve until the process ends.
pub async fn serve(config: &MockAgentConfig) -> anyhow::Result<()> {
    let listener = TcpListener::bind(&config.addr).await?;
    info!(
        settle_ms = config.settle.as_millis() as u64,
        "Mock agent listening on {}",
        listener.local_addr()?
    );
    let app = router(Arc::new(AgentState::new(config.settle)));
    axum::serve(listener, app).await?;
    Ok(())
}

#[instrument]
async fn health_check() -> Json<Value> {
    Json(json!({ "version": VERSION }))
}

#[instrument(skip_all)]
async fn create_did(
    State(state): State<Arc<AgentState>>,
    Json(_template): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let suffix = format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple());
    let did = format!("did:prism:{suffix}");
    let long_form_did = format!("{did}:{}", Uuid::new_v4().simple());

    state.long_forms.insert(long_form_did.clone(), did.clone());
    state.dids.insert(
        did.clone(),
        DidRecord {
            long_form_did: long_form_did.clone(),
            status: DidStatus::Created,
            deactivated: false,
        },
    );
    debug!(%did, "managed DID created");

    (
        StatusCode::CREATED,
        Json(json!({ "longFormDid": long_form_did })),
    )
}

#[instrument(skip(state))]
async fn managed_did(
    State(state): State<Arc<AgentState>>,
    Path(did): Path<String>,
) -> Result<Json<Value>, StatusCode> {
    let short = state.short_form(&did).ok_or(StatusCode::NOT_FOUND)?;
    let record = state.dids.get(&short).ok_or(StatusCode::NOT_FOUND)?;
    Ok(Json(json!({
        "did": short,
        "longFormDid": record.long_form_did,
        "status": record.status,
    })))
}

#[instrument(skip(state))]
async fn publish_did(
    State(state): State<Arc<AgentState>>,
    Path(did): Path<String>,
) -> Result<(StatusCode, Json<Value>), StatusCode> {
    let short = state.short_form(&did).ok_or(StatusCode::NOT_FOUND)?;
    {
        let mut record = state.dids.get_mut(&short).ok_or(StatusCode::NOT_FOUND)?;
        if record.status == DidStatus::Created {
            record.status = DidStatus::PublicationPending;
        }
    }

    let task_state = state.clone();
    let did_ref = short.clone();
    tokio::spawn(async move {
        tokio::time::sleep(task_state.settle).await;
        if let Some(mut record) = task_state.dids.get_mut(&did_ref) {
            record.status = DidStatus::Published;
        }
        info!(did = %did_ref, "DID published");
        task_state.emit_did_status(&did_ref, "PUBLISHED").await;
    });

    Ok((StatusCode::ACCEPTED, Json(scheduled_operation(&short))))
}

#[instrument(skip(state))]
async fn deactivate_did(
    State(state): State<Arc<AgentState>>,
    Path(did): Path<String>,
) -> Result<(StatusCode, Json<Value>), StatusCode> {
    let short = state.short_form(&did).ok_or(StatusCode::NOT_FOUND)?;
    {
        let record = state.dids.get(&short).ok_or(StatusCode::NOT_FOUND)?;
        if record.status != DidStatus::Published || record.deactivated {
            return Err(StatusCode::UNPROCESSABLE_ENTITY);
        }
    }

    let task_state = state.clone();
    let did_ref = short.clone();
    tokio::spawn(async move {
        tokio::time::sleep(task_state.settle).await;
        if let Some(mut record) = task_state.dids.get_mut(&did_ref) {
            record.deactivated = true;
        }
        info!(did = %did_ref, "DID deactivated");
        task_state.emit_did_status(&did_ref, "DEACTIVATED").await;
    });

    Ok((StatusCode::ACCEPTED, Json(scheduled_operation(&short))))
}

fn scheduled_operation(did: &str) -> Value {
    json!({
        "scheduledOperation": {
            "id": Uuid::new_v4().to_string(),
            "didRef": did,
        }
    })
}

/// Resolvable only once the DID has reached the ledger.
#[instrument(skip(state))]
async fn resolve_did(
    State(state): State<Arc<AgentState>>,
    Path(did): Path<String>,
) -> Result<Json<Value>, StatusCode> {
    let short = state.short_form(&did).ok_or(StatusCode::NOT_FOUND)?;
    let record = state.dids.get(&short).ok_or(StatusCode::NOT_FOUND)?;
    if record.status != DidStatus::Published {
        return Err(StatusCode::NOT_FOUND);
    }

    let auth = format!("{short}#auth-1");
    Ok(Json(json!({
        "didDocument": {
            "id": short,
            "authentication": [auth],
            "verificationMethod": [{
                "id": auth,
                "type": "JsonWebKey2020",
                "controller": short,
            }],
            "service": [{
                "id": format!("{short}#https://foo.bar.com"),
                "type": "LinkedDomains",
                "serviceEndpoint": "https://foo.bar.com/",
            }],
        },
        "didDocumentMetadata": {
            "deactivated": record.deactivated,
            "canonicalId": short,
        },
    })))
}

#[derive(Debug, Deserialize)]
struct WebhookBody {
    url: String,
}

#[instrument(skip(state))]
async fn register_webhook(
    State(state): State<Arc<AgentState>>,
    Json(body): Json<WebhookBody>,
) -> Json<Value> {
    *state.webhook.write() = Some(body.url.clone());
    info!(url = %body.url, "webhook registered");
    Json(json!({
        "id": Uuid::new_v4().to_string(),
        "url": body.url,
    }))
}

#[derive(Debug, Deserialize)]
struct ConnectionBody {
    label: String,
}

#[instrument(skip(state))]
async fn create_connection(
    State(state): State<Arc<AgentState>>,
    Json(body): Json<ConnectionBody>,
) -> (StatusCode, Json<Value>) {
    let connection_id = Uuid::new_v4().to_string();
    let connection = json!({
        "connectionId": connection_id,
        "label": body.label,
        "state": "ConnectionResponseSent",
    });
    state.connections.insert(connection_id, connection.clone());
    (StatusCode::CREATED, Json(connection))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VdrQuery {
    drid: Option<String>,
    url: Option<String>,
    #[allow(dead_code)]
    did_key_id: Option<String>,
}

#[instrument(skip(state, data))]
async fn create_vdr_entry(
    State(state): State<Arc<AgentState>>,
    Query(query): Query<VdrQuery>,
    data: Bytes,
) -> Result<(StatusCode, Json<Value>), StatusCode> {
    let driver = query.drid.ok_or(StatusCode::BAD_REQUEST)?;
    let url = format!("vdr://{driver}/{}", Uuid::new_v4().simple());
    state.vdr.insert(url.clone(), data);
    Ok((StatusCode::CREATED, Json(json!({ "url": url }))))
}

#[instrument(skip(state, data))]
async fn update_vdr_entry(
    State(state): State<Arc<AgentState>>,
    Query(query): Query<VdrQuery>,
    data: Bytes,
) -> Result<Json<Value>, StatusCode> {
    let url = query.url.ok_or(StatusCode::BAD_REQUEST)?;
    let mut entry = state.vdr.get_mut(&url).ok_or(StatusCode::NOT_FOUND)?;
    *entry = data;
    Ok(Json(json!({})))
}

#[instrument(skip(state))]
async fn delete_vdr_entry(
    State(state): State<Arc<AgentState>>,
    Query(query): Query<VdrQuery>,
) -> Result<Json<Value>, StatusCode> {
    let url = query.url.ok_or(StatusCode::BAD_REQUEST)?;
    state.vdr.remove(&url).ok_or(StatusCode::NOT_FOUND)?;
    Ok(Json(json!({})))
}

#[instrument(skip(state))]
async fn resolve_vdr_entry(
    State(state): State<Arc<AgentState>>,
    Query(query): Query<VdrQuery>,
) -> Response {
    let Some(url) = query.url else {
        return StatusCode::BAD_REQUEST.into_response();
    };
    match state.vdr.get(&url) {
        Some(entry) => (
            [(header::CONTENT_TYPE, "application/octet-stream")],
            entry.value().clone(),
        )
            .into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProofRequestBody {
    connection_id: String,
}

/// Record the verifier side now; the holder side appears once delivered.
#[instrument(skip(state))]
async fn request_presentation(
    State(state): State<Arc<AgentState>>,
    Json(body): Json<ProofRequestBody>,
) -> Result<(StatusCode, Json<PresentationRecord>), StatusCode> {
    if !state.connections.contains_key(&body.connection_id) {
        return Err(StatusCode::BAD_REQUEST);
    }

    let record = PresentationRecord {
        presentation_id: Uuid::new_v4().to_string(),
        thid: Uuid::new_v4().to_string(),
        status: "RequestPending".to_string(),
        connection_id: body.connection_id,
    };
    state
        .presentations
        .insert(record.presentation_id.clone(), record.clone());

    let task_state = state.clone();
    let sent = record.clone();
    tokio::spawn(async move {
        tokio::time::sleep(task_state.settle).await;
        if let Some(mut verifier) = task_state.presentations.get_mut(&sent.presentation_id) {
            verifier.status = "RequestSent".to_string();
        }
        let received = PresentationRecord {
            presentation_id: Uuid::new_v4().to_string(),
            status: "RequestReceived".to_string(),
            ..sent
        };
        debug!(thid = %received.thid, "proof request delivered");
        task_state
            .presentations
            .insert(received.presentation_id.clone(), received);
    });

    Ok((StatusCode::CREATED, Json(record)))
}

#[derive(Debug, Deserialize)]
struct PresentationQuery {
    thid: Option<String>,
}

#[instrument(skip(state))]
async fn list_presentations(
    State(state): State<Arc<AgentState>>,
    Query(query): Query<PresentationQuery>,
) -> Json<Value> {
    let contents: Vec<PresentationRecord> = state
        .presentations
        .iter()
        .filter(|entry| query.thid.as_ref().map_or(true, |thid| &entry.thid == thid))
        .map(|entry| entry.value().clone())
        .collect();
    Json(json!({ "contents": contents }))
}

#[instrument(skip(state))]
async fn get_presentation(
    State(state): State<Arc<AgentState>>,
    Path(id): Path<String>,
) -> Result<Json<PresentationRecord>, StatusCode> {
    state
        .presentations
        .get(&id)
        .map(|entry| Json(entry.value().clone()))
        .ok_or(StatusCode::NOT_FOUND)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tower::ServiceExt;

    fn app(settle: Duration) -> (Arc<AgentState>, Router) {
        let state = Arc::new(AgentState::new(settle));
        (state.clone(), router(state))
    }

    async fn call(
        app: &Router,
        method: &str,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        let body = match body {
            Some(json) => Body::from(json.to_string()),
            None => Body::empty(),
        };
        let response = app.clone().oneshot(request.body(body).unwrap()).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    #[test]
    fn config_reads_overrides_through_lookup() {
        let config = MockAgentConfig::from_lookup(|name| match name {
            "MOCK_AGENT_ADDR" => Some("0.0.0.0:9000".to_string()),
            "MOCK_AGENT_SETTLE_MS" => Some(" 25 ".to_string()),
            _ => None,
        })
        .unwrap();
        assert_eq!(config.addr, "0.0.0.0:9000");
        assert_eq!(config.settle, Duration::from_millis(25));

        assert_eq!(
            MockAgentConfig::from_lookup(|_| None).unwrap(),
            MockAgentConfig::default()
        );
    }

    #[tokio::test]
    async fn webhook_registration_is_remembered() {
        let (state, app) = app(Duration::ZERO);
        assert_eq!(state.webhook_url(), None);

        let (status, body) = call(
            &app,
            "POST",
            endpoints::EVENT_WEBHOOKS,
            Some(json!({ "url": "http://127.0.0.1:9955/" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["url"], "http://127.0.0.1:9955/");
        assert_eq!(state.webhook_url().as_deref(), Some("http://127.0.0.1:9955/"));
    }

    #[test]
    fn config_rejects_non_numeric_settle() {
        let err = MockAgentConfig::from_lookup(|name| {
            (name == "MOCK_AGENT_SETTLE_MS").then(|| "slow".to_string())
        })
        .unwrap_err();
        assert!(err.to_string().contains("MOCK_AGENT_SETTLE_MS='slow'"));
    }

    async fn create(app: &Router) -> (String, String) {
        let (status, body) = call(app, "POST", "/did-registrar/dids", Some(json!({}))).await;
        assert_eq!(status, StatusCode::CREATED);
        let long = body["longFormDid"].as_str().unwrap().to_string();
        let (_, managed) = call(app, "GET", &format!("/did-registrar/dids/{long}"), None).await;
        (managed["did"].as_str().unwrap().to_string(), long)
    }

    #[tokio::test]
    async fn health_reports_version() {
        let (_, app) = app(Duration::ZERO);
        let (status, body) = call(&app, "GET", endpoints::HEALTH, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["version"], VERSION);
    }

    #[tokio::test]
    async fn created_did_is_found_by_either_form() {
        let (state, app) = app(Duration::ZERO);
        let (short, long) = create(&app).await;

        assert!(long.starts_with(&short));
        assert_eq!(state.did_status(&short), Some(DidStatus::Created));
        assert_eq!(state.did_status(&long), Some(DidStatus::Created));
    }

    #[tokio::test]
    async fn did_resolves_only_after_publication_settles() {
        let (state, app) = app(Duration::from_millis(20));
        let (short, _) = create(&app).await;

        let (status, _) = call(&app, "GET", &format!("/dids/{short}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, body) = call(
            &app,
            "POST",
            &format!("/did-registrar/dids/{short}/publications"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::ACCEPTED);
        assert_eq!(body["scheduledOperation"]["didRef"], short.as_str());
        assert_eq!(state.did_status(&short), Some(DidStatus::PublicationPending));

        tokio::time::sleep(Duration::from_millis(200)).await;
        let (status, body) = call(&app, "GET", &format!("/dids/{short}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["didDocument"]["id"], short.as_str());
        assert_eq!(body["didDocumentMetadata"]["deactivated"], false);
    }

    #[tokio::test]
    async fn unpublished_did_cannot_be_deactivated() {
        let (_, app) = app(Duration::ZERO);
        let (short, _) = create(&app).await;

        let (status, _) = call(
            &app,
            "POST",
            &format!("/did-registrar/dids/{short}/deactivations"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn vdr_entry_lifecycle() {
        let (_, app) = app(Duration::ZERO);

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/vdr/entries?drid=memory")
                    .body(Body::from(vec![0xca, 0xfe]))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let created: Value = serde_json::from_slice(&bytes).unwrap();
        let url = created["url"].as_str().unwrap().to_string();
        assert!(url.starts_with("vdr://memory/"));

        let (status, _) = call(&app, "DELETE", &format!("/vdr/entries?url={url}"), None).await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = call(&app, "GET", &format!("/vdr/entries?url={url}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn proof_request_needs_a_known_connection() {
        let (_, app) = app(Duration::ZERO);
        let (status, _) = call(
            &app,
            "POST",
            endpoints::PRESENTATIONS,
            Some(json!({"connectionId": "nope"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn proof_request_is_delivered_under_the_same_thread() {
        let (_, app) = app(Duration::from_millis(10));
        let (_, connection) = call(
            &app,
            "POST",
            endpoints::CONNECTIONS,
            Some(json!({"label": "Connection with Holder"})),
        )
        .await;

        let (status, request) = call(
            &app,
            "POST",
            endpoints::PRESENTATIONS,
            Some(json!({"connectionId": connection["connectionId"]})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(request["status"], "RequestPending");

        tokio::time::sleep(Duration::from_millis(100)).await;
        let thid = request["thid"].as_str().unwrap();
        let (_, page) = call(
            &app,
            "GET",
            &format!("{}?thid={thid}", endpoints::PRESENTATIONS),
            None,
        )
        .await;
        let statuses: Vec<&str> = page["contents"]
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["status"].as_str().unwrap())
            .collect();
        assert_eq!(statuses.len(), 2);
        assert!(statuses.contains(&"RequestSent"));
        assert!(statuses.contains(&"RequestReceived"));
    }
}
