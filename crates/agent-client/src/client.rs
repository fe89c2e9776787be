//! REST facade over the cloud agent

use crate::models::{
    Connection, CreateConnectionRequest, CreateManagedDidRequest, CreateManagedDidResponse,
    DidOperationResponse, DidResolutionResult, ManagedDid, PresentationStatus, PresentationsPage,
    ProofRequest, VdrEntryCreated, WebhookCreated, WebhookRegistration,
};
use bytes::Bytes;
use harness_core::{endpoints, HarnessConfig, HarnessError, Result};
use reqwest::header::CONTENT_TYPE;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, instrument};

/// Body of an outgoing request.
#[derive(Debug, Clone, Default)]
pub enum RequestBody {
    #[default]
    Empty,
    Json(Value),
    Bytes(Vec<u8>),
}

/// Status code and raw body of an agent response.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Bytes,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn decode<T: DeserializeOwned>(&self) -> Result<T> {
        decode(&self.body)
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Decode a JSON body into `T`.
pub fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T> {
    Ok(serde_json::from_slice(body)?)
}

#[derive(Debug, Clone)]
pub struct AgentClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<(String, String)>,
}

impl AgentClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: None,
        }
    }

    pub fn from_config(config: &HarnessConfig) -> Self {
        let client = Self::new(config.agent_url.clone());
        match &config.api_key {
            Some(key) => client.with_api_key(config.api_key_header.clone(), key.clone()),
            None => client,
        }
    }

    pub fn with_api_key(mut self, header: impl Into<String>, key: impl Into<String>) -> Self {
        self.api_key = Some((header.into(), key.into()));
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Issue one request. No retries; transport failures become `Http`.
    #[instrument(skip(self, method, body, headers), fields(method = %method))]
    pub async fn send(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        body: RequestBody,
        headers: &[(&str, &str)],
    ) -> Result<ApiResponse> {
        let mut request = self
            .http
            .request(method, format!("{}{}", self.base_url, path))
            .query(query);

        if let Some((header, key)) = &self.api_key {
            request = request.header(header.as_str(), key.as_str());
        }
        for (name, value) in headers {
            request = request.header(*name, *value);
        }
        request = match body {
            RequestBody::Empty => request,
            RequestBody::Json(json) => request.json(&json),
            RequestBody::Bytes(bytes) => request
                .header(CONTENT_TYPE, "application/octet-stream")
                .body(bytes),
        };

        let response = request.send().await.map_err(http_error)?;
        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(http_error)?;
        debug!(status, len = body.len(), "agent responded");
        Ok(ApiResponse { status, body })
    }

    async fn expect(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        body: RequestBody,
        expected: u16,
    ) -> Result<ApiResponse> {
        let response = self.send(method.clone(), path, query, body, &[]).await?;
        if response.status != expected {
            debug!(status = response.status, body = %response.text(), "unexpected agent response");
            return Err(HarnessError::UnexpectedStatus {
                method: method.to_string(),
                path: path.to_string(),
                status: response.status,
                expected,
            });
        }
        Ok(response)
    }

    pub async fn health(&self) -> Result<Value> {
        self.expect(Method::GET, endpoints::HEALTH, &[], RequestBody::Empty, 200)
            .await?
            .decode()
    }

    pub async fn create_did(
        &self,
        request: &CreateManagedDidRequest,
    ) -> Result<CreateManagedDidResponse> {
        let body = RequestBody::Json(serde_json::to_value(request)?);
        self.expect(Method::POST, endpoints::DID_REGISTRAR_DIDS, &[], body, 201)
            .await?
            .decode()
    }

    pub async fn managed_did(&self, did: &str) -> Result<ManagedDid> {
        let path = format!("{}/{did}", endpoints::DID_REGISTRAR_DIDS);
        self.expect(Method::GET, &path, &[], RequestBody::Empty, 200)
            .await?
            .decode()
    }

    pub async fn publish_did(&self, did: &str) -> Result<DidOperationResponse> {
        let path = format!("{}/{did}/publications", endpoints::DID_REGISTRAR_DIDS);
        self.expect(Method::POST, &path, &[], RequestBody::Empty, 202)
            .await?
            .decode()
    }

    pub async fn deactivate_did(&self, did: &str) -> Result<DidOperationResponse> {
        let path = format!("{}/{did}/deactivations", endpoints::DID_REGISTRAR_DIDS);
        self.expect(Method::POST, &path, &[], RequestBody::Empty, 202)
            .await?
            .decode()
    }

    /// Raw resolution response; 404 until the DID reaches the ledger.
    pub async fn resolve_did(&self, did: &str) -> Result<ApiResponse> {
        let path = format!("{}/{did}", endpoints::DIDS);
        self.send(Method::GET, &path, &[], RequestBody::Empty, &[]).await
    }

    pub async fn resolve_did_document(&self, did: &str) -> Result<DidResolutionResult> {
        let path = format!("{}/{did}", endpoints::DIDS);
        self.expect(Method::GET, &path, &[], RequestBody::Empty, 200)
            .await?
            .decode()
    }

    pub async fn register_webhook(&self, url: &str) -> Result<WebhookCreated> {
        let body = RequestBody::Json(serde_json::to_value(WebhookRegistration {
            url: url.to_string(),
        })?);
        self.expect(Method::POST, endpoints::EVENT_WEBHOOKS, &[], body, 200)
            .await?
            .decode()
    }

    pub async fn create_connection(&self, label: &str) -> Result<Connection> {
        let body = RequestBody::Json(serde_json::to_value(CreateConnectionRequest {
            label: label.to_string(),
        })?);
        self.expect(Method::POST, endpoints::CONNECTIONS, &[], body, 201)
            .await?
            .decode()
    }

    /// Store `data` and return the entry's locator url.
    pub async fn create_vdr_entry(
        &self,
        data: &[u8],
        driver: &str,
        did_key_id: Option<&str>,
    ) -> Result<String> {
        let mut query = vec![("drid", driver)];
        if let Some(key_id) = did_key_id {
            query.push(("didKeyId", key_id));
        }
        let created: VdrEntryCreated = self
            .expect(
                Method::POST,
                endpoints::VDR_ENTRIES,
                &query,
                RequestBody::Bytes(data.to_vec()),
                201,
            )
            .await?
            .decode()?;
        Ok(created.url)
    }

    pub async fn update_vdr_entry(
        &self,
        url: &str,
        data: &[u8],
        did_key_id: Option<&str>,
    ) -> Result<()> {
        let mut query = vec![("url", url)];
        if let Some(key_id) = did_key_id {
            query.push(("didKeyId", key_id));
        }
        self.expect(
            Method::PUT,
            endpoints::VDR_ENTRIES,
            &query,
            RequestBody::Bytes(data.to_vec()),
            200,
        )
        .await?;
        Ok(())
    }

    pub async fn delete_vdr_entry(&self, url: &str, did_key_id: Option<&str>) -> Result<()> {
        let mut query = vec![("url", url)];
        if let Some(key_id) = did_key_id {
            query.push(("didKeyId", key_id));
        }
        self.expect(Method::DELETE, endpoints::VDR_ENTRIES, &query, RequestBody::Empty, 200)
            .await?;
        Ok(())
    }

    /// Raw entry lookup; 404 once the entry is deleted.
    pub async fn resolve_vdr_entry(&self, url: &str) -> Result<ApiResponse> {
        self.send(
            Method::GET,
            endpoints::VDR_ENTRIES,
            &[("url", url)],
            RequestBody::Empty,
            &[],
        )
        .await
    }

    pub async fn request_proof(&self, request: &ProofRequest) -> Result<PresentationStatus> {
        let body = RequestBody::Json(serde_json::to_value(request)?);
        self.expect(Method::POST, endpoints::PRESENTATIONS, &[], body, 201)
            .await?
            .decode()
    }

    pub async fn presentation(&self, presentation_id: &str) -> Result<PresentationStatus> {
        let path = format!("{}/{presentation_id}", endpoints::PRESENTATIONS);
        self.expect(Method::GET, &path, &[], RequestBody::Empty, 200)
            .await?
            .decode()
    }

    pub async fn presentations_by_thid(&self, thid: &str) -> Result<Vec<PresentationStatus>> {
        let page: PresentationsPage = self
            .expect(
                Method::GET,
                endpoints::PRESENTATIONS,
                &[("thid", thid)],
                RequestBody::Empty,
                200,
            )
            .await?
            .decode()?;
        Ok(page.contents)
    }
}

fn http_error(err: reqwest::Error) -> HarnessError {
    HarnessError::Http {
        reason: err.to_string(),
    }
}
