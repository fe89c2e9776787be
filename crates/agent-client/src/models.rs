//! Request and response bodies exchanged with the agent
//!
//! Only the fields the harness reads or asserts on are modelled; everything
//! identity-specific stays opaque JSON.

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagedDidKeyTemplate {
    pub id: String,
    pub purpose: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub curve: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceTemplate {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: Vec<String>,
    pub service_endpoint: Value,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentTemplate {
    pub public_keys: Vec<ManagedDidKeyTemplate>,
    #[serde(default)]
    pub services: Vec<ServiceTemplate>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateManagedDidRequest {
    pub document_template: DocumentTemplate,
}

impl CreateManagedDidRequest {
    /// Authentication, assertion and key agreement keys plus one linked
    /// domain service.
    pub fn standard() -> Self {
        let key = |id: &str, purpose: &str, curve: &str| ManagedDidKeyTemplate {
            id: id.to_string(),
            purpose: purpose.to_string(),
            curve: Some(curve.to_string()),
        };
        Self {
            document_template: DocumentTemplate {
                public_keys: vec![
                    key("auth-1", "authentication", "secp256k1"),
                    key("auth-2", "authentication", "Ed25519"),
                    key("assertion-1", "assertionMethod", "secp256k1"),
                    key("comm-1", "keyAgreement", "X25519"),
                ],
                services: vec![ServiceTemplate {
                    id: "https://foo.bar.com".to_string(),
                    kind: vec!["LinkedDomains".to_string()],
                    service_endpoint: Value::String("https://foo.bar.com/".to_string()),
                }],
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateManagedDidResponse {
    pub long_form_did: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagedDid {
    pub did: String,
    #[serde(default)]
    pub long_form_did: Option<String>,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledOperation {
    pub id: String,
    pub did_ref: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DidOperationResponse {
    pub scheduled_operation: ScheduledOperation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DidDocument {
    pub id: String,
    #[serde(default)]
    pub authentication: Vec<String>,
    #[serde(default)]
    pub verification_method: Vec<Value>,
    #[serde(default)]
    pub service: Vec<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DidDocumentMetadata {
    #[serde(default)]
    pub deactivated: Option<bool>,
    #[serde(default)]
    pub canonical_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DidResolutionResult {
    #[serde(default)]
    pub did_document: Option<DidDocument>,
    #[serde(default)]
    pub did_document_metadata: DidDocumentMetadata,
}

impl DidResolutionResult {
    pub fn is_deactivated(&self) -> bool {
        self.did_document_metadata.deactivated.unwrap_or(false)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebhookRegistration {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebhookCreated {
    pub id: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateConnectionRequest {
    pub label: String,
}

/// A connection record, remembered by both parties as `connection-with-<peer>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    pub connection_id: String,
    #[serde(default)]
    pub label: Option<String>,
    pub state: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VdrEntryCreated {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProofRequestOptions {
    pub challenge: String,
    pub domain: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProofRequest {
    pub description: String,
    pub connection_id: String,
    pub options: Option<ProofRequestOptions>,
    #[serde(default)]
    pub proofs: Vec<Value>,
}

impl ProofRequest {
    pub fn for_connection(connection_id: &str) -> Self {
        Self {
            description: "Proof request".to_string(),
            connection_id: connection_id.to_string(),
            options: Some(ProofRequestOptions {
                challenge: "11c91493-01b3-4c4d-ac36-b336bab5bddf".to_string(),
                domain: "https://example-verifier.com".to_string(),
            }),
            proofs: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresentationStatus {
    pub presentation_id: String,
    pub thid: String,
    pub status: String,
    #[serde(default)]
    pub connection_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PresentationsPage {
    #[serde(default)]
    pub contents: Vec<PresentationStatus>,
}
