//! Memory key names shared by steps and the isolation manager

use std::collections::BTreeSet;

/// Configuration keys established once per run and kept across scenarios.
pub const DEFAULT_PRESERVED_KEYS: &[&str] = &[
    "BEARER_TOKEN",
    "AUTH_KEY",
    "AUTH_HEADER",
    "baseUrl",
    "webhookUrl",
    "WEBHOOK_ID",
    "OID4VCI_AUTH_SERVER_URL",
    "OID4VCI_AUTH_SERVER_CLIENT_ID",
    "OID4VCI_AUTH_SERVER_CLIENT_SECRET",
];

/// Actor names scrubbed by a fixed-roster isolation pass.
pub const DEFAULT_ROSTER: &[&str] = &["Issuer", "Holder", "Verifier", "Admin", "Alice", "Bob"];

const CONNECTION_KEY_PREFIX: &str = "connection-with-";

/// Key under which an actor keeps its connection record with `other`.
pub fn connection_key(other: &str) -> String {
    format!("{CONNECTION_KEY_PREFIX}{other}")
}

/// Keys written by the DID, VDR and connection steps.
pub mod scenario {
    pub const SHORT_FORM_DID: &str = "shortFormDid";
    pub const LONG_FORM_DID: &str = "longFormDid";
    pub const HAS_PUBLISHED_DID: &str = "hasPublishedDid";
    pub const DEACTIVATED_DID: &str = "deactivatedDid";
    pub const VDR_URL: &str = "vdrUrl";
    pub const VDR_DRIVER: &str = "vdrDriver";
    pub const VDR_DATA: &str = "vdrData";
    pub const PRESENTATION_ID: &str = "presentationId";
    pub const PROOF_THID: &str = "proofThid";
}

/// Immutable allow-list of keys exempt from scrubbing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreservedKeySet {
    keys: BTreeSet<String>,
}

impl PreservedKeySet {
    pub fn new<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keys: keys.into_iter().map(Into::into).collect(),
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl Default for PreservedKeySet {
    fn default() -> Self {
        Self::new(DEFAULT_PRESERVED_KEYS.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_preserved_set_covers_configuration() {
        let preserved = PreservedKeySet::default();
        assert_eq!(preserved.len(), 9);
        assert!(preserved.contains("BEARER_TOKEN"));
        assert!(preserved.contains("baseUrl"));
        assert!(!preserved.contains(scenario::SHORT_FORM_DID));
    }

    #[test]
    fn connection_keys_follow_pattern() {
        assert_eq!(connection_key("Holder"), "connection-with-Holder");
    }
}
