//! Harness configuration

use crate::error::{HarnessError, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

pub const DEFAULT_AGENT_URL: &str = "http://localhost:8080";
pub const DEFAULT_API_KEY_HEADER: &str = "apikey";
pub const DEFAULT_WEBHOOK_BIND: &str = "127.0.0.1:9955";
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 500;
pub const DEFAULT_POLL_TIMEOUT_SECS: u64 = 30;

/// Where the agent lives and how long to wait for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    pub agent_url: String,
    pub api_key: Option<String>,
    pub api_key_header: String,
    pub webhook_bind: String,
    pub poll_interval_ms: u64,
    pub poll_timeout_secs: u64,
    pub poll_max_attempts: Option<u32>,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            agent_url: DEFAULT_AGENT_URL.to_string(),
            api_key: None,
            api_key_header: DEFAULT_API_KEY_HEADER.to_string(),
            webhook_bind: DEFAULT_WEBHOOK_BIND.to_string(),
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            poll_timeout_secs: DEFAULT_POLL_TIMEOUT_SECS,
            poll_max_attempts: None,
        }
    }
}

impl HarnessConfig {
    /// Defaults overridden by `AGENT_URL`, `AGENT_API_KEY`,
    /// `AGENT_API_KEY_HEADER`, `WEBHOOK_BIND`, `POLL_INTERVAL_MS`,
    /// `POLL_TIMEOUT_SECS` and `POLL_MAX_ATTEMPTS`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an injectable variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup("AGENT_URL") {
            config.agent_url = url;
        }
        config.api_key = lookup("AGENT_API_KEY").filter(|key| !key.is_empty());
        if let Some(header) = lookup("AGENT_API_KEY_HEADER") {
            config.api_key_header = header;
        }
        if let Some(bind) = lookup("WEBHOOK_BIND") {
            config.webhook_bind = bind;
        }
        if let Some(raw) = lookup("POLL_INTERVAL_MS") {
            config.poll_interval_ms = parse_var("POLL_INTERVAL_MS", &raw)?;
        }
        if let Some(raw) = lookup("POLL_TIMEOUT_SECS") {
            config.poll_timeout_secs = parse_var("POLL_TIMEOUT_SECS", &raw)?;
        }
        if let Some(raw) = lookup("POLL_MAX_ATTEMPTS") {
            config.poll_max_attempts = Some(parse_var("POLL_MAX_ATTEMPTS", &raw)?);
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.poll_interval_ms == 0 {
            return Err(HarnessError::InvalidConfig {
                reason: "poll interval must be positive".to_string(),
            });
        }
        if !self.agent_url.starts_with("http://") && !self.agent_url.starts_with("https://") {
            return Err(HarnessError::InvalidConfig {
                reason: format!("agent url '{}' is not an http(s) url", self.agent_url),
            });
        }
        Ok(())
    }
}

/// Parse the raw value of variable `name`, trimming surrounding whitespace.
pub fn parse_var<T: FromStr>(name: &str, raw: &str) -> Result<T> {
    raw.trim().parse().map_err(|_| HarnessError::InvalidConfig {
        reason: format!("{name}='{raw}' is not a valid number"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn defaults_apply_without_variables() {
        let config = HarnessConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config, HarnessConfig::default());
    }

    #[test]
    fn variables_override_defaults() {
        let config = HarnessConfig::from_lookup(lookup_from(&[
            ("AGENT_URL", "http://agent:8085/cloud-agent"),
            ("AGENT_API_KEY", "secret"),
            ("POLL_INTERVAL_MS", "250"),
            ("POLL_MAX_ATTEMPTS", "12"),
        ]))
        .unwrap();

        assert_eq!(config.agent_url, "http://agent:8085/cloud-agent");
        assert_eq!(config.api_key.as_deref(), Some("secret"));
        assert_eq!(config.poll_interval_ms, 250);
        assert_eq!(config.poll_max_attempts, Some(12));
        assert_eq!(config.poll_timeout_secs, DEFAULT_POLL_TIMEOUT_SECS);
    }

    #[test]
    fn invalid_numbers_are_rejected() {
        let err = HarnessConfig::from_lookup(lookup_from(&[("POLL_TIMEOUT_SECS", "soon")]))
            .unwrap_err();
        assert!(matches!(err, HarnessError::InvalidConfig { .. }));
    }

    #[test]
    fn zero_interval_is_rejected() {
        let err =
            HarnessConfig::from_lookup(lookup_from(&[("POLL_INTERVAL_MS", "0")])).unwrap_err();
        assert!(err.to_string().contains("interval"));
    }

    #[test]
    fn deserialises_partial_json() {
        let config: HarnessConfig =
            serde_json::from_str(r#"{"agent_url": "https://agent.example"}"#).unwrap();
        assert_eq!(config.agent_url, "https://agent.example");
        assert_eq!(config.api_key_header, DEFAULT_API_KEY_HEADER);
    }
}
