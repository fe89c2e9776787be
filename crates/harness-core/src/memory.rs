//! Values an actor can remember between steps

use serde::{Deserialize, Serialize};

/// A single remembered value.
///
/// Steps pass correlation data (DIDs, record ids, raw VDR payloads, decoded
/// API records) to later steps through actor memory. The shape is recorded so
/// that a read asserting the wrong type fails loudly instead of coercing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Remembered {
    Text(String),
    Bytes(Vec<u8>),
    Flag(bool),
    Number(i64),
    Record(serde_json::Value),
}

impl Remembered {
    pub fn kind(&self) -> &'static str {
        match self {
            Remembered::Text(_) => "text",
            Remembered::Bytes(_) => "bytes",
            Remembered::Flag(_) => "flag",
            Remembered::Number(_) => "number",
            Remembered::Record(_) => "record",
        }
    }

    /// Wrap any serialisable record.
    pub fn record<T: Serialize>(value: &T) -> serde_json::Result<Self> {
        serde_json::to_value(value).map(Remembered::Record)
    }
}

impl From<String> for Remembered {
    fn from(value: String) -> Self {
        Remembered::Text(value)
    }
}

impl From<&str> for Remembered {
    fn from(value: &str) -> Self {
        Remembered::Text(value.to_string())
    }
}

impl From<Vec<u8>> for Remembered {
    fn from(value: Vec<u8>) -> Self {
        Remembered::Bytes(value)
    }
}

impl From<&[u8]> for Remembered {
    fn from(value: &[u8]) -> Self {
        Remembered::Bytes(value.to_vec())
    }
}

impl From<bool> for Remembered {
    fn from(value: bool) -> Self {
        Remembered::Flag(value)
    }
}

impl From<i64> for Remembered {
    fn from(value: i64) -> Self {
        Remembered::Number(value)
    }
}

impl From<serde_json::Value> for Remembered {
    fn from(value: serde_json::Value) -> Self {
        Remembered::Record(value)
    }
}

/// Typed extraction used by [`Actor::recall`](crate::Actor::recall).
///
/// Returns the value back on mismatch so the caller can report what was found.
pub trait FromRemembered: Sized {
    const EXPECTED: &'static str;

    fn from_remembered(value: Remembered) -> std::result::Result<Self, Remembered>;
}

impl FromRemembered for Remembered {
    const EXPECTED: &'static str = "any";

    fn from_remembered(value: Remembered) -> std::result::Result<Self, Remembered> {
        Ok(value)
    }
}

impl FromRemembered for String {
    const EXPECTED: &'static str = "text";

    fn from_remembered(value: Remembered) -> std::result::Result<Self, Remembered> {
        match value {
            Remembered::Text(text) => Ok(text),
            other => Err(other),
        }
    }
}

impl FromRemembered for Vec<u8> {
    const EXPECTED: &'static str = "bytes";

    fn from_remembered(value: Remembered) -> std::result::Result<Self, Remembered> {
        match value {
            Remembered::Bytes(bytes) => Ok(bytes),
            other => Err(other),
        }
    }
}

impl FromRemembered for bool {
    const EXPECTED: &'static str = "flag";

    fn from_remembered(value: Remembered) -> std::result::Result<Self, Remembered> {
        match value {
            Remembered::Flag(flag) => Ok(flag),
            other => Err(other),
        }
    }
}

impl FromRemembered for i64 {
    const EXPECTED: &'static str = "number";

    fn from_remembered(value: Remembered) -> std::result::Result<Self, Remembered> {
        match value {
            Remembered::Number(number) => Ok(number),
            other => Err(other),
        }
    }
}

impl FromRemembered for serde_json::Value {
    const EXPECTED: &'static str = "record";

    fn from_remembered(value: Remembered) -> std::result::Result<Self, Remembered> {
        match value {
            Remembered::Record(record) => Ok(record),
            other => Err(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn extraction_checks_shape() {
        let text = Remembered::from("did:prism:abc");
        assert_eq!(
            String::from_remembered(text.clone()).unwrap(),
            "did:prism:abc"
        );
        assert_eq!(bool::from_remembered(text).unwrap_err().kind(), "text");
    }

    #[test]
    fn records_serialise_with_their_kind() {
        let value = Remembered::record(&json!({"connectionId": "c-1"})).unwrap();
        let encoded = serde_json::to_value(&value).unwrap();
        assert_eq!(encoded["kind"], "record");
        assert_eq!(encoded["value"]["connectionId"], "c-1");
    }
}
