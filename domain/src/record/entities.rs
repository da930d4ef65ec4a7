//! Log record entities

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One captured generation event (Entity)
///
/// Immutable once written: the log only ever grows by whole records or is
/// cleared in bulk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogRecord {
    /// Capture-time instant.
    #[serde(with = "rfc3339")]
    pub timestamp: DateTime<Utc>,
    /// Active persona at capture time, empty when the host has none.
    #[serde(default)]
    pub character_name: String,
    #[serde(default)]
    pub data: RecordData,
}

impl LogRecord {
    pub fn new(timestamp: DateTime<Utc>, character_name: impl Into<String>) -> Self {
        Self {
            timestamp,
            character_name: character_name.into(),
            data: RecordData::default(),
        }
    }

    pub fn with_data(mut self, data: RecordData) -> Self {
        self.data = data;
        self
    }
}

/// Captured fields of a record.
///
/// Every field is optional and omitted from the encoded form when absent, so
/// a disabled capture toggle never shows up as `null`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_prompt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_history: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<ContextSnapshot>,
}

impl RecordData {
    /// Keys present in the encoded form, in encoding order.
    pub fn keys(&self) -> Vec<&'static str> {
        let mut keys = Vec::new();
        if self.final_prompt.is_some() {
            keys.push("finalPrompt");
        }
        if self.prompt.is_some() {
            keys.push("prompt");
        }
        if self.message_history.is_some() {
            keys.push("messageHistory");
        }
        if self.context.is_some() {
            keys.push("context");
        }
        keys
    }

    pub fn is_empty(&self) -> bool {
        self.keys().is_empty()
    }
}

/// Host session context copied verbatim into a record.
///
/// All four parts are host-defined structures; nothing here interprets them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextSnapshot {
    #[serde(default)]
    pub world_info: Value,
    #[serde(default)]
    pub characters: Value,
    #[serde(default)]
    pub groups: Value,
    #[serde(default)]
    pub chat_metadata: Value,
}

/// RFC 3339 timestamps in UTC with `Z` suffix.
///
/// Fractional seconds use as many digits as the instant needs, so any
/// timestamp survives an encode/decode cycle unchanged.
mod rfc3339 {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S: Serializer>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&ts.to_rfc3339_opts(SecondsFormat::AutoSi, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|ts| ts.with_timezone(&Utc))
            .map_err(D::Error::custom)
    }
}
