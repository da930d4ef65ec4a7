//! Host events and the context snapshot that accompanies them.
//!
//! Payload shapes differ between host versions: some deliver `finalPrompt`,
//! others `prompt`, and the message history may or may not be attached.
//! Accessors here look for every known spelling rather than assuming one.

use crate::record::entities::ContextSnapshot;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Event name the capture handler subscribes to by default.
pub const DEFAULT_CAPTURE_EVENT: &str = "generation_ended";

/// A named host event with an opaque payload (Value Object)
#[derive(Debug, Clone, PartialEq)]
pub struct HostEvent {
    pub name: String,
    pub payload: Value,
}

/// Prompt text found in an event payload, tagged with the key it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptField<'a> {
    /// `finalPrompt`
    Final(&'a str),
    /// `prompt`
    Plain(&'a str),
}

impl HostEvent {
    pub fn new(name: impl Into<String>, payload: Value) -> Self {
        Self {
            name: name.into(),
            payload,
        }
    }

    /// Null, non-object, and `{}` payloads carry nothing worth logging.
    pub fn is_empty(&self) -> bool {
        match &self.payload {
            Value::Object(map) => map.is_empty(),
            _ => true,
        }
    }

    /// Non-empty prompt text, preferring `finalPrompt` over `prompt`.
    pub fn prompt(&self) -> Option<PromptField<'_>> {
        let text = |key: &str| {
            self.payload
                .get(key)
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
        };
        text("finalPrompt")
            .map(PromptField::Final)
            .or_else(|| text("prompt").map(PromptField::Plain))
    }

    /// History carried by the event itself, if any.
    pub fn message_history(&self) -> Option<&[Value]> {
        self.payload
            .get("messageHistory")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
    }
}

/// Live host state read at capture time.
///
/// Every field is kept as raw JSON; a field of unexpected shape reads as
/// absent instead of rejecting the whole context.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HostContext {
    /// Active persona name.
    pub name2: Value,
    /// Live chat history.
    pub chat: Value,
    pub world_info: Value,
    pub characters: Value,
    pub groups: Value,
    pub chat_metadata: Value,
}

impl HostContext {
    /// Persona name, empty unless `name2` is a string.
    pub fn character_name(&self) -> &str {
        self.name2.as_str().unwrap_or_default()
    }

    /// Live chat history, if `chat` is an array.
    pub fn chat_history(&self) -> Option<&[Value]> {
        self.chat.as_array().map(Vec::as_slice)
    }

    pub fn snapshot(&self) -> ContextSnapshot {
        ContextSnapshot {
            world_info: self.world_info.clone(),
            characters: self.characters.clone(),
            groups: self.groups.clone(),
            chat_metadata: self.chat_metadata.clone(),
        }
    }
}

/// Wire form of a host event as delivered on the event stream.
///
/// ```json
/// {"event": "generation_ended", "payload": {...}, "context": {...}}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HostEnvelope {
    pub event: String,
    #[serde(default)]
    pub payload: Value,
    #[serde(default)]
    pub context: HostContext,
}

impl HostEnvelope {
    pub fn into_parts(self) -> (HostEvent, HostContext) {
        (HostEvent::new(self.event, self.payload), self.context)
    }
}
