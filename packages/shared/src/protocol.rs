//! WebSocket wire protocol.
//!
//! Every frame is a JSON text frame carrying a named event and its payload:
//!
//! ```json
//! {"event":"chat message","data":{"username":"Alice","text":"hi","avatar":"https://..."}}
//! ```
//!
//! The same event name is used in both directions. The relay never decodes
//! `data`; it keeps it as a raw JSON value and re-emits it unchanged.

use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;

/// Event name for chat messages, client → relay and relay → clients.
pub const CHAT_MESSAGE_EVENT: &str = "chat message";

/// Chat message payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Display name chosen by the sender
    pub username: String,
    /// Message body
    pub text: String,
    /// Avatar image URL derived from the username and a display colour
    pub avatar: String,
}

/// Named event with its payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventEnvelope<T> {
    pub event: String,
    pub data: T,
}

impl<T> EventEnvelope<T> {
    /// Wrap `data` in a `"chat message"` event.
    pub fn chat_message(data: T) -> Self {
        Self {
            event: CHAT_MESSAGE_EVENT.to_string(),
            data,
        }
    }

    pub fn is_chat_message(&self) -> bool {
        self.event == CHAT_MESSAGE_EVENT
    }
}

/// Encode a chat message as a `"chat message"` frame.
pub fn encode_chat_message(message: &ChatMessage) -> serde_json::Result<String> {
    serde_json::to_string(&EventEnvelope::chat_message(message))
}

/// Decode a frame into its event name and undecoded payload.
///
/// The returned payload borrows from `frame`, so relaying it does not
/// re-serialize the sender's bytes.
pub fn decode_event(frame: &str) -> serde_json::Result<EventEnvelope<&RawValue>> {
    serde_json::from_str(frame)
}

/// Wrap an undecoded payload in a `"chat message"` frame.
pub fn encode_raw_chat_message(data: &RawValue) -> serde_json::Result<String> {
    serde_json::to_string(&EventEnvelope::chat_message(data))
}

/// Decode a frame as a chat message.
///
/// Returns `Ok(None)` for well-formed frames carrying any other event.
pub fn decode_chat_message(frame: &str) -> serde_json::Result<Option<ChatMessage>> {
    let envelope = decode_event(frame)?;
    if !envelope.is_chat_message() {
        return Ok(None);
    }
    serde_json::from_str(envelope.data.get()).map(Some)
}
