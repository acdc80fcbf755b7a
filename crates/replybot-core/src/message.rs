use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An incoming chat event from a channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncomingMessage {
    pub id: Uuid,
    /// Channel name (e.g. "bridge").
    pub channel: String,
    /// Conversation the message arrived in (group or direct chat id).
    pub chat_id: String,
    /// Direct-contact identifier of the sender. Differs from `chat_id` when
    /// the message came through a group.
    pub sender_id: String,
    /// Human-readable sender name, when the platform provides one.
    pub sender_name: Option<String>,
    /// Phone-like identifier, used when no name is available.
    pub sender_number: Option<String>,
    /// Message text content.
    pub text: String,
    pub timestamp: DateTime<Utc>,
    /// Whether this message comes from a group chat.
    #[serde(default)]
    pub is_group: bool,
}

impl IncomingMessage {
    /// Resolve the display name substituted for the `{user}` placeholder:
    /// sender name, else phone-like identifier, else the literal "User".
    pub fn display_name(&self) -> &str {
        self.sender_name
            .as_deref()
            .filter(|s| !s.is_empty())
            .or_else(|| self.sender_number.as_deref().filter(|s| !s.is_empty()))
            .unwrap_or("User")
    }
}

/// How a routed reply is delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReplyMode {
    /// A fresh direct message to the destination contact.
    Direct,
    /// A threaded reply into the originating conversation.
    ReplyInPlace,
}

impl ReplyMode {
    /// Wire/display name for the mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Direct => "direct",
            Self::ReplyInPlace => "reply-in-place",
        }
    }
}

/// The single outbound action a routed message can produce.
///
/// Dispatching it (and logging the outcome) is the transport's job; the
/// engine only decides.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplyAction {
    /// Conversation or contact id to deliver to.
    pub destination: String,
    pub mode: ReplyMode,
    pub text: String,
}
