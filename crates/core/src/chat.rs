//! Chat contacts and messages.
//!
//! Each message belongs to exactly one contact; the conversation shown for a
//! contact is that contact's messages only.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::order::timestamp;
use crate::types::{ContactId, MessageId};

/// Sender label on messages written by the seller.
pub const SELF_SENDER: &str = "Me";

/// Format of the short time shown next to messages and contacts.
pub const CLOCK_FORMAT: &str = "%H:%M";

/// Someone the seller talks to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatContact {
    pub id: ContactId,
    pub name: String,
    pub avatar: String,
    #[serde(default)]
    pub last_message: String,
    /// Free-form, e.g. `10:30` or `yesterday`.
    #[serde(default)]
    pub last_message_time: String,
    #[serde(default)]
    pub unread: u32,
    #[serde(default)]
    pub online: bool,
}

impl ChatContact {
    /// Opening the conversation reads everything in it.
    pub const fn mark_read(&mut self) {
        self.unread = 0;
    }

    /// Refresh the preview after the seller sends `message`.
    pub fn record_outgoing(&mut self, message: &ChatMessage) {
        self.last_message.clone_from(&message.body);
        self.last_message_time = message.clock();
    }

    /// Case-insensitive match on name or last message.
    #[must_use]
    pub fn matches(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        query.is_empty()
            || self.name.to_lowercase().contains(&query)
            || self.last_message.to_lowercase().contains(&query)
    }
}

/// A message in one contact's conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: MessageId,
    pub contact_id: ContactId,
    pub sender: String,
    pub body: String,
    #[serde(with = "timestamp")]
    pub sent_at: NaiveDateTime,
    #[serde(default)]
    pub is_me: bool,
}

impl ChatMessage {
    /// Build a message sent by the seller.
    #[must_use]
    pub fn outgoing(
        id: MessageId,
        contact_id: ContactId,
        draft: OutgoingMessage,
        sent_at: NaiveDateTime,
    ) -> Self {
        Self {
            id,
            contact_id,
            sender: SELF_SENDER.to_string(),
            body: draft.0,
            sent_at,
            is_me: true,
        }
    }

    /// Short `HH:MM` time.
    #[must_use]
    pub fn clock(&self) -> String {
        self.sent_at.format(CLOCK_FORMAT).to_string()
    }
}

/// A draft that is worth sending: non-blank, trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMessage(String);

impl OutgoingMessage {
    /// Returns `None` for empty or whitespace-only input.
    #[must_use]
    pub fn parse(input: &str) -> Option<Self> {
        let body = input.trim();
        (!body.is_empty()).then(|| Self(body.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn contact() -> ChatContact {
        ChatContact {
            id: ContactId::new(1),
            name: "ลูกค้าสมหญิง".to_string(),
            avatar: "👩‍🌾".to_string(),
            last_message: "มะเขือเทศยังมีไหมคะ".to_string(),
            last_message_time: "10:30".to_string(),
            unread: 2,
            online: true,
        }
    }

    #[test]
    fn test_blank_drafts_are_rejected() {
        assert!(OutgoingMessage::parse("").is_none());
        assert!(OutgoingMessage::parse("  \n\t ").is_none());
        assert_eq!(OutgoingMessage::parse("  hi \n").unwrap().as_str(), "hi");
    }

    #[test]
    fn test_outgoing_message_is_self_sent() {
        let sent_at = NaiveDateTime::parse_from_str("2024-01-15 10:31", "%Y-%m-%d %H:%M").unwrap();
        let draft = OutgoingMessage::parse("ส่งพรุ่งนี้เช้าครับ").unwrap();
        let message = ChatMessage::outgoing(MessageId::new(6), ContactId::new(1), draft, sent_at);
        assert!(message.is_me);
        assert_eq!(message.sender, SELF_SENDER);
        assert_eq!(message.clock(), "10:31");
    }

    #[test]
    fn test_record_outgoing_updates_preview() {
        let mut c = contact();
        let sent_at = NaiveDateTime::parse_from_str("2024-01-15 11:05", "%Y-%m-%d %H:%M").unwrap();
        let draft = OutgoingMessage::parse("Thanks!").unwrap();
        c.record_outgoing(&ChatMessage::outgoing(MessageId::new(9), c.id, draft, sent_at));
        assert_eq!(c.last_message, "Thanks!");
        assert_eq!(c.last_message_time, "11:05");
    }

    #[test]
    fn test_mark_read() {
        let mut c = contact();
        c.mark_read();
        assert_eq!(c.unread, 0);
    }

    #[test]
    fn test_matches_name_or_preview() {
        let c = contact();
        assert!(c.matches(""));
        assert!(c.matches("สมหญิง"));
        assert!(c.matches("มะเขือเทศ"));
        assert!(!c.matches("corn"));
    }
}
