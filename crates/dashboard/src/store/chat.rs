//! Chat contacts and their conversations.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use farm2hand_core::chat::{ChatContact, ChatMessage, OutgoingMessage};
use farm2hand_core::{ContactId, MessageId};

use super::RepositoryError;

/// Contacts keyed by ID, each with its own message log.
#[derive(Debug)]
pub struct ChatRepository {
    contacts: BTreeMap<ContactId, ChatContact>,
    threads: BTreeMap<ContactId, Vec<ChatMessage>>,
    /// `None` once `u32::MAX` has been handed out.
    next_message_id: Option<MessageId>,
}

impl ChatRepository {
    /// Create a repository from contacts and their messages.
    ///
    /// Messages are grouped by contact and kept in `sent_at` order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` on duplicate contact or message
    /// IDs, or on a message addressed to an unknown contact.
    pub fn new(
        contacts: impl IntoIterator<Item = ChatContact>,
        messages: impl IntoIterator<Item = ChatMessage>,
    ) -> Result<Self, RepositoryError> {
        let mut repo = Self {
            contacts: BTreeMap::new(),
            threads: BTreeMap::new(),
            next_message_id: Some(MessageId::new(1)),
        };

        for contact in contacts {
            let id = contact.id;
            if repo.contacts.insert(id, contact).is_some() {
                return Err(RepositoryError::Conflict(format!("duplicate contact id {id}")));
            }
            repo.threads.insert(id, Vec::new());
        }

        let mut seen = std::collections::BTreeSet::new();
        for message in messages {
            if !seen.insert(message.id) {
                return Err(RepositoryError::Conflict(format!(
                    "duplicate message id {}",
                    message.id
                )));
            }
            if repo.next_message_id.is_some_and(|next| message.id >= next) {
                repo.next_message_id = message.id.checked_next();
            }
            let contact_id = message.contact_id;
            repo.threads
                .get_mut(&contact_id)
                .ok_or_else(|| {
                    RepositoryError::Conflict(format!(
                        "message {} is for unknown contact {contact_id}",
                        message.id
                    ))
                })?
                .push(message);
        }

        for thread in repo.threads.values_mut() {
            thread.sort_by_key(|m| (m.sent_at, m.id));
        }

        Ok(repo)
    }

    /// Contacts whose name or last message matches `query`.
    #[must_use]
    pub fn contacts(&self, query: &str) -> Vec<&ChatContact> {
        self.contacts.values().filter(|c| c.matches(query)).collect()
    }

    #[must_use]
    pub fn contact_count(&self) -> usize {
        self.contacts.len()
    }

    #[must_use]
    pub fn contact(&self, id: ContactId) -> Option<&ChatContact> {
        self.contacts.get(&id)
    }

    #[must_use]
    pub fn first_contact_id(&self) -> Option<ContactId> {
        self.contacts.keys().next().copied()
    }

    /// One contact's conversation, oldest first.
    #[must_use]
    pub fn thread(&self, id: ContactId) -> &[ChatMessage] {
        self.threads.get(&id).map_or(&[], Vec::as_slice)
    }

    /// Select a contact, clearing its unread count.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` for an unknown contact.
    pub fn open(&mut self, id: ContactId) -> Result<&ChatContact, RepositoryError> {
        let contact = self.contacts.get_mut(&id).ok_or_else(|| not_found(id))?;
        contact.mark_read();
        Ok(contact)
    }

    /// Append one self-sent message to a contact's conversation.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` for an unknown contact and
    /// `RepositoryError::Conflict` when no message IDs are left.
    pub fn send(
        &mut self,
        id: ContactId,
        draft: OutgoingMessage,
        now: NaiveDateTime,
    ) -> Result<&ChatMessage, RepositoryError> {
        let contact = self.contacts.get_mut(&id).ok_or_else(|| not_found(id))?;
        let message_id = self
            .next_message_id
            .ok_or_else(|| RepositoryError::Conflict("no message ids left".to_string()))?;
        self.next_message_id = message_id.checked_next();

        let message = ChatMessage::outgoing(message_id, id, draft, now);
        contact.record_outgoing(&message);

        let thread = self.threads.entry(id).or_default();
        thread.push(message);
        thread.last().ok_or_else(|| not_found(id))
    }
}

fn not_found(id: ContactId) -> RepositoryError {
    RepositoryError::NotFound(format!("contact {id}"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::store::SeedData;

    fn repo() -> ChatRepository {
        let seed = SeedData::builtin();
        ChatRepository::new(seed.contacts, seed.messages).unwrap()
    }

    fn now() -> NaiveDateTime {
        NaiveDateTime::parse_from_str("2024-01-15 10:31", "%Y-%m-%d %H:%M").unwrap()
    }

    #[test]
    fn test_seed_history_belongs_to_first_contact() {
        let repo = repo();
        assert_eq!(repo.thread(ContactId::new(1)).len(), 5);
        assert!(repo.thread(ContactId::new(2)).is_empty());
        assert_eq!(repo.first_contact_id(), Some(ContactId::new(1)));
    }

    #[test]
    fn test_send_appends_exactly_one_message() {
        let mut repo = repo();
        let draft = OutgoingMessage::parse("ส่งพรุ่งนี้เช้าครับ").unwrap();
        let sent = repo.send(ContactId::new(2), draft, now()).unwrap().clone();

        assert!(sent.is_me);
        assert_eq!(sent.id, MessageId::new(6));
        assert_eq!(repo.thread(ContactId::new(2)), [sent]);
        assert_eq!(repo.thread(ContactId::new(1)).len(), 5);

        let contact = repo.contact(ContactId::new(2)).unwrap();
        assert_eq!(contact.last_message, "ส่งพรุ่งนี้เช้าครับ");
        assert_eq!(contact.last_message_time, "10:31");
    }

    #[test]
    fn test_open_clears_unread() {
        let mut repo = repo();
        assert_eq!(repo.contact(ContactId::new(1)).unwrap().unread, 2);
        repo.open(ContactId::new(1)).unwrap();
        assert_eq!(repo.contact(ContactId::new(1)).unwrap().unread, 0);
        assert!(repo.open(ContactId::new(9)).is_err());
    }

    #[test]
    fn test_search_contacts() {
        let repo = repo();
        let names: Vec<&str> = repo
            .contacts("ABC")
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(names, ["ร้านผักสด ABC"]);
        assert_eq!(repo.contacts("").len(), 4);
    }

    #[test]
    fn test_message_for_unknown_contact_rejected() {
        let seed = SeedData::builtin();
        let mut messages = seed.messages;
        messages.first_mut().unwrap().contact_id = ContactId::new(99);
        assert!(ChatRepository::new(seed.contacts, messages).is_err());
    }
}
