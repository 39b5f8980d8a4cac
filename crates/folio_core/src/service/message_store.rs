//! Contact message store.
//!
//! Messages only support append and hard delete by id; there is no
//! recycle bin and no undo.

use crate::model::message::{ContactMessage, MessageId};
use crate::repo::kv_repo::{keys, KeyValueRepository};
use crate::service::{format_timestamp, IdGenerator, StoreError, StoreResult};
use log::info;

/// Store owning submitted contact messages.
pub struct MessageStore<R: KeyValueRepository> {
    repo: R,
    messages: Vec<ContactMessage>,
    ids: IdGenerator,
}

impl<R: KeyValueRepository> MessageStore<R> {
    /// Loads persisted messages and seeds the id generator past them.
    pub fn load(repo: R) -> StoreResult<Self> {
        let messages: Vec<ContactMessage> = repo.load_collection(keys::MESSAGES)?;
        let max_id = messages.iter().map(|message| message.id).max().unwrap_or(0);
        Ok(Self {
            repo,
            messages,
            ids: IdGenerator::seeded(max_id),
        })
    }

    /// Submitted messages, oldest first.
    pub fn messages(&self) -> &[ContactMessage] {
        &self.messages
    }

    /// Appends a new message; every field is required.
    pub fn append(&mut self, name: &str, email: &str, message: &str) -> StoreResult<ContactMessage> {
        let name = name.trim();
        let email = email.trim();
        let message = message.trim();
        if name.is_empty() {
            return Err(StoreError::MissingField("name"));
        }
        if email.is_empty() {
            return Err(StoreError::MissingField("email"));
        }
        if message.is_empty() {
            return Err(StoreError::MissingField("message"));
        }

        let record = ContactMessage {
            id: self.ids.next_id(),
            name: name.to_string(),
            email: email.to_string(),
            message: message.to_string(),
            date: format_timestamp(),
        };
        self.messages.push(record.clone());
        self.persist()?;

        info!(
            "event=message_append module=message_store status=ok id={}",
            record.id
        );
        Ok(record)
    }

    /// Permanently deletes one message by id.
    pub fn delete(&mut self, id: MessageId) -> StoreResult<ContactMessage> {
        let position = self
            .messages
            .iter()
            .position(|message| message.id == id)
            .ok_or_else(|| StoreError::NotFound(format!("message {id}")))?;
        let removed = self.messages.remove(position);
        self.persist()?;
        Ok(removed)
    }

    fn persist(&self) -> StoreResult<()> {
        self.repo.save_collection(keys::MESSAGES, &self.messages)?;
        Ok(())
    }
}
