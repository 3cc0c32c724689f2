use anyhow::{bail, Result};
use chrono::Utc;
use uuid::Uuid;

use super::{
    history::ChatHistoryStore,
    models::{derive_title, ChatHistoryEntry, Message, Role},
};
use crate::{advisor::Advisor, log_debug};

const ENABLE_LOGS: bool = true;

/// One open conversation with an advisor. The history entry is created once the
/// first reply lands and rewritten after every later turn.
pub struct ChatSession {
    advisor: Advisor,
    history: ChatHistoryStore,
    messages: Vec<Message>,
    entry_id: Option<String>,
}

impl ChatSession {
    pub fn new(advisor: Advisor, history: ChatHistoryStore) -> Self {
        Self {
            advisor,
            history,
            messages: Vec::new(),
            entry_id: None,
        }
    }

    /// Continues a saved conversation.
    pub fn resume(advisor: Advisor, history: ChatHistoryStore, entry: ChatHistoryEntry) -> Self {
        Self {
            advisor,
            history,
            messages: entry.messages,
            entry_id: Some(entry.id),
        }
    }

    pub fn advisor(&self) -> &Advisor {
        &self.advisor
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn entry_id(&self) -> Option<&str> {
        self.entry_id.as_deref()
    }

    /// Number of user messages so far; the turn of the next reply.
    pub fn turn(&self) -> u32 {
        self.messages
            .iter()
            .filter(|message| message.role == Role::User)
            .count() as u32
    }

    /// Appends the user's message, waits out the typing delay, appends the reply and saves.
    pub async fn send(&mut self, text: &str) -> Result<Message> {
        let text = text.trim();
        if text.is_empty() {
            bail!("Message is empty");
        }

        let saved_len = self.messages.len();
        let saved_entry_id = self.entry_id.clone();

        self.messages.push(Message::new(Role::User, text));
        let turn = self.turn();

        let content = self.advisor.respond_with_delay(text, turn).await;
        let reply = Message::new(Role::Assistant, content);
        self.messages.push(reply.clone());

        if let Err(err) = self.persist() {
            // Unsaved turn is dropped so a retry starts from the same state.
            self.messages.truncate(saved_len);
            self.entry_id = saved_entry_id;
            return Err(err);
        }
        log_debug!(
            "{} session {:?} now has {} messages",
            self.advisor.persona(),
            self.entry_id,
            self.messages.len()
        );
        Ok(reply)
    }

    fn persist(&mut self) -> Result<()> {
        let now = Utc::now();
        let entry = match self.entry_id.clone() {
            Some(id) => {
                let created_at = self
                    .history
                    .get(&id)
                    .map(|existing| existing.created_at)
                    .unwrap_or(now);
                ChatHistoryEntry {
                    id,
                    title: self.title(),
                    messages: self.messages.clone(),
                    created_at,
                    updated_at: now,
                }
            }
            None => {
                let id = Uuid::new_v4().to_string();
                self.entry_id = Some(id.clone());
                ChatHistoryEntry {
                    id,
                    title: self.title(),
                    messages: self.messages.clone(),
                    created_at: now,
                    updated_at: now,
                }
            }
        };
        self.history.upsert(entry)
    }

    fn title(&self) -> String {
        self.messages
            .iter()
            .find(|message| message.role == Role::User)
            .map(|message| derive_title(&message.content))
            .unwrap_or_default()
    }
}
