//! In-memory conference table.
//!
//! Holds the participant map and message list behind a single
//! [`tokio::sync::Mutex`]. Every operation, reads included, takes the lock,
//! so mutations are serialised and message ids never collide. State lives
//! as long as the [`MemoryConference`] value; nothing is persisted.

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::error::StoreResult;
use crate::model::{
    ConferenceStatus, JoinReceipt, Message, MessageBatch, Participant, ParticipantMap,
    PostReceipt,
};
use crate::table::ConferenceTable;

#[derive(Debug, Default)]
struct Inner {
    participants: ParticipantMap,
    messages: Vec<Message>,
}

/// A conference table held entirely in process memory.
#[derive(Debug, Default)]
pub struct MemoryConference {
    inner: Mutex<Inner>,
}

impl MemoryConference {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ConferenceTable for MemoryConference {
    async fn join(&self, agent_id: &str, role: &str) -> StoreResult<JoinReceipt> {
        let mut inner = self.inner.lock().await;
        inner
            .participants
            .insert(agent_id.to_owned(), Participant::joined(role));
        let participants = inner.participants.keys().cloned().collect();
        drop(inner);

        info!(agent_id, role, "agent joined");
        Ok(JoinReceipt { participants })
    }

    async fn post(&self, agent_id: &str, message: &str, kind: &str) -> StoreResult<PostReceipt> {
        let mut inner = self.inner.lock().await;
        let id = inner.messages.len() as u64 + 1;
        inner.messages.push(Message::new(id, agent_id, message, kind));
        let total_messages = inner.messages.len() as u64;
        drop(inner);

        debug!(agent_id, message_id = id, "message posted");
        Ok(PostReceipt {
            message_id: id,
            total_messages,
        })
    }

    async fn messages_since(&self, since_id: u64) -> StoreResult<MessageBatch> {
        let inner = self.inner.lock().await;
        let messages = inner
            .messages
            .iter()
            .filter(|m| m.id > since_id)
            .cloned()
            .collect();
        Ok(MessageBatch::new(messages))
    }

    async fn conclude(&self, agent_id: &str, conclusion: &str) -> StoreResult<()> {
        let mut inner = self.inner.lock().await;
        match inner.participants.get_mut(agent_id) {
            Some(participant) => {
                participant.conclude(conclusion);
                info!(agent_id, "agent concluded");
            }
            None => debug!(agent_id, "conclude for unknown agent ignored"),
        }
        Ok(())
    }

    async fn status(&self) -> StoreResult<ConferenceStatus> {
        let inner = self.inner.lock().await;
        Ok(ConferenceStatus::new(
            inner.participants.clone(),
            inner.messages.len() as u64,
        ))
    }

    async fn clear(&self) -> StoreResult<()> {
        let mut inner = self.inner.lock().await;
        inner.participants.clear();
        inner.messages.clear();
        info!("conference table cleared");
        Ok(())
    }
}
