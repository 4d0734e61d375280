//! Data model shared by every conference table implementation.
//!
//! The serialised shape of [`Participant`] and [`Message`] is the on-disk
//! format of the file store and the wire format of the HTTP service.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Role given to a participant that joins without naming one.
pub const DEFAULT_ROLE: &str = "participant";

/// Type tag given to a message posted without one.
pub const DEFAULT_MESSAGE_TYPE: &str = "statement";

/// Map from agent identifier to its participant record, in first-join
/// order. Rejoining keeps an agent's original position.
pub type ParticipantMap = IndexMap<String, Participant>;

// ═══════════════════════════════════════════════════════════════════════
//  Participants
// ═══════════════════════════════════════════════════════════════════════

/// Whether a participant is still taking part in the discussion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParticipantStatus {
    Active,
    Concluded,
}

/// A single agent seated at the table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    /// When the agent (most recently) joined.
    pub joined_at: DateTime<Utc>,
    /// Free-text role, `"participant"` unless given.
    pub role: String,
    pub status: ParticipantStatus,
    /// Closing statement, set by conclude.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conclusion: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub concluded_at: Option<DateTime<Utc>>,
}

impl Participant {
    /// A freshly joined, active participant.
    pub fn joined(role: impl Into<String>) -> Self {
        Self {
            joined_at: Utc::now(),
            role: role.into(),
            status: ParticipantStatus::Active,
            conclusion: None,
            concluded_at: None,
        }
    }

    /// Mark this participant as concluded with the given closing statement.
    pub fn conclude(&mut self, conclusion: impl Into<String>) {
        self.status = ParticipantStatus::Concluded;
        self.conclusion = Some(conclusion.into());
        self.concluded_at = Some(Utc::now());
    }

    pub fn is_active(&self) -> bool {
        self.status == ParticipantStatus::Active
    }
}

// ═══════════════════════════════════════════════════════════════════════
//  Messages
// ═══════════════════════════════════════════════════════════════════════

/// One posted message. Immutable once written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Sequence number assigned at post time, starting at 1.
    pub id: u64,
    /// Author. Not checked against the participant map.
    pub agent_id: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    /// Free-text tag, conventionally `statement`, `question`, `response`
    /// or `conclusion`.
    #[serde(rename = "type")]
    pub kind: String,
}

impl Message {
    pub fn new(
        id: u64,
        agent_id: impl Into<String>,
        message: impl Into<String>,
        kind: impl Into<String>,
    ) -> Self {
        Self {
            id,
            agent_id: agent_id.into(),
            message: message.into(),
            timestamp: Utc::now(),
            kind: kind.into(),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
//  Operation results
// ═══════════════════════════════════════════════════════════════════════

/// Result of a join: every identifier currently seated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoinReceipt {
    pub participants: Vec<String>,
}

/// Result of a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostReceipt {
    pub message_id: u64,
    /// Number of messages in the table after this post.
    pub total_messages: u64,
}

/// Messages returned by a `since_id` query, in post order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MessageBatch {
    pub messages: Vec<Message>,
    pub total: usize,
}

impl MessageBatch {
    pub fn new(messages: Vec<Message>) -> Self {
        let total = messages.len();
        Self { messages, total }
    }

    /// Highest id in the batch, useful as the next `since_id`.
    pub fn last_id(&self) -> Option<u64> {
        self.messages.last().map(|m| m.id)
    }
}

/// Snapshot of the whole table.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ConferenceStatus {
    pub participants: ParticipantMap,
    pub message_count: u64,
    pub active_agents: usize,
}

impl ConferenceStatus {
    pub fn new(participants: ParticipantMap, message_count: u64) -> Self {
        let active_agents = participants.values().filter(|p| p.is_active()).count();
        Self {
            participants,
            message_count,
            active_agents,
        }
    }
}
