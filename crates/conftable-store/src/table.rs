//! The [`ConferenceTable`] trait.
//!
//! The file store, the in-memory store behind the HTTP service, and the
//! HTTP client all implement this trait, so agents and helpers such as
//! [`wait_for_quorum`](crate::quorum::wait_for_quorum) work against any of
//! them.

use async_trait::async_trait;

use crate::error::StoreResult;
use crate::model::{ConferenceStatus, JoinReceipt, MessageBatch, PostReceipt};

/// A shared message board that agents join, post to, and conclude from.
#[async_trait]
pub trait ConferenceTable: Send + Sync {
    /// Seat `agent_id` with `role`, replacing any earlier entry for it.
    async fn join(&self, agent_id: &str, role: &str) -> StoreResult<JoinReceipt>;

    /// Append a message and return the id assigned to it.
    async fn post(&self, agent_id: &str, message: &str, kind: &str) -> StoreResult<PostReceipt>;

    /// All messages with id strictly greater than `since_id`, in post order.
    async fn messages_since(&self, since_id: u64) -> StoreResult<MessageBatch>;

    /// Mark `agent_id` as concluded. Unknown identifiers are ignored.
    async fn conclude(&self, agent_id: &str, conclusion: &str) -> StoreResult<()>;

    /// Snapshot of participants and message count.
    async fn status(&self) -> StoreResult<ConferenceStatus>;

    /// Remove every participant and message.
    async fn clear(&self) -> StoreResult<()>;
}
