//! Integration tests for the conftable-store crate.
//!
//! The same scenarios run against the file store (on disk via tempfile)
//! and the in-memory store through the [`ConferenceTable`] trait.

use conftable_store::{
    ConferenceTable, DEFAULT_MESSAGE_TYPE, DEFAULT_ROLE, FileConference, MemoryConference,
    ParticipantStatus,
};

// ═══════════════════════════════════════════════════════════════════════
//  Shared scenarios
// ═══════════════════════════════════════════════════════════════════════

async fn two_agent_discussion(table: &dyn ConferenceTable) {
    table.join("agentA", DEFAULT_ROLE).await.unwrap();
    let receipt = table.join("agentB", DEFAULT_ROLE).await.unwrap();
    assert_eq!(receipt.participants, vec!["agentA", "agentB"]);

    let first = table.post("agentA", "hello", "statement").await.unwrap();
    let second = table.post("agentB", "hi", "response").await.unwrap();
    assert_eq!(first.message_id, 1);
    assert_eq!(second.message_id, 2);

    let batch = table.messages_since(0).await.unwrap();
    assert_eq!(batch.total, 2);
    assert_eq!(batch.messages[0].agent_id, "agentA");
    assert_eq!(batch.messages[0].message, "hello");
    assert_eq!(batch.messages[0].kind, "statement");
    assert_eq!(batch.messages[1].agent_id, "agentB");
    assert_eq!(batch.messages[1].kind, "response");

    let status = table.status().await.unwrap();
    assert_eq!(status.participants.len(), 2);
    assert_eq!(status.active_agents, 2);
    assert_eq!(status.message_count, 2);

    table.conclude("agentA", "done").await.unwrap();
    let status = table.status().await.unwrap();
    assert_eq!(status.active_agents, 1);
    assert_eq!(
        status.participants["agentA"].status,
        ParticipantStatus::Concluded
    );
    assert_eq!(
        status.participants["agentA"].conclusion.as_deref(),
        Some("done")
    );
}

async fn incremental_reads(table: &dyn ConferenceTable) {
    let mut cursor = 0;
    let mut seen = Vec::new();

    for round in 0..3 {
        table
            .post("agentA", &format!("round {round}"), DEFAULT_MESSAGE_TYPE)
            .await
            .unwrap();
        table
            .post("agentB", &format!("reply {round}"), "response")
            .await
            .unwrap();

        let batch = table.messages_since(cursor).await.unwrap();
        assert_eq!(batch.total, 2);
        cursor = batch.last_id().unwrap();
        seen.extend(batch.messages.into_iter().map(|m| m.id));
    }

    assert_eq!(seen, vec![1, 2, 3, 4, 5, 6]);
    assert!(table.messages_since(cursor).await.unwrap().messages.is_empty());
}

async fn clear_then_status(table: &dyn ConferenceTable) {
    table.join("agentA", DEFAULT_ROLE).await.unwrap();
    table.post("agentA", "x", DEFAULT_MESSAGE_TYPE).await.unwrap();
    table.clear().await.unwrap();

    let status = table.status().await.unwrap();
    assert!(status.participants.is_empty());
    assert_eq!(status.message_count, 0);
    assert_eq!(status.active_agents, 0);
}

// ═══════════════════════════════════════════════════════════════════════
//  File store
// ═══════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn file_store_two_agent_discussion() {
    let dir = tempfile::tempdir().unwrap();
    two_agent_discussion(&FileConference::new(dir.path())).await;
}

#[tokio::test]
async fn file_store_incremental_reads() {
    let dir = tempfile::tempdir().unwrap();
    incremental_reads(&FileConference::new(dir.path())).await;
}

#[tokio::test]
async fn file_store_clear_then_status() {
    let dir = tempfile::tempdir().unwrap();
    clear_then_status(&FileConference::new(dir.path())).await;
}

#[tokio::test]
async fn file_store_is_shared_between_handles() {
    let dir = tempfile::tempdir().unwrap();
    let alice = FileConference::new(dir.path());
    let bob = FileConference::new(dir.path());

    alice.join("alice", DEFAULT_ROLE).await.unwrap();
    bob.join("bob", "reviewer").await.unwrap();
    alice.post("alice", "ping", "question").await.unwrap();
    let receipt = bob.post("bob", "pong", "response").await.unwrap();
    assert_eq!(receipt.message_id, 2);

    let status = alice.status().await.unwrap();
    assert_eq!(status.participants.len(), 2);
    assert_eq!(status.participants["bob"].role, "reviewer");
    assert_eq!(bob.messages_since(1).await.unwrap().messages[0].message, "pong");
}

// ═══════════════════════════════════════════════════════════════════════
//  Memory store
// ═══════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn memory_store_two_agent_discussion() {
    two_agent_discussion(&MemoryConference::new()).await;
}

#[tokio::test]
async fn memory_store_incremental_reads() {
    incremental_reads(&MemoryConference::new()).await;
}

#[tokio::test]
async fn memory_store_clear_then_status() {
    clear_then_status(&MemoryConference::new()).await;
}
