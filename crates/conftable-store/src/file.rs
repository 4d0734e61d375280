//! File-backed conference table.
//!
//! Two files live under one directory:
//!
//! - `agents.json`: a pretty-printed JSON object mapping agent identifier to
//!   participant record, rewritten whole on every change.
//! - `messages.jsonl`: an append-only log with one JSON message per line.
//!
//! The directory is created on the first write. Any process that can reach
//! the directory can use the table directly; there is no daemon.
//!
//! # Single-writer precondition
//!
//! Nothing here locks across processes. Participant updates are
//! read-modify-write of the whole file, so two concurrent joins can lose
//! one of them. Message ids are the count of non-blank log lines plus one,
//! so two concurrent posts can receive the same id. Use one writer at a
//! time, or the HTTP service when several agents write concurrently.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, instrument};

use crate::error::{StoreError, StoreResult};
use crate::model::{
    ConferenceStatus, JoinReceipt, Message, MessageBatch, Participant, ParticipantMap,
    PostReceipt,
};
use crate::table::ConferenceTable;

/// File holding the participant map.
pub const AGENTS_FILE: &str = "agents.json";

/// File holding the message log.
pub const MESSAGES_FILE: &str = "messages.jsonl";

/// A conference table stored as flat files in a directory.
#[derive(Debug, Clone)]
pub struct FileConference {
    dir: PathBuf,
}

impl FileConference {
    /// Use `dir` as the table directory. Nothing is touched on disk until
    /// the first operation.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn agents_path(&self) -> PathBuf {
        self.dir.join(AGENTS_FILE)
    }

    pub fn messages_path(&self) -> PathBuf {
        self.dir.join(MESSAGES_FILE)
    }

    async fn ensure_dir(&self) -> StoreResult<()> {
        tokio::fs::create_dir_all(&self.dir).await?;
        Ok(())
    }

    /// Load the participant map, treating a missing file as empty.
    async fn load_participants(&self) -> StoreResult<ParticipantMap> {
        match tokio::fs::read(self.agents_path()).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(ParticipantMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn save_participants(&self, participants: &ParticipantMap) -> StoreResult<()> {
        self.ensure_dir().await?;
        let json = serde_json::to_string_pretty(participants)?;
        tokio::fs::write(self.agents_path(), json).await?;
        Ok(())
    }

    /// Read the raw log, or `None` if it does not exist yet.
    async fn read_log(&self) -> StoreResult<Option<String>> {
        match tokio::fs::read_to_string(self.messages_path()).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Number of non-blank lines in the log.
    async fn count_messages(&self) -> StoreResult<u64> {
        let count = self
            .read_log()
            .await?
            .map(|log| log.lines().filter(|l| !l.trim().is_empty()).count())
            .unwrap_or(0);
        Ok(count as u64)
    }
}

#[async_trait]
impl ConferenceTable for FileConference {
    #[instrument(skip(self))]
    async fn join(&self, agent_id: &str, role: &str) -> StoreResult<JoinReceipt> {
        let mut participants = self.load_participants().await?;
        participants.insert(agent_id.to_owned(), Participant::joined(role));
        self.save_participants(&participants).await?;

        info!(agent_id, role, "agent joined");
        Ok(JoinReceipt {
            participants: participants.into_keys().collect(),
        })
    }

    #[instrument(skip(self, message))]
    async fn post(&self, agent_id: &str, message: &str, kind: &str) -> StoreResult<PostReceipt> {
        let id = self.count_messages().await? + 1;
        let record = Message::new(id, agent_id, message, kind);

        let mut line = serde_json::to_string(&record)?;
        line.push('\n');

        self.ensure_dir().await?;
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.messages_path())
            .await?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;

        debug!(agent_id, message_id = id, "message appended");
        Ok(PostReceipt {
            message_id: id,
            total_messages: id,
        })
    }

    async fn messages_since(&self, since_id: u64) -> StoreResult<MessageBatch> {
        let Some(log) = self.read_log().await? else {
            return Ok(MessageBatch::default());
        };

        let mut messages = Vec::new();
        for (idx, line) in log.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let message: Message = serde_json::from_str(line)
                .map_err(|source| StoreError::CorruptLog {
                    line: idx + 1,
                    source,
                })?;
            if message.id > since_id {
                messages.push(message);
            }
        }

        Ok(MessageBatch::new(messages))
    }

    #[instrument(skip(self, conclusion))]
    async fn conclude(&self, agent_id: &str, conclusion: &str) -> StoreResult<()> {
        let mut participants = self.load_participants().await?;
        match participants.get_mut(agent_id) {
            Some(participant) => {
                participant.conclude(conclusion);
                info!(agent_id, "agent concluded");
            }
            None => debug!(agent_id, "conclude for unknown agent ignored"),
        }
        self.save_participants(&participants).await
    }

    async fn status(&self) -> StoreResult<ConferenceStatus> {
        let participants = self.load_participants().await?;
        let message_count = self.count_messages().await?;
        Ok(ConferenceStatus::new(participants, message_count))
    }

    #[instrument(skip(self))]
    async fn clear(&self) -> StoreResult<()> {
        for path in [self.messages_path(), self.agents_path()] {
            match tokio::fs::remove_file(&path).await {
                Ok(()) => {}
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }
        info!("conference table cleared");
        Ok(())
    }
}
