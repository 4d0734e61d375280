//! # conftable-store
//!
//! Storage for a shared "conference table": a message board that several
//! independent agent processes use to exchange short messages and track
//! who has joined and who has concluded.
//!
//! Two stores implement [`ConferenceTable`]:
//!
//! - [`FileConference`]: flat files in a directory, used directly by each
//!   process. Single writer at a time.
//! - [`MemoryConference`]: process memory behind one lock, served over
//!   HTTP by `conftable-web`.
//!
//! ## Quick start
//!
//! ```ignore
//! use conftable_store::{ConferenceTable, FileConference};
//!
//! let table = FileConference::new("conference");
//! table.join("agentA", "participant").await?;
//! let receipt = table.post("agentA", "hello", "statement").await?;
//! let batch = table.messages_since(0).await?;
//! ```

pub mod error;
pub mod file;
pub mod memory;
pub mod model;
pub mod quorum;
pub mod table;

// ── re-exports ───────────────────────────────────────────────────────

pub use error::{StoreError, StoreResult};
pub use file::FileConference;
pub use memory::MemoryConference;
pub use model::{
    ConferenceStatus, DEFAULT_MESSAGE_TYPE, DEFAULT_ROLE, JoinReceipt, Message, MessageBatch,
    Participant, ParticipantMap, ParticipantStatus, PostReceipt,
};
pub use quorum::{QuorumOptions, QuorumOutcome, wait_for_quorum};
pub use table::ConferenceTable;
