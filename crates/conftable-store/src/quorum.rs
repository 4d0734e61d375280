//! Waiting for enough agents to be seated.
//!
//! There is no push notification from any table, so [`wait_for_quorum`]
//! polls [`ConferenceTable::status`] on an interval until the participant
//! count reaches the target, the timeout elapses, or the caller cancels.

use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::error::StoreResult;
use crate::table::ConferenceTable;

/// Parameters for [`wait_for_quorum`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuorumOptions {
    /// Number of known participants (active or concluded) to wait for.
    pub expected: usize,
    /// Give up after this long.
    pub timeout: Duration,
    /// Delay between status checks.
    pub poll_interval: Duration,
}

impl Default for QuorumOptions {
    fn default() -> Self {
        Self {
            expected: 2,
            timeout: Duration::from_secs(120),
            poll_interval: Duration::from_secs(2),
        }
    }
}

/// How a [`wait_for_quorum`] call ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuorumOutcome {
    /// At least the expected number of participants were present.
    Reached { participants: usize },
    TimedOut,
    Cancelled,
}

impl QuorumOutcome {
    pub fn is_reached(&self) -> bool {
        matches!(self, Self::Reached { .. })
    }
}

/// Poll `table` until it holds at least `options.expected` participants.
///
/// The first check happens immediately. Store errors end the wait and are
/// returned to the caller.
pub async fn wait_for_quorum<T>(
    table: &T,
    self_id: &str,
    options: &QuorumOptions,
    cancel: &CancellationToken,
) -> StoreResult<QuorumOutcome>
where
    T: ConferenceTable + ?Sized,
{
    let deadline = Instant::now() + options.timeout;

    loop {
        if cancel.is_cancelled() {
            return Ok(QuorumOutcome::Cancelled);
        }

        let present = table.status().await?.participants.len();
        if present >= options.expected {
            info!(self_id, present, expected = options.expected, "quorum reached");
            return Ok(QuorumOutcome::Reached {
                participants: present,
            });
        }

        let now = Instant::now();
        if now >= deadline {
            info!(self_id, present, expected = options.expected, "quorum wait timed out");
            return Ok(QuorumOutcome::TimedOut);
        }

        debug!(self_id, present, expected = options.expected, "waiting for quorum");
        let nap = options.poll_interval.min(deadline - now);
        tokio::select! {
            _ = cancel.cancelled() => return Ok(QuorumOutcome::Cancelled),
            _ = tokio::time::sleep(nap) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::memory::MemoryConference;
    use crate::model::DEFAULT_ROLE;

    fn fast(expected: usize, timeout_ms: u64) -> QuorumOptions {
        QuorumOptions {
            expected,
            timeout: Duration::from_millis(timeout_ms),
            poll_interval: Duration::from_millis(10),
        }
    }

    #[test]
    fn defaults_match_documented_values() {
        let options = QuorumOptions::default();
        assert_eq!(options.expected, 2);
        assert_eq!(options.timeout, Duration::from_secs(120));
        assert_eq!(options.poll_interval, Duration::from_secs(2));
    }

    #[tokio::test]
    async fn reached_immediately_when_seated() {
        let table = MemoryConference::new();
        table.join("a", DEFAULT_ROLE).await.unwrap();
        table.join("b", DEFAULT_ROLE).await.unwrap();

        let outcome = wait_for_quorum(&table, "a", &fast(2, 50), &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(outcome, QuorumOutcome::Reached { participants: 2 });
    }

    #[tokio::test]
    async fn concluded_agents_still_count() {
        let table = MemoryConference::new();
        table.join("a", DEFAULT_ROLE).await.unwrap();
        table.join("b", DEFAULT_ROLE).await.unwrap();
        table.conclude("b", "done").await.unwrap();

        let outcome = wait_for_quorum(&table, "a", &fast(2, 50), &CancellationToken::new())
            .await
            .unwrap();
        assert!(outcome.is_reached());
    }

    #[tokio::test]
    async fn times_out_when_alone() {
        let table = MemoryConference::new();
        table.join("a", DEFAULT_ROLE).await.unwrap();

        let outcome = wait_for_quorum(&table, "a", &fast(2, 60), &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(outcome, QuorumOutcome::TimedOut);
    }

    #[tokio::test]
    async fn reached_after_late_join() {
        let table = Arc::new(MemoryConference::new());
        table.join("a", DEFAULT_ROLE).await.unwrap();

        let late = Arc::clone(&table);
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(30)).await;
            late.join("b", DEFAULT_ROLE).await.unwrap();
        });

        let outcome = wait_for_quorum(
            table.as_ref(),
            "a",
            &fast(2, 2_000),
            &CancellationToken::new(),
        )
        .await
        .unwrap();
        assert!(outcome.is_reached());
    }

    #[tokio::test]
    async fn cancellation_ends_wait() {
        let table = MemoryConference::new();
        let cancel = CancellationToken::new();

        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            trigger.cancel();
        });

        let options = QuorumOptions {
            expected: 2,
            timeout: Duration::from_secs(30),
            poll_interval: Duration::from_secs(5),
        };
        let outcome = wait_for_quorum(&table, "a", &options, &cancel).await.unwrap();
        assert_eq!(outcome, QuorumOutcome::Cancelled);
    }

    #[tokio::test]
    async fn works_through_trait_object() {
        let table: Box<dyn ConferenceTable> = Box::new(MemoryConference::new());
        table.join("a", DEFAULT_ROLE).await.unwrap();

        let outcome = wait_for_quorum(table.as_ref(), "a", &fast(1, 50), &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(outcome, QuorumOutcome::Reached { participants: 1 });
    }
}
