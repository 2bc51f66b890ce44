use std::sync::Mutex;

use quiz_core::model::{LeaderboardEntry, Ledger, QuizSummary};
use storage::PlayerStateStore;

use crate::error::LeaderboardError;

/// Leaderboard and badge ledger behind an explicit service object.
///
/// The ledger itself is in-memory for the process lifetime; earned badge
/// lists are persisted through the key-value collaborator and restored at
/// login.
pub struct LeaderboardService {
    ledger: Mutex<Ledger>,
    store: PlayerStateStore,
}

impl LeaderboardService {
    #[must_use]
    pub fn new(store: PlayerStateStore) -> Self {
        Self {
            ledger: Mutex::new(Ledger::new()),
            store,
        }
    }

    /// Restores the user's persisted badges into the ledger.
    ///
    /// # Errors
    ///
    /// Returns `LeaderboardError` if the stored badge list cannot be read.
    pub async fn login(&self, user_name: &str) -> Result<(), LeaderboardError> {
        let badges = self.store.earned_badges(user_name).await?;
        let mut ledger = self.ledger.lock().map_err(|_| LeaderboardError::Poisoned)?;
        ledger.restore_badges(user_name, badges);
        Ok(())
    }

    /// Records a finished run. When the run earned a new badge, the user's
    /// badge list is persisted. Returns whether a badge was earned.
    ///
    /// # Errors
    ///
    /// Returns `LeaderboardError` if persisting the badge list fails.
    pub async fn record_summary(
        &self,
        user_name: &str,
        summary: &QuizSummary,
    ) -> Result<bool, LeaderboardError> {
        let (earned, badges) = {
            let mut ledger = self.ledger.lock().map_err(|_| LeaderboardError::Poisoned)?;
            let earned = ledger.record_summary(user_name, summary);
            (earned, ledger.badges(user_name))
        };

        if earned {
            self.store.set_earned_badges(user_name, &badges).await?;
        }
        Ok(earned)
    }

    /// Entries sorted by total score descending.
    ///
    /// # Errors
    ///
    /// Returns `LeaderboardError::Poisoned` if the ledger lock is poisoned.
    pub fn standings(&self) -> Result<Vec<LeaderboardEntry>, LeaderboardError> {
        let ledger = self.ledger.lock().map_err(|_| LeaderboardError::Poisoned)?;
        Ok(ledger.standings().to_vec())
    }

    /// Sum of the user's per-topic scores.
    ///
    /// # Errors
    ///
    /// Returns `LeaderboardError::Poisoned` if the ledger lock is poisoned.
    pub fn total_score(&self, user_name: &str) -> Result<u32, LeaderboardError> {
        let ledger = self.ledger.lock().map_err(|_| LeaderboardError::Poisoned)?;
        Ok(ledger.total_score(user_name))
    }

    /// Number of distinct topics the user has finished.
    ///
    /// # Errors
    ///
    /// Returns `LeaderboardError::Poisoned` if the ledger lock is poisoned.
    pub fn topics_completed(&self, user_name: &str) -> Result<usize, LeaderboardError> {
        let ledger = self.ledger.lock().map_err(|_| LeaderboardError::Poisoned)?;
        Ok(ledger.topics_completed(user_name))
    }

    /// Earned badges for a user, in topic-name order.
    ///
    /// # Errors
    ///
    /// Returns `LeaderboardError::Poisoned` if the ledger lock is poisoned.
    pub fn badges(&self, user_name: &str) -> Result<Vec<String>, LeaderboardError> {
        let ledger = self.ledger.lock().map_err(|_| LeaderboardError::Poisoned)?;
        Ok(ledger.badges(user_name))
    }
}
