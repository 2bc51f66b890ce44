use quiz_core::Clock;
use storage::PlayerStateStore;

use crate::error::ChallengeError;

/// Length of the daily-question cooldown window.
pub const CHALLENGE_COOLDOWN_SECS: i64 = 86_400;

/// Gates the daily-question mode: one attempt per 24-hour window, judged
/// against the persisted last-attempt timestamp.
pub struct ChallengeService {
    clock: Clock,
    store: PlayerStateStore,
}

impl ChallengeService {
    #[must_use]
    pub fn new(clock: Clock, store: PlayerStateStore) -> Self {
        Self { clock, store }
    }

    /// Seconds until the user may attempt again; zero when an attempt is
    /// allowed right now.
    ///
    /// # Errors
    ///
    /// Returns `ChallengeError` if the stored timestamp cannot be read.
    pub async fn cooldown_remaining(&self, user_name: &str) -> Result<i64, ChallengeError> {
        let Some(last) = self.store.last_challenge_at(user_name).await? else {
            return Ok(0);
        };
        let elapsed = self.clock.seconds_since(last);
        Ok((CHALLENGE_COOLDOWN_SECS - elapsed).max(0))
    }

    /// Whether the user may attempt the daily question now.
    ///
    /// # Errors
    ///
    /// Returns `ChallengeError` if the stored timestamp cannot be read.
    pub async fn can_attempt(&self, user_name: &str) -> Result<bool, ChallengeError> {
        Ok(self.cooldown_remaining(user_name).await? == 0)
    }

    /// Marks an attempt at the current clock time, opening a new window.
    ///
    /// # Errors
    ///
    /// Returns `ChallengeError` if the write fails.
    pub async fn record_attempt(&self, user_name: &str) -> Result<(), ChallengeError> {
        self.store
            .set_last_challenge_at(user_name, self.clock.now())
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use quiz_core::time::{fixed_clock, fixed_now};
    use std::sync::Arc;
    use storage::repository::InMemoryRepository;

    fn store() -> PlayerStateStore {
        PlayerStateStore::new(Arc::new(InMemoryRepository::new()))
    }

    #[tokio::test]
    async fn fresh_user_may_attempt() {
        let service = ChallengeService::new(fixed_clock(), store());
        assert!(service.can_attempt("alice").await.unwrap());
        assert_eq!(service.cooldown_remaining("alice").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn attempt_starts_the_cooldown() {
        let service = ChallengeService::new(fixed_clock(), store());
        service.record_attempt("alice").await.unwrap();

        assert!(!service.can_attempt("alice").await.unwrap());
        assert_eq!(
            service.cooldown_remaining("alice").await.unwrap(),
            CHALLENGE_COOLDOWN_SECS
        );
        // Other users are unaffected.
        assert!(service.can_attempt("bob").await.unwrap());
    }

    #[tokio::test]
    async fn cooldown_expires_after_a_day() {
        let store = store();
        store.set_last_challenge_at("alice", fixed_now()).await.unwrap();

        let clock = Clock::fixed(fixed_now() + Duration::seconds(CHALLENGE_COOLDOWN_SECS - 1));
        let service = ChallengeService::new(clock, store.clone());
        assert!(!service.can_attempt("alice").await.unwrap());
        assert_eq!(service.cooldown_remaining("alice").await.unwrap(), 1);

        let clock = Clock::fixed(fixed_now() + Duration::seconds(CHALLENGE_COOLDOWN_SECS));
        let service = ChallengeService::new(clock, store);
        assert!(service.can_attempt("alice").await.unwrap());
    }
}
