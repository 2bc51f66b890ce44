use std::sync::{Arc, Mutex};

use quiz_core::Clock;
use quiz_core::model::Catalog;
use storage::{PlayerStateStore, Storage};

use crate::challenge_service::ChallengeService;
use crate::error::AppServicesError;
use crate::leaderboard_service::LeaderboardService;
use crate::profile_service::ProfileService;
use crate::sessions::{QuizSession, SessionTiming};

/// Assembles app-facing services around one storage backend and tracks the
/// logged-in user.
#[derive(Clone)]
pub struct AppServices {
    catalog: Arc<Catalog>,
    clock: Clock,
    leaderboard: Arc<LeaderboardService>,
    challenges: Arc<ChallengeService>,
    profiles: Arc<ProfileService>,
    current_user: Arc<Mutex<Option<String>>>,
}

impl AppServices {
    /// Build services backed by `SQLite` storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization fails or the
    /// built-in catalog is malformed.
    pub async fn new_sqlite(db_url: &str, clock: Clock) -> Result<Self, AppServicesError> {
        Self::with_storage(Storage::sqlite(db_url).await?, clock)
    }

    /// Build services on in-memory storage, for tests and prototyping.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if the built-in catalog is malformed.
    pub fn in_memory(clock: Clock) -> Result<Self, AppServicesError> {
        Self::with_storage(Storage::in_memory(), clock)
    }

    fn with_storage(storage: Storage, clock: Clock) -> Result<Self, AppServicesError> {
        // Catalog errors are configuration errors; fail startup, never a run.
        let catalog = Arc::new(Catalog::operating_systems()?);
        let store = PlayerStateStore::from_storage(&storage);

        Ok(Self {
            catalog,
            clock,
            leaderboard: Arc::new(LeaderboardService::new(store.clone())),
            challenges: Arc::new(ChallengeService::new(clock, store.clone())),
            profiles: Arc::new(ProfileService::new(store)),
            current_user: Arc::new(Mutex::new(None)),
        })
    }

    /// Logs a user in, restoring their persisted badges into the ledger.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError::EmptyUserName` for a blank name, or a
    /// storage error if badge restoration fails.
    pub async fn login(&self, user_name: &str) -> Result<(), AppServicesError> {
        if user_name.trim().is_empty() {
            return Err(AppServicesError::EmptyUserName);
        }
        self.leaderboard.login(user_name).await?;

        let mut current = self
            .current_user
            .lock()
            .map_err(|_| AppServicesError::Poisoned)?;
        *current = Some(user_name.to_owned());
        Ok(())
    }

    /// Returns to the login gate.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError::Poisoned` if the user lock is poisoned.
    pub fn logout(&self) -> Result<(), AppServicesError> {
        let mut current = self
            .current_user
            .lock()
            .map_err(|_| AppServicesError::Poisoned)?;
        *current = None;
        Ok(())
    }

    /// The logged-in user, if any.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError::Poisoned` if the user lock is poisoned.
    pub fn current_user(&self) -> Result<Option<String>, AppServicesError> {
        let current = self
            .current_user
            .lock()
            .map_err(|_| AppServicesError::Poisoned)?;
        Ok(current.clone())
    }

    /// Starts a quiz session on the named topic with the standard timing.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError::UnknownTopic` if the catalog has no topic
    /// with that name.
    pub fn start_session(&self, topic_name: &str) -> Result<QuizSession, AppServicesError> {
        let topic = self
            .catalog
            .get(topic_name)
            .ok_or_else(|| AppServicesError::UnknownTopic {
                name: topic_name.to_owned(),
            })?;
        Ok(QuizSession::new(
            topic.clone(),
            SessionTiming::default(),
            self.clock.now(),
        ))
    }

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[must_use]
    pub fn clock(&self) -> Clock {
        self.clock
    }

    #[must_use]
    pub fn leaderboard(&self) -> Arc<LeaderboardService> {
        Arc::clone(&self.leaderboard)
    }

    #[must_use]
    pub fn challenges(&self) -> Arc<ChallengeService> {
        Arc::clone(&self.challenges)
    }

    #[must_use]
    pub fn profiles(&self) -> Arc<ProfileService> {
        Arc::clone(&self.profiles)
    }
}
