//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::model::{SummaryError, TopicError};
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// Errors emitted by quiz sessions.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("session is not completed")]
    NotCompleted,
    #[error(transparent)]
    Summary(#[from] SummaryError),
}

/// Errors emitted by `LeaderboardService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LeaderboardError {
    #[error("leaderboard state lock poisoned")]
    Poisoned,
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `ChallengeService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ChallengeError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `ProfileService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProfileError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted while assembling or using app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error("no topic named {name:?}")]
    UnknownTopic { name: String },
    #[error("user name cannot be empty")]
    EmptyUserName,
    #[error("app state lock poisoned")]
    Poisoned,
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Topic(#[from] TopicError),
    #[error(transparent)]
    Leaderboard(#[from] LeaderboardError),
}
