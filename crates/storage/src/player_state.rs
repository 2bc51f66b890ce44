use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::repository::{KeyValueRepository, Storage, StorageError};

// Key shapes kept byte-compatible with the original app's store.
fn badges_key(user_name: &str) -> String {
    format!("earnedBadges_{user_name}")
}

fn last_challenge_key(user_name: &str) -> String {
    format!("lastChallenge_{user_name}")
}

fn profile_image_key(user_name: &str) -> String {
    format!("profileImage_{user_name}")
}

/// Typed accessors over the key-value collaborator for per-user state:
/// earned badges, the daily-challenge timestamp, and the profile image path.
///
/// Badge lists are stored as JSON arrays, timestamps as RFC 3339 strings.
#[derive(Clone)]
pub struct PlayerStateStore {
    kv: Arc<dyn KeyValueRepository>,
}

impl PlayerStateStore {
    #[must_use]
    pub fn new(kv: Arc<dyn KeyValueRepository>) -> Self {
        Self { kv }
    }

    #[must_use]
    pub fn from_storage(storage: &Storage) -> Self {
        Self::new(Arc::clone(&storage.kv))
    }

    /// Badges the user has earned, or an empty list when none are stored.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Serialization` if the stored value is not a
    /// JSON string array.
    pub async fn earned_badges(&self, user_name: &str) -> Result<Vec<String>, StorageError> {
        match self.kv.get(&badges_key(user_name)).await? {
            None => Ok(Vec::new()),
            Some(raw) => serde_json::from_str(&raw)
                .map_err(|e| StorageError::Serialization(e.to_string())),
        }
    }

    /// Replaces the user's stored badge list.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if encoding or the write fails.
    pub async fn set_earned_badges(
        &self,
        user_name: &str,
        badges: &[String],
    ) -> Result<(), StorageError> {
        let raw = serde_json::to_string(badges)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        self.kv.set(&badges_key(user_name), &raw).await
    }

    /// When the user last attempted the daily challenge, if ever.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Serialization` if the stored timestamp cannot
    /// be parsed.
    pub async fn last_challenge_at(
        &self,
        user_name: &str,
    ) -> Result<Option<DateTime<Utc>>, StorageError> {
        match self.kv.get(&last_challenge_key(user_name)).await? {
            None => Ok(None),
            Some(raw) => DateTime::parse_from_rfc3339(&raw)
                .map(|t| Some(t.with_timezone(&Utc)))
                .map_err(|e| StorageError::Serialization(e.to_string())),
        }
    }

    /// Records a daily-challenge attempt at `at`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the write fails.
    pub async fn set_last_challenge_at(
        &self,
        user_name: &str,
        at: DateTime<Utc>,
    ) -> Result<(), StorageError> {
        self.kv
            .set(&last_challenge_key(user_name), &at.to_rfc3339())
            .await
    }

    /// Path of the user's chosen profile image, if one was set.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be reached.
    pub async fn profile_image_path(
        &self,
        user_name: &str,
    ) -> Result<Option<String>, StorageError> {
        self.kv.get(&profile_image_key(user_name)).await
    }

    /// Stores the path of the user's chosen profile image.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the write fails.
    pub async fn set_profile_image_path(
        &self,
        user_name: &str,
        path: &str,
    ) -> Result<(), StorageError> {
        self.kv.set(&profile_image_key(user_name), path).await
    }
}
