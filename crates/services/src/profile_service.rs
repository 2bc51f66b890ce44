use storage::PlayerStateStore;

use crate::error::ProfileError;

/// Per-user profile state: currently just the chosen profile image path.
pub struct ProfileService {
    store: PlayerStateStore,
}

impl ProfileService {
    #[must_use]
    pub fn new(store: PlayerStateStore) -> Self {
        Self { store }
    }

    /// Path of the user's profile image, if one was chosen.
    ///
    /// # Errors
    ///
    /// Returns `ProfileError` if the backend cannot be reached.
    pub async fn image_path(&self, user_name: &str) -> Result<Option<String>, ProfileError> {
        Ok(self.store.profile_image_path(user_name).await?)
    }

    /// Stores the path of the user's chosen profile image.
    ///
    /// # Errors
    ///
    /// Returns `ProfileError` if the write fails.
    pub async fn set_image_path(&self, user_name: &str, path: &str) -> Result<(), ProfileError> {
        Ok(self.store.set_profile_image_path(user_name, path).await?)
    }
}
