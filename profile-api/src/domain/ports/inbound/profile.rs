use async_trait::async_trait;

use crate::domain::{
    models::{ProfileUpdateRequest, UserId, UserProfile},
    ProfileError,
};

/// Inbound port for reading and editing user profiles.
///
/// Callers are expected to be authenticated already; `user_id` is the
/// authenticated user and the subject of the update.
#[async_trait]
pub trait ProfileService: Send + Sync + 'static {
    async fn get_profile(&self, user_id: &UserId) -> Result<UserProfile, ProfileError>;

    /// Validates the request and, if it passes, replaces the avatar (when one
    /// was uploaded) and stores the new username and bio.
    async fn update_profile(
        &self,
        user_id: &UserId,
        request: ProfileUpdateRequest,
    ) -> Result<UserProfile, ProfileError>;

    /// Public URL for a stored avatar path.
    fn avatar_url(&self, path: &str) -> String;
}
