use async_trait::async_trait;

use crate::domain::{
    models::{ProfileChanges, UserId, UserProfile},
    ProfileError,
};

/// Answers whether a username is already held by someone else.
#[async_trait]
pub trait UsernameLookup: Send + Sync {
    async fn is_username_taken(&self, username: &str, except: UserId)
        -> Result<bool, ProfileError>;
}

#[async_trait]
pub trait ProfileRepository: UsernameLookup + 'static {
    async fn get_profile(&self, user_id: &UserId) -> Result<Option<UserProfile>, ProfileError>;

    /// Writes the changed columns and returns the updated record.
    async fn update_profile(
        &self,
        user_id: &UserId,
        changes: &ProfileChanges,
    ) -> Result<UserProfile, ProfileError>;
}
