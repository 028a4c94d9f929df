use serde::Serialize;

use super::{AvatarUpload, UserId};

/// Raw profile fields as submitted by the client, before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileUpdateRequest {
    pub username: Option<String>,
    pub avatar: Option<AvatarUpload>,
    pub bio: Option<String>,
}

impl ProfileUpdateRequest {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
            ..Default::default()
        }
    }

    pub fn with_bio(mut self, bio: impl Into<String>) -> Self {
        self.bio = Some(bio.into());
        self
    }

    pub fn with_avatar(mut self, avatar: AvatarUpload) -> Self {
        self.avatar = Some(avatar);
        self
    }
}

/// A profile update that passed every validation rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedProfileUpdate {
    pub username: String,
    pub avatar: Option<AvatarUpload>,
    pub bio: Option<String>,
}

/// The profile columns of a user record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: UserId,
    pub email: String,
    pub username: String,
    pub bio: Option<String>,
    /// Blob-store key of the current avatar, e.g. `avatars/7_1700000000000.jpg`.
    pub avatar: Option<String>,
    pub following_count: u32,
    pub followers_count: u32,
    pub bookmarks_count: u32,
}

/// Values written back to the user record after a successful update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileChanges {
    pub username: String,
    pub bio: Option<String>,
    pub avatar: Option<String>,
}
