//! HTTP response types for profile endpoints.

use serde::Serialize;

use crate::domain::models::UserProfile;

/// Public view of a user's profile.
#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub id: i32,
    pub username: String,
    pub bio: Option<String>,
    /// Blob-store path of the avatar (e.g. `avatars/7_1700000000000.jpg`).
    pub avatar: Option<String>,
    /// Absolute URL the avatar is served from.
    pub avatar_url: Option<String>,
    pub following_count: u32,
    pub followers_count: u32,
    pub bookmarks_count: u32,
}

impl ProfileResponse {
    pub fn new(profile: UserProfile, avatar_url: impl FnOnce(&str) -> String) -> Self {
        Self {
            id: profile.id.as_i32(),
            avatar_url: profile.avatar.as_deref().map(avatar_url),
            username: profile.username,
            bio: profile.bio,
            avatar: profile.avatar,
            following_count: profile.following_count,
            followers_count: profile.followers_count,
            bookmarks_count: profile.bookmarks_count,
        }
    }
}
