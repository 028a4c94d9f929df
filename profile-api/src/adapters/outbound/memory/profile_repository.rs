//! In-memory profile repository for tests.

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, RwLock,
    },
};

use async_trait::async_trait;

use crate::domain::{
    models::{ProfileChanges, UserId, UserProfile},
    ports::outbound::{ProfileRepository, UsernameLookup},
    FieldErrors, ProfileError,
};

#[derive(Clone, Default)]
pub struct MemoryProfileRepository {
    profiles: Arc<RwLock<HashMap<UserId, UserProfile>>>,
    fail_next_update: Arc<AtomicBool>,
}

impl MemoryProfileRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_profile(self, profile: UserProfile) -> Self {
        self.profiles.write().unwrap().insert(profile.id, profile);
        self
    }

    /// Makes the next `update_profile` call fail with a repository error.
    pub fn failing_next_update(self) -> Self {
        self.fail_next_update.store(true, Ordering::SeqCst);
        self
    }

    pub fn profile(&self, user_id: UserId) -> Option<UserProfile> {
        self.profiles.read().unwrap().get(&user_id).cloned()
    }
}

#[async_trait]
impl UsernameLookup for MemoryProfileRepository {
    async fn is_username_taken(
        &self,
        username: &str,
        except: UserId,
    ) -> Result<bool, ProfileError> {
        Ok(self
            .profiles
            .read()
            .unwrap()
            .values()
            .any(|profile| profile.id != except && profile.username == username))
    }
}

#[async_trait]
impl ProfileRepository for MemoryProfileRepository {
    async fn get_profile(&self, user_id: &UserId) -> Result<Option<UserProfile>, ProfileError> {
        Ok(self.profile(*user_id))
    }

    async fn update_profile(
        &self,
        user_id: &UserId,
        changes: &ProfileChanges,
    ) -> Result<UserProfile, ProfileError> {
        if self.fail_next_update.swap(false, Ordering::SeqCst) {
            return Err(ProfileError::repository("connection reset"));
        }

        let mut profiles = self.profiles.write().unwrap();

        // Mirrors the unique index on users.username.
        if profiles
            .values()
            .any(|profile| profile.id != *user_id && profile.username == changes.username)
        {
            let mut errors = FieldErrors::new();
            errors.add("username", "The username has already been taken.");
            return Err(ProfileError::Validation(errors));
        }

        let profile = profiles.get_mut(user_id).ok_or(ProfileError::NotFound)?;
        profile.username = changes.username.clone();
        profile.bio = changes.bio.clone();
        profile.avatar = changes.avatar.clone();

        Ok(profile.clone())
    }
}
