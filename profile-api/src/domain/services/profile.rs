use std::{
    collections::HashMap,
    sync::{Arc, Mutex as StdMutex, PoisonError},
};

use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::Mutex;
use tracing::{info, instrument, warn};

use crate::domain::{
    models::{ProfileChanges, ProfileUpdateRequest, UserId, UserProfile},
    ports::{
        inbound::ProfileService,
        outbound::{BlobStore, ImageCodec, ProfileRepository},
    },
    services::AvatarProcessor,
    validate_profile_update, ProfileError,
};

pub struct ProfileServiceImpl<R, C, S> {
    repository: Arc<R>,
    avatars: AvatarProcessor<C, S>,
    update_locks: StdMutex<HashMap<UserId, Arc<Mutex<()>>>>,
}

impl<R, C, S> ProfileServiceImpl<R, C, S> {
    pub fn new(repository: Arc<R>, avatars: AvatarProcessor<C, S>) -> Self {
        Self {
            repository,
            avatars,
            update_locks: StdMutex::new(HashMap::new()),
        }
    }

    /// Lock serializing updates of one user's profile within this process.
    ///
    /// Entries only the map still references are pruned, so a lock is never
    /// dropped while a request holds or waits on it.
    fn update_lock(&self, user_id: UserId) -> Arc<Mutex<()>> {
        let mut locks = self
            .update_locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        locks.retain(|_, lock| Arc::strong_count(lock) > 1);

        Arc::clone(locks.entry(user_id).or_default())
    }
}

impl<R, C, S> ProfileServiceImpl<R, C, S>
where
    R: ProfileRepository,
    C: ImageCodec,
    S: BlobStore,
{
    /// Clears the avatar column after its file was removed but the update
    /// that should have replaced it failed.
    async fn forget_avatar(&self, current: &UserProfile) {
        let changes = ProfileChanges {
            username: current.username.clone(),
            bio: current.bio.clone(),
            avatar: None,
        };

        if let Err(err) = self.repository.update_profile(&current.id, &changes).await {
            warn!("Failed to clear avatar of user {}: {}", current.id, err);
        }
    }
}

fn avatar_filename(user_id: &UserId) -> String {
    let fingerprint = OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000;
    format!("{}_{fingerprint}.jpg", user_id.as_i32())
}

#[async_trait]
impl<R, C, S> ProfileService for ProfileServiceImpl<R, C, S>
where
    R: ProfileRepository,
    C: ImageCodec,
    S: BlobStore,
{
    async fn get_profile(&self, user_id: &UserId) -> Result<UserProfile, ProfileError> {
        self.repository
            .get_profile(user_id)
            .await?
            .ok_or(ProfileError::NotFound)
    }

    #[instrument(skip(self, request))]
    async fn update_profile(
        &self,
        user_id: &UserId,
        request: ProfileUpdateRequest,
    ) -> Result<UserProfile, ProfileError> {
        let lock = self.update_lock(*user_id);
        let _guard = lock.lock().await;

        let current = self.get_profile(user_id).await?;
        let update = validate_profile_update(request, *user_id, self.repository.as_ref()).await?;

        // Set once the stored avatar file is gone, so the column must not keep
        // pointing at it if the update fails from here on.
        let mut previous_removed = false;
        let avatar = match update.avatar {
            Some(upload) => {
                previous_removed = current.avatar.is_some()
                    && self
                        .avatars
                        .delete_existing(current.avatar.as_deref())
                        .await;

                match self
                    .avatars
                    .process(upload.bytes, &avatar_filename(user_id))
                    .await
                {
                    Ok(asset) => Some(asset.storage_path),
                    Err(err) => {
                        if previous_removed {
                            self.forget_avatar(&current).await;
                        }
                        return Err(err.into());
                    }
                }
            }
            None => current.avatar.clone(),
        };

        let changes = ProfileChanges {
            username: update.username,
            bio: update.bio,
            avatar,
        };

        match self.repository.update_profile(user_id, &changes).await {
            Ok(profile) => {
                info!("Updated profile of user {}", user_id);
                Ok(profile)
            }
            Err(err) => {
                let stored = changes
                    .avatar
                    .as_deref()
                    .filter(|path| Some(*path) != current.avatar.as_deref());
                if stored.is_some() {
                    self.avatars.delete_existing(stored).await;
                }
                if previous_removed {
                    self.forget_avatar(&current).await;
                }
                Err(err)
            }
        }
    }

    fn avatar_url(&self, path: &str) -> String {
        self.avatars.url(path)
    }
}
