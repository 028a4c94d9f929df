use std::sync::Arc;

use tracing::{debug, instrument, warn};

use crate::domain::{
    models::{avatar_storage_key, AvatarAsset, AvatarSettings},
    ports::outbound::{validate_key, BlobStore, ImageCodec},
    AvatarError, StorageError,
};

/// Turns uploaded images into fixed-size JPEG avatars in the blob store.
///
/// Every avatar is resized to exactly the configured width and height; the
/// source aspect ratio is not preserved.
pub struct AvatarProcessor<C, S> {
    codec: Arc<C>,
    storage: Arc<S>,
    settings: AvatarSettings,
}

impl<C, S> AvatarProcessor<C, S> {
    pub fn new(codec: Arc<C>, storage: Arc<S>, settings: AvatarSettings) -> Self {
        Self {
            codec,
            storage,
            settings,
        }
    }
}

impl<C: ImageCodec, S: BlobStore> AvatarProcessor<C, S> {
    /// Processes `image` at the configured dimensions and stores it as
    /// `avatars/<target_filename>`, replacing any object already there.
    pub async fn process(
        &self,
        image: Vec<u8>,
        target_filename: &str,
    ) -> Result<AvatarAsset, AvatarError> {
        self.process_with_size(
            image,
            target_filename,
            self.settings.width,
            self.settings.height,
        )
        .await
    }

    #[instrument(skip(self, image), fields(bytes = image.len()))]
    pub async fn process_with_size(
        &self,
        image: Vec<u8>,
        target_filename: &str,
        width: u32,
        height: u32,
    ) -> Result<AvatarAsset, AvatarError> {
        if target_filename.contains('/') {
            return Err(StorageError::InvalidKey(target_filename.to_string()).into());
        }
        let key = avatar_storage_key(target_filename);
        validate_key(&key)?;

        let codec = Arc::clone(&self.codec);
        let quality = self.settings.quality;
        let encoded = tokio::task::spawn_blocking(move || {
            let raster = codec.decode(&image)?;
            let resized = codec.resize_exact(raster, width, height);
            codec.encode_jpeg(&resized, quality)
        })
        .await
        .map_err(|err| AvatarError::Task(err.to_string()))??;

        self.storage.put(&key, encoded).await?;
        debug!(
            namespace = self.storage.namespace(),
            key = %key,
            width,
            height,
            "stored avatar"
        );

        Ok(AvatarAsset {
            storage_path: key,
            width,
            height,
            quality,
        })
    }

    /// Removes a previously stored avatar.
    ///
    /// Returns `true` when there is nothing left to delete: no path was given,
    /// the object does not exist, or it was deleted. Returns `false` only when
    /// the store failed; the failure is logged, never propagated.
    #[instrument(skip(self))]
    pub async fn delete_existing(&self, path: Option<&str>) -> bool {
        let Some(path) = path.filter(|path| !path.is_empty()) else {
            return true;
        };

        match self.storage.exists(path).await {
            Ok(true) => match self.storage.delete(path).await {
                Ok(()) => true,
                Err(err) => {
                    warn!("Failed to delete avatar {}: {}", path, err);
                    false
                }
            },
            Ok(false) => true,
            Err(err) => {
                warn!("Failed to check avatar {}: {}", path, err);
                false
            }
        }
    }

    pub fn url(&self, path: &str) -> String {
        self.storage.url(path)
    }
}

#[cfg(test)]
mod tests {
    use image::{GenericImageView, ImageFormat};

    use super::*;
    use crate::{
        adapters::outbound::{media::DynamicImageCodec, memory::MemoryBlobStore},
        test_support::{encoded_image, png_bytes},
    };

    fn processor(store: &MemoryBlobStore) -> AvatarProcessor<DynamicImageCodec, MemoryBlobStore> {
        AvatarProcessor::new(
            Arc::new(DynamicImageCodec::default()),
            Arc::new(store.clone()),
            AvatarSettings::default(),
        )
    }

    #[tokio::test]
    async fn stores_150_square_jpeg_under_avatars() {
        let store = MemoryBlobStore::new();

        let asset = processor(&store)
            .process(png_bytes(640, 480), "u123.jpg")
            .await
            .unwrap();

        assert_eq!(asset.storage_path, "avatars/u123.jpg");
        assert_eq!((asset.width, asset.height, asset.quality), (150, 150, 90));

        let stored = store.get("avatars/u123.jpg").unwrap();
        assert_eq!(image::guess_format(&stored).unwrap(), ImageFormat::Jpeg);
        assert_eq!(
            image::load_from_memory(&stored).unwrap().dimensions(),
            (150, 150)
        );
    }

    #[tokio::test]
    async fn explicit_dimensions_are_honoured() {
        let store = MemoryBlobStore::new();

        processor(&store)
            .process_with_size(png_bytes(10, 10), "wide.jpg", 300, 100)
            .await
            .unwrap();

        let stored = store.get("avatars/wide.jpg").unwrap();
        assert_eq!(
            image::load_from_memory(&stored).unwrap().dimensions(),
            (300, 100)
        );
    }

    #[tokio::test]
    async fn reprocessing_same_filename_overwrites() {
        let store = MemoryBlobStore::new();
        let processor = processor(&store);

        processor
            .process(png_bytes(30, 30), "u1.jpg")
            .await
            .unwrap();
        let first = store.get("avatars/u1.jpg").unwrap();
        processor
            .process(encoded_image(30, 30, ImageFormat::Jpeg), "u1.jpg")
            .await
            .unwrap();

        assert_eq!(store.keys(), ["avatars/u1.jpg"]);
        assert_ne!(store.get("avatars/u1.jpg").unwrap(), first);
    }

    #[tokio::test]
    async fn undecodable_input_stores_nothing() {
        let store = MemoryBlobStore::new();

        let result = processor(&store).process(b"nope".to_vec(), "u1.jpg").await;

        assert!(matches!(result, Err(AvatarError::Decode(_))));
        assert_eq!(store.calls(), 0);
    }

    #[tokio::test]
    async fn storage_failures_surface_immediately() {
        let store = MemoryBlobStore::new().failing_writes();

        let result = processor(&store).process(png_bytes(5, 5), "u1.jpg").await;

        assert!(matches!(result, Err(AvatarError::Storage(_))));
        assert_eq!(store.calls(), 1);
    }

    #[tokio::test]
    async fn filenames_with_path_segments_are_rejected() {
        let store = MemoryBlobStore::new();
        let processor = processor(&store);

        for name in ["../u1.jpg", "nested/u1.jpg", ""] {
            let result = processor.process(png_bytes(5, 5), name).await;
            assert!(
                matches!(result, Err(AvatarError::Storage(StorageError::InvalidKey(_)))),
                "{name:?} should be rejected"
            );
        }
        assert!(store.keys().is_empty());
    }

    #[tokio::test]
    async fn delete_existing_without_path_does_not_touch_storage() {
        let store = MemoryBlobStore::new();
        let processor = processor(&store);

        assert!(processor.delete_existing(None).await);
        assert!(processor.delete_existing(Some("")).await);
        assert_eq!(store.calls(), 0);
    }

    #[tokio::test]
    async fn delete_existing_of_missing_object_succeeds() {
        let store = MemoryBlobStore::new().failing_deletes();

        assert!(processor(&store).delete_existing(Some("avatars/gone.jpg")).await);
        assert_eq!(store.calls(), 1);
    }

    #[tokio::test]
    async fn delete_existing_removes_present_object() {
        let store = MemoryBlobStore::new().with_object("avatars/old.jpg", vec![1]);

        assert!(processor(&store).delete_existing(Some("avatars/old.jpg")).await);
        assert!(store.get("avatars/old.jpg").is_none());
    }

    #[tokio::test]
    async fn delete_existing_reports_store_failure() {
        let store = MemoryBlobStore::new()
            .with_object("avatars/old.jpg", vec![1])
            .failing_deletes();

        assert!(!processor(&store).delete_existing(Some("avatars/old.jpg")).await);
        assert!(store.get("avatars/old.jpg").is_some());
    }
}
