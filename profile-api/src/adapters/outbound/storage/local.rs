use std::{io::ErrorKind, path::PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tracing::{debug, info};

use crate::domain::{
    ports::outbound::{validate_key, BlobStore},
    StorageError,
};

/// Blob store kept as plain files under a root directory.
#[derive(Debug, Clone)]
pub struct LocalDiskBlobStore {
    namespace: String,
    root: PathBuf,
    public_url: String,
}

impl LocalDiskBlobStore {
    pub fn new(
        namespace: impl Into<String>,
        root: impl Into<PathBuf>,
        public_url: impl Into<String>,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            root: root.into(),
            public_url: public_url.into(),
        }
    }

    pub async fn initialize(&self) -> Result<(), StorageError> {
        fs::create_dir_all(&self.root)
            .await
            .map_err(|err| StorageError::io(self.root.display().to_string(), err))?;

        info!(
            "Blob store '{}' initialized at: {}",
            self.namespace,
            self.root.display()
        );
        Ok(())
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        validate_key(key)?;
        Ok(self.root.join(key))
    }
}

#[async_trait]
impl BlobStore for LocalDiskBlobStore {
    fn namespace(&self) -> &str {
        &self.namespace
    }

    async fn exists(&self, key: &str) -> Result<bool, StorageError> {
        let path = self.path_for(key)?;
        fs::try_exists(&path)
            .await
            .map_err(|err| StorageError::io(key, err))
    }

    async fn put(&self, key: &str, contents: Vec<u8>) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|err| StorageError::io(key, err))?;
        }

        fs::write(&path, &contents)
            .await
            .map_err(|err| StorageError::io(key, err))?;

        debug!(key, bytes = contents.len(), "stored blob");
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path).await {
            Ok(()) => {
                debug!(key, "deleted blob");
                Ok(())
            }
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(StorageError::io(key, err)),
        }
    }

    fn url(&self, key: &str) -> String {
        format!("{}/{}", self.public_url.trim_end_matches('/'), key)
    }
}
