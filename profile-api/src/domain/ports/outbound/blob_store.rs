use async_trait::async_trait;

use crate::domain::StorageError;

/// Key-value storage for binary objects, scoped to one namespace
/// (for example the `public` disk).
///
/// Keys are relative `/`-separated paths such as `avatars/7.jpg`.
#[async_trait]
pub trait BlobStore: Send + Sync + 'static {
    fn namespace(&self) -> &str;

    async fn exists(&self, key: &str) -> Result<bool, StorageError>;

    /// Writes `contents` under `key`, replacing any existing object.
    async fn put(&self, key: &str, contents: Vec<u8>) -> Result<(), StorageError>;

    async fn delete(&self, key: &str) -> Result<(), StorageError>;

    /// Public URL under which the object at `key` is served.
    fn url(&self, key: &str) -> String;
}

/// Rejects keys that are empty, absolute, or would leave the namespace.
pub fn validate_key(key: &str) -> Result<(), StorageError> {
    let invalid = key.is_empty()
        || key.starts_with('/')
        || key.contains('\\')
        || key.contains('\0')
        || key
            .split('/')
            .any(|segment| segment.is_empty() || segment == "." || segment == "..");

    if invalid {
        return Err(StorageError::InvalidKey(key.to_string()));
    }

    Ok(())
}
