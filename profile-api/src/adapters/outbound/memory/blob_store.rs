//! In-memory blob store for tests.

use std::{
    collections::HashMap,
    io,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, RwLock,
    },
};

use async_trait::async_trait;

use crate::domain::{
    ports::outbound::{validate_key, BlobStore},
    StorageError,
};

#[derive(Clone, Default)]
pub struct MemoryBlobStore {
    objects: Arc<RwLock<HashMap<String, Vec<u8>>>>,
    calls: Arc<AtomicUsize>,
    fail_writes: bool,
    fail_deletes: bool,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_object(self, key: &str, contents: Vec<u8>) -> Self {
        self.objects
            .write()
            .unwrap()
            .insert(key.to_string(), contents);
        self
    }

    /// Makes every `put` fail with an I/O error.
    pub fn failing_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    /// Makes every `delete` fail with an I/O error.
    pub fn failing_deletes(mut self) -> Self {
        self.fail_deletes = true;
        self
    }

    pub fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.objects.read().unwrap().get(key).cloned()
    }

    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<_> = self.objects.read().unwrap().keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Number of storage operations performed so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn record_call(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    fn namespace(&self) -> &str {
        "memory"
    }

    async fn exists(&self, key: &str) -> Result<bool, StorageError> {
        self.record_call();
        validate_key(key)?;
        Ok(self.objects.read().unwrap().contains_key(key))
    }

    async fn put(&self, key: &str, contents: Vec<u8>) -> Result<(), StorageError> {
        self.record_call();
        validate_key(key)?;
        if self.fail_writes {
            return Err(StorageError::io(
                key,
                io::Error::new(io::ErrorKind::Other, "disk full"),
            ));
        }
        self.objects
            .write()
            .unwrap()
            .insert(key.to_string(), contents);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        self.record_call();
        validate_key(key)?;
        if self.fail_deletes {
            return Err(StorageError::io(
                key,
                io::Error::new(io::ErrorKind::PermissionDenied, "read-only"),
            ));
        }
        self.objects.write().unwrap().remove(key);
        Ok(())
    }

    fn url(&self, key: &str) -> String {
        format!("memory://{key}")
    }
}
