use std::{collections::BTreeMap, fmt};

use serde::Serialize;
use thiserror::Error;

/// Validation failures keyed by field name, each with one or more
/// human-readable reasons.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: impl Into<String>, reason: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(reason.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, reasons) in &self.0 {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {}", reasons.join(", "))?;
            first = false;
        }
        Ok(())
    }
}

/// Failures of the blob store backing public files.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("invalid storage key: {0:?}")]
    InvalidKey(String),
    #[error("storage operation on {key} failed: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },
}

impl StorageError {
    pub fn io(key: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            key: key.into(),
            source,
        }
    }
}

/// Errors raised while turning an upload into a stored avatar.
#[derive(Debug, Error)]
pub enum AvatarError {
    #[error("unsupported or corrupt image: {0}")]
    Decode(String),
    #[error("failed to encode avatar: {0}")]
    Encode(String),
    #[error("avatar processing task failed: {0}")]
    Task(String),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("the given data was invalid: {0}")]
    Validation(FieldErrors),
    #[error("profile not found")]
    NotFound,
    #[error(transparent)]
    Avatar(#[from] AvatarError),
    #[error("repository error: {0}")]
    Repository(String),
}

impl ProfileError {
    pub fn repository(msg: impl Into<String>) -> Self {
        Self::Repository(msg.into())
    }
}
