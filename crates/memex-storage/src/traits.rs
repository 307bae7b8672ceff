//! Storage abstraction trait
//!
//! This module defines the Storage trait that object store backends implement.

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// A fetched object together with its declared content type.
#[derive(Debug, Clone)]
pub struct StoredObject {
    pub data: Bytes,
    /// `None` when the object was stored without a content type.
    pub content_type: Option<String>,
}

/// Storage abstraction trait
///
/// The catalog only needs whole-object reads and writes by key. Keeping the
/// surface this small lets tests swap in an in-memory store.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Fetch an object and its declared content type.
    async fn get_object(&self, key: &str) -> StorageResult<StoredObject>;

    /// Store `data` under `key` with the given content type, replacing any
    /// existing object.
    async fn put_object(&self, key: &str, data: Bytes, content_type: &str) -> StorageResult<()>;
}
