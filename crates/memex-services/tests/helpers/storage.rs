use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use memex_storage::{S3Storage, Storage, StorageError, StorageResult, StoredObject};
use object_store::memory::InMemory;
use object_store::path::Path;
use object_store::{ObjectStore, PutOptions, PutPayload};

/// `S3Storage` over an in-memory store that records every call and can be
/// told to fail specific keys.
pub struct TrackingStorage {
    store: Arc<InMemory>,
    inner: S3Storage,
    gets: Mutex<Vec<String>>,
    puts: Mutex<Vec<String>>,
    failing_gets: Mutex<HashSet<String>>,
    failing_puts: Mutex<HashSet<String>>,
}

impl TrackingStorage {
    pub fn new() -> Self {
        let store = Arc::new(InMemory::new());
        Self {
            inner: S3Storage::from_store(store.clone(), "test-bucket"),
            store,
            gets: Mutex::new(Vec::new()),
            puts: Mutex::new(Vec::new()),
            failing_gets: Mutex::new(HashSet::new()),
            failing_puts: Mutex::new(HashSet::new()),
        }
    }

    /// Put an object without it showing up in `puts()`. A `None` content type
    /// stores the object with no attributes at all.
    pub async fn seed(&self, key: &str, data: Bytes, content_type: Option<&str>) {
        match content_type {
            Some(content_type) => self
                .inner
                .put_object(key, data, content_type)
                .await
                .unwrap(),
            None => {
                self.store
                    .put_opts(
                        &Path::from(key),
                        PutPayload::from(data),
                        PutOptions::default(),
                    )
                    .await
                    .unwrap();
            }
        }
    }

    /// Read an object back without it showing up in `gets()`.
    pub async fn peek(&self, key: &str) -> Option<StoredObject> {
        self.inner.get_object(key).await.ok()
    }

    pub fn gets(&self) -> Vec<String> {
        self.gets.lock().unwrap().clone()
    }

    pub fn puts(&self) -> Vec<String> {
        self.puts.lock().unwrap().clone()
    }

    pub fn fail_get(&self, key: &str) {
        self.failing_gets.lock().unwrap().insert(key.to_string());
    }

    /// Fail uploads to every key ending in `suffix` (a full key works too).
    pub fn fail_put(&self, suffix: &str) {
        self.failing_puts.lock().unwrap().insert(suffix.to_string());
    }

    pub fn reset_calls(&self) {
        self.gets.lock().unwrap().clear();
        self.puts.lock().unwrap().clear();
    }
}

impl Default for TrackingStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Storage for TrackingStorage {
    async fn get_object(&self, key: &str) -> StorageResult<StoredObject> {
        self.gets.lock().unwrap().push(key.to_string());
        if self.failing_gets.lock().unwrap().contains(key) {
            return Err(StorageError::DownloadFailed(format!(
                "injected failure for {}",
                key
            )));
        }
        self.inner.get_object(key).await
    }

    async fn put_object(&self, key: &str, data: Bytes, content_type: &str) -> StorageResult<()> {
        self.puts.lock().unwrap().push(key.to_string());
        let fails = self
            .failing_puts
            .lock()
            .unwrap()
            .iter()
            .any(|suffix| key.ends_with(suffix.as_str()));
        if fails {
            return Err(StorageError::UploadFailed(format!(
                "injected failure for {}",
                key
            )));
        }
        self.inner.put_object(key, data, content_type).await
    }
}
