//! Test helpers: in-memory table and store, event recorder, image fixtures.
//!
//! Run from workspace root: `cargo test -p memex-services`.
#![allow(dead_code)]

pub mod fixtures;
pub mod observer;
pub mod storage;
pub mod table;

use std::sync::Arc;

use bytes::Bytes;
use memex_core::MediaRecord;
use memex_services::{BackfillPolicy, PreviewBackfill};

use observer::RecordingObserver;
use storage::TrackingStorage;
use table::MockMediaTable;

/// Everything a backfill test needs, wired together.
pub struct TestCatalog {
    pub storage: Arc<TrackingStorage>,
    pub table: Arc<MockMediaTable>,
    pub observer: Arc<RecordingObserver>,
}

impl TestCatalog {
    pub fn new(page_size: usize) -> Self {
        Self {
            storage: Arc::new(TrackingStorage::new()),
            table: Arc::new(MockMediaTable::new(page_size)),
            observer: Arc::new(RecordingObserver::default()),
        }
    }

    pub fn backfill(&self) -> PreviewBackfill {
        PreviewBackfill::new(
            self.storage.clone(),
            self.table.clone(),
            BackfillPolicy::default(),
        )
        .with_observer(self.observer.clone())
    }

    /// Store an object and add a bare record for it.
    pub async fn seed(&self, file_key: &str, data: Vec<u8>, content_type: Option<&str>) {
        self.storage
            .seed(file_key, Bytes::from(data), content_type)
            .await;
        self.table.insert(MediaRecord::with_key(file_key));
    }

    pub async fn seed_png(&self, file_key: &str, width: u32, height: u32) {
        self.seed(file_key, fixtures::png(width, height), Some("image/png"))
            .await;
    }
}
