//! Preview backfill
//!
//! Walks the whole metadata table page by page and gives every record that
//! has no preview yet a chance to get one. A record is eligible when:
//!
//! - `previewKey` is absent,
//! - `fileKey` starts with the source prefix,
//! - the stored object declares an `image/*` content type.
//!
//! Per-record failures are reported and the walk continues; only a failed
//! scan aborts the run. Records that fail stay eligible, so re-running the
//! backfill retries them and leaves finished ones untouched.

pub mod events;

use std::fmt;
use std::sync::Arc;

use memex_core::constants::{IMAGE_CONTENT_TYPE_PREFIX, PREVIEW_CONTENT_TYPE};
use memex_core::{MediaRecord, PreviewConfig};
use memex_db::{MediaTable, RecordError, ScanCursor, TableError};
use memex_processing::{PreviewTransformer, TransformError};
use memex_storage::{keys, Storage, StorageError};
use thiserror::Error;

pub use events::{BackfillEvent, BackfillObserver, TracingObserver};

/// Key layout the backfill works with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackfillPolicy {
    pub source_prefix: String,
    pub preview_folder: String,
}

impl Default for BackfillPolicy {
    fn default() -> Self {
        Self {
            source_prefix: memex_core::constants::SOURCE_PREFIX.to_string(),
            preview_folder: memex_core::constants::PREVIEW_FOLDER.to_string(),
        }
    }
}

impl From<&PreviewConfig> for BackfillPolicy {
    fn from(config: &PreviewConfig) -> Self {
        Self {
            source_prefix: config.source_prefix.clone(),
            preview_folder: config.preview_folder.clone(),
        }
    }
}

/// Why a record was left alone. Not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    PreviewExists,
    /// `previewKey` is present but not a string; it is never overwritten.
    InvalidPreviewKey,
    MissingFileKey,
    OutsideSourcePrefix,
    NotAnImage { content_type: Option<String> },
    RecordNotFound,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::PreviewExists => write!(f, "preview already exists"),
            SkipReason::InvalidPreviewKey => write!(f, "previewKey is not a string"),
            SkipReason::MissingFileKey => write!(f, "record has no fileKey"),
            SkipReason::OutsideSourcePrefix => write!(f, "fileKey outside source prefix"),
            SkipReason::NotAnImage {
                content_type: Some(content_type),
            } => write!(f, "content type {} is not an image", content_type),
            SkipReason::NotAnImage { content_type: None } => write!(f, "no content type"),
            SkipReason::RecordNotFound => write!(f, "record not found"),
        }
    }
}

/// Failure while processing a single record. The record stays eligible.
#[derive(Debug, Error)]
pub enum ItemError {
    #[error("failed to fetch source object: {0}")]
    Fetch(StorageError),

    #[error("failed to build preview: {0}")]
    Decode(TransformError),

    #[error("preview worker did not finish: {0}")]
    Worker(tokio::task::JoinError),

    #[error("failed to store preview: {0}")]
    StoreWrite(StorageError),

    #[error("failed to update record: {0}")]
    TableUpdate(TableError),
}

/// Errors that end a run.
#[derive(Debug, Error)]
pub enum BackfillError {
    #[error("table scan failed: {0}")]
    Scan(TableError),

    #[error("record lookup failed: {0}")]
    Lookup(TableError),
}

#[derive(Debug)]
pub enum ItemOutcome {
    Updated { preview_key: String },
    Skipped(SkipReason),
    Failed(ItemError),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BackfillReport {
    pub pages: usize,
    pub scanned: usize,
    pub updated: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl BackfillReport {
    fn record(&mut self, outcome: &ItemOutcome) {
        match outcome {
            ItemOutcome::Updated { .. } => self.updated += 1,
            ItemOutcome::Skipped(_) => self.skipped += 1,
            ItemOutcome::Failed(_) => self.failed += 1,
        }
    }
}

pub struct PreviewBackfill {
    storage: Arc<dyn Storage>,
    table: Arc<dyn MediaTable>,
    transformer: PreviewTransformer,
    policy: BackfillPolicy,
    observer: Arc<dyn BackfillObserver>,
}

impl PreviewBackfill {
    pub fn new(
        storage: Arc<dyn Storage>,
        table: Arc<dyn MediaTable>,
        policy: BackfillPolicy,
    ) -> Self {
        Self {
            storage,
            table,
            transformer: PreviewTransformer::default(),
            policy,
            observer: Arc::new(TracingObserver),
        }
    }

    pub fn with_transformer(mut self, transformer: PreviewTransformer) -> Self {
        self.transformer = transformer;
        self
    }

    pub fn with_observer(mut self, observer: Arc<dyn BackfillObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn policy(&self) -> &BackfillPolicy {
        &self.policy
    }

    /// Scan the whole table and process every record, one at a time.
    #[tracing::instrument(skip(self), fields(backfill.preview_folder = %self.policy.preview_folder))]
    pub async fn run(&self) -> Result<BackfillReport, BackfillError> {
        let mut report = BackfillReport::default();
        let mut cursor: Option<ScanCursor> = None;

        self.observer.on_event(&BackfillEvent::RunStarted);

        loop {
            let page = self
                .table
                .scan_page(cursor.take())
                .await
                .map_err(BackfillError::Scan)?;

            report.pages += 1;
            report.scanned += page.records.len();
            self.observer.on_event(&BackfillEvent::PageScanned {
                page: report.pages,
                records: page.records.len(),
            });

            for entry in &page.records {
                let outcome = match entry {
                    Ok(record) => self.process_item(record).await,
                    Err(error) => self.skip_malformed(error),
                };
                report.record(&outcome);
            }

            match page.next_cursor {
                Some(next) => cursor = Some(next),
                None => break,
            }
        }

        self.observer.on_event(&BackfillEvent::RunCompleted(report));
        Ok(report)
    }

    /// Load a single record by key and process it.
    pub async fn process_key(&self, file_key: &str) -> Result<ItemOutcome, BackfillError> {
        match self.table.get_record(file_key).await {
            Ok(Some(record)) => Ok(self.process_item(&record).await),
            Ok(None) => Ok(self.skip(Some(file_key), SkipReason::RecordNotFound)),
            Err(TableError::MalformedRecord { reason, .. }) => Ok(self.skip_malformed(&reason)),
            Err(e) => Err(BackfillError::Lookup(e)),
        }
    }

    /// Generate and attach a preview for one record if it is eligible.
    #[tracing::instrument(skip(self, record), fields(file_key = %record.file_key))]
    pub async fn process_item(&self, record: &MediaRecord) -> ItemOutcome {
        let file_key = record.file_key.as_str();

        if record.has_preview() {
            return self.skip(Some(file_key), SkipReason::PreviewExists);
        }
        if file_key.is_empty() {
            return self.skip(None, SkipReason::MissingFileKey);
        }
        if !file_key.starts_with(&self.policy.source_prefix) {
            return self.skip(Some(file_key), SkipReason::OutsideSourcePrefix);
        }

        match self.generate_preview(file_key).await {
            Ok(Ok(preview_key)) => ItemOutcome::Updated { preview_key },
            Ok(Err(reason)) => self.skip(Some(file_key), reason),
            Err(error) => {
                self.observer.on_event(&BackfillEvent::ItemFailed {
                    file_key: file_key.to_string(),
                    error: error.to_string(),
                });
                ItemOutcome::Failed(error)
            }
        }
    }

    /// Fetch, transform, store and record. The inner `Err` is a late skip
    /// decided once the content type is known.
    async fn generate_preview(
        &self,
        file_key: &str,
    ) -> Result<Result<String, SkipReason>, ItemError> {
        let source = self
            .storage
            .get_object(file_key)
            .await
            .map_err(ItemError::Fetch)?;

        let is_image = source
            .content_type
            .as_deref()
            .is_some_and(|content_type| content_type.starts_with(IMAGE_CONTENT_TYPE_PREFIX));
        if !is_image {
            return Ok(Err(SkipReason::NotAnImage {
                content_type: source.content_type,
            }));
        }

        let transformer = self.transformer;
        let data = source.data;
        let preview = tokio::task::spawn_blocking(move || transformer.transform(&data))
            .await
            .map_err(ItemError::Worker)?
            .map_err(ItemError::Decode)?;

        let preview_key = keys::preview_key(&self.policy.preview_folder, file_key);
        let size_bytes = preview.len();
        self.storage
            .put_object(&preview_key, preview, PREVIEW_CONTENT_TYPE)
            .await
            .map_err(ItemError::StoreWrite)?;
        self.observer.on_event(&BackfillEvent::PreviewStored {
            file_key: file_key.to_string(),
            preview_key: preview_key.clone(),
            size_bytes,
        });

        // The preview stays orphaned in the store if this fails.
        self.table
            .set_preview_key(file_key, &preview_key)
            .await
            .map_err(ItemError::TableUpdate)?;
        self.observer.on_event(&BackfillEvent::RecordUpdated {
            file_key: file_key.to_string(),
            preview_key: preview_key.clone(),
        });

        Ok(Ok(preview_key))
    }

    fn skip_malformed(&self, error: &RecordError) -> ItemOutcome {
        match error {
            RecordError::MissingFileKey => self.skip(None, SkipReason::MissingFileKey),
            RecordError::InvalidPreviewKey { file_key } => {
                self.skip(Some(file_key), SkipReason::InvalidPreviewKey)
            }
        }
    }

    fn skip(&self, file_key: Option<&str>, reason: SkipReason) -> ItemOutcome {
        self.observer.on_event(&BackfillEvent::ItemSkipped {
            file_key: file_key.map(str::to_string),
            reason: reason.clone(),
        });
        ItemOutcome::Skipped(reason)
    }
}
