use async_trait::async_trait;
use memex_core::MediaRecord;
use thiserror::Error;

use crate::error::TableResult;

/// Resume position for a table scan.
///
/// Opaque to callers: hand back whatever `ScanPage::next_cursor` returned.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ScanCursor(String);

impl ScanCursor {
    /// Cursor positioned after the record with this `fileKey`.
    pub fn after(file_key: impl Into<String>) -> Self {
        Self(file_key.into())
    }

    pub fn last_key(&self) -> &str {
        &self.0
    }
}

/// An item that came back from a scan but is not a usable record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("item has no string fileKey attribute")]
    MissingFileKey,

    /// `previewKey` is set but holds something other than a string.
    #[error("previewKey on {file_key} is not a string")]
    InvalidPreviewKey { file_key: String },
}

/// One bounded batch of a scan.
#[derive(Debug, Default)]
pub struct ScanPage {
    pub records: Vec<Result<MediaRecord, RecordError>>,
    /// `None` on the final page.
    pub next_cursor: Option<ScanCursor>,
}

impl ScanPage {
    pub fn is_last(&self) -> bool {
        self.next_cursor.is_none()
    }
}

/// Metadata table holding one `MediaRecord` per ingested file.
#[async_trait]
pub trait MediaTable: Send + Sync {
    /// Fetch the page that starts after `cursor` (or the first page).
    async fn scan_page(&self, cursor: Option<ScanCursor>) -> TableResult<ScanPage>;

    /// Strongly consistent point read. An item that exists but does not
    /// decode is `TableError::MalformedRecord`.
    async fn get_record(&self, file_key: &str) -> TableResult<Option<MediaRecord>>;

    /// Set `previewKey` on the record, provided the record still exists.
    ///
    /// Only existence is checked: a concurrent writer that set `previewKey`
    /// first is overwritten with the same derived key.
    /// Fails with `TableError::ConditionFailed` when the record is gone.
    async fn set_preview_key(&self, file_key: &str, preview_key: &str) -> TableResult<()>;

    /// Insert or replace a record.
    async fn put_record(&self, record: &MediaRecord) -> TableResult<()>;
}
