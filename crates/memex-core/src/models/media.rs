use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::FILE_TYPE_IMAGE;

/// One catalog row per ingested file.
///
/// `file_key` is the primary key and also the object store key of the original.
/// `preview_key` is write-once: it is absent until a preview has been stored and
/// is never overwritten afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaRecord {
    pub file_key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upload_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uploaded_by: Option<String>,
    #[serde(default)]
    pub pinned: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview_key: Option<String>,
}

impl MediaRecord {
    /// Record for a freshly ingested image: unpinned and without a preview.
    pub fn new_image(
        file_key: impl Into<String>,
        uploaded_by: impl Into<String>,
        upload_date: DateTime<Utc>,
    ) -> Self {
        Self {
            file_key: file_key.into(),
            file_type: Some(FILE_TYPE_IMAGE.to_string()),
            upload_date: Some(upload_date),
            uploaded_by: Some(uploaded_by.into()),
            pinned: false,
            preview_key: None,
        }
    }

    /// Bare record carrying only its key. Mostly useful in tests and when a
    /// table row has nothing but a primary key.
    pub fn with_key(file_key: impl Into<String>) -> Self {
        Self {
            file_key: file_key.into(),
            file_type: None,
            upload_date: None,
            uploaded_by: None,
            pinned: false,
            preview_key: None,
        }
    }

    pub fn has_preview(&self) -> bool {
        self.preview_key.is_some()
    }
}
