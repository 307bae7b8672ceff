//! Directory ingestion
//!
//! Uploads every image file found directly inside a local directory and
//! records it in the metadata table. Subdirectories are not visited.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use bytes::Bytes;
use chrono::Utc;
use memex_core::{IngestConfig, MediaRecord};
use memex_db::{MediaTable, TableError};
use memex_storage::{keys, Storage, StorageError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("directory does not exist: {}", .0.display())]
    MissingDirectory(PathBuf),

    #[error("failed to list {}: {error}", path.display())]
    ReadDir {
        path: PathBuf,
        error: std::io::Error,
    },
}

/// Failure for one file. The walk carries on.
#[derive(Debug, Error)]
pub enum IngestFileError {
    #[error("failed to read file: {0}")]
    Read(std::io::Error),

    #[error("failed to upload: {0}")]
    Upload(StorageError),

    /// The object was uploaded but has no catalog record.
    #[error("failed to record metadata: {0}")]
    Record(TableError),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestReport {
    pub files_seen: usize,
    pub ingested: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Content type for a supported image extension, `None` for anything else.
pub fn content_type_for_path(path: &Path) -> Option<&'static str> {
    let extension = path.extension()?.to_str()?.to_ascii_lowercase();
    match extension.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "gif" => Some("image/gif"),
        _ => None,
    }
}

pub struct DirectoryIngest {
    storage: Arc<dyn Storage>,
    table: Arc<dyn MediaTable>,
    source_prefix: String,
    uploaded_by: String,
}

impl DirectoryIngest {
    pub fn new(
        storage: Arc<dyn Storage>,
        table: Arc<dyn MediaTable>,
        source_prefix: impl Into<String>,
        uploaded_by: impl Into<String>,
    ) -> Self {
        Self {
            storage,
            table,
            source_prefix: source_prefix.into(),
            uploaded_by: uploaded_by.into(),
        }
    }

    pub fn from_config(
        storage: Arc<dyn Storage>,
        table: Arc<dyn MediaTable>,
        source_prefix: impl Into<String>,
        config: &IngestConfig,
    ) -> Self {
        Self::new(storage, table, source_prefix, config.uploaded_by.clone())
    }

    #[tracing::instrument(skip(self), fields(dir = %dir.display()))]
    pub async fn run(&self, dir: &Path) -> Result<IngestReport, IngestError> {
        if !tokio::fs::metadata(dir)
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false)
        {
            return Err(IngestError::MissingDirectory(dir.to_path_buf()));
        }

        let files = list_files(dir).await?;
        let mut report = IngestReport {
            files_seen: files.len(),
            ..Default::default()
        };

        for path in files {
            let Some(content_type) = content_type_for_path(&path) else {
                tracing::debug!(path = %path.display(), "Skipping unsupported file type");
                report.skipped += 1;
                continue;
            };

            match self.ingest_file(&path, content_type).await {
                Ok(file_key) => {
                    tracing::info!(path = %path.display(), file_key = %file_key, "File ingested");
                    report.ingested += 1;
                }
                Err(e) => {
                    tracing::error!(error = %e, path = %path.display(), "Failed to ingest file");
                    report.failed += 1;
                }
            }
        }

        tracing::info!(
            files_seen = report.files_seen,
            ingested = report.ingested,
            skipped = report.skipped,
            failed = report.failed,
            "Directory ingest completed"
        );
        Ok(report)
    }

    /// Upload one file and record it. Returns the new `fileKey`.
    pub async fn ingest_file(
        &self,
        path: &Path,
        content_type: &str,
    ) -> Result<String, IngestFileError> {
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let data = tokio::fs::read(path).await.map_err(IngestFileError::Read)?;

        let now = Utc::now();
        let file_key = keys::source_key(&self.source_prefix, now.timestamp(), &filename);

        self.storage
            .put_object(&file_key, Bytes::from(data), content_type)
            .await
            .map_err(IngestFileError::Upload)?;

        let record = MediaRecord::new_image(file_key.clone(), self.uploaded_by.clone(), now);
        self.table
            .put_record(&record)
            .await
            .map_err(IngestFileError::Record)?;

        Ok(file_key)
    }
}

/// Regular files directly inside `dir`, sorted by name.
async fn list_files(dir: &Path) -> Result<Vec<PathBuf>, IngestError> {
    let read_dir_error = |error| IngestError::ReadDir {
        path: dir.to_path_buf(),
        error,
    };

    let mut entries = tokio::fs::read_dir(dir).await.map_err(read_dir_error)?;
    let mut files = Vec::new();
    while let Some(entry) = entries.next_entry().await.map_err(read_dir_error)? {
        let is_file = entry
            .file_type()
            .await
            .map(|file_type| file_type.is_file())
            .unwrap_or(false);
        if is_file {
            files.push(entry.path());
        }
    }
    files.sort();
    Ok(files)
}
