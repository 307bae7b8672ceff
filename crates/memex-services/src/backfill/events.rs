//! Progress reporting for the backfill.
//!
//! The orchestrator emits `BackfillEvent`s; what happens to them is up to the
//! observer it was built with.

use super::{BackfillReport, SkipReason};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackfillEvent {
    RunStarted,
    PageScanned {
        page: usize,
        records: usize,
    },
    ItemSkipped {
        /// `None` when the table item had no usable `fileKey`.
        file_key: Option<String>,
        reason: SkipReason,
    },
    PreviewStored {
        file_key: String,
        preview_key: String,
        size_bytes: usize,
    },
    RecordUpdated {
        file_key: String,
        preview_key: String,
    },
    ItemFailed {
        file_key: String,
        error: String,
    },
    RunCompleted(BackfillReport),
}

pub trait BackfillObserver: Send + Sync {
    fn on_event(&self, event: &BackfillEvent);
}

/// Default observer: structured `tracing` records.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl BackfillObserver for TracingObserver {
    fn on_event(&self, event: &BackfillEvent) {
        match event {
            BackfillEvent::RunStarted => tracing::info!("Starting preview backfill"),
            BackfillEvent::PageScanned { page, records } => {
                tracing::info!(page, records, "Scanned table page")
            }
            BackfillEvent::ItemSkipped { file_key, reason } => {
                tracing::debug!(file_key = ?file_key, reason = %reason, "Skipping record")
            }
            BackfillEvent::PreviewStored {
                file_key,
                preview_key,
                size_bytes,
            } => tracing::info!(
                file_key = %file_key,
                preview_key = %preview_key,
                size_bytes,
                "Preview uploaded"
            ),
            BackfillEvent::RecordUpdated {
                file_key,
                preview_key,
            } => tracing::info!(
                file_key = %file_key,
                preview_key = %preview_key,
                "Record updated with previewKey"
            ),
            BackfillEvent::ItemFailed { file_key, error } => {
                tracing::error!(file_key = %file_key, error = %error, "Failed to process record")
            }
            BackfillEvent::RunCompleted(report) => tracing::info!(
                pages = report.pages,
                scanned = report.scanned,
                updated = report.updated,
                skipped = report.skipped,
                failed = report.failed,
                "Preview backfill completed"
            ),
        }
    }
}
