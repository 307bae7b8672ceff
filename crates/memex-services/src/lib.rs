//! Memex Services Layer
//!
//! Orchestration on top of the storage, table and processing crates:
//! the preview backfill and directory ingestion. Services receive their
//! clients as `Arc<dyn ...>` handles and never build them themselves.

pub mod backfill;
pub mod ingest;

pub use backfill::{
    BackfillError, BackfillEvent, BackfillObserver, BackfillPolicy, BackfillReport, ItemError,
    ItemOutcome, PreviewBackfill, SkipReason, TracingObserver,
};
pub use ingest::{
    content_type_for_path, DirectoryIngest, IngestError, IngestFileError, IngestReport,
};
