use thiserror::Error;

use crate::table::RecordError;

#[derive(Debug, Error)]
pub enum TableError {
    #[error("Scan failed: {0}")]
    ScanFailed(String),

    #[error("Read failed: {0}")]
    ReadFailed(String),

    #[error("Write failed: {0}")]
    WriteFailed(String),

    #[error("Update failed: {0}")]
    UpdateFailed(String),

    /// The conditional update found no record under the key.
    #[error("Record no longer exists: {0}")]
    ConditionFailed(String),

    #[error("Malformed record {file_key}: {reason}")]
    MalformedRecord {
        file_key: String,
        reason: RecordError,
    },

    #[error("Invalid scan cursor: {0}")]
    InvalidCursor(String),
}

pub type TableResult<T> = Result<T, TableError>;
