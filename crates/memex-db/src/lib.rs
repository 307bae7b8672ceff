//! Metadata table access
//!
//! `MediaTable` is what the services depend on; `DynamoDbMediaTable` is the
//! production implementation. DynamoDB's typed attribute wrappers never leave
//! the `dynamodb` module.

pub mod dynamodb;
pub mod error;
pub mod table;

pub use dynamodb::DynamoDbMediaTable;
pub use error::{TableError, TableResult};
pub use table::{MediaTable, RecordError, ScanCursor, ScanPage};
