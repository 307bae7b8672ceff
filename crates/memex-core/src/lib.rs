//! Memex Core Library
//!
//! This crate provides the catalog domain model, shared constants and the
//! environment-driven configuration used by every Memex component.

pub mod config;
pub mod constants;
pub mod models;

// Re-export commonly used types
pub use config::{Config, IngestConfig, PreviewConfig, StorageConfig, TableConfig};
pub use models::MediaRecord;
