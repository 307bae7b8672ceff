//! Memex Storage Library
//!
//! This crate provides the object store abstraction used by the catalog and
//! its S3 implementation (built on `object_store`, so any `ObjectStore`, such
//! as the in-memory one, can stand in for S3).
//!
//! # Key layout
//!
//! - **Originals**: `images/{unix_seconds}-{original_name}`
//! - **Previews**: `previews/{basename(original_key)}`
//!
//! Key derivation is centralized in the `keys` module.

pub mod factory;
pub mod keys;
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
pub use s3::S3Storage;
pub use traits::{Storage, StorageError, StorageResult, StoredObject};
