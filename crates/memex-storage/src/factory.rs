use crate::{S3Storage, Storage, StorageResult};
use memex_core::StorageConfig;
use std::sync::Arc;

/// Create the storage backend described by the configuration
pub fn create_storage(config: &StorageConfig) -> StorageResult<Arc<dyn Storage>> {
    let storage = S3Storage::new(
        config.bucket.clone(),
        config.region.clone(),
        config.endpoint.clone(),
    )?;

    tracing::info!(
        bucket = %config.bucket,
        region = %config.region,
        endpoint = ?config.endpoint,
        "Object storage initialized"
    );

    Ok(Arc::new(storage))
}
