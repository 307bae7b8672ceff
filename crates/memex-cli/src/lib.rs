//! Support code for the `memex` binary: tracing setup, client wiring and
//! catalog listing.

pub mod listing;

use std::sync::Arc;

use anyhow::Context;
use memex_core::Config;
use memex_db::{DynamoDbMediaTable, MediaTable};
use memex_storage::{create_storage, Storage};

/// Object store and metadata table handles built from `config`.
pub struct Clients {
    pub storage: Arc<dyn Storage>,
    pub table: Arc<dyn MediaTable>,
}

pub async fn connect(config: &Config) -> anyhow::Result<Clients> {
    let storage = create_storage(&config.storage).context("Failed to create object store client")?;
    let table = DynamoDbMediaTable::connect(&config.table).await;

    Ok(Clients {
        storage,
        table: Arc::new(table),
    })
}

/// Truncate a string to max_len characters, appending "..." if truncated.
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Initialize tracing for CLI binaries.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
}
