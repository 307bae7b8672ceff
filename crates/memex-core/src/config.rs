//! Configuration module
//!
//! All settings come from the process environment (optionally seeded from a
//! `.env` file). Credentials are not read here: the AWS clients resolve them
//! through the default provider chain.

use std::env;
use std::path::PathBuf;

use crate::constants::{DEFAULT_AWS_REGION, PREVIEW_FOLDER, SOURCE_PREFIX};

const UPLOAD_DIR: &str = "./images";
const UPLOADED_BY: &str = "script_uploader";

/// Object store settings
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StorageConfig {
    pub bucket: String,
    pub region: String,
    /// Custom endpoint for S3-compatible providers (MinIO, LocalStack, ...)
    pub endpoint: Option<String>,
}

/// Metadata table settings
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableConfig {
    pub table_name: String,
    pub region: String,
    pub endpoint: Option<String>,
    /// Operation timeout applied to every table call, if set.
    pub timeout_ms: Option<u64>,
    /// Upper bound on items returned per scan page. Unset lets the table decide.
    pub scan_page_size: Option<i32>,
}

/// Preview pipeline settings
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PreviewConfig {
    pub source_prefix: String,
    pub preview_folder: String,
}

/// Directory ingestion settings
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IngestConfig {
    pub upload_dir: PathBuf,
    pub uploaded_by: String,
}

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    pub storage: StorageConfig,
    pub table: TableConfig,
    pub preview: PreviewConfig,
    pub ingest: IngestConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build the configuration from an arbitrary variable lookup.
    ///
    /// `from_env` is a thin wrapper over this; tests pass a map instead of
    /// mutating the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let region = var("AWS_REGION").unwrap_or_else(|| DEFAULT_AWS_REGION.to_string());

        let storage = StorageConfig {
            bucket: var("S3_BUCKET_NAME")
                .ok_or_else(|| anyhow::anyhow!("S3_BUCKET_NAME must be set"))?,
            region: region.clone(),
            endpoint: var("S3_ENDPOINT"),
        };

        let table = TableConfig {
            table_name: var("DYNAMODB_TABLE_NAME")
                .ok_or_else(|| anyhow::anyhow!("DYNAMODB_TABLE_NAME must be set"))?,
            region,
            endpoint: var("DYNAMODB_ENDPOINT"),
            timeout_ms: var("DYNAMODB_TIMEOUT_MS")
                .map(|v| v.parse::<u64>())
                .transpose()
                .map_err(|_| anyhow::anyhow!("DYNAMODB_TIMEOUT_MS must be a valid number"))?,
            scan_page_size: var("SCAN_PAGE_SIZE")
                .map(|v| v.parse::<i32>())
                .transpose()
                .map_err(|_| anyhow::anyhow!("SCAN_PAGE_SIZE must be a valid number"))?,
        };

        let preview = PreviewConfig {
            source_prefix: var("SOURCE_PREFIX").unwrap_or_else(|| SOURCE_PREFIX.to_string()),
            preview_folder: var("PREVIEW_FOLDER")
                .map(|folder| folder.trim_end_matches('/').to_string())
                .unwrap_or_else(|| PREVIEW_FOLDER.to_string()),
        };

        let ingest = IngestConfig {
            upload_dir: PathBuf::from(var("UPLOAD_DIR").unwrap_or_else(|| UPLOAD_DIR.to_string())),
            uploaded_by: var("UPLOADED_BY").unwrap_or_else(|| UPLOADED_BY.to_string()),
        };

        let config = Config {
            storage,
            table,
            preview,
            ingest,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if let Some(size) = self.table.scan_page_size {
            if size <= 0 {
                return Err(anyhow::anyhow!("SCAN_PAGE_SIZE must be greater than zero"));
            }
        }

        if self.preview.preview_folder.is_empty() {
            return Err(anyhow::anyhow!("PREVIEW_FOLDER cannot be empty"));
        }

        // Previews written into the source prefix would themselves look like originals.
        let preview_prefix = format!("{}/", self.preview.preview_folder);
        if preview_prefix.starts_with(&self.preview.source_prefix)
            || self.preview.source_prefix.starts_with(&preview_prefix)
        {
            return Err(anyhow::anyhow!(
                "PREVIEW_FOLDER '{}' must not overlap SOURCE_PREFIX '{}'",
                self.preview.preview_folder,
                self.preview.source_prefix
            ));
        }

        Ok(())
    }
}
