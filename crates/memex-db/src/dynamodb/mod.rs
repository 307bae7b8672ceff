//! DynamoDB media table
//!
//! The table is keyed by `fileKey` alone. Scans are plain paginated scans;
//! the only conditional write is the `previewKey` update.

pub mod item;

use std::time::{Duration, Instant};

use async_trait::async_trait;
use aws_sdk_dynamodb::config::Region;
use aws_sdk_dynamodb::error::{DisplayErrorContext, SdkError};
use aws_sdk_dynamodb::operation::update_item::UpdateItemError;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client;
use aws_smithy_types::timeout::TimeoutConfig;
use memex_core::{MediaRecord, TableConfig};

use crate::error::{TableError, TableResult};
use crate::table::{MediaTable, ScanCursor, ScanPage};
use item::{ATTR_FILE_KEY, ATTR_PREVIEW_KEY};

#[derive(Clone)]
pub struct DynamoDbMediaTable {
    client: Client,
    table_name: String,
    scan_page_size: Option<i32>,
}

impl std::fmt::Debug for DynamoDbMediaTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DynamoDbMediaTable")
            .field("table_name", &self.table_name)
            .field("scan_page_size", &self.scan_page_size)
            .finish()
    }
}

impl DynamoDbMediaTable {
    /// Build a client from a shared `SdkConfig`, applying the table's
    /// region, endpoint and timeout overrides.
    pub fn new(sdk_config: &aws_config::SdkConfig, config: &TableConfig) -> Self {
        let mut builder = aws_sdk_dynamodb::config::Builder::from(sdk_config)
            .region(Region::new(config.region.clone()));

        if let Some(endpoint) = &config.endpoint {
            builder = builder.endpoint_url(endpoint);
        }

        if let Some(timeout_ms) = config.timeout_ms {
            let timeout_config = TimeoutConfig::builder()
                .operation_timeout(Duration::from_millis(timeout_ms))
                .build();
            builder = builder.timeout_config(timeout_config);
        }

        Self {
            client: Client::from_conf(builder.build()),
            table_name: config.table_name.clone(),
            scan_page_size: config.scan_page_size,
        }
    }

    /// Load AWS defaults (credentials chain, retry policy) and build the table.
    pub async fn connect(config: &TableConfig) -> Self {
        let sdk_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .load()
            .await;

        let table = Self::new(&sdk_config, config);
        tracing::info!(
            table = %table.table_name,
            region = %config.region,
            endpoint = ?config.endpoint,
            "Metadata table initialized"
        );
        table
    }

    /// Create from a pre-built client
    pub fn from_client(client: Client, table_name: impl Into<String>) -> Self {
        Self {
            client,
            table_name: table_name.into(),
            scan_page_size: None,
        }
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    fn is_conditional_check_failed(err: &SdkError<UpdateItemError>) -> bool {
        match err {
            SdkError::ServiceError(service_err) => matches!(
                service_err.err(),
                UpdateItemError::ConditionalCheckFailedException(_)
            ),
            _ => false,
        }
    }
}

#[async_trait]
impl MediaTable for DynamoDbMediaTable {
    async fn scan_page(&self, cursor: Option<ScanCursor>) -> TableResult<ScanPage> {
        let start = Instant::now();
        let mut request = self.client.scan().table_name(&self.table_name);

        if let Some(limit) = self.scan_page_size {
            request = request.limit(limit);
        }
        if let Some(cursor) = &cursor {
            request = request.set_exclusive_start_key(Some(item::cursor_to_key(cursor)));
        }

        let response = request.send().await.map_err(|e| {
            let message = DisplayErrorContext(&e).to_string();
            tracing::error!(
                error = %message,
                table = %self.table_name,
                cursor = ?cursor,
                "DynamoDB scan failed"
            );
            TableError::ScanFailed(message)
        })?;

        let records: Vec<_> = response.items().iter().map(item::item_to_record).collect();

        let next_cursor = match response.last_evaluated_key().and_then(item::key_to_cursor) {
            Some(Ok(next)) => Some(next),
            Some(Err(e)) => return Err(TableError::InvalidCursor(e.to_string())),
            None => None,
        };

        tracing::debug!(
            table = %self.table_name,
            items = records.len(),
            has_more = next_cursor.is_some(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "DynamoDB scan page fetched"
        );

        Ok(ScanPage {
            records,
            next_cursor,
        })
    }

    async fn get_record(&self, file_key: &str) -> TableResult<Option<MediaRecord>> {
        let response = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key(ATTR_FILE_KEY, AttributeValue::S(file_key.to_string()))
            .consistent_read(true)
            .send()
            .await
            .map_err(|e| TableError::ReadFailed(DisplayErrorContext(&e).to_string()))?;

        item::found_item_to_record(file_key, response.item())
    }

    async fn set_preview_key(&self, file_key: &str, preview_key: &str) -> TableResult<()> {
        let result = self
            .client
            .update_item()
            .table_name(&self.table_name)
            .key(ATTR_FILE_KEY, AttributeValue::S(file_key.to_string()))
            .update_expression(format!("SET {} = :preview", ATTR_PREVIEW_KEY))
            .condition_expression(format!("attribute_exists({})", ATTR_FILE_KEY))
            .expression_attribute_values(":preview", AttributeValue::S(preview_key.to_string()))
            .send()
            .await;

        match result {
            Ok(_) => {
                tracing::debug!(
                    table = %self.table_name,
                    file_key = %file_key,
                    preview_key = %preview_key,
                    "previewKey set"
                );
                Ok(())
            }
            Err(e) if Self::is_conditional_check_failed(&e) => {
                Err(TableError::ConditionFailed(file_key.to_string()))
            }
            Err(e) => Err(TableError::UpdateFailed(DisplayErrorContext(&e).to_string())),
        }
    }

    async fn put_record(&self, record: &MediaRecord) -> TableResult<()> {
        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(item::record_to_item(record)))
            .send()
            .await
            .map_err(|e| TableError::WriteFailed(DisplayErrorContext(&e).to_string()))?;

        Ok(())
    }
}
