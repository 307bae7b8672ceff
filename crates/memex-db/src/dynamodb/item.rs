//! Item codec
//!
//! Converts between DynamoDB attribute maps and `MediaRecord`. This is the
//! only place that knows about `AttributeValue` wrappers.

use std::collections::HashMap;

use aws_sdk_dynamodb::types::AttributeValue;
use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use memex_core::MediaRecord;

use crate::error::{TableError, TableResult};
use crate::table::{RecordError, ScanCursor};

pub const ATTR_FILE_KEY: &str = "fileKey";
pub const ATTR_FILE_TYPE: &str = "fileType";
pub const ATTR_UPLOAD_DATE: &str = "uploadDate";
pub const ATTR_UPLOADED_BY: &str = "uploadedBy";
pub const ATTR_PINNED: &str = "pinned";
pub const ATTR_PREVIEW_KEY: &str = "previewKey";

pub type Item = HashMap<String, AttributeValue>;

fn string_attr(item: &Item, name: &str) -> Option<String> {
    item.get(name).and_then(|v| v.as_s().ok()).cloned()
}

/// RFC 3339, or a naive ISO-8601 timestamp taken as UTC.
fn parse_upload_date(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

/// `BOOL`, or the legacy string form.
fn parse_pinned(value: Option<&AttributeValue>) -> bool {
    match value {
        Some(AttributeValue::Bool(flag)) => *flag,
        Some(AttributeValue::S(s)) => s.eq_ignore_ascii_case("true"),
        _ => false,
    }
}

/// Any `previewKey` attribute counts as a preview; only strings decode.
fn preview_key_attr(item: &Item, file_key: &str) -> Result<Option<String>, RecordError> {
    match item.get(ATTR_PREVIEW_KEY) {
        None => Ok(None),
        Some(AttributeValue::S(preview_key)) => Ok(Some(preview_key.clone())),
        Some(_) => Err(RecordError::InvalidPreviewKey {
            file_key: file_key.to_string(),
        }),
    }
}

pub fn item_to_record(item: &Item) -> Result<MediaRecord, RecordError> {
    let file_key = string_attr(item, ATTR_FILE_KEY).ok_or(RecordError::MissingFileKey)?;
    let preview_key = preview_key_attr(item, &file_key)?;

    Ok(MediaRecord {
        file_key,
        file_type: string_attr(item, ATTR_FILE_TYPE),
        upload_date: item
            .get(ATTR_UPLOAD_DATE)
            .and_then(|v| v.as_s().ok())
            .and_then(|s| parse_upload_date(s)),
        uploaded_by: string_attr(item, ATTR_UPLOADED_BY),
        pinned: parse_pinned(item.get(ATTR_PINNED)),
        preview_key,
    })
}

/// Decode the result of a point read for `file_key`.
pub fn found_item_to_record(
    file_key: &str,
    found: Option<&Item>,
) -> TableResult<Option<MediaRecord>> {
    found
        .map(|item| {
            item_to_record(item).map_err(|reason| TableError::MalformedRecord {
                file_key: file_key.to_string(),
                reason,
            })
        })
        .transpose()
}

pub fn record_to_item(record: &MediaRecord) -> Item {
    let mut item = Item::new();
    item.insert(
        ATTR_FILE_KEY.to_string(),
        AttributeValue::S(record.file_key.clone()),
    );
    if let Some(file_type) = &record.file_type {
        item.insert(ATTR_FILE_TYPE.to_string(), AttributeValue::S(file_type.clone()));
    }
    if let Some(upload_date) = &record.upload_date {
        item.insert(
            ATTR_UPLOAD_DATE.to_string(),
            AttributeValue::S(upload_date.to_rfc3339_opts(SecondsFormat::Micros, true)),
        );
    }
    if let Some(uploaded_by) = &record.uploaded_by {
        item.insert(
            ATTR_UPLOADED_BY.to_string(),
            AttributeValue::S(uploaded_by.clone()),
        );
    }
    item.insert(ATTR_PINNED.to_string(), AttributeValue::Bool(record.pinned));
    if let Some(preview_key) = &record.preview_key {
        item.insert(
            ATTR_PREVIEW_KEY.to_string(),
            AttributeValue::S(preview_key.clone()),
        );
    }
    item
}

/// `ExclusiveStartKey` for resuming after `cursor`. The table key is `fileKey` alone.
pub fn cursor_to_key(cursor: &ScanCursor) -> Item {
    HashMap::from([(
        ATTR_FILE_KEY.to_string(),
        AttributeValue::S(cursor.last_key().to_string()),
    )])
}

/// Decode a `LastEvaluatedKey`. An empty map means the scan is complete.
pub fn key_to_cursor(key: &Item) -> Option<Result<ScanCursor, RecordError>> {
    if key.is_empty() {
        return None;
    }
    Some(
        string_attr(key, ATTR_FILE_KEY)
            .map(ScanCursor::after)
            .ok_or(RecordError::MissingFileKey),
    )
}
