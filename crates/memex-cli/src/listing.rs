//! `memex list`: read-only catalog listing.

use std::fmt::Write;

use memex_core::MediaRecord;
use memex_db::{MediaTable, ScanCursor, TableResult};

/// Scan pages until `limit` matching records are collected or the table ends.
/// Items without a usable `fileKey` are left out.
pub async fn collect_records(
    table: &dyn MediaTable,
    uploaded_by: Option<&str>,
    limit: usize,
) -> TableResult<Vec<MediaRecord>> {
    let mut records = Vec::new();
    let mut cursor: Option<ScanCursor> = None;

    while records.len() < limit {
        let page = table.scan_page(cursor.take()).await?;
        let remaining = limit - records.len();

        records.extend(
            page.records
                .into_iter()
                .filter_map(Result::ok)
                .filter(|record| {
                    uploaded_by.map_or(true, |who| record.uploaded_by.as_deref() == Some(who))
                })
                .take(remaining),
        );

        match page.next_cursor {
            Some(next) => cursor = Some(next),
            None => break,
        }
    }

    Ok(records)
}

pub fn render_table(records: &[MediaRecord]) -> String {
    let mut out = String::new();

    if records.is_empty() {
        out.push_str("No media found.\n");
        return out;
    }

    let _ = writeln!(
        out,
        "{:<48} {:<16} {:<20} {:<6} {:<40}",
        "File Key", "Uploaded By", "Uploaded At", "Pinned", "Preview"
    );
    let _ = writeln!(out, "{}", "-".repeat(134));

    for record in records {
        let uploaded_at = record
            .upload_date
            .map(|at| at.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| "-".to_string());
        let _ = writeln!(
            out,
            "{:<48} {:<16} {:<20} {:<6} {:<40}",
            crate::truncate_string(&record.file_key, 48),
            crate::truncate_string(record.uploaded_by.as_deref().unwrap_or("-"), 16),
            uploaded_at,
            if record.pinned { "yes" } else { "no" },
            crate::truncate_string(record.preview_key.as_deref().unwrap_or("(none)"), 40),
        );
    }

    let _ = writeln!(out, "\n{} records", records.len());
    out
}
