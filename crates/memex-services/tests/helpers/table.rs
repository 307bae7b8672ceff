use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;
use memex_core::MediaRecord;
use memex_db::{MediaTable, RecordError, ScanCursor, ScanPage, TableError, TableResult};

/// In-memory table with fixed-size pages, in insertion order.
///
/// The cursor carries the offset of the next page. Items that do not decode
/// can be inserted with `insert_malformed` and `insert_invalid_preview_key`.
pub struct MockMediaTable {
    page_size: usize,
    items: Mutex<Vec<Result<MediaRecord, RecordError>>>,
    scan_cursors: Mutex<Vec<Option<ScanCursor>>>,
    preview_writes: Mutex<Vec<(String, String)>>,
    put_writes: Mutex<Vec<String>>,
    fail_scan_at_page: Mutex<Option<usize>>,
    failing_updates: Mutex<HashSet<String>>,
    failing_puts: Mutex<HashSet<String>>,
}

impl MockMediaTable {
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            items: Mutex::new(Vec::new()),
            scan_cursors: Mutex::new(Vec::new()),
            preview_writes: Mutex::new(Vec::new()),
            put_writes: Mutex::new(Vec::new()),
            fail_scan_at_page: Mutex::new(None),
            failing_updates: Mutex::new(HashSet::new()),
            failing_puts: Mutex::new(HashSet::new()),
        }
    }

    pub fn insert(&self, record: MediaRecord) {
        self.items.lock().unwrap().push(Ok(record));
    }

    pub fn insert_malformed(&self) {
        self.items
            .lock()
            .unwrap()
            .push(Err(RecordError::MissingFileKey));
    }

    /// An item whose `previewKey` attribute is set but is not a string.
    pub fn insert_invalid_preview_key(&self, file_key: &str) {
        self.items
            .lock()
            .unwrap()
            .push(Err(RecordError::InvalidPreviewKey {
                file_key: file_key.to_string(),
            }));
    }

    pub fn remove(&self, file_key: &str) {
        self.items
            .lock()
            .unwrap()
            .retain(|item| !matches!(item, Ok(record) if record.file_key == file_key));
    }

    pub fn get(&self, file_key: &str) -> Option<MediaRecord> {
        self.items.lock().unwrap().iter().find_map(|item| match item {
            Ok(record) if record.file_key == file_key => Some(record.clone()),
            _ => None,
        })
    }

    pub fn records(&self) -> Vec<MediaRecord> {
        self.items
            .lock()
            .unwrap()
            .iter()
            .filter_map(|item| item.as_ref().ok().cloned())
            .collect()
    }

    pub fn scan_calls(&self) -> usize {
        self.scan_cursors.lock().unwrap().len()
    }

    pub fn scan_cursors(&self) -> Vec<Option<ScanCursor>> {
        self.scan_cursors.lock().unwrap().clone()
    }

    pub fn preview_writes(&self) -> Vec<(String, String)> {
        self.preview_writes.lock().unwrap().clone()
    }

    pub fn put_writes(&self) -> Vec<String> {
        self.put_writes.lock().unwrap().clone()
    }

    /// Fail the scan request for this page (1-based).
    pub fn fail_scan_at_page(&self, page: usize) {
        *self.fail_scan_at_page.lock().unwrap() = Some(page);
    }

    pub fn fail_update(&self, file_key: &str) {
        self.failing_updates
            .lock()
            .unwrap()
            .insert(file_key.to_string());
    }

    /// Fail `put_record` for every key ending in `suffix`. Ingested keys
    /// carry a timestamp, so tests match on the original file name.
    pub fn fail_put_ending_with(&self, suffix: &str) {
        self.failing_puts
            .lock()
            .unwrap()
            .insert(suffix.to_string());
    }

    pub fn reset_calls(&self) {
        self.scan_cursors.lock().unwrap().clear();
        self.preview_writes.lock().unwrap().clear();
        self.put_writes.lock().unwrap().clear();
    }
}

#[async_trait]
impl MediaTable for MockMediaTable {
    async fn scan_page(&self, cursor: Option<ScanCursor>) -> TableResult<ScanPage> {
        let page_number = {
            let mut cursors = self.scan_cursors.lock().unwrap();
            cursors.push(cursor.clone());
            cursors.len()
        };
        if *self.fail_scan_at_page.lock().unwrap() == Some(page_number) {
            return Err(TableError::ScanFailed("injected scan failure".to_string()));
        }

        let offset = match &cursor {
            Some(cursor) => cursor
                .last_key()
                .parse::<usize>()
                .map_err(|e| TableError::InvalidCursor(e.to_string()))?,
            None => 0,
        };

        let items = self.items.lock().unwrap();
        let end = (offset + self.page_size).min(items.len());
        let records = items
            .get(offset..end)
            .map(|slice| slice.to_vec())
            .unwrap_or_default();
        let next_cursor = (end < items.len()).then(|| ScanCursor::after(end.to_string()));

        Ok(ScanPage {
            records,
            next_cursor,
        })
    }

    async fn get_record(&self, file_key: &str) -> TableResult<Option<MediaRecord>> {
        let items = self.items.lock().unwrap();
        for item in items.iter() {
            match item {
                Ok(record) if record.file_key == file_key => return Ok(Some(record.clone())),
                Err(RecordError::InvalidPreviewKey { file_key: key }) if key == file_key => {
                    return Err(TableError::MalformedRecord {
                        file_key: file_key.to_string(),
                        reason: RecordError::InvalidPreviewKey { file_key: key.clone() },
                    });
                }
                _ => {}
            }
        }
        Ok(None)
    }

    async fn set_preview_key(&self, file_key: &str, preview_key: &str) -> TableResult<()> {
        self.preview_writes
            .lock()
            .unwrap()
            .push((file_key.to_string(), preview_key.to_string()));

        if self.failing_updates.lock().unwrap().contains(file_key) {
            return Err(TableError::UpdateFailed("injected update failure".to_string()));
        }

        let mut items = self.items.lock().unwrap();
        let record = items.iter_mut().find_map(|item| match item {
            Ok(record) if record.file_key == file_key => Some(record),
            _ => None,
        });
        match record {
            Some(record) => {
                record.preview_key = Some(preview_key.to_string());
                Ok(())
            }
            None => Err(TableError::ConditionFailed(file_key.to_string())),
        }
    }

    async fn put_record(&self, record: &MediaRecord) -> TableResult<()> {
        self.put_writes
            .lock()
            .unwrap()
            .push(record.file_key.clone());

        let fails = self
            .failing_puts
            .lock()
            .unwrap()
            .iter()
            .any(|suffix| record.file_key.ends_with(suffix.as_str()));
        if fails {
            return Err(TableError::WriteFailed("injected put failure".to_string()));
        }

        self.remove(&record.file_key);
        self.insert(record.clone());
        Ok(())
    }
}
