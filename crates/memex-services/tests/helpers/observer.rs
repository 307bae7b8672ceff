use std::sync::Mutex;

use memex_services::{BackfillEvent, BackfillObserver};

/// Keeps every event so tests can assert on them.
#[derive(Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<BackfillEvent>>,
}

impl RecordingObserver {
    pub fn events(&self) -> Vec<BackfillEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn failed_keys(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                BackfillEvent::ItemFailed { file_key, .. } => Some(file_key),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        self.events.lock().unwrap().clear();
    }
}

impl BackfillObserver for RecordingObserver {
    fn on_event(&self, event: &BackfillEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}
