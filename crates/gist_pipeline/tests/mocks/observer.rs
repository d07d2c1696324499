use std::sync::{Arc, Mutex};

use gist_pipeline::progress::{ProgressEvent, ProgressObserver};

#[derive(Clone, Default)]
pub struct RecordingObserver {
    pub events: Arc<Mutex<Vec<ProgressEvent>>>,
}

impl ProgressObserver for RecordingObserver {
    fn on_event(&self, event: ProgressEvent) {
        self.events.lock().unwrap().push(event);
    }
}
