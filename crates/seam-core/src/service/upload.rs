//! Upload service implementation

use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;

use crate::runtime::runtime;
use crate::service::{UploadProgress, UploadService};

// Nominal size reported when the path cannot be inspected.
const FALLBACK_TOTAL: i64 = 4096;
const CHUNKS: i64 = 4;

/// Uploads in the background, reporting through the host's listener.
///
/// The listener is retained for exactly as long as the task needs to call
/// back; dropping it when the task finishes is what releases the host-side
/// callback entry.
pub struct Uploader {
    next_task: AtomicI64,
}

impl Uploader {
    pub fn new() -> Self {
        Uploader {
            next_task: AtomicI64::new(1),
        }
    }

    fn total_bytes(path: &str) -> i64 {
        match std::fs::metadata(path) {
            Ok(meta) => meta.len() as i64,
            Err(_) => FALLBACK_TOTAL,
        }
    }
}

impl Default for Uploader {
    fn default() -> Self {
        Self::new()
    }
}

impl UploadService for Uploader {
    fn upload(&self, path: &str, listener: Box<dyn UploadProgress>) -> i64 {
        let id = self.next_task.fetch_add(1, Ordering::Relaxed);
        let total = Self::total_bytes(path);
        log::debug!("upload task {id} started for {path:?} ({total} bytes)");

        runtime().spawn(async move {
            let chunk = (total / CHUNKS).max(1);
            let mut sent = 0;
            while sent < total {
                tokio::time::sleep(Duration::from_millis(5)).await;
                sent = (sent + chunk).min(total);
                listener.on_progress(id, sent, total);
            }
            // listener dropped here, ending the host callback's retention
        });

        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    struct RecordingListener {
        events: Arc<Mutex<Vec<(i64, i64, i64)>>>,
    }

    impl UploadProgress for RecordingListener {
        fn on_progress(&self, id: i64, sent: i64, total: i64) {
            self.events.lock().unwrap().push((id, sent, total));
        }
    }

    fn wait_for_completion(events: &Arc<Mutex<Vec<(i64, i64, i64)>>>) -> Vec<(i64, i64, i64)> {
        for _ in 0..400 {
            {
                let events = events.lock().unwrap();
                if let Some(&(_, sent, total)) = events.last() {
                    if sent == total {
                        return events.clone();
                    }
                }
            }
            std::thread::sleep(Duration::from_millis(5));
        }
        panic!("upload never completed");
    }

    #[test]
    fn test_upload_reports_monotonic_progress() {
        let service = Uploader::new();
        let events = Arc::new(Mutex::new(Vec::new()));
        let listener = Box::new(RecordingListener {
            events: Arc::clone(&events),
        });

        let id = service.upload("no-such-file", listener);
        let events = wait_for_completion(&events);

        assert!(events.iter().all(|&(event_id, _, _)| event_id == id));
        assert!(events.windows(2).all(|w| w[0].1 <= w[1].1));
        assert_eq!(events.last().unwrap().2, FALLBACK_TOTAL);
    }

    #[test]
    fn test_upload_sizes_from_the_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&[0u8; 1000]).unwrap();

        let service = Uploader::new();
        let events = Arc::new(Mutex::new(Vec::new()));
        let listener = Box::new(RecordingListener {
            events: Arc::clone(&events),
        });

        service.upload(file.path().to_str().unwrap(), listener);
        let events = wait_for_completion(&events);
        assert_eq!(events.last().unwrap().2, 1000);
    }

    #[test]
    fn test_task_ids_are_distinct() {
        let service = Uploader::new();
        let a = service.upload("a", Box::new(RecordingListener { events: Default::default() }));
        let b = service.upload("b", Box::new(RecordingListener { events: Default::default() }));
        assert_ne!(a, b);
    }
}
