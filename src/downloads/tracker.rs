use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use tracing::{info, warn};

use crate::track::{Track, TrackKey};

use super::status::{DownloadRequest, DownloadStatus, DownloadSubmitter};

#[derive(Debug, Clone, Copy)]
struct Entry {
    status: DownloadStatus,
    /// Request that last wrote `Pending` for this key.
    ticket: u64,
}

#[derive(Default)]
struct Entries {
    by_key: HashMap<TrackKey, Entry>,
    last_ticket: u64,
}

/// Map from track identity to download status.
///
/// A key enters the map on its first request and is never removed.
/// Cloning shares the same map and submitter.
#[derive(Clone)]
pub struct DownloadStatusTracker {
    entries: Arc<Mutex<Entries>>,
    submitter: Arc<dyn DownloadSubmitter>,
}

impl DownloadStatusTracker {
    pub fn new(submitter: Arc<dyn DownloadSubmitter>) -> Self {
        Self {
            entries: Arc::new(Mutex::new(Entries::default())),
            submitter,
        }
    }

    /// Mark `track` pending and submit it on a worker thread.
    ///
    /// The status is `Pending` when this returns. The handle yields the
    /// outcome of this request; callers that only watch `status` can drop it.
    /// Nothing prevents re-requesting a track that already succeeded.
    pub fn request_download(&self, track: &Track) -> JoinHandle<DownloadStatus> {
        let key = track.key();
        let request = DownloadRequest::for_track(track);

        let ticket = match self.entries.lock() {
            Ok(mut entries) => {
                entries.last_ticket += 1;
                let ticket = entries.last_ticket;
                entries.by_key.insert(
                    key.clone(),
                    Entry {
                        status: DownloadStatus::Pending,
                        ticket,
                    },
                );
                ticket
            }
            Err(_) => 0,
        };
        info!(track = %key, "download requested");

        let entries = Arc::clone(&self.entries);
        let submitter = Arc::clone(&self.submitter);
        thread::spawn(move || {
            let outcome = match submitter.submit(&request) {
                Ok(()) => {
                    info!(track = %key, "download accepted");
                    DownloadStatus::Succeeded
                }
                Err(e) => {
                    warn!(track = %key, error = %e, "download submission failed");
                    DownloadStatus::Failed
                }
            };

            if let Ok(mut entries) = entries.lock() {
                match entries.by_key.get_mut(&key) {
                    // A newer request owns the entry now; leave its `Pending` alone.
                    Some(entry) if entry.ticket == ticket => entry.status = outcome,
                    _ => {}
                }
            }
            outcome
        })
    }

    pub fn status(&self, key: &TrackKey) -> DownloadStatus {
        self.entries
            .lock()
            .ok()
            .and_then(|entries| entries.by_key.get(key).map(|e| e.status))
            .unwrap_or_default()
    }
}
