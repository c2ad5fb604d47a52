use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread;

use tracing::warn;

use crate::backend::BackendClient;
use crate::error::BackendError;
use crate::track::Track;

pub type FetchResult = Result<Vec<Track>, BackendError>;

/// Fetches scrobble lists off the UI thread, one request at a time.
pub struct ScrobbleFetcher {
    client: Arc<BackendClient>,
    tx: Sender<FetchResult>,
    rx: Receiver<FetchResult>,
    in_flight: bool,
}

impl ScrobbleFetcher {
    pub fn new(client: BackendClient) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            client: Arc::new(client),
            tx,
            rx,
            in_flight: false,
        }
    }

    /// Start fetching `username`'s scrobbles. Returns `false` when nothing was
    /// started: no username, or a fetch is already running.
    pub fn start(&mut self, username: &str) -> bool {
        let username = username.trim().to_string();
        if username.is_empty() || self.in_flight {
            return false;
        }
        self.in_flight = true;

        let client = Arc::clone(&self.client);
        let tx = self.tx.clone();
        thread::spawn(move || {
            let result = client.fetch_scrobbles(&username);
            if let Err(e) = &result {
                warn!(user = %username, error = %e, "scrobble fetch failed");
            }
            let _ = tx.send(result);
        });
        true
    }

    /// The finished fetch, if one completed since the last call.
    pub fn try_take(&mut self) -> Option<FetchResult> {
        let result = self.rx.try_recv().ok()?;
        self.in_flight = false;
        Some(result)
    }
}
