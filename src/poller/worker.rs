use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use tracing::{debug, warn};

use super::jobs::{ActiveJobsSnapshot, JobsSource};

/// Counters kept so that a backend that keeps failing can be noticed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PollStats {
    pub successes: u64,
    pub failures: u64,
    pub consecutive_failures: u64,
    pub last_error: Option<String>,
}

struct Shared {
    source: Arc<dyn JobsSource>,
    snapshot: Mutex<ActiveJobsSnapshot>,
    stats: Mutex<PollStats>,
}

impl Shared {
    /// One tick: replace the snapshot on success, keep it on failure.
    fn poll(&self) -> bool {
        match self.source.fetch_active_jobs() {
            Ok(jobs) => {
                debug!(active = jobs.len(), "polled active jobs");
                if let Ok(mut snapshot) = self.snapshot.lock() {
                    *snapshot = ActiveJobsSnapshot { jobs };
                }
                if let Ok(mut stats) = self.stats.lock() {
                    stats.successes += 1;
                    stats.consecutive_failures = 0;
                }
                true
            }
            Err(e) => {
                if let Ok(mut stats) = self.stats.lock() {
                    stats.failures += 1;
                    stats.consecutive_failures += 1;
                    stats.last_error = Some(e.to_string());
                    warn!(
                        error = %e,
                        consecutive = stats.consecutive_failures,
                        "failed to fetch active jobs"
                    );
                }
                false
            }
        }
    }
}

/// Periodically republishes the backend's active download jobs.
///
/// The timer thread started by [`JobStatusPoller::spawn`] stops when the
/// poller is dropped, after finishing any fetch already in flight.
pub struct JobStatusPoller {
    shared: Arc<Shared>,
    stop: Option<Sender<()>>,
}

impl JobStatusPoller {
    /// A poller without a timer.
    ///
    /// Ticks only happen through [`poll_once`](Self::poll_once).
    pub fn new(source: Arc<dyn JobsSource>) -> Self {
        Self {
            shared: Arc::new(Shared {
                source,
                snapshot: Mutex::new(ActiveJobsSnapshot::default()),
                stats: Mutex::new(PollStats::default()),
            }),
            stop: None,
        }
    }

    /// Start polling every `interval`, with a first fetch right away.
    pub fn spawn(source: Arc<dyn JobsSource>, interval: Duration) -> Self {
        let mut poller = Self::new(source);
        let (stop_tx, stop_rx) = mpsc::channel::<()>();
        let shared = Arc::clone(&poller.shared);

        // Detached: a fetch in flight can block for the whole HTTP timeout,
        // and dropping the poller should not wait for it.
        thread::spawn(move || {
            shared.poll();
            loop {
                match stop_rx.recv_timeout(interval) {
                    Err(RecvTimeoutError::Timeout) => {
                        shared.poll();
                    }
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }
            }
            debug!("job poller stopped");
        });

        poller.stop = Some(stop_tx);
        poller
    }

    /// Run a single tick on the calling thread. Returns whether it succeeded.
    pub fn poll_once(&self) -> bool {
        self.shared.poll()
    }

    pub fn snapshot(&self) -> ActiveJobsSnapshot {
        self.shared
            .snapshot
            .lock()
            .map(|s| s.clone())
            .unwrap_or_default()
    }

    pub fn stats(&self) -> PollStats {
        self.shared
            .stats
            .lock()
            .map(|s| s.clone())
            .unwrap_or_default()
    }
}

impl Drop for JobStatusPoller {
    fn drop(&mut self) {
        // The thread sees this after any fetch in flight returns.
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
    }
}
