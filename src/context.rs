//! The composition root for playback and download status.
//!
//! A [`PlaybackContext`] is created once at startup, passed by reference to
//! whatever drives the UI, and torn down with [`PlaybackContext::shutdown`].
//! Its methods are meant to be called from one thread; background results are
//! folded in by [`PlaybackContext::pump_events`].

use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread::JoinHandle;

use tracing::{debug, info};

use crate::audio::{AudioResource, ResourceEvent, RodioResource, SourceConfig};
use crate::backend::BackendClient;
use crate::config::Settings;
use crate::downloads::{DownloadStatus, DownloadStatusTracker};
use crate::player::{PlaybackController, PlaybackState};
use crate::poller::{ActiveJobsSnapshot, JobStatusPoller, PollStats};
use crate::track::{Track, TrackKey};

pub struct PlaybackContext<R: AudioResource> {
    controller: PlaybackController<R>,
    events: Receiver<ResourceEvent>,
    downloads: DownloadStatusTracker,
    poller: JobStatusPoller,
}

impl PlaybackContext<RodioResource> {
    /// Production wiring: HTTP backend, `rodio` output and a running poller.
    pub fn connect(settings: &Settings) -> Self {
        let backend = Arc::new(BackendClient::new(&settings.backend));

        let (events_tx, events_rx) = mpsc::channel();
        let resource = RodioResource::spawn(
            SourceConfig {
                base_url: settings.backend.base_url.clone(),
                timeout: settings.backend.timeout(),
            },
            events_tx,
        );
        let controller = PlaybackController::new(
            resource,
            settings.backend.audio_route.clone(),
            settings.playback.initial_volume,
        );

        let downloads = DownloadStatusTracker::new(backend.clone());
        let poller = JobStatusPoller::spawn(backend, settings.poller.interval());

        info!(backend = %settings.backend.base_url, "playback context ready");
        Self::new(controller, events_rx, downloads, poller)
    }
}

impl<R: AudioResource> PlaybackContext<R> {
    /// Assemble a context from parts. `events` must be the receiving end of the
    /// channel the controller's resource reports on.
    pub fn new(
        controller: PlaybackController<R>,
        events: Receiver<ResourceEvent>,
        downloads: DownloadStatusTracker,
        poller: JobStatusPoller,
    ) -> Self {
        Self {
            controller,
            events,
            downloads,
            poller,
        }
    }

    /// Apply every resource event received so far. Returns how many were applied
    /// (stale ones are counted out).
    pub fn pump_events(&mut self) -> usize {
        let mut applied = 0;
        loop {
            match self.events.try_recv() {
                Ok(event) => {
                    if self.controller.handle_event(event) {
                        applied += 1;
                    }
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    debug!("audio event channel closed");
                    break;
                }
            }
        }
        applied
    }

    pub fn playback(&self) -> &PlaybackState {
        self.controller.state()
    }

    pub fn play_track(&mut self, track: &Track) {
        self.controller.play_track(track);
    }

    pub fn toggle_play(&mut self) {
        self.controller.toggle_play();
    }

    pub fn seek(&mut self, secs: f64) {
        self.controller.seek(secs);
    }

    pub fn set_volume(&mut self, level: f32) {
        self.controller.set_volume(level);
    }

    pub fn request_download(&self, track: &Track) -> JoinHandle<DownloadStatus> {
        self.downloads.request_download(track)
    }

    pub fn download_status(&self, key: &TrackKey) -> DownloadStatus {
        self.downloads.status(key)
    }

    pub fn active_jobs(&self) -> ActiveJobsSnapshot {
        self.poller.snapshot()
    }

    /// Poll the jobs endpoint now instead of waiting for the next tick.
    pub fn refresh_jobs(&self) -> bool {
        self.poller.poll_once()
    }

    pub fn poll_stats(&self) -> PollStats {
        self.poller.stats()
    }

    /// Stop the poller, then release the audio resource.
    pub fn shutdown(self) {
        let Self {
            controller,
            poller,
            ..
        } = self;
        drop(poller);
        drop(controller);
        info!("playback context shut down");
    }
}
