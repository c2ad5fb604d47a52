use tracing::{debug, error, info, warn};

use crate::audio::{AudioResource, Generation, PlayTicket, ResourceEvent};
use crate::track::{Track, resolve_audio_url};

use super::state::{PlaybackPhase, PlaybackState};

/// Drives one `AudioResource` through the load/play/pause/seek lifecycle.
///
/// Every state change made by a single call is applied before the call
/// returns. Results that arrive later come in through [`handle_event`] and are
/// only applied when they belong to the latest load and, for play results, to
/// the latest transport request.
///
/// [`handle_event`]: PlaybackController::handle_event
pub struct PlaybackController<R: AudioResource> {
    resource: R,
    state: PlaybackState,
    generation: Generation,
    latest_ticket: PlayTicket,
    audio_route: String,
}

impl<R: AudioResource> PlaybackController<R> {
    /// Take ownership of `resource`. `audio_route` is used to derive a URL for
    /// tracks that come without one.
    pub fn new(mut resource: R, audio_route: impl Into<String>, initial_volume: f32) -> Self {
        resource.set_volume(initial_volume);
        Self {
            resource,
            state: PlaybackState {
                volume: initial_volume,
                ..PlaybackState::default()
            },
            generation: Generation::default(),
            latest_ticket: PlayTicket::default(),
            audio_route: audio_route.into(),
        }
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    #[cfg(test)]
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Issue a new transport request id, making every earlier one stale.
    fn issue_ticket(&mut self) -> PlayTicket {
        self.latest_ticket = PlayTicket {
            generation: self.generation,
            seq: self.latest_ticket.seq + 1,
        };
        self.latest_ticket
    }

    /// Play `track`, loading it first unless it is already the current one.
    ///
    /// Tracks are compared by their full `(artist, title)` key. Asking for the
    /// current track while it is not paused does nothing. A current track whose
    /// last attempt failed is loaded again; one that ended is replayed.
    pub fn play_track(&mut self, track: &Track) {
        let key = track.key();
        let same_track = self
            .state
            .current_track
            .as_ref()
            .is_some_and(|current| current.key() == key);

        // After an end or a failure the resource is not actually playing,
        // whatever its last transport request was.
        let settled = matches!(self.state.phase, PlaybackPhase::Ended | PlaybackPhase::Error);
        if same_track && !self.resource.is_paused() && !settled {
            debug!(track = %key, "already playing");
            return;
        }

        if !same_track || self.state.phase == PlaybackPhase::Error {
            let url = resolve_audio_url(track, &self.audio_route);
            if url.is_degraded() {
                warn!(
                    track = %key,
                    url = url.as_str(),
                    "no audio_url for track, using derived url"
                );
            }

            self.generation = self.generation.next();
            info!(
                track = %key,
                url = url.as_str(),
                generation = self.generation.value(),
                "loading track"
            );

            self.state.current_track = Some(track.clone());
            self.state.ready = false;
            self.state.progress_secs = 0.0;
            self.state.duration_secs = 0.0;
            self.state.phase = PlaybackPhase::Loading;
            self.state.last_error = None;
            self.resource.load(url.as_str(), self.generation);
        }

        let ticket = self.issue_ticket();
        self.resource.play(ticket);
    }

    /// Pause when playing, resume otherwise. Does nothing without a current track.
    ///
    /// `playing` flips immediately; a later play failure turns it back off.
    pub fn toggle_play(&mut self) {
        if self.state.current_track.is_none() {
            return;
        }

        if self.state.playing {
            self.issue_ticket();
            self.resource.pause();
            self.state.playing = false;
            self.state.phase = PlaybackPhase::Paused;
        } else {
            let ticket = self.issue_ticket();
            self.resource.play(ticket);
            self.state.playing = true;
            self.state.phase = PlaybackPhase::Playing;
        }
    }

    /// Move the playback position. The resource gets `secs` as is.
    pub fn seek(&mut self, secs: f64) {
        self.resource.seek(secs);
        self.state.set_progress(secs);
    }

    /// Set the output volume. `level` is expected in `[0, 1]` and passed through unchecked.
    pub fn set_volume(&mut self, level: f32) {
        self.resource.set_volume(level);
        self.state.volume = level;
    }

    /// Apply one resource notification. Returns `false` when it was stale and dropped.
    pub fn handle_event(&mut self, event: ResourceEvent) -> bool {
        if event.generation() != self.generation {
            debug!(
                event_generation = event.generation().value(),
                current = self.generation.value(),
                "dropping event from superseded load"
            );
            return false;
        }

        match event {
            ResourceEvent::TimeUpdate { secs, .. } => self.state.set_progress(secs),
            ResourceEvent::DurationChange { secs, .. } => {
                self.state.duration_secs = if secs.is_nan() { 0.0 } else { secs.max(0.0) };
                let progress = self.state.progress_secs;
                self.state.set_progress(progress);
            }
            ResourceEvent::CanPlay { .. } => {
                self.state.ready = true;
                let progress = self.state.progress_secs;
                self.state.set_progress(progress);
                if self.state.phase == PlaybackPhase::Loading {
                    self.state.phase = PlaybackPhase::Ready;
                }
            }
            ResourceEvent::Ended { .. } => {
                self.state.playing = false;
                self.state.progress_secs = 0.0;
                self.state.phase = PlaybackPhase::Ended;
            }
            ResourceEvent::Error { error, .. } => {
                error!(error = %error, "playback failed");
                self.state.playing = false;
                self.state.ready = false;
                self.state.phase = PlaybackPhase::Error;
                self.state.last_error = Some(error.to_string());
            }
            ResourceEvent::PlayResolved(ticket) => {
                if ticket != self.latest_ticket {
                    debug!(seq = ticket.seq, "dropping superseded play result");
                    return false;
                }
                self.state.playing = true;
                self.state.phase = PlaybackPhase::Playing;
                self.state.last_error = None;
            }
            ResourceEvent::PlayRejected { ticket, error } => {
                if ticket != self.latest_ticket {
                    debug!(seq = ticket.seq, "dropping superseded play rejection");
                    return false;
                }
                error!(error = %error, "playback failed");
                self.state.playing = false;
                self.state.phase = PlaybackPhase::Error;
                self.state.last_error = Some(error.to_string());
            }
        }
        true
    }
}
