use crate::track::Track;

/// Where the controller is in the load/transport lifecycle.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum PlaybackPhase {
    /// No track was ever loaded.
    #[default]
    Idle,
    /// A source was assigned and is loading.
    Loading,
    /// The source can play.
    Ready,
    Playing,
    Paused,
    /// Playback reached the end; behaves like `Ready` from the start.
    Ended,
    /// The last load or play attempt failed.
    Error,
}

impl PlaybackPhase {
    pub fn label(self) -> &'static str {
        match self {
            PlaybackPhase::Idle => "Idle",
            PlaybackPhase::Loading => "Loading",
            PlaybackPhase::Ready => "Ready",
            PlaybackPhase::Playing => "Playing",
            PlaybackPhase::Paused => "Paused",
            PlaybackPhase::Ended => "Ended",
            PlaybackPhase::Error => "Error",
        }
    }
}

/// Observable playback state shared with every consumer.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackState {
    pub current_track: Option<Track>,
    pub playing: bool,
    pub ready: bool,
    pub volume: f32,
    pub progress_secs: f64,
    pub duration_secs: f64,
    pub phase: PlaybackPhase,
    /// Cause of the last failed load or play, cleared by the next successful play.
    pub last_error: Option<String>,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self {
            current_track: None,
            playing: false,
            ready: false,
            volume: 1.0,
            progress_secs: 0.0,
            duration_secs: 0.0,
            phase: PlaybackPhase::Idle,
            last_error: None,
        }
    }
}

impl PlaybackState {
    /// `progress_secs` as it may be recorded: never negative, and while
    /// `ready` never past `duration_secs`.
    pub(super) fn bounded_progress(&self, secs: f64) -> f64 {
        let secs = if secs.is_finite() { secs.max(0.0) } else { 0.0 };
        if self.ready { secs.min(self.duration_secs) } else { secs }
    }

    pub(super) fn set_progress(&mut self, secs: f64) {
        self.progress_secs = self.bounded_progress(secs);
    }
}
