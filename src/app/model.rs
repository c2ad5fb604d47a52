//! Application model: the scrobble list and what the user is pointing at.

use crate::track::{Track, TrackKey};

/// The main application model.
#[derive(Debug, Default)]
pub struct App {
    pub tracks: Vec<Track>,
    pub selected: usize,
    pub username: String,
    /// A scrobble fetch is in flight.
    pub loading: bool,
    /// Last notice for the user (fetch failures, skipped actions).
    pub message: Option<String>,
}

impl App {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            ..Self::default()
        }
    }

    /// Replace the list, keeping the cursor on the same track when it is still there.
    pub fn set_tracks(&mut self, tracks: Vec<Track>) {
        let keep = self.selected_track().map(Track::key);
        self.tracks = tracks;
        self.selected = keep
            .and_then(|k| self.index_of(&k))
            .unwrap_or(0)
            .min(self.tracks.len().saturating_sub(1));
    }

    pub fn has_tracks(&self) -> bool {
        !self.tracks.is_empty()
    }

    pub fn selected_track(&self) -> Option<&Track> {
        self.tracks.get(self.selected)
    }

    /// First row showing `key`; the same track can be scrobbled many times.
    pub fn index_of(&self, key: &TrackKey) -> Option<usize> {
        self.tracks.iter().position(|t| &t.key() == key)
    }

    /// Move selection to the next track, wrapping to the first.
    pub fn next(&mut self) {
        if self.has_tracks() {
            self.selected = (self.selected + 1) % self.tracks.len();
        }
    }

    /// Move selection to the previous track, wrapping to the last.
    pub fn prev(&mut self) {
        if self.has_tracks() {
            self.selected = match self.selected {
                0 => self.tracks.len() - 1,
                n => n - 1,
            };
        }
    }

    pub fn select_first(&mut self) {
        self.selected = 0;
    }

    pub fn select_last(&mut self) {
        self.selected = self.tracks.len().saturating_sub(1);
    }

    pub fn set_message(&mut self, msg: impl Into<String>) {
        self.message = Some(msg.into());
    }

    pub fn clear_message(&mut self) {
        self.message = None;
    }
}
