//! Playback state machine.
//!
//! `PlaybackController` is the single authority over which track is attached
//! to the audio output and what its transport state is. It owns the
//! [`AudioResource`](crate::audio::AudioResource) and is the only writer of
//! [`PlaybackState`].

mod controller;
mod state;

pub use controller::PlaybackController;
pub use state::{PlaybackPhase, PlaybackState};
