//! Track records and their identity.
//!
//! Tracks arrive from the listening-history endpoint and are never mutated by
//! the core. `TrackKey` is the structured `(artist, title)` identity used to
//! correlate a track with its playback and download status.

mod key;
mod model;
mod url;

pub use key::TrackKey;
pub use model::Track;
pub use url::{ResolvedUrl, resolve_audio_url};
