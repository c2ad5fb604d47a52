//! The front-end model shared by the TUI renderer and the runtime loop.
//!
//! The `App` model holds the fetched scrobble list, the cursor and the status
//! line. Playback and download state live in the `PlaybackContext`.

mod model;

pub use model::*;
