//! Utilities for creating `rodio` sinks from fetched audio bytes.
//!
//! Seeking rebuilds the sink from the same bytes and skips into the source.

use std::io::Cursor;
use std::sync::Arc;
use std::time::Duration;

use rodio::{Decoder, OutputStream, Sink, Source};

use crate::error::PlaybackError;

/// Encoded bytes of the loaded source.
#[derive(Clone)]
pub(super) struct Encoded {
    pub url: String,
    pub bytes: Arc<[u8]>,
}

/// Create a paused `Sink` for `encoded` that starts playback at `start_at`.
///
/// Also returns the total duration when the decoder knows it.
pub(super) fn create_sink_at(
    handle: &OutputStream,
    encoded: &Encoded,
    start_at: Duration,
    volume: f32,
) -> Result<(Sink, Option<Duration>), PlaybackError> {
    let source = Decoder::new(Cursor::new(encoded.bytes.clone())).map_err(|e| {
        PlaybackError::Decode {
            url: encoded.url.clone(),
            reason: e.to_string(),
        }
    })?;
    let total = source.total_duration();

    let sink = Sink::connect_new(handle.mixer());
    sink.set_volume(volume);
    // `skip_duration` is our seeking primitive; even Duration::ZERO is fine.
    sink.append(source.skip_duration(start_at));
    sink.pause();
    Ok((sink, total))
}
