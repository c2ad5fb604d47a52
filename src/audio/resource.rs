use super::types::{Generation, PlayTicket};

/// A single mutable handle to one playable media resource at a time.
///
/// Calls return immediately. Anything that completes later (the source being
/// ready, a play request succeeding or failing, progress, end of stream) is
/// reported as a `ResourceEvent` on the channel the resource was built with.
pub trait AudioResource {
    /// Replace the current source with `url` and start loading it.
    fn load(&mut self, url: &str, generation: Generation);
    /// Request playback; the outcome is reported for `ticket`.
    fn play(&mut self, ticket: PlayTicket);
    fn pause(&mut self);
    /// Whether the last transport request left the resource paused.
    ///
    /// This flips synchronously on `play`/`pause`, before the request completes.
    fn is_paused(&self) -> bool;
    fn seek(&mut self, secs: f64);
    fn set_volume(&mut self, level: f32);
}
