//! Audio resource abstraction and its `rodio` implementation.
//!
//! The playback controller talks to audio output only through the
//! [`AudioResource`] trait. Results of asynchronous work (loading, starting
//! playback, progress, end of stream) come back as [`ResourceEvent`]s on a
//! channel, each stamped with the load [`Generation`] it belongs to.

#[cfg(test)]
pub(crate) mod fake;
mod resource;
mod rodio_resource;
mod sink;
mod source;
mod thread;
mod types;

pub use resource::AudioResource;
pub use rodio_resource::RodioResource;
pub use source::SourceConfig;
pub use types::{Generation, PlayTicket, ResourceEvent};
