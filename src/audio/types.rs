//! Small types shared by the audio resource and the playback controller.

use crate::error::PlaybackError;

/// Identifier of one load. Bumped by the controller for every new source.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u64);

impl Generation {
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }

    pub fn value(self) -> u64 {
        self.0
    }
}

/// Identifier of one play request: the load it targets plus a transport sequence number.
///
/// Every play or pause issued by the controller bumps `seq`, so a play result
/// is only meaningful if no later transport request was made.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct PlayTicket {
    pub generation: Generation,
    pub seq: u64,
}

/// Notifications emitted by an audio resource.
#[derive(Debug, Clone, PartialEq)]
pub enum ResourceEvent {
    /// Playback position moved.
    TimeUpdate { generation: Generation, secs: f64 },
    /// Total length of the source became known.
    DurationChange { generation: Generation, secs: f64 },
    /// Enough of the source is available to start playing.
    CanPlay { generation: Generation },
    /// Playback reached the end of the source.
    Ended { generation: Generation },
    /// The source could not be loaded.
    Error {
        generation: Generation,
        error: PlaybackError,
    },
    /// A play request started playback.
    PlayResolved(PlayTicket),
    /// A play request was refused.
    PlayRejected {
        ticket: PlayTicket,
        error: PlaybackError,
    },
}

impl ResourceEvent {
    pub fn generation(&self) -> Generation {
        match self {
            ResourceEvent::TimeUpdate { generation, .. }
            | ResourceEvent::DurationChange { generation, .. }
            | ResourceEvent::CanPlay { generation }
            | ResourceEvent::Ended { generation }
            | ResourceEvent::Error { generation, .. } => *generation,
            ResourceEvent::PlayResolved(ticket) | ResourceEvent::PlayRejected { ticket, .. } => {
                ticket.generation
            }
        }
    }
}

/// Commands understood by the audio worker thread.
#[derive(Debug)]
pub(super) enum ResourceCmd {
    Load { url: String, generation: Generation },
    Play(PlayTicket),
    Pause,
    Seek(f64),
    SetVolume(f32),
    Quit,
}
