//! Recording `AudioResource` used by tests.

use std::sync::{Arc, Mutex};

use super::resource::AudioResource;
use super::types::{Generation, PlayTicket};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    Load(String, Generation),
    Play(PlayTicket),
    Pause,
    Seek(f64),
    SetVolume(f32),
}

#[derive(Clone, Default)]
pub(crate) struct CallLog(Arc<Mutex<Vec<Call>>>);

impl CallLog {
    pub fn calls(&self) -> Vec<Call> {
        self.0.lock().unwrap().clone()
    }

    pub fn loads(&self) -> usize {
        self.calls().iter().filter(|c| matches!(c, Call::Load(..))).count()
    }

    pub fn plays(&self) -> Vec<PlayTicket> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Play(t) => Some(t),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        self.0.lock().unwrap().clear();
    }
}

/// Behaves like a media element: `is_paused` flips as soon as play/pause is called.
pub(crate) struct FakeResource {
    log: CallLog,
    paused: bool,
}

impl FakeResource {
    pub fn new() -> (Self, CallLog) {
        let log = CallLog::default();
        (
            Self {
                log: log.clone(),
                paused: true,
            },
            log,
        )
    }

    fn record(&self, call: Call) {
        self.log.0.lock().unwrap().push(call);
    }
}

impl AudioResource for FakeResource {
    fn load(&mut self, url: &str, generation: Generation) {
        self.paused = true;
        self.record(Call::Load(url.to_string(), generation));
    }

    fn play(&mut self, ticket: PlayTicket) {
        self.paused = false;
        self.record(Call::Play(ticket));
    }

    fn pause(&mut self) {
        self.paused = true;
        self.record(Call::Pause);
    }

    fn is_paused(&self) -> bool {
        self.paused
    }

    fn seek(&mut self, secs: f64) {
        self.record(Call::Seek(secs));
    }

    fn set_volume(&mut self, level: f32) {
        self.record(Call::SetVolume(level));
    }
}
