use std::sync::mpsc::{self, Sender};
use std::thread::JoinHandle;

use super::resource::AudioResource;
use super::source::SourceConfig;
use super::thread::spawn_audio_thread;
use super::types::{Generation, PlayTicket, ResourceCmd, ResourceEvent};

/// `AudioResource` backed by a `rodio` sink living on its own worker thread.
///
/// Calls are forwarded as commands; the worker fetches, decodes and plays the
/// source and reports back through the event channel given to [`RodioResource::spawn`].
pub struct RodioResource {
    tx: Sender<ResourceCmd>,
    paused: bool,
    join: Option<JoinHandle<()>>,
}

impl RodioResource {
    pub fn spawn(config: SourceConfig, events: Sender<ResourceEvent>) -> Self {
        let (tx, rx) = mpsc::channel::<ResourceCmd>();
        let join = spawn_audio_thread(rx, events, config);
        Self {
            tx,
            paused: true,
            join: Some(join),
        }
    }

    fn send(&self, cmd: ResourceCmd) {
        // The worker only goes away on drop; a failed send means it already quit.
        let _ = self.tx.send(cmd);
    }
}

impl AudioResource for RodioResource {
    fn load(&mut self, url: &str, generation: Generation) {
        self.paused = true;
        self.send(ResourceCmd::Load {
            url: url.to_string(),
            generation,
        });
    }

    fn play(&mut self, ticket: PlayTicket) {
        self.paused = false;
        self.send(ResourceCmd::Play(ticket));
    }

    fn pause(&mut self) {
        self.paused = true;
        self.send(ResourceCmd::Pause);
    }

    fn is_paused(&self) -> bool {
        self.paused
    }

    fn seek(&mut self, secs: f64) {
        self.send(ResourceCmd::Seek(secs));
    }

    fn set_volume(&mut self, level: f32) {
        self.send(ResourceCmd::SetVolume(level));
    }
}

impl Drop for RodioResource {
    fn drop(&mut self) {
        self.send(ResourceCmd::Quit);
        // Joining waits for fetches queued ahead of `Quit`, each bounded by
        // `backend.timeout_ms`. The worker owns the output stream.
        if let Some(h) = self.join.take() {
            let _ = h.join();
        }
    }
}
