use std::sync::Arc;
use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use rodio::{OutputStream, OutputStreamBuilder, Sink};
use tracing::{debug, error, info};

use crate::error::PlaybackError;

use super::sink::{Encoded, create_sink_at};
use super::source::{SourceConfig, build_agent, fetch_bytes};
use super::types::{Generation, PlayTicket, ResourceCmd, ResourceEvent};

/// How often progress is reported and end-of-stream is checked.
const TICK: Duration = Duration::from_millis(250);

/// Everything the worker knows about the current source.
struct Worker {
    stream: Result<OutputStream, PlaybackError>,
    events: Sender<ResourceEvent>,
    generation: Generation,
    encoded: Option<Encoded>,
    load_error: Option<PlaybackError>,
    sink: Option<Sink>,
    paused: bool,
    ended: bool,
    volume: f32,
    // Track start time and accumulated elapsed when paused.
    started_at: Option<Instant>,
    accumulated: Duration,
}

impl Worker {
    fn new(stream: Result<OutputStream, PlaybackError>, events: Sender<ResourceEvent>) -> Self {
        Self {
            stream,
            events,
            generation: Generation::default(),
            encoded: None,
            load_error: None,
            sink: None,
            paused: true,
            ended: false,
            volume: 1.0,
            started_at: None,
            accumulated: Duration::ZERO,
        }
    }

    fn emit(&self, event: ResourceEvent) {
        let _ = self.events.send(event);
    }

    fn elapsed(&self) -> Duration {
        self.accumulated + self.started_at.map_or(Duration::ZERO, |st| st.elapsed())
    }

    fn stop_sink(&mut self) {
        if let Some(s) = self.sink.take() {
            s.stop();
        }
        self.paused = true;
        self.started_at = None;
        self.accumulated = Duration::ZERO;
    }

    fn rebuild_sink(&mut self, at: Duration) -> Result<Option<Duration>, PlaybackError> {
        let stream = self.stream.as_ref().map_err(|e| e.clone())?;
        let encoded = self.encoded.as_ref().ok_or(PlaybackError::NotLoaded)?;
        let (sink, total) = create_sink_at(stream, encoded, at, self.volume)?;
        if let Some(old) = self.sink.replace(sink) {
            old.stop();
        }
        Ok(total)
    }

    fn load(
        &mut self,
        agent: &ureq::Agent,
        config: &SourceConfig,
        url: String,
        generation: Generation,
    ) {
        self.stop_sink();
        self.generation = generation;
        self.encoded = None;
        self.load_error = None;
        self.ended = false;

        info!(%url, generation = generation.value(), "loading audio source");

        let loaded = match &self.stream {
            Err(e) => Err(e.clone()),
            Ok(_) => fetch_bytes(agent, config, &url).map(|bytes| Encoded {
                url: url.clone(),
                bytes: Arc::from(bytes),
            }),
        };

        let result = loaded.and_then(|encoded| {
            self.encoded = Some(encoded);
            self.rebuild_sink(Duration::ZERO)
        });

        match result {
            Ok(total) => {
                // Unknown length is reported as infinite, like a live stream.
                let secs = total.map_or(f64::INFINITY, |t| t.as_secs_f64());
                self.emit(ResourceEvent::DurationChange { generation, secs });
                self.emit(ResourceEvent::TimeUpdate { generation, secs: 0.0 });
                self.emit(ResourceEvent::CanPlay { generation });
            }
            Err(e) => {
                error!(%url, error = %e, "audio source failed to load");
                self.encoded = None;
                self.load_error = Some(e.clone());
                self.emit(ResourceEvent::Error { generation, error: e });
            }
        }
    }

    fn play(&mut self, ticket: PlayTicket) {
        if ticket.generation != self.generation {
            self.emit(ResourceEvent::PlayRejected {
                ticket,
                error: PlaybackError::NotLoaded,
            });
            return;
        }
        if let Some(e) = self.load_error.clone() {
            self.emit(ResourceEvent::PlayRejected { ticket, error: e });
            return;
        }

        // Playing again after the end restarts from the beginning.
        if self.ended || self.sink.is_none() {
            if let Err(e) = self.rebuild_sink(Duration::ZERO) {
                self.emit(ResourceEvent::PlayRejected { ticket, error: e });
                return;
            }
            self.ended = false;
            self.accumulated = Duration::ZERO;
        }

        if let Some(s) = self.sink.as_ref() {
            s.play();
            if self.paused {
                self.started_at = Some(Instant::now());
            }
            self.paused = false;
            self.emit(ResourceEvent::PlayResolved(ticket));
        }
    }

    fn pause(&mut self) {
        if let Some(s) = self.sink.as_ref() {
            s.pause();
        }
        if !self.paused {
            if let Some(st) = self.started_at.take() {
                self.accumulated += st.elapsed();
            }
        }
        self.paused = true;
    }

    fn seek(&mut self, secs: f64) {
        if self.encoded.is_none() {
            return;
        }
        // NaN and negative positions mean the start. Anything beyond what a
        // `Duration` holds is past the end of any source.
        let Ok(target) = Duration::try_from_secs_f64(secs.max(0.0)) else {
            debug!(secs, "seek past the end");
            self.finish();
            return;
        };

        // Scrubbing: rebuild the current sink and skip into the source.
        match self.rebuild_sink(target) {
            Ok(_) => {
                self.ended = false;
                self.accumulated = target;
                if self.paused {
                    self.started_at = None;
                } else {
                    if let Some(s) = self.sink.as_ref() {
                        s.play();
                    }
                    self.started_at = Some(Instant::now());
                }
                self.emit(ResourceEvent::TimeUpdate {
                    generation: self.generation,
                    secs: target.as_secs_f64(),
                });
            }
            Err(e) => error!(error = %e, "seek failed"),
        }
    }

    /// The source played out: the next `play` starts over.
    fn finish(&mut self) {
        if let Some(s) = self.sink.as_ref() {
            s.pause();
        }
        self.paused = true;
        self.ended = true;
        self.started_at = None;
        self.accumulated = Duration::ZERO;
        self.emit(ResourceEvent::Ended {
            generation: self.generation,
        });
    }

    fn set_volume(&mut self, level: f32) {
        self.volume = level.clamp(0.0, 1.0);
        if let Some(s) = self.sink.as_ref() {
            s.set_volume(self.volume);
        }
    }

    /// Periodic progress report and end-of-stream check.
    fn tick(&mut self) {
        let Some(s) = self.sink.as_ref() else {
            return;
        };
        if self.paused {
            return;
        }
        if s.empty() {
            debug!(generation = self.generation.value(), "audio source ended");
            self.finish();
        } else {
            self.emit(ResourceEvent::TimeUpdate {
                generation: self.generation,
                secs: self.elapsed().as_secs_f64(),
            });
        }
    }
}

pub(super) fn spawn_audio_thread(
    rx: Receiver<ResourceCmd>,
    events: Sender<ResourceEvent>,
    config: SourceConfig,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let stream = OutputStreamBuilder::open_default_stream()
            .map(|mut stream| {
                // rodio logs to stderr when OutputStream is dropped. That's useful in debugging,
                // but noisy for a TUI app.
                stream.log_on_drop(false);
                stream
            })
            .map_err(|e| PlaybackError::NoOutput(e.to_string()));
        if let Err(e) = &stream {
            error!(error = %e, "audio output unavailable");
        }

        let agent = build_agent(config.timeout);
        let mut worker = Worker::new(stream, events);

        loop {
            match rx.recv_timeout(TICK) {
                Ok(cmd) => match cmd {
                    ResourceCmd::Load { url, generation } => {
                        worker.load(&agent, &config, url, generation)
                    }
                    ResourceCmd::Play(ticket) => worker.play(ticket),
                    ResourceCmd::Pause => worker.pause(),
                    ResourceCmd::Seek(secs) => worker.seek(secs),
                    ResourceCmd::SetVolume(level) => worker.set_volume(level),
                    ResourceCmd::Quit => {
                        worker.stop_sink();
                        break;
                    }
                },
                Err(RecvTimeoutError::Timeout) => worker.tick(),
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
    })
}
