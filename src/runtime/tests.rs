use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::event_loop::{EventLoopState, KeyOutcome, handle_key_event};
use crate::app::App;
use crate::audio::fake::{Call, CallLog, FakeResource};
use crate::config::Settings;
use crate::context::PlaybackContext;
use crate::downloads::{DownloadRequest, DownloadStatus, DownloadStatusTracker, DownloadSubmitter};
use crate::error::{DownloadError, PollError};
use crate::player::PlaybackController;
use crate::poller::{JobDescriptor, JobStatusPoller, JobsSource};
use crate::track::Track;

#[derive(Default)]
struct RecordingSubmitter {
    seen: Mutex<Vec<DownloadRequest>>,
}

impl DownloadSubmitter for RecordingSubmitter {
    fn submit(&self, request: &DownloadRequest) -> Result<(), DownloadError> {
        self.seen.lock().unwrap().push(request.clone());
        Ok(())
    }
}

struct NoJobs;

impl JobsSource for NoJobs {
    fn fetch_active_jobs(&self) -> Result<Vec<JobDescriptor>, PollError> {
        Ok(Vec::new())
    }
}

struct Harness {
    settings: Settings,
    app: App,
    ctx: PlaybackContext<FakeResource>,
    state: EventLoopState,
    log: CallLog,
    submitter: Arc<RecordingSubmitter>,
}

impl Harness {
    fn new() -> Self {
        let (resource, log) = FakeResource::new();
        let controller = PlaybackController::new(resource, "/api/audio", 1.0);
        log.clear();
        let (_events, rx) = mpsc::channel();
        let submitter = Arc::new(RecordingSubmitter::default());
        let ctx = PlaybackContext::new(
            controller,
            rx,
            DownloadStatusTracker::new(submitter.clone()),
            JobStatusPoller::new(Arc::new(NoJobs)),
        );

        let mut app = App::new("wife5711");
        app.set_tracks(vec![
            Track::new("Air", "Talisman").with_audio_url("/files/talisman.mp3"),
            Track::new("Air", "Sexy Boy"),
            Track::new("Justice", "Genesis"),
        ]);

        Self {
            settings: Settings::default(),
            app,
            ctx,
            state: EventLoopState::default(),
            log,
            submitter,
        }
    }

    fn press(&mut self, code: KeyCode) -> KeyOutcome {
        handle_key_event(
            KeyEvent::new(code, KeyModifiers::NONE),
            &self.settings,
            &mut self.app,
            &mut self.ctx,
            &mut self.state,
        )
    }
}

#[test]
fn quit_and_refetch_are_reported_to_the_loop() {
    let mut h = Harness::new();
    assert_eq!(h.press(KeyCode::Char('r')), KeyOutcome::RefetchScrobbles);
    assert_eq!(h.press(KeyCode::Char('q')), KeyOutcome::Quit);
}

#[test]
fn navigation_keys_move_the_cursor() {
    let mut h = Harness::new();
    h.press(KeyCode::Char('j'));
    assert_eq!(h.app.selected, 1);
    h.press(KeyCode::Char('G'));
    assert_eq!(h.app.selected, 2);
    h.press(KeyCode::Char('k'));
    assert_eq!(h.app.selected, 1);

    h.press(KeyCode::Char('g'));
    assert_eq!(h.app.selected, 1);
    h.press(KeyCode::Char('g'));
    assert_eq!(h.app.selected, 0);
}

#[test]
fn gg_prefix_is_cancelled_by_other_keys() {
    let mut h = Harness::new();
    h.press(KeyCode::Char('G'));
    h.press(KeyCode::Char('g'));
    h.press(KeyCode::Char('k'));
    h.press(KeyCode::Char('g'));
    assert_eq!(h.app.selected, 1);
}

#[test]
fn enter_plays_the_selected_track_once() {
    let mut h = Harness::new();
    h.press(KeyCode::Enter);
    h.press(KeyCode::Enter);

    assert_eq!(h.log.loads(), 1);
    assert_eq!(
        h.ctx.playback().current_track.as_ref().unwrap().title,
        "Talisman"
    );
}

#[test]
fn toggle_without_a_track_does_nothing() {
    let mut h = Harness::new();
    h.press(KeyCode::Char(' '));
    h.press(KeyCode::Char('p'));
    assert!(h.log.calls().is_empty());
}

#[test]
fn scrub_moves_relative_and_never_below_zero() {
    let mut h = Harness::new();
    h.press(KeyCode::Char('L'));
    assert!(h.log.calls().is_empty());

    h.press(KeyCode::Enter);
    h.log.clear();
    h.press(KeyCode::Char('L'));
    h.press(KeyCode::Char('H'));
    h.press(KeyCode::Char('H'));

    assert_eq!(
        h.log.calls(),
        vec![Call::Seek(5.0), Call::Seek(0.0), Call::Seek(0.0)]
    );
}

#[test]
fn volume_keys_step_and_stay_in_range() {
    let mut h = Harness::new();
    h.press(KeyCode::Char('+'));
    assert_eq!(h.ctx.playback().volume, 1.0);

    h.press(KeyCode::Char('-'));
    assert_eq!(h.ctx.playback().volume, 0.95);
    assert_eq!(h.log.calls().last(), Some(&Call::SetVolume(0.95)));
}

#[test]
fn download_key_is_refused_once_the_track_succeeded() {
    let mut h = Harness::new();
    let key = h.app.selected_track().unwrap().key();

    h.press(KeyCode::Char('d'));
    let deadline = Instant::now() + Duration::from_secs(5);
    while h.ctx.download_status(&key) != DownloadStatus::Succeeded && Instant::now() < deadline {
        thread::sleep(Duration::from_millis(5));
    }
    assert_eq!(h.ctx.download_status(&key), DownloadStatus::Succeeded);

    h.press(KeyCode::Char('d'));
    assert_eq!(h.submitter.seen.lock().unwrap().len(), 1);
    assert!(h.app.message.as_deref().unwrap().contains("already downloaded"));
}
