use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::debug;

use crate::app::App;
use crate::audio::AudioResource;
use crate::config;
use crate::context::PlaybackContext;
use crate::downloads::DownloadStatus;
use crate::ui;

use super::scrobbles::ScrobbleFetcher;

/// State tracked by the runtime event loop across iterations.
#[derive(Debug, Default)]
pub struct EventLoopState {
    /// Internal two-key prefix state used for `gg` handling.
    pub pending_gg: bool,
}

/// What the loop should do after a key press.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum KeyOutcome {
    Continue,
    RefetchScrobbles,
    Quit,
}

/// Main terminal event loop: folds in background results, draws, and handles
/// input. Returns `Ok(())` when the user quits.
pub fn run<R: AudioResource>(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    app: &mut App,
    ctx: &mut PlaybackContext<R>,
    fetcher: &mut ScrobbleFetcher,
    state: &mut EventLoopState,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        ctx.pump_events();

        if let Some(result) = fetcher.try_take() {
            app.loading = false;
            match result {
                Ok(tracks) => {
                    app.set_tracks(tracks);
                    app.clear_message();
                }
                Err(e) => app.set_message(format!("could not fetch scrobbles: {e}")),
            }
        }

        terminal.draw(|f| ui::draw(f, app, ctx, &settings.ui, &settings.controls))?;

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                match handle_key_event(key, settings, app, ctx, state) {
                    KeyOutcome::Continue => {}
                    KeyOutcome::RefetchScrobbles => {
                        if fetcher.start(&app.username) {
                            app.loading = true;
                        }
                    }
                    KeyOutcome::Quit => break,
                }
            }
        }
    }

    Ok(())
}

/// Apply one key press to the app and the playback context.
pub fn handle_key_event<R: AudioResource>(
    key: KeyEvent,
    settings: &config::Settings,
    app: &mut App,
    ctx: &mut PlaybackContext<R>,
    state: &mut EventLoopState,
) -> KeyOutcome {
    if key.code != KeyCode::Char('g') {
        state.pending_gg = false;
    }

    match key.code {
        KeyCode::Char('q') => return KeyOutcome::Quit,
        KeyCode::Char('r') => return KeyOutcome::RefetchScrobbles,
        KeyCode::Char('g') => {
            if state.pending_gg {
                state.pending_gg = false;
                app.select_first();
            } else {
                state.pending_gg = true;
            }
        }
        KeyCode::Char('G') => app.select_last(),
        KeyCode::Char('j') | KeyCode::Down => app.next(),
        KeyCode::Char('k') | KeyCode::Up => app.prev(),
        KeyCode::Enter => {
            if let Some(track) = app.selected_track().cloned() {
                app.clear_message();
                ctx.play_track(&track);
            }
        }
        KeyCode::Char('p') | KeyCode::Char(' ') => ctx.toggle_play(),
        KeyCode::Char('L') => scrub(ctx, settings.controls.scrub_seconds as f64),
        KeyCode::Char('H') => scrub(ctx, -(settings.controls.scrub_seconds as f64)),
        KeyCode::Char('+') | KeyCode::Char('=') => nudge_volume(ctx, settings.playback.volume_step),
        KeyCode::Char('-') => nudge_volume(ctx, -settings.playback.volume_step),
        KeyCode::Char('d') => request_selected_download(app, ctx),
        _ => {}
    }
    KeyOutcome::Continue
}

fn scrub<R: AudioResource>(ctx: &mut PlaybackContext<R>, delta: f64) {
    if ctx.playback().current_track.is_none() {
        return;
    }
    let target = (ctx.playback().progress_secs + delta).max(0.0);
    ctx.seek(target);
}

fn nudge_volume<R: AudioResource>(ctx: &mut PlaybackContext<R>, delta: f32) {
    let level = ((ctx.playback().volume + delta) * 100.0).round() / 100.0;
    ctx.set_volume(level.clamp(0.0, 1.0));
}

fn request_selected_download<R: AudioResource>(app: &mut App, ctx: &mut PlaybackContext<R>) {
    let Some(track) = app.selected_track().cloned() else {
        return;
    };
    let status = ctx.download_status(&track.key());
    if !status.can_request() {
        let why = match status {
            DownloadStatus::Pending => "already downloading",
            _ => "already downloaded",
        };
        debug!(track = %track.key(), status = ?status, "download not offered");
        app.set_message(format!("{}: {why}", track.display()));
        return;
    }
    // The status is tracked by the context; the outcome handle is not needed here.
    let _ = ctx.request_download(&track);
    app.clear_message();
}
