//! UI rendering helpers for the terminal user interface.
//!
//! Everything here reads state; nothing in this module calls into the core.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Padding, Paragraph, Wrap},
};

use std::time::{SystemTime, UNIX_EPOCH};

use crate::app::App;
use crate::audio::AudioResource;
use crate::config::{ControlsSettings, UiSettings};
use crate::context::PlaybackContext;
use crate::downloads::DownloadStatus;
use crate::player::{PlaybackPhase, PlaybackState};
use crate::poller::{ActiveJobsSnapshot, PollStats};

/// Render the controls help text, incorporating scrub seconds.
fn controls_text(scrub_seconds: u64) -> String {
    let scrub = format!("scrub -/+{scrub_seconds}s");
    [
        ("j/k", "up/down"),
        ("gg/G", "top/bottom"),
        ("enter", "play selected"),
        ("space/p", "play/pause"),
        ("H/L", scrub.as_str()),
        ("+/-", "volume"),
        ("d", "download"),
        ("r", "refresh"),
        ("q", "quit"),
    ]
    .iter()
    .map(|(k, v)| format!("[{k}] {v}"))
    .collect::<Vec<String>>()
    .join(" | ")
}

/// Format seconds as `MM:SS`; unknown or unbounded lengths render as `--:--`.
pub(crate) fn format_mmss(secs: f64) -> String {
    if !secs.is_finite() || secs < 0.0 {
        return "--:--".to_string();
    }
    let secs = secs as u64;
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

pub(crate) fn progress_text(state: &PlaybackState) -> String {
    let total = if state.ready {
        format_mmss(state.duration_secs)
    } else {
        "--:--".to_string()
    };
    format!("{} / {}", format_mmss(state.progress_secs), total)
}

/// Row marker for a track's download status.
pub(crate) fn download_badge(status: DownloadStatus) -> &'static str {
    match status {
        DownloadStatus::Absent => "[  ]",
        DownloadStatus::Pending => "[..]",
        DownloadStatus::Succeeded => "[ok]",
        DownloadStatus::Failed => "[!!]",
    }
}

/// Age of a scrobble given as unix seconds, e.g. `5m` or `3d`.
pub(crate) fn scrobble_age(timestamp: &str, now_unix: u64) -> Option<String> {
    let then: u64 = timestamp.trim().parse().ok()?;
    let secs = now_unix.saturating_sub(then);
    Some(match secs {
        0..60 => "now".to_string(),
        60..3600 => format!("{}m", secs / 60),
        3600..86400 => format!("{}h", secs / 3600),
        _ => format!("{}d", secs / 86400),
    })
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

pub(crate) fn jobs_summary(jobs: &ActiveJobsSnapshot, stats: &PollStats) -> String {
    let mut text = format!("Jobs: {}", jobs.len());
    if stats.consecutive_failures > 0 {
        text.push_str(&format!(" (backend unreachable x{})", stats.consecutive_failures));
    } else if stats.successes == 0 {
        text.push_str(" (waiting)");
    }
    text
}

fn status_lines(
    app: &App,
    playback: &PlaybackState,
    jobs: &ActiveJobsSnapshot,
    stats: &PollStats,
) -> String {
    let mut parts: Vec<String> = Vec::new();

    match &playback.current_track {
        Some(track) => {
            parts.push(format!("Song: {} [{}]", track.display(), progress_text(playback)));
            parts.push(playback.phase.label().to_string());
        }
        None => parts.push("Nothing loaded".to_string()),
    }
    parts.push(format!("Vol: {:.0}%", playback.volume * 100.0));
    parts.push(jobs_summary(jobs, stats));

    if !app.username.is_empty() {
        parts.push(format!("User: {}", app.username));
    }
    if app.loading {
        parts.push("fetching scrobbles...".to_string());
    }
    if playback.phase == PlaybackPhase::Error {
        if let Some(e) = &playback.last_error {
            parts.push(format!("Error: {e}"));
        }
    }
    if let Some(msg) = &app.message {
        parts.push(msg.clone());
    }

    parts.join(" • ")
}

fn left_padded(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .title(title)
        .padding(Padding {
            left: 1,
            right: 0,
            top: 0,
            bottom: 0,
        })
}

/// Window of `height` rows over `total` rows that keeps `selected` centered.
/// Returns `(start, end, selected_in_window)`.
pub(crate) fn visible_window(
    total: usize,
    selected: usize,
    height: usize,
) -> (usize, usize, usize) {
    if total <= height || height == 0 {
        return (0, total, selected);
    }
    let half = height / 2;
    let mut start = selected.saturating_sub(half);
    if start + height > total {
        start = total - height;
    }
    (start, start + height, selected - start)
}

fn draw_tracks<R: AudioResource>(
    frame: &mut Frame,
    area: Rect,
    app: &App,
    ctx: &PlaybackContext<R>,
    jobs: &ActiveJobsSnapshot,
) {
    let now_playing = ctx.playback().current_track.as_ref().map(|t| t.key());
    let now = unix_now();
    let (start, end, selected_in_window) =
        visible_window(app.tracks.len(), app.selected, area.height.saturating_sub(2) as usize);

    let items: Vec<ListItem> = app.tracks[start..end]
        .iter()
        .map(|track| {
            let key = track.key();
            let status = ctx.download_status(&key);
            let age = track
                .timestamp
                .as_deref()
                .and_then(|ts| scrobble_age(ts, now))
                .unwrap_or_default();
            let mut spans = vec![
                Span::raw(format!("{} ", download_badge(status))),
                Span::raw(format!("{age:>4} ")).dim(),
                Span::raw(track.display()),
            ];
            if let Some(album) = track.album.as_deref().filter(|a| !a.trim().is_empty()) {
                spans.push(Span::raw(format!("  ({album})")).dim());
            }
            if status == DownloadStatus::Pending {
                if let Some(job) = jobs.job_for(&key) {
                    spans.push(Span::raw(format!("  {}", job.job_state.label())).italic());
                }
            }
            let line = Line::from(spans);
            if now_playing.as_ref() == Some(&key) {
                ListItem::new(line).style(Style::default().fg(Color::Green))
            } else {
                ListItem::new(line)
            }
        })
        .collect();

    let title = format!(" scrobbles ({}) ", app.tracks.len());
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");
    let mut state = ListState::default();
    if app.has_tracks() {
        state.select(Some(selected_in_window));
    }
    frame.render_stateful_widget(list, area, &mut state);
}

fn draw_jobs(frame: &mut Frame, area: Rect, jobs: &ActiveJobsSnapshot, stats: &PollStats) {
    let mut items: Vec<ListItem> = Vec::new();
    if stats.consecutive_failures > 0 {
        if let Some(e) = &stats.last_error {
            items.push(
                ListItem::new(format!("last poll failed: {e}"))
                    .style(Style::default().fg(Color::Red)),
            );
        }
    }
    if jobs.is_empty() {
        items.push(
            ListItem::new("no active downloads")
                .style(Style::default().add_modifier(Modifier::DIM)),
        );
    } else {
        items.extend(
            jobs.jobs
                .iter()
                .map(|job| ListItem::new(format!("{:<11} {}", job.job_state.label(), job.label()))),
        );
    }

    let title = if stats.failures > 0 {
        format!(" downloads · {} failed polls ", stats.failures)
    } else {
        " downloads ".to_string()
    };
    let list = List::new(items).block(left_padded(&title));
    frame.render_widget(list, area);
}

/// Render the entire UI into the provided `frame`.
pub fn draw<R: AudioResource>(
    frame: &mut Frame,
    app: &App,
    ctx: &PlaybackContext<R>,
    ui_settings: &UiSettings,
    controls_settings: &ControlsSettings,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(5),
            Constraint::Min(1),
            Constraint::Length(4),
        ])
        .split(frame.area());

    let header = Paragraph::new(ui_settings.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" scrobdl ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    let jobs = ctx.active_jobs();
    let stats = ctx.poll_stats();

    let status = Paragraph::new(status_lines(app, ctx.playback(), &jobs, &stats))
        .block(left_padded(" status "))
        .wrap(Wrap { trim: true });
    frame.render_widget(status, chunks[1]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(68), Constraint::Percentage(32)])
        .split(chunks[2]);
    draw_tracks(frame, body[0], app, ctx, &jobs);
    draw_jobs(frame, body[1], &jobs, &stats);

    let footer = Paragraph::new(controls_text(controls_settings.scrub_seconds))
        .block(left_padded(" controls "))
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, chunks[3]);
}
