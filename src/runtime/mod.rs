use std::env;

use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::info;

use crate::app::App;
use crate::backend::BackendClient;
use crate::context::PlaybackContext;
use crate::logging;

mod event_loop;
mod scrobbles;
mod settings;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let settings = settings::load_settings();
    if let Some(path) = logging::init(&settings.logging) {
        info!(log = %path.display(), "scrobdl starting");
    }

    // A username on the command line wins over the configured one.
    let username = env::args()
        .nth(1)
        .unwrap_or_else(|| settings.ui.username.clone());

    let mut ctx = PlaybackContext::connect(&settings);
    let mut app = App::new(username);
    let mut fetcher = scrobbles::ScrobbleFetcher::new(BackendClient::new(&settings.backend));
    if fetcher.start(&app.username) {
        app.loading = true;
    } else {
        app.set_message("no username: pass one as argument or set ui.username");
    }

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result = {
        let mut state = event_loop::EventLoopState::default();
        event_loop::run(&mut terminal, &settings, &mut app, &mut ctx, &mut fetcher, &mut state)
    };

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    ctx.shutdown();
    run_result
}

#[cfg(test)]
mod tests;
