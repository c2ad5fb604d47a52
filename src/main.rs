mod app;
mod audio;
mod backend;
mod config;
mod context;
mod downloads;
mod error;
mod logging;
mod player;
mod poller;
mod runtime;
mod track;
mod ui;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    runtime::run()
}
