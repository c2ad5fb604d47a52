//! Tracing setup.
//!
//! The terminal belongs to the UI, so log lines go to a file. When no file can
//! be opened logging is silently disabled; it never stops the program.

use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::writer::BoxMakeWriter;

use crate::config::{LoggingSettings, default_log_path};

/// Install the global subscriber. Returns the log file in use, if any.
pub fn init(settings: &LoggingSettings) -> Option<PathBuf> {
    let (writer, path) = log_writer(settings);

    let installed = tracing_subscriber::fmt()
        .with_env_filter(env_filter(&settings.level))
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .is_ok();

    if installed { path } else { None }
}

/// The configured log file, or a sink when it cannot be opened.
///
/// The path is only returned alongside a writer for that file.
fn log_writer(settings: &LoggingSettings) -> (BoxMakeWriter, Option<PathBuf>) {
    let path = settings.file.clone().or_else(default_log_path);
    let opened = path.and_then(|p| open_log_file(&p).ok().map(|f| (f, p)));

    match opened {
        Some((file, path)) => (BoxMakeWriter::new(Mutex::new(file)), Some(path)),
        None => (BoxMakeWriter::new(io::sink), None),
    }
}

/// `RUST_LOG` when set and valid, else `level`, else `info`.
fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

fn open_log_file(path: &Path) -> io::Result<fs::File> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}
