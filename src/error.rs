//! Error types for the playback and download core.
//!
//! Every failure class is absorbed by the component that produces it and turned
//! into state; these enums exist so that the absorbed failure can be logged and
//! inspected with a precise cause.

use thiserror::Error;

/// The audio resource could not load or start a source.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlaybackError {
    #[error("no audio output device: {0}")]
    NoOutput(String),
    #[error("failed to fetch {url}: {reason}")]
    Fetch { url: String, reason: String },
    #[error("failed to decode {url}: {reason}")]
    Decode { url: String, reason: String },
    #[error("no source loaded")]
    NotLoaded,
}

/// The active-jobs endpoint could not be read.
#[derive(Error, Debug)]
pub enum PollError {
    #[error("jobs request failed: {0}")]
    Http(#[from] ureq::Error),
    #[error("unreadable jobs response: {0}")]
    Body(String),
}

/// A download submission was rejected or never reached the backend.
#[derive(Error, Debug)]
pub enum DownloadError {
    #[error("download request failed: {0}")]
    Http(#[from] ureq::Error),
    #[error("download rejected: {0}")]
    Rejected(String),
}

/// Errors from backend calls made on behalf of the front end.
#[derive(Error, Debug)]
pub enum BackendError {
    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: ureq::Error,
    },
}

/// Settings were loaded but are not usable.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum SettingsError {
    #[error("{0}")]
    Invalid(String),
}
