use serde::Serialize;

use crate::error::DownloadError;
use crate::track::Track;

/// Caller-visible download state of one track.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum DownloadStatus {
    /// Never requested in this session.
    #[default]
    Absent,
    Pending,
    Succeeded,
    Failed,
}

impl DownloadStatus {
    /// Whether a download affordance should be offered: never while pending,
    /// never once succeeded, again after a failure.
    pub fn can_request(self) -> bool {
        matches!(self, DownloadStatus::Absent | DownloadStatus::Failed)
    }
}

/// Body of `POST /download`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DownloadRequest {
    pub query: String,
    pub artist: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub album: Option<String>,
}

impl DownloadRequest {
    pub fn for_track(track: &Track) -> Self {
        let key = track.key();
        Self {
            query: key.query(),
            artist: key.artist().to_string(),
            title: key.title().to_string(),
            album: track.album.clone(),
        }
    }
}

/// The external download-submission interface.
pub trait DownloadSubmitter: Send + Sync {
    fn submit(&self, request: &DownloadRequest) -> Result<(), DownloadError>;
}
