use serde::Deserialize;

use crate::error::PollError;
use crate::track::TrackKey;

/// Backend-reported state of one job.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobState {
    #[serde(alias = "waiting")]
    Queued,
    Pending,
    #[serde(alias = "running", alias = "in_progress")]
    Downloading,
    #[serde(alias = "converting", alias = "tagging")]
    Processing,
    #[serde(alias = "done", alias = "success")]
    Completed,
    #[serde(alias = "error")]
    Failed,
    #[default]
    #[serde(other)]
    Unknown,
}

impl JobState {
    pub fn label(self) -> &'static str {
        match self {
            JobState::Queued => "queued",
            JobState::Pending => "pending",
            JobState::Downloading => "downloading",
            JobState::Processing => "processing",
            JobState::Completed => "completed",
            JobState::Failed => "failed",
            JobState::Unknown => "unknown",
        }
    }
}

/// One entry of the active-jobs list.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct JobDescriptor {
    #[serde(default)]
    pub artist: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default, alias = "jobState", alias = "status", alias = "state")]
    pub job_state: JobState,
}

impl JobDescriptor {
    /// Identity of the track this job is for.
    ///
    /// Prefers the explicit artist/title pair and falls back to parsing the
    /// `"Artist - Title"` query.
    pub fn track_key(&self) -> Option<TrackKey> {
        match (self.artist.as_deref(), self.title.as_deref()) {
            (Some(artist), Some(title))
                if !artist.trim().is_empty() && !title.trim().is_empty() =>
            {
                Some(TrackKey::new(artist, title))
            }
            _ => self.query.as_deref().and_then(TrackKey::from_query),
        }
    }

    /// Short text for display, whatever fields the backend sent.
    pub fn label(&self) -> String {
        self.track_key()
            .map(|k| k.query())
            .or_else(|| self.query.clone())
            .unwrap_or_else(|| "?".to_string())
    }
}

/// Wire shape of `GET /api/jobs`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActiveJobsResponse {
    #[serde(default)]
    pub active_downloads: Vec<JobDescriptor>,
}

/// Jobs as reported by the last successful poll, in backend order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActiveJobsSnapshot {
    pub jobs: Vec<JobDescriptor>,
}

impl ActiveJobsSnapshot {
    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// The job for `key`, if the backend reports one.
    pub fn job_for(&self, key: &TrackKey) -> Option<&JobDescriptor> {
        self.jobs.iter().find(|j| j.track_key().as_ref() == Some(key))
    }
}

/// Where the poller gets its data from.
pub trait JobsSource: Send + Sync {
    fn fetch_active_jobs(&self) -> Result<Vec<JobDescriptor>, PollError>;
}
