//! HTTP client for the downloader backend.
//!
//! One `ureq::Agent` is shared by every call. Non-2xx answers surface as
//! `ureq::Error::StatusCode` and are treated as failures like transport errors.

use tracing::{debug, info, warn};
use ureq::Agent;

use crate::config::BackendSettings;
use crate::downloads::{DownloadRequest, DownloadSubmitter};
use crate::error::{BackendError, DownloadError, PollError};
use crate::poller::{ActiveJobsResponse, JobDescriptor, JobsSource};
use crate::track::Track;

#[derive(Clone)]
pub struct BackendClient {
    agent: Agent,
    base_url: String,
    scrobbles_path: String,
    download_path: String,
    jobs_path: String,
}

impl BackendClient {
    pub fn new(settings: &BackendSettings) -> Self {
        let agent: Agent = Agent::config_builder()
            .timeout_global(Some(settings.timeout()))
            .build()
            .into();
        Self {
            agent,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            scrobbles_path: settings.scrobbles_path.clone(),
            download_path: settings.download_path.clone(),
            jobs_path: settings.jobs_path.clone(),
        }
    }

    /// Join `path` onto the base URL, tolerating missing or doubled slashes.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_matches('/'))
    }

    pub fn scrobbles_url(&self, username: &str) -> String {
        format!(
            "{}/{}",
            self.endpoint(&self.scrobbles_path),
            urlencoding::encode(username.trim())
        )
    }

    /// Recent scrobbles of `username`, newest first as the backend sends them.
    pub fn fetch_scrobbles(&self, username: &str) -> Result<Vec<Track>, BackendError> {
        let url = self.scrobbles_url(username);
        let http_err = |source| BackendError::Http {
            url: url.clone(),
            source,
        };

        let mut response = self.agent.get(&url).call().map_err(http_err)?;
        let tracks: Vec<Track> = response.body_mut().read_json().map_err(http_err)?;
        info!(user = username, count = tracks.len(), "fetched scrobbles");
        Ok(tracks)
    }
}

impl DownloadSubmitter for BackendClient {
    fn submit(&self, request: &DownloadRequest) -> Result<(), DownloadError> {
        let url = self.endpoint(&self.download_path);
        info!(query = %request.query, "submitting download");
        match self.agent.post(&url).send_json(request) {
            Ok(_) => Ok(()),
            Err(ureq::Error::StatusCode(code)) => {
                warn!(query = %request.query, code, "download rejected");
                Err(DownloadError::Rejected(format!("backend answered {code}")))
            }
            Err(e) => Err(e.into()),
        }
    }
}

impl JobsSource for BackendClient {
    fn fetch_active_jobs(&self) -> Result<Vec<JobDescriptor>, PollError> {
        let url = self.endpoint(&self.jobs_path);
        let mut response = self.agent.get(&url).call()?;
        let body: ActiveJobsResponse = response
            .body_mut()
            .read_json()
            .map_err(|e| PollError::Body(e.to_string()))?;
        debug!(count = body.active_downloads.len(), "jobs response");
        Ok(body.active_downloads)
    }
}
