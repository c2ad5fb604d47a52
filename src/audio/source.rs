//! Fetching encoded audio bytes for a source URL.

use std::fs;
use std::time::Duration;

use ureq::Agent;

use crate::error::PlaybackError;

/// Largest body accepted for a single audio file.
const MAX_AUDIO_BYTES: u64 = 512 * 1024 * 1024;

/// Where relative source URLs are resolved and how long a fetch may take.
#[derive(Debug, Clone)]
pub struct SourceConfig {
    pub base_url: String,
    pub timeout: Duration,
}

/// Turn a source URL into something fetchable.
///
/// Absolute `http(s)://` and `file://` URLs are kept; anything else is treated
/// as a path on the backend and joined to `base_url`.
pub(super) fn absolute_url(base_url: &str, url: &str) -> String {
    if url.starts_with("http://") || url.starts_with("https://") || url.starts_with("file://") {
        return url.to_string();
    }
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        url.trim_start_matches('/')
    )
}

pub(super) fn build_agent(timeout: Duration) -> Agent {
    Agent::config_builder()
        .timeout_global(Some(timeout))
        .build()
        .into()
}

/// Read the whole encoded file behind `url`.
pub(super) fn fetch_bytes(
    agent: &Agent,
    config: &SourceConfig,
    url: &str,
) -> Result<Vec<u8>, PlaybackError> {
    let url = absolute_url(&config.base_url, url);

    if let Some(path) = url.strip_prefix("file://") {
        return fs::read(path).map_err(|e| PlaybackError::Fetch {
            url: url.clone(),
            reason: e.to_string(),
        });
    }

    let fetch_err = |reason: String| PlaybackError::Fetch {
        url: url.clone(),
        reason,
    };

    let mut response = agent.get(&url).call().map_err(|e| fetch_err(e.to_string()))?;
    response
        .body_mut()
        .with_config()
        .limit(MAX_AUDIO_BYTES)
        .read_to_vec()
        .map_err(|e| fetch_err(e.to_string()))
}
