use super::model::Track;

/// Where a playable URL came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedUrl {
    /// The backend supplied `audio_url` for a downloaded track.
    Provided(String),
    /// Built from artist and title; may 404 if the storage layout differs.
    Derived(String),
}

impl ResolvedUrl {
    pub fn as_str(&self) -> &str {
        match self {
            ResolvedUrl::Provided(u) | ResolvedUrl::Derived(u) => u,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, ResolvedUrl::Derived(_))
    }
}

/// Resolve the audio address of `track`.
///
/// Uses `audio_url` when the backend provided one, otherwise percent-encodes
/// `"{artist} - {title}.mp3"` under `audio_route`.
pub fn resolve_audio_url(track: &Track, audio_route: &str) -> ResolvedUrl {
    if let Some(url) = track.audio_url.as_deref().filter(|u| !u.trim().is_empty()) {
        return ResolvedUrl::Provided(url.to_string());
    }

    let filename = format!("{} - {}.mp3", track.artist, track.title);
    let route = audio_route.trim_end_matches('/');
    ResolvedUrl::Derived(format!("{}/{}", route, urlencoding::encode(&filename)))
}
