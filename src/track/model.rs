use serde::{Deserialize, Deserializer};

use super::key::TrackKey;

/// A track as delivered by the listening-history collaborator.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Track {
    pub artist: String,
    pub title: String,
    #[serde(default)]
    pub album: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    /// Playable URL, only present once the backend has the file.
    #[serde(default, alias = "audioUrl")]
    pub audio_url: Option<String>,
    /// Scrobble time as reported by the backend (unix seconds, sent as string or number).
    #[serde(default, deserialize_with = "string_or_number")]
    pub timestamp: Option<String>,
}

impl Track {
    pub fn key(&self) -> TrackKey {
        TrackKey::new(&self.artist, &self.title)
    }

    /// `"Artist - Title"`, the way the list and the status line show a track.
    pub fn display(&self) -> String {
        self.key().query()
    }
}

#[cfg(test)]
impl Track {
    pub fn new(artist: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            artist: artist.into(),
            title: title.into(),
            album: None,
            image: None,
            audio_url: None,
            timestamp: None,
        }
    }

    pub fn with_album(mut self, album: impl Into<String>) -> Self {
        self.album = Some(album.into());
        self
    }

    pub fn with_audio_url(mut self, url: impl Into<String>) -> Self {
        self.audio_url = Some(url.into());
        self
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}
