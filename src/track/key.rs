use std::fmt;

/// Structured `(artist, title)` identity of a track.
///
/// Both parts are trimmed of surrounding whitespace when the key is built and
/// compared exactly afterwards. The key never goes through a formatted string,
/// so a title containing `" - "` cannot collide with another artist/title pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TrackKey {
    artist: String,
    title: String,
}

impl TrackKey {
    pub fn new(artist: impl AsRef<str>, title: impl AsRef<str>) -> Self {
        Self {
            artist: artist.as_ref().trim().to_string(),
            title: title.as_ref().trim().to_string(),
        }
    }

    pub fn artist(&self) -> &str {
        &self.artist
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// The `"Artist - Title"` form sent as the download `query` and shown to users.
    pub fn query(&self) -> String {
        format!("{} - {}", self.artist, self.title)
    }

    /// Parse a `"Artist - Title"` query back into a key, splitting on the first separator.
    pub fn from_query(query: &str) -> Option<Self> {
        let (artist, title) = query.split_once(" - ")?;
        if artist.trim().is_empty() || title.trim().is_empty() {
            return None;
        }
        Some(Self::new(artist, title))
    }
}

impl fmt::Display for TrackKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.artist, self.title)
    }
}
