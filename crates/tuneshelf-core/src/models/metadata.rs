use serde::{Deserialize, Serialize};

/// Separator between artist and title in a song's display name.
pub const ARTIST_TITLE_SEPARATOR: &str = " - ";

/// Human-meaningful metadata of an asset, independent of how it is stored.
///
/// Tags are conventionally `#`-prefixed. Order is meaningful and duplicates
/// are allowed; deduplication is left to whoever edits the tags.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LogicalMetadata {
    pub display_name: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl LogicalMetadata {
    pub fn new(display_name: impl Into<String>, tags: Vec<String>) -> Self {
        Self {
            display_name: display_name.into(),
            tags,
        }
    }

    /// Metadata carrying only a display name.
    pub fn untagged(display_name: impl Into<String>) -> Self {
        Self::new(display_name, Vec::new())
    }

    /// Split `"Artist - Title"` on the first separator.
    ///
    /// Returns `(None, display_name)` for bare titles (typical for videos).
    pub fn artist_and_title(&self) -> (Option<&str>, &str) {
        match self.display_name.split_once(ARTIST_TITLE_SEPARATOR) {
            Some((artist, title)) if !artist.trim().is_empty() => {
                (Some(artist.trim()), title.trim())
            }
            _ => (None, self.display_name.trim()),
        }
    }
}
