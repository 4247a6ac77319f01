use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use super::metadata::LogicalMetadata;

/// Kind of asset in the library. Each kind lives under its own key prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Song,
    Video,
}

impl FromStr for MediaKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "song" | "songs" | "audio" | "music" => Ok(MediaKind::Song),
            "video" | "videos" => Ok(MediaKind::Video),
            _ => Err(anyhow::anyhow!(
                "Invalid media kind '{}'. Must be: song or video",
                s
            )),
        }
    }
}

impl Display for MediaKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            MediaKind::Song => write!(f, "song"),
            MediaKind::Video => write!(f, "video"),
        }
    }
}

/// One asset as seen through a storage listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaAsset {
    /// Full storage key (prefix + filename).
    pub key: String,
    /// Filename component of the key.
    pub filename: String,
    pub kind: MediaKind,
    pub metadata: LogicalMetadata,
    /// Whether the filename carried versioned metadata (as opposed to a legacy name).
    pub encoded: bool,
    pub url: String,
    pub size_bytes: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<DateTime<Utc>>,
}

impl MediaAsset {
    pub fn display_name(&self) -> &str {
        &self.metadata.display_name
    }

    pub fn tags(&self) -> &[String] {
        &self.metadata.tags
    }
}
