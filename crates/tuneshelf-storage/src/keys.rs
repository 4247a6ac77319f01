//! Shared key composition for storage backends.
//!
//! Key format: `{prefix}{filename}`, e.g. `songs/v3-enc-...-ab12.mp3`.

use crate::traits::{StorageError, StorageResult};

/// Compose a full storage key from a kind prefix and a filename.
///
/// The prefix is expected to be empty or end with `/`; a missing slash is added.
pub fn storage_key(prefix: &str, filename: &str) -> String {
    if prefix.is_empty() || prefix.ends_with('/') {
        format!("{}{}", prefix, filename)
    } else {
        format!("{}/{}", prefix, filename)
    }
}

/// Filename component of a full key (everything after the last `/`).
pub fn segment_of(key: &str) -> &str {
    key.rsplit_once('/').map(|(_, segment)| segment).unwrap_or(key)
}

/// Directory component of a full key including the trailing `/`, or `""`.
pub fn prefix_of(key: &str) -> &str {
    match key.rfind('/') {
        Some(idx) => &key[..=idx],
        None => "",
    }
}

/// Reject keys that could escape the storage root.
///
/// `..` is only refused as a whole path segment; filenames such as
/// `a..b.mp3` are valid.
pub fn validate_key(key: &str) -> StorageResult<()> {
    if key.is_empty() {
        return Err(StorageError::InvalidKey("Storage key is empty".to_string()));
    }
    if key.starts_with('/')
        || key.contains('\\')
        || key.split('/').any(|segment| segment == "..")
    {
        return Err(StorageError::InvalidKey(
            "Storage key contains invalid characters".to_string(),
        ));
    }
    Ok(())
}

/// Percent-encode each path segment of a key for use in a URL.
pub fn url_path(key: &str) -> String {
    key.split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn composes_keys() {
        assert_eq!(storage_key("songs/", "a.mp3"), "songs/a.mp3");
        assert_eq!(storage_key("songs", "a.mp3"), "songs/a.mp3");
        assert_eq!(storage_key("", "a.mp3"), "a.mp3");
    }

    #[test]
    fn splits_keys() {
        assert_eq!(segment_of("songs/a.mp3"), "a.mp3");
        assert_eq!(segment_of("a.mp3"), "a.mp3");
        assert_eq!(segment_of("media/songs/a.mp3"), "a.mp3");
        assert_eq!(prefix_of("media/songs/a.mp3"), "media/songs/");
        assert_eq!(prefix_of("a.mp3"), "");
    }

    #[test]
    fn rejects_traversal() {
        assert!(validate_key("songs/a.mp3").is_ok());
        assert!(validate_key("../etc/passwd").is_err());
        assert!(validate_key("/etc/passwd").is_err());
        assert!(validate_key("").is_err());
        assert!(validate_key("songs/..").is_err());
        assert!(validate_key("songs/../videos/a.mp4").is_err());
        assert!(validate_key("songs\\a.mp3").is_err());
    }

    #[test]
    fn accepts_dots_inside_filenames() {
        assert!(validate_key("songs/a..b.mp3").is_ok());
        assert!(validate_key("songs/...mp3").is_ok());
        assert!(validate_key("songs/v3-enc-5pm05aSp--ab12.mp3").is_ok());
    }

    #[test]
    fn url_path_encodes_segments_only() {
        assert_eq!(url_path("songs/my song.mp3"), "songs/my%20song.mp3");
        assert_eq!(url_path("songs/晴天.mp3"), "songs/%E6%99%B4%E5%A4%A9.mp3");
        assert_eq!(
            url_path("songs/v3-enc-5pm05aSp--ab12.mp3"),
            "songs/v3-enc-5pm05aSp--ab12.mp3"
        );
    }
}
