//! Metadata validation module
//!
//! Checks applied to user-edited metadata before it is encoded into a key:
//! - Display name: non-empty after trimming, bounded length
//! - Tags: non-empty, no `,` (the tag separator inside encoded keys), bounded count
//! - Extension: short alphanumeric string without the leading dot

use anyhow::{Context, Result};
use regex::Regex;

/// Maximum display name length in characters
pub const MAX_DISPLAY_NAME_LENGTH: usize = 200;

/// Maximum number of tags on a single asset
pub const MAX_TAGS: usize = 20;

/// Maximum extension length in characters
pub const MAX_EXTENSION_LENGTH: usize = 10;

/// Validate a display name.
pub fn validate_display_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(anyhow::anyhow!("Display name cannot be empty"));
    }

    let length = name.chars().count();
    if length > MAX_DISPLAY_NAME_LENGTH {
        return Err(anyhow::anyhow!(
            "Display name exceeds maximum length of {} characters ({} given)",
            MAX_DISPLAY_NAME_LENGTH,
            length
        ));
    }

    Ok(())
}

/// Validate a single tag.
///
/// Commas are rejected because tags are joined with `,` inside the key and
/// would split apart on decode.
pub fn validate_tag(tag: &str) -> Result<()> {
    if tag.trim().is_empty() {
        return Err(anyhow::anyhow!("Tag cannot be empty"));
    }

    if tag.contains(',') {
        return Err(anyhow::anyhow!(
            "Tag '{}' contains ',' which is not supported",
            tag
        ));
    }

    Ok(())
}

/// Validate a tag list.
pub fn validate_tags<S: AsRef<str>>(tags: &[S]) -> Result<()> {
    if tags.len() > MAX_TAGS {
        return Err(anyhow::anyhow!(
            "{} tags given, but maximum allowed is {}",
            tags.len(),
            MAX_TAGS
        ));
    }

    for tag in tags {
        let tag = tag.as_ref();
        validate_tag(tag).with_context(|| format!("Invalid tag: '{}'", tag))?;
    }

    Ok(())
}

/// Validate a bare file extension (no leading dot).
pub fn validate_extension(extension: &str) -> Result<()> {
    if extension.is_empty() {
        return Err(anyhow::anyhow!("Extension cannot be empty"));
    }

    if extension.len() > MAX_EXTENSION_LENGTH {
        return Err(anyhow::anyhow!(
            "Extension '{}' exceeds maximum length of {} characters",
            extension,
            MAX_EXTENSION_LENGTH
        ));
    }

    let pattern =
        Regex::new(r"^[a-zA-Z0-9]+$").context("Failed to compile extension validation regex")?;

    if !pattern.is_match(extension) {
        return Err(anyhow::anyhow!(
            "Extension '{}' contains invalid characters. Allowed: letters and digits, without a leading dot",
            extension
        ));
    }

    Ok(())
}

/// Normalize a tag list the way the editor does before saving:
/// trim each tag, drop empty ones, and add a leading `#` when missing.
pub fn normalize_tags<S: AsRef<str>>(tags: &[S]) -> Vec<String> {
    tags.iter()
        .map(|t| t.as_ref().trim())
        .filter(|t| !t.is_empty())
        .map(|t| {
            if t.starts_with('#') {
                t.to_string()
            } else {
                format!("#{}", t)
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_display_name() {
        assert!(validate_display_name("子夜 - 这辈子").is_ok());
        assert!(validate_display_name("a").is_ok());
        assert!(validate_display_name("").is_err());
        assert!(validate_display_name("   ").is_err());
        assert!(validate_display_name(&"长".repeat(MAX_DISPLAY_NAME_LENGTH)).is_ok());
        assert!(validate_display_name(&"长".repeat(MAX_DISPLAY_NAME_LENGTH + 1)).is_err());
    }

    #[test]
    fn test_validate_tags() {
        assert!(validate_tags(&["#伤感", "#DJ"]).is_ok());
        assert!(validate_tags(&Vec::<String>::new()).is_ok());
        assert!(validate_tags(&["#a,#b"]).is_err());
        assert!(validate_tags(&["#a", " "]).is_err());

        let too_many: Vec<String> = (0..=MAX_TAGS).map(|i| format!("#{}", i)).collect();
        assert!(validate_tags(&too_many).is_err());
    }

    #[test]
    fn test_validate_tags_error_mentions_tag() {
        let err = validate_tags(&["#ok", "#bad,tag"]).unwrap_err();
        assert!(format!("{:#}", err).contains("#bad,tag"));
    }

    #[test]
    fn test_validate_extension() {
        assert!(validate_extension("mp3").is_ok());
        assert!(validate_extension("MP4").is_ok());
        assert!(validate_extension("").is_err());
        assert!(validate_extension(".mp3").is_err());
        assert!(validate_extension("mp 3").is_err());
        assert!(validate_extension("averyverylongext").is_err());
    }

    #[test]
    fn test_normalize_tags() {
        assert_eq!(
            normalize_tags(&[" 伤感 ", "#DJ", "", "  "]),
            vec!["#伤感".to_string(), "#DJ".to_string()]
        );
    }
}
