//! Content-Type lookup for the audio/video extensions the library stores.

use crate::models::MediaKind;

const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// Content-Type for a file extension (case-insensitive).
pub fn content_type_for_extension(extension: &str) -> &'static str {
    match extension.to_lowercase().as_str() {
        // Audio
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "ogg" | "oga" => "audio/ogg",
        "m4a" => "audio/mp4",
        "flac" => "audio/flac",
        "aac" => "audio/aac",
        "opus" => "audio/opus",
        // Video
        "mp4" => "video/mp4",
        "webm" => "video/webm",
        "mov" => "video/quicktime",
        "mkv" => "video/x-matroska",
        "m4v" => "video/x-m4v",
        "avi" => "video/x-msvideo",
        // Lyrics side files
        "lrc" => "text/plain",
        _ => FALLBACK_CONTENT_TYPE,
    }
}

/// Guess the media kind from an extension, if it is a known audio or video type.
pub fn kind_for_extension(extension: &str) -> Option<MediaKind> {
    let content_type = content_type_for_extension(extension);
    if content_type.starts_with("audio/") {
        Some(MediaKind::Song)
    } else if content_type.starts_with("video/") {
        Some(MediaKind::Video)
    } else {
        None
    }
}
