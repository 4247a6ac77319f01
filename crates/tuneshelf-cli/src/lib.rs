use tuneshelf_core::{AppError, ErrorMetadata};

/// User-facing text for a failed command: code, message, and how to proceed.
pub fn error_message(err: &AppError) -> String {
    let mut message = format!("[{}] {}", err.error_code(), err.client_message());
    if err.is_recoverable() {
        message.push_str(" (temporary, the command can be retried)");
    }
    if let Some(action) = err.suggested_action() {
        message.push_str(&format!("\n  hint: {}", action));
    }
    message
}

/// Truncate a string to max_len characters, appending "..." if truncated.
///
/// Counts characters rather than bytes so CJK names are never cut mid-codepoint.
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Human-readable size, e.g. `3.42 MB`.
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} {}", bytes, UNITS[0])
    } else {
        format!("{:.2} {}", value, UNITS[unit])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_string_short() {
        assert_eq!(truncate_string("hello", 10), "hello");
        assert_eq!(truncate_string("", 5), "");
    }

    #[test]
    fn truncate_string_exact() {
        assert_eq!(truncate_string("hello", 5), "hello");
    }

    #[test]
    fn truncate_string_long() {
        assert_eq!(truncate_string("hello world", 8), "hello...");
        assert_eq!(truncate_string("abc", 2), "...");
    }

    #[test]
    fn truncate_string_counts_chars() {
        assert_eq!(truncate_string("子夜 - 这辈子", 20), "子夜 - 这辈子");
        assert_eq!(truncate_string("周杰伦 - 晴天 (Live)", 8), "周杰伦 -...");
    }

    #[test]
    fn error_message_marks_retryable_errors() {
        let storage = error_message(&AppError::Storage("bucket unreachable".to_string()));
        assert!(storage.starts_with("[STORAGE_ERROR] Failed to access storage"));
        assert!(storage.contains("can be retried"));

        let not_found = error_message(&AppError::NotFound("songs/a.mp3".to_string()));
        assert!(not_found.starts_with("[NOT_FOUND] songs/a.mp3"));
        assert!(!not_found.contains("can be retried"));
        assert!(not_found.contains("hint: Verify the storage key exists"));
    }

    #[test]
    fn format_size_units() {
        assert_eq!(format_size(0), "0 B");
        assert_eq!(format_size(1023), "1023 B");
        assert_eq!(format_size(1536), "1.50 KB");
        assert_eq!(format_size(5 * 1024 * 1024), "5.00 MB");
    }
}

/// Initialize tracing for CLI binaries.
///
/// Logs go to stderr so JSON output on stdout stays machine-readable.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}
