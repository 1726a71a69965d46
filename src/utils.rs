//! Small helpers for logging and output directories.

use crate::error::SinkError;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};

/// Truncate a string for logging purposes.
///
/// Long strings are cut to at most `max` bytes, backing off to the nearest
/// character boundary, with an ellipsis and the dropped byte count appended.
///
/// ```ignore
/// assert_eq!(truncate_for_log("short", 100), "short");
/// assert_eq!(truncate_for_log(&"a".repeat(500), 10), "aaaaaaaaaa…(+490 bytes)");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let cut = (0..=max).rev().find(|&i| s.is_char_boundary(i)).unwrap_or(0);
    format!("{}…(+{} bytes)", &s[..cut], s.len() - cut)
}

/// Ensure a directory exists and is writable.
///
/// Creates the directory if needed, then writes and removes a probe file so
/// a read-only target fails before any page is fetched.
#[instrument(level = "info", skip_all, fields(path = %path.as_ref().display()))]
pub async fn ensure_writable_dir(path: impl AsRef<Path>) -> Result<(), SinkError> {
    let path = path.as_ref();
    let display = path.display().to_string();
    fs::create_dir_all(path)
        .await
        .map_err(|e| SinkError::io(&display, e))?;
    let probe = path.join("..__probe_write__");
    fs::write(&probe, b"")
        .await
        .map_err(|e| SinkError::io(&display, e))?;
    let _ = fs::remove_file(&probe).await;
    info!("Output directory is writable");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_for_log_short_string() {
        let s = "Hello, world!";
        assert_eq!(truncate_for_log(s, 100), "Hello, world!");
    }

    #[test]
    fn test_truncate_for_log_long_string() {
        let s = "a".repeat(500);
        let result = truncate_for_log(&s, 100);
        assert!(result.starts_with(&"a".repeat(100)));
        assert!(result.contains("…(+400 bytes)"));
    }

    #[test]
    fn test_truncate_for_log_multibyte() {
        // "ị" is three bytes; cutting at 2 must back off to 1.
        let result = truncate_for_log("dịch", 2);
        assert_eq!(result, "d…(+5 bytes)");
    }

    #[tokio::test]
    async fn test_ensure_writable_dir_creates() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("data").join("out");
        ensure_writable_dir(&target).await.unwrap();
        assert!(target.is_dir());
        assert!(!target.join("..__probe_write__").exists());
    }
}
