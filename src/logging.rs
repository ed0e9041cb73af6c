//! Diagnostic logging.
//!
//! The terminal belongs to the UI, so log lines go to a file instead. The
//! filter honours `RUST_LOG` and defaults to `info`.

use std::fs::{File, OpenOptions};
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use crate::domain::ResptimeError;

const DEFAULT_FILTER: &str = "info";

/// Opens `path` for appending, creating it if needed.
pub fn open_log_file(path: &Path) -> Result<File, ResptimeError> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| ResptimeError::other(format!("cannot open log file {}: {}", path.display(), e)))
}

/// Installs the global subscriber. Call once, before the UI starts.
pub fn init_tracing(path: &Path) -> Result<(), ResptimeError> {
    let file = open_log_file(path)?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(Mutex::new(file)).with_ansi(false).with_target(true))
        .with(filter)
        .try_init()
        .map_err(|e| ResptimeError::other(format!("failed to install logger: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn log_file_is_appended_not_truncated() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("debug.log");

        writeln!(open_log_file(&path).unwrap(), "first").unwrap();
        writeln!(open_log_file(&path).unwrap(), "second").unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "first\nsecond\n");
    }

    #[test]
    fn unwritable_location_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let err = open_log_file(&dir.path().join("missing").join("debug.log")).unwrap_err();
        assert!(err.message.contains("cannot open log file"));
    }
}
