//! Diagnostic log setup.
//!
//! The TUI owns the terminal, so in interactive mode events are written to a
//! file. Headless commands log to stderr. `RUST_LOG` overrides the configured
//! filter in both cases.

use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

fn env_filter(default_filter: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter))
}

/// Append log events to `path`, creating it and its directory if needed.
pub fn init_file(path: &Path, default_filter: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter(default_filter))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init();
    Ok(())
}

pub fn init_stderr(default_filter: &str) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter(default_filter))
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_init_file_creates_log_directory() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("logs").join("logbot.log");

        init_file(&path, "debug").unwrap();

        assert!(path.exists());
    }
}
