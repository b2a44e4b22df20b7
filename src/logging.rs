//! Tracing setup.
//!
//! The terminal belongs to the UI, so log lines go to a file. `RUST_LOG`
//! overrides the configured level.

use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use crate::config::{LoggingSettings, default_log_path};

/// Where logs go for these settings, if anywhere.
pub fn log_path(settings: &LoggingSettings) -> Option<PathBuf> {
    if !settings.enabled {
        return None;
    }
    settings.file.clone().or_else(default_log_path)
}

fn filter(settings: &LoggingSettings) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install the global subscriber. Returns the log file path when logging is on.
pub fn init(settings: &LoggingSettings) -> Result<Option<PathBuf>> {
    let Some(path) = log_path(settings) else {
        return Ok(None);
    };

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating log directory {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("opening log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter(settings))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!(e))
        .context("installing tracing subscriber")?;

    Ok(Some(path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_logging_has_no_path() {
        let settings = LoggingSettings {
            enabled: false,
            file: Some(PathBuf::from("/tmp/x.log")),
            ..LoggingSettings::default()
        };
        assert_eq!(log_path(&settings), None);
    }

    #[test]
    fn configured_file_wins_over_default() {
        let settings = LoggingSettings {
            file: Some(PathBuf::from("/tmp/cassette-test.log")),
            ..LoggingSettings::default()
        };
        assert_eq!(
            log_path(&settings),
            Some(PathBuf::from("/tmp/cassette-test.log"))
        );
    }

    #[test]
    fn bad_level_falls_back_to_a_usable_filter() {
        let settings = LoggingSettings {
            level: "[[not a filter".to_string(),
            ..LoggingSettings::default()
        };
        let _ = filter(&settings);
    }
}
