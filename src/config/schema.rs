use std::path::PathBuf;

use serde::Deserialize;

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/cassette/config.toml` or `~/.config/cassette/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `CASSETTE__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub audio: AudioSettings,
    pub playlist: PlaylistSettings,
    pub ui: UiSettings,
    pub mpris: MprisSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    /// How often the elapsed position is sampled while playing (milliseconds).
    pub tick_ms: u64,
    /// Fade-out duration when quitting (milliseconds).
    /// Set to 0 to stop immediately.
    pub quit_fade_out_ms: u64,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            tick_ms: 333,
            quit_fade_out_ms: 300,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlaylistSettings {
    /// Directory holding the bundled tracks (and optionally `playlist.toml`).
    /// The first CLI argument wins over this.
    pub assets_dir: Option<PathBuf>,
    /// File extensions to treat as audio (case-insensitive, without dot).
    pub extensions: Vec<String>,
    /// Image extensions probed next to each track for its artwork.
    pub artwork_extensions: Vec<String>,
    /// Whether to descend into subdirectories when no manifest is present.
    pub recursive: bool,
}

impl Default for PlaylistSettings {
    fn default() -> Self {
        Self {
            assets_dir: None,
            extensions: vec!["mp3".into(), "flac".into(), "wav".into(), "ogg".into()],
            artwork_extensions: vec!["jpg".into(), "jpeg".into(), "png".into()],
            recursive: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// The text rendered inside the top header box.
    pub header_text: String,
    /// Separator between artist and title in the status line.
    pub artist_title_separator: String,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            header_text: " ~ side A, side B, and around again ~ ".to_string(),
            artist_title_separator: " - ".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MprisSettings {
    /// Expose playback controls on the session bus.
    pub enabled: bool,
}

impl Default for MprisSettings {
    fn default() -> Self {
        Self { enabled: true }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub enabled: bool,
    /// Default filter directive; `RUST_LOG` overrides it.
    pub level: String,
    /// Log file. Defaults to `$XDG_STATE_HOME/cassette/cassette.log`.
    pub file: Option<PathBuf>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            level: "info".to_string(),
            file: None,
        }
    }
}
