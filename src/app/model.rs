//! Application model: what the terminal UI shows.
//!
//! `App` mirrors the controller's published state by applying the
//! `StateUpdate`s it receives, and holds the few flags that only the UI cares
//! about.

use crate::audio::{NowPlaying, PlaybackState, StateUpdate};

/// Format milliseconds as `MM:SS`. Minutes are not wrapped at the hour.
pub fn format_mmss(ms: u64) -> String {
    let minutes = ms / (1000 * 60);
    let seconds = (ms / 1000) % 60;
    format!("{:02}:{:02}", minutes, seconds)
}

pub struct App {
    pub now: NowPlaying,
    pub track_count: usize,
    pub assets_dir: Option<String>,
    pub metadata_window: bool,
}

impl App {
    pub fn new(track_count: usize) -> Self {
        Self {
            now: NowPlaying::default(),
            track_count,
            assets_dir: None,
            metadata_window: false,
        }
    }

    pub fn set_assets_dir(&mut self, dir: String) {
        self.assets_dir = Some(dir);
    }

    pub fn toggle_metadata_window(&mut self) {
        self.metadata_window = !self.metadata_window;
    }

    /// Apply one update from the controller. Returns `true` if anything changed.
    pub fn apply(&mut self, update: &StateUpdate) -> bool {
        let before = self.now.clone();
        self.now.apply(update);
        self.now != before
    }

    pub fn playback(&self) -> PlaybackState {
        self.now.state()
    }

    /// Progress through the current track in `[0.0, 1.0]`.
    pub fn progress(&self) -> f64 {
        if self.now.duration_ms == 0 {
            return 0.0;
        }
        (self.now.elapsed_ms as f64 / self.now.duration_ms as f64).clamp(0.0, 1.0)
    }

    pub fn elapsed_text(&self) -> String {
        format_mmss(self.now.elapsed_ms)
    }

    pub fn total_text(&self) -> String {
        format_mmss(self.now.duration_ms)
    }

    /// `artist<sep>title`, or whichever of the two is known.
    pub fn now_playing_text(&self, sep: &str) -> String {
        let artist = self.now.artist.trim();
        let title = self.now.title.trim();
        match (artist.is_empty(), title.is_empty()) {
            (false, false) => format!("{artist}{sep}{title}"),
            (true, false) => title.to_string(),
            (false, true) => artist.to_string(),
            (true, true) => "-".to_string(),
        }
    }
}
