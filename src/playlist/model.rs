use std::path::{Path, PathBuf};

use super::error::PlaylistError;

/// Reference to a track's artwork.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ArtworkRef {
    /// The built-in cover shown when a track ships without artwork.
    #[default]
    Placeholder,
    File(PathBuf),
}

impl ArtworkRef {
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Placeholder => None,
            Self::File(p) => Some(p),
        }
    }

    /// Short human-readable name for the UI.
    pub fn label(&self) -> String {
        match self {
            Self::Placeholder => "(no artwork)".to_string(),
            Self::File(p) => p
                .file_name()
                .and_then(|s| s.to_str())
                .map(str::to_string)
                .unwrap_or_else(|| p.display().to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    pub artist: String,
    pub title: String,
    pub audio: PathBuf,
    pub artwork: ArtworkRef,
}

/// The fixed, ordered set of tracks available for playback.
///
/// A playlist is never empty; index arithmetic wraps around in both directions.
#[derive(Debug, Clone)]
pub struct Playlist {
    tracks: Vec<Track>,
}

impl Playlist {
    pub fn new(tracks: Vec<Track>) -> Result<Self, PlaylistError> {
        if tracks.is_empty() {
            return Err(PlaylistError::Empty);
        }
        Ok(Self { tracks })
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// Track at `index`, taken modulo the playlist length.
    pub fn track(&self, index: usize) -> &Track {
        &self.tracks[index % self.tracks.len()]
    }

    pub fn next_index(&self, index: usize) -> usize {
        (index % self.len() + 1) % self.len()
    }

    pub fn prev_index(&self, index: usize) -> usize {
        (index % self.len() + self.len() - 1) % self.len()
    }
}
