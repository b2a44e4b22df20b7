//! Bundled playlist manifest (`playlist.toml`).
//!
//! ```toml
//! [[track]]
//! artist = "SOROR"
//! title = "SIX DAY WAR (Colonel Bagshot Cover)"
//! audio = "six_day_war.mp3"
//! artwork = "six_day_war.jpg"
//! ```
//!
//! Paths are relative to the directory holding the manifest.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::error::PlaylistError;
use super::model::{ArtworkRef, Track};

pub const MANIFEST_FILE: &str = "playlist.toml";

#[derive(Debug, Deserialize)]
struct Manifest {
    #[serde(default, rename = "track")]
    tracks: Vec<ManifestTrack>,
}

#[derive(Debug, Deserialize)]
struct ManifestTrack {
    artist: String,
    title: String,
    audio: PathBuf,
    artwork: Option<PathBuf>,
}

pub(super) fn parse_manifest(text: &str, base: &Path) -> Result<Vec<Track>, toml::de::Error> {
    let manifest: Manifest = toml::from_str(text)?;
    Ok(manifest
        .tracks
        .into_iter()
        .map(|t| Track {
            artist: t.artist,
            title: t.title,
            audio: base.join(t.audio),
            artwork: t
                .artwork
                .map(|a| ArtworkRef::File(base.join(a)))
                .unwrap_or_default(),
        })
        .collect())
}

pub(super) fn read_manifest(path: &Path) -> Result<Vec<Track>, PlaylistError> {
    let text = std::fs::read_to_string(path).map_err(|source| PlaylistError::ManifestIo {
        path: path.to_path_buf(),
        source,
    })?;
    let base = path.parent().unwrap_or(Path::new("."));
    parse_manifest(&text, base).map_err(|source| PlaylistError::ManifestParse {
        path: path.to_path_buf(),
        source,
    })
}
