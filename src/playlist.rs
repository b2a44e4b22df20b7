//! The fixed playlist: tracks, artwork references and how they are loaded.
//!
//! A playlist is built once at startup from an assets directory, either from
//! its `playlist.toml` manifest or, when there is none, by scanning it for
//! audio files. It is never modified afterwards.

mod error;
mod manifest;
mod model;
mod scan;

use std::path::Path;

use tracing::info;

use crate::config::PlaylistSettings;

pub use error::PlaylistError;
pub use manifest::MANIFEST_FILE;
pub use model::{ArtworkRef, Playlist, Track};

/// Load the playlist bundled in `dir`.
pub fn load(dir: &Path, settings: &PlaylistSettings) -> Result<Playlist, PlaylistError> {
    std::fs::read_dir(dir).map_err(|source| PlaylistError::AssetsDir {
        path: dir.to_path_buf(),
        source,
    })?;

    let manifest_path = dir.join(MANIFEST_FILE);
    let tracks = if manifest_path.is_file() {
        info!(manifest = %manifest_path.display(), "loading playlist manifest");
        manifest::read_manifest(&manifest_path)?
    } else {
        info!(dir = %dir.display(), "scanning assets directory");
        scan::scan(dir, settings)
    };

    let playlist = Playlist::new(tracks)?;
    info!(tracks = playlist.len(), "playlist ready");
    Ok(playlist)
}
