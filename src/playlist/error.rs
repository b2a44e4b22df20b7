use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlaylistError {
    #[error("playlist is empty")]
    Empty,

    #[error("cannot read assets directory {path:?}: {source}")]
    AssetsDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("cannot read playlist manifest {path:?}: {source}")]
    ManifestIo {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid playlist manifest {path:?}: {source}")]
    ManifestParse {
        path: PathBuf,
        source: toml::de::Error,
    },
}
