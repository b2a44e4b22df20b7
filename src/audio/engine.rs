//! The seam between the controller and the platform media primitive.
//!
//! An [`Engine`] plays exactly one track and is thrown away on every track
//! change. A [`Backend`] knows how to open one for a [`Track`].

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::playlist::Track;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to open {path:?}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to decode {path:?}: {reason}")]
    Decode { path: PathBuf, reason: String },
}

pub trait Engine {
    fn start(&mut self);
    fn pause(&mut self);
    /// Halt output for good. The engine is dropped right after.
    fn stop(&mut self);
    fn set_volume(&mut self, volume: f32);
    fn position(&self) -> Duration;
    /// Total length; `Duration::ZERO` when the media does not report one.
    fn duration(&self) -> Duration;
    /// The track played through to its end.
    fn is_finished(&self) -> bool;
}

pub trait Backend {
    type Engine: Engine;

    /// Prepare a paused engine positioned at the start of `track`.
    fn open(&mut self, track: &Track) -> Result<Self::Engine, EngineError>;
}
