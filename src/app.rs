//! Application module: exposes the app model used by the TUI and runtime.
//!
//! The `App` model lives in `app::model` and mirrors the playback state
//! published by the audio thread.

mod model;

pub use model::*;
