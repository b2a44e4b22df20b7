//! Playback: the controller state machine and the thread that drives it.
//!
//! The audio thread owns the `rodio` output stream and a [`controller::Controller`]. The
//! rest of the program talks to it through [`AudioPlayer`]: [`AudioCmd`]s go
//! in over a channel, [`StateUpdate`]s come back to every subscriber.

mod bus;
mod controller;
mod engine;
mod player;
mod sink;
mod thread;
mod types;

pub use player::AudioPlayer;
pub use types::{AudioCmd, NowPlaying, PlaybackState, StateUpdate};

#[cfg(test)]
mod tests;
