//! Audio-related small types.
//!
//! Commands accepted by the audio thread, the values it publishes, and the
//! `NowPlaying` snapshot those values add up to.

use std::sync::mpsc::Sender;

use crate::playlist::ArtworkRef;

/// Controller state machine. `Released` is terminal.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum PlaybackState {
    #[default]
    Paused,
    Playing,
    Released,
}

#[derive(Debug)]
pub enum AudioCmd {
    /// Start or resume the current track.
    Play,
    /// Pause, keeping the position.
    Pause,
    /// Skip to the next track, wrapping at the end.
    Next,
    /// Go to the previous track, wrapping at the start.
    Previous,
    /// Halt playback and release the engine. No further commands take effect.
    Stop,
    /// Register an observer; it immediately receives the current state.
    Subscribe(Sender<StateUpdate>),
    /// Stop and exit the audio thread, fading out over `fade_out_ms` milliseconds.
    Quit { fade_out_ms: u64 },
}

/// One published value change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateUpdate {
    Title(String),
    Artist(String),
    Artwork(ArtworkRef),
    /// Elapsed playback position in milliseconds.
    Elapsed(u64),
    /// Total track length in milliseconds (0 when unknown).
    Duration(u64),
    Playing(bool),
    /// The engine was released; the player accepts no more commands.
    Released,
}

/// Everything an observer can know about playback.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NowPlaying {
    pub title: String,
    pub artist: String,
    pub artwork: ArtworkRef,
    pub elapsed_ms: u64,
    pub duration_ms: u64,
    pub playing: bool,
    pub released: bool,
}

impl NowPlaying {
    pub fn apply(&mut self, update: &StateUpdate) {
        match update {
            StateUpdate::Title(t) => self.title = t.clone(),
            StateUpdate::Artist(a) => self.artist = a.clone(),
            StateUpdate::Artwork(a) => self.artwork = a.clone(),
            StateUpdate::Elapsed(ms) => self.elapsed_ms = *ms,
            StateUpdate::Duration(ms) => self.duration_ms = *ms,
            StateUpdate::Playing(p) => self.playing = *p,
            StateUpdate::Released => self.released = true,
        }
    }

    pub fn state(&self) -> PlaybackState {
        if self.released {
            PlaybackState::Released
        } else if self.playing {
            PlaybackState::Playing
        } else {
            PlaybackState::Paused
        }
    }

    /// Updates that rebuild this snapshot from the defaults.
    pub fn replay(&self) -> Vec<StateUpdate> {
        let mut updates = vec![
            StateUpdate::Title(self.title.clone()),
            StateUpdate::Artist(self.artist.clone()),
            StateUpdate::Artwork(self.artwork.clone()),
            StateUpdate::Duration(self.duration_ms),
            StateUpdate::Elapsed(self.elapsed_ms),
            StateUpdate::Playing(self.playing),
        ];
        if self.released {
            updates.push(StateUpdate::Released);
        }
        updates
    }
}
