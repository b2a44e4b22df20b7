//! The playback controller.
//!
//! A two-state machine (`Paused` / `Playing`) over a fixed playlist, plus a
//! terminal `Released` state entered by [`Controller::stop`]. Track changes
//! keep whichever of `Paused` / `Playing` was requested, even across a track
//! that failed to open. Every observable change goes out through the
//! [`StateBus`].

#[cfg(test)]
use std::sync::mpsc::Receiver;
use std::sync::mpsc::Sender;
use std::thread;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::playlist::Playlist;

use super::bus::StateBus;
use super::engine::{Backend, Engine};
use super::types::StateUpdate;
#[cfg(test)]
use super::types::{NowPlaying, PlaybackState};

const FADE_STEPS: u32 = 20;

pub struct Controller<B: Backend> {
    backend: B,
    playlist: Playlist,
    index: usize,
    /// `None` after release, or when the current track failed to open.
    engine: Option<B::Engine>,
    /// The engine is running.
    playing: bool,
    /// The last `play`/`pause` asked for playback; survives broken tracks.
    wants_playing: bool,
    released: bool,
    bus: StateBus,
}

fn millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

impl<B: Backend> Controller<B> {
    /// Start paused on the first track.
    pub fn new(backend: B, playlist: Playlist) -> Self {
        let mut controller = Self {
            backend,
            playlist,
            index: 0,
            engine: None,
            playing: false,
            wants_playing: false,
            released: false,
            bus: StateBus::default(),
        };
        controller.load(0);
        controller
    }

    #[cfg(test)]
    pub fn index(&self) -> usize {
        self.index
    }

    #[cfg(test)]
    pub fn playlist(&self) -> &Playlist {
        &self.playlist
    }

    #[cfg(test)]
    pub fn state(&self) -> PlaybackState {
        if self.released {
            PlaybackState::Released
        } else if self.playing {
            PlaybackState::Playing
        } else {
            PlaybackState::Paused
        }
    }

    #[cfg(test)]
    pub fn now_playing(&self) -> &NowPlaying {
        self.bus.snapshot()
    }

    #[cfg(test)]
    pub fn has_engine(&self) -> bool {
        self.engine.is_some()
    }

    #[cfg(test)]
    pub fn subscribe(&mut self) -> Receiver<StateUpdate> {
        self.bus.subscribe()
    }

    pub fn attach(&mut self, tx: Sender<StateUpdate>) {
        self.bus.attach(tx);
    }

    fn accepts(&self, command: &str) -> bool {
        if self.released {
            debug!(command, "ignored: player released");
        }
        !self.released
    }

    pub fn play(&mut self) {
        if !self.accepts("play") {
            return;
        }
        self.wants_playing = true;
        self.resume();
    }

    /// Start the engine if there is one; otherwise report not playing.
    fn resume(&mut self) {
        let Some(engine) = self.engine.as_mut() else {
            warn!(index = self.index, "cannot play: current track has no engine");
            self.playing = false;
            self.bus.publish(StateUpdate::Playing(false));
            return;
        };
        engine.start();
        self.playing = true;
        self.bus.publish(StateUpdate::Playing(true));
        self.sample();
    }

    pub fn pause(&mut self) {
        if !self.accepts("pause") {
            return;
        }
        if let Some(engine) = self.engine.as_mut() {
            engine.pause();
        }
        self.sample();
        self.playing = false;
        self.wants_playing = false;
        self.bus.publish(StateUpdate::Playing(false));
    }

    pub fn next(&mut self) {
        if !self.accepts("next") {
            return;
        }
        let index = self.playlist.next_index(self.index);
        debug!(from = self.index, to = index, "next track");
        self.load(index);
    }

    pub fn previous(&mut self) {
        if !self.accepts("previous") {
            return;
        }
        let index = self.playlist.prev_index(self.index);
        debug!(from = self.index, to = index, "previous track");
        self.load(index);
    }

    /// The engine played the current track to its end.
    pub fn on_track_finished(&mut self) {
        debug!(index = self.index, "track finished");
        self.next();
    }

    /// One iteration of the elapsed-time sampler. Does nothing unless playing.
    pub fn tick(&mut self) {
        if self.released || !self.playing {
            return;
        }
        let finished = self.engine.as_ref().is_some_and(|e| e.is_finished());
        if finished {
            self.on_track_finished();
        } else {
            self.sample();
        }
    }

    /// Halt playback and release the engine. Safe to call more than once.
    pub fn stop(&mut self) {
        if self.released {
            debug!("stop: already released");
            return;
        }
        if let Some(mut engine) = self.engine.take() {
            engine.stop();
        }
        self.playing = false;
        self.wants_playing = false;
        self.released = true;
        self.bus.publish(StateUpdate::Playing(false));
        self.bus.publish(StateUpdate::Released);
        info!("player released");
    }

    /// Ramp the volume down to silence. Blocks for roughly `over`.
    pub fn fade_out(&mut self, over: Duration) {
        if self.released || !self.playing || over.is_zero() {
            return;
        }
        let Some(engine) = self.engine.as_mut() else {
            return;
        };
        let step = (over / FADE_STEPS).max(Duration::from_millis(1));
        for i in 1..=FADE_STEPS {
            engine.set_volume(1.0 - i as f32 / FADE_STEPS as f32);
            thread::sleep(step);
        }
        engine.set_volume(0.0);
    }

    /// Replace the engine with one for `index` and republish the track.
    fn load(&mut self, index: usize) {
        if let Some(mut old) = self.engine.take() {
            old.stop();
        }
        self.index = index;

        let track = self.playlist.track(index);
        self.engine = match self.backend.open(track) {
            Ok(engine) => Some(engine),
            Err(e) => {
                warn!(index, error = %e, "failed to open track");
                None
            }
        };

        let (position, duration) = self
            .engine
            .as_ref()
            .map(|e| (e.position(), e.duration()))
            .unwrap_or_default();

        self.bus.publish(StateUpdate::Title(track.title.clone()));
        self.bus.publish(StateUpdate::Artist(track.artist.clone()));
        self.bus.publish(StateUpdate::Artwork(track.artwork.clone()));
        self.bus.publish(StateUpdate::Duration(millis(duration)));
        self.bus.publish(StateUpdate::Elapsed(millis(position)));

        if self.wants_playing {
            self.resume();
        } else {
            self.playing = false;
        }
    }

    fn sample(&mut self) {
        let Some(engine) = self.engine.as_ref() else {
            return;
        };
        let duration = engine.duration();
        let mut position = engine.position();
        if !duration.is_zero() {
            position = position.min(duration);
        }
        self.bus.publish(StateUpdate::Elapsed(millis(position)));
    }
}
