use std::sync::Mutex;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::JoinHandle;
use std::time::Duration;

use thiserror::Error;

use crate::config::AudioSettings;
use crate::playlist::Playlist;

use super::thread::spawn_audio_thread;
use super::types::{AudioCmd, StateUpdate};

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("no audio output device: {0}")]
    NoOutput(String),

    #[error("audio thread exited during startup")]
    ThreadGone,
}

/// `Quit` with the fade length in milliseconds, saturating at `u64::MAX`.
pub(super) fn quit_cmd(fade_out: Duration) -> AudioCmd {
    AudioCmd::Quit {
        fade_out_ms: u64::try_from(fade_out.as_millis()).unwrap_or(u64::MAX),
    }
}

/// Handle to the audio thread: commands go in, state updates come out.
pub struct AudioPlayer {
    tx: Sender<AudioCmd>,
    join: Mutex<Option<JoinHandle<()>>>,
}

impl AudioPlayer {
    /// Spawn the audio thread and wait until the output device is open.
    pub fn new(playlist: Playlist, audio_settings: AudioSettings) -> Result<Self, AudioError> {
        let (tx, rx) = mpsc::channel::<AudioCmd>();
        let (ready_tx, ready_rx) = mpsc::sync_channel(1);

        let audio_handle = spawn_audio_thread(playlist, rx, audio_settings, ready_tx);

        let startup = ready_rx.recv();
        match startup {
            Ok(Ok(())) => Ok(Self {
                tx,
                join: Mutex::new(Some(audio_handle)),
            }),
            Ok(Err(reason)) => {
                let _ = audio_handle.join();
                Err(AudioError::NoOutput(reason))
            }
            Err(_) => {
                let _ = audio_handle.join();
                Err(AudioError::ThreadGone)
            }
        }
    }

    pub fn send(&self, cmd: AudioCmd) -> Result<(), mpsc::SendError<AudioCmd>> {
        self.tx.send(cmd)
    }

    /// Observe playback state. The current values arrive first.
    pub fn subscribe(&self) -> Receiver<StateUpdate> {
        let (tx, rx) = mpsc::channel();
        let _ = self.send(AudioCmd::Subscribe(tx));
        rx
    }

    /// Fade out, release the engine and wait for the audio thread to finish.
    pub fn quit_softly(&self, fade_out: Duration) {
        let _ = self.send(quit_cmd(fade_out));

        if let Ok(mut j) = self.join.lock() {
            if let Some(h) = j.take() {
                let _ = h.join();
            }
        }
    }
}
