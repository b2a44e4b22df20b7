//! `rodio`-backed engine.
//!
//! Every track gets its own paused `Sink` on the shared output stream; the
//! sink is stopped and dropped when the controller moves on.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;

use lofty::prelude::AudioFile;
use rodio::{Decoder, OutputStream, Sink, Source};

use crate::playlist::Track;

use super::engine::{Backend, Engine, EngineError};

pub(super) struct RodioBackend<'a> {
    stream: &'a OutputStream,
}

impl<'a> RodioBackend<'a> {
    pub(super) fn new(stream: &'a OutputStream) -> Self {
        Self { stream }
    }
}

pub(super) struct RodioEngine {
    sink: Sink,
    duration: Duration,
}

/// Fall back to the container metadata when the decoder can't tell the length.
fn probe_duration(path: &Path) -> Option<Duration> {
    lofty::read_from_path(path)
        .ok()
        .map(|f| f.properties().duration())
        .filter(|d| !d.is_zero())
}

impl Backend for RodioBackend<'_> {
    type Engine = RodioEngine;

    fn open(&mut self, track: &Track) -> Result<RodioEngine, EngineError> {
        let file = File::open(&track.audio).map_err(|source| EngineError::Open {
            path: track.audio.clone(),
            source,
        })?;

        let source = Decoder::new(BufReader::new(file)).map_err(|e| EngineError::Decode {
            path: track.audio.clone(),
            reason: e.to_string(),
        })?;

        let duration = source
            .total_duration()
            .or_else(|| probe_duration(&track.audio))
            .unwrap_or(Duration::ZERO);

        let sink = Sink::connect_new(self.stream.mixer());
        sink.append(source);
        sink.pause();

        Ok(RodioEngine { sink, duration })
    }
}

impl Engine for RodioEngine {
    fn start(&mut self) {
        self.sink.play();
    }

    fn pause(&mut self) {
        self.sink.pause();
    }

    fn stop(&mut self) {
        self.sink.stop();
    }

    fn set_volume(&mut self, volume: f32) {
        self.sink.set_volume(volume);
    }

    fn position(&self) -> Duration {
        self.sink.get_pos()
    }

    fn duration(&self) -> Duration {
        self.duration
    }

    fn is_finished(&self) -> bool {
        self.sink.empty()
    }
}
