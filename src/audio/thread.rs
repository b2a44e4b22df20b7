use std::sync::mpsc::{Receiver, RecvTimeoutError, SyncSender};
use std::thread;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use rodio::OutputStreamBuilder;
use tracing::{debug, error, info};

use crate::config::AudioSettings;
use crate::playlist::Playlist;

use super::controller::Controller;
use super::engine::Backend;
use super::sink::RodioBackend;
use super::types::AudioCmd;

/// Spawn the thread that owns the output stream and the controller.
///
/// `ready` receives `Ok(())` once the output device is open, or the reason it
/// could not be.
pub(super) fn spawn_audio_thread(
    playlist: Playlist,
    rx: Receiver<AudioCmd>,
    audio_settings: AudioSettings,
    ready: SyncSender<Result<(), String>>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let mut stream = match OutputStreamBuilder::open_default_stream() {
            Ok(s) => s,
            Err(e) => {
                error!(error = %e, "no audio output device");
                let _ = ready.send(Err(e.to_string()));
                return;
            }
        };
        // rodio logs to stderr when OutputStream is dropped. That's useful in debugging,
        // but noisy for a TUI app.
        stream.log_on_drop(false);
        let _ = ready.send(Ok(()));

        let mut controller = Controller::new(RodioBackend::new(&stream), playlist);
        let tick = Duration::from_millis(audio_settings.tick_ms.max(1));
        run_command_loop(&mut controller, &rx, tick);
        info!("audio thread exiting");
    })
}

/// Apply commands as they arrive and run `Controller::tick` every `tick`.
///
/// Returns after `Quit`, or once every sender is gone.
pub(super) fn run_command_loop<B: Backend>(
    controller: &mut Controller<B>,
    rx: &Receiver<AudioCmd>,
    tick: Duration,
) {
    let mut next_tick = Instant::now() + tick;
    loop {
        let wait = next_tick.saturating_duration_since(Instant::now());
        match rx.recv_timeout(wait) {
            Ok(cmd) => {
                debug!(?cmd, "command");
                match cmd {
                    AudioCmd::Play => controller.play(),
                    AudioCmd::Pause => controller.pause(),
                    AudioCmd::Next => controller.next(),
                    AudioCmd::Previous => controller.previous(),
                    AudioCmd::Stop => controller.stop(),
                    AudioCmd::Subscribe(tx) => controller.attach(tx),
                    AudioCmd::Quit { fade_out_ms } => {
                        controller.fade_out(Duration::from_millis(fade_out_ms));
                        controller.stop();
                        return;
                    }
                }
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => {
                controller.stop();
                return;
            }
        }

        let now = Instant::now();
        if now >= next_tick {
            controller.tick();
            next_tick = now + tick;
        }
    }
}
