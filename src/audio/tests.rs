use std::cell::RefCell;
use std::collections::HashMap;
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::mpsc::{self, Receiver};
use std::time::Duration;

use crate::playlist::{ArtworkRef, Playlist, Track};

use super::bus::StateBus;
use super::controller::Controller;
use super::engine::{Backend, Engine, EngineError};
use super::player::quit_cmd;
use super::thread::run_command_loop;
use super::types::{AudioCmd, PlaybackState, StateUpdate};

/// What the fake engines have been asked to do, and what they report.
#[derive(Debug, Default)]
struct Probe {
    opened: Vec<String>,
    started: usize,
    stopped: usize,
    position: Duration,
    finished: bool,
    volume: f32,
}

type Shared = Rc<RefCell<Probe>>;

struct FakeBackend {
    probe: Shared,
    durations: HashMap<String, Duration>,
    failing: Vec<String>,
}

struct FakeEngine {
    probe: Shared,
    duration: Duration,
}

impl Backend for FakeBackend {
    type Engine = FakeEngine;

    fn open(&mut self, track: &Track) -> Result<FakeEngine, EngineError> {
        if self.failing.contains(&track.title) {
            return Err(EngineError::Decode {
                path: track.audio.clone(),
                reason: "corrupt".to_string(),
            });
        }
        let mut p = self.probe.borrow_mut();
        p.opened.push(track.title.clone());
        p.position = Duration::ZERO;
        p.finished = false;
        Ok(FakeEngine {
            probe: self.probe.clone(),
            duration: self
                .durations
                .get(&track.title)
                .copied()
                .unwrap_or(Duration::from_secs(180)),
        })
    }
}

impl Engine for FakeEngine {
    fn start(&mut self) {
        self.probe.borrow_mut().started += 1;
    }

    fn pause(&mut self) {}

    fn stop(&mut self) {
        self.probe.borrow_mut().stopped += 1;
    }

    fn set_volume(&mut self, volume: f32) {
        self.probe.borrow_mut().volume = volume;
    }

    fn position(&self) -> Duration {
        self.probe.borrow().position
    }

    fn duration(&self) -> Duration {
        self.duration
    }

    fn is_finished(&self) -> bool {
        self.probe.borrow().finished
    }
}

fn track(title: &str) -> Track {
    Track {
        artist: format!("{title} artist"),
        title: title.to_string(),
        audio: PathBuf::from(format!("/tapes/{title}.mp3")),
        artwork: ArtworkRef::File(PathBuf::from(format!("/tapes/{title}.jpg"))),
    }
}

fn abc() -> Playlist {
    Playlist::new(vec![track("A"), track("B"), track("C")]).unwrap()
}

fn controller_with(failing: &[&str]) -> (Controller<FakeBackend>, Shared) {
    let probe = Shared::default();
    let durations = HashMap::from([
        ("A".to_string(), Duration::from_secs(180)),
        ("B".to_string(), Duration::from_secs(200)),
        ("C".to_string(), Duration::from_secs(240)),
    ]);
    let backend = FakeBackend {
        probe: probe.clone(),
        durations,
        failing: failing.iter().map(|s| s.to_string()).collect(),
    };
    (Controller::new(backend, abc()), probe)
}

fn controller() -> (Controller<FakeBackend>, Shared) {
    controller_with(&[])
}

fn drain(rx: &Receiver<StateUpdate>) -> Vec<StateUpdate> {
    rx.try_iter().collect()
}

#[test]
fn starts_paused_on_first_track() {
    let (c, probe) = controller();
    let now = c.now_playing();

    assert_eq!(c.index(), 0);
    assert_eq!(c.state(), PlaybackState::Paused);
    assert_eq!(now.title, "A");
    assert_eq!(now.artist, "A artist");
    assert_eq!(now.artwork, ArtworkRef::File(PathBuf::from("/tapes/A.jpg")));
    assert_eq!(now.duration_ms, 180_000);
    assert_eq!(now.elapsed_ms, 0);
    assert!(!now.playing);
    assert_eq!(probe.borrow().opened, vec!["A".to_string()]);
    assert_eq!(probe.borrow().started, 0);
}

#[test]
fn next_and_previous_wrap_from_every_index() {
    let n = abc().len();
    for i in 0..n {
        let (mut c, _) = controller();
        for _ in 0..i {
            c.next();
        }
        assert_eq!(c.index(), i);

        c.next();
        assert_eq!(c.index(), (i + 1) % n);

        c.previous();
        c.previous();
        assert_eq!(c.index(), (i + n - 1) % n);
    }
}

#[test]
fn next_n_times_returns_to_the_start() {
    let (mut c, probe) = controller();
    for _ in 0..c.playlist().len() {
        c.next();
    }
    assert_eq!(c.index(), 0);
    assert_eq!(c.now_playing().title, "A");
    assert_eq!(probe.borrow().opened, vec!["A", "B", "C", "A"]);
}

#[test]
fn previous_from_first_while_paused_lands_on_last_and_stays_paused() {
    let (mut c, probe) = controller();

    c.previous();

    assert_eq!(c.index(), 2);
    assert_eq!(c.now_playing().title, "C");
    assert_eq!(c.now_playing().duration_ms, 240_000);
    assert_eq!(c.state(), PlaybackState::Paused);
    assert_eq!(probe.borrow().started, 0);
}

#[test]
fn next_from_last_while_playing_wraps_and_keeps_playing() {
    let (mut c, probe) = controller();
    c.previous();
    c.play();
    let rx = c.subscribe();
    drain(&rx);
    probe.borrow_mut().position = Duration::from_secs(30);

    c.next();

    assert_eq!(c.index(), 0);
    assert_eq!(c.state(), PlaybackState::Playing);
    assert_eq!(probe.borrow().started, 2);

    let updates = drain(&rx);
    assert!(updates.contains(&StateUpdate::Title("A".to_string())));
    assert!(updates.contains(&StateUpdate::Duration(180_000)));
    assert!(updates.contains(&StateUpdate::Elapsed(0)));
    assert!(updates.contains(&StateUpdate::Playing(true)));
}

#[test]
fn track_change_releases_the_previous_engine() {
    let (mut c, probe) = controller();
    c.next();
    assert_eq!(probe.borrow().stopped, 1);
    assert_eq!(probe.borrow().opened, vec!["A", "B"]);
}

#[test]
fn play_then_pause_freezes_elapsed() {
    let (mut c, probe) = controller();

    c.play();
    probe.borrow_mut().position = Duration::from_millis(5_000);
    c.tick();
    assert_eq!(c.now_playing().elapsed_ms, 5_000);

    probe.borrow_mut().position = Duration::from_millis(6_000);
    c.pause();
    assert!(!c.now_playing().playing);
    assert_eq!(c.now_playing().elapsed_ms, 6_000);

    probe.borrow_mut().position = Duration::from_millis(9_000);
    c.tick();
    c.tick();
    assert_eq!(c.now_playing().elapsed_ms, 6_000);
    assert_eq!(c.state(), PlaybackState::Paused);
}

#[test]
fn tick_is_silent_while_paused() {
    let (mut c, probe) = controller();
    let rx = c.subscribe();
    drain(&rx);

    probe.borrow_mut().position = Duration::from_secs(3);
    c.tick();

    assert!(drain(&rx).is_empty());
}

#[test]
fn elapsed_is_clamped_to_the_duration() {
    let (mut c, probe) = controller();
    c.play();
    probe.borrow_mut().position = Duration::from_secs(500);
    c.tick();
    assert_eq!(c.now_playing().elapsed_ms, 180_000);
}

#[test]
fn completion_behaves_like_next() {
    let (mut finished, finished_probe) = controller();
    let (mut skipped, _) = controller();

    finished.play();
    skipped.play();

    finished_probe.borrow_mut().finished = true;
    finished.tick();
    skipped.next();

    assert_eq!(finished.index(), skipped.index());
    assert_eq!(finished.state(), skipped.state());
    assert_eq!(finished.now_playing(), skipped.now_playing());
}

#[test]
fn completion_is_ignored_while_paused() {
    let (mut c, probe) = controller();
    probe.borrow_mut().finished = true;
    c.tick();
    assert_eq!(c.index(), 0);
}

#[test]
fn stop_is_idempotent_and_terminal() {
    let (mut c, probe) = controller();
    let rx = c.subscribe();
    c.play();

    c.stop();
    c.stop();

    assert_eq!(c.state(), PlaybackState::Released);
    assert!(!c.has_engine());
    assert_eq!(probe.borrow().stopped, 1);
    let released = drain(&rx)
        .into_iter()
        .filter(|u| *u == StateUpdate::Released)
        .count();
    assert_eq!(released, 1);

    c.next();
    c.play();
    c.tick();
    assert_eq!(c.index(), 0);
    assert_eq!(c.state(), PlaybackState::Released);
    assert_eq!(probe.borrow().started, 1);
}

#[test]
fn failed_track_is_published_but_cannot_play() {
    let (mut c, _) = controller_with(&["B"]);
    c.play();

    c.next();

    assert_eq!(c.index(), 1);
    assert!(!c.has_engine());
    let now = c.now_playing();
    assert_eq!(now.title, "B");
    assert_eq!(now.duration_ms, 0);
    assert_eq!(now.elapsed_ms, 0);
    assert!(!now.playing);

    c.next();
    assert_eq!(c.now_playing().title, "C");
    assert!(c.has_engine());
    assert_eq!(c.state(), PlaybackState::Playing);
    assert!(c.now_playing().playing);
}

#[test]
fn skipping_past_a_failed_track_keeps_requested_state() {
    let (mut c, probe) = controller_with(&["B"]);
    c.play();
    c.next();
    c.previous();
    assert_eq!(c.index(), 0);
    assert_eq!(c.state(), PlaybackState::Playing);
    assert_eq!(probe.borrow().started, 2);

    c.pause();
    c.next();
    c.next();
    assert_eq!(c.index(), 2);
    assert_eq!(c.state(), PlaybackState::Paused);
    assert_eq!(probe.borrow().started, 2);
}

#[test]
fn play_requested_on_a_failed_track_resumes_on_the_next() {
    let (mut c, _) = controller_with(&["B"]);
    c.next();
    c.play();
    assert_eq!(c.state(), PlaybackState::Paused);
    assert!(!c.now_playing().playing);

    c.next();
    assert_eq!(c.now_playing().title, "C");
    assert_eq!(c.state(), PlaybackState::Playing);
}

#[test]
fn new_subscriber_gets_current_state_first() {
    let (mut c, _) = controller();
    c.next();
    c.play();

    let rx = c.subscribe();
    let replay = drain(&rx);
    assert!(replay.contains(&StateUpdate::Title("B".to_string())));
    assert!(replay.contains(&StateUpdate::Duration(200_000)));
    assert!(replay.contains(&StateUpdate::Playing(true)));

    c.pause();
    assert_eq!(drain(&rx).last(), Some(&StateUpdate::Playing(false)));
}

#[test]
fn bus_drops_subscribers_that_went_away() {
    let mut bus = StateBus::default();
    let kept = bus.subscribe();
    let gone = bus.subscribe();
    drop(gone);

    bus.publish(StateUpdate::Playing(true));

    assert_eq!(bus.subscriber_count(), 1);
    assert_eq!(drain(&kept).last(), Some(&StateUpdate::Playing(true)));
    assert!(bus.snapshot().playing);
}

#[test]
fn fade_out_ends_silent() {
    let (mut c, probe) = controller();
    c.play();
    c.fade_out(Duration::from_millis(20));
    assert_eq!(probe.borrow().volume, 0.0);
}

#[test]
fn command_loop_applies_commands_and_exits_on_quit() {
    let (mut c, _) = controller();
    let (tx, rx) = mpsc::channel();
    let (state_tx, state_rx) = mpsc::channel();

    tx.send(AudioCmd::Subscribe(state_tx)).unwrap();
    tx.send(AudioCmd::Play).unwrap();
    tx.send(AudioCmd::Next).unwrap();
    tx.send(AudioCmd::Previous).unwrap();
    tx.send(AudioCmd::Previous).unwrap();
    tx.send(AudioCmd::Pause).unwrap();
    tx.send(AudioCmd::Quit { fade_out_ms: 0 }).unwrap();

    run_command_loop(&mut c, &rx, Duration::from_secs(60));

    assert_eq!(c.index(), 2);
    assert_eq!(c.state(), PlaybackState::Released);
    let updates = drain(&state_rx);
    assert!(updates.contains(&StateUpdate::Title("C".to_string())));
    assert_eq!(updates.last(), Some(&StateUpdate::Released));
}

#[test]
fn command_loop_releases_when_senders_are_dropped() {
    let (mut c, probe) = controller();
    let (tx, rx) = mpsc::channel();
    tx.send(AudioCmd::Play).unwrap();
    drop(tx);

    run_command_loop(&mut c, &rx, Duration::from_secs(60));

    assert_eq!(c.state(), PlaybackState::Released);
    assert_eq!(probe.borrow().stopped, 1);
}

#[test]
fn quit_command_saturates_long_fades() {
    assert!(matches!(
        quit_cmd(Duration::from_millis(300)),
        AudioCmd::Quit { fade_out_ms: 300 }
    ));
    assert!(matches!(
        quit_cmd(Duration::MAX),
        AudioCmd::Quit { fade_out_ms: u64::MAX }
    ));
}
