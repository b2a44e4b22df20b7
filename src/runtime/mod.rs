use std::env;
use std::path::PathBuf;
use std::sync::mpsc;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::info;

use crate::app::App;
use crate::audio::AudioPlayer;
use crate::config;
use crate::mpris::ControlCmd;
use crate::{logging, playlist};

mod event_loop;
mod mpris_sync;
mod settings;

/// Assets directory: first CLI argument, then config, then `./assets`.
fn assets_dir(settings: &config::Settings) -> PathBuf {
    env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .or_else(|| settings.playlist.assets_dir.clone())
        .unwrap_or_else(|| PathBuf::from("assets"))
}

pub fn run() -> Result<()> {
    let settings = settings::load_settings();

    match logging::init(&settings.logging) {
        Ok(Some(path)) => info!(log = %path.display(), "cassette starting"),
        Ok(None) => {}
        Err(e) => eprintln!("cassette: logging disabled: {e:#}"),
    }

    let dir = assets_dir(&settings);
    let playlist = playlist::load(&dir, &settings.playlist)
        .with_context(|| format!("loading playlist from {}", dir.display()))?;
    let track_count = playlist.len();

    let audio_player =
        AudioPlayer::new(playlist, settings.audio.clone()).context("starting audio playback")?;
    let updates = audio_player.subscribe();

    let mut app = App::new(track_count);
    app.set_assets_dir(dir.display().to_string());

    let (control_tx, control_rx) = mpsc::channel::<ControlCmd>();
    let mpris = settings
        .mpris
        .enabled
        .then(|| crate::mpris::spawn_mpris(control_tx.clone()));

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut state = event_loop::EventLoopState::default();
    let run_result = event_loop::run(
        &mut terminal,
        &settings,
        &mut app,
        &audio_player,
        &updates,
        mpris.as_ref(),
        &control_tx,
        &control_rx,
        &mut state,
    );

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    audio_player.quit_softly(Duration::from_millis(settings.audio.quit_fade_out_ms));
    event_loop::drain_updates(&mut app, &updates);
    if let Some(mpris) = &mpris {
        mpris_sync::update_mpris(mpris, &app, &mut state.last_mpris);
    }
    info!("cassette stopped");

    run_result
}
