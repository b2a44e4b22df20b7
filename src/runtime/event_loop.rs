use std::sync::mpsc::{Receiver, Sender};
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::debug;

use crate::app::App;
use crate::audio::{AudioCmd, AudioPlayer, StateUpdate};
use crate::config;
use crate::mpris::{ControlCmd, MprisHandle};
use crate::runtime::mpris_sync::{MprisView, update_mpris};
use crate::ui;

/// State tracked by the runtime event loop across iterations.
#[derive(Default)]
pub struct EventLoopState {
    /// What MPRIS was last told.
    pub last_mpris: Option<MprisView>,
}

/// Main terminal event loop: mirrors playback state onto the UI and MPRIS,
/// and turns key presses and MPRIS calls into player commands. Returns
/// `Ok(())` when the user quits.
pub fn run(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    app: &mut App,
    audio_player: &AudioPlayer,
    updates: &Receiver<StateUpdate>,
    mpris: Option<&MprisHandle>,
    control_tx: &Sender<ControlCmd>,
    control_rx: &Receiver<ControlCmd>,
    state: &mut EventLoopState,
) -> Result<()> {
    let mut redraw = true;
    loop {
        if drain_updates(app, updates) {
            redraw = true;
        }

        if let Some(mpris) = mpris {
            update_mpris(mpris, app, &mut state.last_mpris);
        }

        if redraw {
            terminal.draw(|f| ui::draw(f, app, &settings.ui))?;
            redraw = false;
        }

        while let Ok(cmd) = control_rx.try_recv() {
            debug!(?cmd, "control");
            match audio_cmd_for(&cmd, app) {
                Some(audio_cmd) => {
                    let _ = audio_player.send(audio_cmd);
                }
                None => return Ok(()),
            }
        }

        if event::poll(Duration::from_millis(50))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    handle_key_event(key, app, control_tx);
                    redraw = true;
                }
                Event::Resize(..) => redraw = true,
                _ => {}
            }
        }
    }
}

/// Apply every pending state update to `app`. Returns whether anything changed.
pub fn drain_updates(app: &mut App, updates: &Receiver<StateUpdate>) -> bool {
    let mut changed = false;
    for update in updates.try_iter() {
        changed |= app.apply(&update);
    }
    changed
}

/// Map a control command onto the player. `None` means quit.
fn audio_cmd_for(cmd: &ControlCmd, app: &App) -> Option<AudioCmd> {
    match cmd {
        ControlCmd::Quit => None,
        ControlCmd::Play => Some(AudioCmd::Play),
        ControlCmd::Pause => Some(AudioCmd::Pause),
        ControlCmd::PlayPause => Some(if app.now.playing {
            AudioCmd::Pause
        } else {
            AudioCmd::Play
        }),
        ControlCmd::Next => Some(AudioCmd::Next),
        ControlCmd::Prev => Some(AudioCmd::Previous),
    }
}

/// Keys share the MPRIS command path so both behave the same.
fn handle_key_event(key: KeyEvent, app: &mut App, control_tx: &Sender<ControlCmd>) {
    let cmd = match key.code {
        KeyCode::Char('q') | KeyCode::Esc => ControlCmd::Quit,
        KeyCode::Char(' ') | KeyCode::Char('p') => ControlCmd::PlayPause,
        KeyCode::Char('l') | KeyCode::Char('n') | KeyCode::Right => ControlCmd::Next,
        KeyCode::Char('h') | KeyCode::Char('b') | KeyCode::Left => ControlCmd::Prev,
        KeyCode::Char('K') => {
            app.toggle_metadata_window();
            return;
        }
        _ => return,
    };
    let _ = control_tx.send(cmd);
}
