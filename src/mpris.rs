//! MPRIS service: the desktop's media notification for this player.
//!
//! Desktop shells and media keys see the current track and the transport
//! state, and can send play / pause / next / previous at any time. Incoming
//! calls are forwarded as [`ControlCmd`]s; outgoing state is written into a
//! shared mirror by the UI thread and announced with `PropertiesChanged`.

use std::collections::HashMap;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_io::{Timer, block_on};
use tracing::{info, warn};
use zbus::{Connection, interface};
use zvariant::{OwnedValue, Value};

use crate::audio::{NowPlaying, PlaybackState};

const OBJECT_PATH: &str = "/org/mpris/MediaPlayer2";
const BUS_NAME: &str = "org.mpris.MediaPlayer2.cassette";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ControlCmd {
    Quit,
    Play,
    Pause,
    PlayPause,
    Next,
    Prev,
}

#[derive(Debug, Default)]
struct SharedState {
    playback: PlaybackState,
    title: Option<String>,
    artist: Option<String>,
    art_url: Option<String>,
    length_micros: Option<i64>,
}

pub struct MprisHandle {
    state: Arc<Mutex<SharedState>>,
    notify: Sender<()>,
}

fn non_empty(s: &str) -> Option<String> {
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_string())
}

impl MprisHandle {
    /// Mirror `now` onto the bus. A released player clears everything.
    pub fn set_now_playing(&self, now: &NowPlaying) {
        if let Ok(mut s) = self.state.lock() {
            if now.released {
                *s = SharedState {
                    playback: PlaybackState::Released,
                    ..SharedState::default()
                };
            } else {
                s.playback = now.state();
                s.title = non_empty(&now.title);
                s.artist = non_empty(&now.artist);
                s.art_url = now
                    .artwork
                    .path()
                    .map(|p| format!("file://{}", p.display()));
                s.length_micros = (now.duration_ms > 0)
                    .then(|| i64::try_from(now.duration_ms.saturating_mul(1000)).unwrap_or(i64::MAX));
            }
        }
        let _ = self.notify.send(());
    }
}

struct RootIface {
    tx: Sender<ControlCmd>,
}

#[interface(name = "org.mpris.MediaPlayer2")]
impl RootIface {
    fn raise(&self) {
        // No-op for TUI.
    }

    fn quit(&self) {
        let _ = self.tx.send(ControlCmd::Quit);
    }

    #[zbus(property)]
    fn can_quit(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_raise(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn has_track_list(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn identity(&self) -> &str {
        "cassette"
    }

    #[zbus(property)]
    fn supported_uri_schemes(&self) -> Vec<String> {
        vec![]
    }

    #[zbus(property)]
    fn supported_mime_types(&self) -> Vec<String> {
        vec![]
    }
}

struct PlayerIface {
    tx: Sender<ControlCmd>,
    state: Arc<Mutex<SharedState>>,
}

fn insert_value(map: &mut HashMap<String, OwnedValue>, key: &str, value: Value<'_>) {
    if let Ok(v) = OwnedValue::try_from(value) {
        map.insert(key.to_string(), v);
    }
}

#[interface(name = "org.mpris.MediaPlayer2.Player")]
impl PlayerIface {
    fn next(&self) {
        let _ = self.tx.send(ControlCmd::Next);
    }

    fn previous(&self) {
        let _ = self.tx.send(ControlCmd::Prev);
    }

    fn play(&self) {
        let _ = self.tx.send(ControlCmd::Play);
    }

    fn pause(&self) {
        let _ = self.tx.send(ControlCmd::Pause);
    }

    fn play_pause(&self) {
        let _ = self.tx.send(ControlCmd::PlayPause);
    }

    fn stop(&self) {
        // Releasing the engine is reserved for shutdown.
        let _ = self.tx.send(ControlCmd::Pause);
    }

    #[zbus(property)]
    fn playback_status(&self) -> &str {
        let Ok(s) = self.state.lock() else {
            return "Stopped";
        };
        match s.playback {
            PlaybackState::Released => "Stopped",
            PlaybackState::Playing => "Playing",
            PlaybackState::Paused => "Paused",
        }
    }

    #[zbus(property)]
    fn can_control(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_play(&self) -> bool {
        self.is_live()
    }

    #[zbus(property)]
    fn can_pause(&self) -> bool {
        self.is_live()
    }

    #[zbus(property)]
    fn can_go_next(&self) -> bool {
        self.is_live()
    }

    #[zbus(property)]
    fn can_go_previous(&self) -> bool {
        self.is_live()
    }

    #[zbus(property)]
    fn metadata(&self) -> HashMap<String, OwnedValue> {
        let mut map = HashMap::new();
        let Ok(s) = self.state.lock() else {
            return map;
        };

        if let Some(title) = &s.title {
            insert_value(&mut map, "xesam:title", Value::from(title.clone()));
        }
        if let Some(artist) = &s.artist {
            insert_value(&mut map, "xesam:artist", Value::from(vec![artist.clone()]));
        }
        if let Some(url) = &s.art_url {
            insert_value(&mut map, "mpris:artUrl", Value::from(url.clone()));
        }
        if let Some(len) = s.length_micros {
            insert_value(&mut map, "mpris:length", Value::from(len));
        }
        map
    }
}

impl PlayerIface {
    fn is_live(&self) -> bool {
        self.state
            .lock()
            .map(|s| s.playback != PlaybackState::Released)
            .unwrap_or(false)
    }
}

async fn serve(
    tx: Sender<ControlCmd>,
    state: Arc<Mutex<SharedState>>,
    notify_rx: Receiver<()>,
) -> zbus::Result<()> {
    let connection = Connection::session().await?;
    connection.request_name(BUS_NAME).await?;

    let object_server = connection.object_server();
    object_server
        .at(OBJECT_PATH, RootIface { tx: tx.clone() })
        .await?;
    object_server
        .at(OBJECT_PATH, PlayerIface { tx, state })
        .await?;
    info!(name = BUS_NAME, "MPRIS service registered");

    let player = object_server
        .interface::<_, PlayerIface>(OBJECT_PATH)
        .await?;

    loop {
        Timer::after(Duration::from_millis(250)).await;
        if notify_rx.try_iter().count() == 0 {
            continue;
        }
        let iface = player.get().await;
        let emitter = player.signal_emitter();
        iface.playback_status_changed(emitter).await?;
        iface.metadata_changed(emitter).await?;
        iface.can_play_changed(emitter).await?;
    }
}

pub fn spawn_mpris(tx: Sender<ControlCmd>) -> MprisHandle {
    let state = Arc::new(Mutex::new(SharedState::default()));
    let (notify, notify_rx) = mpsc::channel::<()>();

    let state_for_thread = state.clone();
    std::thread::spawn(move || {
        if let Err(e) = block_on(serve(tx, state_for_thread, notify_rx)) {
            warn!(error = %e, "MPRIS service unavailable");
        }
    });

    MprisHandle { state, notify }
}
