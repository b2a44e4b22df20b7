use crate::app::App;
use crate::audio::{NowPlaying, PlaybackState};
use crate::mpris::MprisHandle;
use crate::playlist::ArtworkRef;

/// The part of `NowPlaying` that MPRIS shows. Elapsed time is left out so
/// the sampler's ticks don't turn into D-Bus traffic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MprisView {
    title: String,
    artist: String,
    artwork: ArtworkRef,
    duration_ms: u64,
    state: PlaybackState,
}

impl From<&NowPlaying> for MprisView {
    fn from(now: &NowPlaying) -> Self {
        Self {
            title: now.title.clone(),
            artist: now.artist.clone(),
            artwork: now.artwork.clone(),
            duration_ms: now.duration_ms,
            state: now.state(),
        }
    }
}

/// Push `app`'s state to MPRIS if what MPRIS shows has changed since `last`.
pub fn update_mpris(mpris: &MprisHandle, app: &App, last: &mut Option<MprisView>) {
    let view = MprisView::from(&app.now);
    if last.as_ref() != Some(&view) {
        mpris.set_now_playing(&app.now);
        *last = Some(view);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::StateUpdate;

    #[test]
    fn elapsed_ticks_do_not_change_the_view() {
        let mut now = NowPlaying::default();
        now.apply(&StateUpdate::Title("In The End".into()));
        let before = MprisView::from(&now);

        now.apply(&StateUpdate::Elapsed(12_345));
        assert_eq!(MprisView::from(&now), before);

        now.apply(&StateUpdate::Playing(true));
        assert_ne!(MprisView::from(&now), before);
    }
}
