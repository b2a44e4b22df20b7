//! UI rendering helpers for the terminal user interface.
//!
//! One screen: header, the now-playing box with a progress gauge, and the
//! controls footer. The metadata popup overlays the middle of the screen.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style, Stylize},
    text::Line,
    widgets::{Block, Borders, Clear, Gauge, Padding, Paragraph, Wrap},
};

use crate::app::App;
use crate::audio::PlaybackState;
use crate::config::UiSettings;

const CONTROLS: [(&str, &str); 5] = [
    ("space/p", "play/pause"),
    ("h/l", "prev/next"),
    ("←/→", "prev/next"),
    ("K", "metadata"),
    ("q", "quit"),
];

fn controls_text() -> String {
    CONTROLS
        .iter()
        .map(|(k, v)| format!("[{}] {}", k, v))
        .collect::<Vec<String>>()
        .join(" | ")
}

/// The button the original layout would show: play while paused, pause while playing.
fn transport_label(state: PlaybackState) -> &'static str {
    match state {
        PlaybackState::Paused => "▶ play",
        PlaybackState::Playing => "⏸ pause",
        PlaybackState::Released => "■ stopped",
    }
}

/// Compute a centered rectangle with given size constrained to `r`.
fn centered_rect_sized(mut width: u16, mut height: u16, r: Rect) -> Rect {
    width = width.min(r.width.saturating_sub(2)).max(10);
    height = height.min(r.height.saturating_sub(2)).max(5);

    let x = r.x + (r.width.saturating_sub(width) / 2);
    let y = r.y + (r.height.saturating_sub(height) / 2);
    Rect {
        x,
        y,
        width,
        height,
    }
}

fn padded(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .title(title)
        .padding(Padding {
            left: 1,
            right: 0,
            top: 0,
            bottom: 0,
        })
}

/// Render the entire UI into the provided `frame` using `app` state and settings.
pub fn draw(frame: &mut Frame, app: &App, ui_settings: &UiSettings) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(6),
            Constraint::Length(3),
            Constraint::Length(3),
        ])
        .split(frame.area());

    let header = Paragraph::new(ui_settings.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" cassette ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    let state = app.playback();
    let mut lines = vec![
        Line::from(app.now.title.clone()).bold(),
        Line::from(app.now.artist.clone()),
        Line::from(format!("cover: {}", app.now.artwork.label())).italic(),
        Line::from(""),
        Line::from(format!("[{}]", transport_label(state))),
    ];
    if let Some(dir) = &app.assets_dir {
        lines.push(Line::from(format!("{} tracks from {}", app.track_count, dir)).dim());
    }
    let now_playing = Paragraph::new(lines)
        .block(padded(" now playing "))
        .wrap(Wrap { trim: true });
    frame.render_widget(now_playing, chunks[1]);

    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title(" progress "))
        .gauge_style(Style::default().add_modifier(Modifier::REVERSED))
        .ratio(app.progress())
        .label(format!("{} / {}", app.elapsed_text(), app.total_text()));
    frame.render_widget(gauge, chunks[2]);

    let footer = Paragraph::new(controls_text())
        .block(padded(" controls "))
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, chunks[3]);

    if app.metadata_window {
        let popup_area = centered_rect_sized(72, 8, chunks[1]);
        frame.render_widget(Clear, popup_area);

        let meta = format!(
            "Now: {}\nTitle: {}\nArtist: {}\nArtwork: {}\nDuration: {}",
            app.now_playing_text(&ui_settings.artist_title_separator),
            app.now.title,
            app.now.artist,
            app.now
                .artwork
                .path()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "-".to_string()),
            app.total_text(),
        );
        let meta_paragraph = Paragraph::new(meta)
            .block(padded(" metadata (K closes) "))
            .wrap(Wrap { trim: true });
        frame.render_widget(meta_paragraph, popup_area);
    }
}
