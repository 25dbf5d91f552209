//! UI rendering for the terminal interface.
//!
//! This module contains functions to render the player using `ratatui`:
//! header, album cards, track list, transport block and key help.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    widgets::{Block, Borders, Gauge, LineGauge, List, ListItem, Padding, Paragraph, Tabs, Wrap},
};
use std::time::Duration;

use crate::app::{App, Pane};
use crate::config::{ControlsSettings, TrackDisplayField, UiSettings};
use crate::library::Track;
use crate::player::{PlaybackState, Player};

/// Format a `Duration` as `MM:SS`.
fn format_mmss(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Format an optional duration as `MM:SS`, `00:00` while unknown.
fn format_clock(d: Option<Duration>) -> String {
    match d {
        Some(d) => format_mmss(d),
        None => "00:00".to_string(),
    }
}

/// The transport time readout: `MM:SS / MM:SS`.
fn time_display(position: Duration, duration: Option<Duration>) -> String {
    format!("{} / {}", format_mmss(position), format_clock(duration))
}

/// Build the now-playing track text according to `ui` settings.
fn now_playing_track_text(track: &Track, ui: &UiSettings) -> String {
    let mut parts: Vec<String> = Vec::new();

    for f in &ui.now_playing_track_fields {
        match f {
            TrackDisplayField::Display => {
                if !track.display.trim().is_empty() {
                    parts.push(track.display.clone());
                }
            }
            TrackDisplayField::Title => {
                if !track.title.trim().is_empty() {
                    parts.push(track.title.clone());
                }
            }
            TrackDisplayField::Artist => {
                if let Some(a) = track
                    .artist
                    .as_deref()
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                {
                    parts.push(a.to_string());
                }
            }
            TrackDisplayField::Album => {
                if let Some(a) = track
                    .album
                    .as_deref()
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                {
                    parts.push(a.to_string());
                }
            }
            TrackDisplayField::Filename => {
                if let Some(stem) = track.path.file_stem().and_then(|s| s.to_str()) {
                    if !stem.trim().is_empty() {
                        parts.push(stem.to_string());
                    }
                }
            }
            TrackDisplayField::Path => {
                parts.push(track.path.display().to_string());
            }
        }
    }

    if parts.is_empty() {
        track.display.clone()
    } else {
        parts.join(&ui.now_playing_track_separator)
    }
}

fn state_label(state: PlaybackState) -> &'static str {
    match state {
        PlaybackState::Idle => "Idle",
        PlaybackState::Playing => "Playing",
        PlaybackState::Paused => "Paused",
        PlaybackState::Stopped => "Stopped",
    }
}

fn pane_title(base: &str, focused: bool) -> String {
    if focused {
        format!(" {base}* ")
    } else {
        format!(" {base} ")
    }
}

/// Render the album cards: a tab per album plus the selected description.
fn draw_albums(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(pane_title("albums", app.pane == Pane::Albums));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if app.albums.is_empty() {
        frame.render_widget(Paragraph::new("no albums in this folder"), inner);
        return;
    }

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1)])
        .split(inner);

    let titles: Vec<String> = app.albums.iter().map(|a| a.title.clone()).collect();
    let tabs = Tabs::new(titles)
        .select(app.album_selected)
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
    frame.render_widget(tabs, rows[0]);

    let description = app
        .selected_album()
        .and_then(|a| a.description.as_deref())
        .unwrap_or("");
    frame.render_widget(Paragraph::new(description), rows[1]);
}

/// Render the playlist, windowed so the cursor stays visible and centered.
fn draw_tracks(frame: &mut Frame, app: &App, player: &Player, area: Rect) {
    let title = if app.loading {
        pane_title("tracks (loading)", app.pane == Pane::Tracks)
    } else {
        pane_title("tracks", app.pane == Pane::Tracks)
    };

    let tracks = player.tracks();
    let total = tracks.len();
    let list_height = area.height.saturating_sub(2) as usize;
    let sel_pos = app.track_selected.min(total.saturating_sub(1));

    let (start, end, selected_pos_in_visible) = if total <= list_height || list_height == 0 {
        (0, total, sel_pos)
    } else {
        let half = list_height / 2;
        let mut start = if sel_pos > half { sel_pos - half } else { 0 };
        if start + list_height > total {
            start = total - list_height;
        }
        (start, start + list_height, sel_pos - start)
    };

    let playing = player.current_index();
    let visible_items: Vec<ListItem> = tracks[start..end]
        .iter()
        .enumerate()
        .map(|(offset, track)| {
            let i = start + offset;
            if playing == Some(i) {
                ListItem::new(format!("♪ {}", track.display))
            } else {
                ListItem::new(format!("  {}", track.display))
            }
        })
        .collect();

    let list = List::new(visible_items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");
    let mut state = ratatui::widgets::ListState::default();
    if total > 0 {
        state.select(Some(selected_pos_in_visible));
    }
    frame.render_stateful_widget(list, area, &mut state);
}

/// Render the transport block: now-playing line, seek bar and volume bar.
fn draw_transport(frame: &mut Frame, app: &App, player: &Player, ui: &UiSettings, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" transport ")
        .padding(Padding {
            left: 1,
            right: 1,
            top: 0,
            bottom: 0,
        });
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(inner);

    let status = {
        let mut parts: Vec<String> = Vec::new();
        parts.push(state_label(player.state()).to_string());

        if let Some(track) = player.current_track() {
            parts.push(format!("Song: {}", now_playing_track_text(track, ui)));
        }
        if let Some(album) = app.selected_album() {
            parts.push(format!("Album: {}", album.title));
        }
        if app.follow_playback {
            parts.push("CURSOR: Follow".to_string());
        } else {
            parts.push("CURSOR: Free-roam".to_string());
        }
        parts.push(format!("Dir: {}", app.current_folder.display()));

        parts.join(" • ")
    };
    frame.render_widget(Paragraph::new(status).wrap(Wrap { trim: true }), rows[0]);

    let seek = Gauge::default()
        .ratio(player.fraction())
        .label(time_display(player.position(), player.duration()));
    frame.render_widget(seek, rows[1]);

    let volume_label = if player.is_muted() {
        format!("vol {:>3}% (muted)", player.volume_percent())
    } else {
        format!("vol {:>3}%", player.volume_percent())
    };
    let volume = LineGauge::default()
        .ratio(f64::from(player.volume()))
        .label(volume_label);
    frame.render_widget(volume, rows[2]);
}

/// Render the key-help footer.
fn controls_text(controls: &ControlsSettings) -> String {
    [
        "[j/k] move".to_string(),
        "[tab] pane".to_string(),
        "[enter] play/open".to_string(),
        "[space/p] play-pause".to_string(),
        "[h/l] prev/next".to_string(),
        format!("[←/→] seek -/+{}%", controls.seek_step_percent),
        format!("[-/+] vol -/+{}%", controls.volume_step_percent),
        "[m] mute".to_string(),
        "[q] quit".to_string(),
    ]
    .join(" | ")
}

/// Render the entire UI into the provided `frame`.
pub fn draw(
    frame: &mut Frame,
    app: &App,
    player: &Player,
    ui_settings: &UiSettings,
    controls_settings: &ControlsSettings,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(4),
            Constraint::Min(1),
            Constraint::Length(5),
            Constraint::Length(3),
        ])
        .split(frame.area());

    // Header
    let header = Paragraph::new(ui_settings.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" vivace ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    draw_albums(frame, app, chunks[1]);
    draw_tracks(frame, app, player, chunks[2]);
    draw_transport(frame, app, player, ui_settings, chunks[3]);

    let footer = Paragraph::new(controls_text(controls_settings))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" controls ")
                .padding(Padding {
                    left: 1,
                    right: 0,
                    top: 0,
                    bottom: 0,
                }),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, chunks[4]);
}
