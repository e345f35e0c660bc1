//! UI rendering helpers for the terminal user interface.
//!
//! This module contains functions to render the TUI using `ratatui`.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    widgets::{Block, Borders, Gauge, List, ListItem, Padding, Paragraph, Wrap},
};
use std::time::Duration;

use crate::app::{App, View};
use crate::catalog::{Origin, RemoteState, Track};
use crate::config::{ControlsSettings, UiSettings};
use crate::preview::{PreviewManager, RodioPreview};
use crate::session::SessionInfo;

/// Format a `Duration` as `MM:SS`.
fn format_mmss(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Render the controls help text for the active view.
fn controls_text(view: View, skip_seconds: u64) -> String {
    let common = "[1/2/3] home/profile/library | [q] quit";
    match view {
        View::Home => common.to_string(),
        View::Profile => format!("[j/k] up/down | [enter] play | {common}"),
        View::Library => format!(
            "[j/k] up/down | [enter] play | [p] preview | [/] filter | {common}"
        ),
        // Digits scrub on this screen, so the view-switch keys are not shown.
        View::Player => format!(
            "[space] play/pause | [h/l] prev/next | [H/L] skip -/+{skip_seconds}s | [0-9] scrub | [s] shuffle | [r] loop | [esc] back | [q] quit"
        ),
    }
}

fn session_info(app: &App) -> Option<SessionInfo> {
    let handle = app.session_handle.as_ref()?;
    handle.lock().ok().map(|info| info.clone())
}

/// Render the entire UI into the provided `frame` using `app` state and settings.
pub fn draw(
    frame: &mut Frame,
    app: &App,
    previews: &PreviewManager<RodioPreview>,
    ui_settings: &UiSettings,
    controls_settings: &ControlsSettings,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(3),
            Constraint::Length(3),
        ])
        .split(frame.area());

    let header = Paragraph::new(ui_settings.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" musika ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    let info = session_info(app);
    match app.view {
        View::Home => draw_home(frame, chunks[1]),
        View::Profile => draw_track_list(frame, chunks[1], app, previews, " popular songs "),
        View::Library => draw_track_list(frame, chunks[1], app, previews, " library "),
        View::Player => draw_player(frame, chunks[1], app, info.as_ref()),
    }

    draw_now_playing(frame, chunks[2], info.as_ref());

    let footer = Paragraph::new(controls_text(app.view, controls_settings.skip_seconds))
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
    frame.render_widget(footer, chunks[3]);
}

fn draw_home(frame: &mut Frame, area: Rect) {
    let text = "Welcome!\n\n\
        Your bundled tracks live in the profile view; the library merges\n\
        them with fresh picks from the search provider.\n\n\
        Press 3 to browse the library, or 2 for your own songs.";
    let home = Paragraph::new(text)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title(" home "))
        .wrap(Wrap { trim: true });
    frame.render_widget(home, area);
}

/// One list rendering for both the profile and library views; the visible
/// rows come from the app model, so filtering is already applied.
fn draw_track_list(
    frame: &mut Frame,
    area: Rect,
    app: &App,
    previews: &PreviewManager<RodioPreview>,
    title: &str,
) {
    let tracks = app.visible_tracks();

    let mut title = title.to_string();
    if app.view == View::Library {
        title.push_str(&format!("{} tracks ", app.catalog.len()));
        match app.catalog.remote_state() {
            RemoteState::Pending => title.push_str("(fetching…) "),
            RemoteState::Unavailable => title.push_str("(offline) "),
            RemoteState::Loaded(_) => {}
        }
        if app.filter_mode || !app.filter_query.is_empty() {
            title.push_str(&format!("/{} ", app.filter_query));
        }
    }

    if tracks.is_empty() {
        let empty = Paragraph::new("no matching tracks")
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).title(title));
        frame.render_widget(empty, area);
        return;
    }

    let previewable = app.view == View::Library;
    let items: Vec<ListItem> = tracks
        .iter()
        .map(|t| track_row(t, previews, previewable))
        .collect();
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");

    let mut state = ratatui::widgets::ListState::default();
    if !tracks.is_empty() {
        state.select(Some(app.selected.min(tracks.len() - 1)));
    }
    frame.render_stateful_widget(list, area, &mut state);
}

fn track_row<'a>(
    track: &'a Track,
    previews: &PreviewManager<RodioPreview>,
    previewable: bool,
) -> ListItem<'a> {
    let marker = if !previewable {
        "  "
    } else if previews.is_loading(&track.id) {
        "… "
    } else if previews.is_playing(&track.id) {
        "▶ "
    } else {
        "♪ "
    };
    ListItem::new(format!("{marker}{}", track.display))
}

fn draw_player(frame: &mut Frame, area: Rect, app: &App, info: Option<&SessionInfo>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(3)])
        .split(area);

    let body = match info.and_then(|i| i.track.as_ref()) {
        Some(track) => {
            let state = match info {
                Some(i) if i.playing => "Playing",
                _ => "Paused",
            };
            let origin = match track.origin {
                Origin::Local => "local",
                Origin::Remote => "remote",
            };
            format!(
                "{}\n\n{state} ({origin})\nShuffle: {} | Loop: {}",
                track.display,
                if app.shuffle { "on" } else { "off" },
                if app.loop_enabled { "on" } else { "off" },
            )
        }
        None => "Nothing playing yet.\n\nPick a track from the library.".to_string(),
    };
    let player = Paragraph::new(body)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title(" player "))
        .wrap(Wrap { trim: true });
    frame.render_widget(player, chunks[0]);

    let (ratio, label) = match info {
        Some(i) => {
            let total = i.duration.map(format_mmss).unwrap_or_else(|| "--:--".into());
            (i.progress(), format!("{} / {}", format_mmss(i.elapsed), total))
        }
        None => (0.0, "--:-- / --:--".to_string()),
    };
    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL))
        .ratio(ratio.clamp(0.0, 1.0))
        .label(label);
    frame.render_widget(gauge, chunks[1]);
}

/// The persistent strip under the body: whatever the session has loaded is
/// visible from every view.
fn draw_now_playing(frame: &mut Frame, area: Rect, info: Option<&SessionInfo>) {
    let text = match info.and_then(|i| i.track.as_ref().map(|t| (i, t))) {
        Some((info, track)) => {
            let state = if info.playing { "▶" } else { "⏸" };
            let total = info
                .duration
                .map(format_mmss)
                .unwrap_or_else(|| "--:--".into());
            format!(
                "{state} {} [{} / {}]",
                track.display,
                format_mmss(info.elapsed),
                total
            )
        }
        None => "nothing playing".to_string(),
    };
    let bar = Paragraph::new(text).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" now playing ")
            .padding(Padding {
                left: 1,
                right: 0,
                top: 0,
                bottom: 0,
            }),
    );
    frame.render_widget(bar, area);
}
