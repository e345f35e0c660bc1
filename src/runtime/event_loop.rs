use std::rc::Rc;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{Terminal, backend::CrosstermBackend};
use rodio::OutputStream;

use crate::app::{App, View};
use crate::config;
use crate::preview::{PreviewManager, RodioPreview};
use crate::session::{PlaybackSession, SessionEvent};
use crate::ui;

/// Main terminal event loop: handles input, UI drawing and sync with the
/// session and catalog. Returns `Ok(())` when shutdown is requested.
pub fn run(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    app: &mut App,
    session: &PlaybackSession,
    previews: &mut PreviewManager<RodioPreview>,
    preview_stream: &Rc<OutputStream>,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        // Fold in the remote fetch result once it arrives.
        app.catalog.poll_remote();

        // The session reports track ends; order is the catalog's business.
        while let Some(event) = session.poll_event() {
            match event {
                SessionEvent::TrackEnded { track_id } => {
                    if let Some(next) = app.advance_from(&track_id) {
                        session.load(next);
                    }
                }
            }
        }

        sync_previews(app, previews, preview_stream);

        terminal.draw(|f| ui::draw(f, app, previews, &settings.ui, &settings.controls))?;

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if handle_key_event(key, settings, app, session, previews) {
                    break;
                }
            }
        }
    }

    Ok(())
}

/// Keep preview slots matched to the library rows currently on screen,
/// local and remote alike. Leaving the library releases every slot, which
/// stops whatever played.
fn sync_previews(
    app: &App,
    previews: &mut PreviewManager<RodioPreview>,
    stream: &Rc<OutputStream>,
) {
    if app.view != View::Library {
        previews.sync_rows(&[]);
        return;
    }

    let rows: Vec<crate::catalog::Track> = app.visible_tracks().into_iter().cloned().collect();

    for track in &rows {
        if !previews.contains(&track.id) {
            previews.insert(
                track.id.clone(),
                RodioPreview::new(track.clone(), stream.clone()),
            );
        }
    }
    let visible: Vec<&str> = rows.iter().map(|t| t.id.as_str()).collect();
    previews.sync_rows(&visible);
    previews.poll_slots();
    previews.reap_finished();
}

/// The id of the track currently loaded in the session, if any.
fn current_track_id(app: &App) -> Option<String> {
    let handle = app.session_handle.as_ref()?;
    let info = handle.lock().ok()?;
    info.track.as_ref().map(|t| t.id.clone())
}

fn handle_key_event(
    key: KeyEvent,
    settings: &config::Settings,
    app: &mut App,
    session: &PlaybackSession,
    previews: &mut PreviewManager<RodioPreview>,
) -> bool {
    if app.filter_mode {
        match key.code {
            KeyCode::Esc => app.clear_filter(),
            KeyCode::Backspace => app.pop_filter_char(),
            KeyCode::Enter => app.exit_filter_mode(),
            KeyCode::Down => app.select_next(),
            KeyCode::Up => app.select_prev(),
            KeyCode::Char(c) if !c.is_control() => app.push_filter_char(c),
            _ => {}
        }
        return false;
    }

    match key.code {
        KeyCode::Char('q') => {
            session.quit();
            return true;
        }
        // 0-9 scrub to that tenth of the track; takes precedence over the
        // view-switch digits while the player screen is up.
        KeyCode::Char(c) if c.is_ascii_digit() && app.view == View::Player => {
            let tenth = c.to_digit(10).unwrap_or(0) as f64 / 10.0;
            session.seek(tenth);
        }
        KeyCode::Char('1') => app.set_view(View::Home),
        KeyCode::Char('2') => app.set_view(View::Profile),
        KeyCode::Char('3') => app.set_view(View::Library),
        KeyCode::Esc => {
            if app.view == View::Player {
                app.set_view(View::Library);
            }
        }
        KeyCode::Char('j') | KeyCode::Down => app.select_next(),
        KeyCode::Char('k') | KeyCode::Up => app.select_prev(),
        KeyCode::Enter => {
            if let Some(track) = app.selected_track().cloned() {
                session.load(track);
                app.set_view(View::Player);
            }
        }
        KeyCode::Char('p') => {
            // Preview toggle for the selected library row.
            if app.view == View::Library {
                if let Some(track) = app.selected_track() {
                    let id = track.id.clone();
                    if previews.is_playing(&id) {
                        previews.request_stop(&id);
                    } else {
                        previews.request_play(&id);
                    }
                }
            }
        }
        KeyCode::Char('/') => {
            if app.view == View::Library {
                app.enter_filter_mode();
            }
        }
        KeyCode::Char(' ') => session.toggle_play_pause(),
        KeyCode::Char('l') => {
            if let Some(id) = current_track_id(app) {
                if let Some(next) = app.advance_from(&id) {
                    session.load(next);
                }
            }
        }
        KeyCode::Char('h') => {
            if let Some(id) = current_track_id(app) {
                if let Some(prev) = app.previous_from(&id) {
                    session.load(prev);
                }
            }
        }
        KeyCode::Char('L') => {
            session.skip_by(settings.controls.skip_seconds.min(i64::MAX as u64) as i64);
        }
        KeyCode::Char('H') => {
            session.skip_by(-(settings.controls.skip_seconds.min(i64::MAX as u64) as i64));
        }
        KeyCode::Char('s') => app.toggle_shuffle(),
        KeyCode::Char('r') => {
            app.toggle_loop();
            session.set_loop(app.loop_enabled);
        }
        _ => {}
    }

    false
}
