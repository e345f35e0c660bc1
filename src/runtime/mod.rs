use std::rc::Rc;

use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::{Terminal, backend::CrosstermBackend};
use rodio::OutputStreamBuilder;

use crate::app::App;
use crate::catalog::{Catalog, local_tracks, spawn_search};
use crate::preview::{PreviewManager, RodioPreview};
use crate::session::PlaybackSession;

mod event_loop;
mod settings;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let settings = settings::load_settings();

    let mut catalog = Catalog::new(local_tracks(&settings.library));
    if catalog.is_empty() {
        log::warn!("no local tracks configured; the library starts empty");
    }
    if settings.remote.enabled {
        catalog = catalog.with_fetch(spawn_search(&settings.remote));
    } else {
        catalog.set_remote_unavailable();
    }

    let session = PlaybackSession::new(settings.playback.loop_enabled);
    let mut app = App::new(
        catalog,
        settings.playback.shuffle,
        settings.playback.loop_enabled,
    );
    app.set_session_handle(session.info_handle());

    // Previews play on their own output stream, mixed independently of the
    // session's. Slots share it through an Rc; everything stays on this thread.
    let mut preview_stream = OutputStreamBuilder::open_default_stream()?;
    preview_stream.log_on_drop(false);
    let preview_stream = Rc::new(preview_stream);
    let mut previews: PreviewManager<RodioPreview> = PreviewManager::new();

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result = event_loop::run(
        &mut terminal,
        &settings,
        &mut app,
        &session,
        &mut previews,
        &preview_stream,
    );

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    run_result
}
