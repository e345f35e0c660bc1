use std::env;
use std::path::PathBuf;

mod app;
mod catalog;
mod config;
mod preview;
mod runtime;
mod session;
mod ui;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    setup_logging()?;
    runtime::run()
}

/// Log to a file under the XDG state directory. The terminal is owned by
/// the TUI, so nothing may write to stdout or stderr while it runs.
fn setup_logging() -> Result<(), Box<dyn std::error::Error>> {
    let state_home = env::var_os("XDG_STATE_HOME")
        .map(PathBuf::from)
        .or_else(|| env::var_os("HOME").map(|h| PathBuf::from(h).join(".local/state")))
        .unwrap_or_else(env::temp_dir);
    let log_dir = state_home.join("musika");
    std::fs::create_dir_all(&log_dir)?;

    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{}[{}][{}] {}",
                chrono::Local::now().format("[%Y-%m-%d][%H:%M:%S]"),
                record.target(),
                record.level(),
                message
            ))
        })
        .level(log::LevelFilter::Info)
        .chain(fern::log_file(log_dir.join("musika.log"))?)
        .apply()?;

    Ok(())
}
