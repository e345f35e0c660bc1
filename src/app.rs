//! Application module: exposes the app model used by the TUI and runtime.
//!
//! The `App` model lives in `app::model` and holds the active view, the
//! merged catalog, selection and playback flags.

mod model;

pub use model::*;

#[cfg(test)]
mod tests;
