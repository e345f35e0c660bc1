//! Row-scoped preview playback for the library list.
//!
//! Previews are independent from the shared playback session: each visible
//! library row, local or remote, owns its own short clip, and the manager
//! guarantees at most one of them is audible at a time. Stopping a preview
//! pauses it, so playing the same row again picks up where it left off.

mod audio;
mod manager;

pub use audio::RodioPreview;
pub use manager::{PreviewManager, PreviewSink};

#[cfg(test)]
mod tests;
