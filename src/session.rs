//! The shared playback session.
//!
//! One audio thread owns the single playback resource; every view reads the
//! same shared `SessionInfo` snapshot and drives the session through
//! commands. The session never reads the catalog: when a track ends and
//! loop is off it emits `SessionEvent::TrackEnded`, and the runtime answers
//! with the catalog's successor.

mod player;
mod sink;
mod thread;
mod transport;
mod types;

pub use player::PlaybackSession;
pub use sink::SourceError;
pub(crate) use sink::{FetchReceiver, SinkBuild, SourceCache, create_sink_at, spawn_fetch};
pub use types::{SessionCmd, SessionEvent, SessionHandle, SessionInfo, clamp_fraction};
