//! Session command, event and shared-state types.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::catalog::Track;

#[derive(Debug)]
pub enum SessionCmd {
    /// Load a track and start playing it. Selecting the already-loaded
    /// track keeps its position; anything else switches the resource and
    /// resets position to zero.
    Load(Track),
    /// Toggle pause/resume; no-op when nothing is loaded.
    TogglePause,
    /// Seek to a fraction of the duration, clamped to [0, 1].
    Seek(f64),
    /// Skip by the given number of seconds, positive or negative.
    SkipBy(i64),
    /// When enabled, the current track repeats on natural end instead of
    /// emitting `TrackEnded`.
    SetLoop(bool),
    /// Stop the audio thread.
    Quit,
}

/// Notifications the session sends back to the runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// The resource reached its natural end with loop disabled. The
    /// receiver decides what plays next; the session does not own order.
    TrackEnded { track_id: String },
}

/// Runtime playback information shared with the UI.
#[derive(Debug, Clone, Default)]
pub struct SessionInfo {
    /// The currently loaded track, if any.
    pub track: Option<Track>,
    /// Elapsed playback time for the current track.
    pub elapsed: Duration,
    /// Total duration when the decoder reports one.
    pub duration: Option<Duration>,
    /// Whether playback is currently active.
    pub playing: bool,
    /// Whether the current track repeats on natural end.
    pub loop_enabled: bool,
}

impl SessionInfo {
    /// Scrub position as a fraction of duration, in [0, 1]. Zero whenever
    /// duration is unknown or zero, so no NaN ever reaches a view.
    pub fn progress(&self) -> f64 {
        progress_fraction(self.elapsed, self.duration)
    }
}

pub type SessionHandle = Arc<Mutex<SessionInfo>>;

pub(crate) fn progress_fraction(elapsed: Duration, duration: Option<Duration>) -> f64 {
    match duration {
        Some(total) if total > Duration::ZERO => {
            clamp_fraction(elapsed.as_secs_f64() / total.as_secs_f64())
        }
        _ => 0.0,
    }
}

/// Clamp a seek fraction to [0, 1], normalizing NaN to 0.
pub fn clamp_fraction(fraction: f64) -> f64 {
    if fraction.is_nan() {
        0.0
    } else {
        fraction.clamp(0.0, 1.0)
    }
}
