//! Pure transport state for the playback session.
//!
//! The audio thread applies side effects (sinks, decoding, timing); every
//! decision about what a command means lives here so it can be tested
//! without an audio device.

use std::time::Duration;

use crate::catalog::Track;

use super::types::{clamp_fraction, progress_fraction};

/// What the audio thread must do with the resource after a `load`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum LoadAction {
    /// Different source: replace the resource and start from zero.
    Switch,
    /// Same source as the loaded resource: keep position, ensure playing.
    Resume,
}

#[derive(Debug, Default)]
pub(crate) struct Transport {
    current: Option<Track>,
    pub(crate) playing: bool,
    pub(crate) elapsed: Duration,
    pub(crate) duration: Option<Duration>,
    /// Seek fraction recorded while duration was unknown.
    pending_seek: Option<f64>,
    pub(crate) loop_enabled: bool,
}

impl Transport {
    pub(crate) fn new(loop_enabled: bool) -> Self {
        Self {
            loop_enabled,
            ..Self::default()
        }
    }

    pub(crate) fn current(&self) -> Option<&Track> {
        self.current.as_ref()
    }

    /// Selecting a track always ends with the session playing; the
    /// resource only switches when the source actually differs.
    pub(crate) fn load(&mut self, track: &Track) -> LoadAction {
        let same_source = self
            .current
            .as_ref()
            .is_some_and(|cur| cur.source == track.source);
        if same_source {
            self.playing = true;
            return LoadAction::Resume;
        }

        self.current = Some(track.clone());
        self.elapsed = Duration::ZERO;
        self.duration = None;
        self.pending_seek = None;
        self.playing = true;
        LoadAction::Switch
    }

    /// Record what the freshly opened resource reported. Returns a position
    /// to seek to when a deferred seek can now be applied.
    pub(crate) fn resource_ready(&mut self, duration: Option<Duration>) -> Option<Duration> {
        self.duration = duration;
        match (self.pending_seek.take(), duration) {
            (Some(fraction), Some(total)) => {
                let target = total.mul_f64(fraction);
                self.elapsed = target;
                Some(target)
            }
            (pending, _) => {
                self.pending_seek = pending;
                None
            }
        }
    }

    /// The resource could not be opened: not playing, nothing stuck.
    pub(crate) fn resource_failed(&mut self) {
        self.playing = false;
    }

    /// Returns the new playing state, or `None` when nothing is loaded
    /// (the NoActiveTrack condition, a no-op for callers).
    pub(crate) fn toggle(&mut self) -> Option<bool> {
        self.current.as_ref()?;
        self.playing = !self.playing;
        Some(self.playing)
    }

    /// Seek to a fraction of duration. Out-of-range input clamps to [0, 1].
    /// With an unknown duration the request is recorded and position stays
    /// where it is until the duration becomes known.
    pub(crate) fn seek(&mut self, fraction: f64) -> Option<Duration> {
        if self.current.is_none() {
            return None;
        }
        let fraction = clamp_fraction(fraction);
        match self.duration {
            Some(total) if total > Duration::ZERO => {
                let target = total.mul_f64(fraction);
                self.elapsed = target;
                self.pending_seek = None;
                Some(target)
            }
            _ => {
                self.pending_seek = Some(fraction);
                None
            }
        }
    }

    /// New position = clamp(current + delta, 0, duration).
    pub(crate) fn skip(&mut self, delta_seconds: i64) -> Option<Duration> {
        self.current.as_ref()?;
        let current = self.elapsed.as_secs_f64();
        let mut target = (current + delta_seconds as f64).max(0.0);
        if let Some(total) = self.duration {
            target = target.min(total.as_secs_f64());
        }
        let target = Duration::from_secs_f64(target);
        self.elapsed = target;
        Some(target)
    }

    pub(crate) fn set_loop(&mut self, enabled: bool) {
        self.loop_enabled = enabled;
    }

    pub(crate) fn set_elapsed(&mut self, elapsed: Duration) {
        self.elapsed = match self.duration {
            Some(total) => elapsed.min(total),
            None => elapsed,
        };
    }

    /// Natural end of the resource with loop disabled.
    pub(crate) fn ended(&mut self) {
        self.playing = false;
        if let Some(total) = self.duration {
            self.elapsed = total;
        }
    }

    pub(crate) fn progress(&self) -> f64 {
        progress_fraction(self.elapsed, self.duration)
    }
}
