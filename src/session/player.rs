use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use crate::catalog::Track;

use super::thread::spawn_session_thread;
use super::types::{SessionCmd, SessionEvent, SessionHandle, SessionInfo};

/// Handle to the shared playback session. Cloneable state goes out through
/// [`SessionHandle`]; commands go in through an internal channel.
pub struct PlaybackSession {
    tx: Sender<SessionCmd>,
    info: SessionHandle,
    events: Receiver<SessionEvent>,
    join: Mutex<Option<JoinHandle<()>>>,
}

impl PlaybackSession {
    pub fn new(loop_enabled: bool) -> Self {
        let (tx, rx) = mpsc::channel::<SessionCmd>();
        let (event_tx, event_rx) = mpsc::channel::<SessionEvent>();
        let info: SessionHandle = Arc::new(Mutex::new(SessionInfo::default()));

        let handle = spawn_session_thread(rx, info.clone(), event_tx, loop_enabled);

        Self {
            tx,
            info,
            events: event_rx,
            join: Mutex::new(Some(handle)),
        }
    }

    pub fn info_handle(&self) -> SessionHandle {
        self.info.clone()
    }

    /// Load `track` and start playing. Loading the already-playing track
    /// resumes it at its current position.
    pub fn load(&self, track: Track) {
        self.send(SessionCmd::Load(track));
    }

    pub fn toggle_play_pause(&self) {
        self.send(SessionCmd::TogglePause);
    }

    /// Seek to `fraction` of the track duration; values outside [0, 1]
    /// are clamped on the session side.
    pub fn seek(&self, fraction: f64) {
        self.send(SessionCmd::Seek(fraction));
    }

    pub fn skip_by(&self, seconds: i64) {
        self.send(SessionCmd::SkipBy(seconds));
    }

    pub fn set_loop(&self, enabled: bool) {
        self.send(SessionCmd::SetLoop(enabled));
    }

    /// Next pending session event, if one arrived since the last poll.
    pub fn poll_event(&self) -> Option<SessionEvent> {
        self.events.try_recv().ok()
    }

    pub fn quit(&self) {
        self.send(SessionCmd::Quit);
        if let Ok(mut join) = self.join.lock() {
            if let Some(handle) = join.take() {
                let _ = handle.join();
            }
        }
    }

    fn send(&self, cmd: SessionCmd) {
        // A closed channel means the audio thread is already gone; every
        // command is then a no-op by definition.
        let _ = self.tx.send(cmd);
    }
}
