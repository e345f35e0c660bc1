use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use log::{debug, warn};
use rodio::{OutputStream, OutputStreamBuilder, Sink};

use crate::catalog::Track;

use super::sink::{FetchReceiver, SinkBuild, SourceCache, create_sink_at, spawn_fetch};
use super::transport::{LoadAction, Transport};
use super::types::{SessionCmd, SessionEvent, SessionHandle};

/// Tick granularity for progress publication and end detection.
const TICK: Duration = Duration::from_millis(200);

pub(super) fn spawn_session_thread(
    rx: Receiver<SessionCmd>,
    info: SessionHandle,
    events: Sender<SessionEvent>,
    loop_enabled: bool,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let stream =
            OutputStreamBuilder::open_default_stream().expect("ERR: No audio output device");
        // rodio logs to stderr when OutputStream is dropped. That's useful in
        // debugging, but noisy for a TUI app.
        let mut stream = stream;
        stream.log_on_drop(false);

        let worker = SessionWorker {
            stream,
            sink: None,
            started_at: None,
            accumulated: Duration::ZERO,
            transport: Transport::new(loop_enabled),
            cache: SourceCache::new(),
            fetch: None,
            info,
            events,
        };
        worker.run(rx);
    })
}

/// An in-flight download for the current remote source. The receiver is the
/// claim on the result: dropping it (newer `Load`, shutdown) abandons the
/// download.
struct PendingFetch {
    url: String,
    start_at: Duration,
    rx: FetchReceiver,
}

struct SessionWorker {
    stream: OutputStream,
    sink: Option<Sink>,
    /// Wall-clock start of the current playing stretch; `None` while paused.
    started_at: Option<Instant>,
    /// Elapsed accumulated across previous playing stretches.
    accumulated: Duration,
    transport: Transport,
    cache: SourceCache,
    fetch: Option<PendingFetch>,
    info: SessionHandle,
    events: Sender<SessionEvent>,
}

impl SessionWorker {
    fn run(mut self, rx: Receiver<SessionCmd>) {
        loop {
            match rx.recv_timeout(TICK) {
                Ok(SessionCmd::Load(track)) => self.load(track),
                Ok(SessionCmd::TogglePause) => self.toggle(),
                Ok(SessionCmd::Seek(fraction)) => self.seek(fraction),
                Ok(SessionCmd::SkipBy(seconds)) => self.skip(seconds),
                Ok(SessionCmd::SetLoop(enabled)) => {
                    self.transport.set_loop(enabled);
                    self.publish();
                }
                Ok(SessionCmd::Quit) => {
                    if let Some(sink) = self.sink.take() {
                        sink.stop();
                    }
                    break;
                }
                Err(RecvTimeoutError::Timeout) => self.tick(),
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
    }

    fn load(&mut self, track: Track) {
        match self.transport.load(&track) {
            LoadAction::Resume => {
                // Same source: keep position. The sink may be gone if the
                // resource ended or failed, in which case restart it.
                match &self.sink {
                    Some(sink) if !sink.empty() => {
                        sink.play();
                        if self.started_at.is_none() {
                            self.started_at = Some(Instant::now());
                        }
                    }
                    _ => self.open_current(Duration::ZERO),
                }
            }
            LoadAction::Switch => {
                debug!("session: switching resource to {}", track.id);
                self.open_current(Duration::ZERO);
            }
        }
        self.publish();
    }

    fn toggle(&mut self) {
        match self.transport.toggle() {
            // NoActiveTrack: nothing loaded, nothing to do.
            None => return,
            Some(true) => match &self.sink {
                Some(sink) => {
                    sink.play();
                    self.started_at = Some(Instant::now());
                }
                // Resource ended or failed earlier; restart from the top.
                None => self.open_current(Duration::ZERO),
            },
            Some(false) => {
                if let Some(sink) = &self.sink {
                    sink.pause();
                }
                if let Some(started) = self.started_at.take() {
                    self.accumulated += started.elapsed();
                }
            }
        }
        self.publish();
    }

    fn seek(&mut self, fraction: f64) {
        if let Some(target) = self.transport.seek(fraction) {
            if self.sink.is_some() {
                self.open_current(target);
            } else if let Some(pending) = &mut self.fetch {
                pending.start_at = target;
            }
        }
        // Unknown duration: the request is recorded in the transport and
        // position keeps reading 0 until a duration is known.
        self.publish();
    }

    fn skip(&mut self, seconds: i64) {
        if let Some(target) = self.transport.skip(seconds) {
            if self.sink.is_some() {
                self.open_current(target);
            } else if let Some(pending) = &mut self.fetch {
                pending.start_at = target;
            }
        }
        self.publish();
    }

    fn tick(&mut self) {
        self.poll_fetch();

        if self.transport.playing {
            let elapsed = self.elapsed_now();
            self.transport.set_elapsed(elapsed);

            if self.sink.as_ref().is_some_and(Sink::empty) {
                if self.transport.loop_enabled {
                    self.open_current(Duration::ZERO);
                } else if let Some(track) = self.transport.current() {
                    let track_id = track.id.clone();
                    self.sink = None;
                    self.transport.ended();
                    let _ = self.events.send(SessionEvent::TrackEnded { track_id });
                }
            }
        }
        self.publish();
    }

    /// Fold in a finished download. Commands keep flowing while the fetch
    /// thread works; bytes for a source that is no longer current are only
    /// cached, never played.
    fn poll_fetch(&mut self) {
        let Some(pending) = self.fetch.take() else {
            return;
        };
        match pending.rx.try_recv() {
            Err(TryRecvError::Empty) => self.fetch = Some(pending),
            Ok(Ok(bytes)) => {
                self.cache.put(&pending.url, bytes);
                let still_current = self
                    .transport
                    .current()
                    .is_some_and(|t| t.source == pending.url);
                if still_current {
                    self.open_current(pending.start_at);
                }
            }
            Ok(Err(err)) => {
                warn!("session: cannot fetch {}: {err}", pending.url);
                self.transport.resource_failed();
                self.started_at = None;
                self.accumulated = Duration::ZERO;
                self.publish();
            }
            Err(TryRecvError::Disconnected) => {
                warn!("session: download worker vanished for {}", pending.url);
                self.transport.resource_failed();
                self.started_at = None;
                self.accumulated = Duration::ZERO;
                self.publish();
            }
        }
    }

    /// Open the transport's current track at `start_at` and resume the
    /// transport's play/pause state. Remote sources whose bytes have not
    /// arrived yet leave a pending fetch behind instead of blocking the
    /// command loop. On failure the session ends up stopped, never stuck
    /// loading.
    fn open_current(&mut self, start_at: Duration) {
        let Some(track) = self.transport.current().cloned() else {
            return;
        };
        if let Some(old) = self.sink.take() {
            old.stop();
        }

        match create_sink_at(&self.stream, &track, start_at, &self.cache) {
            Ok(SinkBuild::Ready { sink, duration }) => {
                self.fetch = None;
                self.accumulated = start_at;
                if self.transport.playing {
                    sink.play();
                    self.started_at = Some(Instant::now());
                } else {
                    self.started_at = None;
                }
                self.sink = Some(sink);
                self.transport.set_elapsed(start_at);

                // A seek recorded while duration was unknown may apply now.
                if let Some(deferred) = self.transport.resource_ready(duration) {
                    if deferred != start_at {
                        self.open_current(deferred);
                    }
                }
            }
            Ok(SinkBuild::NeedsFetch) => {
                // Reuse an in-flight download for the same source rather
                // than racing a second one.
                match &mut self.fetch {
                    Some(pending) if pending.url == track.source => {
                        pending.start_at = start_at;
                    }
                    _ => {
                        debug!("session: fetching {}", track.source);
                        self.fetch = Some(PendingFetch {
                            url: track.source.clone(),
                            start_at,
                            rx: spawn_fetch(&track.source),
                        });
                    }
                }
                self.accumulated = start_at;
                self.started_at = None;
                self.transport.set_elapsed(start_at);
                self.publish();
            }
            Err(err) => {
                warn!("session: cannot play {}: {err}", track.id);
                self.fetch = None;
                self.transport.resource_failed();
                self.started_at = None;
                self.accumulated = Duration::ZERO;
                self.publish();
            }
        }
    }

    fn elapsed_now(&self) -> Duration {
        self.accumulated
            + self
                .started_at
                .map_or(Duration::ZERO, |started| started.elapsed())
    }

    /// Publish the shared snapshot; last write wins.
    fn publish(&self) {
        if let Ok(mut info) = self.info.lock() {
            info.track = self.transport.current().cloned();
            info.elapsed = self.transport.elapsed;
            info.duration = self.transport.duration;
            info.playing = self.transport.playing;
            info.loop_enabled = self.transport.loop_enabled;
        }
    }
}
