use std::rc::Rc;
use std::sync::mpsc::TryRecvError;
use std::time::Duration;

use log::warn;
use rodio::{OutputStream, Sink};

use crate::catalog::Track;
use crate::session::{FetchReceiver, SinkBuild, SourceCache, create_sink_at, spawn_fetch};

use super::manager::PreviewSink;

/// Preview slot backed by a `rodio` sink on the UI-side output stream.
///
/// Local rows decode straight from disk; remote rows download their clip on
/// a background thread the first time they start, so the key handler never
/// waits on the network. Stopping pauses rather than drops the sink, so
/// position survives a stop/start cycle. A clip that played to the end
/// rebuilds from zero on the next `start`.
pub struct RodioPreview {
    track: Track,
    stream: Rc<OutputStream>,
    sink: Option<Sink>,
    cache: SourceCache,
    fetch: Option<FetchReceiver>,
    /// Play as soon as the downloaded bytes land; cleared by `stop`.
    want_play: bool,
    failed: bool,
}

impl RodioPreview {
    pub fn new(track: Track, stream: Rc<OutputStream>) -> Self {
        Self {
            track,
            stream,
            sink: None,
            cache: SourceCache::new(),
            fetch: None,
            want_play: false,
            failed: false,
        }
    }

    fn open(&mut self) -> bool {
        match create_sink_at(&self.stream, &self.track, Duration::ZERO, &self.cache) {
            Ok(SinkBuild::Ready { sink, .. }) => {
                sink.play();
                self.sink = Some(sink);
                true
            }
            Ok(SinkBuild::NeedsFetch) => {
                if self.fetch.is_none() {
                    self.fetch = Some(spawn_fetch(&self.track.source));
                }
                self.want_play = true;
                true
            }
            Err(err) => {
                warn!("preview: cannot play {}: {err}", self.track.id);
                self.failed = true;
                false
            }
        }
    }
}

impl PreviewSink for RodioPreview {
    fn start(&mut self) -> bool {
        self.failed = false;
        match &self.sink {
            Some(sink) if !sink.empty() => {
                sink.play();
                true
            }
            _ => self.open(),
        }
    }

    fn stop(&mut self) {
        self.want_play = false;
        if let Some(sink) = &self.sink {
            sink.pause();
        }
    }

    fn is_finished(&self) -> bool {
        self.failed || self.sink.as_ref().is_some_and(Sink::empty)
    }

    fn is_pending(&self) -> bool {
        self.fetch.is_some()
    }

    fn poll(&mut self) {
        let Some(rx) = self.fetch.take() else {
            return;
        };
        match rx.try_recv() {
            Err(TryRecvError::Empty) => self.fetch = Some(rx),
            Ok(Ok(bytes)) => {
                self.cache.put(&self.track.source, bytes);
                if self.want_play {
                    self.open();
                }
            }
            Ok(Err(err)) => {
                warn!("preview: cannot fetch {}: {err}", self.track.id);
                self.failed = true;
            }
            Err(TryRecvError::Disconnected) => {
                self.failed = true;
            }
        }
    }
}
