//! Opening `rodio` sinks for catalog tracks.
//!
//! Local tracks decode straight from disk. Remote tracks are short preview
//! clips: their bytes are downloaded in full on a background thread and
//! decoded from memory, and the last payload is kept around so a seek
//! rebuild does not re-download. `skip_duration` is the seeking primitive;
//! even `Duration::ZERO` is fine.

use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek};
use std::path::Path;
use std::sync::mpsc::{self, Receiver};
use std::thread;
use std::time::Duration;

use log::debug;
use rodio::{Decoder, OutputStream, Sink, Source};
use thiserror::Error;

use crate::catalog::Track;

/// Upper bound on a downloaded preview payload. Previews are ~30s clips;
/// anything past this is a misbehaving server.
const MAX_REMOTE_BYTES: u64 = 32 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to open {path}: {source}")]
    Open {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to fetch {url}: {source}")]
    Fetch {
        url: String,
        source: Box<ureq::Error>,
    },
    #[error("failed to read preview bytes from {url}: {source}")]
    Read {
        url: String,
        source: std::io::Error,
    },
    #[error("failed to decode {uri}: {source}")]
    Decode {
        uri: String,
        source: rodio::decoder::DecoderError,
    },
}

pub(crate) type FetchReceiver = Receiver<Result<Vec<u8>, SourceError>>;

/// Outcome of trying to open a source without blocking.
pub(crate) enum SinkBuild {
    Ready {
        sink: Sink,
        duration: Option<Duration>,
    },
    /// Remote source whose bytes are not cached yet; the caller owns the
    /// download (`spawn_fetch`) and retries once the bytes land.
    NeedsFetch,
}

/// Most recent remote payload, keyed by URL. One entry is enough: rebuilds
/// only ever target the currently loaded source.
#[derive(Default)]
pub(crate) struct SourceCache {
    last: Option<(String, Vec<u8>)>,
}

impl SourceCache {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn get(&self, url: &str) -> Option<Vec<u8>> {
        self.last
            .as_ref()
            .filter(|(cached_url, _)| cached_url == url)
            .map(|(_, bytes)| bytes.clone())
    }

    pub(crate) fn put(&mut self, url: &str, bytes: Vec<u8>) {
        self.last = Some((url.to_string(), bytes));
    }
}

pub(crate) fn is_http_source(uri: &str) -> bool {
    uri.starts_with("http://") || uri.starts_with("https://")
}

/// Create a paused `Sink` for `track` that starts playback at `start_at`,
/// along with the duration the decoder reports (if any). Never blocks on
/// the network: a remote source with no cached bytes comes back as
/// `NeedsFetch`.
pub(crate) fn create_sink_at(
    stream: &OutputStream,
    track: &Track,
    start_at: Duration,
    cache: &SourceCache,
) -> Result<SinkBuild, SourceError> {
    if is_http_source(&track.source) {
        let Some(bytes) = cache.get(&track.source) else {
            return Ok(SinkBuild::NeedsFetch);
        };
        let decoder = Decoder::new(Cursor::new(bytes)).map_err(|source| SourceError::Decode {
            uri: track.source.clone(),
            source,
        })?;
        let (sink, duration) = append_paused(stream, decoder, start_at);
        Ok(SinkBuild::Ready { sink, duration })
    } else {
        let file = File::open(Path::new(&track.source)).map_err(|source| SourceError::Open {
            path: track.source.clone(),
            source,
        })?;
        let decoder =
            Decoder::new(BufReader::new(file)).map_err(|source| SourceError::Decode {
                uri: track.source.clone(),
                source,
            })?;
        let (sink, duration) = append_paused(stream, decoder, start_at);
        Ok(SinkBuild::Ready { sink, duration })
    }
}

/// Download preview bytes on a one-shot background thread; the outcome
/// lands on the returned channel. Dropping the receiver abandons the
/// download, so a superseded fetch cannot mutate anything.
pub(crate) fn spawn_fetch(url: &str) -> FetchReceiver {
    let (tx, rx) = mpsc::channel();
    let url = url.to_string();
    thread::spawn(move || {
        let outcome = fetch_preview_bytes(&url);
        if tx.send(outcome).is_err() {
            debug!("fetch: receiver gone for {url}, dropping bytes");
        }
    });
    rx
}

fn append_paused<R>(
    stream: &OutputStream,
    decoder: Decoder<R>,
    start_at: Duration,
) -> (Sink, Option<Duration>)
where
    R: Read + Seek + Send + Sync + 'static,
{
    let duration = decoder.total_duration();
    let sink = Sink::connect_new(stream.mixer());
    sink.append(decoder.skip_duration(start_at));
    sink.pause();
    (sink, duration)
}

fn fetch_preview_bytes(url: &str) -> Result<Vec<u8>, SourceError> {
    let response = ureq::get(url)
        .timeout(Duration::from_secs(15))
        .call()
        .map_err(|source| SourceError::Fetch {
            url: url.to_string(),
            source: Box::new(source),
        })?;

    let mut bytes = Vec::new();
    response
        .into_reader()
        .take(MAX_REMOTE_BYTES)
        .read_to_end(&mut bytes)
        .map_err(|source| SourceError::Read {
            url: url.to_string(),
            source,
        })?;
    Ok(bytes)
}
