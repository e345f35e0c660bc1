use std::sync::mpsc::{Receiver, TryRecvError};

use log::{debug, warn};
use rand::seq::IndexedRandom;

use super::model::Track;
use super::remote::RemoteError;

/// Lifecycle of the remote portion of a catalog instance.
///
/// `Pending` transitions to exactly one of `Loaded` or `Unavailable` and
/// both are terminal: there are no retries within an instance's lifetime.
#[derive(Debug)]
pub enum RemoteState {
    Pending,
    Loaded(Vec<Track>),
    Unavailable,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Direction {
    Previous,
    Next,
}

/// The merged track list: local entries first in fixed order, then remote
/// entries in fetch-response order.
pub struct Catalog {
    local: Vec<Track>,
    remote: RemoteState,
    fetch: Option<Receiver<Result<Vec<Track>, RemoteError>>>,
}

impl Catalog {
    pub fn new(local: Vec<Track>) -> Self {
        Self {
            local,
            remote: RemoteState::Pending,
            fetch: None,
        }
    }

    /// Attach the receiving end of a background search fetch. The result is
    /// applied by `poll_remote`; dropping the catalog before the fetch
    /// resolves discards the result, since the worker's send has nowhere to
    /// land.
    pub fn with_fetch(mut self, rx: Receiver<Result<Vec<Track>, RemoteError>>) -> Self {
        self.fetch = Some(rx);
        self
    }

    /// The ordered merged view: local entries first, then remote-so-far.
    pub fn snapshot(&self) -> Vec<&Track> {
        let mut entries: Vec<&Track> = self.local.iter().collect();
        if let RemoteState::Loaded(remote) = &self.remote {
            entries.extend(remote.iter());
        }
        entries
    }

    pub fn len(&self) -> usize {
        let remote = match &self.remote {
            RemoteState::Loaded(remote) => remote.len(),
            _ => 0,
        };
        self.local.len() + remote
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn remote_state(&self) -> &RemoteState {
        &self.remote
    }

    /// Resolve an id to its track. An unknown id resolves to the first
    /// entry; `None` only when the catalog is completely empty.
    pub fn find(&self, id: &str) -> Option<&Track> {
        let snapshot = self.snapshot();
        match snapshot.iter().find(|t| t.id == id) {
            Some(track) => Some(track),
            None => {
                if !snapshot.is_empty() {
                    debug!("catalog: unknown track id {id:?}, falling back to first entry");
                }
                snapshot.first().copied()
            }
        }
    }

    /// The cyclic neighbor of `id` in the current snapshot. An unknown id
    /// behaves as `find` (index 0) before stepping.
    pub fn neighbor(&self, id: &str, direction: Direction) -> Option<&Track> {
        let snapshot = self.snapshot();
        if snapshot.is_empty() {
            return None;
        }
        let index = snapshot.iter().position(|t| t.id == id).unwrap_or(0);
        let len = snapshot.len();
        let next = match direction {
            Direction::Next => (index + 1) % len,
            Direction::Previous => (index + len - 1) % len,
        };
        Some(snapshot[next])
    }

    /// A uniformly random entry from the current snapshot.
    pub fn random_pick(&self) -> Option<&Track> {
        self.snapshot().choose(&mut rand::rng()).copied()
    }

    /// Replace the remote portion wholesale. Only a `Pending` catalog
    /// accepts the transition; the terminal states ignore further sets.
    pub fn set_remote(&mut self, tracks: Vec<Track>) {
        match self.remote {
            RemoteState::Pending => {
                debug!("catalog: remote portion loaded ({} tracks)", tracks.len());
                self.remote = RemoteState::Loaded(tracks);
            }
            _ => debug!("catalog: ignoring set_remote after terminal state"),
        }
    }

    /// Mark the remote portion as permanently unavailable for this instance.
    pub fn set_remote_unavailable(&mut self) {
        if let RemoteState::Pending = self.remote {
            self.remote = RemoteState::Unavailable;
        }
    }

    /// Apply the outcome of the background fetch, if it has arrived. A
    /// fetch failure degrades to an empty remote portion, never an error.
    pub fn poll_remote(&mut self) {
        let Some(rx) = &self.fetch else {
            return;
        };
        match rx.try_recv() {
            Ok(Ok(tracks)) => {
                self.set_remote(tracks);
                self.fetch = None;
            }
            Ok(Err(err)) => {
                warn!("catalog: remote fetch failed: {err}");
                self.set_remote_unavailable();
                self.fetch = None;
            }
            Err(TryRecvError::Empty) => {}
            Err(TryRecvError::Disconnected) => {
                // Worker died without reporting. Same deal as a failed fetch.
                self.set_remote_unavailable();
                self.fetch = None;
            }
        }
    }
}
