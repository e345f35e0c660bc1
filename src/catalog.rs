//! Track catalog: the merged local + remote track list.
//!
//! Local tracks come from configuration and never change; remote tracks are
//! fetched once per catalog instance from a search API and appended behind
//! the local set. Consumers re-derive their view from `Catalog::snapshot`.

mod local;
mod merge;
mod model;
mod remote;

pub use local::local_tracks;
pub use merge::{Catalog, Direction, RemoteState};
pub use model::{Origin, Track};
pub use remote::{RemoteError, spawn_search};
