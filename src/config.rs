//! Configuration schema and loading.
//!
//! Settings cover the local track registry, the remote search provider and
//! playback defaults, loaded from a TOML file with environment overrides.

mod load;
mod schema;

pub use schema::*;

#[cfg(test)]
mod tests;
