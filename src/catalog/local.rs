use crate::config::LibrarySettings;

use super::model::Track;

/// Build the local track registry from configuration. The registry is
/// declared data: no directory scanning, no tag reading.
pub fn local_tracks(settings: &LibrarySettings) -> Vec<Track> {
    settings
        .tracks
        .iter()
        .map(|entry| {
            Track::local(
                entry.id.clone(),
                entry.title.clone(),
                entry.author.clone(),
                entry.file.clone(),
                entry.thumbnail.clone(),
            )
        })
        .collect()
}
