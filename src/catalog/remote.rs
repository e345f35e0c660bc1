use std::sync::mpsc::{self, Receiver};
use std::thread;
use std::time::Duration;

use log::{debug, info};
use serde::Deserialize;
use thiserror::Error;

use crate::config::RemoteSettings;

use super::model::Track;

/// Prefix applied to remote track ids so they cannot collide with local ids.
pub(crate) const REMOTE_ID_PREFIX: &str = "api-";

#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("search request failed: {0}")]
    Http(#[from] Box<ureq::Error>),
    #[error("malformed search response: {0}")]
    Payload(#[from] std::io::Error),
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchHit {
    track_id: u64,
    track_name: String,
    #[serde(default)]
    artist_name: Option<String>,
    #[serde(default)]
    preview_url: Option<String>,
    #[serde(default)]
    artwork_url100: Option<String>,
}

/// Kick off the one-shot background search. The caller hands the receiver
/// to a `Catalog`, which polls it; if the catalog is gone by the time the
/// request resolves, the send fails and the result is dropped.
pub fn spawn_search(settings: &RemoteSettings) -> Receiver<Result<Vec<Track>, RemoteError>> {
    let (tx, rx) = mpsc::channel();
    let settings = settings.clone();
    thread::spawn(move || {
        let outcome = search(&settings);
        if tx.send(outcome).is_err() {
            debug!("remote: catalog gone before search resolved, dropping result");
        }
    });
    rx
}

fn search(settings: &RemoteSettings) -> Result<Vec<Track>, RemoteError> {
    let url = search_url(settings);
    info!("remote: searching {url}");

    let timeout = Duration::from_secs(settings.timeout_secs);
    let agent = ureq::AgentBuilder::new()
        .timeout_connect(timeout)
        .timeout_read(timeout)
        .build();

    let response = agent
        .get(&url)
        .set("Accept", "application/json")
        .call()
        .map_err(Box::new)?;
    let payload: SearchResponse = response.into_json()?;

    let tracks: Vec<Track> = payload
        .results
        .into_iter()
        .filter_map(track_from_hit)
        .collect();
    info!("remote: search returned {} playable tracks", tracks.len());
    Ok(tracks)
}

fn search_url(settings: &RemoteSettings) -> String {
    format!(
        "{}?term={}&entity=song&limit={}",
        settings.endpoint,
        urlencoding::encode(&settings.term),
        settings.limit
    )
}

/// Map a provider hit into a catalog entry. Hits without a preview locator
/// are not playable and are skipped.
fn track_from_hit(hit: SearchHit) -> Option<Track> {
    let source = hit.preview_url?;
    Some(Track::remote(
        format!("{REMOTE_ID_PREFIX}{}", hit.track_id),
        hit.track_name,
        hit.artist_name.filter(|a| !a.trim().is_empty()),
        source,
        hit.artwork_url100,
    ))
}

#[cfg(test)]
mod mapping_tests {
    use super::*;
    use crate::catalog::Origin;

    fn hit(id: u64, preview: Option<&str>) -> SearchHit {
        SearchHit {
            track_id: id,
            track_name: "Song".into(),
            artist_name: Some("Artist".into()),
            preview_url: preview.map(str::to_string),
            artwork_url100: None,
        }
    }

    #[test]
    fn hit_maps_to_namespaced_remote_track() {
        let track = track_from_hit(hit(42, Some("https://example.com/a.m4a"))).unwrap();
        assert_eq!(track.id, "api-42");
        assert_eq!(track.origin, Origin::Remote);
        assert_eq!(track.source, "https://example.com/a.m4a");
        assert_eq!(track.display, "Artist - Song");
    }

    #[test]
    fn hit_without_preview_is_skipped() {
        assert!(track_from_hit(hit(42, None)).is_none());
    }

    #[test]
    fn response_parses_itunes_shape() {
        let body = r#"{
            "resultCount": 1,
            "results": [
                {
                    "trackId": 7,
                    "trackName": "Pop Song",
                    "artistName": "Somebody",
                    "previewUrl": "https://cdn.example.com/p.m4a",
                    "artworkUrl100": "https://cdn.example.com/a.jpg"
                }
            ]
        }"#;
        let parsed: SearchResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.results.len(), 1);
        let track = track_from_hit(parsed.results.into_iter().next().unwrap()).unwrap();
        assert_eq!(track.id, "api-7");
        assert_eq!(track.thumbnail.as_deref(), Some("https://cdn.example.com/a.jpg"));
    }

    #[test]
    fn search_url_encodes_term() {
        let settings = RemoteSettings {
            term: "opm hits".into(),
            ..RemoteSettings::default()
        };
        let url = search_url(&settings);
        assert!(url.contains("term=opm%20hits"));
        assert!(url.contains("entity=song"));
    }
}
