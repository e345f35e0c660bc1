use serde::Deserialize;

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/musika/config.toml` or `~/.config/musika/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `MUSIKA__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub remote: RemoteSettings,
    pub library: LibrarySettings,
    pub playback: PlaybackSettings,
    pub controls: ControlsSettings,
    pub ui: UiSettings,
}

/// Settings for the remote search provider.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RemoteSettings {
    /// Whether to fetch remote tracks at all. With this off the catalog
    /// contains only the local registry.
    pub enabled: bool,
    /// Search endpoint. Must accept `term`, `entity` and `limit` query
    /// parameters and answer with the iTunes Search API response shape.
    pub endpoint: String,
    /// Search term sent on startup.
    pub term: String,
    /// Maximum number of results to request.
    pub limit: u32,
    /// Connect/read timeout for the search request (seconds).
    pub timeout_secs: u64,
}

impl Default for RemoteSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: "https://itunes.apple.com/search".to_string(),
            term: "pop".to_string(),
            limit: 4,
            timeout_secs: 10,
        }
    }
}

/// The local track registry. Purely declarative: tracks ship with the
/// application and are listed here, nothing is scanned from disk.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LibrarySettings {
    pub tracks: Vec<LocalTrackEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LocalTrackEntry {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub author: Option<String>,
    /// Path to the audio file, absolute or relative to the working directory.
    pub file: String,
    #[serde(default)]
    pub thumbnail: Option<String>,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            tracks: vec![
                bundled("karera", "Karera", "Infraction", "Karera"),
                bundled("multo", "Multo", "Slushii", "Multo"),
                bundled(
                    "cant_stop",
                    "Can't Stop The Feeling",
                    "Infraction",
                    "CantStopTheFeeling",
                ),
                bundled(
                    "you_be_in_my_heart",
                    "You'd Be In My Heart",
                    "Chillpeach",
                    "YouBeInMyHeart",
                ),
            ],
        }
    }
}

fn bundled(id: &str, title: &str, author: &str, stem: &str) -> LocalTrackEntry {
    LocalTrackEntry {
        id: id.to_string(),
        title: title.to_string(),
        author: Some(author.to_string()),
        file: format!("tracks/{stem}.mp3"),
        thumbnail: Some(format!("art/{stem}.jpg")),
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PlaybackSettings {
    /// Whether the current track repeats on natural end.
    pub loop_enabled: bool,
    /// Whether shuffle starts enabled.
    pub shuffle: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ControlsSettings {
    /// Number of seconds to jump when pressing `H` / `L` on the player.
    pub skip_seconds: u64,
}

impl Default for ControlsSettings {
    fn default() -> Self {
        Self { skip_seconds: 10 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// The text rendered inside the top header box.
    pub header_text: String,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            header_text: " ~ Ating Musika ~ ".to_string(),
        }
    }
}
