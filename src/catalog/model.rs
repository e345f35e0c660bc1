/// Where a catalog entry came from.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Origin {
    /// Bundled with the application, declared in configuration.
    Local,
    /// Fetched from the remote search provider.
    Remote,
}

/// A playable catalog entry.
///
/// `id` is unique within a catalog snapshot: remote ids carry an `api-`
/// prefix, so they can never collide with local ids. `source` is either a
/// filesystem path (local) or an http(s) preview URL (remote).
#[derive(Debug, Clone)]
pub struct Track {
    pub id: String,
    pub title: String,
    pub author: Option<String>,
    pub source: String,
    pub thumbnail: Option<String>,
    pub origin: Origin,
    pub display: String,
}

impl Track {
    pub fn local(
        id: impl Into<String>,
        title: impl Into<String>,
        author: Option<String>,
        source: impl Into<String>,
        thumbnail: Option<String>,
    ) -> Self {
        let title = title.into();
        let display = make_display(&title, author.as_deref());
        Self {
            id: id.into(),
            title,
            author,
            source: source.into(),
            thumbnail,
            origin: Origin::Local,
            display,
        }
    }

    pub fn remote(
        id: impl Into<String>,
        title: impl Into<String>,
        author: Option<String>,
        source: impl Into<String>,
        thumbnail: Option<String>,
    ) -> Self {
        let title = title.into();
        let display = make_display(&title, author.as_deref());
        Self {
            id: id.into(),
            title,
            author,
            source: source.into(),
            thumbnail,
            origin: Origin::Remote,
            display,
        }
    }
}

pub(crate) fn make_display(title: &str, author: Option<&str>) -> String {
    match author {
        Some(a) if !a.trim().is_empty() => format!("{} - {}", a.trim(), title),
        _ => title.to_string(),
    }
}
