use std::fmt;

use url::Url;

/// Host every canonical entity URL points at, independent of the origin the
/// pages were fetched from.
pub const PLATFORM_ORIGIN: &str = "https://www.youtube.com";

/// Opaque pagination token issued by the platform.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContinuationToken(String);

impl ContinuationToken {
    /// Returns `None` for blank tokens; a blank token never ends up on the wire.
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            None
        } else {
            Some(Self(raw))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContinuationToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A channel reference as found inside a page, before canonicalization.
///
/// Pages expose a channel through a channel id (`UC...`), a canonical path
/// (`/@handle`, `/c/name`, `/channel/UC...`), or both.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChannelRef {
    pub channel_id: Option<String>,
    pub path: Option<String>,
}

impl ChannelRef {
    pub fn from_channel_id(id: impl Into<String>) -> Self {
        Self {
            channel_id: Some(id.into()),
            path: None,
        }
    }

    pub fn from_path(path: impl Into<String>) -> Self {
        Self {
            channel_id: None,
            path: Some(path.into()),
        }
    }

    /// True when neither field carries anything canonicalizable.
    pub fn is_empty(&self) -> bool {
        self.canonicalize().is_none()
    }

    /// Canonical form: a channel id always wins over a path, so the same
    /// channel reached through different fields yields the same reference.
    pub fn canonicalize(&self) -> Option<EntityReference> {
        if let Some(id) = self.channel_id.as_deref().and_then(valid_channel_id) {
            return Some(EntityReference::for_channel_id(id));
        }
        let path = self.path.as_deref().and_then(normalize_path)?;
        let segments: Vec<&str> = path.trim_start_matches('/').split('/').collect();
        let root = match segments.as_slice() {
            ["channel", id, ..] => {
                if let Some(id) = valid_channel_id(id) {
                    return Some(EntityReference::for_channel_id(id));
                }
                &segments[..2]
            }
            ["c" | "user", _, ..] => &segments[..2],
            [first, ..] if !first.is_empty() => &segments[..1],
            _ => return None,
        };
        let id = root.join("/");
        Some(EntityReference {
            url: format!("{PLATFORM_ORIGIN}/{id}"),
            id,
        })
    }
}

/// Canonical, deduplicatable reference to a discovered channel.
///
/// Ordering follows the identifier so sets of references iterate
/// deterministically.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityReference {
    id: String,
    url: String,
}

impl EntityReference {
    fn for_channel_id(id: &str) -> Self {
        Self {
            id: id.to_string(),
            url: format!("{PLATFORM_ORIGIN}/channel/{id}"),
        }
    }

    /// Convenience for callers holding a bare channel id.
    pub fn from_channel_id(id: &str) -> Option<Self> {
        ChannelRef::from_channel_id(id).canonicalize()
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl fmt::Display for EntityReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)
    }
}

/// A video listed next to a related-video seed, used to recurse discovery.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VideoReference {
    id: String,
    url: String,
}

impl VideoReference {
    pub fn from_video_id(id: &str) -> Option<Self> {
        let id = id.trim();
        if id.is_empty() || !id.chars().all(is_id_char) {
            return None;
        }
        Some(Self {
            id: id.to_string(),
            url: format!("{PLATFORM_ORIGIN}/watch?v={id}"),
        })
    }

    /// Accepts `/watch?v=<id>` paths and absolute watch URLs.
    pub fn from_watch_path(path: &str) -> Option<Self> {
        let base = Url::parse(PLATFORM_ORIGIN).ok()?;
        let url = base.join(path.trim()).ok()?;
        if url.path() != "/watch" {
            return None;
        }
        let id = url
            .query_pairs()
            .find(|(key, _)| key == "v")
            .map(|(_, value)| value.into_owned())?;
        Self::from_video_id(&id)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

fn valid_channel_id(raw: &str) -> Option<&str> {
    let id = raw.trim();
    let rest = id.strip_prefix("UC")?;
    if rest.is_empty() || !rest.chars().all(is_id_char) {
        return None;
    }
    Some(id)
}

fn is_id_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

/// Reduces a raw path or absolute URL to `/segment[/segment...]`, dropping
/// query, fragment and trailing slashes.
fn normalize_path(raw: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    let path = if raw.starts_with('/') {
        let end = raw.find(['?', '#']).unwrap_or(raw.len());
        raw[..end].to_string()
    } else {
        Url::parse(raw).ok()?.path().to_string()
    };
    let path = path.trim_end_matches('/');
    if path.is_empty() || path.contains("//") {
        return None;
    }
    Some(path.to_string())
}
