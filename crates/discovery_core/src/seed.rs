use std::fmt;

use url::form_urlencoded;

/// Search filter restricting results to channels. Sent verbatim, the platform
/// expects the double-encoded form.
pub const SEARCH_CHANNEL_FILTER: &str = "EgIQAg%253D%253D";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DiscoveryMode {
    #[default]
    Search,
    RelatedVideo,
}

impl fmt::Display for DiscoveryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiscoveryMode::Search => write!(f, "search"),
            DiscoveryMode::RelatedVideo => write!(f, "related"),
        }
    }
}

/// Where a discovery run starts.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Seed {
    SearchQuery(String),
    Video(String),
}

impl Seed {
    pub fn mode(&self) -> DiscoveryMode {
        match self {
            Seed::SearchQuery(_) => DiscoveryMode::Search,
            Seed::Video(_) => DiscoveryMode::RelatedVideo,
        }
    }

    /// URL of the seed page. `origin` is only used for search seeds; video
    /// seeds are already absolute.
    pub fn seed_url(&self, origin: &str) -> String {
        match self {
            Seed::SearchQuery(query) => {
                let encoded: String =
                    form_urlencoded::byte_serialize(query.trim().as_bytes()).collect();
                format!(
                    "{}/results?search_query={}&sp={}",
                    origin.trim_end_matches('/'),
                    encoded,
                    SEARCH_CHANNEL_FILTER
                )
            }
            Seed::Video(url) => url.trim().to_string(),
        }
    }

    /// Short human-readable label used in logs and file names.
    pub fn label(&self) -> String {
        match self {
            Seed::SearchQuery(query) => format!("search {}", query.trim()),
            Seed::Video(url) => format!("related {}", url.trim()),
        }
    }
}
