use discovery_core::{ContinuationToken, DiscoveryMode, PLATFORM_ORIGIN};
use serde::{Deserialize, Serialize};

/// Locale and platform fields sent in every pagination request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientProfile {
    pub hl: String,
    pub gl: String,
    pub client_name: String,
    pub client_version: String,
    pub platform: String,
}

impl ClientProfile {
    fn web(hl: &str, gl: &str) -> Self {
        Self {
            hl: hl.to_string(),
            gl: gl.to_string(),
            client_name: "WEB".to_string(),
            client_version: "2.20250606.01.00".to_string(),
            platform: "DESKTOP".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointProfile {
    /// Path and query of the pagination endpoint, relative to the origin.
    pub path: String,
    pub client: ClientProfile,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoveryConfig {
    /// Origin seed pages and pagination endpoints are fetched from.
    pub origin: String,
    pub search: EndpointProfile,
    pub related: EndpointProfile,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            origin: PLATFORM_ORIGIN.to_string(),
            search: EndpointProfile {
                path: "/youtubei/v1/search?prettyPrint=false".to_string(),
                client: ClientProfile::web("ja", "JP"),
            },
            related: EndpointProfile {
                path: "/youtubei/v1/next?prettyPrint=false".to_string(),
                client: ClientProfile::web("en", "US"),
            },
        }
    }
}

impl DiscoveryConfig {
    /// Same endpoints, different origin. Used to point the engine at a mock server.
    pub fn with_origin(origin: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            ..Self::default()
        }
    }

    pub fn endpoint(&self, mode: DiscoveryMode) -> &EndpointProfile {
        match mode {
            DiscoveryMode::Search => &self.search,
            DiscoveryMode::RelatedVideo => &self.related,
        }
    }

    pub fn endpoint_url(&self, mode: DiscoveryMode) -> String {
        let path = &self.endpoint(mode).path;
        format!(
            "{}/{}",
            self.origin.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

/// `{"context": {"client": {...}}, "continuation": <token>}`
#[derive(Debug, Clone, Copy)]
pub struct PaginationRequest<'a> {
    client: &'a ClientProfile,
    continuation: &'a str,
}

impl<'a> PaginationRequest<'a> {
    pub fn new(client: &'a ClientProfile, token: &'a ContinuationToken) -> Self {
        Self {
            client,
            continuation: token.as_str(),
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "context": { "client": self.client },
            "continuation": self.continuation,
        })
    }
}
