use std::sync::Arc;

use discovery_core::{ContinuationToken, DiscoveredPage, DiscoveryMode};
use engine_logging::{engine_debug, engine_warn};
use serde_json::Value;

use crate::config::{DiscoveryConfig, PaginationRequest};
use crate::extract::PathExtractor;
use crate::fetch::PageFetcher;
use crate::token::ContinuationLocator;
use crate::{DiscoveryError, ParseError};

/// Continuation Walker: one pagination POST per token, reduced to the
/// entities it carries and the token for the page after it.
pub struct ContinuationWalker {
    fetcher: Arc<dyn PageFetcher>,
    config: Arc<DiscoveryConfig>,
    mode: DiscoveryMode,
    extractor: PathExtractor,
    locator: ContinuationLocator,
}

impl ContinuationWalker {
    pub fn new(
        fetcher: Arc<dyn PageFetcher>,
        config: Arc<DiscoveryConfig>,
        mode: DiscoveryMode,
    ) -> Self {
        Self {
            fetcher,
            config,
            mode,
            extractor: PathExtractor::for_mode(mode),
            locator: ContinuationLocator::for_mode(mode),
        }
    }

    /// Never fails. Any transport or parse failure ends the stream: the page
    /// comes back empty and without a next token.
    pub async fn fetch_page(&self, token: &ContinuationToken) -> DiscoveredPage {
        match self.try_fetch(token).await {
            Ok(root) => {
                let page = DiscoveredPage {
                    entities: self.extractor.extract(&root),
                    next_token: self.locator.locate(&root),
                };
                engine_debug!(
                    "{} page yielded {} channel(s), next token present: {}",
                    self.mode,
                    page.entities.len(),
                    page.next_token.is_some()
                );
                page
            }
            Err(err) => {
                engine_warn!("{} pagination stopped: {err}", self.mode);
                DiscoveredPage::default()
            }
        }
    }

    async fn try_fetch(&self, token: &ContinuationToken) -> Result<Value, DiscoveryError> {
        let endpoint = self.config.endpoint(self.mode);
        let body = PaginationRequest::new(&endpoint.client, token).to_json();
        let output = self
            .fetcher
            .post_json(&self.config.endpoint_url(self.mode), &body)
            .await?;
        let root = serde_json::from_slice(&output.bytes)
            .map_err(|err| ParseError::MalformedJson(err.to_string()))?;
        Ok(root)
    }
}
