use std::collections::{BTreeSet, HashSet};

use discovery_core::{ChannelRef, DiscoveryMode, EntityReference, VideoReference};
use engine_logging::engine_debug;
use serde_json::Value;

use crate::shape::{
    at, items, section_items, templates, text, watch_next_results, Template, MAX_NESTING,
};

/// Renderers whose channel sits behind a byline.
const VIDEO_RENDERERS: [&str; 3] = [
    "videoRenderer",
    "compactVideoRenderer",
    "promotedVideoRenderer",
];

/// Byline fields tried in order; the first one resolving to a channel wins.
const BYLINE_FIELDS: [&str; 3] = ["longBylineText", "shortBylineText", "ownerText"];

const AD_SLOT_VIDEO: [&str; 6] = [
    "adSlotRenderer",
    "fulfillmentContent",
    "fulfilledLayout",
    "inFeedAdLayoutRenderer",
    "renderingContent",
    "promotedVideoRenderer",
];

/// One way of pulling channel references out of a document.
pub trait ExtractionStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    /// `None` is a structural miss: the document does not have this shape.
    /// `Some` with an empty set means the shape matched but carried nothing.
    fn extract(&self, root: &Value) -> Option<BTreeSet<EntityReference>>;
}

/// Strategy backed by a document template: locate the item list, then resolve
/// every item node independently.
pub struct TemplateStrategy {
    template: Template,
}

impl TemplateStrategy {
    pub fn new(template: Template) -> Self {
        Self { template }
    }
}

impl ExtractionStrategy for TemplateStrategy {
    fn name(&self) -> &'static str {
        self.template.name
    }

    fn extract(&self, root: &Value) -> Option<BTreeSet<EntityReference>> {
        let nodes = self.template.locate(root)?;
        let mut found = BTreeSet::new();
        for node in nodes {
            collect_item(node, 0, &mut found);
        }
        Some(found)
    }
}

/// Path Extractor: ordered strategies per discovery mode, first match wins.
pub struct PathExtractor {
    mode: DiscoveryMode,
    strategies: Vec<Box<dyn ExtractionStrategy>>,
}

impl PathExtractor {
    pub fn for_mode(mode: DiscoveryMode) -> Self {
        let strategies = templates(mode)
            .iter()
            .map(|template| {
                Box::new(TemplateStrategy::new(*template)) as Box<dyn ExtractionStrategy>
            })
            .collect();
        Self::with_strategies(mode, strategies)
    }

    pub fn with_strategies(
        mode: DiscoveryMode,
        strategies: Vec<Box<dyn ExtractionStrategy>>,
    ) -> Self {
        Self { mode, strategies }
    }

    pub fn mode(&self) -> DiscoveryMode {
        self.mode
    }

    /// Never fails: a document matching no strategy yields an empty set.
    pub fn extract(&self, root: &Value) -> BTreeSet<EntityReference> {
        for strategy in &self.strategies {
            if let Some(found) = strategy.extract(root) {
                engine_debug!(
                    "{} extractor matched '{}' with {} channel(s)",
                    self.mode,
                    strategy.name(),
                    found.len()
                );
                return found;
            }
        }
        engine_debug!(
            "structural miss: {} document matched none of {} template(s)",
            self.mode,
            self.strategies.len()
        );
        BTreeSet::new()
    }
}

fn collect_item(item: &Value, depth: usize, found: &mut BTreeSet<EntityReference>) {
    if let Some(renderer) = item.get("channelRenderer") {
        found.extend(resolve_channel_renderer(renderer));
    }
    for key in VIDEO_RENDERERS {
        if let Some(video) = item.get(key) {
            found.extend(resolve_byline(video));
        }
    }
    for ad in items(item, &["searchPyvRenderer", "ads"]) {
        if let Some(video) = at(ad, &AD_SLOT_VIDEO) {
            found.extend(resolve_byline(video));
        }
    }
    if depth < MAX_NESTING {
        for nested in section_items(item) {
            collect_item(nested, depth + 1, found);
        }
    }
}

fn resolve_channel_renderer(renderer: &Value) -> Option<EntityReference> {
    let endpoint = at(renderer, &["navigationEndpoint"]);
    ChannelRef {
        channel_id: text(renderer, &["channelId"])
            .or_else(|| endpoint.and_then(|e| text(e, &["browseEndpoint", "browseId"])))
            .map(str::to_string),
        path: endpoint
            .and_then(|e| {
                text(e, &["browseEndpoint", "canonicalBaseUrl"])
                    .or_else(|| text(e, &["commandMetadata", "webCommandMetadata", "url"]))
            })
            .map(str::to_string),
    }
    .canonicalize()
}

/// Long byline, short byline, owner text, then the raw `channelId` field.
fn resolve_byline(video: &Value) -> Option<EntityReference> {
    BYLINE_FIELDS
        .into_iter()
        .find_map(|field| {
            let run = items(video, &[field, "runs"]).first()?;
            let endpoint = at(run, &["navigationEndpoint", "browseEndpoint"])?;
            ChannelRef {
                channel_id: text(endpoint, &["browseId"]).map(str::to_string),
                path: text(endpoint, &["canonicalBaseUrl"]).map(str::to_string),
            }
            .canonicalize()
        })
        .or_else(|| text(video, &["channelId"]).and_then(EntityReference::from_channel_id))
}

/// Videos listed next to the seed video on a watch page, in page order.
pub fn extract_related_videos(root: &Value) -> Vec<VideoReference> {
    let Some(results) = watch_next_results(root) else {
        engine_debug!("structural miss: no watch-next secondary results on seed page");
        return Vec::new();
    };
    let mut seen = HashSet::new();
    let mut videos = Vec::new();
    for item in results {
        collect_video(item, 0, &mut videos);
    }
    videos.retain(|video| seen.insert(video.id().to_string()));
    videos
}

fn collect_video(item: &Value, depth: usize, videos: &mut Vec<VideoReference>) {
    if let Some(video) = item.get("compactVideoRenderer") {
        let reference = text(video, &["videoId"])
            .and_then(VideoReference::from_video_id)
            .or_else(|| {
                text(video, &["navigationEndpoint", "commandMetadata", "webCommandMetadata", "url"])
                    .and_then(VideoReference::from_watch_path)
            });
        videos.extend(reference);
    }
    if let Some(lockup) = item.get("lockupViewModel") {
        let is_video = text(lockup, &["contentType"])
            .map_or(true, |kind| kind == "LOCKUP_CONTENT_TYPE_VIDEO");
        if is_video {
            videos.extend(text(lockup, &["contentId"]).and_then(VideoReference::from_video_id));
        }
    }
    if depth < MAX_NESTING {
        for nested in section_items(item) {
            collect_video(nested, depth + 1, videos);
        }
    }
}
