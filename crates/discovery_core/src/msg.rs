use std::collections::BTreeSet;

use crate::{ContinuationToken, EntityReference, VideoReference};

/// Everything the seed page contributes to a run.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SeedPage {
    /// Channels rendered inline on the seed page.
    pub entities: BTreeSet<EntityReference>,
    /// First continuation token, if the page can be paginated.
    pub token: Option<ContinuationToken>,
    /// Secondary videos listed on a related-video seed page.
    pub related_videos: Vec<VideoReference>,
}

/// One pagination response, reduced to what the driver needs.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DiscoveredPage {
    pub entities: BTreeSet<EntityReference>,
    pub next_token: Option<ContinuationToken>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Begin the run; requests the seed page.
    Start,
    /// Seed page fetched and parsed.
    SeedLoaded(SeedPage),
    /// Seed page could not be fetched or parsed.
    SeedFailed { reason: String },
    /// A continuation page came back (possibly empty on failure).
    PageFetched(DiscoveredPage),
    /// Caller deadline or shutdown.
    Cancelled,
}
