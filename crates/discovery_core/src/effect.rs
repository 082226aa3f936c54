use crate::{
    ContinuationToken, DiscoveryReport, EntityReference, KnownIds, Seed, VideoReference,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    LoadSeed { seed: Seed },
    FetchPage { token: ContinuationToken },
    FollowUp(FollowUp),
    Finished(DiscoveryReport),
}

/// Work handed to downstream stages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FollowUp {
    /// Fetch the detail page of a newly discovered channel. `known` is the
    /// frontier at emission time so the detail stage can skip redundant work.
    ChannelDetail {
        channel: EntityReference,
        known: KnownIds,
    },
    /// Recurse discovery from a video listed next to the seed video.
    RelatedVideo { video: VideoReference },
}

impl FollowUp {
    pub fn url(&self) -> &str {
        match self {
            FollowUp::ChannelDetail { channel, .. } => channel.url(),
            FollowUp::RelatedVideo { video } => video.url(),
        }
    }
}
