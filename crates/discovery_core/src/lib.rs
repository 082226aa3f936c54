//! Discovery core: pure driver state machine, frontier and entity model.
mod effect;
mod entity;
mod frontier;
mod msg;
mod report;
mod seed;
mod state;
mod update;

pub use effect::{Effect, FollowUp};
pub use entity::{ChannelRef, ContinuationToken, EntityReference, VideoReference, PLATFORM_ORIGIN};
pub use frontier::{Frontier, KnownIds, LocalFrontier, SharedFrontier};
pub use msg::{DiscoveredPage, Msg, SeedPage};
pub use report::DiscoveryReport;
pub use seed::{DiscoveryMode, Seed, SEARCH_CHANNEL_FILTER};
pub use state::{DiscoveryState, Phase, RunId};
pub use update::update;
