use crate::{DiscoveryMode, Phase};

/// Summary of a discovery run; also the read-only view of a live state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DiscoveryReport {
    pub mode: DiscoveryMode,
    pub phase: Phase,
    pub pages_fetched: usize,
    /// Channel references seen on all pages, duplicates included.
    pub entities_seen: usize,
    pub emitted: usize,
    /// References dropped because the frontier already knew them.
    pub skipped_known: usize,
    pub related_emitted: usize,
    pub cancelled: bool,
    pub failure: Option<String>,
}

impl DiscoveryReport {
    pub fn is_done(&self) -> bool {
        self.phase == Phase::Done
    }
}
