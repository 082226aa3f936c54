use std::collections::{BTreeSet, HashSet};

use crate::{
    ContinuationToken, DiscoveryMode, DiscoveryReport, Effect, EntityReference, FollowUp,
    Frontier, Seed, VideoReference,
};

pub type RunId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Seeding,
    Paginating,
    Draining,
    Done,
}

/// State of one discovery run. Owns its frontier handle for the whole run.
#[derive(Debug)]
pub struct DiscoveryState {
    seed: Seed,
    phase: Phase,
    frontier: Box<dyn Frontier>,
    seed_requested: bool,
    related_videos: Vec<VideoReference>,
    report: DiscoveryReport,
}

impl DiscoveryState {
    pub fn new(seed: Seed, frontier: impl Frontier + 'static) -> Self {
        Self::with_boxed_frontier(seed, Box::new(frontier))
    }

    pub fn with_boxed_frontier(seed: Seed, frontier: Box<dyn Frontier>) -> Self {
        let report = DiscoveryReport {
            mode: seed.mode(),
            ..DiscoveryReport::default()
        };
        Self {
            seed,
            phase: Phase::Seeding,
            frontier,
            seed_requested: false,
            related_videos: Vec::new(),
            report,
        }
    }

    pub fn seed(&self) -> &Seed {
        &self.seed
    }

    pub fn mode(&self) -> DiscoveryMode {
        self.seed.mode()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_done(&self) -> bool {
        self.phase == Phase::Done
    }

    pub fn report(&self) -> DiscoveryReport {
        DiscoveryReport {
            phase: self.phase,
            ..self.report.clone()
        }
    }

    /// Returns `true` the first time only.
    pub(crate) fn request_seed(&mut self) -> bool {
        !std::mem::replace(&mut self.seed_requested, true)
    }

    pub(crate) fn keep_related_videos(&mut self, videos: Vec<VideoReference>) {
        self.related_videos = videos;
    }

    pub(crate) fn count_page(&mut self) {
        self.report.pages_fetched += 1;
    }

    /// Passes one page worth of references through the frontier and returns
    /// the follow-ups for those it had not seen.
    pub(crate) fn admit(&mut self, entities: BTreeSet<EntityReference>) -> Vec<Effect> {
        self.report.entities_seen += entities.len();
        let mut fresh = Vec::new();
        for entity in entities {
            if self.frontier.is_new(entity.id()) {
                fresh.push(entity);
            } else {
                self.report.skipped_known += 1;
            }
        }
        if fresh.is_empty() {
            return Vec::new();
        }

        self.report.emitted += fresh.len();
        let known = self.frontier.snapshot();
        fresh
            .into_iter()
            .map(|channel| {
                Effect::FollowUp(FollowUp::ChannelDetail {
                    channel,
                    known: known.clone(),
                })
            })
            .collect()
    }

    /// Next step after a page: keep paginating while a token is present,
    /// otherwise drain and finish.
    pub(crate) fn advance(&mut self, token: Option<ContinuationToken>) -> Vec<Effect> {
        match token {
            Some(token) => {
                self.phase = Phase::Paginating;
                vec![Effect::FetchPage { token }]
            }
            None => {
                let mut effects = self.drain();
                effects.extend(self.finish());
                effects
            }
        }
    }

    fn drain(&mut self) -> Vec<Effect> {
        self.phase = Phase::Draining;
        let videos = std::mem::take(&mut self.related_videos);
        if self.mode() != DiscoveryMode::RelatedVideo {
            return Vec::new();
        }

        let mut seen = HashSet::new();
        let effects: Vec<Effect> = videos
            .into_iter()
            .filter(|video| seen.insert(video.id().to_string()))
            .map(|video| Effect::FollowUp(FollowUp::RelatedVideo { video }))
            .collect();
        self.report.related_emitted += effects.len();
        effects
    }

    pub(crate) fn fail(&mut self, reason: String) -> Vec<Effect> {
        self.report.failure = Some(reason);
        self.finish()
    }

    pub(crate) fn cancel(&mut self) -> Vec<Effect> {
        self.report.cancelled = true;
        self.related_videos.clear();
        self.finish()
    }

    fn finish(&mut self) -> Vec<Effect> {
        self.phase = Phase::Done;
        vec![Effect::Finished(self.report())]
    }
}
