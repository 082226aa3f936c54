use std::collections::VecDeque;
use std::sync::{mpsc, Arc};

use discovery_core::{
    update, DiscoveryMode, DiscoveryReport, DiscoveryState, Effect, Frontier, Msg, RunId, Seed,
    SeedPage,
};
use engine_logging::{engine_debug, engine_info, engine_warn};
use tokio_util::sync::CancellationToken;

use crate::bootstrap::InitialStateLoader;
use crate::config::DiscoveryConfig;
use crate::extract::{extract_related_videos, PathExtractor};
use crate::fetch::PageFetcher;
use crate::token::ContinuationLocator;
use crate::walker::ContinuationWalker;
use crate::{EngineEvent, RunProgress};

/// Downstream consumer of everything a run produces.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

impl EventSink for mpsc::Sender<EngineEvent> {
    fn emit(&self, event: EngineEvent) {
        // A dropped receiver means nobody is listening any more.
        let _ = self.send(event);
    }
}

/// Executes the discovery state machine against the network.
#[derive(Clone)]
pub struct DiscoveryRunner {
    fetcher: Arc<dyn PageFetcher>,
    config: Arc<DiscoveryConfig>,
}

impl DiscoveryRunner {
    pub fn new(fetcher: Arc<dyn PageFetcher>, config: Arc<DiscoveryConfig>) -> Self {
        Self { fetcher, config }
    }

    /// Runs one seed to completion or cancellation. Follow-ups reach `sink` as
    /// soon as they are produced; the final report is both emitted and returned.
    pub async fn run(
        &self,
        run_id: RunId,
        seed: Seed,
        frontier: Box<dyn Frontier>,
        sink: &dyn EventSink,
        cancel: &CancellationToken,
    ) -> DiscoveryReport {
        let walker =
            ContinuationWalker::new(self.fetcher.clone(), self.config.clone(), seed.mode());
        engine_info!("run {run_id}: starting {}", seed.label());

        let mut state = DiscoveryState::with_boxed_frontier(seed, frontier);
        let mut inbox = VecDeque::from([Msg::Start]);
        let mut finished = None;

        while let Some(msg) = inbox.pop_front() {
            let skipped_before = state.report().skipped_known;
            let (next, effects) = update(state, msg);
            state = next;

            for effect in effects {
                match effect {
                    Effect::LoadSeed { seed } => {
                        let msg = if cancel.is_cancelled() {
                            Msg::Cancelled
                        } else {
                            tokio::select! {
                                biased;
                                _ = cancel.cancelled() => Msg::Cancelled,
                                msg = self.load_seed(run_id, &seed) => msg,
                            }
                        };
                        inbox.push_back(msg);
                    }
                    Effect::FetchPage { token } => {
                        let msg = if cancel.is_cancelled() {
                            Msg::Cancelled
                        } else {
                            tokio::select! {
                                biased;
                                _ = cancel.cancelled() => Msg::Cancelled,
                                page = walker.fetch_page(&token) => Msg::PageFetched(page),
                            }
                        };
                        inbox.push_back(msg);
                    }
                    Effect::FollowUp(item) => sink.emit(EngineEvent::FollowUp { run_id, item }),
                    Effect::Finished(report) => finished = Some(report),
                }
            }

            let report = state.report();
            let skipped = report.skipped_known - skipped_before;
            if skipped > 0 {
                engine_info!("run {run_id}: skipped {skipped} already known channel(s)");
            }
            sink.emit(EngineEvent::Progress(RunProgress {
                run_id,
                phase: report.phase,
                pages_fetched: report.pages_fetched,
                emitted: report.emitted,
            }));
        }

        let report = finished.unwrap_or_else(|| state.report());
        engine_info!(
            "run {run_id}: done after {} page(s), {} channel(s) emitted, {} related video(s), cancelled: {}",
            report.pages_fetched,
            report.emitted,
            report.related_emitted,
            report.cancelled
        );
        sink.emit(EngineEvent::RunFinished {
            run_id,
            report: report.clone(),
        });
        report
    }

    async fn load_seed(&self, run_id: RunId, seed: &Seed) -> Msg {
        let url = seed.seed_url(&self.config.origin);
        engine_debug!("run {run_id}: loading seed page {url}");
        match InitialStateLoader::new(self.fetcher.as_ref()).load(&url).await {
            Ok(document) => Msg::SeedLoaded(seed_page(seed.mode(), document.root())),
            Err(err) => {
                engine_warn!("run {run_id}: seed page {url} failed: {err}");
                Msg::SeedFailed {
                    reason: err.to_string(),
                }
            }
        }
    }
}

fn seed_page(mode: DiscoveryMode, root: &serde_json::Value) -> SeedPage {
    let related_videos = match mode {
        DiscoveryMode::RelatedVideo => extract_related_videos(root),
        DiscoveryMode::Search => Vec::new(),
    };
    SeedPage {
        entities: PathExtractor::for_mode(mode).extract(root),
        token: ContinuationLocator::for_mode(mode).locate(root),
        related_videos,
    }
}
