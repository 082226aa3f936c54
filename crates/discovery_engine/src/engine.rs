use std::collections::BTreeSet;
use std::io;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use discovery_core::{EntityReference, Frontier, LocalFrontier, RunId, Seed, SharedFrontier};
use engine_logging::{engine_debug, engine_info};
use serde::{Deserialize, Serialize};
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;

use crate::config::DiscoveryConfig;
use crate::detail::{DetailError, DetailExtractor, DetailRecord};
use crate::fetch::{FetchSettings, PageFetcher, ReqwestFetcher};
use crate::runner::{DiscoveryRunner, EventSink};
use crate::EngineEvent;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub fetch: FetchSettings,
    pub discovery: DiscoveryConfig,
    /// Channel ids crawled before; never emitted again.
    pub known_ids: BTreeSet<String>,
    /// Upper bound on detail extractions running at once.
    pub detail_concurrency: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            fetch: FetchSettings::default(),
            discovery: DiscoveryConfig::default(),
            known_ids: BTreeSet::new(),
            detail_concurrency: 4,
        }
    }
}

enum EngineCommand {
    Discover { run_id: RunId, seed: Seed },
    ExtractDetail { run_id: RunId, channel: EntityReference },
}

/// Background worker owning a tokio runtime. Commands go in, `EngineEvent`s
/// come out; nothing here blocks the caller.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
    frontier: SharedFrontier,
    cancel: CancellationToken,
}

impl EngineHandle {
    pub fn new(config: EngineConfig, detail: Arc<dyn DetailExtractor>) -> io::Result<Self> {
        let fetcher = Arc::new(ReqwestFetcher::new(config.fetch.clone()));
        Self::with_fetcher(config, fetcher, detail)
    }

    pub fn with_fetcher(
        config: EngineConfig,
        fetcher: Arc<dyn PageFetcher>,
        detail: Arc<dyn DetailExtractor>,
    ) -> io::Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()?;
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let frontier = SharedFrontier::new(LocalFrontier::seeded(config.known_ids.iter()));
        let cancel = CancellationToken::new();

        let worker = Worker {
            runner: DiscoveryRunner::new(fetcher, Arc::new(config.discovery)),
            detail,
            permits: Arc::new(Semaphore::new(config.detail_concurrency.max(1))),
            frontier: frontier.clone(),
            cancel: cancel.clone(),
            events: event_tx,
        };

        thread::spawn(move || {
            while let Ok(command) = cmd_rx.recv() {
                let worker = worker.clone();
                runtime.spawn(async move {
                    worker.handle(command).await;
                });
            }
        });

        Ok(Self {
            cmd_tx,
            event_rx,
            frontier,
            cancel,
        })
    }

    /// Starts a discovery run. Runs execute concurrently over one frontier.
    pub fn discover(&self, run_id: RunId, seed: Seed) {
        let _ = self.cmd_tx.send(EngineCommand::Discover { run_id, seed });
    }

    /// Queues a detail extraction for one channel.
    pub fn extract_detail(&self, run_id: RunId, channel: EntityReference) {
        let _ = self.cmd_tx.send(EngineCommand::ExtractDetail { run_id, channel });
    }

    /// Cancels every run and pending extraction. Each still reports what it
    /// produced before the stop.
    pub fn stop(&self) {
        engine_info!("engine stop requested");
        self.cancel.cancel();
    }

    pub fn is_stopped(&self) -> bool {
        self.cancel.is_cancelled()
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }

    /// Every channel id known so far: the configured ones plus all emitted.
    pub fn known_ids(&self) -> BTreeSet<String> {
        self.frontier.snapshot().to_set()
    }
}

#[derive(Clone)]
struct Worker {
    runner: DiscoveryRunner,
    detail: Arc<dyn DetailExtractor>,
    permits: Arc<Semaphore>,
    frontier: SharedFrontier,
    cancel: CancellationToken,
    events: mpsc::Sender<EngineEvent>,
}

impl Worker {
    async fn handle(&self, command: EngineCommand) {
        match command {
            EngineCommand::Discover { run_id, seed } => {
                self.runner
                    .run(
                        run_id,
                        seed,
                        Box::new(self.frontier.clone()),
                        &self.events,
                        &self.cancel,
                    )
                    .await;
            }
            EngineCommand::ExtractDetail { run_id, channel } => {
                let result = self.extract(&channel).await;
                self.events.emit(EngineEvent::DetailCompleted {
                    run_id,
                    channel,
                    result,
                });
            }
        }
    }

    async fn extract(&self, channel: &EntityReference) -> Result<DetailRecord, DetailError> {
        let _permit = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => return Err(DetailError::Cancelled),
            permit = self.permits.acquire() => permit.map_err(|_| DetailError::Cancelled)?,
        };
        engine_debug!("extracting details for {}", channel.url());
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(DetailError::Cancelled),
            result = self.detail.extract(channel.url()) => result,
        }
    }
}
