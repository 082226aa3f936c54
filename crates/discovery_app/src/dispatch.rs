use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use discovery_core::{DiscoveryReport, FollowUp, RunId, Seed, VideoReference};
use discovery_engine::{
    seed_filename, DetailError, EngineEvent, EngineHandle, JsonLinesWriter, PersistError,
};
use engine_logging::{engine_debug, engine_error, engine_info, engine_warn};

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Time allowed after a stop for runs and extractions to report back.
const STOP_GRACE: Duration = Duration::from_secs(15);

#[derive(Debug, Clone)]
pub struct DispatchOptions {
    /// Hops of related videos followed from a video seed; 0 disables recursion.
    pub related_depth: usize,
    pub deadline: Option<Duration>,
    pub details: bool,
}

#[derive(Debug, Clone)]
pub struct DispatchSummary {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub reports: Vec<DiscoveryReport>,
    pub channels: usize,
    pub details_written: usize,
    pub details_failed: usize,
    pub stopped_by_deadline: bool,
}

struct RunInfo {
    root: usize,
    depth: usize,
}

/// Drives the engine for a set of root seeds: starts runs, routes follow-ups
/// to detail extraction or further runs, and writes detail records.
pub struct Dispatcher<'a> {
    engine: &'a EngineHandle,
    options: DispatchOptions,
    origin: String,
    writers: Vec<Option<JsonLinesWriter>>,
    runs: HashMap<RunId, RunInfo>,
    visited_videos: HashSet<String>,
    next_run_id: RunId,
    active_runs: usize,
    pending_details: usize,
    summary: DispatchSummary,
}

impl<'a> Dispatcher<'a> {
    pub fn new(
        engine: &'a EngineHandle,
        options: DispatchOptions,
        origin: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            engine,
            options,
            origin: origin.into(),
            writers: Vec::new(),
            runs: HashMap::new(),
            visited_videos: HashSet::new(),
            next_run_id: 1,
            active_runs: 0,
            pending_details: 0,
            summary: DispatchSummary {
                started_at: now,
                finished_at: now,
                reports: Vec::new(),
                channels: 0,
                details_written: 0,
                details_failed: 0,
                stopped_by_deadline: false,
            },
        }
    }

    /// Runs every root seed to the end, or until the deadline stops the engine.
    pub fn run(
        mut self,
        seeds: Vec<Seed>,
        output_dir: &Path,
    ) -> Result<DispatchSummary, PersistError> {
        for seed in seeds {
            let writer = if self.options.details {
                let filename = seed_filename(&seed, &self.origin);
                let writer = JsonLinesWriter::open(output_dir, &filename)?;
                engine_info!("details for {} go to {}", seed.label(), writer.path().display());
                Some(writer)
            } else {
                None
            };
            if let Some(video) = seed_video(&seed) {
                self.visited_videos.insert(video.id().to_string());
            }
            self.writers.push(writer);
            self.launch(seed, self.writers.len() - 1, 0);
        }

        let started = Instant::now();
        let mut stopped_at: Option<Instant> = None;
        while self.active_runs > 0 || self.pending_details > 0 {
            if stopped_at.is_none() {
                if let Some(deadline) = self.options.deadline {
                    if started.elapsed() >= deadline {
                        engine_warn!("deadline of {deadline:?} reached, stopping");
                        self.engine.stop();
                        self.summary.stopped_by_deadline = true;
                        stopped_at = Some(Instant::now());
                    }
                }
            }
            if let Some(at) = stopped_at {
                if at.elapsed() >= STOP_GRACE {
                    engine_error!(
                        "{} run(s) and {} extraction(s) did not report after stop",
                        self.active_runs,
                        self.pending_details
                    );
                    break;
                }
            }
            if let Some(event) = self.engine.recv_timeout(POLL_INTERVAL) {
                self.handle(event);
            }
        }

        self.summary.finished_at = Utc::now();
        Ok(self.summary)
    }

    fn launch(&mut self, seed: Seed, root: usize, depth: usize) {
        let run_id = self.next_run_id;
        self.next_run_id += 1;
        self.runs.insert(run_id, RunInfo { root, depth });
        self.active_runs += 1;
        engine_debug!("run {run_id}: queued {} at depth {depth}", seed.label());
        self.engine.discover(run_id, seed);
    }

    fn handle(&mut self, event: EngineEvent) {
        match event {
            EngineEvent::Progress(progress) => {
                engine_debug!(
                    "run {}: {:?}, {} page(s), {} channel(s)",
                    progress.run_id,
                    progress.phase,
                    progress.pages_fetched,
                    progress.emitted
                );
            }
            EngineEvent::FollowUp { run_id, item } => self.follow_up(run_id, item),
            EngineEvent::RunFinished { run_id, report } => {
                self.active_runs = self.active_runs.saturating_sub(1);
                if let Some(reason) = &report.failure {
                    engine_debug!("run {run_id}: finished with seed failure: {reason}");
                }
                self.summary.reports.push(report);
            }
            EngineEvent::DetailCompleted {
                run_id,
                channel,
                result,
            } => {
                self.pending_details = self.pending_details.saturating_sub(1);
                match result {
                    Ok(record) => {
                        let writer = self
                            .runs
                            .get(&run_id)
                            .and_then(|info| self.writers.get_mut(info.root))
                            .and_then(Option::as_mut);
                        if let Some(writer) = writer {
                            match writer.append(&record) {
                                Ok(()) => self.summary.details_written += 1,
                                Err(err) => {
                                    engine_error!("failed to write details for {channel}: {err}");
                                    self.summary.details_failed += 1;
                                }
                            }
                        }
                    }
                    Err(DetailError::Cancelled) => {
                        engine_debug!("details for {channel} cancelled");
                    }
                    Err(err) => {
                        engine_warn!("details for {channel} failed: {err}");
                        self.summary.details_failed += 1;
                    }
                }
            }
        }
    }

    fn follow_up(&mut self, run_id: RunId, item: FollowUp) {
        match item {
            FollowUp::ChannelDetail { channel, known } => {
                self.summary.channels += 1;
                engine_info!("run {run_id}: new channel {channel} ({} known)", known.len());
                if self.options.details && !self.engine.is_stopped() {
                    self.pending_details += 1;
                    self.engine.extract_detail(run_id, channel);
                }
            }
            FollowUp::RelatedVideo { video } => {
                let Some(info) = self.runs.get(&run_id) else {
                    return;
                };
                let (root, depth) = (info.root, info.depth + 1);
                if depth > self.options.related_depth || self.engine.is_stopped() {
                    return;
                }
                if !self.visited_videos.insert(video.id().to_string()) {
                    return;
                }
                let url = format!("{}/watch?v={}", self.origin.trim_end_matches('/'), video.id());
                self.launch(Seed::Video(url), root, depth);
            }
        }
    }
}

fn seed_video(seed: &Seed) -> Option<VideoReference> {
    match seed {
        Seed::Video(url) => VideoReference::from_watch_path(url),
        Seed::SearchQuery(_) => None,
    }
}
