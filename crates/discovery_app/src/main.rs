use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use discovery_app::{AppConfig, DispatchOptions, Dispatcher};
use discovery_core::Seed;
use discovery_engine::{EngineHandle, KnownIdStore, YtDlpExtractor};
use engine_logging::{engine_info, engine_warn, LogDestination};
use log::LevelFilter;

/// Discover channels from search results and related videos.
#[derive(Parser, Debug)]
#[command(name = "discovery", version)]
struct Args {
    /// Search query to seed from. Repeatable. Defaults to `vlog` when no seed is given.
    #[arg(short, long)]
    query: Vec<String>,

    /// Video URL to seed related-video discovery from. Repeatable.
    #[arg(short, long)]
    video: Vec<String>,

    /// RON settings file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Known channel store, overriding the config file.
    #[arg(long)]
    known_ids: Option<PathBuf>,

    /// Output directory, overriding the config file.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Skip channels recorded in the known channel store.
    #[arg(long)]
    daily: bool,

    /// Stop everything after this many seconds.
    #[arg(long)]
    deadline_secs: Option<u64>,

    /// Hops of related videos to follow, overriding the config file.
    #[arg(long)]
    related_depth: Option<usize>,

    /// Only discover channels, do not extract their details.
    #[arg(long)]
    no_details: bool,

    #[arg(long, value_enum, default_value_t = LogTarget::Terminal)]
    log: LogTarget,

    /// Log at debug level.
    #[arg(long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogTarget {
    Terminal,
    File,
    Both,
}

impl From<LogTarget> for LogDestination {
    fn from(target: LogTarget) -> Self {
        match target {
            LogTarget::Terminal => LogDestination::Terminal,
            LogTarget::File => LogDestination::File,
            LogTarget::Both => LogDestination::Both,
        }
    }
}

impl Args {
    fn seeds(&self) -> Vec<Seed> {
        let mut seeds: Vec<Seed> = self
            .query
            .iter()
            .filter(|q| !q.trim().is_empty())
            .map(|q| Seed::SearchQuery(q.clone()))
            .chain(
                self.video
                    .iter()
                    .filter(|v| !v.trim().is_empty())
                    .map(|v| Seed::Video(v.clone())),
            )
            .collect();
        if seeds.is_empty() {
            seeds.push(Seed::SearchQuery("vlog".to_string()));
        }
        seeds
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let level = if args.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    engine_logging::initialize(args.log.into(), level);

    let mut config = AppConfig::load(args.config.as_deref())?;
    if let Some(path) = &args.known_ids {
        config.known_ids_path = path.clone();
    }
    if let Some(dir) = &args.output {
        config.output_dir = dir.clone();
    }
    if let Some(depth) = args.related_depth {
        config.related_depth = depth;
    }

    let store = KnownIdStore::new(&config.known_ids_path);
    if args.daily {
        let known = store
            .load()
            .with_context(|| format!("failed to load {}", store.path().display()))?;
        engine_info!("daily run: skipping {} known channel(s)", known.len());
        config.engine.known_ids.extend(known);
    }

    let origin = config.engine.discovery.origin.clone();
    let extractor = Arc::new(YtDlpExtractor::new(config.yt_dlp.clone()));
    let engine =
        EngineHandle::new(config.engine.clone(), extractor).context("failed to start engine")?;

    let options = DispatchOptions {
        related_depth: config.related_depth,
        deadline: args.deadline_secs.map(Duration::from_secs),
        details: !args.no_details,
    };
    let summary = Dispatcher::new(&engine, options, origin).run(args.seeds(), &config.output_dir)?;

    let mut known = match store.load() {
        Ok(known) => known,
        Err(err) => {
            engine_warn!("known channel store unreadable, rewriting it: {err}");
            Default::default()
        }
    };
    known.extend(engine.known_ids());
    let path = store
        .save(&known)
        .with_context(|| format!("failed to save {}", store.path().display()))?;

    engine_info!(
        "finished {} run(s) in {}s: {} new channel(s), {} detail record(s) written, {} failed{}",
        summary.reports.len(),
        (summary.finished_at - summary.started_at).num_seconds(),
        summary.channels,
        summary.details_written,
        summary.details_failed,
        if summary.stopped_by_deadline {
            ", stopped by deadline"
        } else {
            ""
        }
    );
    engine_info!("{} known channel(s) saved to {}", known.len(), path.display());
    Ok(())
}
