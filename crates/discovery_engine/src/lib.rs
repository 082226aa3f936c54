//! Discovery engine: page fetching, JSON extraction and effect execution.
mod bootstrap;
mod config;
mod detail;
mod engine;
mod extract;
mod fetch;
mod filename;
mod persist;
mod runner;
mod shape;
mod token;
mod types;
mod walker;

pub use bootstrap::{decode_page, extract_initial_data, BootstrapDocument, InitialStateLoader};
pub use config::{ClientProfile, DiscoveryConfig, EndpointProfile, PaginationRequest};
pub use detail::{DetailError, DetailExtractor, DetailRecord, YtDlpExtractor, YtDlpSettings};
pub use engine::{EngineConfig, EngineHandle};
pub use extract::{extract_related_videos, ExtractionStrategy, PathExtractor, TemplateStrategy};
pub use fetch::{FetchSettings, PageFetcher, ReqwestFetcher};
pub use filename::seed_filename;
pub use persist::{ensure_output_dir, AtomicFileWriter, JsonLinesWriter, KnownIdStore, PersistError};
pub use runner::{DiscoveryRunner, EventSink};
pub use shape::{templates, Template};
pub use token::ContinuationLocator;
pub use types::{
    DiscoveryError, EngineEvent, FailureKind, FetchError, FetchMetadata, FetchOutput, ParseError,
    RunProgress,
};
pub use walker::ContinuationWalker;
