use std::fmt;

use discovery_core::{DiscoveryReport, EntityReference, FollowUp, Phase, RunId};

use crate::detail::{DetailError, DetailRecord};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunProgress {
    pub run_id: RunId,
    pub phase: Phase,
    pub pages_fetched: usize,
    pub emitted: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    Progress(RunProgress),
    FollowUp {
        run_id: RunId,
        item: FollowUp,
    },
    RunFinished {
        run_id: RunId,
        report: DiscoveryReport,
    },
    DetailCompleted {
        run_id: RunId,
        channel: EntityReference,
        result: Result<DetailRecord, DetailError>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOutput {
    pub bytes: Vec<u8>,
    pub metadata: FetchMetadata,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchMetadata {
    pub original_url: String,
    pub final_url: String,
    pub redirect_count: usize,
    pub content_type: Option<String>,
    pub byte_len: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct FetchError {
    pub kind: FailureKind,
    pub message: String,
}

impl FetchError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    RedirectLimitExceeded,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    UnsupportedContentType { content_type: String },
    Network,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::RedirectLimitExceeded => write!(f, "redirect limit exceeded"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::UnsupportedContentType { content_type } => {
                write!(f, "unsupported content type {content_type}")
            }
            FailureKind::Network => write!(f, "network error"),
        }
    }
}

/// Why a seed page or a continuation page produced nothing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DiscoveryError {
    #[error("transport failure: {0}")]
    Transport(#[from] FetchError),
    #[error("parse failure: {0}")]
    Parse(#[from] ParseError),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("ytInitialData marker not found")]
    MarkerNotFound,
    #[error("malformed json: {0}")]
    MalformedJson(String),
    #[error("failed to decode bytes with {encoding}")]
    Undecodable { encoding: String },
}
