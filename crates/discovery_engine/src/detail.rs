use std::process::Stdio;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tokio::process::Command;

/// Raw detail payload for one channel, forwarded unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailRecord {
    pub url: String,
    pub payload: Value,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DetailError {
    #[error("failed to start {program}: {message}")]
    Spawn { program: String, message: String },
    #[error("extractor exited with {status}: {stderr}")]
    Exit { status: String, stderr: String },
    #[error("extractor timed out after {0:?}")]
    Timeout(Duration),
    #[error("extractor printed invalid json: {0}")]
    Json(String),
    #[error("extraction cancelled")]
    Cancelled,
}

/// Turns a channel URL into its detail record.
#[async_trait::async_trait]
pub trait DetailExtractor: Send + Sync {
    async fn extract(&self, url: &str) -> Result<DetailRecord, DetailError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct YtDlpSettings {
    /// Binary name or path.
    pub program: String,
    pub timeout: Duration,
}

impl Default for YtDlpSettings {
    fn default() -> Self {
        Self {
            program: "yt-dlp".to_string(),
            timeout: Duration::from_secs(120),
        }
    }
}

/// Shells out to `yt-dlp` and keeps its single JSON document.
#[derive(Debug, Clone, Default)]
pub struct YtDlpExtractor {
    settings: YtDlpSettings,
}

impl YtDlpExtractor {
    pub fn new(settings: YtDlpSettings) -> Self {
        Self { settings }
    }

    fn args(url: &str) -> [&str; 5] {
        [
            "--dump-single-json",
            "--flat-playlist",
            "--skip-download",
            "--no-warnings",
            url,
        ]
    }
}

#[async_trait::async_trait]
impl DetailExtractor for YtDlpExtractor {
    async fn extract(&self, url: &str) -> Result<DetailRecord, DetailError> {
        let child = Command::new(&self.settings.program)
            .args(Self::args(url))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            // Killed when the future is dropped by a timeout or a stop.
            .kill_on_drop(true)
            .spawn()
            .map_err(|err| DetailError::Spawn {
                program: self.settings.program.clone(),
                message: err.to_string(),
            })?;

        let output = tokio::time::timeout(self.settings.timeout, child.wait_with_output())
            .await
            .map_err(|_| DetailError::Timeout(self.settings.timeout))?
            .map_err(|err| DetailError::Spawn {
                program: self.settings.program.clone(),
                message: err.to_string(),
            })?;

        if !output.status.success() {
            return Err(DetailError::Exit {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let payload =
            serde_json::from_slice(&output.stdout)
                .map_err(|err| DetailError::Json(err.to_string()))?;
        Ok(DetailRecord {
            url: url.to_string(),
            payload,
        })
    }
}
