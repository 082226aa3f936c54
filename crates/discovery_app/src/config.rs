use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use discovery_engine::{EngineConfig, YtDlpSettings};
use serde::{Deserialize, Serialize};

/// Settings file for the `discovery` binary. Every field is optional in the
/// file; command-line flags override what it says.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub engine: EngineConfig,
    pub yt_dlp: YtDlpSettings,
    /// Directory the detail JSON-lines files go to.
    pub output_dir: PathBuf,
    /// RON store of channel ids crawled by earlier runs.
    pub known_ids_path: PathBuf,
    /// How many hops of related videos to follow from a video seed.
    pub related_depth: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            engine: EngineConfig::default(),
            yt_dlp: YtDlpSettings::default(),
            output_dir: PathBuf::from("output"),
            known_ids_path: PathBuf::from("known_channels.ron"),
            related_depth: 1,
        }
    }
}

impl AppConfig {
    /// Defaults when `path` is `None`; a named file must exist and parse.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::from_ron(&content)
            .with_context(|| format!("failed to parse config {}", path.display()))
    }

    pub fn from_ron(content: &str) -> anyhow::Result<Self> {
        Ok(ron::from_str(content)?)
    }
}
