use std::collections::BTreeSet;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use thiserror::Error;

use crate::detail::DetailRecord;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("output directory missing or not writable: {0}")]
    OutputDir(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("ron error: {0}")]
    Ron(String),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Ensure output directory exists; create if missing.
pub fn ensure_output_dir(dir: &Path) -> Result<(), PersistError> {
    if dir.exists() {
        let meta = fs::metadata(dir).map_err(|e| PersistError::OutputDir(e.to_string()))?;
        if !meta.is_dir() {
            return Err(PersistError::OutputDir("path is not a directory".into()));
        }
    } else {
        fs::create_dir_all(dir).map_err(|e| PersistError::OutputDir(e.to_string()))?;
    }
    NamedTempFile::new_in(dir).map_err(|e| PersistError::OutputDir(e.to_string()))?;
    Ok(())
}

/// Writes whole files by way of a temp file and a rename, so readers never see
/// a half-written file.
pub struct AtomicFileWriter {
    dir: PathBuf,
}

impl AtomicFileWriter {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn write(&self, filename: &str, content: &str) -> Result<PathBuf, PersistError> {
        ensure_output_dir(&self.dir)?;

        let target = self.dir.join(filename);
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(content.as_bytes())?;
        tmp.flush()?;
        tmp.as_file_mut().sync_all()?;

        tmp.persist(&target).map_err(|e| PersistError::Io(e.error))?;
        Ok(target)
    }
}

/// Appends one detail record per line. Existing content is kept.
pub struct JsonLinesWriter {
    path: PathBuf,
    out: BufWriter<File>,
    written: usize,
}

impl JsonLinesWriter {
    pub fn open(dir: &Path, filename: &str) -> Result<Self, PersistError> {
        ensure_output_dir(dir)?;
        let path = dir.join(filename);
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(Self {
            path,
            out: BufWriter::new(file),
            written: 0,
        })
    }

    pub fn append(&mut self, record: &DetailRecord) -> Result<(), PersistError> {
        serde_json::to_writer(&mut self.out, record)?;
        self.out.write_all(b"\n")?;
        // Flushed per line: a stop or a crash loses at most the record in flight.
        self.out.flush()?;
        self.written += 1;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn written(&self) -> usize {
        self.written
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
struct KnownIdFile {
    #[serde(default)]
    channel_ids: BTreeSet<String>,
}

/// Channel ids crawled by earlier runs, kept as a RON file.
#[derive(Debug, Clone)]
pub struct KnownIdStore {
    path: PathBuf,
}

impl KnownIdStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A missing file is an empty store.
    pub fn load(&self) -> Result<BTreeSet<String>, PersistError> {
        if !self.path.exists() {
            return Ok(BTreeSet::new());
        }
        let content = fs::read_to_string(&self.path)?;
        let file: KnownIdFile =
            ron::from_str(&content).map_err(|err| PersistError::Ron(err.to_string()))?;
        Ok(file.channel_ids)
    }

    pub fn save(&self, ids: &BTreeSet<String>) -> Result<PathBuf, PersistError> {
        let file = KnownIdFile {
            channel_ids: ids.clone(),
        };
        let content = ron::ser::to_string_pretty(&file, ron::ser::PrettyConfig::new())
            .map_err(|err| PersistError::Ron(err.to_string()))?;

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let filename = self
            .path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| {
                PersistError::OutputDir(format!("invalid store path {}", self.path.display()))
            })?;
        AtomicFileWriter::new(dir).write(filename, &content)
    }
}
