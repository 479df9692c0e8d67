//! Evidence pack reader.

use crate::errors::PackError;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use vcp_core::EvidencePack;

/// Events document file name.
pub const EVENTS_FILE: &str = "events.json";
/// Batches document file name.
pub const BATCHES_FILE: &str = "batches.json";
/// Anchors document file name.
pub const ANCHORS_FILE: &str = "anchors.json";

/// The three parsed pack documents, before structural validation.
#[derive(Debug, Clone, PartialEq)]
pub struct PackDocuments {
    /// `events.json`: `{metadata, policy_identification, events}`.
    pub events: Value,
    /// `batches.json`: `{batches}`.
    pub batches: Value,
    /// `anchors.json`: `{anchors}`.
    pub anchors: Value,
}

/// Reader for an evidence pack directory.
///
/// A pack directory holds exactly three documents: [`EVENTS_FILE`],
/// [`BATCHES_FILE`] and [`ANCHORS_FILE`]. All three must exist.
///
/// # Example
///
/// ```rust,no_run
/// use vcp_pack::PackReader;
///
/// let reader = PackReader::open("evidence/")?;
/// let pack = reader.load()?;
/// println!("{} events", pack.events.len());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct PackReader {
    dir: PathBuf,
}

impl PackReader {
    /// Opens a pack directory. Files are not read until [`load`](Self::load)
    /// or [`read_documents`](Self::read_documents).
    ///
    /// # Errors
    ///
    /// Returns [`PackError::NotADirectory`] if `dir` is not a directory.
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self, PackError> {
        let dir = dir.as_ref().to_path_buf();
        if !dir.is_dir() {
            return Err(PackError::NotADirectory { path: dir });
        }
        Ok(Self { dir })
    }

    /// Returns the pack directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Reads and parses the three documents without validating their shape.
    ///
    /// # Errors
    ///
    /// Returns [`PackError::Io`] if a file is missing or unreadable and
    /// [`PackError::Json`] if one is not valid JSON.
    pub fn read_documents(&self) -> Result<PackDocuments, PackError> {
        Ok(PackDocuments {
            events: self.read_json(EVENTS_FILE)?,
            batches: self.read_json(BATCHES_FILE)?,
            anchors: self.read_json(ANCHORS_FILE)?,
        })
    }

    /// Reads the documents and builds the typed pack.
    ///
    /// # Errors
    ///
    /// Returns [`PackError`] on I/O, JSON, or structural failure.
    pub fn load(&self) -> Result<EvidencePack, PackError> {
        let docs = self.read_documents()?;
        let pack = EvidencePack::from_documents(docs.events, docs.batches, docs.anchors)?;
        debug!(
            dir = %self.dir.display(),
            events = pack.events.len(),
            batches = pack.batches.len(),
            anchors = pack.anchors.len(),
            "loaded evidence pack"
        );
        Ok(pack)
    }

    fn read_json(&self, name: &str) -> Result<Value, PackError> {
        let path = self.dir.join(name);
        let bytes = fs::read(&path).map_err(|source| PackError::Io {
            path: path.clone(),
            source,
        })?;
        debug!(path = %path.display(), bytes = bytes.len(), "read pack file");
        serde_json::from_slice(&bytes).map_err(|source| PackError::Json { path, source })
    }
}

/// Opens `dir` and loads the pack it contains.
///
/// # Errors
///
/// Returns [`PackError`] if the directory cannot be read or the pack is
/// structurally invalid.
pub fn load_pack<P: AsRef<Path>>(dir: P) -> Result<EvidencePack, PackError> {
    PackReader::open(dir)?.load()
}
