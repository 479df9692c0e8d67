use std::path::PathBuf;
use thiserror::Error;
use vcp_core::LoadError;

/// Errors that can occur while reading an evidence pack directory.
#[derive(Error, Debug)]
pub enum PackError {
    /// The pack path is not a directory.
    #[error("{path} is not a directory")]
    NotADirectory {
        /// Offending path.
        path: PathBuf,
    },
    /// I/O error while reading a pack file.
    #[error("cannot read {path}: {source}")]
    Io {
        /// File being read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// A pack file is not valid JSON.
    #[error("invalid JSON in {path}: {source}")]
    Json {
        /// File being parsed.
        path: PathBuf,
        /// Underlying parse error.
        #[source]
        source: serde_json::Error,
    },
    /// The documents parsed but do not form a valid pack.
    #[error("invalid evidence pack: {0}")]
    Load(#[from] LoadError),
}
