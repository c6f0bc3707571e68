//! Error taxonomy for dotforge operations.
//!
//! Load-time failures abort the whole operation; synchronization-time
//! failures are collected per directive (see [`crate::syncer::SyncReport`]).

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Component has no bundled configuration, or a directive's source
    /// file is absent.
    #[error("{0}: not found")]
    NotFound(String),

    /// Malformed component document (bundled or user override).
    #[error("failed to parse {path}: {reason}")]
    Parse { path: String, reason: String },

    /// No writer is registered under the requested format name.
    #[error("unknown format '{format}' (available: {available})")]
    UnsupportedFormat { format: String, available: String },

    /// A value tree does not match the writer's expected shape.
    #[error("invalid value at '{key}': {reason}")]
    InvalidValues { key: String, reason: String },

    /// Merge-mode sync could not combine the source with the user file.
    #[error("failed to merge {}: {reason}", .path.display())]
    Merge { path: PathBuf, reason: String },

    /// Directory creation, read, or write failure.
    #[error("failed to {op} {}: {source}", .path.display())]
    Io {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub(crate) fn io(op: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            op,
            path: path.into(),
            source,
        }
    }

    pub(crate) fn parse(path: impl std::fmt::Display, err: impl std::fmt::Display) -> Self {
        Error::Parse {
            path: path.to_string(),
            reason: err.to_string(),
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
