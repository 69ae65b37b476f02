//! Errors raised while preparing the downloads directory.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PathError {
    #[error("Downloads directory path is empty")]
    Empty,

    #[error("Downloads path {0} exists but is not a directory")]
    NotADirectory(PathBuf),

    /// Only raised when creation is not allowed.
    #[error("Downloads directory {0} does not exist")]
    Missing(PathBuf),

    #[error("Failed to create downloads directory {path}: {source}")]
    Create {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The tool could not write its artifacts here.
    #[error("Downloads directory {path} is not writable: {source}")]
    NotWritable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to resolve downloads directory {path}: {source}")]
    Resolve {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Cannot determine current directory: {0}")]
    CurrentDir(#[source] io::Error),
}
