use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Why a submission's source text could not be handed to the detectors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceUnavailable {
    #[error("no source stored for submission")]
    Missing,
    #[error("source file not found")]
    NotFound,
    #[error("permission denied reading source")]
    PermissionDenied,
    #[error("failed to read source: {0}")]
    Io(String),
}

impl From<io::Error> for SourceUnavailable {
    fn from(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => Self::NotFound,
            io::ErrorKind::PermissionDenied => Self::PermissionDenied,
            _ => Self::Io(err.to_string()),
        }
    }
}

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("cannot open submissions feed {}: {source}", path.display())]
    Open { path: PathBuf, source: csv::Error },
    #[error("malformed submissions feed {} at line {line}: {source}", path.display())]
    Row {
        path: PathBuf,
        line: u64,
        source: csv::Error,
    },
}

#[derive(Debug, Error)]
pub enum StoplistError {
    #[error("cannot read stoplist {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("unknown stoplist language: {0}")]
    UnknownLanguage(String),
}
