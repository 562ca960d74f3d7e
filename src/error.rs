use std::path::PathBuf;
use thiserror::Error;

use crate::integrity::IntegrityError;

/// Errors that terminate the pipeline. There is no per-entry isolation:
/// any of these aborts the remaining manifest entries.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("cannot access {path}: {source}")]
    Access {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error(transparent)]
    Integrity(#[from] IntegrityError),
    #[error("Checksum did not match on file {0}")]
    ChecksumMismatch(String),
    #[error("url has no file name: {0}")]
    InvalidUrl(String),
}

impl PipelineError {
    pub(crate) fn access(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Access {
            path: path.into(),
            source,
        }
    }
}
