//! Replay driver errors.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid script: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Step {step} refers to element #{index}, but only {known} exist")]
    UnknownElement {
        step: usize,
        index: usize,
        known: usize,
    },
}

pub type ReplayResult<T> = Result<T, ReplayError>;
