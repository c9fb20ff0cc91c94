use std::time::Duration;
use thiserror::Error;

/// Why a probe could not reach its target. Only used for log messages; every
/// variant maps to `Status::Unreachable`.
#[derive(Debug, Error)]
pub enum ProbeFailure {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("no response within {0:?}")]
    Timeout(Duration),
    #[error("probe panicked: {0}")]
    Panicked(String),
}
