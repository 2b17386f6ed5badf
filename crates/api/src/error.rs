use thiserror::Error;

/// Failure reported by a host service.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HostError {
    #[error("asset not found: {0}")]
    NotFound(String),
    #[error("failed to load {path}: {reason}")]
    Load { path: String, reason: String },
    #[error("failed to instantiate {0}")]
    Instantiate(String),
    #[error("accessor `{member}` on {kind} failed: {reason}")]
    Accessor {
        kind: String,
        member: String,
        reason: String,
    },
    #[error("stale object handle {0}")]
    StaleHandle(u64),
    #[error("host error: {0}")]
    Other(String),
}

pub type HostResult<T> = std::result::Result<T, HostError>;
