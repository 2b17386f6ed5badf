use assetscope_api::HostError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON serialization/deserialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to load {path}: {source}")]
    Load { path: String, source: HostError },
    #[error("failed to instantiate {path}: {source}")]
    Instantiate { path: String, source: HostError },
    #[error("failed to open container {0}")]
    ContainerOpen(String),
    #[error("failed to read members of {object}: {source}")]
    Members { object: String, source: HostError },
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("invalid manifest: {0}")]
    Manifest(String),
    #[error("scan panicked: {0}")]
    Panic(String),
}

pub type Result<T> = std::result::Result<T, ScanError>;
