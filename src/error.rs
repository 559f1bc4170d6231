use thiserror::Error;

#[derive(Error, Debug)]
pub enum DetectorError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid manifest: {0}")]
    Manifest(String),

    #[error("Invalid architecture state: {0}")]
    State(String),

    #[error("Invalid rule pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Apply failed: {0}")]
    Apply(String),
}

pub type Result<T> = std::result::Result<T, DetectorError>;
