use thiserror::Error;

#[derive(Debug, Error)]
pub enum JailError {
    #[error("terminal i/o failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("config could not be encoded: {0}")]
    Config(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, JailError>;
