//! Error types for modal-plus

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DialogError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Unsupported button combination: {0}")]
    Unsupported(String),

    #[error("No dialog is bound to the service - call bind() first")]
    NotBound,

    #[error("A confirmation request is already pending on the bound dialog")]
    Busy,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, DialogError>;
