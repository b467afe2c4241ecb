use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FacegridError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode image {}: {message}", path.display())]
    Decode { path: PathBuf, message: String },

    #[error("keyword \"{keyword}\" was not found in any image")]
    EmptyResult { keyword: String },
}

impl FacegridError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }
}

pub type Result<T> = std::result::Result<T, FacegridError>;
