use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RelationError>;

#[derive(Error, Debug)]
pub enum RelationError {
    /// Structurally invalid input; aborts the whole run
    #[error("Processing error: {0}")]
    Processing(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl RelationError {
    pub fn processing(message: impl Into<String>) -> Self {
        Self::Processing(message.into())
    }

    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Processing(_) | Self::Json(_) => ErrorKind::Processing,
            Self::Config(_) => ErrorKind::Config,
        }
    }
}

/// Error classification carried in a failed [`crate::BuildReport`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorKind {
    #[serde(rename = "PROCESSING_ERROR")]
    Processing,

    #[serde(rename = "CONFIG_ERROR")]
    Config,
}
