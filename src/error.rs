// Error types for ghloc.
// Covers LOC service failures, breakdown validation, tree descent and local I/O.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GhlocError {
    #[error("LOC service request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("LOC service returned {status}: {reason}")]
    Remote { status: u16, reason: String },

    #[error("Invalid LOC breakdown: {0}")]
    InvalidBreakdown(String),

    #[error("No LOC data for path: {path}")]
    PathNotFound { path: String },

    #[error("Not a repository page: {0}")]
    NotARepository(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

impl GhlocError {
    /// Build a `PathNotFound` from the segments walked so far.
    pub fn path_not_found(segments: &[String]) -> Self {
        GhlocError::PathNotFound {
            path: segments.join("/"),
        }
    }
}

pub type Result<T> = std::result::Result<T, GhlocError>;
