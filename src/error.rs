//! Error types for coordr
//!
//! Work failures are modeled as data (failure flags, thresholds). This enum only
//! covers setup mistakes and broken tasks.

use thiserror::Error;

/// All error types that can occur in coordr
#[derive(Debug, Error)]
pub enum CoordError {
    /// Configuration rejected before a run starts
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// Resource index out of range or a degenerate pair
    #[error("Invalid resource: {0}")]
    InvalidResource(String),

    /// Invalid state transition
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// A spawned activity panicked or was aborted
    #[error("Task error: {0}")]
    Task(#[from] tokio::task::JoinError),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for coordr operations
pub type Result<T> = std::result::Result<T, CoordError>;
