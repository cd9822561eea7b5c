//! Error types for the RL core library

use thiserror::Error;

/// Core error type for RL operations
#[derive(Error, Debug)]
pub enum RLError {
    /// Environment-related errors
    #[error("Environment error: {0}")]
    Environment(String),

    /// Invalid action
    #[error("Invalid action: {0}")]
    InvalidAction(String),

    /// Dimension mismatch
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected length
        expected: usize,
        /// Length actually supplied
        actual: usize,
    },

    /// Configuration rejected at load time
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Rejection sampling ran out of attempts while placing an entity.
    ///
    /// The stage is too small for the configured footprints and separation
    /// thresholds. This is fatal: the configuration must change.
    #[error("Could not place {entity} after {attempts} attempts; stage too small for configured separations")]
    InfeasiblePlacement {
        /// Which entity could not be placed
        entity: String,
        /// Attempt cap that was exhausted
        attempts: usize,
    },

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Other errors
    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl RLError {
    /// Whether the error stems from an unusable configuration.
    ///
    /// Configuration errors are never retried by the driver.
    #[must_use]
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_) | Self::InfeasiblePlacement { .. })
    }
}

/// Result type alias for RL operations
pub type Result<T> = std::result::Result<T, RLError>;
