//! Error types for schema compatibility checking
//!
//! Compatibility findings are not errors: they are the normal output of a
//! check and live in [`crate::CompatibilityResult`]. The variants here cover
//! broken input graphs and the ambient configuration/report plumbing.

use thiserror::Error;

use crate::schema::SchemaId;

/// Result type for compatibility operations
pub type Result<T> = std::result::Result<T, CompatError>;

/// Schema compatibility errors
#[derive(Error, Debug)]
pub enum CompatError {
    #[error("Invalid schema {id}: {reason}")]
    InvalidSchema { id: SchemaId, reason: String },

    #[error("Configuration error: {0}")]
    Config(#[from] config_crate::ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::ser::Error),
}

impl CompatError {
    /// Build an invariant-violation error for a node of the schema graph
    pub fn invalid(id: SchemaId, reason: impl Into<String>) -> Self {
        Self::InvalidSchema {
            id,
            reason: reason.into(),
        }
    }
}
