//! Error types for the options dashboard

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashboardError {
    /// Backing collection is missing or its rows do not match the record shape
    #[error("Collection '{collection}' unavailable: {reason}")]
    CollectionUnavailable { collection: String, reason: String },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    IO(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

pub type DashboardResult<T> = Result<T, DashboardError>;

impl DashboardError {
    pub fn unavailable(collection: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::CollectionUnavailable {
            collection: collection.into(),
            reason: reason.into(),
        }
    }

    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Collection missing or schema mismatch
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::CollectionUnavailable { .. })
    }

    /// Query could not be executed
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}
