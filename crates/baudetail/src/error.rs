//! Error types for Baudetail operations.
//!
//! Only [`ViewerError::MalformedDiagram`] is meant to reach a user: unbound
//! parts, dangling scenario references and missing audio all degrade to
//! no-ops inside the engine and are never returned as errors.

use std::io;

use thiserror::Error;

/// The main error type for Baudetail operations.
#[derive(Debug, Error)]
pub enum ViewerError {
    /// Required diagram fields are missing or could not be parsed.
    ///
    /// Carries the offending payload so it can be shown for inspection.
    #[error("Malformed diagram: {reason}")]
    MalformedDiagram { reason: String, payload: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl ViewerError {
    /// Create a new `MalformedDiagram` error with the associated raw payload.
    pub fn malformed(reason: impl Into<String>, payload: impl Into<String>) -> Self {
        Self::MalformedDiagram {
            reason: reason.into(),
            payload: payload.into(),
        }
    }

    /// Returns the raw payload for `MalformedDiagram` errors.
    pub fn payload(&self) -> Option<&str> {
        match self {
            Self::MalformedDiagram { payload, .. } => Some(payload),
            _ => None,
        }
    }
}
