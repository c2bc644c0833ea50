//! Error types for Flowboard.
//!
//! Graph mutations are infallible and report rejections through
//! outcome enums. `CanvasError` covers the fallible edges of the crate:
//! configuration, loading external graph data, and the deploy/save triggers.

use std::io::ErrorKind;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unified error type for all Flowboard operations.
#[derive(Deserialize, Serialize, Error, Debug, Clone, PartialEq)]
pub enum CanvasError {
    /// Configuration parsing or validation errors.
    #[error("{0}")]
    Config(String),

    /// Data conversion errors (JSON, TOML).
    #[error("{0}")]
    Convert(String),

    /// Unknown node type or malformed catalog entry.
    #[error("{0}")]
    Catalog(String),

    /// Graph data that would violate a graph invariant.
    #[error("{0}")]
    Graph(String),

    /// Deploy trigger errors.
    #[error("{0}")]
    Deploy(String),

    /// Save trigger errors.
    #[error("{0}")]
    Save(String),

    /// I/O operation errors.
    #[error("{0}")]
    IoError(String),
}

impl From<CanvasError> for String {
    fn from(val: CanvasError) -> Self {
        val.to_string()
    }
}

impl From<std::io::Error> for CanvasError {
    fn from(error: std::io::Error) -> Self {
        CanvasError::IoError(error.to_string())
    }
}

impl From<CanvasError> for std::io::Error {
    fn from(val: CanvasError) -> Self {
        #[allow(clippy::io_other_error)]
        std::io::Error::new(ErrorKind::Other, val.to_string())
    }
}

impl From<serde_json::Error> for CanvasError {
    fn from(error: serde_json::Error) -> Self {
        CanvasError::Convert(error.to_string())
    }
}

impl From<toml::de::Error> for CanvasError {
    fn from(error: toml::de::Error) -> Self {
        CanvasError::Config(error.to_string())
    }
}

impl From<globset::Error> for CanvasError {
    fn from(error: globset::Error) -> Self {
        CanvasError::Config(format!("invalid event filter: {}", error))
    }
}
