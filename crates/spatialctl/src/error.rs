//! Error handling for the spatialctl crate.

use std::{io, result};

use thiserror::Error;

/// Convenient result type for spatialctl operations.
pub type Result<T> = result::Result<T, Error>;

/// Errors that can occur while running a diagnostic.
#[derive(Debug, Error)]
pub enum Error {
    /// Wrapper for standard I/O errors.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    /// Malformed JSON input or unserializable output.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    /// Errors surfaced by the engine.
    #[error(transparent)]
    Spatial(#[from] spatial::Error),
    /// Arguments that parsed but make no sense together.
    #[error("{0}")]
    Usage(String),
}

impl Error {
    /// Helper to build a usage error from an arbitrary message.
    pub fn usage<M: Into<String>>(msg: M) -> Self {
        Self::Usage(msg.into())
    }
}
