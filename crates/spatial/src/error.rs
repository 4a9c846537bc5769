//! Error type for the spatial crate.

use std::{path::PathBuf, result::Result as StdResult};

use thiserror::Error;

use crate::window::WindowId;

/// Convenient result type for the spatial crate.
pub type Result<T> = StdResult<T, Error>;

/// Errors produced by the spatial engine.
///
/// Expected outcomes such as constraint violations or dropped symbols are
/// returned as data, not as errors.
#[derive(Debug, Error)]
pub enum Error {
    /// No bordered grid block was found in the supplied text.
    #[error("no grid block found in text")]
    NoGridFound,

    /// No live window exists for the requested application.
    #[error("no live window for app '{app}'")]
    WindowNotFound {
        /// Application that was searched for.
        app: String,
    },

    /// The window disappeared while an operation was in progress.
    #[error("window {id} is gone")]
    WindowGone {
        /// Window that vanished.
        id: WindowId,
    },

    /// The window service cannot perform the requested operation.
    #[error("operation unsupported by window service")]
    Unsupported,

    /// Configuration could not be read or parsed.
    #[error("config error at {}: {message}", path.display())]
    Config {
        /// File that failed to load.
        path: PathBuf,
        /// Human-readable message.
        message: String,
    },

    /// Caller supplied malformed input.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}
