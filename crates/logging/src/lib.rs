#![warn(missing_docs)]

//! Log-level flags and tracing filter construction shared by the spatial
//! binaries.
//!
//! A binary flattens [`LogArgs`] into its clap parser and hands
//! [`LogArgs::filter`] to its subscriber. Library crates only emit events.

use std::env;

use clap::{Args, ValueEnum};
use tracing_subscriber::EnvFilter;

/// Crate targets whose events the level flags control.
const OUR_CRATES: &[&str] = &["spatial", "spatialctl", "logging"];

/// Level used when no flag or `RUST_LOG` is given.
const DEFAULT_LEVEL: Level = Level::Warn;

/// Verbosity accepted by `--log-level`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Level {
    /// Errors only.
    Error,
    /// Warnings and errors.
    Warn,
    /// Progress messages.
    Info,
    /// Decisions and intermediate results.
    Debug,
    /// Every probe and cell.
    Trace,
}

impl Level {
    /// Directive name understood by `EnvFilter`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        }
    }
}

/// Verbosity flags for workspace binaries.
#[derive(Debug, Clone, Default, Args)]
pub struct LogArgs {
    /// Shorthand for `--log-level trace`
    #[arg(long, global = true, conflicts_with_all = ["debug", "log_level", "log_filter"])]
    pub trace: bool,

    /// Shorthand for `--log-level debug`
    #[arg(long, global = true, conflicts_with_all = ["trace", "log_level", "log_filter"])]
    pub debug: bool,

    /// Level applied to the spatial crates only
    #[arg(long, global = true, value_enum, value_name = "LEVEL")]
    pub log_level: Option<Level>,

    /// Raw `EnvFilter` directives, e.g. "spatial::constraints=trace";
    /// overrides every other flag
    #[arg(long, global = true, value_name = "DIRECTIVES")]
    pub log_filter: Option<String>,
}

impl LogArgs {
    /// Effective level from the shorthand flags, if any was given.
    fn level(&self) -> Option<Level> {
        if self.trace {
            Some(Level::Trace)
        } else if self.debug {
            Some(Level::Debug)
        } else {
            self.log_level
        }
    }

    /// Directive string for these flags; see [`compute_spec`].
    pub fn spec(&self) -> String {
        compute_spec(self.level(), self.log_filter.as_deref())
    }

    /// Filter ready to install on a subscriber.
    pub fn filter(&self) -> EnvFilter {
        EnvFilter::new(self.spec())
    }
}

/// Directives setting `level` for every spatial crate.
pub fn level_spec_for(level: Level) -> String {
    OUR_CRATES
        .iter()
        .map(|krate| format!("{krate}={}", level.as_str()))
        .collect::<Vec<_>>()
        .join(",")
}

/// Resolve the directive string. An explicit filter wins, then an explicit
/// level, then `RUST_LOG`, then crate-scoped `warn`.
pub fn compute_spec(level: Option<Level>, filter: Option<&str>) -> String {
    if let Some(directives) = filter {
        return directives.to_string();
    }
    if let Some(level) = level {
        return level_spec_for(level);
    }
    env::var("RUST_LOG").unwrap_or_else(|_| level_spec_for(DEFAULT_LEVEL))
}
