//! Shared command context and output formatting.

use std::io::{self, Write};

use serde::Serialize;
use spatial::{Rect, SpatialConfig};

use crate::error::Result;

/// State every subcommand receives.
pub struct Context {
    /// Loaded engine configuration.
    pub config: SpatialConfig,
    /// Emit JSON instead of text.
    pub json: bool,
}

impl Context {
    /// Print `value` as pretty JSON, or the text produced by `text`.
    pub fn emit<T, F>(&self, value: &T, text: F) -> Result<()>
    where
        T: Serialize,
        F: FnOnce() -> String,
    {
        let out = if self.json {
            serde_json::to_string_pretty(value)?
        } else {
            text()
        };
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{}", out.trim_end())?;
        Ok(())
    }
}

/// Compact `x,y wxh` rendering.
pub fn format_rect(r: &Rect) -> String {
    format!("{:.0},{:.0} {:.0}x{:.0}", r.x, r.y, r.w, r.h)
}
