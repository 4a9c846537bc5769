//! `decode`: parse a grid out of free text.

use std::fmt::Write as _;

use serde::Serialize;
use spatial::{Error as SpatialError, Rect, grid::Decoded};
use tracing::{info, warn};

use crate::{
    backend::read_input,
    cli::DecodeArgs,
    error::Result,
    report::{Context, format_rect},
};

/// A decoded command with its target resolved to pixels.
#[derive(Debug, Serialize)]
struct Resolved {
    /// Application to move.
    app: String,
    /// Target frame.
    rect: Rect,
}

/// JSON shape of the decode output.
#[derive(Debug, Serialize)]
struct DecodeOutput {
    /// Whether a grid block was found.
    found: bool,
    /// Resolved moves, ordered by symbol.
    commands: Vec<Resolved>,
    /// Symbols with no owning app.
    dropped_symbols: Vec<char>,
}

/// Run the decode command. Text without a grid yields no commands.
pub fn run(args: &DecodeArgs, ctx: &Context) -> Result<()> {
    let text = read_input(&args.input)?;
    let (found, decoded) = match ctx.config.codec().decode(&text, args.screen) {
        Ok(decoded) => (true, decoded),
        Err(SpatialError::NoGridFound) => {
            warn!("No grid block found in input");
            (false, Decoded::default())
        }
        Err(err) => return Err(err.into()),
    };
    if decoded.unmapped_count() > 0 {
        info!(dropped = decoded.unmapped_count(), "Dropped symbols without an app");
    }
    let screen = Rect::from_size(args.screen);
    let output = DecodeOutput {
        found,
        commands: decoded
            .commands
            .iter()
            .map(|c| Resolved {
                app: c.app.clone(),
                rect: c.resolve(&screen),
            })
            .collect(),
        dropped_symbols: decoded.dropped_symbols.clone(),
    };
    ctx.emit(&output, || {
        if !output.found {
            return "no grid block found".to_string();
        }
        let mut out = String::new();
        for c in &output.commands {
            let _ignored = writeln!(out, "move {:<20} -> {}", c.app, format_rect(&c.rect));
        }
        if !output.dropped_symbols.is_empty() {
            let dropped: String = output.dropped_symbols.iter().collect();
            let _ignored = writeln!(out, "dropped symbols: {dropped}");
        }
        out
    })
}
