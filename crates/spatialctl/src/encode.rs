//! `encode`: render a snapshot as a symbolic grid.

use std::fmt::Write as _;

use spatial::PaintOrder;
use tracing::warn;

use crate::{backend::load_windows, cli::EncodeArgs, error::Result, report::Context};

/// Run the encode command.
pub fn run(args: &EncodeArgs, ctx: &Context) -> Result<()> {
    let windows = load_windows(&args.snapshot.windows)?;
    let order = if args.as_given {
        PaintOrder::as_given(windows)
    } else {
        PaintOrder::by_layer(windows)
    };
    let encoding = ctx.config.codec().encode(&order, args.screen);
    if !encoding.unmapped_apps.is_empty() {
        warn!(apps = ?encoding.unmapped_apps, "Apps without a grid symbol are painted as '?'");
    }
    ctx.emit(&encoding, || {
        let mut out = encoding.render();
        out.push_str("\n\nVALIDATION:\n");
        for v in &encoding.validation {
            let _ignored = writeln!(
                out,
                "{} {:<20} cells={:<4} {}{}",
                v.symbol,
                v.app,
                v.visible_cells,
                if v.meets_minimum { "ok" } else { "too small" },
                if v.overlapped { " (overlapped)" } else { "" }
            );
        }
        out
    })
}
