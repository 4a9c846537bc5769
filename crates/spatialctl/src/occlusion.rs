//! `occlusion`: overlaps and clickable-area violations.

use std::fmt::Write as _;

use spatial::{OcclusionCalculator, OcclusionMode};

use crate::{backend::load_windows, cli::OcclusionArgs, error::Result, report::Context};

/// Run the occlusion command.
pub fn run(args: &OcclusionArgs, ctx: &Context) -> Result<()> {
    let windows = load_windows(&args.snapshot.windows)?;
    let settings = &ctx.config.occlusion;
    let mode = args.mode.map_or(settings.mode, OcclusionMode::from);
    let calc = OcclusionCalculator::new(mode).with_min_visible_area(settings.min_visible_area);
    let report = calc.validate_constraints(&windows);
    ctx.emit(&report, || {
        let mut out = report.summary();
        for v in &report.violations {
            let _ignored = writeln!(
                out,
                "window {} ({}) needs {:.0}px² more to stay clickable",
                v.id, v.app, v.deficit
            );
        }
        if report.is_valid() {
            out.push_str("all windows clickable\n");
        }
        out
    })
}
