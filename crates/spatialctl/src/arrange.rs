//! `arrange`: plan an arrangement for one display.

use std::{fmt::Write as _, sync::Arc};

use spatial::{LayoutPlanner, constraints::NoSettle, importance::FocusHistory};
use tracing::info;

use crate::{
    backend::{SnapshotService, load_windows},
    cli::ArrangeArgs,
    error::Result,
    report::{Context, format_rect},
};

/// Run the arrange command.
pub fn run(args: &ArrangeArgs, ctx: &Context) -> Result<()> {
    let windows = load_windows(&args.snapshot.windows)?;
    let service = Arc::new(SnapshotService::new(windows, args.screen));
    let mut config = ctx.config.clone();
    if let Some(strategy) = args.strategy {
        config.arrange.strategy = strategy.into();
    }
    let mut planner = LayoutPlanner::new(service, config).with_settle(Arc::new(NoSettle));
    if !args.recent.is_empty() {
        planner = planner.with_history(FocusHistory::from_recent(&args.recent));
    }
    let plan = planner.plan(args.display)?;
    info!(
        strategy = ?plan.strategy,
        windows = plan.arrangements.len(),
        acceptable = plan.is_acceptable(),
        "Plan ready"
    );
    ctx.emit(&plan, || {
        let mut out = String::new();
        let _ignored = writeln!(
            out,
            "display {} ({}) strategy {:?}",
            plan.display,
            format_rect(&plan.screen),
            plan.strategy
        );
        for a in &plan.arrangements {
            let _ignored = writeln!(
                out,
                "{:>2} {:<9} {:<17} {:<20} {}",
                a.layer,
                a.role.label(),
                format!("{:?}", a.visibility),
                a.window.app,
                format_rect(&a.bounds)
            );
        }
        for v in &plan.feasibility.violations {
            let _ignored = writeln!(
                out,
                "size: {} in slot {} is too small ({:?}): needs {:.0}x{:.0}, gets {:.0}x{:.0}",
                v.app,
                v.slot,
                v.kind,
                v.required.width,
                v.required.height,
                v.target.width,
                v.target.height
            );
        }
        for v in &plan.visibility.violations {
            let _ignored = writeln!(
                out,
                "visibility: {} exposes {:.0}px² of {:.0}px²",
                v.app, v.actual, v.required
            );
        }
        out
    })
}
