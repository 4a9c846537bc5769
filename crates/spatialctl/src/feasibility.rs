//! `feasibility`: check a layout preset against known minimum sizes.

use std::{fmt::Write as _, sync::Arc};

use spatial::{
    ConstraintDiscovery, FeasibilityValidator, Layout, WindowState, constraints::NoSettle,
};

use crate::{
    backend::{SnapshotService, load_windows},
    cli::FeasibilityArgs,
    error::{Error, Result},
    report::Context,
};

/// Run the feasibility command.
pub fn run(args: &FeasibilityArgs, ctx: &Context) -> Result<()> {
    let layout = Layout::preset(&args.layout)
        .ok_or_else(|| Error::usage(format!("unknown layout preset '{}'", args.layout)))?;
    let windows: Vec<WindowState> = load_windows(&args.snapshot.windows)?
        .into_iter()
        .filter(|w| !w.minimized)
        .collect();
    let service = Arc::new(SnapshotService::new(windows.clone(), args.screen));
    let cache = Arc::new(ctx.config.constraint_cache());
    let discovery = ConstraintDiscovery::new(service, cache)
        .with_policy(ctx.config.discovery)
        .with_settle(Arc::new(NoSettle));
    let report = FeasibilityValidator::new(&discovery).validate_layout_feasibility(
        &layout,
        &windows,
        args.screen,
    );
    ctx.emit(&report, || {
        let mut out = String::new();
        let _ignored = writeln!(
            out,
            "layout {}: {}",
            args.layout,
            if report.is_feasible { "feasible" } else { "infeasible" }
        );
        for v in &report.violations {
            let _ignored = writeln!(
                out,
                "  slot {} ({}) {}: {:?} below minimum {:.0}x{:.0} (slot {:.0}x{:.0})",
                v.slot,
                v.role,
                v.app,
                v.kind,
                v.required.width,
                v.required.height,
                v.target.width,
                v.target.height
            );
        }
        for app in &report.feasible_apps {
            let _ignored = writeln!(out, "  ok {app}");
        }
        out
    })
}
