//! End-to-end planning: snapshot, score, arrange, validate, apply.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::{
    Error, Result,
    arrange::{Arrangement, Strategy},
    config::SpatialConfig,
    constraints::{ConstraintCache, ConstraintDiscovery, Settle},
    feasibility::{FeasibilityReport, FeasibilityValidator, Layout, Slot},
    geom::Rect,
    importance::FocusHistory,
    occlusion::ConstraintReport,
    ops::WindowService,
    window::{WindowId, WindowState},
};

/// Proposed arrangement for one display with its validation results.
#[derive(Clone, Debug, Serialize)]
pub struct Plan {
    /// Display index.
    pub display: usize,
    /// Display bounds.
    pub screen: Rect,
    /// Resolved strategy.
    pub strategy: Strategy,
    /// Target placements, most important first.
    pub arrangements: Vec<Arrangement>,
    /// Slot sizes against known minimums.
    pub feasibility: FeasibilityReport,
    /// Clickable-area check over the target frames.
    pub visibility: ConstraintReport,
}

/// Outcome of [`Plan::apply`].
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ApplyReport {
    /// Windows moved successfully.
    pub applied: usize,
    /// Windows that could not be moved, with the reason.
    pub failed: Vec<(WindowId, String)>,
}

impl Plan {
    /// True when every slot fits and every window stays clickable.
    pub fn is_acceptable(&self) -> bool {
        self.feasibility.is_feasible && self.visibility.is_valid()
    }

    /// Request every target frame. Failures are counted, not fatal.
    pub fn apply(&self, service: &dyn WindowService) -> ApplyReport {
        let mut report = ApplyReport::default();
        for a in &self.arrangements {
            match service.set_window_bounds(a.window.id, a.bounds) {
                Ok(()) => report.applied += 1,
                Err(err) => {
                    warn!(id = %a.window.id, app = %a.window.app, error = %err, "apply failed");
                    report.failed.push((a.window.id, err.to_string()));
                }
            }
        }
        info!(
            display_index = self.display,
            applied = report.applied,
            failed = report.failed.len(),
            "plan applied"
        );
        report
    }
}

/// Builds plans from live window snapshots.
pub struct LayoutPlanner {
    /// Window access.
    service: Arc<dyn WindowService>,
    /// Minimum-size discovery, sharing its cache across plans.
    discovery: ConstraintDiscovery,
    /// Engine configuration.
    config: SpatialConfig,
    /// Optional focus history for recency scoring.
    history: Option<FocusHistory>,
}

impl LayoutPlanner {
    /// Planner with a fresh constraint cache seeded from `config`.
    pub fn new(service: Arc<dyn WindowService>, config: SpatialConfig) -> Self {
        let cache = Arc::new(config.constraint_cache());
        Self::with_cache(service, config, cache)
    }

    /// Planner sharing an existing constraint cache.
    pub fn with_cache(
        service: Arc<dyn WindowService>,
        config: SpatialConfig,
        cache: Arc<ConstraintCache>,
    ) -> Self {
        let discovery = ConstraintDiscovery::new(service.clone(), cache).with_policy(config.discovery);
        Self {
            service,
            discovery,
            config,
            history: None,
        }
    }

    /// Replace the discovery settle strategy.
    #[must_use]
    pub fn with_settle(mut self, settle: Arc<dyn Settle>) -> Self {
        self.discovery = self.discovery.with_settle(settle);
        self
    }

    /// Use focus history for recency.
    #[must_use]
    pub fn with_history(mut self, history: FocusHistory) -> Self {
        self.history = Some(history);
        self
    }

    /// Discovery used for feasibility checks.
    pub fn discovery(&self) -> &ConstraintDiscovery {
        &self.discovery
    }

    /// Plan an arrangement of the visible windows on `display`.
    pub fn plan(&self, display: usize) -> Result<Plan> {
        let screen = self
            .service
            .display_bounds(display)
            .ok_or_else(|| Error::InvalidInput(format!("no display {display}")))?;
        let windows: Vec<WindowState> = self
            .service
            .list_windows()
            .into_iter()
            .filter(|w| w.display == display && !w.minimized)
            .collect();
        let display_index = display;
        debug!(display_index, windows = windows.len(), "planning");

        let mut scorer = self.config.scorer(screen.size());
        if let Some(history) = &self.history {
            scorer = scorer.with_history(history.clone());
        }
        let ranked = scorer.rank(&windows);

        let mut generator = self.config.generator();
        for w in &windows {
            if let Some(c) = self.discovery.get_constraints(&w.app) {
                generator.set_min_size(&w.app, c.min_size());
            }
        }
        let strategy = generator.choose_strategy(ranked.len(), screen.size());
        let arrangements = generator.generate(&ranked, screen);

        let validator =
            FeasibilityValidator::new(&self.discovery).with_occlusion(self.config.occlusion());
        let layout = layout_of(&arrangements, screen);
        let placed: Vec<WindowState> = arrangements.iter().map(|a| a.window.clone()).collect();
        let feasibility = validator.validate_layout_feasibility(&layout, &placed, screen.size());
        let visibility = validator.check_visibility(&arrangements, &windows);

        let plan = Plan {
            display,
            screen,
            strategy,
            arrangements,
            feasibility,
            visibility,
        };
        if !plan.is_acceptable() {
            info!(
                display_index,
                size_violations = plan.feasibility.violations.len(),
                visibility_violations = plan.visibility.violations.len(),
                "plan has violations"
            );
        }
        Ok(plan)
    }
}

/// Slot layout matching arranged frames on `screen`.
fn layout_of(arrangements: &[Arrangement], screen: Rect) -> Layout {
    let fraction = |v: f64, total: f64| if total > 0.0 { v / total } else { 0.0 };
    Layout::new(
        arrangements
            .iter()
            .map(|a| {
                Slot::new(
                    fraction(a.bounds.w, screen.w),
                    fraction(a.bounds.h, screen.h),
                    a.role.label(),
                )
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{constraints::NoSettle, geom::Size, ops::MockWindowService};

    fn service() -> Arc<MockWindowService> {
        let svc = Arc::new(MockWindowService::new());
        svc.set_windows(vec![
            WindowState::new("Xcode", 1, Rect::new(0.0, 0.0, 1200.0, 900.0)),
            WindowState::new("Safari", 2, Rect::new(100.0, 100.0, 1000.0, 700.0)),
            WindowState::new("Slack", 3, Rect::new(200.0, 200.0, 800.0, 600.0)),
            WindowState::new("Mail", 4, Rect::new(0.0, 0.0, 800.0, 600.0)).with_minimized(true),
            WindowState::new("Notes", 5, Rect::new(0.0, 0.0, 800.0, 600.0)).with_display(1),
        ]);
        svc
    }

    #[test]
    fn plans_visible_windows_on_one_display() {
        let svc = service();
        let planner =
            LayoutPlanner::new(svc.clone(), SpatialConfig::default()).with_settle(Arc::new(NoSettle));
        let plan = planner.plan(0).unwrap();
        assert_eq!(plan.strategy, Strategy::Cascade);
        assert_eq!(plan.arrangements.len(), 3);
        assert!(plan.arrangements.iter().all(|a| a.window.display == 0));
        assert_eq!(plan.arrangements[0].window.app, "Xcode");
        assert!(plan.visibility.is_valid(), "{}", plan.visibility.summary());
        assert!(plan.is_acceptable());
    }

    #[test]
    fn unknown_display_is_an_error() {
        let planner = LayoutPlanner::new(service(), SpatialConfig::default());
        assert!(matches!(planner.plan(3), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn seeded_minimum_flags_small_slot() {
        let svc = service();
        svc.set_read_only(true);
        let mut config = SpatialConfig::default();
        config.arrange.strategy = Strategy::Tiled;
        config.known_minimums.insert("Slack".into(), Size::new(1500.0, 200.0));
        let plan = LayoutPlanner::new(svc, config).plan(0).unwrap();
        assert!(!plan.feasibility.is_feasible);
        assert_eq!(plan.feasibility.violations[0].app, "Slack");
        assert!(!plan.is_acceptable());
    }

    #[test]
    fn apply_counts_failures() {
        let svc = service();
        svc.set_read_only(true);
        let mut config = SpatialConfig::default();
        config.arrange.strategy = Strategy::Tiled;
        let plan = LayoutPlanner::new(svc.clone(), config).plan(0).unwrap();
        let report = plan.apply(svc.as_ref());
        assert_eq!(report.applied, 0);
        assert_eq!(report.failed.len(), 3);

        svc.set_read_only(false);
        let report = plan.apply(svc.as_ref());
        assert_eq!(report.applied, 3);
        assert_eq!(svc.window_frame(WindowId(1)), Some(plan.arrangements[0].bounds));
    }
}
