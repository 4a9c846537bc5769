//! Binary-search probing of an app's minimum window size.

use std::sync::Arc;

use tracing::{debug, trace, warn};

use super::{
    DiscoveredConstraint, DiscoveryOutcome,
    cache::ConstraintCache,
    policy::{DiscoveryPolicy, Settle, ThreadSettle},
};
use crate::{
    Error, Result,
    geom::Rect,
    ops::WindowService,
    window::WindowId,
};

/// Dimension being probed.
#[derive(Clone, Copy, Debug)]
enum Axis {
    /// Horizontal extent.
    Width,
    /// Vertical extent.
    Height,
}

impl Axis {
    /// Extent of `rect` along this axis.
    fn extent(self, rect: &Rect) -> f64 {
        match self {
            Self::Width => rect.w,
            Self::Height => rect.h,
        }
    }

    /// `rect` with this axis replaced by `value`.
    fn with_extent(self, rect: &Rect, value: f64) -> Rect {
        match self {
            Self::Width => Rect::new(rect.x, rect.y, value, rect.h),
            Self::Height => Rect::new(rect.x, rect.y, rect.w, value),
        }
    }

    /// Name for logging.
    fn name(self) -> &'static str {
        match self {
            Self::Width => "width",
            Self::Height => "height",
        }
    }
}

/// Result of probing one axis.
#[derive(Clone, Copy, Debug)]
struct AxisResult {
    /// Smallest extent that was honoured.
    best: f64,
    /// False when the window vanished or rejected a resize.
    complete: bool,
    /// Resize requests issued.
    probes: u32,
}

/// Discovers minimum window sizes by resizing a live window and reading the
/// frame back. Results are cached per app.
pub struct ConstraintDiscovery {
    /// Window access.
    service: Arc<dyn WindowService>,
    /// Shared result cache.
    cache: Arc<ConstraintCache>,
    /// Search bounds.
    policy: DiscoveryPolicy,
    /// Delay strategy between resize and read-back.
    settle: Arc<dyn Settle>,
}

impl ConstraintDiscovery {
    /// Discovery with the default policy and a sleeping settle delay.
    pub fn new(service: Arc<dyn WindowService>, cache: Arc<ConstraintCache>) -> Self {
        Self {
            service,
            cache,
            policy: DiscoveryPolicy::default(),
            settle: Arc::new(ThreadSettle),
        }
    }

    /// Replace the probe policy.
    #[must_use]
    pub fn with_policy(mut self, policy: DiscoveryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Replace the settle strategy.
    #[must_use]
    pub fn with_settle(mut self, settle: Arc<dyn Settle>) -> Self {
        self.settle = settle;
        self
    }

    /// The shared cache.
    pub fn cache(&self) -> &Arc<ConstraintCache> {
        &self.cache
    }

    /// Active policy.
    pub fn policy(&self) -> &DiscoveryPolicy {
        &self.policy
    }

    /// Minimum size for `app`, from cache or by probing a live window.
    ///
    /// Returns `None` when the app has no live window or the service cannot
    /// resize. A search cut short by a vanished window or a rejected resize
    /// still returns its best bound, but that bound is not cached. A window
    /// that is still present is always restored to its original frame.
    pub fn get_constraints(&self, app: &str) -> Option<DiscoveredConstraint> {
        self.cache.get_or_refresh(app, || match self.discover(app) {
            Ok(outcome) => Some(outcome),
            Err(err) => {
                debug!(app, error = %err, "constraint discovery failed");
                None
            }
        })
    }

    /// Probe `app` now, bypassing the cache.
    pub fn discover(&self, app: &str) -> Result<DiscoveryOutcome> {
        let window = self
            .service
            .list_windows()
            .into_iter()
            .find(|w| w.is_app(app) && !w.minimized)
            .ok_or_else(|| Error::WindowNotFound {
                app: app.to_string(),
            })?;
        let original = window.frame;
        debug!(app, id = %window.id, w = original.w, h = original.h, "discovering constraints");

        let width = self.search(window.id, &original, Axis::Width);
        let width = match width {
            Ok(r) => r,
            Err(err) => {
                self.restore(window.id, original);
                return Err(err);
            }
        };
        let height = if width.complete {
            match self.search(window.id, &original, Axis::Height) {
                Ok(r) => r,
                Err(err) => {
                    self.restore(window.id, original);
                    return Err(err);
                }
            }
        } else {
            AxisResult {
                best: original.h,
                complete: false,
                probes: 0,
            }
        };

        let complete = width.complete && height.complete;
        if self.service.window_frame(window.id).is_some() {
            self.restore(window.id, original);
        }
        let outcome = DiscoveryOutcome {
            constraint: DiscoveredConstraint {
                app: ConstraintCache::key(app),
                min_width: width.best,
                min_height: height.best,
                discovered_at: self.cache.now(),
            },
            complete,
            probes: width.probes + height.probes,
        };
        debug!(
            app,
            min_width = outcome.constraint.min_width,
            min_height = outcome.constraint.min_height,
            complete,
            probes = outcome.probes,
            "constraint discovery finished"
        );
        Ok(outcome)
    }

    /// Put the window back where it was. Failures are logged and ignored.
    /// Callers skip this once the window is gone.
    fn restore(&self, id: WindowId, original: Rect) {
        if let Err(err) = self.service.set_window_bounds(id, original) {
            debug!(%id, error = %err, "restore after discovery failed");
        }
    }

    /// Binary search along one axis, holding the other at its original value.
    fn search(&self, id: WindowId, original: &Rect, axis: Axis) -> Result<AxisResult> {
        let current = axis.extent(original);
        let mut lo = self.policy.floor.min(current);
        let mut hi = current;
        let mut best = current;
        let mut probes = 0;

        for _ in 0..self.policy.max_iterations {
            if hi - lo <= 1.0 {
                break;
            }
            let mid = ((lo + hi) / 2.0).floor();
            probes += 1;
            match self
                .service
                .set_window_bounds(id, axis.with_extent(original, mid))
            {
                Ok(()) => {}
                Err(Error::Unsupported) => return Err(Error::Unsupported),
                Err(err) => {
                    warn!(%id, axis = axis.name(), error = %err, "probe rejected; stopping search");
                    return Ok(AxisResult {
                        best,
                        complete: false,
                        probes,
                    });
                }
            }
            self.settle.settle(self.policy.settle());
            let Some(frame) = self.service.window_frame(id) else {
                debug!(%id, axis = axis.name(), "window vanished during discovery");
                return Ok(AxisResult {
                    best,
                    complete: false,
                    probes,
                });
            };
            let actual = axis.extent(&frame);
            let honoured = (mid - actual).abs() <= self.policy.tolerance;
            trace!(axis = axis.name(), lo, hi, mid, actual, honoured, "probe");
            if honoured {
                hi = mid;
                best = mid;
            } else {
                lo = mid;
            }
        }
        if hi - lo > 1.0 {
            debug!(%id, axis = axis.name(), lo, hi, "probe budget exhausted");
        }
        Ok(AxisResult {
            best,
            complete: true,
            probes,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::{
        constraints::policy::NoSettle,
        geom::Size,
        ops::MockWindowService,
        window::WindowState,
    };

    fn setup(frame: Rect, min: Size) -> (Arc<MockWindowService>, ConstraintDiscovery) {
        let svc = Arc::new(MockWindowService::new());
        svc.set_windows(vec![WindowState::new("Slack", 7, frame)]);
        svc.set_min_size(WindowId(7), min);
        let cache = Arc::new(ConstraintCache::new(Duration::from_secs(60)));
        let discovery =
            ConstraintDiscovery::new(svc.clone(), cache).with_settle(Arc::new(NoSettle));
        (svc, discovery)
    }

    #[test]
    fn finds_minimum_within_tolerance_and_restores() {
        let frame = Rect::new(10.0, 20.0, 1200.0, 900.0);
        let (svc, discovery) = setup(frame, Size::new(400.0, 300.0));
        let outcome = discovery.discover("Slack").unwrap();
        assert!(outcome.complete);
        assert!((outcome.constraint.min_width - 400.0).abs() <= 10.0);
        assert!((outcome.constraint.min_height - 300.0).abs() <= 10.0);
        assert!(outcome.probes <= 16);
        assert_eq!(svc.window_frame(WindowId(7)), Some(frame));
    }

    #[test]
    fn width_search_holds_height() {
        let frame = Rect::new(0.0, 0.0, 800.0, 600.0);
        let (svc, discovery) = setup(frame, Size::new(300.0, 200.0));
        discovery.discover("slack").unwrap();
        let reqs = svc.requests();
        let width_probes: Vec<_> = reqs.iter().take_while(|(_, r)| r.h == 600.0).collect();
        assert!(!width_probes.is_empty());
        assert!(width_probes.iter().all(|(_, r)| r.w <= 800.0));
    }

    #[test]
    fn missing_app_yields_none() {
        let (_svc, discovery) = setup(Rect::new(0.0, 0.0, 500.0, 500.0), Size::default());
        assert!(matches!(
            discovery.discover("Figma"),
            Err(Error::WindowNotFound { .. })
        ));
        assert!(discovery.get_constraints("Figma").is_none());
    }

    #[test]
    fn read_only_service_yields_none() {
        let (svc, discovery) = setup(Rect::new(0.0, 0.0, 500.0, 500.0), Size::default());
        svc.set_read_only(true);
        assert!(discovery.get_constraints("Slack").is_none());
        assert!(discovery.cache().is_empty());
    }

    #[test]
    fn vanished_window_is_not_cached() {
        let (svc, discovery) = setup(Rect::new(0.0, 0.0, 1000.0, 800.0), Size::new(300.0, 300.0));
        svc.vanish_after(WindowId(7), 3);
        let got = discovery.get_constraints("Slack").unwrap();
        assert!(got.min_width <= 1000.0);
        assert_eq!(got.min_height, 800.0);
        assert!(discovery.cache().is_empty());
    }

    #[test]
    fn rejected_resize_still_restores_window() {
        let frame = Rect::new(30.0, 40.0, 1000.0, 800.0);
        let (svc, discovery) = setup(frame, Size::new(300.0, 300.0));
        svc.reject_request(WindowId(7), 3);
        let outcome = discovery.discover("Slack").unwrap();
        assert!(!outcome.complete);
        assert_eq!(outcome.probes, 3);
        assert_eq!(svc.window_frame(WindowId(7)), Some(frame));
        assert_eq!(svc.requests().last().map(|(_, r)| *r), Some(frame));
        assert!(discovery.cache().is_empty());
    }

    #[test]
    fn cached_result_skips_probing() {
        let (svc, discovery) = setup(Rect::new(0.0, 0.0, 1000.0, 800.0), Size::new(300.0, 300.0));
        discovery.get_constraints("Slack").unwrap();
        let after_first = svc.request_count(WindowId(7));
        discovery.get_constraints("SLACK").unwrap();
        assert_eq!(svc.request_count(WindowId(7)), after_first);
    }

    #[test]
    fn small_windows_stay_at_current_size() {
        let frame = Rect::new(0.0, 0.0, 80.0, 60.0);
        let (_svc, discovery) = setup(frame, Size::default());
        let outcome = discovery.discover("Slack").unwrap();
        assert_eq!(outcome.constraint.min_width, 80.0);
        assert_eq!(outcome.constraint.min_height, 60.0);
        assert_eq!(outcome.probes, 0);
    }
}
