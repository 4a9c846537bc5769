//! Pairwise overlap and z-order visible-area calculation.
//!
//! Every non-minimized window must keep at least [`MIN_VISIBLE_AREA`] square
//! pixels unobstructed by windows on strictly higher layers.

use std::{collections::HashMap, fmt::Write as _};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    geom::{Rect, union_area},
    window::{WindowId, WindowState},
};

/// Clickable-area threshold in square pixels (a 40×40 region).
pub const MIN_VISIBLE_AREA: f64 = 1600.0;

/// How occluded regions from several higher windows are combined.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OcclusionMode {
    /// Subtract each higher overlap's full area in turn. Regions covered by
    /// two higher windows are subtracted twice, so visible area can be
    /// under-counted.
    #[default]
    Sequential,
    /// Subtract the exact union of higher overlaps.
    Union,
}

/// Intersection between two windows on the same display.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Overlap {
    /// Lower of the two window ids.
    pub a: WindowId,
    /// Higher of the two window ids.
    pub b: WindowId,
    /// Shared rectangle.
    pub rect: Rect,
    /// `rect.w * rect.h`.
    pub area: f64,
}

impl Overlap {
    /// Overlap between `first` and `second`, if any. Argument order does not
    /// affect the result.
    pub fn between(first: &WindowState, second: &WindowState) -> Option<Self> {
        if first.display != second.display || first.id == second.id {
            return None;
        }
        let rect = first.frame.intersection(&second.frame)?;
        let (a, b) = if first.id <= second.id {
            (first.id, second.id)
        } else {
            (second.id, first.id)
        };
        Some(Self {
            a,
            b,
            rect,
            area: rect.area(),
        })
    }

    /// The id paired with `id` in this overlap.
    pub fn other(&self, id: WindowId) -> WindowId {
        if self.a == id { self.b } else { self.a }
    }
}

/// Visible-area outcome for one window.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct VisibilityResult {
    /// Window identifier.
    pub id: WindowId,
    /// Application name.
    pub app: String,
    /// Full frame area.
    pub total_area: f64,
    /// Area left after subtracting higher-layer occlusion.
    pub visible_area: f64,
    /// Whether the clickable-area constraint holds.
    pub meets_minimum: bool,
}

/// A window whose visible area fell below the threshold.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct VisibilityViolation {
    /// Window identifier.
    pub id: WindowId,
    /// Application name.
    pub app: String,
    /// Required visible area.
    pub required: f64,
    /// Measured visible area.
    pub actual: f64,
    /// `required - actual`.
    pub deficit: f64,
}

/// Result of [`OcclusionCalculator::validate_constraints`].
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ConstraintReport {
    /// Per-window outcomes, in input order.
    pub validated: Vec<VisibilityResult>,
    /// Windows that fail the clickable-area constraint.
    pub violations: Vec<VisibilityViolation>,
    /// Overlaps keyed by window.
    pub overlaps: HashMap<WindowId, Vec<Overlap>>,
}

impl ConstraintReport {
    /// True when no window violates the constraint.
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    /// Human-readable table for debugging.
    pub fn summary(&self) -> String {
        let mut out = String::new();
        for v in &self.validated {
            let pct = if v.total_area > 0.0 {
                v.visible_area / v.total_area * 100.0
            } else {
                0.0
            };
            let overlaps = self.overlaps.get(&v.id).map_or(0, Vec::len);
            let _ignored = writeln!(
                out,
                "{:>6} {:<20} visible={:>9.0}px² ({:>5.1}%) overlaps={} {}",
                v.id,
                v.app,
                v.visible_area,
                pct,
                overlaps,
                if v.meets_minimum { "ok" } else { "VIOLATION" }
            );
        }
        out
    }
}

/// Computes overlaps and visible areas over a window snapshot.
#[derive(Clone, Copy, Debug)]
pub struct OcclusionCalculator {
    /// Region-combination mode.
    mode: OcclusionMode,
    /// Clickable-area threshold.
    min_visible_area: f64,
}

impl Default for OcclusionCalculator {
    fn default() -> Self {
        Self::new(OcclusionMode::default())
    }
}

impl OcclusionCalculator {
    /// Calculator with the default threshold.
    pub fn new(mode: OcclusionMode) -> Self {
        Self {
            mode,
            min_visible_area: MIN_VISIBLE_AREA,
        }
    }

    /// Override the clickable-area threshold.
    #[must_use]
    pub fn with_min_visible_area(mut self, area: f64) -> Self {
        self.min_visible_area = area;
        self
    }

    /// Active combination mode.
    pub fn mode(&self) -> OcclusionMode {
        self.mode
    }

    /// Every same-display overlap, recorded under both windows.
    pub fn calculate_overlaps(&self, windows: &[WindowState]) -> HashMap<WindowId, Vec<Overlap>> {
        let mut out: HashMap<WindowId, Vec<Overlap>> = HashMap::new();
        for (i, first) in windows.iter().enumerate() {
            for second in &windows[i + 1..] {
                if let Some(ov) = Overlap::between(first, second) {
                    out.entry(first.id).or_default().push(ov);
                    out.entry(second.id).or_default().push(ov);
                }
            }
        }
        out
    }

    /// Area of `window` left after removing regions covered by windows on
    /// strictly higher layers. Never negative.
    pub fn visible_area(
        &self,
        window: &WindowState,
        overlaps: &[Overlap],
        all: &[WindowState],
    ) -> f64 {
        let layers: HashMap<WindowId, i32> = all.iter().map(|w| (w.id, w.layer)).collect();
        let occluders = overlaps.iter().filter(|ov| {
            layers
                .get(&ov.other(window.id))
                .is_some_and(|&layer| layer > window.layer)
        });
        let total = window.area();
        let hidden = match self.mode {
            OcclusionMode::Sequential => occluders.map(|ov| ov.area).sum::<f64>(),
            OcclusionMode::Union => {
                let rects: Vec<Rect> = occluders.map(|ov| ov.rect).collect();
                union_area(&rects)
            }
        };
        (total - hidden).max(0.0)
    }

    /// Check the clickable-area constraint for every window.
    pub fn validate_constraints(&self, windows: &[WindowState]) -> ConstraintReport {
        let overlaps = self.calculate_overlaps(windows);
        let mut validated = Vec::with_capacity(windows.len());
        let mut violations = Vec::new();
        for w in windows {
            let total_area = w.area();
            if w.minimized {
                validated.push(VisibilityResult {
                    id: w.id,
                    app: w.app.clone(),
                    total_area,
                    visible_area: total_area,
                    meets_minimum: true,
                });
                continue;
            }
            let own = overlaps.get(&w.id).map_or(&[][..], Vec::as_slice);
            let visible_area = self.visible_area(w, own, windows);
            let meets_minimum = visible_area >= self.min_visible_area;
            if !meets_minimum {
                debug!(
                    id = %w.id,
                    app = %w.app,
                    visible_area,
                    "occlusion: below clickable threshold"
                );
                violations.push(VisibilityViolation {
                    id: w.id,
                    app: w.app.clone(),
                    required: self.min_visible_area,
                    actual: visible_area,
                    deficit: self.min_visible_area - visible_area,
                });
            }
            validated.push(VisibilityResult {
                id: w.id,
                app: w.app.clone(),
                total_area,
                visible_area,
                meets_minimum,
            });
        }
        ConstraintReport {
            validated,
            violations,
            overlaps,
        }
    }
}
