//! Layout feasibility against discovered minimum sizes and the
//! clickable-area constraint.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    arrange::Arrangement,
    constraints::ConstraintDiscovery,
    geom::Size,
    occlusion::{ConstraintReport, OcclusionCalculator},
    window::WindowState,
};

/// Slack for float noise when slot sizes are derived from pixel frames.
const SIZE_EPS: f64 = 1e-6;

/// One position in a layout, sized relative to the screen.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Slot {
    /// Fraction of screen width in `0..=1`.
    pub width_fraction: f64,
    /// Fraction of screen height in `0..=1`.
    pub height_fraction: f64,
    /// Free-form role label, e.g. `"main"`.
    pub role: String,
}

impl Slot {
    /// Construct a slot.
    pub fn new(width_fraction: f64, height_fraction: f64, role: impl Into<String>) -> Self {
        Self {
            width_fraction,
            height_fraction,
            role: role.into(),
        }
    }

    /// Pixel size of the slot on `screen`.
    pub fn target(&self, screen: Size) -> Size {
        Size::new(
            screen.width * self.width_fraction,
            screen.height * self.height_fraction,
        )
    }
}

/// Ordered slots; window `i` fills slot `i`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    /// Slots in window order.
    pub slots: Vec<Slot>,
}

impl Layout {
    /// Layout from explicit slots.
    pub fn new(slots: Vec<Slot>) -> Self {
        Self { slots }
    }

    /// One full-screen slot.
    pub fn full() -> Self {
        Self::new(vec![Slot::new(1.0, 1.0, "full")])
    }

    /// Left and right halves.
    pub fn halves() -> Self {
        Self::new(vec![Slot::new(0.5, 1.0, "left"), Slot::new(0.5, 1.0, "right")])
    }

    /// Three vertical thirds.
    pub fn thirds() -> Self {
        let third = 1.0 / 3.0;
        Self::new(vec![
            Slot::new(third, 1.0, "left"),
            Slot::new(third, 1.0, "center"),
            Slot::new(third, 1.0, "right"),
        ])
    }

    /// A 70% main area with a 30% sidebar.
    pub fn main_sidebar() -> Self {
        Self::new(vec![Slot::new(0.7, 1.0, "main"), Slot::new(0.3, 1.0, "sidebar")])
    }

    /// Four quarters.
    pub fn quadrants() -> Self {
        Self::new(vec![
            Slot::new(0.5, 0.5, "top_left"),
            Slot::new(0.5, 0.5, "top_right"),
            Slot::new(0.5, 0.5, "bottom_left"),
            Slot::new(0.5, 0.5, "bottom_right"),
        ])
    }

    /// Preset by name: `full`, `halves`, `thirds`, `main_sidebar`,
    /// `quadrants`.
    pub fn preset(name: &str) -> Option<Self> {
        match name.to_lowercase().replace('-', "_").as_str() {
            "full" => Some(Self::full()),
            "halves" => Some(Self::halves()),
            "thirds" => Some(Self::thirds()),
            "main_sidebar" => Some(Self::main_sidebar()),
            "quadrants" => Some(Self::quadrants()),
            _ => None,
        }
    }
}

/// Which dimension of a slot is too small.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    /// Only the width.
    Width,
    /// Only the height.
    Height,
    /// Both dimensions.
    Both,
}

/// A slot smaller than its app's minimum size.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SizeViolation {
    /// Application in the slot.
    pub app: String,
    /// Slot index.
    pub slot: usize,
    /// Slot role label.
    pub role: String,
    /// Discovered minimum.
    pub required: Size,
    /// Slot size on screen.
    pub target: Size,
    /// Failing dimension(s).
    pub kind: ViolationKind,
}

/// Result of [`FeasibilityValidator::validate_layout_feasibility`].
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct FeasibilityReport {
    /// True when there are no violations.
    pub is_feasible: bool,
    /// Undersized slots.
    pub violations: Vec<SizeViolation>,
    /// Apps whose slot fits, including apps with no known constraint.
    pub feasible_apps: Vec<String>,
}

/// Checks proposed layouts before they are applied.
pub struct FeasibilityValidator<'a> {
    /// Source of minimum sizes.
    discovery: &'a ConstraintDiscovery,
    /// Visibility checker for arrangements.
    occlusion: OcclusionCalculator,
}

impl<'a> FeasibilityValidator<'a> {
    /// Validator backed by `discovery` with the default occlusion settings.
    pub fn new(discovery: &'a ConstraintDiscovery) -> Self {
        Self {
            discovery,
            occlusion: OcclusionCalculator::default(),
        }
    }

    /// Replace the occlusion calculator used by [`Self::check_visibility`].
    #[must_use]
    pub fn with_occlusion(mut self, occlusion: OcclusionCalculator) -> Self {
        self.occlusion = occlusion;
        self
    }

    /// Compare each slot's pixel size with the minimum of the window placed
    /// in it. Extra slots are ignored, as are windows beyond the last slot.
    /// Apps with no obtainable constraint are assumed to fit.
    pub fn validate_layout_feasibility(
        &self,
        layout: &Layout,
        windows: &[WindowState],
        screen: Size,
    ) -> FeasibilityReport {
        let mut violations = Vec::new();
        let mut feasible_apps = Vec::new();
        for (index, (slot, window)) in layout.slots.iter().zip(windows).enumerate() {
            let target = slot.target(screen);
            let Some(constraint) = self.discovery.get_constraints(&window.app) else {
                debug!(app = %window.app, "feasibility: no constraint; assuming it fits");
                feasible_apps.push(window.app.clone());
                continue;
            };
            let narrow = target.width + SIZE_EPS < constraint.min_width;
            let short = target.height + SIZE_EPS < constraint.min_height;
            let kind = match (narrow, short) {
                (true, true) => ViolationKind::Both,
                (true, false) => ViolationKind::Width,
                (false, true) => ViolationKind::Height,
                (false, false) => {
                    feasible_apps.push(window.app.clone());
                    continue;
                }
            };
            debug!(
                app = %window.app,
                slot = index,
                ?kind,
                target_w = target.width,
                target_h = target.height,
                "feasibility: slot below minimum"
            );
            violations.push(SizeViolation {
                app: window.app.clone(),
                slot: index,
                role: slot.role.clone(),
                required: constraint.min_size(),
                target,
                kind,
            });
        }
        FeasibilityReport {
            is_feasible: violations.is_empty(),
            violations,
            feasible_apps,
        }
    }

    /// Run the clickable-area check over proposed arrangements. Windows in
    /// `others` that are not arranged keep their frames and sit behind every
    /// arranged window.
    pub fn check_visibility(
        &self,
        arrangements: &[Arrangement],
        others: &[WindowState],
    ) -> ConstraintReport {
        let front = arrangements.len() as i32;
        let mut windows: Vec<WindowState> = arrangements
            .iter()
            .map(|a| {
                let mut w = a.window.clone();
                w.frame = a.bounds;
                w.layer = front - a.layer as i32;
                w
            })
            .collect();
        windows.extend(
            others
                .iter()
                .filter(|o| !arrangements.iter().any(|a| a.window.id == o.id))
                .map(|o| o.clone().with_layer(0)),
        );
        self.occlusion.validate_constraints(&windows)
    }
}
