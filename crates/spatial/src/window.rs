//! Window snapshots and explicit paint order.

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    ops::Deref,
};

use serde::{Deserialize, Deserializer, Serialize};

use crate::geom::Rect;

/// Identifier for a live window as reported by the window service.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WindowId(pub u32);

impl Display for WindowId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.0)
    }
}

/// Immutable snapshot of one window for a single reasoning pass.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WindowState {
    /// Application name, e.g. `"Safari"`.
    pub app: String,
    /// Window identifier.
    pub id: WindowId,
    /// Frame in screen pixels.
    #[serde(deserialize_with = "non_negative_frame")]
    pub frame: Rect,
    /// Stacking layer; higher values are further in front.
    #[serde(default)]
    pub layer: i32,
    /// Index of the display the window is on.
    #[serde(default)]
    pub display: usize,
    /// Whether the window is minimized.
    #[serde(default)]
    pub minimized: bool,
}

/// Clamp negative width and height to zero.
fn clamp_extents(frame: Rect) -> Rect {
    Rect::new(frame.x, frame.y, frame.w.max(0.0), frame.h.max(0.0))
}

/// Deserialize a frame with [`clamp_extents`] applied.
fn non_negative_frame<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Rect, D::Error> {
    Rect::deserialize(deserializer).map(clamp_extents)
}

impl WindowState {
    /// Construct a visible window on display 0 at layer 0.
    ///
    /// Negative extents are clamped to zero.
    pub fn new(app: impl Into<String>, id: u32, frame: Rect) -> Self {
        Self {
            app: app.into(),
            id: WindowId(id),
            frame: clamp_extents(frame),
            layer: 0,
            display: 0,
            minimized: false,
        }
    }

    /// Set the stacking layer.
    #[must_use]
    pub fn with_layer(mut self, layer: i32) -> Self {
        self.layer = layer;
        self
    }

    /// Set the display index.
    #[must_use]
    pub fn with_display(mut self, display: usize) -> Self {
        self.display = display;
        self
    }

    /// Set the minimized flag.
    #[must_use]
    pub fn with_minimized(mut self, minimized: bool) -> Self {
        self.minimized = minimized;
        self
    }

    /// Total frame area in square pixels.
    #[must_use]
    pub fn area(&self) -> f64 {
        self.frame.area()
    }

    /// True when this window belongs to `app` (case-insensitive).
    #[must_use]
    pub fn is_app(&self, app: &str) -> bool {
        self.app.eq_ignore_ascii_case(app)
    }
}

/// Windows ordered back to front.
///
/// The grid encoder paints in this order, so later entries overwrite earlier
/// ones. Construct with [`PaintOrder::by_layer`] to derive the order from
/// z-layers, or [`PaintOrder::as_given`] when the caller already holds an
/// authoritative back-to-front list.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PaintOrder(Vec<WindowState>);

impl PaintOrder {
    /// Stable sort by ascending layer; ties keep their input order.
    pub fn by_layer(mut windows: Vec<WindowState>) -> Self {
        windows.sort_by_key(|w| w.layer);
        Self(windows)
    }

    /// Trust the caller's ordering verbatim.
    pub fn as_given(windows: Vec<WindowState>) -> Self {
        Self(windows)
    }
}

impl Deref for PaintOrder {
    type Target = [WindowState];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
