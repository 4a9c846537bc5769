//! spatial: spatial reasoning and layout constraints for window arrangement.
//!
//! Turns window snapshots into a compact symbolic grid a language model can
//! read (and parses such grids back into move commands), checks that every
//! window keeps a clickable region under a z-order, discovers per-app
//! minimum sizes by probing live windows, and generates importance-ordered
//! cascade or tiled arrangements.
//!
//! All geometry is pure over an immutable snapshot. The only shared mutable
//! state is the [`ConstraintCache`]; the only blocking operation is
//! [`ConstraintDiscovery`]. OS access goes through [`WindowService`].

pub mod arrange;
mod command;
pub mod config;
pub mod constraints;
mod error;
pub mod feasibility;
pub mod geom;
pub mod grid;
pub mod importance;
pub mod occlusion;
mod ops;
pub mod planner;
pub mod symbols;
mod window;

pub use arrange::{Arrangement, ArrangementGenerator, Role, Visibility};
pub use command::{Action, SymbolicPosition, SymbolicSize, Target, WindowCommand};
pub use config::SpatialConfig;
pub use constraints::{ConstraintCache, ConstraintDiscovery, DiscoveredConstraint};
pub use error::{Error, Result};
pub use feasibility::{FeasibilityReport, FeasibilityValidator, Layout};
pub use geom::{Point, Rect, Size};
pub use grid::{GridCodec, GridEncoding};
pub use importance::{ImportanceScorer, WindowImportance};
pub use occlusion::{OcclusionCalculator, OcclusionMode};
#[cfg(any(test, feature = "test-utils"))]
pub use ops::MockWindowService;
pub use ops::WindowService;
pub use planner::{LayoutPlanner, Plan};
pub use window::{PaintOrder, WindowId, WindowState};
