//! Minimum-size discovery and caching.

mod cache;
mod discovery;
mod policy;

use std::time::SystemTime;

use serde::{Deserialize, Serialize};

pub use cache::{Clock, ConstraintCache, ManualClock, SystemClock};
pub use discovery::ConstraintDiscovery;
pub use policy::{DiscoveryPolicy, NoSettle, Settle, ThreadSettle};

use crate::geom::Size;

/// Smallest size an app's windows accept.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DiscoveredConstraint {
    /// Lowercase app name.
    pub app: String,
    /// Minimum width in pixels.
    pub min_width: f64,
    /// Minimum height in pixels.
    pub min_height: f64,
    /// When the constraint was measured.
    pub discovered_at: SystemTime,
}

impl DiscoveredConstraint {
    /// Minimum as a size.
    pub fn min_size(&self) -> Size {
        Size::new(self.min_width, self.min_height)
    }
}

/// A discovery run and whether it finished.
#[derive(Clone, Debug, PartialEq)]
pub struct DiscoveryOutcome {
    /// Best bounds found.
    pub constraint: DiscoveredConstraint,
    /// False when the window vanished or rejected a resize before both
    /// searches finished.
    pub complete: bool,
    /// Resize requests issued, excluding the final restore.
    pub probes: u32,
}
