//! Probe policy and settle delays for minimum-size discovery.

use std::{thread, time::Duration};

use serde::{Deserialize, Serialize};

/// Bounds on the binary search that probes an app's minimum size.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoveryPolicy {
    /// Hard cap on probes per dimension.
    pub max_iterations: u32,
    /// Delay between a resize request and reading the frame back.
    pub settle_ms: u64,
    /// A resize counts as honoured when the read-back extent is within this
    /// many pixels of the request.
    pub tolerance: f64,
    /// Lower bound of the search in pixels.
    pub floor: f64,
    /// Cache lifetime of a discovered constraint.
    pub ttl_secs: u64,
}

impl Default for DiscoveryPolicy {
    fn default() -> Self {
        Self {
            max_iterations: 8,
            settle_ms: 50,
            tolerance: 10.0,
            floor: 100.0,
            ttl_secs: 24 * 60 * 60,
        }
    }
}

impl DiscoveryPolicy {
    /// Settle delay as a `Duration`.
    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }

    /// Cache lifetime as a `Duration`.
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

/// Waits for the OS to apply a resize before it is read back.
pub trait Settle: Send + Sync {
    /// Block for roughly `delay`.
    fn settle(&self, delay: Duration);
}

/// Sleeps the calling thread.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadSettle;

impl Settle for ThreadSettle {
    fn settle(&self, delay: Duration) {
        if !delay.is_zero() {
            thread::sleep(delay);
        }
    }
}

/// Returns immediately; for simulated window services.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoSettle;

impl Settle for NoSettle {
    fn settle(&self, _delay: Duration) {}
}
