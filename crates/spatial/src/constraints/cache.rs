//! Time-bounded cache of discovered minimum sizes.
//!
//! Keys are lowercase app names. Each key owns its own slot lock so a
//! check-then-discover sequence for one app never runs twice concurrently,
//! while unrelated apps proceed in parallel.

use std::{
    collections::HashMap,
    sync::Arc,
    time::{Duration, SystemTime},
};

use parking_lot::Mutex;
use tracing::{debug, trace};

use super::{DiscoveredConstraint, DiscoveryOutcome};
use crate::geom::Size;

/// Source of the current time.
pub trait Clock: Send + Sync {
    /// Current wall-clock time.
    fn now(&self) -> SystemTime;
}

/// The real system clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> SystemTime {
        SystemTime::now()
    }
}

/// Manually driven clock for deterministic expiry.
#[derive(Debug)]
pub struct ManualClock {
    /// Current reading.
    now: Mutex<SystemTime>,
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new(SystemTime::UNIX_EPOCH)
    }
}

impl ManualClock {
    /// Clock frozen at `start`.
    pub fn new(start: SystemTime) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    /// Move the clock forward.
    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock();
        *now += by;
    }

    /// Jump to `at`.
    pub fn set(&self, at: SystemTime) {
        *self.now.lock() = at;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> SystemTime {
        *self.now.lock()
    }
}

/// Per-key cell.
type Slot = Arc<Mutex<Option<DiscoveredConstraint>>>;

/// Shared constraint cache with a time-to-live.
pub struct ConstraintCache {
    /// Slot per lowercase app name.
    slots: Mutex<HashMap<String, Slot>>,
    /// Lifetime of an entry.
    ttl: Duration,
    /// Time source.
    clock: Arc<dyn Clock>,
}

impl ConstraintCache {
    /// Cache using the system clock.
    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, Arc::new(SystemClock))
    }

    /// Cache using an explicit clock.
    pub fn with_clock(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            slots: Mutex::new(HashMap::new()),
            ttl,
            clock,
        }
    }

    /// Cache key for an app name.
    pub fn key(app: &str) -> String {
        app.to_lowercase()
    }

    /// Current time from the injected clock.
    pub fn now(&self) -> SystemTime {
        self.clock.now()
    }

    /// Configured lifetime.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Slot for `app`, created on demand.
    fn slot(&self, app: &str) -> Slot {
        self.slots
            .lock()
            .entry(Self::key(app))
            .or_default()
            .clone()
    }

    /// True when `entry` is younger than the TTL. Entries stamped in the
    /// future count as fresh.
    fn is_fresh(&self, entry: &DiscoveredConstraint) -> bool {
        self.now()
            .duration_since(entry.discovered_at)
            .map_or(true, |age| age < self.ttl)
    }

    /// Fresh entry in `cell`, evicting it if expired.
    fn fresh_in(&self, cell: &mut Option<DiscoveredConstraint>) -> Option<DiscoveredConstraint> {
        match cell {
            Some(entry) if self.is_fresh(entry) => Some(entry.clone()),
            Some(entry) => {
                debug!(app = %entry.app, "constraint cache: entry expired");
                *cell = None;
                None
            }
            None => None,
        }
    }

    /// Fresh entry for `app`, if any.
    pub fn get_fresh(&self, app: &str) -> Option<DiscoveredConstraint> {
        let slot = self.slot(app);
        let mut cell = slot.lock();
        self.fresh_in(&mut cell)
    }

    /// Return the fresh entry for `app`, or run `refresh` while holding the
    /// app's slot lock. Only complete outcomes are stored.
    pub fn get_or_refresh<F>(&self, app: &str, refresh: F) -> Option<DiscoveredConstraint>
    where
        F: FnOnce() -> Option<DiscoveryOutcome>,
    {
        let slot = self.slot(app);
        let mut cell = slot.lock();
        if let Some(hit) = self.fresh_in(&mut cell) {
            trace!(app, "constraint cache: hit");
            return Some(hit);
        }
        debug!(app, "constraint cache: miss");
        let outcome = refresh()?;
        if outcome.complete {
            *cell = Some(outcome.constraint.clone());
        } else {
            debug!(app, "constraint cache: discovery incomplete; not caching");
        }
        Some(outcome.constraint)
    }

    /// Replace the entry for `entry.app` wholesale.
    pub fn insert(&self, entry: DiscoveredConstraint) {
        let slot = self.slot(&entry.app);
        *slot.lock() = Some(entry);
    }

    /// Insert a known minimum stamped with the current time.
    pub fn seed(&self, app: &str, min: Size) {
        self.insert(DiscoveredConstraint {
            app: Self::key(app),
            min_width: min.width,
            min_height: min.height,
            discovered_at: self.now(),
        });
    }

    /// Drop the entry for `app`. Waits for an in-flight discovery of the
    /// same app; slots stay in the map so later callers share its lock.
    pub fn invalidate(&self, app: &str) {
        let slot = self.slots.lock().get(&Self::key(app)).cloned();
        if let Some(slot) = slot {
            *slot.lock() = None;
        }
    }

    /// Drop every entry, waiting for in-flight discoveries.
    pub fn clear(&self) {
        let slots: Vec<Slot> = self.slots.lock().values().cloned().collect();
        for slot in slots {
            *slot.lock() = None;
        }
    }

    /// Stored entries, fresh or not, sorted by app.
    pub fn entries(&self) -> Vec<DiscoveredConstraint> {
        let slots: Vec<Slot> = self.slots.lock().values().cloned().collect();
        let mut out: Vec<DiscoveredConstraint> =
            slots.iter().filter_map(|s| s.lock().clone()).collect();
        out.sort_by(|a, b| a.app.cmp(&b.app));
        out
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries().len()
    }

    /// True when nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
