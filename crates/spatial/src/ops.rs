//! Window service seam.
//!
//! The engine never talks to the OS directly; everything that reads or
//! mutates live windows goes through [`WindowService`].

use crate::{
    Result,
    geom::Rect,
    window::{WindowId, WindowState},
};

/// Trait abstraction over the OS window service to improve testability.
pub trait WindowService: Send + Sync {
    /// Snapshot of all windows.
    fn list_windows(&self) -> Vec<WindowState>;
    /// Request new bounds for a window. The OS may honour the request only
    /// partially; read the frame back to learn what happened.
    fn set_window_bounds(&self, id: WindowId, rect: Rect) -> Result<()>;
    /// Bounds of display `index`, if it exists.
    fn display_bounds(&self, index: usize) -> Option<Rect>;
    /// Whether the window is minimized. Unknown windows report `false`.
    fn is_minimized(&self, id: WindowId) -> bool {
        self.list_windows()
            .iter()
            .any(|w| w.id == id && w.minimized)
    }
    /// Current frame of a window, or `None` once it is gone.
    fn window_frame(&self, id: WindowId) -> Option<Rect> {
        self.list_windows()
            .into_iter()
            .find(|w| w.id == id)
            .map(|w| w.frame)
    }
}

#[cfg(any(test, feature = "test-utils"))]
pub use mock::MockWindowService;

#[cfg(any(test, feature = "test-utils"))]
mod mock {
    use std::{
        collections::HashMap,
        sync::{
            Arc,
            atomic::{AtomicBool, Ordering},
        },
    };

    use parking_lot::Mutex;

    use super::WindowService;
    use crate::{
        Error, Result,
        geom::{Rect, Size},
        window::{WindowId, WindowState},
    };

    /// In-memory window service for tests (enabled with the `test-utils`
    /// feature).
    ///
    /// Resizes are clamped to per-window minimum sizes, mimicking apps that
    /// refuse to shrink, and windows can be scheduled to vanish after a
    /// number of resize requests.
    #[derive(Clone, Default)]
    pub struct MockWindowService {
        /// Live windows.
        windows: Arc<Mutex<Vec<WindowState>>>,
        /// Display bounds by index.
        displays: Arc<Mutex<Vec<Rect>>>,
        /// Smallest size each window accepts.
        min_sizes: Arc<Mutex<HashMap<WindowId, Size>>>,
        /// Remove the window once it has received this many resizes.
        vanish_after: Arc<Mutex<HashMap<WindowId, usize>>>,
        /// Reject the resize request with this ordinal, counting from 1.
        reject_at: Arc<Mutex<HashMap<WindowId, usize>>>,
        /// Resize count per window.
        set_counts: Arc<Mutex<HashMap<WindowId, usize>>>,
        /// Every bounds request, in order.
        requests: Arc<Mutex<Vec<(WindowId, Rect)>>>,
        /// Report `Unsupported` for every resize.
        read_only: Arc<AtomicBool>,
    }

    impl MockWindowService {
        /// Empty service with one 1920×1080 display.
        pub fn new() -> Self {
            let svc = Self::default();
            svc.set_displays(vec![Rect::new(0.0, 0.0, 1920.0, 1080.0)]);
            svc
        }
        /// Replace the window list.
        pub fn set_windows(&self, wins: Vec<WindowState>) {
            *self.windows.lock() = wins;
        }
        /// Replace the display list.
        pub fn set_displays(&self, displays: Vec<Rect>) {
            *self.displays.lock() = displays;
        }
        /// Make `id` refuse to shrink below `min`.
        pub fn set_min_size(&self, id: WindowId, min: Size) {
            self.min_sizes.lock().insert(id, min);
        }
        /// Remove `id` after it has received `count` resize requests.
        pub fn vanish_after(&self, id: WindowId, count: usize) {
            self.vanish_after.lock().insert(id, count);
        }
        /// Fail the `nth` resize request for `id` (counting from 1) with
        /// [`Error::InvalidInput`] while leaving the window in place.
        pub fn reject_request(&self, id: WindowId, nth: usize) {
            self.reject_at.lock().insert(id, nth);
        }
        /// Make every resize fail with [`Error::Unsupported`].
        pub fn set_read_only(&self, v: bool) {
            self.read_only.store(v, Ordering::SeqCst);
        }
        /// Bounds requests received so far.
        pub fn requests(&self) -> Vec<(WindowId, Rect)> {
            self.requests.lock().clone()
        }
        /// Number of resize requests received for `id`.
        pub fn request_count(&self, id: WindowId) -> usize {
            self.set_counts.lock().get(&id).copied().unwrap_or(0)
        }
    }

    impl WindowService for MockWindowService {
        fn list_windows(&self) -> Vec<WindowState> {
            self.windows.lock().clone()
        }

        fn set_window_bounds(&self, id: WindowId, rect: Rect) -> Result<()> {
            if self.read_only.load(Ordering::SeqCst) {
                return Err(Error::Unsupported);
            }
            self.requests.lock().push((id, rect));
            let count = {
                let mut counts = self.set_counts.lock();
                let c = counts.entry(id).or_insert(0);
                *c += 1;
                *c
            };
            if self.reject_at.lock().get(&id) == Some(&count) {
                return Err(Error::InvalidInput(format!("resize {count} of {id} rejected")));
            }
            let min = self.min_sizes.lock().get(&id).copied().unwrap_or_default();
            let mut windows = self.windows.lock();
            let Some(pos) = windows.iter().position(|w| w.id == id) else {
                return Err(Error::WindowGone { id });
            };
            if self
                .vanish_after
                .lock()
                .get(&id)
                .is_some_and(|&limit| count >= limit)
            {
                windows.remove(pos);
                return Ok(());
            }
            windows[pos].frame = Rect::new(
                rect.x,
                rect.y,
                rect.w.max(min.width),
                rect.h.max(min.height),
            );
            Ok(())
        }

        fn display_bounds(&self, index: usize) -> Option<Rect> {
            self.displays.lock().get(index).copied()
        }
    }
}
