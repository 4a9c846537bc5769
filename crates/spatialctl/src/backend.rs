//! Offline window service backed by a JSON snapshot.

use std::{
    fs,
    io::{self, Read},
    path::Path,
};

use spatial::{Error as SpatialError, Rect, Result as SpatialResult, Size, WindowId, WindowService, WindowState};
use tracing::{debug, info};

use crate::error::Result;

/// Read a file, or stdin when `path` is `-`.
pub fn read_input(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        Ok(buf)
    } else {
        Ok(fs::read_to_string(path)?)
    }
}

/// Load a JSON array of window states.
pub fn load_windows(path: &Path) -> Result<Vec<WindowState>> {
    let windows: Vec<WindowState> = serde_json::from_str(&read_input(path)?)?;
    info!(path = %path.display(), windows = windows.len(), "Loaded window snapshot");
    Ok(windows)
}

/// Read-only [`WindowService`] over a fixed snapshot.
///
/// Displays share one size and sit side by side: display `i` spans
/// `x = i * width`. Resizes report [`SpatialError::Unsupported`], so
/// constraint discovery falls back to configured minimums.
pub struct SnapshotService {
    /// Snapshot served to the engine.
    windows: Vec<WindowState>,
    /// Display bounds by index.
    displays: Vec<Rect>,
}

impl SnapshotService {
    /// Serve `windows` with as many `screen`-sized displays as they reference.
    pub fn new(windows: Vec<WindowState>, screen: Size) -> Self {
        let count = windows.iter().map(|w| w.display + 1).max().unwrap_or(1);
        let displays = (0..count)
            .map(|i| Rect::new(i as f64 * screen.width, 0.0, screen.width, screen.height))
            .collect();
        Self { windows, displays }
    }
}

impl WindowService for SnapshotService {
    fn list_windows(&self) -> Vec<WindowState> {
        self.windows.clone()
    }

    fn set_window_bounds(&self, id: WindowId, rect: Rect) -> SpatialResult<()> {
        debug!(%id, ?rect, "Snapshot backend is read-only");
        Err(SpatialError::Unsupported)
    }

    fn display_bounds(&self, index: usize) -> Option<Rect> {
        self.displays.get(index).copied()
    }
}
