//! Symbolic grid codec.
//!
//! Encoding quantizes window frames into `cell_size` pixel cells and paints
//! each window's symbol back to front; cells claimed by two different apps
//! become [`OVERLAP`]. Decoding finds the first bordered block in free text
//! and turns each symbol's bounding box back into a pixel rectangle.
//!
//! The round trip is lossy: positions survive only to cell granularity, and
//! apps without a symbol are dropped.

use std::{collections::BTreeMap, fmt::Write as _};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use tracing::{debug, trace};

use crate::{
    Error, Result,
    command::WindowCommand,
    geom::{Rect, Size},
    occlusion::MIN_VISIBLE_AREA,
    symbols::{EMPTY, OVERLAP, SymbolTable, UNKNOWN},
    window::{PaintOrder, WindowId},
};

/// Default cell edge in pixels.
pub const CELL_SIZE: f64 = 50.0;

/// First bordered block: `+---+`, one or more `|...|` rows, `+---+`.
static GRID_BLOCK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^[ \t]*\+-+\+[ \t]*\r?\n(?:[ \t]*\|[^\n]*\|[ \t]*\r?\n)+[ \t]*\+-+\+")
        .expect("grid block pattern is valid")
});

/// One `symbol = app` legend line.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LegendEntry {
    /// Painted symbol.
    pub symbol: char,
    /// Application name.
    pub app: String,
}

/// Per-window result of the cell-level visibility check.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CellValidation {
    /// Window identifier.
    pub id: WindowId,
    /// Application name.
    pub app: String,
    /// Symbol painted for the window.
    pub symbol: char,
    /// Cells inside the window's footprint still showing its own symbol.
    pub visible_cells: usize,
    /// `visible_cells` converted to square pixels.
    pub visible_area: f64,
    /// Whether `visible_area` reaches the clickable-area threshold.
    pub meets_minimum: bool,
    /// Whether any cell of the window's footprint is an overlap marker.
    pub overlapped: bool,
}

/// Output of [`GridCodec::encode`].
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GridEncoding {
    /// Grid width in cells.
    pub cols: usize,
    /// Grid height in cells.
    pub rows: usize,
    /// Row-major cells.
    cells: Vec<Vec<char>>,
    /// One legend entry per input window, in input order.
    pub legend: Vec<LegendEntry>,
    /// One validation entry per input window, in input order.
    pub validation: Vec<CellValidation>,
    /// True when any overlap marker exists anywhere in the grid.
    pub has_overlap: bool,
    /// Apps painted as [`UNKNOWN`] because they have no symbol.
    pub unmapped_apps: Vec<String>,
}

impl GridEncoding {
    /// Cell at `(col, row)`, if in range.
    pub fn cell(&self, col: usize, row: usize) -> Option<char> {
        self.cells.get(row).and_then(|r| r.get(col)).copied()
    }

    /// Row `row` as a string.
    pub fn row(&self, row: usize) -> Option<String> {
        self.cells.get(row).map(|r| r.iter().collect())
    }

    /// The grid framed with `+`, `-` and `|`.
    pub fn grid_text(&self) -> String {
        let border = format!("+{}+", "-".repeat(self.cols));
        let mut out = String::with_capacity((self.cols + 3) * (self.rows + 2));
        out.push_str(&border);
        out.push('\n');
        for row in &self.cells {
            out.push('|');
            out.extend(row.iter());
            out.push_str("|\n");
        }
        out.push_str(&border);
        out
    }

    /// `LEGEND:` header followed by `symbol = app` lines.
    pub fn legend_text(&self) -> String {
        let mut out = String::from("LEGEND:");
        for entry in &self.legend {
            let _ignored = write!(out, "\n{} = {}", entry.symbol, entry.app);
        }
        out
    }

    /// Grid and legend as a single prompt block.
    pub fn render(&self) -> String {
        format!("{}\n\n{}", self.grid_text(), self.legend_text())
    }
}

/// Output of [`GridCodec::decode`].
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Decoded {
    /// One precise move per recognized symbol, ordered by symbol.
    pub commands: Vec<WindowCommand>,
    /// Symbols found in the grid with no owning app.
    pub dropped_symbols: Vec<char>,
}

impl Decoded {
    /// Number of symbols that could not be mapped back to an app.
    pub fn unmapped_count(&self) -> usize {
        self.dropped_symbols.len()
    }
}

/// Encoder/decoder between window layouts and symbolic grids.
#[derive(Debug, Clone, Copy)]
pub struct GridCodec<'a> {
    /// Symbol table used in both directions.
    symbols: &'a SymbolTable,
    /// Cell edge in pixels.
    cell_size: f64,
    /// Clickable-area threshold for the validation pass.
    min_visible_area: f64,
}

impl Default for GridCodec<'static> {
    fn default() -> Self {
        Self::new(SymbolTable::builtin())
    }
}

impl<'a> GridCodec<'a> {
    /// Codec over `symbols` with the default cell size and threshold.
    pub fn new(symbols: &'a SymbolTable) -> Self {
        Self {
            symbols,
            cell_size: CELL_SIZE,
            min_visible_area: MIN_VISIBLE_AREA,
        }
    }

    /// Override the cell edge. Non-positive values fall back to the default.
    #[must_use]
    pub fn with_cell_size(mut self, cell_size: f64) -> Self {
        self.cell_size = if cell_size > 0.0 { cell_size } else { CELL_SIZE };
        self
    }

    /// Override the clickable-area threshold.
    #[must_use]
    pub fn with_min_visible_area(mut self, area: f64) -> Self {
        self.min_visible_area = area;
        self
    }

    /// Grid dimensions `(cols, rows)` for a screen.
    pub fn dimensions(&self, screen: Size) -> (usize, usize) {
        let cols = (screen.width.max(0.0) / self.cell_size).floor() as usize;
        let rows = (screen.height.max(0.0) / self.cell_size).floor() as usize;
        (cols, rows)
    }

    /// Cell span `[start, end)` of a pixel interval, clamped to `[0, limit]`.
    fn span(&self, start: f64, end: f64, limit: usize) -> (usize, usize) {
        let to_cell = |v: f64| ((v / self.cell_size).floor().max(0.0) as usize).min(limit);
        let first = to_cell(start);
        (first, to_cell(end).max(first))
    }

    /// Paint `windows` back to front onto a fresh grid.
    pub fn encode(&self, windows: &PaintOrder, screen: Size) -> GridEncoding {
        let (cols, rows) = self.dimensions(screen);
        let mut cells = vec![vec![EMPTY; cols]; rows];
        let mut unmapped_apps: Vec<String> = Vec::new();
        let mut footprints = Vec::with_capacity(windows.len());

        for w in windows.iter() {
            let symbol = self.symbols.symbol_or_unknown(&w.app);
            if symbol == UNKNOWN && !unmapped_apps.contains(&w.app) {
                debug!(app = %w.app, "grid: app has no symbol; painting as unknown");
                unmapped_apps.push(w.app.clone());
            }
            let (sx, ex) = self.span(w.frame.left(), w.frame.right(), cols);
            let (sy, ey) = self.span(w.frame.top(), w.frame.bottom(), rows);
            footprints.push((symbol, sx, ex, sy, ey));
            if w.minimized {
                continue;
            }
            for row in &mut cells[sy..ey] {
                for cell in &mut row[sx..ex] {
                    *cell = if *cell == EMPTY || *cell == symbol {
                        symbol
                    } else {
                        OVERLAP
                    };
                }
            }
        }

        let cell_area = self.cell_size * self.cell_size;
        let has_overlap = cells.iter().flatten().any(|&c| c == OVERLAP);
        let mut legend = Vec::with_capacity(windows.len());
        let mut validation = Vec::with_capacity(windows.len());
        for (w, &(symbol, sx, ex, sy, ey)) in windows.iter().zip(&footprints) {
            legend.push(LegendEntry {
                symbol,
                app: w.app.clone(),
            });
            let footprint = || cells[sy..ey].iter().flat_map(move |r| r[sx..ex].iter());
            let visible_cells = footprint().filter(|&&c| c == symbol).count();
            let visible_area = visible_cells as f64 * cell_area;
            let overlapped = footprint().any(|&c| c == OVERLAP);
            validation.push(CellValidation {
                id: w.id,
                app: w.app.clone(),
                symbol,
                visible_cells,
                visible_area,
                meets_minimum: w.minimized || visible_area >= self.min_visible_area,
                overlapped,
            });
        }
        trace!(cols, rows, has_overlap, "grid: encoded");

        GridEncoding {
            cols,
            rows,
            cells,
            legend,
            validation,
            has_overlap,
            unmapped_apps,
        }
    }

    /// Parse the first bordered grid in `text` into move commands.
    ///
    /// Returns [`Error::NoGridFound`] when the text holds no grid block.
    pub fn decode(&self, text: &str, screen: Size) -> Result<Decoded> {
        let block = GRID_BLOCK.find(text).ok_or(Error::NoGridFound)?;
        let mut buckets: BTreeMap<char, Vec<(usize, usize)>> = BTreeMap::new();
        let interior = block
            .as_str()
            .lines()
            .map(str::trim)
            .filter(|l| l.starts_with('|'));
        for (row, line) in interior.enumerate() {
            let body = line.trim_start_matches('|').trim_end_matches('|');
            for (col, ch) in body.chars().enumerate() {
                if ch == EMPTY || ch == OVERLAP || ch.is_whitespace() {
                    continue;
                }
                buckets.entry(ch).or_default().push((col, row));
            }
        }

        let bounds = Rect::from_size(screen);
        let mut decoded = Decoded::default();
        for (symbol, coords) in buckets {
            let Some(app) = self.symbols.app_for(symbol) else {
                debug!(%symbol, "grid: dropping symbol with no app");
                decoded.dropped_symbols.push(symbol);
                continue;
            };
            let rect = self.bounding_rect(&coords).clamp_within(&bounds);
            decoded.commands.push(WindowCommand::precise(app, rect));
        }
        Ok(decoded)
    }

    /// Pixel rectangle covering every cell in `coords`.
    fn bounding_rect(&self, coords: &[(usize, usize)]) -> Rect {
        let min_col = coords.iter().map(|c| c.0).min().unwrap_or(0);
        let max_col = coords.iter().map(|c| c.0).max().unwrap_or(0);
        let min_row = coords.iter().map(|c| c.1).min().unwrap_or(0);
        let max_row = coords.iter().map(|c| c.1).max().unwrap_or(0);
        let cell = self.cell_size;
        Rect::new(
            min_col as f64 * cell,
            min_row as f64 * cell,
            (max_col - min_col + 1) as f64 * cell,
            (max_row - min_row + 1) as f64 * cell,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{command::Target, geom::Point, window::WindowState};

    fn screen(w: f64, h: f64) -> Size {
        Size::new(w, h)
    }

    #[test]
    fn dimensions_floor_screen_size() {
        let codec = GridCodec::default();
        assert_eq!(codec.dimensions(screen(1000.0, 600.0)), (20, 12));
        assert_eq!(codec.dimensions(screen(1049.0, 99.0)), (20, 1));
    }

    #[test]
    fn overlap_marks_shared_columns() {
        let codec = GridCodec::default();
        let order = PaintOrder::as_given(vec![
            WindowState::new("Arc", 1, Rect::new(0.0, 0.0, 500.0, 600.0)),
            WindowState::new("Safari", 2, Rect::new(400.0, 0.0, 600.0, 600.0)),
        ]);
        let enc = codec.encode(&order, screen(1000.0, 600.0));
        assert_eq!((enc.cols, enc.rows), (20, 12));
        for row in 0..12 {
            assert_eq!(
                enc.row(row).unwrap(),
                "11111111XX2222222222",
                "row {row}"
            );
        }
        assert!(enc.has_overlap);
        assert_eq!(enc.validation[0].visible_cells, 8 * 12);
        assert_eq!(enc.validation[1].visible_cells, 10 * 12);
        assert!(enc.validation.iter().all(|v| v.overlapped && v.meets_minimum));
    }

    #[test]
    fn overlap_marker_is_sticky() {
        let codec = GridCodec::default();
        let r = Rect::new(0.0, 0.0, 100.0, 100.0);
        let order = PaintOrder::as_given(vec![
            WindowState::new("Arc", 1, r),
            WindowState::new("Safari", 2, r),
            WindowState::new("Arc", 3, r),
        ]);
        let enc = codec.encode(&order, screen(100.0, 100.0));
        assert_eq!(enc.row(0).unwrap(), "XX");
        assert!(enc.validation.iter().all(|v| v.visible_cells == 0));
        assert!(enc.validation.iter().all(|v| !v.meets_minimum));
    }

    #[test]
    fn out_of_range_frames_are_clamped() {
        let codec = GridCodec::default();
        let order = PaintOrder::as_given(vec![WindowState::new(
            "Arc",
            1,
            Rect::new(-120.0, -80.0, 5000.0, 5000.0),
        )]);
        let enc = codec.encode(&order, screen(200.0, 100.0));
        assert_eq!(enc.row(0).unwrap(), "1111");
        assert_eq!(enc.row(1).unwrap(), "1111");
        assert_eq!(enc.validation[0].visible_cells, 8);
    }

    #[test]
    fn unknown_apps_paint_question_marks() {
        let codec = GridCodec::default();
        let order = PaintOrder::as_given(vec![WindowState::new(
            "Mystery",
            1,
            Rect::new(0.0, 0.0, 100.0, 50.0),
        )]);
        let enc = codec.encode(&order, screen(150.0, 50.0));
        assert_eq!(enc.row(0).unwrap(), "??.");
        assert_eq!(enc.unmapped_apps, vec!["Mystery".to_string()]);
    }

    #[test]
    fn minimized_windows_are_not_painted() {
        let codec = GridCodec::default();
        let order = PaintOrder::as_given(vec![
            WindowState::new("Arc", 1, Rect::new(0.0, 0.0, 100.0, 50.0)).with_minimized(true),
        ]);
        let enc = codec.encode(&order, screen(100.0, 50.0));
        assert_eq!(enc.row(0).unwrap(), "..");
        assert!(enc.validation[0].meets_minimum);
        assert_eq!(enc.legend.len(), 1);
    }

    #[test]
    fn single_cell_meets_clickable_threshold() {
        let codec = GridCodec::default();
        let order = PaintOrder::as_given(vec![WindowState::new(
            "Arc",
            1,
            Rect::new(0.0, 0.0, 50.0, 50.0),
        )]);
        let enc = codec.encode(&order, screen(100.0, 100.0));
        assert_eq!(enc.validation[0].visible_cells, 1);
        assert!(enc.validation[0].meets_minimum);
    }

    #[test]
    fn render_frames_grid_and_lists_legend() {
        let codec = GridCodec::default();
        let order = PaintOrder::as_given(vec![
            WindowState::new("Arc", 1, Rect::new(0.0, 0.0, 50.0, 50.0)),
            WindowState::new("Safari", 2, Rect::new(50.0, 0.0, 50.0, 50.0)),
        ]);
        let enc = codec.encode(&order, screen(150.0, 50.0));
        assert_eq!(
            enc.render(),
            "+---+\n|12.|\n+---+\n\nLEGEND:\n1 = Arc\n2 = Safari"
        );
    }

    #[test]
    fn decode_scenario() {
        let codec = GridCodec::default();
        let text = "Here you go:\n+----+\n|1.2.|\n|1.2.|\n|1.2.|\n+----+\nthanks";
        let decoded = codec.decode(text, screen(400.0, 300.0)).unwrap();
        assert_eq!(decoded.commands.len(), 2);
        assert_eq!(decoded.commands[0].app, "Arc");
        assert_eq!(
            decoded.commands[0].target,
            Target::Precise {
                origin: Point::new(0.0, 0.0),
                size: Size::new(50.0, 150.0),
            }
        );
        assert_eq!(decoded.commands[1].app, "Safari");
        assert_eq!(
            decoded.commands[1].resolve(&Rect::new(0.0, 0.0, 400.0, 300.0)),
            Rect::new(100.0, 0.0, 50.0, 150.0)
        );
        assert_eq!(decoded.unmapped_count(), 0);
    }

    #[test]
    fn decode_without_grid_fails() {
        let codec = GridCodec::default();
        let err = codec.decode("no grid here |1| +", screen(400.0, 300.0));
        assert!(matches!(err, Err(Error::NoGridFound)));
    }

    #[test]
    fn decode_drops_unknown_symbols_and_ignores_overlaps() {
        let codec = GridCodec::default();
        let text = "+---+\n|?X1|\n|?.1|\n+---+";
        let decoded = codec.decode(text, screen(150.0, 100.0)).unwrap();
        assert_eq!(decoded.dropped_symbols, vec!['?']);
        assert_eq!(decoded.commands.len(), 1);
        assert_eq!(
            decoded.commands[0].resolve(&Rect::new(0.0, 0.0, 150.0, 100.0)),
            Rect::new(100.0, 0.0, 50.0, 100.0)
        );
    }

    #[test]
    fn decode_uses_first_block_and_tolerates_indent() {
        let codec = GridCodec::default();
        let text = "```\n  +--+\n  |2.|\n  +--+\n```\n+--+\n|1.|\n+--+";
        let decoded = codec.decode(text, screen(100.0, 50.0)).unwrap();
        assert_eq!(decoded.commands.len(), 1);
        assert_eq!(decoded.commands[0].app, "Safari");
    }
}
