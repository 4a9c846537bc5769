//! Deterministic non-overlapping tiles.

use super::{Arrangement, Role, Visibility};
use crate::{geom::Rect, importance::WindowImportance};

/// Share of the screen given to the first of two windows.
const SPLIT_PRIMARY: f64 = 0.6;

/// Tile rectangles for `count` windows, most important first.
fn tiles(count: usize, screen: Rect) -> Vec<Rect> {
    let Rect { x, y, w, h } = screen;
    match count {
        0 => Vec::new(),
        1 => vec![screen],
        2 => {
            let left = w * SPLIT_PRIMARY;
            vec![
                Rect::new(x, y, left, h),
                Rect::new(x + left, y, w - left, h),
            ]
        }
        3 => {
            let half_w = w / 2.0;
            let half_h = h / 2.0;
            vec![
                Rect::new(x, y, half_w, h),
                Rect::new(x + half_w, y, w - half_w, half_h),
                Rect::new(x + half_w, y + half_h, w - half_w, h - half_h),
            ]
        }
        4 => grid(4, 2, 2, screen),
        n => {
            let cols = (n as f64).sqrt().ceil() as usize;
            let rows = n.div_ceil(cols);
            grid(n, cols, rows, screen)
        }
    }
}

/// `count` uniform cells filled row by row.
fn grid(count: usize, cols: usize, rows: usize, screen: Rect) -> Vec<Rect> {
    let cell_w = screen.w / cols as f64;
    let cell_h = screen.h / rows as f64;
    (0..count)
        .map(|i| {
            let col = (i % cols) as f64;
            let row = (i / cols) as f64;
            Rect::new(
                screen.x + col * cell_w,
                screen.y + row * cell_h,
                cell_w,
                cell_h,
            )
        })
        .collect()
}

/// Tile `ordered` windows across `screen`.
pub(super) fn arrange(ordered: &[&WindowImportance], screen: Rect) -> Vec<Arrangement> {
    tiles(ordered.len(), screen)
        .into_iter()
        .zip(ordered)
        .enumerate()
        .map(|(index, (bounds, importance))| Arrangement {
            window: importance.window.clone(),
            bounds,
            layer: index,
            visibility: Visibility::FullyVisible,
            role: Role::for_rank(index, importance.score),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::union_area;

    const SCREEN: Rect = Rect::new(0.0, 0.0, 1000.0, 800.0);

    #[test]
    fn two_windows_split_sixty_forty() {
        let t = tiles(2, SCREEN);
        assert_eq!(t[0], Rect::new(0.0, 0.0, 600.0, 800.0));
        assert_eq!(t[1], Rect::new(600.0, 0.0, 400.0, 800.0));
    }

    #[test]
    fn three_windows_half_and_quarters() {
        let t = tiles(3, SCREEN);
        assert_eq!(t[0], Rect::new(0.0, 0.0, 500.0, 800.0));
        assert_eq!(t[1], Rect::new(500.0, 0.0, 500.0, 400.0));
        assert_eq!(t[2], Rect::new(500.0, 400.0, 500.0, 400.0));
    }

    #[test]
    fn many_windows_use_a_grid() {
        let t = tiles(7, SCREEN);
        assert_eq!(t.len(), 7);
        // ceil(sqrt(7)) = 3 columns, ceil(7 / 3) = 3 rows.
        assert_eq!(t[0].size(), t[6].size());
        assert!((t[0].w - 1000.0 / 3.0).abs() < 1e-9);
        assert!((t[0].h - 800.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn tiles_never_overlap_and_stay_on_screen() {
        for n in 1..=12 {
            let t = tiles(n, SCREEN);
            let sum: f64 = t.iter().map(Rect::area).sum();
            assert!((union_area(&t) - sum).abs() < 1e-6, "n = {n}");
            assert!(t.iter().all(|r| r.right() <= SCREEN.right() + 1e-9));
            assert!(t.iter().all(|r| r.bottom() <= SCREEN.bottom() + 1e-9));
        }
    }

    #[test]
    fn offset_screens_shift_tiles() {
        let t = tiles(1, Rect::new(1920.0, 0.0, 1280.0, 800.0));
        assert_eq!(t[0].x, 1920.0);
    }
}
