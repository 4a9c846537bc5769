//! Geometry primitives shared by every component.
//!
//! Coordinates are screen pixels with the origin at the top-left corner and
//! `y` growing downward, matching the row order of the symbolic grid.

use serde::{Deserialize, Serialize};

/// A point in screen pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

impl Point {
    /// Construct a point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A width/height pair in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    /// Horizontal extent.
    pub width: f64,
    /// Vertical extent.
    pub height: f64,
}

impl Size {
    /// Construct a size.
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Area in square pixels.
    #[inline]
    #[must_use]
    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Width divided by height; zero for degenerate sizes.
    #[must_use]
    pub fn aspect_ratio(&self) -> f64 {
        if self.height <= 0.0 {
            0.0
        } else {
            self.width / self.height
        }
    }
}

/// Axis-aligned rectangle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width (never negative for well-formed windows).
    pub w: f64,
    /// Height (never negative for well-formed windows).
    pub h: f64,
}

impl Rect {
    /// Construct a rectangle from origin and extent.
    #[must_use]
    pub const fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    /// Construct a rectangle anchored at the origin.
    #[must_use]
    pub const fn from_size(size: Size) -> Self {
        Self::new(0.0, 0.0, size.width, size.height)
    }

    /// Rectangle from an origin point and a size.
    #[must_use]
    pub const fn from_parts(origin: Point, size: Size) -> Self {
        Self::new(origin.x, origin.y, size.width, size.height)
    }

    #[inline]
    /// Left edge.
    pub fn left(&self) -> f64 {
        self.x
    }
    #[inline]
    /// Right edge (exclusive).
    pub fn right(&self) -> f64 {
        self.x + self.w
    }
    #[inline]
    /// Top edge.
    pub fn top(&self) -> f64 {
        self.y
    }
    #[inline]
    /// Bottom edge (exclusive).
    pub fn bottom(&self) -> f64 {
        self.y + self.h
    }

    /// Origin point.
    #[must_use]
    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Extent.
    #[must_use]
    pub fn size(&self) -> Size {
        Size::new(self.w, self.h)
    }

    /// Area in square pixels.
    #[inline]
    #[must_use]
    pub fn area(&self) -> f64 {
        self.w * self.h
    }

    /// True when the rectangle covers no area.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.w <= 0.0 || self.h <= 0.0
    }

    /// Intersection of two rectangles, or `None` when they do not overlap
    /// with positive area. Touching edges do not count as overlap.
    #[must_use]
    pub fn intersection(&self, other: &Self) -> Option<Self> {
        let w = overlap_1d(self.left(), self.right(), other.left(), other.right());
        let h = overlap_1d(self.top(), self.bottom(), other.top(), other.bottom());
        if w <= 0.0 || h <= 0.0 {
            return None;
        }
        Some(Self::new(
            self.x.max(other.x),
            self.y.max(other.y),
            w,
            h,
        ))
    }

    /// True when `other` lies entirely inside `self`.
    #[must_use]
    pub fn contains(&self, other: &Self) -> bool {
        other.left() >= self.left()
            && other.top() >= self.top()
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// Shrink to fit `bounds`, then shift so the rectangle does not cross
    /// any edge of `bounds`.
    #[must_use]
    pub fn clamp_within(&self, bounds: &Self) -> Self {
        let w = self.w.clamp(0.0, bounds.w.max(0.0));
        let h = self.h.clamp(0.0, bounds.h.max(0.0));
        let x = self.x.clamp(bounds.left(), (bounds.right() - w).max(bounds.left()));
        let y = self.y.clamp(bounds.top(), (bounds.bottom() - h).max(bounds.top()));
        Self::new(x, y, w, h)
    }
}

#[inline]
/// Length of the overlap between `[a1, a2)` and `[b1, b2)`.
pub fn overlap_1d(a1: f64, a2: f64, b1: f64, b2: f64) -> f64 {
    let l = a1.max(b1);
    let r = a2.min(b2);
    (r - l).max(0.0)
}

/// Area covered by the union of `rects`, counting shared regions once.
///
/// Sweeps vertical slabs between consecutive distinct x edges and merges
/// the y intervals of the rectangles spanning each slab.
pub fn union_area(rects: &[Rect]) -> f64 {
    let live: Vec<&Rect> = rects.iter().filter(|r| !r.is_empty()).collect();
    if live.is_empty() {
        return 0.0;
    }
    let mut xs: Vec<f64> = live.iter().flat_map(|r| [r.left(), r.right()]).collect();
    xs.sort_by(f64::total_cmp);
    xs.dedup();

    let mut total = 0.0;
    for slab in xs.windows(2) {
        let (x0, x1) = (slab[0], slab[1]);
        let width = x1 - x0;
        if width <= 0.0 {
            continue;
        }
        let mut spans: Vec<(f64, f64)> = live
            .iter()
            .filter(|r| r.left() <= x0 && r.right() >= x1)
            .map(|r| (r.top(), r.bottom()))
            .collect();
        total += width * merged_length(&mut spans);
    }
    total
}

/// Total length covered by a set of half-open intervals.
fn merged_length(spans: &mut [(f64, f64)]) -> f64 {
    spans.sort_by(|a, b| a.0.total_cmp(&b.0));
    let mut covered = 0.0;
    let mut current: Option<(f64, f64)> = None;
    for &(start, end) in spans.iter() {
        match current {
            Some((cs, ce)) if start <= ce => current = Some((cs, ce.max(end))),
            Some((cs, ce)) => {
                covered += ce - cs;
                current = Some((start, end));
            }
            None => current = Some((start, end)),
        }
    }
    if let Some((cs, ce)) = current {
        covered += ce - cs;
    }
    covered
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_edges() {
        let r = Rect::new(10.0, 20.0, 30.0, 40.0);
        assert_eq!(r.left(), 10.0);
        assert_eq!(r.right(), 40.0);
        assert_eq!(r.top(), 20.0);
        assert_eq!(r.bottom(), 60.0);
        assert_eq!(r.area(), 1200.0);
    }

    #[test]
    fn intersection_excludes_touching_edges() {
        let a = Rect::new(0.0, 0.0, 50.0, 50.0);
        let b = Rect::new(50.0, 0.0, 50.0, 50.0);
        assert_eq!(a.intersection(&b), None);
        let c = Rect::new(40.0, 10.0, 50.0, 50.0);
        assert_eq!(a.intersection(&c), Some(Rect::new(40.0, 10.0, 10.0, 40.0)));
    }

    #[test]
    fn clamp_within_shifts_and_shrinks() {
        let screen = Rect::new(0.0, 0.0, 1000.0, 600.0);
        let r = Rect::new(900.0, 500.0, 300.0, 200.0).clamp_within(&screen);
        assert_eq!(r, Rect::new(700.0, 400.0, 300.0, 200.0));
        let big = Rect::new(-50.0, 0.0, 2000.0, 100.0).clamp_within(&screen);
        assert_eq!(big, Rect::new(0.0, 0.0, 1000.0, 100.0));
    }

    #[test]
    fn union_area_counts_shared_regions_once() {
        let a = Rect::new(0.0, 0.0, 100.0, 100.0);
        let b = Rect::new(50.0, 0.0, 100.0, 100.0);
        assert_eq!(union_area(&[a, b]), 15_000.0);
        assert_eq!(union_area(&[a, a]), 10_000.0);
        assert_eq!(union_area(&[]), 0.0);
        let disjoint = Rect::new(200.0, 200.0, 10.0, 10.0);
        assert_eq!(union_area(&[a, disjoint]), 10_100.0);
    }
}
