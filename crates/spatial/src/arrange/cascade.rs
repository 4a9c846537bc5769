//! Importance-ordered cascade.

use super::{ArrangeConfig, Arrangement, ArrangementGenerator, CascadeStyle, Role, Visibility};
use crate::{
    geom::{Point, Rect, Size, union_area},
    importance::WindowImportance,
};

/// Offsets shrink by this factor for crowded cascades.
const CROWDED_FACTOR: f64 = 0.7;
/// Cascades with more windows than this are crowded.
const CROWDED_COUNT: usize = 5;

/// Per-step offset as fractions of screen width and height.
fn offset_fractions(config: &ArrangeConfig, screen: Size) -> (f64, f64) {
    match config.style {
        CascadeStyle::Classic => (0.05, 0.05),
        CascadeStyle::Compact => (0.03, 0.03),
        CascadeStyle::Spread => (0.08, 0.06),
        CascadeStyle::Intelligent => {
            if config.is_ultrawide(screen) {
                (0.06, 0.02)
            } else if screen.area() > config.large_screen_area {
                (0.05, 0.05)
            } else {
                (0.03, 0.03)
            }
        }
    }
}

/// Per-step offset in pixels.
fn step_offset(config: &ArrangeConfig, screen: Size, count: usize) -> Point {
    let (fx, fy) = offset_fractions(config, screen);
    let factor = if count > CROWDED_COUNT {
        CROWDED_FACTOR
    } else {
        1.0
    };
    Point::new(screen.width * fx * factor, screen.height * fy * factor)
}

/// Fraction of `rect` not covered by any of `front`.
fn exposed_fraction(rect: &Rect, front: &[Rect]) -> f64 {
    let area = rect.area();
    if area <= 0.0 {
        return 0.0;
    }
    let covered: Vec<Rect> = front.iter().filter_map(|f| rect.intersection(f)).collect();
    (1.0 - union_area(&covered) / area).clamp(0.0, 1.0)
}

/// Stack `ordered` windows from the screen origin, most important in front.
///
/// The least important windows sit nearest the origin and each more important
/// window steps further out, so every window behind keeps an exposed strip
/// along its top and left edges.
pub(super) fn arrange(
    generator: &ArrangementGenerator,
    ordered: &[&WindowImportance],
    screen: Rect,
) -> Vec<Arrangement> {
    let config = generator.config();
    let offset = step_offset(config, screen.size(), ordered.len());
    let max_step = config.max_cascade_steps.max(1) - 1;
    let last = ordered.len().saturating_sub(1).min(max_step);
    let mut placed: Vec<Rect> = Vec::with_capacity(ordered.len());
    let mut out = Vec::with_capacity(ordered.len());

    for (index, importance) in ordered.iter().enumerate() {
        let role = Role::for_rank(index, importance.score);
        let mut size = config.scale(role).apply(screen.size());
        if let Some(min) = generator.min_size(&importance.window.app) {
            size.width = size.width.max(min.width);
            size.height = size.height.max(min.height);
        }
        size.width = size.width.min(screen.w);
        size.height = size.height.min(screen.h);

        let step = (last - index.min(last)) as f64;
        let origin = Point::new(screen.x + offset.x * step, screen.y + offset.y * step);
        let bounds = Rect::from_parts(origin, size).clamp_within(&screen);
        let visibility = if index == 0 {
            Visibility::FullyVisible
        } else {
            Visibility::from_exposed(exposed_fraction(&bounds, &placed))
        };
        placed.push(bounds);
        out.push(Arrangement {
            window: importance.window.clone(),
            bounds,
            layer: index,
            visibility,
            role,
        });
    }
    out
}
