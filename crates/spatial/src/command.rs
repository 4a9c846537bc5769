//! Commands handed to the caller that applies window bounds.

use serde::{Deserialize, Serialize};

use crate::geom::{Point, Rect, Size};

/// What to do with the target window. Only moves exist today.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Move and/or resize.
    Move,
}

/// Named screen region used by symbolic commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SymbolicPosition {
    /// Anchored to the left edge, vertically centred.
    Left,
    /// Anchored to the right edge, vertically centred.
    Right,
    /// Anchored to the top edge, horizontally centred.
    Top,
    /// Anchored to the bottom edge, horizontally centred.
    Bottom,
    /// Centred on the screen.
    Center,
    /// Top-left corner.
    TopLeft,
    /// Top-right corner.
    TopRight,
    /// Bottom-left corner.
    BottomLeft,
    /// Bottom-right corner.
    BottomRight,
}

/// Named window size used by symbolic commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SymbolicSize {
    /// Entire screen.
    Full,
    /// Half of the screen along the position's axis.
    Half,
    /// One third along the position's axis.
    Third,
    /// Two thirds along the position's axis.
    TwoThirds,
    /// A quarter of the screen (half by half).
    Quarter,
}

impl SymbolicSize {
    /// Fraction of the screen along the split axis.
    fn fraction(self) -> f64 {
        match self {
            Self::Full => 1.0,
            Self::Half | Self::Quarter => 0.5,
            Self::Third => 1.0 / 3.0,
            Self::TwoThirds => 2.0 / 3.0,
        }
    }
}

/// Where a command places its window.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Target {
    /// Region described by name.
    Symbolic {
        /// Anchor region.
        position: SymbolicPosition,
        /// Relative size.
        size: SymbolicSize,
    },
    /// Explicit pixel rectangle.
    Precise {
        /// Top-left corner.
        origin: Point,
        /// Extent.
        size: Size,
    },
}

/// One instruction for the window service.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WindowCommand {
    /// Application whose window should move.
    pub app: String,
    /// Action to perform.
    pub action: Action,
    /// Destination.
    pub target: Target,
}

impl WindowCommand {
    /// A move to an explicit rectangle.
    pub fn precise(app: impl Into<String>, rect: Rect) -> Self {
        Self {
            app: app.into(),
            action: Action::Move,
            target: Target::Precise {
                origin: rect.origin(),
                size: rect.size(),
            },
        }
    }

    /// A move to a named region.
    pub fn symbolic(app: impl Into<String>, position: SymbolicPosition, size: SymbolicSize) -> Self {
        Self {
            app: app.into(),
            action: Action::Move,
            target: Target::Symbolic { position, size },
        }
    }

    /// Resolve the target to pixels within `screen`.
    pub fn resolve(&self, screen: &Rect) -> Rect {
        match self.target {
            Target::Precise { origin, size } => Rect::from_parts(origin, size).clamp_within(screen),
            Target::Symbolic { position, size } => resolve_symbolic(position, size, screen),
        }
    }
}

/// Map a named position/size pair onto `screen`.
fn resolve_symbolic(position: SymbolicPosition, size: SymbolicSize, screen: &Rect) -> Rect {
    use SymbolicPosition as P;

    if size == SymbolicSize::Full {
        return *screen;
    }
    let f = size.fraction();
    let (w, h) = match (position, size) {
        (_, SymbolicSize::Quarter) => (screen.w * 0.5, screen.h * 0.5),
        (P::Left | P::Right, _) => (screen.w * f, screen.h),
        (P::Top | P::Bottom, _) => (screen.w, screen.h * f),
        (P::Center, _) => (screen.w * f, screen.h * f),
        (P::TopLeft | P::TopRight | P::BottomLeft | P::BottomRight, _) => {
            (screen.w * f, screen.h * 0.5)
        }
    };
    let left = screen.x;
    let right = screen.right() - w;
    let top = screen.y;
    let bottom = screen.bottom() - h;
    let mid_x = screen.x + (screen.w - w) / 2.0;
    let mid_y = screen.y + (screen.h - h) / 2.0;
    let (x, y) = match position {
        P::Left => (left, mid_y),
        P::Right => (right, mid_y),
        P::Top => (mid_x, top),
        P::Bottom => (mid_x, bottom),
        P::Center => (mid_x, mid_y),
        P::TopLeft => (left, top),
        P::TopRight => (right, top),
        P::BottomLeft => (left, bottom),
        P::BottomRight => (right, bottom),
    };
    Rect::new(x, y, w, h)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCREEN: Rect = Rect::new(0.0, 0.0, 1200.0, 900.0);

    #[test]
    fn symbolic_halves_and_quarters() {
        let left = WindowCommand::symbolic("Arc", SymbolicPosition::Left, SymbolicSize::Half);
        assert_eq!(left.resolve(&SCREEN), Rect::new(0.0, 0.0, 600.0, 900.0));
        let br = WindowCommand::symbolic(
            "Arc",
            SymbolicPosition::BottomRight,
            SymbolicSize::Quarter,
        );
        assert_eq!(br.resolve(&SCREEN), Rect::new(600.0, 450.0, 600.0, 450.0));
        let right_third =
            WindowCommand::symbolic("Arc", SymbolicPosition::Right, SymbolicSize::Third);
        assert_eq!(right_third.resolve(&SCREEN), Rect::new(800.0, 0.0, 400.0, 900.0));
    }

    #[test]
    fn full_ignores_position() {
        let cmd = WindowCommand::symbolic("Arc", SymbolicPosition::TopRight, SymbolicSize::Full);
        assert_eq!(cmd.resolve(&SCREEN), SCREEN);
    }

    #[test]
    fn precise_is_clamped_to_screen() {
        let cmd = WindowCommand::precise("Arc", Rect::new(1100.0, 0.0, 300.0, 300.0));
        assert_eq!(cmd.resolve(&SCREEN), Rect::new(900.0, 0.0, 300.0, 300.0));
    }
}
