//! Arrangement generation: tiled and importance-ordered cascade layouts.
//!
//! Both strategies consume windows ranked by [`ImportanceScorer`] and return
//! target rectangles without touching live windows. Layer `0` is the
//! frontmost arrangement.
//!
//! [`ImportanceScorer`]: crate::importance::ImportanceScorer

mod cascade;
mod tiled;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    geom::{Rect, Size},
    importance::WindowImportance,
    window::WindowState,
};

/// Score above which ranks 1 and 2 become secondary windows.
const SECONDARY_SCORE: f64 = 0.6;

/// How much of an arranged window is left exposed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    /// At least 90% exposed.
    FullyVisible,
    /// 60% to 90% exposed.
    MostlyVisible,
    /// 30% to 60% exposed.
    PartiallyVisible,
    /// 10% to 30% exposed.
    MinimallyVisible,
    /// Less than 10% exposed.
    Hidden,
}

impl Visibility {
    /// Bucket for an exposed fraction in `0..=1`.
    pub fn from_exposed(fraction: f64) -> Self {
        if fraction >= 0.9 {
            Self::FullyVisible
        } else if fraction >= 0.6 {
            Self::MostlyVisible
        } else if fraction >= 0.3 {
            Self::PartiallyVisible
        } else if fraction >= 0.1 {
            Self::MinimallyVisible
        } else {
            Self::Hidden
        }
    }
}

/// Role assigned by importance rank.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// The most important window.
    Primary,
    /// Ranks 1 and 2 with a high enough score.
    Secondary,
    /// Everything else.
    Auxiliary,
}

impl Role {
    /// Role for rank `index` with importance `score`.
    pub fn for_rank(index: usize, score: f64) -> Self {
        match index {
            0 => Self::Primary,
            1 | 2 if score > SECONDARY_SCORE => Self::Secondary,
            _ => Self::Auxiliary,
        }
    }

    /// Lowercase label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::Secondary => "secondary",
            Self::Auxiliary => "auxiliary",
        }
    }
}

/// Target placement for one window.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Arrangement {
    /// Window being placed.
    pub window: WindowState,
    /// Target frame.
    pub bounds: Rect,
    /// Position in importance order; `0` is frontmost.
    pub layer: usize,
    /// Exposure bucket.
    pub visibility: Visibility,
    /// Rank-derived role.
    pub role: Role,
}

/// Strategy selection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Strategy {
    /// Tiled for few windows or ultrawide screens, otherwise cascade.
    #[default]
    Auto,
    /// Non-overlapping tiles.
    Tiled,
    /// Importance-ordered stack.
    Cascade,
}

/// Cascade offset style.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CascadeStyle {
    /// 5% offsets.
    Classic,
    /// 3% offsets.
    Compact,
    /// 8% horizontal, 6% vertical.
    Spread,
    /// Offsets chosen from screen shape and size.
    #[default]
    Intelligent,
}

/// Window size as fractions of the screen.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Scale {
    /// Fraction of screen width.
    pub width: f64,
    /// Fraction of screen height.
    pub height: f64,
}

impl Scale {
    /// Construct a scale.
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Pixel size of this scale on `screen`.
    pub fn apply(&self, screen: Size) -> Size {
        Size::new(screen.width * self.width, screen.height * self.height)
    }
}

/// Tunables for [`ArrangementGenerator`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArrangeConfig {
    /// Strategy selection.
    pub strategy: Strategy,
    /// Cascade offset style.
    pub style: CascadeStyle,
    /// Cascade positions repeat after this many steps.
    pub max_cascade_steps: usize,
    /// Size of the primary window.
    pub primary_scale: Scale,
    /// Size of secondary windows.
    pub secondary_scale: Scale,
    /// Size of auxiliary windows.
    pub auxiliary_scale: Scale,
    /// Aspect ratio above which a screen counts as ultrawide.
    pub ultrawide_aspect: f64,
    /// Screen area in px² above which a screen counts as large.
    pub large_screen_area: f64,
}

impl Default for ArrangeConfig {
    fn default() -> Self {
        Self {
            strategy: Strategy::Auto,
            style: CascadeStyle::Intelligent,
            max_cascade_steps: 5,
            primary_scale: Scale::new(0.70, 0.80),
            secondary_scale: Scale::new(0.55, 0.65),
            auxiliary_scale: Scale::new(0.40, 0.50),
            ultrawide_aspect: 2.0,
            large_screen_area: 3_000_000.0,
        }
    }
}

impl ArrangeConfig {
    /// Scale for a role.
    pub fn scale(&self, role: Role) -> Scale {
        match role {
            Role::Primary => self.primary_scale,
            Role::Secondary => self.secondary_scale,
            Role::Auxiliary => self.auxiliary_scale,
        }
    }

    /// Whether `screen` counts as ultrawide.
    pub fn is_ultrawide(&self, screen: Size) -> bool {
        screen.aspect_ratio() > self.ultrawide_aspect
    }
}

/// Produces target rectangles for ranked windows.
#[derive(Clone, Debug, Default)]
pub struct ArrangementGenerator {
    /// Tunables.
    config: ArrangeConfig,
    /// Known minimum sizes by lowercase app name.
    min_sizes: HashMap<String, Size>,
}

impl ArrangementGenerator {
    /// Generator with explicit tunables.
    pub fn new(config: ArrangeConfig) -> Self {
        Self {
            config,
            min_sizes: HashMap::new(),
        }
    }

    /// Active tunables.
    pub fn config(&self) -> &ArrangeConfig {
        &self.config
    }

    /// Record a known minimum size; cascade sizes never go below it.
    pub fn set_min_size(&mut self, app: &str, min: Size) {
        self.min_sizes.insert(app.to_lowercase(), min);
    }

    /// Builder form of [`Self::set_min_size`].
    #[must_use]
    pub fn with_min_size(mut self, app: &str, min: Size) -> Self {
        self.set_min_size(app, min);
        self
    }

    /// Known minimum size for `app`.
    pub fn min_size(&self, app: &str) -> Option<Size> {
        self.min_sizes.get(&app.to_lowercase()).copied()
    }

    /// Resolve [`Strategy::Auto`] for `count` windows on `screen`.
    pub fn choose_strategy(&self, count: usize, screen: Size) -> Strategy {
        match self.config.strategy {
            Strategy::Auto => {
                if count <= 2 || (count <= 4 && self.config.is_ultrawide(screen)) {
                    Strategy::Tiled
                } else {
                    Strategy::Cascade
                }
            }
            fixed => fixed,
        }
    }

    /// Arrange `ranked` windows inside `screen`. Input is re-sorted by score,
    /// most important first, keeping the order of ties.
    pub fn generate(&self, ranked: &[WindowImportance], screen: Rect) -> Vec<Arrangement> {
        if ranked.is_empty() || screen.is_empty() {
            return Vec::new();
        }
        let mut ordered: Vec<&WindowImportance> = ranked.iter().collect();
        ordered.sort_by(|a, b| b.score.total_cmp(&a.score));
        let strategy = self.choose_strategy(ordered.len(), screen.size());
        debug!(?strategy, windows = ordered.len(), "arranging");
        match strategy {
            Strategy::Tiled => tiled::arrange(&ordered, screen),
            Strategy::Cascade | Strategy::Auto => cascade::arrange(self, &ordered, screen),
        }
    }
}
