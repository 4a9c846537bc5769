//! RON configuration for the engine.

use std::{collections::BTreeMap, fs, path::Path};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    Error, Result,
    arrange::{ArrangeConfig, ArrangementGenerator},
    constraints::{ConstraintCache, DiscoveryPolicy},
    geom::Size,
    grid::{CELL_SIZE, GridCodec},
    importance::{AppPreferences, ImportanceScorer},
    occlusion::{MIN_VISIBLE_AREA, OcclusionCalculator, OcclusionMode},
    symbols::SymbolTable,
};

/// Grid codec settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Cell edge in pixels.
    pub cell_size: f64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            cell_size: CELL_SIZE,
        }
    }
}

/// Occlusion settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OcclusionConfig {
    /// Clickable-area threshold in px².
    pub min_visible_area: f64,
    /// How overlapping occluders are combined.
    pub mode: OcclusionMode,
}

impl Default for OcclusionConfig {
    fn default() -> Self {
        Self {
            min_visible_area: MIN_VISIBLE_AREA,
            mode: OcclusionMode::default(),
        }
    }
}

/// Top-level engine configuration. Every field is optional in the file.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpatialConfig {
    /// Grid codec settings.
    pub grid: GridConfig,
    /// Occlusion settings.
    pub occlusion: OcclusionConfig,
    /// Minimum-size discovery policy.
    pub discovery: DiscoveryPolicy,
    /// Arrangement tunables.
    pub arrange: ArrangeConfig,
    /// Learned app preferences.
    pub app_preferences: AppPreferences,
    /// Minimum sizes seeded into the constraint cache.
    pub known_minimums: BTreeMap<String, Size>,
}

impl SpatialConfig {
    /// Load a RON config file.
    pub fn load(path: &Path) -> Result<Self> {
        let source = fs::read_to_string(path).map_err(|e| Error::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let config = Self::from_ron(&source).map_err(|e| match e {
            Error::Config { message, .. } => Error::Config {
                path: path.to_path_buf(),
                message,
            },
            other => other,
        })?;
        debug!(path = %path.display(), "loaded spatial config");
        Ok(config)
    }

    /// Parse RON source.
    pub fn from_ron(source: &str) -> Result<Self> {
        let config: Self = ron::from_str(source).map_err(|e| Error::Config {
            path: "<inline>".into(),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the engine cannot work with.
    fn validate(&self) -> Result<()> {
        if !(self.grid.cell_size.is_finite() && self.grid.cell_size > 0.0) {
            return Err(Error::InvalidInput(format!(
                "grid.cell_size must be positive, got {}",
                self.grid.cell_size
            )));
        }
        if self.arrange.max_cascade_steps == 0 {
            return Err(Error::InvalidInput(
                "arrange.max_cascade_steps must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Grid codec over the built-in symbol table.
    pub fn codec(&self) -> GridCodec<'static> {
        GridCodec::new(SymbolTable::builtin())
            .with_cell_size(self.grid.cell_size)
            .with_min_visible_area(self.occlusion.min_visible_area)
    }

    /// Occlusion calculator.
    pub fn occlusion(&self) -> OcclusionCalculator {
        OcclusionCalculator::new(self.occlusion.mode)
            .with_min_visible_area(self.occlusion.min_visible_area)
    }

    /// Constraint cache with the configured TTL, seeded with known minimums.
    pub fn constraint_cache(&self) -> ConstraintCache {
        let cache = ConstraintCache::new(self.discovery.ttl());
        self.seed(&cache);
        cache
    }

    /// Seed `cache` with known minimums.
    pub fn seed(&self, cache: &ConstraintCache) {
        for (app, min) in &self.known_minimums {
            cache.seed(app, *min);
        }
    }

    /// Arrangement generator aware of known minimums.
    pub fn generator(&self) -> ArrangementGenerator {
        let mut generator = ArrangementGenerator::new(self.arrange.clone());
        for (app, min) in &self.known_minimums {
            generator.set_min_size(app, *min);
        }
        generator
    }

    /// Importance scorer for windows on `screen`.
    pub fn scorer(&self, screen: Size) -> ImportanceScorer {
        ImportanceScorer::new(screen, self.app_preferences.clone())
    }
}
