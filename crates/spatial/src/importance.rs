//! Window importance scoring for cascade role assignment.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::{geom::Size, window::WindowState};

/// Weight of the learned app preference.
const PREFERENCE_WEIGHT: f64 = 0.4;
/// Weight of the category lookup.
const CATEGORY_WEIGHT: f64 = 0.3;
/// Weight of the size ratio.
const SIZE_WEIGHT: f64 = 0.2;
/// Weight of focus recency.
const RECENCY_WEIGHT: f64 = 0.1;

/// Preference used for apps with no learned value.
pub const DEFAULT_PREFERENCE: f64 = 0.5;
/// Recency used when no focus history is tracked or the app is absent.
pub const DEFAULT_RECENCY: f64 = 0.5;

/// Coarse application category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppCategory {
    /// Editors and IDEs.
    CodeEditor,
    /// Design tools.
    Design,
    /// Web browsers.
    Browser,
    /// Database clients.
    Database,
    /// Terminal emulators.
    Terminal,
    /// Documents, notes, mail and calendars.
    Productivity,
    /// Chat and meetings.
    Communication,
    /// Audio and video.
    Media,
    /// Anything else.
    Other,
}

impl AppCategory {
    /// Category for an app name (case-insensitive). Unknown apps are
    /// [`AppCategory::Other`].
    pub fn classify(app: &str) -> Self {
        match app.trim().to_lowercase().as_str() {
            "visual studio code" | "code" | "xcode" | "cursor" | "zed" | "sublime text"
            | "intellij idea" | "pycharm" | "webstorm" | "nova" | "bbedit" => Self::CodeEditor,
            "figma" | "sketch" | "photoshop" | "adobe photoshop" | "illustrator"
            | "affinity designer" | "pixelmator pro" => Self::Design,
            "safari" | "arc" | "google chrome" | "chrome" | "firefox" | "brave browser"
            | "microsoft edge" | "chromium" | "orion" => Self::Browser,
            "tableplus" | "sequel ace" | "postico" | "datagrip" | "dbeaver"
            | "mongodb compass" => Self::Database,
            "terminal" | "iterm2" | "warp" | "ghostty" | "alacritty" | "kitty" | "wezterm"
            | "hyper" => Self::Terminal,
            "notion" | "obsidian" | "notes" | "microsoft word" | "microsoft excel" | "keynote"
            | "pages" | "numbers" | "calendar" | "mail" | "preview" | "things" | "todoist" => {
                Self::Productivity
            }
            "slack" | "discord" | "messages" | "zoom" | "microsoft teams" | "telegram"
            | "whatsapp" | "signal" => Self::Communication,
            "spotify" | "music" | "vlc" | "iina" | "quicktime player" | "photos" | "tv"
            | "podcasts" => Self::Media,
            _ => Self::Other,
        }
    }

    /// Fixed importance of the category.
    pub fn weight(self) -> f64 {
        match self {
            Self::CodeEditor => 0.9,
            Self::Design => 0.85,
            Self::Browser => 0.8,
            Self::Database => 0.75,
            Self::Terminal | Self::Productivity => 0.7,
            Self::Communication => 0.6,
            Self::Media | Self::Other => 0.5,
        }
    }
}

/// Learned per-app preferences in `0..=1`, keyed by lowercase app name.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, f64>", into = "BTreeMap<String, f64>")]
pub struct AppPreferences {
    /// Normalized entries.
    values: BTreeMap<String, f64>,
}

impl From<BTreeMap<String, f64>> for AppPreferences {
    fn from(raw: BTreeMap<String, f64>) -> Self {
        let mut prefs = Self::default();
        for (app, value) in raw {
            prefs.set(&app, value);
        }
        prefs
    }
}

impl From<AppPreferences> for BTreeMap<String, f64> {
    fn from(prefs: AppPreferences) -> Self {
        prefs.values
    }
}

impl AppPreferences {
    /// Empty preference map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a preference, clamped to `0..=1`. Non-finite values are ignored.
    pub fn set(&mut self, app: &str, value: f64) {
        if value.is_finite() {
            self.values.insert(app.to_lowercase(), value.clamp(0.0, 1.0));
        }
    }

    /// Preference for `app`, or [`DEFAULT_PREFERENCE`].
    pub fn get(&self, app: &str) -> f64 {
        self.values
            .get(&app.to_lowercase())
            .copied()
            .unwrap_or(DEFAULT_PREFERENCE)
    }

    /// Number of learned entries.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when nothing has been learned.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Most-recently-focused-first list of apps.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FocusHistory {
    /// Lowercase app names, most recent first, without duplicates.
    apps: Vec<String>,
}

impl FocusHistory {
    /// History from a most-recent-first list.
    pub fn from_recent<I, S>(apps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut history = Self::default();
        let list: Vec<String> = apps.into_iter().map(|a| a.as_ref().to_lowercase()).collect();
        for app in list.into_iter().rev() {
            history.focus(&app);
        }
        history
    }

    /// Record that `app` gained focus.
    pub fn focus(&mut self, app: &str) {
        let key = app.to_lowercase();
        self.apps.retain(|a| *a != key);
        self.apps.insert(0, key);
    }

    /// Recency factor: `1.0 - 0.2 * rank`, floored at 0.1; apps never
    /// focused get [`DEFAULT_RECENCY`].
    pub fn recency(&self, app: &str) -> f64 {
        let key = app.to_lowercase();
        self.apps
            .iter()
            .position(|a| *a == key)
            .map_or(DEFAULT_RECENCY, |rank| (1.0 - 0.2 * rank as f64).max(0.1))
    }
}

/// Score of one window with its factor breakdown.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct WindowImportance {
    /// Scored window.
    pub window: WindowState,
    /// Weighted score in `0..=1`.
    pub score: f64,
    /// Unweighted factor values by name.
    pub breakdown: BTreeMap<&'static str, f64>,
}

/// Ranks windows by preference, category, size and recency.
#[derive(Clone, Debug)]
pub struct ImportanceScorer {
    /// Screen the windows live on.
    screen: Size,
    /// Learned preferences.
    preferences: AppPreferences,
    /// Optional focus history.
    history: Option<FocusHistory>,
}

impl ImportanceScorer {
    /// Scorer for windows on `screen`.
    pub fn new(screen: Size, preferences: AppPreferences) -> Self {
        Self {
            screen,
            preferences,
            history: None,
        }
    }

    /// Use focus history for the recency factor.
    #[must_use]
    pub fn with_history(mut self, history: FocusHistory) -> Self {
        self.history = Some(history);
        self
    }

    /// Score one window.
    pub fn score(&self, window: &WindowState) -> WindowImportance {
        let preference = self.preferences.get(&window.app);
        let category = AppCategory::classify(&window.app).weight();
        let screen_area = self.screen.area();
        let size = if screen_area > 0.0 {
            (window.area() / screen_area * 2.0).min(1.0)
        } else {
            0.0
        };
        let recency = self
            .history
            .as_ref()
            .map_or(DEFAULT_RECENCY, |h| h.recency(&window.app));
        let score = PREFERENCE_WEIGHT * preference
            + CATEGORY_WEIGHT * category
            + SIZE_WEIGHT * size
            + RECENCY_WEIGHT * recency;
        trace!(app = %window.app, id = %window.id, score, "importance");
        WindowImportance {
            window: window.clone(),
            score: score.clamp(0.0, 1.0),
            breakdown: BTreeMap::from([
                ("app_preference", preference),
                ("category", category),
                ("size", size),
                ("recency", recency),
            ]),
        }
    }

    /// Score every window, most important first. Ties keep input order.
    pub fn rank(&self, windows: &[WindowState]) -> Vec<WindowImportance> {
        let mut scored: Vec<_> = windows.iter().map(|w| self.score(w)).collect();
        scored.sort_by(|a, b| b.score.total_cmp(&a.score));
        scored
    }
}
