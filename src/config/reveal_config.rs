use crate::grid::traits::{GridError, GridResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Literal "1+1=" anchored at the start of row 0
pub const DEFAULT_FIXED_TEXT: &str = "1+1=";
pub const DEFAULT_MARKER_WORD: &str = "MULTI2";

/// One character pinned to a grid index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixedChar {
    pub index: usize,
    pub character: char,
}

/// What goes into the grid at build time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSpec {
    pub fixed_text: Vec<FixedChar>,
    pub marker_word: Vec<char>,
}

impl Default for GridSpec {
    fn default() -> Self {
        Self::new(DEFAULT_FIXED_TEXT, DEFAULT_MARKER_WORD)
    }
}

impl GridSpec {
    /// Fixed text laid out from index 0, plus a marker word
    pub fn new(fixed: &str, word: &str) -> Self {
        Self {
            fixed_text: fixed
                .chars()
                .enumerate()
                .map(|(index, character)| FixedChar { index, character })
                .collect(),
            marker_word: word.chars().collect(),
        }
    }

    pub fn with_fixed_text(mut self, fixed_text: Vec<FixedChar>) -> Self {
        self.fixed_text = fixed_text;
        self
    }

    pub fn fixed_indices(&self) -> Vec<usize> {
        self.fixed_text.iter().map(|f| f.index).collect()
    }
}

/// Order in which the load-in visits cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RevealOrder {
    /// Random permutation
    #[default]
    Shuffled,
    /// Index order, left to right and top to bottom
    RowMajor,
}

/// Timer-driven load-in settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaggerConfig {
    /// Delay between consecutive reveals (ms)
    pub delay_ms: u64,
    #[serde(default)]
    pub order: RevealOrder,
}

impl Default for StaggerConfig {
    fn default() -> Self {
        Self {
            delay_ms: 25,
            order: RevealOrder::Shuffled,
        }
    }
}

impl StaggerConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

/// Scroll-linked reveal thresholds and rates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrollConfig {
    /// Draw-in runs while progress is below this
    pub draw_in_threshold: f32,
    /// Multiplier on progress for the draw-in probability
    pub draw_in_rate: f32,
    /// Fade-out runs once progress reaches this
    pub fade_out_threshold: f32,
    /// Multiplier on (progress - fade_out_threshold) for the fade-out probability
    pub fade_out_rate: f32,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            draw_in_threshold: 0.1,
            draw_in_rate: 0.6,
            fade_out_threshold: 0.3,
            fade_out_rate: 0.4,
        }
    }
}

impl ScrollConfig {
    pub fn validate(&self) -> GridResult<()> {
        let fields = [
            ("draw_in_threshold", self.draw_in_threshold),
            ("draw_in_rate", self.draw_in_rate),
            ("fade_out_threshold", self.fade_out_threshold),
            ("fade_out_rate", self.fade_out_rate),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(GridError::ConfigurationError(format!(
                    "{} must be a non-negative number, got {}",
                    name, value
                )));
            }
        }
        if self.draw_in_threshold > 1.0 || self.fade_out_threshold > 1.0 {
            return Err(GridError::ConfigurationError(
                "scroll thresholds must lie within [0, 1]".to_string(),
            ));
        }
        Ok(())
    }
}

/// Pointer drawing settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawConfig {
    /// Chance that a pointer hit tries a straight run before splashing
    pub sequential_chance: f64,
    /// Letters pre-drawn at random positions on each build
    pub splatter_count: usize,
}

impl Default for DrawConfig {
    fn default() -> Self {
        Self {
            sequential_chance: 0.2,
            splatter_count: 0,
        }
    }
}

/// Everything the engine needs besides the grid dimensions
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RevealSettings {
    #[serde(default)]
    pub spec: GridSpec,
    #[serde(default)]
    pub stagger: StaggerConfig,
    #[serde(default)]
    pub scroll: ScrollConfig,
    #[serde(default)]
    pub draw: DrawConfig,
}

impl RevealSettings {
    pub fn validate(&self) -> GridResult<()> {
        self.scroll.validate()?;
        if !(0.0..=1.0).contains(&self.draw.sequential_chance) {
            return Err(GridError::ConfigurationError(format!(
                "sequential_chance must lie within [0, 1], got {}",
                self.draw.sequential_chance
            )));
        }
        Ok(())
    }

    pub fn from_json_str(json: &str) -> GridResult<Self> {
        let settings: Self = serde_json::from_str(json)
            .map_err(|e| GridError::ConfigurationError(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> GridResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| GridError::IoError(format!("{}: {}", path.display(), e)))?;
        log::debug!("Loaded reveal settings from {}", path.display());
        Self::from_json_str(&json)
    }

    pub fn to_json_pretty(&self) -> GridResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| GridError::ConfigurationError(e.to_string()))
    }
}
