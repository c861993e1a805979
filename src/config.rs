//! Chart configuration.
//!
//! Every field has a default, so a partial JSON document is valid:
//!
//! ```
//! use acuity_chart::ChartConfig;
//!
//! let config = ChartConfig::from_json_str(r#"{ "default_level_index": 4 }"#).unwrap();
//! assert_eq!(config.default_level_index, 4);
//! assert!((config.cap_height_ratio - 0.52).abs() < f64::EPSILON);
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::renderer::{DEFAULT_CAP_HEIGHT_RATIO, FALLBACK_LETTER_HEIGHT_PX};
use crate::table::AcuityTable;

/// Line shown when a testing session starts (the `20/50` line).
pub const DEFAULT_LEVEL_INDEX: usize = 3;

/// Denominators above this compress letter spacing on narrow viewports.
pub const NARROW_SPACING_THRESHOLD: u32 = 40;

/// Letter spacing used on narrow viewports for large-denominator lines.
pub const NARROW_LETTER_SPACING_EM: f64 = 0.01;

/// Letter spacing used everywhere else.
pub const LETTER_SPACING_EM: f64 = 0.15;

/// Tunables for rendering and navigation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    /// Line index a session starts on and returns to on reset.
    pub default_level_index: usize,

    /// Visible cap height as a fraction of the font's em box.
    pub cap_height_ratio: f64,

    /// Letter height used before any calibration exists.
    pub fallback_letter_height_px: f64,

    /// Snellen denominators strictly above this use the narrow spacing.
    pub narrow_spacing_threshold: u32,

    /// Narrow-viewport letter spacing, in em.
    pub narrow_letter_spacing_em: f64,

    /// Regular letter spacing, in em.
    pub letter_spacing_em: f64,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            default_level_index: DEFAULT_LEVEL_INDEX,
            cap_height_ratio: DEFAULT_CAP_HEIGHT_RATIO,
            fallback_letter_height_px: FALLBACK_LETTER_HEIGHT_PX,
            narrow_spacing_threshold: NARROW_SPACING_THRESHOLD,
            narrow_letter_spacing_em: NARROW_LETTER_SPACING_EM,
            letter_spacing_em: LETTER_SPACING_EM,
        }
    }
}

impl ChartConfig {
    /// Create a new configuration builder.
    #[must_use]
    pub fn builder() -> ChartConfigBuilder {
        ChartConfigBuilder::default()
    }

    /// Parse and validate a JSON document.
    ///
    /// The starting line is checked later, against the table the config is
    /// paired with.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate_values()?;
        Ok(config)
    }

    /// Load and validate a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&content)
    }

    /// Check values against the table they will drive.
    pub fn validate(&self, table: &AcuityTable) -> Result<()> {
        if self.default_level_index >= table.len() {
            return Err(Error::InvalidConfig(format!(
                "default_level_index {} out of range (table has {} levels)",
                self.default_level_index,
                table.len()
            )));
        }
        self.validate_values()
    }

    /// Check the values that do not depend on a table.
    pub fn validate_values(&self) -> Result<()> {
        if !(self.cap_height_ratio > 0.0 && self.cap_height_ratio <= 1.0) {
            return Err(Error::InvalidConfig(format!(
                "cap_height_ratio must be in (0, 1], got {}",
                self.cap_height_ratio
            )));
        }
        let positive = [
            ("fallback_letter_height_px", self.fallback_letter_height_px),
            ("narrow_letter_spacing_em", self.narrow_letter_spacing_em),
            ("letter_spacing_em", self.letter_spacing_em),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(Error::InvalidConfig(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }
        Ok(())
    }
}

/// Builder for [`ChartConfig`].
#[derive(Debug, Default)]
pub struct ChartConfigBuilder {
    default_level_index: Option<usize>,
    cap_height_ratio: Option<f64>,
    fallback_letter_height_px: Option<f64>,
    narrow_spacing_threshold: Option<u32>,
    narrow_letter_spacing_em: Option<f64>,
    letter_spacing_em: Option<f64>,
}

impl ChartConfigBuilder {
    /// Set the starting line.
    #[must_use]
    pub fn default_level_index(mut self, index: usize) -> Self {
        self.default_level_index = Some(index);
        self
    }

    /// Set the cap-height correction ratio.
    #[must_use]
    pub fn cap_height_ratio(mut self, ratio: f64) -> Self {
        self.cap_height_ratio = Some(ratio);
        self
    }

    /// Set the uncalibrated letter height.
    #[must_use]
    pub fn fallback_letter_height_px(mut self, px: f64) -> Self {
        self.fallback_letter_height_px = Some(px);
        self
    }

    /// Set the denominator threshold for narrow spacing.
    #[must_use]
    pub fn narrow_spacing_threshold(mut self, denominator: u32) -> Self {
        self.narrow_spacing_threshold = Some(denominator);
        self
    }

    /// Set the compressed spacing for narrow viewports.
    #[must_use]
    pub fn narrow_letter_spacing_em(mut self, em: f64) -> Self {
        self.narrow_letter_spacing_em = Some(em);
        self
    }

    /// Set the regular letter spacing.
    #[must_use]
    pub fn letter_spacing_em(mut self, em: f64) -> Self {
        self.letter_spacing_em = Some(em);
        self
    }

    /// Build and validate.
    ///
    /// The starting line is checked when the config meets its table in
    /// [`NavigationEngine::new`](crate::NavigationEngine::new).
    pub fn build(self) -> Result<ChartConfig> {
        let defaults = ChartConfig::default();
        let config = ChartConfig {
            default_level_index: self
                .default_level_index
                .unwrap_or(defaults.default_level_index),
            cap_height_ratio: self.cap_height_ratio.unwrap_or(defaults.cap_height_ratio),
            fallback_letter_height_px: self
                .fallback_letter_height_px
                .unwrap_or(defaults.fallback_letter_height_px),
            narrow_spacing_threshold: self
                .narrow_spacing_threshold
                .unwrap_or(defaults.narrow_spacing_threshold),
            narrow_letter_spacing_em: self
                .narrow_letter_spacing_em
                .unwrap_or(defaults.narrow_letter_spacing_em),
            letter_spacing_em: self.letter_spacing_em.unwrap_or(defaults.letter_spacing_em),
        };
        config.validate_values()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::AcuityLevel;
    use std::io::Write;

    #[test]
    fn test_defaults_are_valid() {
        let config = ChartConfig::default();
        assert!(config.validate(&AcuityTable::standard()).is_ok());
        assert_eq!(config.default_level_index, 3);
        assert_eq!(config.narrow_spacing_threshold, 40);
    }

    #[test]
    fn test_builder_overrides() {
        let config = ChartConfig::builder()
            .default_level_index(0)
            .cap_height_ratio(0.7)
            .build()
            .unwrap();
        assert_eq!(config.default_level_index, 0);
        assert!((config.cap_height_ratio - 0.7).abs() < f64::EPSILON);
        assert!((config.fallback_letter_height_px - 16.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_builder_rejects_out_of_range() {
        assert!(ChartConfig::builder().cap_height_ratio(0.0).build().is_err());
        assert!(ChartConfig::builder().cap_height_ratio(1.5).build().is_err());
        assert!(
            ChartConfig::builder()
                .fallback_letter_height_px(-1.0)
                .build()
                .is_err()
        );
        assert!(ChartConfig::builder().letter_spacing_em(0.0).build().is_err());
        assert!(
            ChartConfig::builder()
                .narrow_letter_spacing_em(f64::NAN)
                .build()
                .is_err()
        );
    }

    #[test]
    fn test_builder_spacing_overrides() {
        let config = ChartConfig::builder()
            .narrow_letter_spacing_em(0.05)
            .letter_spacing_em(0.25)
            .build()
            .unwrap();
        assert!((config.narrow_letter_spacing_em - 0.05).abs() < f64::EPSILON);
        assert!((config.letter_spacing_em - 0.25).abs() < f64::EPSILON);
        assert_eq!(config.narrow_spacing_threshold, NARROW_SPACING_THRESHOLD);
    }

    #[test]
    fn test_level_index_checked_against_paired_table() {
        let config = ChartConfig::builder().default_level_index(9).build().unwrap();
        assert!(matches!(
            config.validate(&AcuityTable::standard()),
            Err(Error::InvalidConfig(_))
        ));

        let ten_levels = AcuityTable::new(&TEN_LEVELS).unwrap();
        assert!(config.validate(&ten_levels).is_ok());
    }

    static TEN_LEVELS: [AcuityLevel; 10] = [
        level("20/400", 100.0),
        level("20/300", 75.0),
        level("20/200", 50.0),
        level("20/100", 25.0),
        level("20/70", 17.5),
        level("20/50", 12.5),
        level("20/40", 10.0),
        level("20/30", 7.5),
        level("20/20", 5.0),
        level("20/15", 3.75),
    ];

    const fn level(label: &'static str, arcminutes: f64) -> AcuityLevel {
        AcuityLevel {
            label,
            arcminutes,
            letter_variants: ["E F P D", "T O Z L", "L P E D"],
        }
    }

    #[test]
    fn test_json_partial_and_invalid() {
        let config = ChartConfig::from_json_str(r#"{"narrow_spacing_threshold": 30}"#).unwrap();
        assert_eq!(config.narrow_spacing_threshold, 30);
        assert_eq!(config.default_level_index, DEFAULT_LEVEL_INDEX);

        // the starting line is only range-checked against a table
        let far = ChartConfig::from_json_str(r#"{"default_level_index": 99}"#).unwrap();
        assert_eq!(far.default_level_index, 99);
        assert!(far.validate(&AcuityTable::standard()).is_err());

        assert!(matches!(
            ChartConfig::from_json_str(r#"{"cap_height_ratio": 2.0}"#),
            Err(Error::InvalidConfig(_))
        ));
        assert!(matches!(
            ChartConfig::from_json_str("not json"),
            Err(Error::Json(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "default_level_index": 5, "letter_spacing_em": 0.2 }}"#).unwrap();

        let config = ChartConfig::load(file.path()).unwrap();
        assert_eq!(config.default_level_index, 5);
        assert!((config.letter_spacing_em - 0.2).abs() < f64::EPSILON);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = ChartConfig::load(dir.path().join("missing.json"));
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
