//! Angular size to pixel size conversion.
//!
//! A letter that subtends `arcminutes` at the eye has a physical height of
//! `tan(arcminutes) * distance`. Multiplying by the calibrated pixels per inch
//! gives the visible glyph height on screen. Fonts size their em box rather
//! than their capitals, so the font size handed to a text engine is the
//! visible height divided by the cap-height ratio.
//!
//! No value here is rounded. Rounding to whole pixels makes adjacent lines step
//! visibly at short distances.

use serde::Serialize;

use crate::calibration::CalibrationRecord;
use crate::config::ChartConfig;
use crate::table::{AcuityLevel, AcuityTable};

/// Visible cap height as a fraction of the em box for typical sans fonts.
pub const DEFAULT_CAP_HEIGHT_RATIO: f64 = 0.52;

/// Letter height shown before calibration exists.
pub const FALLBACK_LETTER_HEIGHT_PX: f64 = 16.0;

/// Convert arcminutes to radians.
#[must_use]
pub fn arcminutes_to_radians(arcminutes: f64) -> f64 {
    (arcminutes / 60.0).to_radians()
}

/// Visible letter height in pixels for an angular size.
///
/// Uses the exact tangent, not the small-angle approximation. Without a
/// calibration this returns [`FALLBACK_LETTER_HEIGHT_PX`].
///
/// # Example
///
/// ```
/// use acuity_chart::calibration::{compute_calibration, DisplayInfo};
/// use acuity_chart::renderer::letter_height_px;
///
/// let cal = compute_calibration(315, 10.0, DisplayInfo::default()).unwrap();
/// let h = letter_height_px(Some(&cal), 5.0);
/// assert!((h - 16.29).abs() < 0.01);
///
/// assert_eq!(letter_height_px(None, 5.0), 16.0);
/// ```
#[must_use]
pub fn letter_height_px(calibration: Option<&CalibrationRecord>, arcminutes: f64) -> f64 {
    letter_height_px_or(calibration, arcminutes, FALLBACK_LETTER_HEIGHT_PX)
}

/// [`letter_height_px`] with a caller-chosen fallback.
#[must_use]
pub fn letter_height_px_or(
    calibration: Option<&CalibrationRecord>,
    arcminutes: f64,
    fallback_px: f64,
) -> f64 {
    let Some(cal) = calibration else {
        return fallback_px;
    };
    let height_inches = arcminutes_to_radians(arcminutes).tan() * cal.viewing_distance_inches();
    height_inches * cal.pixels_per_inch()
}

/// Font size that makes the visible capitals `visible_height_px` tall.
#[must_use]
pub fn rendered_font_size_px(visible_height_px: f64, cap_height_ratio: f64) -> f64 {
    visible_height_px / cap_height_ratio
}

/// Physical height of a visible glyph height, in millimetres.
///
/// Pass the height before cap-height correction.
#[must_use]
pub fn millimeter_equivalent(visible_height_px: f64, calibration: &CalibrationRecord) -> f64 {
    calibration.px_to_mm(visible_height_px)
}

/// Everything needed to paint one chart line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RenderedLevel {
    /// Snellen label.
    pub label: &'static str,
    /// Authored angular size.
    pub arcminutes: f64,
    /// Visible glyph height.
    pub letter_height_px: f64,
    /// Font size after cap-height correction.
    pub font_size_px: f64,
    /// Physical glyph height; absent until calibrated.
    pub millimeters: Option<f64>,
}

impl RenderedLevel {
    /// Size one level for the given calibration.
    #[must_use]
    pub fn compute(
        level: &AcuityLevel,
        calibration: Option<&CalibrationRecord>,
        config: &ChartConfig,
    ) -> Self {
        let letter_height_px =
            letter_height_px_or(calibration, level.arcminutes, config.fallback_letter_height_px);
        Self {
            label: level.label,
            arcminutes: level.arcminutes,
            letter_height_px,
            font_size_px: rendered_font_size_px(letter_height_px, config.cap_height_ratio),
            millimeters: calibration.map(|cal| millimeter_equivalent(letter_height_px, cal)),
        }
    }
}

/// Size every level of a table, easiest first.
#[must_use]
pub fn render_chart(
    table: &AcuityTable,
    calibration: Option<&CalibrationRecord>,
    config: &ChartConfig,
) -> Vec<RenderedLevel> {
    table
        .levels()
        .iter()
        .map(|level| RenderedLevel::compute(level, calibration, config))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calibration::{DisplayInfo, compute_calibration};
    use crate::table::CATALOG;

    fn reference_calibration() -> CalibrationRecord {
        compute_calibration(315, 10.0, DisplayInfo::default()).unwrap()
    }

    #[test]
    fn test_reference_scenario_20_20() {
        let cal = reference_calibration();
        let radians = arcminutes_to_radians(5.0);
        assert!((radians - 0.0014544).abs() < 1e-7);

        let h = letter_height_px(Some(&cal), 5.0);
        // tan(radians) * 120 ≈ 0.17453 in, times 93.33 px/in
        assert!((h / cal.pixels_per_inch() - 0.17453).abs() < 1e-5);
        assert!((h - 16.29).abs() < 0.01);

        let font = rendered_font_size_px(h, DEFAULT_CAP_HEIGHT_RATIO);
        assert!((font - 31.32).abs() < 0.01);
    }

    #[test]
    fn test_uses_exact_tangent() {
        let cal = reference_calibration();
        let arcmin = 600.0; // 10 degrees, where tan and the linear form differ
        let h = letter_height_px(Some(&cal), arcmin);
        let exact = 10f64.to_radians().tan() * 120.0 * cal.pixels_per_inch();
        let linear = 10f64.to_radians() * 120.0 * cal.pixels_per_inch();
        assert!((h - exact).abs() < 1e-9);
        assert!((h - linear).abs() > 0.1);
    }

    #[test]
    fn test_fallback_without_calibration() {
        assert_eq!(letter_height_px(None, 50.0), 16.0);
        assert_eq!(letter_height_px(None, 5.0), 16.0);
        assert_eq!(letter_height_px_or(None, 5.0, 24.0), 24.0);
    }

    #[test]
    fn test_monotonic_in_distance_and_density() {
        let display = DisplayInfo::default();
        for arcmin in [5.0, 6.25, 12.5, 50.0] {
            let mut last = 0.0;
            for feet in [1.0, 2.5, 5.0, 10.0, 20.0, 40.0] {
                let cal = compute_calibration(315, feet, display).unwrap();
                let h = letter_height_px(Some(&cal), arcmin);
                assert!(h > last, "distance {feet} ft, {arcmin} arcmin");
                last = h;
            }

            let mut last = 0.0;
            for width in [50, 200, 315, 415, 515, 800] {
                let cal = compute_calibration(width, 10.0, display).unwrap();
                let h = letter_height_px(Some(&cal), arcmin);
                assert!(h > last, "width {width} px, {arcmin} arcmin");
                last = h;
            }
        }
    }

    #[test]
    fn test_cap_height_correction() {
        for h in [1.0, 16.29, 100.0] {
            assert!((rendered_font_size_px(h, 0.52) - h / 0.52).abs() < 1e-12);
            for ratio in [0.1, 0.52, 0.99] {
                assert!(rendered_font_size_px(h, ratio) > h);
            }
        }
    }

    #[test]
    fn test_not_rounded() {
        let cal = reference_calibration();
        let h = letter_height_px(Some(&cal), 5.0);
        assert!(h.fract() != 0.0);
    }

    #[test]
    fn test_millimeters_use_visible_height() {
        let cal = reference_calibration();
        let level = RenderedLevel::compute(&CATALOG[7], Some(&cal), &ChartConfig::default());
        let mm = level.millimeters.unwrap();
        let expected = level.letter_height_px / cal.pixels_per_inch() * 25.4;
        assert!((mm - expected).abs() < 1e-12);
        // tan(5') * 120 in ≈ 0.17453 in ≈ 4.43 mm
        assert!((mm - 4.433).abs() < 0.001);
        assert!(mm < millimeter_equivalent(level.font_size_px, &cal));
    }

    #[test]
    fn test_render_chart_uncalibrated() {
        let chart = render_chart(&AcuityTable::standard(), None, &ChartConfig::default());
        assert_eq!(chart.len(), CATALOG.len());
        for level in &chart {
            assert_eq!(level.letter_height_px, 16.0);
            assert!((level.font_size_px - 16.0 / 0.52).abs() < 1e-12);
            assert!(level.millimeters.is_none());
        }
    }

    #[test]
    fn test_render_chart_decreasing_sizes() {
        let cal = reference_calibration();
        let chart = render_chart(&AcuityTable::standard(), Some(&cal), &ChartConfig::default());
        for pair in chart.windows(2) {
            assert!(pair[0].letter_height_px > pair[1].letter_height_px);
        }
        assert_eq!(chart[0].label, "20/200");
    }
}
