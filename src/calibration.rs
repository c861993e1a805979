//! Display calibration from a user-matched reference object.
//!
//! The user resizes an on-screen rectangle until it matches a physical credit
//! card held against the display. Because the card's real width is known, the
//! matched pixel width gives the display's true pixel density independent of
//! whatever the platform reports.
//!
//! ## Key Concepts
//!
//! - **reference_object_px**: The pixel width the user dialed in.
//! - **pixels_per_inch**: `reference_object_px / REFERENCE_WIDTH_INCHES`, kept at
//!   full precision.
//! - **viewing_distance_inches**: The entered distance in feet, times 12.
//! - **DisplayInfo**: Screen resolution and device pixel ratio as reported by the
//!   platform. Informational only; it never feeds the pixel density.

use std::fmt;
use std::ops::RangeInclusive;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Width of an ISO/IEC 7810 ID-1 card (a credit card), in inches.
pub const REFERENCE_WIDTH_INCHES: f64 = 3.375;

/// Height of an ISO/IEC 7810 ID-1 card, in inches.
pub const REFERENCE_HEIGHT_INCHES: f64 = 2.125;

/// Inches per foot, for the viewing-distance conversion.
pub const INCHES_PER_FOOT: f64 = 12.0;

/// Millimetres per inch.
pub const MM_PER_INCH: f64 = 25.4;

/// Adjustable range for the reference-object width, in pixels (step 1).
pub const REFERENCE_WIDTH_RANGE_PX: RangeInclusive<u32> = 50..=800;

/// Suggested range for the viewing distance, in feet.
pub const VIEWING_DISTANCE_RANGE_FT: RangeInclusive<f64> = 1.0..=50.0;

/// Increment for viewing-distance inputs, in feet.
pub const VIEWING_DISTANCE_STEP_FT: f64 = 0.5;

/// Viewing distance offered before the user enters one, in feet.
pub const DEFAULT_VIEWING_DISTANCE_FT: f64 = 10.0;

/// Screen properties reported by the platform at startup.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DisplayInfo {
    /// Native screen width in pixels.
    pub screen_width_px: u32,
    /// Native screen height in pixels.
    pub screen_height_px: u32,
    /// Device pixel ratio (reported, not verified).
    pub pixel_density: f64,
}

impl DisplayInfo {
    /// Capture platform-reported screen properties.
    ///
    /// A zero, negative or non-finite pixel ratio is reported as 1.0.
    #[must_use]
    pub fn new(screen_width_px: u32, screen_height_px: u32, pixel_density: f64) -> Self {
        let pixel_density = if pixel_density.is_finite() && pixel_density > 0.0 {
            pixel_density
        } else {
            1.0
        };
        Self {
            screen_width_px,
            screen_height_px,
            pixel_density,
        }
    }

    /// Starting reference width to offer before the user adjusts it.
    #[must_use]
    pub fn suggested_reference_width_px(&self) -> u32 {
        suggested_reference_width_px(self.pixel_density)
    }
}

impl Default for DisplayInfo {
    fn default() -> Self {
        Self::new(1920, 1080, 1.0)
    }
}

/// Starting reference width for a device pixel ratio.
///
/// | Pixel ratio | Width |
/// |-------------|-------|
/// | 1 | 315 px |
/// | 2 | 415 px |
/// | 3 | 515 px |
/// | other | 200 px |
#[must_use]
pub fn suggested_reference_width_px(pixel_density: f64) -> u32 {
    if pixel_density == 1.0 {
        315
    } else if pixel_density == 2.0 {
        415
    } else if pixel_density == 3.0 {
        515
    } else {
        200
    }
}

/// Clamp slider input to [`REFERENCE_WIDTH_RANGE_PX`].
#[must_use]
pub fn clamp_reference_width_px(width_px: u32) -> u32 {
    width_px.clamp(
        *REFERENCE_WIDTH_RANGE_PX.start(),
        *REFERENCE_WIDTH_RANGE_PX.end(),
    )
}

/// Snap a typed distance to the suggested range and step.
///
/// Non-finite input falls back to [`DEFAULT_VIEWING_DISTANCE_FT`].
#[must_use]
pub fn clamp_viewing_distance_ft(feet: f64) -> f64 {
    if !feet.is_finite() {
        return DEFAULT_VIEWING_DISTANCE_FT;
    }
    let snapped = (feet / VIEWING_DISTANCE_STEP_FT).round() * VIEWING_DISTANCE_STEP_FT;
    snapped.clamp(*VIEWING_DISTANCE_RANGE_FT.start(), *VIEWING_DISTANCE_RANGE_FT.end())
}

/// Height of the on-screen reference rectangle for a given width.
///
/// Keeps the card's aspect ratio.
#[must_use]
pub fn reference_object_height_px(width_px: u32) -> f64 {
    f64::from(width_px) * REFERENCE_HEIGHT_INCHES / REFERENCE_WIDTH_INCHES
}

/// Whether the confirm action should be enabled for these inputs.
#[must_use]
pub fn is_calibration_ready(reference_object_px: u32, viewing_distance_feet: f64) -> bool {
    reference_object_px > 0 && viewing_distance_feet.is_finite() && viewing_distance_feet > 0.0
}

/// Immutable result of a confirmed calibration.
///
/// Only [`compute_calibration`] builds one, so the pixel density, viewing
/// distance and pixels per inch are always finite and positive.
/// Re-running calibration produces a new record; nothing mutates an existing one.
///
/// Records cannot be assembled by hand or deserialized:
///
/// ```compile_fail
/// use acuity_chart::CalibrationRecord;
///
/// let _ = CalibrationRecord {
///     screen_width_px: 1920,
///     screen_height_px: 1080,
///     pixel_density: 1.0,
///     viewing_distance_inches: -120.0,
///     pixels_per_inch: 0.0,
///     reference_object_px: 315,
/// };
/// ```
///
/// ```compile_fail
/// use acuity_chart::CalibrationRecord;
///
/// let _: CalibrationRecord = serde_json::from_str("{}").unwrap();
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CalibrationRecord {
    screen_width_px: u32,
    screen_height_px: u32,
    pixel_density: f64,
    viewing_distance_inches: f64,
    pixels_per_inch: f64,
    reference_object_px: u32,
}

impl CalibrationRecord {
    /// Native screen width at calibration time.
    #[must_use]
    pub fn screen_width_px(&self) -> u32 {
        self.screen_width_px
    }

    /// Native screen height at calibration time.
    #[must_use]
    pub fn screen_height_px(&self) -> u32 {
        self.screen_height_px
    }

    /// Device pixel ratio at calibration time.
    #[must_use]
    pub fn pixel_density(&self) -> f64 {
        self.pixel_density
    }

    /// Viewing distance in inches.
    #[must_use]
    pub fn viewing_distance_inches(&self) -> f64 {
        self.viewing_distance_inches
    }

    /// Derived display density, unrounded.
    #[must_use]
    pub fn pixels_per_inch(&self) -> f64 {
        self.pixels_per_inch
    }

    /// Pixel width the user matched to the reference card.
    #[must_use]
    pub fn reference_object_px(&self) -> u32 {
        self.reference_object_px
    }

    /// Viewing distance converted back to feet.
    #[must_use]
    pub fn viewing_distance_feet(&self) -> f64 {
        self.viewing_distance_inches / INCHES_PER_FOOT
    }

    /// Height of the matched reference rectangle in pixels.
    #[must_use]
    pub fn reference_object_height_px(&self) -> f64 {
        reference_object_height_px(self.reference_object_px)
    }

    /// Convert a pixel length on this display to millimetres.
    #[must_use]
    pub fn px_to_mm(&self, px: f64) -> f64 {
        px / self.pixels_per_inch * MM_PER_INCH
    }
}

impl fmt::Display for CalibrationRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.1} ft ({}\") | {}x{} | {:.2} px/in",
            self.viewing_distance_feet(),
            self.viewing_distance_inches,
            self.screen_width_px,
            self.screen_height_px,
            self.pixels_per_inch
        )
    }
}

/// Build a calibration record from the user's confirmed inputs.
///
/// Pixel density depends only on the matched reference width; `display` is
/// carried along for reporting.
///
/// # Example
///
/// ```
/// use acuity_chart::calibration::{compute_calibration, DisplayInfo};
///
/// let record = compute_calibration(315, 10.0, DisplayInfo::default()).unwrap();
/// assert!((record.pixels_per_inch() - 93.333).abs() < 0.001);
/// assert_eq!(record.viewing_distance_inches(), 120.0);
///
/// assert!(compute_calibration(0, 10.0, DisplayInfo::default()).is_err());
/// ```
pub fn compute_calibration(
    reference_object_px: u32,
    viewing_distance_feet: f64,
    display: DisplayInfo,
) -> Result<CalibrationRecord> {
    if reference_object_px == 0 {
        return Err(Error::CalibrationNotReady {
            reason: "reference width must be positive".to_string(),
        });
    }
    if !(viewing_distance_feet.is_finite()
        && viewing_distance_feet > 0.0
        && (viewing_distance_feet * INCHES_PER_FOOT).is_finite())
    {
        return Err(Error::CalibrationNotReady {
            reason: format!("viewing distance must be positive, got {viewing_distance_feet}"),
        });
    }

    let display = DisplayInfo::new(
        display.screen_width_px,
        display.screen_height_px,
        display.pixel_density,
    );
    let record = CalibrationRecord {
        screen_width_px: display.screen_width_px,
        screen_height_px: display.screen_height_px,
        pixel_density: display.pixel_density,
        viewing_distance_inches: viewing_distance_feet * INCHES_PER_FOOT,
        pixels_per_inch: f64::from(reference_object_px) / REFERENCE_WIDTH_INCHES,
        reference_object_px,
    };
    debug!(
        "calibration: reference_px={} distance_in={} ppi={:.4}",
        record.reference_object_px, record.viewing_distance_inches, record.pixels_per_inch
    );
    Ok(record)
}
