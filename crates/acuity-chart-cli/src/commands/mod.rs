//! CLI command implementations.

pub mod calibrate;
pub mod chart;
pub mod session;

use acuity_chart::{CalibrationRecord, DisplayInfo, compute_calibration};
use anyhow::{Context, Result};

use crate::CalibrationArgs;

impl CalibrationArgs {
    /// Platform properties as given on the command line.
    pub fn display(&self) -> DisplayInfo {
        DisplayInfo::new(self.screen_width, self.screen_height, self.pixel_density)
    }

    /// Card width to use, defaulting from the pixel ratio.
    pub fn card_width(&self) -> u32 {
        self.card_width
            .unwrap_or_else(|| self.display().suggested_reference_width_px())
    }

    /// Build the calibration record these arguments describe.
    pub fn record(&self, verbose: bool) -> Result<CalibrationRecord> {
        let width = self.card_width();
        if verbose && self.card_width.is_none() {
            eprintln!(
                "No --card-width given, using {width}px for pixel ratio {}",
                self.pixel_density
            );
        }
        compute_calibration(width, self.distance_ft, self.display())
            .context("Calibration inputs are not usable")
    }
}
