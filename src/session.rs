//! Testing session host.
//!
//! [`ChartSession`] owns the calibration record and the single navigation
//! engine for one run of the application. Widgets receive clones of the
//! [`NavigationHandle`] instead of looking each other up.

use log::debug;

use crate::calibration::{CalibrationRecord, DisplayInfo, compute_calibration};
use crate::config::ChartConfig;
use crate::error::Result;
use crate::navigation::{DisplaySnapshot, NavigationEngine, NavigationHandle};
use crate::renderer::{RenderedLevel, render_chart};
use crate::table::AcuityTable;

/// One calibration plus testing run.
///
/// # Example
///
/// ```
/// use acuity_chart::{ChartSession, DisplayInfo, Navigator};
///
/// let mut session = ChartSession::new(DisplayInfo::new(1440, 900, 1.0));
/// assert!(!session.is_testing_available());
///
/// session.confirm_calibration(315, 10.0).unwrap();
/// let mut controls = session.navigator();
/// controls.move_next();
///
/// let snapshot = session.snapshot();
/// assert_eq!(snapshot.label, "20/40");
/// ```
#[derive(Debug)]
pub struct ChartSession {
    display: DisplayInfo,
    calibration: Option<CalibrationRecord>,
    navigation: NavigationHandle,
}

impl ChartSession {
    /// Start a session over the built-in chart with default settings.
    #[must_use]
    pub fn new(display: DisplayInfo) -> Self {
        Self {
            display,
            calibration: None,
            navigation: NavigationHandle::new(NavigationEngine::standard()),
        }
    }

    /// Start a session with a custom table and configuration.
    pub fn with_config(
        display: DisplayInfo,
        table: AcuityTable,
        config: ChartConfig,
    ) -> Result<Self> {
        Ok(Self {
            display,
            calibration: None,
            navigation: NavigationHandle::new(NavigationEngine::new(table, config)?),
        })
    }

    /// Screen properties captured at startup.
    #[must_use]
    pub fn display(&self) -> DisplayInfo {
        self.display
    }

    /// Current calibration, if one has been confirmed.
    #[must_use]
    pub fn calibration(&self) -> Option<&CalibrationRecord> {
        self.calibration.as_ref()
    }

    /// Whether the testing view can be entered.
    #[must_use]
    pub fn is_testing_available(&self) -> bool {
        self.calibration.is_some()
    }

    /// Confirm calibration inputs and start testing from the default line.
    ///
    /// Replaces any earlier record. On error the previous record is kept.
    pub fn confirm_calibration(
        &mut self,
        reference_object_px: u32,
        viewing_distance_feet: f64,
    ) -> Result<&CalibrationRecord> {
        let record = compute_calibration(reference_object_px, viewing_distance_feet, self.display)?;
        if self.calibration.is_some() {
            debug!("session: replacing previous calibration");
        }
        self.navigation.update(NavigationEngine::reset);
        Ok(self.calibration.insert(record))
    }

    /// Discard the calibration and return navigation to its defaults.
    pub fn recalibrate(&mut self) {
        debug!("session: calibration discarded");
        self.calibration = None;
        self.navigation.update(NavigationEngine::reset);
    }

    /// Shared handle for widgets that drive navigation.
    #[must_use]
    pub fn navigator(&self) -> NavigationHandle {
        self.navigation.clone()
    }

    /// Forward the host's narrow-viewport signal.
    pub fn set_narrow_viewport(&self, narrow: bool) {
        self.navigation.update(|engine| engine.set_narrow_viewport(narrow));
    }

    /// Paint values for the current line.
    #[must_use]
    pub fn snapshot(&self) -> DisplaySnapshot {
        self.navigation.read(|engine| engine.snapshot(self.calibration.as_ref()))
    }

    /// Sizes for every line under the current calibration.
    #[must_use]
    pub fn chart(&self) -> Vec<RenderedLevel> {
        self.navigation.read(|engine| {
            render_chart(engine.table(), self.calibration.as_ref(), engine.config())
        })
    }
}
