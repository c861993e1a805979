//! # acuity-chart
//!
//! Visual-acuity chart sizing for uncalibrated consumer displays.
//!
//! The library turns a user-matched reference object into a pixel density,
//! converts clinical angular sizes into exact pixel sizes for that density
//! and viewing distance, and drives which chart line and letter variant is
//! shown. Painting the result is left to the host.
//!
//! ## Quick Start
//!
//! ```rust
//! use acuity_chart::{ChartSession, Direction, DisplayInfo};
//!
//! let mut session = ChartSession::new(DisplayInfo::new(1920, 1080, 1.0));
//! session.confirm_calibration(315, 10.0)?;
//!
//! session.navigator().update(|nav| nav.handle_direction(Direction::Down));
//! let line = session.snapshot();
//! println!("{} {} @ {:.2}px", line.label, line.letters, line.rendered_font_size_px);
//! # Ok::<(), acuity_chart::Error>(())
//! ```
//!
//! ## Modules
//!
//! - [`error`]: Error types for the library
//! - [`calibration`]: Reference-object calibration
//! - [`table`]: The static acuity catalog
//! - [`renderer`]: Angular size to pixel size conversion
//! - [`navigation`]: Line and letter-variant state machine
//! - [`session`]: Host owning calibration and navigation
//! - [`config`]: Chart configuration

pub mod calibration;
pub mod config;
pub mod error;
pub mod navigation;
pub mod renderer;
pub mod session;
pub mod table;

// Re-export commonly used types
pub use calibration::{CalibrationRecord, DisplayInfo, compute_calibration, is_calibration_ready};
pub use config::ChartConfig;
pub use error::{Error, Result};
pub use navigation::{
    Direction, DisplaySnapshot, NavCommand, NavigationEngine, NavigationHandle, NavigationState,
    Navigator,
};
pub use renderer::{RenderedLevel, letter_height_px, rendered_font_size_px, render_chart};
pub use session::ChartSession;
pub use table::{AcuityLevel, AcuityTable, CATALOG};
