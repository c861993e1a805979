//! Line navigation for an acuity chart.
//!
//! [`NavigationEngine`] tracks which line of the chart is shown and which of
//! its letter variants. Moving between lines always returns to the first
//! variant; cycling variants never changes the line. Moves past either end of
//! the chart are no-ops.
//!
//! ## Input mapping
//!
//! | Input | Effect |
//! |-------|--------|
//! | up, left | previous line (larger letters) |
//! | down, right | next line (smaller letters) |
//! | tap left of the letters' midpoint | previous line, narrow viewports only |
//! | tap right of the letters' midpoint | next line, narrow viewports only |
//!
//! Hosts that need several widgets to drive one engine share a
//! [`NavigationHandle`] and talk to it through the [`Navigator`] trait.

use std::cell::RefCell;
use std::rc::Rc;

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::calibration::CalibrationRecord;
use crate::config::ChartConfig;
use crate::error::Result;
use crate::renderer::RenderedLevel;
use crate::table::{AcuityLevel, AcuityTable, VARIANT_COUNT};

/// Directional input from keys or arrow buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Toward larger letters.
    Up,
    /// Toward smaller letters.
    Down,
    /// Toward larger letters.
    Left,
    /// Toward smaller letters.
    Right,
}

impl Direction {
    /// The navigation command this direction triggers.
    #[must_use]
    pub fn command(self) -> NavCommand {
        match self {
            Self::Up | Self::Left => NavCommand::PrevLine,
            Self::Down | Self::Right => NavCommand::NextLine,
        }
    }
}

/// A discrete navigation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NavCommand {
    /// One line easier.
    PrevLine,
    /// One line harder.
    NextLine,
    /// Next letter variant on the same line.
    CycleLetters,
}

/// Position within the chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NavigationState {
    /// Index into the table, easiest first.
    pub level_index: usize,
    /// Letter variant, always below [`VARIANT_COUNT`].
    pub variant_index: usize,
}

/// Values the presentation layer paints after each state change.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplaySnapshot {
    /// Snellen label of the current line.
    pub label: &'static str,
    /// Snellen denominator of the current line.
    pub denominator: Option<u32>,
    /// Visible glyph height.
    pub letter_height_px: f64,
    /// Font size after cap-height correction.
    pub rendered_font_size_px: f64,
    /// Physical glyph height; absent until calibrated.
    pub millimeter_equivalent: Option<f64>,
    /// Letters of the current variant.
    pub letters: &'static str,
    /// Letter spacing for the current line and viewport.
    pub letter_spacing_em: f64,
    /// Current variant index.
    pub variant_index: usize,
    /// 1-based line number.
    pub line_number: usize,
    /// Total number of lines.
    pub line_count: usize,
    /// Whether a larger line exists.
    pub can_move_prev: bool,
    /// Whether a smaller line exists.
    pub can_move_next: bool,
    /// Whether narrow-viewport rules are active.
    pub narrow_viewport: bool,
}

/// State machine over the lines and letter variants of an [`AcuityTable`].
///
/// # Example
///
/// ```
/// use acuity_chart::navigation::{Direction, NavigationEngine};
///
/// let mut nav = NavigationEngine::standard();
/// assert_eq!(nav.current_level().label, "20/50");
///
/// nav.handle_direction(Direction::Down);
/// assert_eq!(nav.current_level().label, "20/40");
///
/// nav.cycle_letter_set();
/// assert_eq!(nav.state().variant_index, 1);
///
/// nav.handle_direction(Direction::Up);
/// assert_eq!(nav.state().variant_index, 0);
/// ```
#[derive(Debug, Clone)]
pub struct NavigationEngine {
    table: AcuityTable,
    config: ChartConfig,
    state: NavigationState,
    narrow_viewport: bool,
}

impl NavigationEngine {
    /// Create an engine positioned at the configured default line.
    pub fn new(table: AcuityTable, config: ChartConfig) -> Result<Self> {
        config.validate(&table)?;
        let state = NavigationState {
            level_index: config.default_level_index,
            variant_index: 0,
        };
        Ok(Self {
            table,
            config,
            state,
            narrow_viewport: false,
        })
    }

    /// Engine over the built-in chart with default settings.
    #[must_use]
    pub fn standard() -> Self {
        let config = ChartConfig::default();
        Self {
            table: AcuityTable::standard(),
            state: NavigationState {
                level_index: config.default_level_index,
                variant_index: 0,
            },
            config,
            narrow_viewport: false,
        }
    }

    /// Current position.
    #[must_use]
    pub fn state(&self) -> NavigationState {
        self.state
    }

    /// The table being navigated.
    #[must_use]
    pub fn table(&self) -> &AcuityTable {
        &self.table
    }

    /// Settings this engine was built with.
    #[must_use]
    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    /// Level at the current position.
    #[must_use]
    pub fn current_level(&self) -> &'static AcuityLevel {
        &self.table.levels()[self.state.level_index]
    }

    /// Letters currently shown.
    #[must_use]
    pub fn current_letters(&self) -> &'static str {
        self.current_level().letters(self.state.variant_index)
    }

    /// Whether a larger line exists.
    #[must_use]
    pub fn can_move_prev(&self) -> bool {
        self.state.level_index > 0
    }

    /// Whether a smaller line exists.
    #[must_use]
    pub fn can_move_next(&self) -> bool {
        self.state.level_index + 1 < self.table.len()
    }

    /// Advance to the next (smaller) line. Returns whether the line changed.
    pub fn move_to_next_line(&mut self) -> bool {
        if !self.can_move_next() {
            trace!("nav: already at last line {}", self.state.level_index);
            return false;
        }
        self.set_level(self.state.level_index + 1);
        true
    }

    /// Go back to the previous (larger) line. Returns whether the line changed.
    pub fn move_to_prev_line(&mut self) -> bool {
        if !self.can_move_prev() {
            trace!("nav: already at first line");
            return false;
        }
        self.set_level(self.state.level_index - 1);
        true
    }

    /// Show the next letter variant of the current line.
    pub fn cycle_letter_set(&mut self) {
        self.state.variant_index = (self.state.variant_index + 1) % VARIANT_COUNT;
        debug!(
            "nav: cycle letters level={} variant={}",
            self.state.level_index, self.state.variant_index
        );
    }

    /// Apply a command. Returns whether the state changed.
    pub fn apply(&mut self, command: NavCommand) -> bool {
        match command {
            NavCommand::PrevLine => self.move_to_prev_line(),
            NavCommand::NextLine => self.move_to_next_line(),
            NavCommand::CycleLetters => {
                self.cycle_letter_set();
                true
            }
        }
    }

    /// Apply a directional input.
    pub fn handle_direction(&mut self, direction: Direction) -> bool {
        self.apply(direction.command())
    }

    /// Interpret a horizontal tap on the letter block.
    ///
    /// Only active on narrow viewports. A tap exactly on the midpoint does
    /// nothing. Returns whether the line changed.
    pub fn handle_tap(&mut self, tap_x: f64, block_left: f64, block_width: f64) -> bool {
        if !self.narrow_viewport {
            trace!("nav: tap at {tap_x} ignored outside narrow viewport");
            return false;
        }
        let midpoint = block_left + block_width / 2.0;
        if tap_x < midpoint {
            self.move_to_prev_line()
        } else if tap_x > midpoint {
            self.move_to_next_line()
        } else {
            false
        }
    }

    /// Record the host's latest narrow-viewport signal.
    pub fn set_narrow_viewport(&mut self, narrow: bool) {
        if self.narrow_viewport != narrow {
            debug!("nav: narrow viewport {narrow}");
        }
        self.narrow_viewport = narrow;
    }

    /// Latest narrow-viewport signal.
    #[must_use]
    pub fn is_narrow_viewport(&self) -> bool {
        self.narrow_viewport
    }

    /// Letter spacing for the current line and viewport.
    ///
    /// Narrow viewports compress spacing on lines whose denominator exceeds
    /// the configured threshold.
    #[must_use]
    pub fn letter_spacing_em(&self) -> f64 {
        let compress = self.narrow_viewport
            && self
                .current_level()
                .denominator()
                .is_some_and(|d| d > self.config.narrow_spacing_threshold);
        if compress {
            self.config.narrow_letter_spacing_em
        } else {
            self.config.letter_spacing_em
        }
    }

    /// Jump to the line with the given label.
    pub fn jump_to_label(&mut self, label: &str) -> Result<bool> {
        let index = self.table.position_of(label)?;
        if index == self.state.level_index {
            return Ok(false);
        }
        self.set_level(index);
        Ok(true)
    }

    /// Return to the configured starting line and first variant.
    pub fn reset(&mut self) {
        self.state = NavigationState {
            level_index: self.config.default_level_index,
            variant_index: 0,
        };
        debug!("nav: reset to level {}", self.state.level_index);
    }

    /// Start over from the largest line.
    pub fn restart(&mut self) {
        self.state = NavigationState::default();
        debug!("nav: restart at first line");
    }

    /// Paint values for the current position.
    #[must_use]
    pub fn snapshot(&self, calibration: Option<&CalibrationRecord>) -> DisplaySnapshot {
        let level = self.current_level();
        let rendered = RenderedLevel::compute(level, calibration, &self.config);
        DisplaySnapshot {
            label: level.label,
            denominator: level.denominator(),
            letter_height_px: rendered.letter_height_px,
            rendered_font_size_px: rendered.font_size_px,
            millimeter_equivalent: rendered.millimeters,
            letters: self.current_letters(),
            letter_spacing_em: self.letter_spacing_em(),
            variant_index: self.state.variant_index,
            line_number: self.state.level_index + 1,
            line_count: self.table.len(),
            can_move_prev: self.can_move_prev(),
            can_move_next: self.can_move_next(),
            narrow_viewport: self.narrow_viewport,
        }
    }

    fn set_level(&mut self, index: usize) {
        self.state = NavigationState {
            level_index: index,
            variant_index: 0,
        };
        debug!(
            "nav: line {} of {} ({})",
            index + 1,
            self.table.len(),
            self.current_level().label
        );
    }
}

impl Default for NavigationEngine {
    fn default() -> Self {
        Self::standard()
    }
}

/// Capability handed to widgets that drive navigation.
pub trait Navigator {
    /// One line harder. Returns whether the line changed.
    fn move_next(&mut self) -> bool;
    /// One line easier. Returns whether the line changed.
    fn move_prev(&mut self) -> bool;
    /// Next letter variant on the same line.
    fn cycle_variant(&mut self);
    /// Current position.
    fn current_state(&self) -> NavigationState;
}

impl Navigator for NavigationEngine {
    fn move_next(&mut self) -> bool {
        self.move_to_next_line()
    }

    fn move_prev(&mut self) -> bool {
        self.move_to_prev_line()
    }

    fn cycle_variant(&mut self) {
        self.cycle_letter_set();
    }

    fn current_state(&self) -> NavigationState {
        self.state
    }
}

/// Shared, single-threaded handle to one [`NavigationEngine`].
///
/// Cloning the handle shares the engine, so a control bar and a letter
/// display can both hold one and observe each other's moves.
#[derive(Debug, Clone, Default)]
pub struct NavigationHandle {
    engine: Rc<RefCell<NavigationEngine>>,
}

impl NavigationHandle {
    /// Wrap an engine for sharing.
    #[must_use]
    pub fn new(engine: NavigationEngine) -> Self {
        Self {
            engine: Rc::new(RefCell::new(engine)),
        }
    }

    /// Run a closure with shared access to the engine.
    ///
    /// The borrow ends when the closure returns, so no reader can hold the
    /// engine across a later [`update`](Self::update).
    pub fn read<R>(&self, f: impl FnOnce(&NavigationEngine) -> R) -> R {
        f(&self.engine.borrow())
    }

    /// Run a closure with mutable access to the engine.
    pub fn update<R>(&self, f: impl FnOnce(&mut NavigationEngine) -> R) -> R {
        f(&mut *self.engine.borrow_mut())
    }
}

impl Navigator for NavigationHandle {
    fn move_next(&mut self) -> bool {
        self.update(NavigationEngine::move_to_next_line)
    }

    fn move_prev(&mut self) -> bool {
        self.update(NavigationEngine::move_to_prev_line)
    }

    fn cycle_variant(&mut self) {
        self.update(NavigationEngine::cycle_letter_set);
    }

    fn current_state(&self) -> NavigationState {
        self.read(NavigationEngine::state)
    }
}
