//! Time management for game-tree search engines
//!
//! Computes, once per move, an *optimum* and a *maximum* thinking time from
//! the clock state, the move number and a measure of position complexity.
//!
//! - [`curve`]: stateless budget curves (the ratio of the remaining time a
//!   move may use)
//! - [`complexity`]: which position signal feeds the curves
//! - [`options`]: `Move Overhead` / `nodestime` / `Ponder` style options
//! - [`manager`]: per-match state and the `init` orchestration
//!
//! ```
//! use timeman::{Color, LimitsType, PositionSignals, TimeManagement, TimeOptions};
//!
//! let mut limits = LimitsType::new();
//! limits.time[Color::White.index()] = 60_000;
//! limits.set_start_time();
//!
//! let mut tm = TimeManagement::new();
//! let signals = PositionSignals::new(1);
//! let (optimum, maximum) = tm.init(&mut limits, Color::White, &signals, &TimeOptions::default());
//! assert!(maximum >= optimum);
//! ```

pub mod complexity;
pub mod curve;
pub mod limits;
pub mod manager;
pub mod options;
pub mod types;

pub use complexity::{ComplexityModel, CurveInputs, PositionSignals};
pub use curve::{BudgetKind, CurveConstants, budget_ratio, remaining};
pub use limits::{LimitsType, TimePoint};
pub use manager::TimeManagement;
pub use options::{TimeOptionError, TimeOptions, TimeOptionsBuilder, constants};
pub use types::Color;
