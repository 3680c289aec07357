//! Search limits (LimitsType)
//!
//! Clock state for one `go` command, as handed to the time manager.

use std::time::Instant;

use crate::types::Color;

// =============================================================================
// TimePoint
// =============================================================================

/// Time in milliseconds, or nodes when node-time accounting is active
pub type TimePoint = i64;

// =============================================================================
// LimitsType
// =============================================================================

/// Clock state of the current move
#[derive(Clone, Debug, Default)]
pub struct LimitsType {
    /// Remaining time of both sides (ms)
    pub time: [TimePoint; Color::NUM],

    /// Increment per move of both sides (ms)
    pub inc: [TimePoint; Color::NUM],

    /// Moves until the next time control (0 = sudden death)
    pub movestogo: i32,

    /// Nodes per millisecond in effect for this search (0 = wall clock).
    /// Written by `TimeManagement::init` when node-time accounting is on.
    pub npmsec: i64,

    /// Instant the search began
    pub start_time: Option<Instant>,
}

impl LimitsType {
    /// Create empty limits
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the search start as now
    pub fn set_start_time(&mut self) {
        self.start_time = Some(Instant::now());
    }

    /// Remaining time of the given side
    #[inline]
    pub fn time_left(&self, color: Color) -> TimePoint {
        self.time[color.index()]
    }

    /// Increment of the given side
    #[inline]
    pub fn increment(&self, color: Color) -> TimePoint {
        self.inc[color.index()]
    }
}
