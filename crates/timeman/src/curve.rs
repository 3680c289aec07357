//! Budget curves
//!
//! Closed-form weighting functions that decide which share of the remaining
//! clock a single move may spend. Everything here is pure; the same curves
//! serve both budget kinds, which differ only in the scale constants of
//! [`CurveConstants`].
//!
//! Two regimes are distinguished:
//!
//! - *moves-to-go*: `x moves in y minutes`. The clock is split over the moves
//!   left before the next control, weighted by a move-number curve.
//! - *sudden death*: basetime (+ increment). A spend-up factor makes the
//!   engine spend a growing share of what is left as the game goes on.
//!
//! In both regimes the increment is folded in with a bell-shaped usage weight
//! centred on move 19, and the final ratio is clamped to `[0, 1]`.

use crate::limits::TimePoint;

// =============================================================================
// Constants
// =============================================================================

/// Complexity factor bounds
pub const MIN_COMPLEXITY: f64 = 0.2;
pub const MAX_COMPLEXITY: f64 = 1.2;

/// Move-number curve (moves-to-go regime)
const CURVE_PEAK_MOVE: f64 = 19.0;
const CURVE_FLOOR: f64 = 0.35;
const CURVE_BUMP: f64 = 1.65;
const CURVE_FLAT_AFTER: i32 = 40;
const CURVE_PLATEAU: f64 = 1.5;

/// Sudden-death spend-up factor: `1 + SD_GAIN * mn / (SD_HALF + mn)`
const SD_GAIN: f64 = 15.0;
const SD_HALF: f64 = 500.0;

/// Spend-up factor used when a time-control boundary exists. It only damps
/// the increment term there.
const MOVES_TO_GO_SD: f64 = 8.5;

/// Increment usage: `INC_BASE + INC_PEAK * gauss(mn, INC_CENTER, INC_WIDTH)`
const INC_BASE: f64 = 54.0;
const INC_PEAK: f64 = 44.0;
const INC_CENTER: f64 = 19.0;
const INC_WIDTH: f64 = 405.0;

// =============================================================================
// BudgetKind
// =============================================================================

/// Which of the two budgets is being computed
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BudgetKind {
    /// Target time; the driver stops deepening once it is spent
    Optimum,
    /// Hard ceiling; the search is aborted when it is reached
    Maximum,
}

impl BudgetKind {
    pub const ALL: [BudgetKind; 2] = [BudgetKind::Optimum, BudgetKind::Maximum];

    /// Scale constants of this kind
    #[inline]
    pub const fn constants(self) -> CurveConstants {
        match self {
            BudgetKind::Optimum => CurveConstants::OPTIMUM,
            BudgetKind::Maximum => CurveConstants::MAXIMUM,
        }
    }
}

/// Per-kind scale constants
///
/// Every `MAXIMUM` entry must be at least the `OPTIMUM` one; that is what
/// keeps `maximum >= optimum` for identical inputs.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CurveConstants {
    /// Share of the clock per remaining move in the moves-to-go regime
    pub moves_to_go_share: f64,
    /// Base ratio in the sudden-death regime (before the spend-up factor)
    pub sudden_death_base: f64,
}

impl CurveConstants {
    pub const OPTIMUM: Self = Self {
        moves_to_go_share: 1.0,
        sudden_death_base: 0.018,
    };

    pub const MAXIMUM: Self = Self {
        moves_to_go_share: 6.0,
        sudden_death_base: 0.074,
    };
}

// =============================================================================
// Curves
// =============================================================================

#[inline]
fn gauss(x: f64, center: f64, width: f64) -> f64 {
    (-(x - center) * (x - center) / width).exp()
}

/// Full-move number for a given ply
#[inline]
pub fn move_number(ply: i32) -> i32 {
    (ply.max(0) + 1) / 2
}

/// Move-number weighting of the moves-to-go regime
///
/// Rises from 0.35 at move 0, peaks at 2.0 on move 19 and settles on 1.5
/// from move 40 on, where classical controls reset the clock.
pub fn move_number_curve(mn: i32) -> f64 {
    if mn > CURVE_FLAT_AFTER {
        return CURVE_PLATEAU;
    }
    let x = f64::from(mn.max(0)) / CURVE_PEAK_MOVE;
    CURVE_FLOOR + CURVE_BUMP * x * (1.0 - x).exp()
}

/// Sudden-death spend-up factor, 1.0 at move 0 and rising with the move number
#[inline]
pub fn spend_up_factor(mn: i32) -> f64 {
    let mn = f64::from(mn.max(0));
    1.0 + SD_GAIN * mn / (SD_HALF + mn)
}

/// Weight of the increment, roughly 54..=98 with the maximum on move 19
#[inline]
pub fn increment_usage(mn: i32) -> f64 {
    INC_BASE + INC_PEAK * gauss(f64::from(mn), INC_CENTER, INC_WIDTH)
}

/// Clamp a complexity factor into its defined range (NaN counts as neutral)
#[inline]
pub fn clamp_complexity(complexity: f64) -> f64 {
    if complexity.is_nan() {
        return 1.0;
    }
    complexity.clamp(MIN_COMPLEXITY, MAX_COMPLEXITY)
}

/// Share of `my_time` a move may use, in `[0, 1]`
///
/// # Arguments
/// * `kind` - which budget
/// * `mn` - full-move number driving the curves
/// * `moves_to_go` - moves until the next control (0 = sudden death)
/// * `increment` - increment per move, same unit as `my_time`
/// * `my_time` - remaining time before overhead
/// * `complexity` - complexity factor, clamped to `[0.2, 1.2]`
pub fn budget_ratio(
    kind: BudgetKind,
    mn: i32,
    moves_to_go: i32,
    increment: TimePoint,
    my_time: TimePoint,
    complexity: f64,
) -> f64 {
    if my_time <= 0 {
        return 0.0;
    }

    let constants = kind.constants();
    let complexity = clamp_complexity(complexity);

    let (t_ratio, sd) = if moves_to_go > 0 {
        let share = constants.moves_to_go_share / f64::from(moves_to_go);
        (share * complexity * move_number_curve(mn), MOVES_TO_GO_SD)
    } else {
        let sd = spend_up_factor(mn);
        (constants.sudden_death_base * sd * complexity, sd)
    };

    let inc = increment.max(0) as f64;
    let ratio = t_ratio * (1.0 + increment_usage(mn) * inc / (my_time as f64 * sd));

    if ratio.is_finite() {
        ratio.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// Budget for one kind: `floor(max(0, my_time - move_overhead) * ratio)`
pub fn remaining(
    kind: BudgetKind,
    my_time: TimePoint,
    increment: TimePoint,
    move_overhead: TimePoint,
    moves_to_go: i32,
    mn: i32,
    complexity: f64,
) -> TimePoint {
    let usable = my_time.saturating_sub(move_overhead.max(0)).max(0);
    if usable == 0 {
        return 0;
    }

    let ratio = budget_ratio(kind, mn, moves_to_go, increment, my_time, complexity);
    (usable as f64 * ratio) as TimePoint
}
