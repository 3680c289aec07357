//! Position signals feeding the budget curves
//!
//! The curves take a move number and a complexity factor. Which position
//! signal produces them is a configuration choice:
//!
//! - [`ComplexityModel::Material`]: the move number is the real one and the
//!   complexity factor grows with the non-pawn material left on the board.
//! - [`ComplexityModel::Evaluation`]: a clear evaluation advances a
//!   *theoretical* move number (the game is treated as further along), and
//!   the complexity factor stays neutral.

use serde::{Deserialize, Serialize};

use crate::curve::{self, MAX_COMPLEXITY, MIN_COMPLEXITY};

/// Non-pawn material of both sides in the initial position
/// (2 × (2N + 2B + 2R + Q) with midgame values 817/836/1270/2521)
pub const STARTING_NON_PAWN_MATERIAL: i32 = 2 * (2 * 817 + 2 * 836 + 2 * 1270 + 2521);

/// Default weight of `sqrt(|eval|)` in the theoretical move number
pub const DEFAULT_EVAL_VOLATILITY: f64 = 0.4;

/// Per-move position signals supplied by the caller
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PositionSignals {
    /// Half-moves since the game start
    pub ply: i32,
    /// Static evaluation from the side to move, in centipawn-like units
    pub eval: i32,
    /// Non-pawn material of both sides
    pub non_pawn_material: i32,
}

impl PositionSignals {
    /// Signals for `ply` with a level evaluation and full material
    pub fn new(ply: i32) -> Self {
        Self {
            ply,
            eval: 0,
            non_pawn_material: STARTING_NON_PAWN_MATERIAL,
        }
    }

    pub fn with_eval(mut self, eval: i32) -> Self {
        self.eval = eval;
        self
    }

    pub fn with_material(mut self, non_pawn_material: i32) -> Self {
        self.non_pawn_material = non_pawn_material;
        self
    }
}

impl Default for PositionSignals {
    fn default() -> Self {
        Self::new(0)
    }
}

/// Inputs of the curves after applying a [`ComplexityModel`]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CurveInputs {
    /// Full-move number the curves are evaluated at
    pub move_number: i32,
    /// Complexity factor in `[0.2, 1.2]`
    pub complexity: f64,
}

/// Which position signal drives the curves
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "model", rename_all = "snake_case")]
pub enum ComplexityModel {
    /// Complexity from remaining non-pawn material
    #[default]
    Material,
    /// Theoretical move number from the evaluation
    Evaluation {
        #[serde(default = "default_volatility")]
        volatility: f64,
    },
}

fn default_volatility() -> f64 {
    DEFAULT_EVAL_VOLATILITY
}

impl ComplexityModel {
    /// Evaluation model with the default volatility
    pub fn evaluation() -> Self {
        ComplexityModel::Evaluation {
            volatility: DEFAULT_EVAL_VOLATILITY,
        }
    }

    /// Short name used by `setoption`
    pub fn name(&self) -> &'static str {
        match self {
            ComplexityModel::Material => "material",
            ComplexityModel::Evaluation { .. } => "evaluation",
        }
    }

    /// Parse a model name (case-insensitive)
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "material" => Some(ComplexityModel::Material),
            "evaluation" | "eval" => Some(ComplexityModel::evaluation()),
            _ => None,
        }
    }

    /// Derive the curve inputs for the given signals
    pub fn curve_inputs(&self, signals: &PositionSignals) -> CurveInputs {
        let mn = curve::move_number(signals.ply);
        match *self {
            ComplexityModel::Material => CurveInputs {
                move_number: mn,
                complexity: material_complexity(signals.non_pawn_material),
            },
            ComplexityModel::Evaluation { volatility } => CurveInputs {
                move_number: theoretical_move_number(mn, signals.eval, volatility),
                complexity: 1.0,
            },
        }
    }
}

/// Complexity factor from non-pawn material: 0.2 with bare kings, 1.2 with
/// everything on the board
pub fn material_complexity(non_pawn_material: i32) -> f64 {
    let raw = MIN_COMPLEXITY + f64::from(non_pawn_material) / f64::from(STARTING_NON_PAWN_MATERIAL);
    if !(MIN_COMPLEXITY..=MAX_COMPLEXITY).contains(&raw) {
        log::trace!("material {non_pawn_material} outside expected range, clamping complexity");
    }
    raw.clamp(MIN_COMPLEXITY, MAX_COMPLEXITY)
}

/// `max(1, round(mn - volatility * sqrt(|eval|)))`
pub fn theoretical_move_number(mn: i32, eval: i32, volatility: f64) -> i32 {
    let dependence = volatility.max(0.0) * f64::from(eval.unsigned_abs()).sqrt();
    let tmn = (f64::from(mn) - dependence).round();
    if tmn.is_finite() {
        (tmn as i32).max(1)
    } else {
        1
    }
}
