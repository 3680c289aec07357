//! Budget tables and game simulation

use serde::Serialize;
use timeman::complexity::STARTING_NON_PAWN_MATERIAL;
use timeman::{
    Color, ComplexityModel, LimitsType, PositionSignals, TimeManagement, TimeOptions, TimePoint,
};

use crate::clock::GameClock;

/// Plies over which the simulated material drains to its endgame level
const MATERIAL_DRAIN_PLIES: i32 = 200;
/// Share of the starting material left once drained (%)
const ENDGAME_MATERIAL_PCT: i32 = 15;

/// One line of output
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BudgetRow {
    pub ply: i32,
    pub side: &'static str,
    pub time: TimePoint,
    pub inc: TimePoint,
    pub movestogo: i32,
    pub optimum: TimePoint,
    pub maximum: TimePoint,
    /// Time charged to the clock (simulation only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spent: Option<TimePoint>,
}

fn side_name(side: Color) -> &'static str {
    match side {
        Color::White => "white",
        Color::Black => "black",
    }
}

fn side_at(ply: i32) -> Color {
    // ply 1 is White's first move
    if ply % 2 == 1 {
        Color::White
    } else {
        Color::Black
    }
}

/// Non-pawn material assumed at `ply` when none is given
pub fn simulated_material(ply: i32) -> i32 {
    let floor = STARTING_NON_PAWN_MATERIAL * ENDGAME_MATERIAL_PCT / 100;
    let drained = (STARTING_NON_PAWN_MATERIAL - floor) * ply.clamp(0, MATERIAL_DRAIN_PLIES)
        / MATERIAL_DRAIN_PLIES;
    STARTING_NON_PAWN_MATERIAL - drained
}

/// Signals used by the tools for `ply`
pub fn signals_at(ply: i32, material: Option<i32>, eval: i32) -> PositionSignals {
    PositionSignals::new(ply)
        .with_eval(eval)
        .with_material(material.unwrap_or_else(|| simulated_material(ply)))
}

/// Budgets for a fixed clock reading over a range of plies
pub fn budget_table(
    template: &LimitsType,
    plies: impl IntoIterator<Item = i32>,
    material: Option<i32>,
    eval: i32,
    options: &TimeOptions,
) -> Vec<BudgetRow> {
    let mut tm = TimeManagement::new();
    plies
        .into_iter()
        .map(|ply| {
            let side = side_at(ply);
            let mut limits = template.clone();
            limits.set_start_time();
            let signals = signals_at(ply, material, eval);
            let (optimum, maximum) = tm.init(&mut limits, side, &signals, options);
            BudgetRow {
                ply,
                side: side_name(side),
                time: limits.time_left(side),
                inc: limits.increment(side),
                movestogo: limits.movestogo,
                optimum,
                maximum,
                spent: None,
            }
        })
        .collect()
}

/// Result of a simulated game
#[derive(Clone, Debug, Serialize)]
pub struct Simulation {
    /// Model the budgets were computed with
    pub model: ComplexityModel,
    pub rows: Vec<BudgetRow>,
    /// Side that ran out of time, if any
    pub flagged: Option<&'static str>,
}

/// Play `plies` half-moves where every search uses `spend_pct` percent of
/// its optimum budget.
///
/// Each side owns its own `TimeManagement`, as two engines would. In
/// node-time mode the spent nodes are converted back to milliseconds for the
/// clock at `nodes_per_ms`.
pub fn simulate(
    mut clock: GameClock,
    plies: i32,
    spend_pct: i64,
    eval: i32,
    options: &TimeOptions,
) -> Simulation {
    let mut managers = [TimeManagement::new(), TimeManagement::new()];
    let mut rows = Vec::with_capacity(plies.max(0) as usize);
    let mut side = Color::White;

    for ply in 1..=plies {
        let tm = &mut managers[side.index()];

        let mut limits = clock.limits(side);
        let signals = signals_at(ply, None, eval);
        let (optimum, maximum) = tm.init(&mut limits, side, &signals, options);

        let spent = (optimum.saturating_mul(spend_pct) / 100).min(maximum);
        let spent_ms = if tm.uses_node_time() {
            tm.on_search_finished(spent as u64, clock.increment());
            spent / options.nodes_per_ms.max(1)
        } else {
            spent
        };

        rows.push(BudgetRow {
            ply,
            side: side_name(side),
            time: limits.time_left(side),
            inc: limits.increment(side),
            movestogo: limits.movestogo,
            optimum,
            maximum,
            spent: Some(spent_ms),
        });

        clock.update_after_move(side, spent_ms);
        if clock.flagged(side) {
            log::warn!("{} flagged at ply {ply}", side_name(side));
            return Simulation {
                model: options.complexity_model,
                rows,
                flagged: Some(side_name(side)),
            };
        }
        side = side.opponent();
    }

    Simulation {
        model: options.complexity_model,
        rows,
        flagged: None,
    }
}
