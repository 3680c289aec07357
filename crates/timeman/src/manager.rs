//! Time management (TimeManagement)
//!
//! Turns the clock state of the current move into the optimum and maximum
//! budgets, and keeps what has to survive between moves of one match: the
//! node budget of node-time accounting.
//!
//! # Node-time accounting
//!
//! With a non-zero `nodestime` the budgets are measured in nodes instead of
//! milliseconds. The node budget is fixed on the first such `init` of the
//! match as `nodes_per_ms * time_left`; later calls run the curves on that
//! fixed budget and ignore the wall-clock reading, so the result does not
//! depend on hardware speed. `on_search_finished` carries the unused budget
//! (plus the increment) over to the next move, and `new_game` clears it.

use std::time::Instant;

use crate::complexity::PositionSignals;
use crate::curve::{BudgetKind, remaining};
use crate::limits::{LimitsType, TimePoint};
use crate::options::TimeOptions;
use crate::types::Color;

/// Per-match time management state
///
/// Owned by whatever drives the search; `init` is called once per move
/// before the search starts.
#[derive(Debug, Clone)]
pub struct TimeManagement {
    /// Search start of the current move
    start_time: Instant,

    /// Optimum thinking time (ms or nodes)
    optimum_time: TimePoint,

    /// Maximum thinking time (ms or nodes)
    maximum_time: TimePoint,

    /// Fixed node budget, set on the first node-time `init` of the match
    available_nodes: Option<TimePoint>,

    /// Nodes per millisecond of the last `init` (0 = wall clock)
    npmsec: i64,
}

impl Default for TimeManagement {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeManagement {
    /// Create a manager with zero budgets and no node budget
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            optimum_time: 0,
            maximum_time: 0,
            available_nodes: None,
            npmsec: 0,
        }
    }

    /// Compute the budgets of the current move
    ///
    /// Four kinds of time control are supported:
    ///
    /// - `inc == 0 && movestogo == 0`: x basetime (sudden death)
    /// - `inc == 0 && movestogo != 0`: x moves in y minutes
    /// - `inc >  0 && movestogo == 0`: x basetime + z increment
    /// - `inc >  0 && movestogo != 0`: x moves in y minutes + z increment
    ///
    /// In node-time mode `limits.time[us]` / `limits.inc[us]` are rewritten
    /// into nodes and `limits.npmsec` is set, so the driver sees the unit the
    /// budgets are in.
    ///
    /// Returns `(optimum, maximum)`; `maximum >= optimum >= 0` always holds.
    pub fn init(
        &mut self,
        limits: &mut LimitsType,
        us: Color,
        signals: &PositionSignals,
        options: &TimeOptions,
    ) -> (TimePoint, TimePoint) {
        let npmsec = options.nodes_per_ms.max(0);
        self.npmsec = npmsec;

        if npmsec != 0 {
            let available = *self.available_nodes.get_or_insert_with(|| {
                let nodes = npmsec.saturating_mul(limits.time_left(us).max(0));
                log::info!("[TimeBudget] node budget fixed at {nodes} nodes ({npmsec} nodes/ms)");
                nodes
            });

            limits.time[us.index()] = available;
            limits.inc[us.index()] = limits.increment(us).saturating_mul(npmsec);
            limits.npmsec = npmsec;
        }

        self.start_time = limits.start_time.unwrap_or_else(Instant::now);

        let inputs = options.complexity_model.curve_inputs(signals);
        let my_time = limits.time_left(us);
        let increment = limits.increment(us);
        let overhead = options.move_overhead.max(0);

        let [optimum, maximum] = BudgetKind::ALL.map(|kind| {
            remaining(
                kind,
                my_time,
                increment,
                overhead,
                limits.movestogo,
                inputs.move_number,
                inputs.complexity,
            )
        });

        self.optimum_time = optimum;
        self.maximum_time = maximum;

        if options.ponder {
            // The pondered optimum never crosses the hard ceiling.
            self.optimum_time = (self.optimum_time + self.optimum_time / 4).min(self.maximum_time);
        }

        log::debug!(
            "[TimeBudget] optimum={} maximum={} (time={} inc={} mtg={} mn={} complexity={:.3} unit={})",
            self.optimum_time,
            self.maximum_time,
            my_time,
            increment,
            limits.movestogo,
            inputs.move_number,
            inputs.complexity,
            if npmsec != 0 { "nodes" } else { "ms" }
        );

        (self.optimum_time, self.maximum_time)
    }

    /// Optimum thinking time
    #[inline]
    pub fn optimum(&self) -> TimePoint {
        self.optimum_time
    }

    /// Maximum thinking time
    #[inline]
    pub fn maximum(&self) -> TimePoint {
        self.maximum_time
    }

    /// Search start recorded by the last `init`
    #[inline]
    pub fn start_time(&self) -> Instant {
        self.start_time
    }

    /// Fixed node budget of the match, if node-time accounting was used
    #[inline]
    pub fn available_nodes(&self) -> Option<TimePoint> {
        self.available_nodes
    }

    /// Whether the last `init` ran in node-time mode
    #[inline]
    pub fn uses_node_time(&self) -> bool {
        self.npmsec != 0
    }

    /// Time spent on the current move in the active unit
    ///
    /// Nodes searched in node-time mode, milliseconds since `start_time`
    /// otherwise.
    pub fn elapsed(&self, nodes_searched: u64) -> TimePoint {
        if self.uses_node_time() {
            TimePoint::try_from(nodes_searched).unwrap_or(TimePoint::MAX)
        } else {
            self.start_time.elapsed().as_millis() as TimePoint
        }
    }

    /// Whether another iteration may be started after `elapsed`
    #[inline]
    pub fn can_start_iteration(&self, elapsed: TimePoint) -> bool {
        elapsed < self.optimum_time
    }

    /// Whether the search has to be aborted at `elapsed`
    #[inline]
    pub fn must_stop(&self, elapsed: TimePoint) -> bool {
        elapsed >= self.maximum_time
    }

    /// Settle the node budget after a move was searched
    ///
    /// Adds the increment (converted to nodes) and subtracts the nodes spent.
    /// The budget never goes below zero. No-op outside node-time mode.
    pub fn on_search_finished(&mut self, nodes_searched: u64, increment_ms: TimePoint) {
        if self.npmsec == 0 {
            return;
        }
        if let Some(available) = self.available_nodes.as_mut() {
            let spent = TimePoint::try_from(nodes_searched).unwrap_or(TimePoint::MAX);
            let gained = increment_ms.max(0).saturating_mul(self.npmsec);
            *available = available.saturating_add(gained).saturating_sub(spent).max(0);
            log::debug!("[TimeBudget] node budget now {} (spent={spent}, gained={gained})", *available);
        }
    }

    /// Forget the node budget; the next node-time `init` fixes a new one
    pub fn new_game(&mut self) {
        self.available_nodes = None;
        self.npmsec = 0;
        self.optimum_time = 0;
        self.maximum_time = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::TimeOptionsBuilder;

    fn limits_with(time: TimePoint, inc: TimePoint, movestogo: i32) -> LimitsType {
        let mut limits = LimitsType::new();
        limits.time = [time; Color::NUM];
        limits.inc = [inc; Color::NUM];
        limits.movestogo = movestogo;
        limits.set_start_time();
        limits
    }

    fn no_overhead() -> TimeOptions {
        TimeOptionsBuilder::new().move_overhead(0).unwrap().build()
    }

    #[test]
    fn test_new_is_empty() {
        let tm = TimeManagement::new();
        assert_eq!(tm.optimum(), 0);
        assert_eq!(tm.maximum(), 0);
        assert_eq!(tm.available_nodes(), None);
        assert!(!tm.uses_node_time());
    }

    #[test]
    fn test_init_records_start_time() {
        let mut limits = limits_with(60_000, 0, 0);
        let start = limits.start_time.unwrap();
        let mut tm = TimeManagement::new();
        tm.init(&mut limits, Color::White, &PositionSignals::new(1), &no_overhead());
        assert_eq!(tm.start_time(), start);
    }

    #[test]
    fn test_init_uses_side_to_move() {
        let mut limits = limits_with(60_000, 0, 0);
        limits.time[Color::Black.index()] = 5_000;
        let mut tm = TimeManagement::new();

        let (white_opt, _) =
            tm.init(&mut limits, Color::White, &PositionSignals::new(10), &no_overhead());
        let (black_opt, _) =
            tm.init(&mut limits, Color::Black, &PositionSignals::new(10), &no_overhead());
        assert!(black_opt < white_opt);
    }

    #[test]
    fn test_ponder_inflates_optimum_only() {
        let signals = PositionSignals::new(20);
        let mut tm = TimeManagement::new();

        let mut limits = limits_with(60_000, 500, 0);
        let (base_opt, base_max) = tm.init(&mut limits, Color::White, &signals, &no_overhead());

        let ponder = TimeOptionsBuilder::new().move_overhead(0).unwrap().ponder(true).build();
        let mut limits = limits_with(60_000, 500, 0);
        let (opt, max) = tm.init(&mut limits, Color::White, &signals, &ponder);

        assert_eq!(opt, base_opt + base_opt / 4);
        assert_eq!(max, base_max);
    }

    #[test]
    fn test_ponder_never_exceeds_maximum() {
        // One move left late in the game: both ratios clamp to 1
        let ponder = TimeOptionsBuilder::new().move_overhead(0).unwrap().ponder(true).build();
        let mut limits = limits_with(1_000, 0, 1);
        let mut tm = TimeManagement::new();
        let (opt, max) = tm.init(&mut limits, Color::White, &PositionSignals::new(100), &ponder);
        assert_eq!(max, 1_000);
        assert_eq!(opt, max);
    }

    #[test]
    fn test_node_time_rewrites_limits() {
        let options = TimeOptionsBuilder::new().nodes_per_ms(1000).unwrap().build();
        let mut limits = limits_with(10_000, 100, 0);
        let mut tm = TimeManagement::new();
        tm.init(&mut limits, Color::White, &PositionSignals::new(1), &options);

        assert_eq!(tm.available_nodes(), Some(10_000_000));
        assert_eq!(limits.time_left(Color::White), 10_000_000);
        assert_eq!(limits.increment(Color::White), 100_000);
        assert_eq!(limits.npmsec, 1000);
        assert!(tm.uses_node_time());
        // The other side is untouched
        assert_eq!(limits.time_left(Color::Black), 10_000);
    }

    #[test]
    fn test_elapsed_in_node_mode_counts_nodes() {
        let options = TimeOptionsBuilder::new().nodes_per_ms(10).unwrap().build();
        let mut limits = limits_with(10_000, 0, 0);
        let mut tm = TimeManagement::new();
        tm.init(&mut limits, Color::White, &PositionSignals::new(1), &options);

        assert_eq!(tm.elapsed(12_345), 12_345);
        assert_eq!(tm.elapsed(u64::MAX), TimePoint::MAX);
    }

    #[test]
    fn test_elapsed_in_wall_clock_mode() {
        let mut limits = limits_with(10_000, 0, 0);
        let mut tm = TimeManagement::new();
        tm.init(&mut limits, Color::White, &PositionSignals::new(1), &no_overhead());
        std::thread::sleep(std::time::Duration::from_millis(5));

        let elapsed = tm.elapsed(999_999_999);
        assert!(elapsed >= 5);
        assert!(elapsed < 999_999_999);
    }

    #[test]
    fn test_polling_decisions() {
        let mut limits = limits_with(60_000, 0, 0);
        let mut tm = TimeManagement::new();
        let (opt, max) =
            tm.init(&mut limits, Color::White, &PositionSignals::new(1), &no_overhead());

        assert!(tm.can_start_iteration(0));
        assert!(!tm.can_start_iteration(opt));
        assert!(!tm.must_stop(max - 1));
        assert!(tm.must_stop(max));
    }

    #[test]
    fn test_on_search_finished_settles_budget() {
        let options = TimeOptionsBuilder::new().nodes_per_ms(100).unwrap().build();
        let mut limits = limits_with(1_000, 10, 0);
        let mut tm = TimeManagement::new();
        tm.init(&mut limits, Color::White, &PositionSignals::new(1), &options);
        assert_eq!(tm.available_nodes(), Some(100_000));

        tm.on_search_finished(30_000, 10);
        assert_eq!(tm.available_nodes(), Some(71_000));

        tm.on_search_finished(1_000_000, 0);
        assert_eq!(tm.available_nodes(), Some(0));
    }

    #[test]
    fn test_on_search_finished_wall_clock_is_noop() {
        let mut limits = limits_with(1_000, 10, 0);
        let mut tm = TimeManagement::new();
        tm.init(&mut limits, Color::White, &PositionSignals::new(1), &no_overhead());
        tm.on_search_finished(30_000, 10);
        assert_eq!(tm.available_nodes(), None);
    }

    #[test]
    fn test_new_game_clears_node_budget() {
        let options = TimeOptionsBuilder::new().nodes_per_ms(100).unwrap().build();
        let mut tm = TimeManagement::new();

        let mut limits = limits_with(1_000, 0, 0);
        tm.init(&mut limits, Color::White, &PositionSignals::new(1), &options);
        assert_eq!(tm.available_nodes(), Some(100_000));

        tm.new_game();
        assert_eq!(tm.available_nodes(), None);
        assert_eq!(tm.optimum(), 0);

        let mut limits = limits_with(2_000, 0, 0);
        tm.init(&mut limits, Color::White, &PositionSignals::new(1), &options);
        assert_eq!(tm.available_nodes(), Some(200_000));
    }
}
