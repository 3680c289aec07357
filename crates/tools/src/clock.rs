//! Simulated game clock
//!
//! Keeps both sides' remaining time through a simulated game so the budgets
//! can be observed move after move.

use timeman::{Color, LimitsType, TimePoint};

/// Chess clock with optional increment and repeating moves-to-go controls
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GameClock {
    time: [TimePoint; Color::NUM],
    inc: TimePoint,
    /// Moves per control (0 = sudden death)
    moves_per_control: i32,
    /// Time added at each control
    control_time: TimePoint,
    /// Moves made by each side
    moves_made: [i32; Color::NUM],
}

impl GameClock {
    /// Sudden death (+ increment)
    pub fn sudden_death(time: TimePoint, inc: TimePoint) -> Self {
        Self {
            time: [time; Color::NUM],
            inc,
            moves_per_control: 0,
            control_time: 0,
            moves_made: [0; Color::NUM],
        }
    }

    /// `moves` moves in `time` milliseconds, repeating (+ increment)
    pub fn moves_in(moves: i32, time: TimePoint, inc: TimePoint) -> Self {
        Self {
            moves_per_control: moves.max(0),
            control_time: time,
            ..Self::sudden_death(time, inc)
        }
    }

    pub fn remaining(&self, side: Color) -> TimePoint {
        self.time[side.index()]
    }

    pub fn increment(&self) -> TimePoint {
        self.inc
    }

    /// Moves left before the next control for `side` (0 = sudden death)
    pub fn moves_to_go(&self, side: Color) -> i32 {
        if self.moves_per_control == 0 {
            return 0;
        }
        self.moves_per_control - self.moves_made[side.index()] % self.moves_per_control
    }

    /// Whether `side` has run out of time
    pub fn flagged(&self, side: Color) -> bool {
        self.time[side.index()] < 0
    }

    /// Limits for a `go` command with `side` to move
    pub fn limits(&self, side: Color) -> LimitsType {
        let mut limits = LimitsType::new();
        limits.time = self.time;
        limits.inc = [self.inc; Color::NUM];
        limits.movestogo = self.moves_to_go(side);
        limits.set_start_time();
        limits
    }

    /// Charge `elapsed_ms` to `side`, then add the increment and, at a
    /// control boundary, the control time.
    pub fn update_after_move(&mut self, side: Color, elapsed_ms: TimePoint) {
        let idx = side.index();
        self.time[idx] -= elapsed_ms.max(0);
        if self.time[idx] < 0 {
            return;
        }
        self.time[idx] += self.inc;
        self.moves_made[idx] += 1;
        if self.moves_per_control > 0 && self.moves_made[idx] % self.moves_per_control == 0 {
            self.time[idx] += self.control_time;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sudden_death_increment() {
        let mut clock = GameClock::sudden_death(10_000, 100);
        assert_eq!(clock.moves_to_go(Color::White), 0);

        clock.update_after_move(Color::White, 1_000);
        assert_eq!(clock.remaining(Color::White), 9_100);
        assert_eq!(clock.remaining(Color::Black), 10_000);
    }

    #[test]
    fn test_control_reset() {
        let mut clock = GameClock::moves_in(2, 1_000, 0);
        assert_eq!(clock.moves_to_go(Color::Black), 2);

        clock.update_after_move(Color::Black, 300);
        assert_eq!(clock.moves_to_go(Color::Black), 1);
        assert_eq!(clock.remaining(Color::Black), 700);

        clock.update_after_move(Color::Black, 200);
        assert_eq!(clock.moves_to_go(Color::Black), 2);
        assert_eq!(clock.remaining(Color::Black), 1_500);
    }

    #[test]
    fn test_flag_fall() {
        let mut clock = GameClock::sudden_death(100, 1_000);
        clock.update_after_move(Color::White, 150);
        assert!(clock.flagged(Color::White));
        // No increment after the flag fell
        assert_eq!(clock.remaining(Color::White), -50);
    }

    #[test]
    fn test_limits_snapshot() {
        let clock = GameClock::moves_in(40, 60_000, 500);
        let limits = clock.limits(Color::White);
        assert_eq!(limits.time_left(Color::White), 60_000);
        assert_eq!(limits.increment(Color::Black), 500);
        assert_eq!(limits.movestogo, 40);
        assert!(limits.start_time.is_some());
    }
}
