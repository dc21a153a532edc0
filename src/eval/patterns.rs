//! Pattern scores for Gomoku evaluation
//!
//! Fixed table mapping a run of consecutive stones (length, open ends) to a
//! score. Runs of five or more are always worth [`PatternScore::FIVE`].

/// Pattern scores for evaluation
pub struct PatternScore;

impl PatternScore {
    /// Five in a row - immediate win
    pub const FIVE: i32 = 1_000_000;

    /// Open four: _OOOO_ (unstoppable)
    pub const OPEN_FOUR: i32 = 100_000;
    /// Closed four: XOOOO_ or _OOOOX (one way to extend)
    pub const CLOSED_FOUR: i32 = 50_000;

    /// Open three: _OOO_ (becomes open four if not blocked)
    pub const OPEN_THREE: i32 = 10_000;
    /// Closed three: XOOO_ or _OOOX.
    /// Well below OPEN_THREE since the opponent has a clear blocking point.
    pub const CLOSED_THREE: i32 = 1_500;

    /// Open two: _OO_
    pub const OPEN_TWO: i32 = 1_000;
    /// Closed two: XOO_ or _OOX
    pub const CLOSED_TWO: i32 = 200;

    /// Single stone with room on both sides
    pub const OPEN_ONE: i32 = 10;
    /// Single stone against an edge or an opposing stone
    pub const CLOSED_ONE: i32 = 1;
}

/// Score of one run.
///
/// Runs with no open end cannot grow into five and score nothing, except a
/// completed five which always scores [`PatternScore::FIVE`].
#[inline]
#[must_use]
pub fn run_score(length: u32, open_ends: u32) -> i32 {
    match (length, open_ends) {
        (5.., _) => PatternScore::FIVE,
        (4, 2) => PatternScore::OPEN_FOUR,
        (4, 1) => PatternScore::CLOSED_FOUR,
        (3, 2) => PatternScore::OPEN_THREE,
        (3, 1) => PatternScore::CLOSED_THREE,
        (2, 2) => PatternScore::OPEN_TWO,
        (2, 1) => PatternScore::CLOSED_TWO,
        (1, 2) => PatternScore::OPEN_ONE,
        (1, 1) => PatternScore::CLOSED_ONE,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_score_hierarchy() {
        assert!(PatternScore::FIVE > PatternScore::OPEN_FOUR);
        assert!(PatternScore::OPEN_FOUR > PatternScore::CLOSED_FOUR);
        assert!(PatternScore::CLOSED_FOUR > PatternScore::OPEN_THREE);
        assert!(PatternScore::OPEN_THREE > PatternScore::CLOSED_THREE);
        assert!(PatternScore::CLOSED_THREE > PatternScore::OPEN_TWO);
        assert!(PatternScore::OPEN_TWO > PatternScore::CLOSED_TWO);
        assert!(PatternScore::CLOSED_TWO > PatternScore::OPEN_ONE);
        assert!(PatternScore::OPEN_ONE > PatternScore::CLOSED_ONE);
    }

    #[test]
    fn test_five_ignores_open_ends() {
        for open in 0..=2 {
            assert_eq!(run_score(5, open), PatternScore::FIVE);
            assert_eq!(run_score(7, open), PatternScore::FIVE);
        }
    }

    #[test]
    fn test_live_four_beats_blocked_four() {
        assert!(run_score(4, 2) > run_score(4, 1));
        assert!(run_score(4, 1) < run_score(5, 0));
    }

    #[test]
    fn test_dead_runs_score_zero() {
        for len in 1..=4 {
            assert_eq!(run_score(len, 0), 0);
        }
    }
}
