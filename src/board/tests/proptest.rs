//! Property-based tests using proptest.

use crate::board::{Board, Outcome, Recording, SearchParams, Side, Solver, StateKey, START_TOTAL};
use proptest::prelude::*;
use rand::prelude::*;

/// Strategy to generate a random playout length
fn ply_count_strategy() -> impl Strategy<Value = usize> {
    0..=80usize
}

/// Strategy to generate a random seed for move selection
fn seed_strategy() -> impl Strategy<Value = u64> {
    any::<u64>()
}

fn reachable(seed: u64, plies: usize) -> (Board, Side) {
    let mut rng = StdRng::seed_from_u64(seed);
    Board::new().random_playout(&mut rng, Side::South, plies)
}

proptest! {
    /// Property: every legal move conserves beads and never empties a store
    #[test]
    fn prop_moves_conserve_beads(seed in seed_strategy(), plies in ply_count_strategy()) {
        let (board, _) = reachable(seed, plies);
        prop_assert_eq!(board.total(), START_TOTAL);

        for side in Side::BOTH {
            for well in board.legal_moves(side) {
                let after = board.apply_move(well, side).unwrap().board;
                prop_assert_eq!(after.total(), START_TOTAL);
                for owner in Side::BOTH {
                    prop_assert!(after.store(owner) >= board.store(owner));
                }
            }
        }
    }

    /// Property: a decided win stays decided whatever is played
    #[test]
    fn prop_wins_are_final(seed in seed_strategy(), plies in ply_count_strategy()) {
        let (board, _) = reachable(seed, plies);
        if let Some(Outcome::Win(winner)) = board.outcome() {
            for side in Side::BOTH {
                for well in board.legal_moves(side) {
                    let after = board.apply_move(well, side).unwrap().board;
                    prop_assert_eq!(after.outcome(), Some(Outcome::Win(winner)));
                }
            }
        }
    }

    /// Property: the canonical key parses back to the same board
    #[test]
    fn prop_key_round_trip(seed in seed_strategy(), plies in ply_count_strategy()) {
        let (board, _) = reachable(seed, plies);
        let key = board.key();
        let parsed: StateKey = key.as_str().parse().unwrap();
        prop_assert_eq!(parsed.to_board().unwrap(), board);
    }

    /// Property: a stalled side's sweep always decides the game
    #[test]
    fn prop_sweep_decides(seed in seed_strategy(), plies in 40..=120usize) {
        let (mut board, to_move) = reachable(seed, plies);
        if board.outcome().is_none() && !board.has_moves(to_move) {
            board.sweep_remaining(to_move);
            prop_assert!(board.outcome().is_some());
            prop_assert_eq!(board.total(), START_TOTAL);
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    /// Property: cutoffs and the table never change a shallow search
    #[test]
    fn prop_shallow_search_is_stable(
        seed in seed_strategy(),
        plies in 10..=60usize,
        horizon in 1..=2u32,
    ) {
        let (board, to_move) = reachable(seed, plies);
        let base = SearchParams {
            horizon: Some(horizon),
            recording: Recording::Off,
            ..SearchParams::default()
        };
        let variants = [
            SearchParams { cutoff: false, ..base.clone() },
            SearchParams { recording: Recording::Table { capacity: 64 }, ..base.clone() },
        ];

        let mut solver = Solver::without_sink(base).unwrap();
        let expected = solver.solve(board, to_move).unwrap();

        for params in variants {
            let mut solver = Solver::without_sink(params).unwrap();
            let result = solver.solve(board, to_move).unwrap();
            prop_assert_eq!(result.score, expected.score);
            prop_assert_eq!(result.best_move, expected.best_move);
        }
    }
}
