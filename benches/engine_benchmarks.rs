//! Benchmarks for sowing and search performance.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::prelude::*;

use kalah_book::board::{Board, Recording, SearchParams, Side, Solver};

fn bench_sow(c: &mut Criterion) {
    let board = Board::new();
    c.bench_function("sow_all_opening_moves", |b| {
        b.iter(|| {
            for side in Side::BOTH {
                for well in board.legal_moves(side) {
                    black_box(board.sow(black_box(well), side));
                }
            }
        })
    });
}

fn bench_playout(c: &mut Criterion) {
    c.bench_function("random_playout_200", |b| {
        let mut rng = StdRng::seed_from_u64(7);
        b.iter(|| Board::new().random_playout(&mut rng, Side::South, black_box(200)))
    });
}

fn bench_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("search");
    group.sample_size(10);

    let opening = Board::new().apply_move(2, Side::South).unwrap().board;
    for horizon in 1..=2u32 {
        for (label, recording) in [
            ("off", Recording::Off),
            ("table", Recording::Table { capacity: 1 << 16 }),
        ] {
            let params = SearchParams {
                horizon: Some(horizon),
                recording,
                ..SearchParams::default()
            };
            group.bench_with_input(BenchmarkId::new(label, horizon), &params, |b, params| {
                b.iter(|| {
                    let mut solver = Solver::without_sink(params.clone()).unwrap();
                    solver.solve(opening, Side::North).unwrap().score
                })
            });
        }
    }

    let endgame = Board::from_pits([1, 2, 0, 0, 3, 0, 1, 10, 2, 0, 1, 0, 0, 2, 1, 9]);
    group.bench_function("endgame_exact", |b| {
        b.iter(|| {
            let mut solver = Solver::without_sink(SearchParams::default()).unwrap();
            solver.solve(black_box(endgame), Side::South).unwrap().score
        })
    });

    group.finish();
}

criterion_group!(benches, bench_sow, bench_playout, bench_search);
criterion_main!(benches);
