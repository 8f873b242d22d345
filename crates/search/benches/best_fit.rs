use cascade_core::{BucketShape, GameMap, OccupantId, Piece, Point, Shape};
use cascade_engine::{spawn_position, Board, BoardConfig, MotionQueue};
use cascade_eval::PlacementHeuristic;
use cascade_search::{AiConfig, Autopilot, BestFit, LookaheadFit};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn ragged_map() -> GameMap {
    let mut map = GameMap::new(10, 20, 4, BucketShape::Rectangular);
    let b = *map.bucket();
    let heights = [3, 5, 2, 0, 4, 6, 1, 3, 2, 0];
    for (i, h) in heights.into_iter().enumerate() {
        let x = b.left + i as i32;
        let column: Vec<Point> = (0..h).map(|l| Point::new(x, b.bottom - l)).collect();
        map.merge_points(&column, None);
    }
    map
}

fn bench_best_fit(c: &mut Criterion) {
    let map = ragged_map();
    for shape in Shape::ALL {
        let piece = Piece::spawn(OccupantId(200), shape, spawn_position(&map, shape));
        c.bench_function(&format!("best_fit_{:?}", shape), |b| {
            let mut ai = BestFit::default();
            let mut queue = MotionQueue::new();
            b.iter(|| ai.best_fit(black_box(&piece), black_box(&map), &mut queue))
        });
    }

    let piece = Piece::spawn(OccupantId(201), Shape::T, spawn_position(&map, Shape::T));
    c.bench_function("best_fit_rule_scoring_T", |b| {
        let mut ai = BestFit::new(AiConfig {
            heuristic: PlacementHeuristic::RuleScoring,
            ..AiConfig::default()
        });
        let mut queue = MotionQueue::new();
        b.iter(|| ai.best_fit(black_box(&piece), black_box(&map), &mut queue))
    });
}

fn bench_lookahead(c: &mut Criterion) {
    let map = ragged_map();
    let piece = Piece::spawn(OccupantId(202), Shape::L, spawn_position(&map, Shape::L));
    let preview = [Shape::I, Shape::S, Shape::T];

    for depth in 1..=2 {
        let la = LookaheadFit::new(depth, PlacementHeuristic::OffsetMapping);
        c.bench_function(&format!("lookahead_depth_{}", depth), |b| {
            b.iter(|| la.search(black_box(&piece), black_box(&map), black_box(&preview)))
        });
    }
}

fn bench_autopilot_game(c: &mut Criterion) {
    c.bench_function("autopilot_500_ticks", |b| {
        b.iter(|| {
            let mut board = Board::new(BoardConfig::classic()).expect("valid config");
            let mut pilot = Autopilot::default();
            pilot.play(&mut board, black_box(500))
        })
    });
}

criterion_group!(benches, bench_best_fit, bench_lookahead, bench_autopilot_game);
criterion_main!(benches);
