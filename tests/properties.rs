//! End-to-end checks of the public API.

use std::collections::HashSet;

use skud_ai::bonus::plan_wheel_rotation;
use skud_ai::geometry::{all_points, NUM_POINTS};
use skud_ai::harmony::build_harmony_graph;
use skud_ai::legality::detect_any_clash;
use skud_ai::rules::{harmonious_pair, Flower};
use skud_ai::{
    apply_move, coords_of, generate_legal_arrange_moves, index_of, pick_best_move, search,
    validate_arrange, wasm_pick_best_move, Board, Move, Owner, PieceKind, Point, SearchConfig,
    SearchOptions,
};

fn pt(x: i32, y: i32) -> Point {
    index_of(x, y).unwrap()
}

/// Deterministic scattered boards.
fn sample_boards() -> Vec<Board> {
    let mut state: u32 = 0x9E37_79B9;
    let mut next = move || {
        state ^= state << 13;
        state ^= state >> 17;
        state ^= state << 5;
        state
    };
    (0..12)
        .map(|_| {
            let mut board = Board::new();
            for _ in 0..14 {
                let p = (next() as usize % NUM_POINTS) + 1;
                let kind = PieceKind::ALL[next() as usize % PieceKind::ALL.len()];
                let owner = if next() % 2 == 0 { Owner::Host } else { Owner::Guest };
                board.place(p, kind, owner);
            }
            board
        })
        .collect()
}

#[test]
fn grid_has_249_points_and_round_trips() {
    let mut count = 0;
    for y in -8..=8 {
        for x in -8..=8 {
            if let Some(p) = index_of(x, y) {
                count += 1;
                assert_eq!(coords_of(p), Some((x, y)));
            }
        }
    }
    assert_eq!(count, 249);
    for p in all_points() {
        let (x, y) = coords_of(p).unwrap();
        assert_eq!(index_of(x, y), Some(p));
    }
    assert_eq!(coords_of(0), None);
    assert_eq!(coords_of(NUM_POINTS + 1), None);
}

#[test]
fn generated_arranges_validate_and_never_clash() {
    for board in sample_boards() {
        for side in [Owner::Host, Owner::Guest] {
            for mv in generate_legal_arrange_moves(&board, side) {
                let Move::Arrange { from, path } = &mv else {
                    panic!("arrange generator produced {mv:?}");
                };
                assert_eq!(validate_arrange(&board, *from, path), Ok(()));
                let next = apply_move(&board, side, &mv).unwrap();
                assert!(!detect_any_clash(&next));
            }
        }
    }
}

#[test]
fn harmony_is_symmetric_with_two_partners_each() {
    let flowers: Vec<Flower> = PieceKind::ALL.iter().filter_map(|&k| Flower::of(k)).collect();
    assert_eq!(flowers.len(), 6);
    let mut pairs = 0;
    for &a in &flowers {
        let partners = flowers.iter().filter(|&&b| harmonious_pair(a, b)).count();
        assert_eq!(partners, 2);
        for &b in &flowers {
            assert_eq!(harmonious_pair(a, b), harmonious_pair(b, a));
            if harmonious_pair(a, b) {
                pairs += 1;
            }
        }
    }
    assert_eq!(pairs / 2, 6);
}

#[test]
fn rock_between_flowers_cuts_the_edge() {
    let a = pt(0, -3);
    let b = pt(0, 4);
    let board = Board::new()
        .with(a, PieceKind::WhiteFour, Owner::Guest)
        .with(b, PieceKind::WhiteFive, Owner::Guest);
    assert!(build_harmony_graph(&board).has_edge(a, b));

    let mut rocked = board.clone();
    rocked.place(pt(0, 1), PieceKind::Rock, Owner::Host);
    assert!(!build_harmony_graph(&rocked).has_edge(a, b));

    rocked.remove(pt(0, 1));
    assert_eq!(rocked, board);
    assert!(build_harmony_graph(&rocked).has_edge(a, b));
}

#[test]
fn empty_board_has_no_best_move() {
    assert_eq!(pick_best_move(&Board::new(), Owner::Host, 3, &SearchOptions::default()), None);
}

#[test]
fn three_step_arrange_along_midline() {
    let from = pt(-1, 0);
    let board = Board::new().with(from, PieceKind::RedThree, Owner::Host);
    assert_eq!(validate_arrange(&board, from, &[pt(0, 0), pt(1, 0)]), Ok(()));
}

#[test]
fn full_wheel_rotation_is_a_permutation() {
    let center = pt(-3, -2);
    let mut board = Board::new().with(center, PieceKind::Wheel, Owner::Host);
    let mut sources = HashSet::new();
    for (dx, dy) in [(0, 1), (1, 1), (1, 0), (1, -1), (0, -1), (-1, -1), (-1, 0), (-1, 1)] {
        let p = pt(-3 + dx, -2 + dy);
        board.place(p, PieceKind::Rock, Owner::Guest);
        sources.insert(p);
    }

    let plan = plan_wheel_rotation(&board, Owner::Host, center).unwrap();
    assert_eq!(plan.shifts.len(), 8);
    let from: HashSet<Point> = plan.shifts.iter().map(|&(s, _)| s).collect();
    let to: HashSet<Point> = plan.shifts.iter().map(|&(_, t)| t).collect();
    assert_eq!(from, sources);
    assert_eq!(to, sources);
    assert!(plan.shifts.iter().all(|(s, t)| s != t));
}

#[test]
fn tight_budget_keeps_depth_one_answer() {
    let board = Board::new()
        .with(pt(-2, 1), PieceKind::RedFour, Owner::Host)
        .with(pt(1, -4), PieceKind::Lotus, Owner::Host)
        .with(pt(3, 3), PieceKind::WhiteFive, Owner::Guest)
        .with(pt(-5, -1), PieceKind::RedThree, Owner::Guest);
    let config = SearchConfig::default();

    let depth_one = search(&board, Owner::Host, 1, &SearchOptions::default(), &config);
    let rushed = search(&board, Owner::Host, 8, &SearchOptions { max_ms: Some(0) }, &config);
    assert_eq!(rushed.depth, 1);
    assert_eq!(rushed.best_move, depth_one.best_move);
    assert_eq!(rushed.best_score, depth_one.best_score);

    let deeper = search(&board, Owner::Host, 2, &SearchOptions::default(), &config);
    assert_eq!(deeper.depth, 2);
    let mv = deeper.best_move.unwrap();
    assert!(apply_move(&board, Owner::Host, &mv).is_ok());
}

#[test]
fn wasm_entry_round_trip() {
    let request = r#"{
        "pieces": [
            {"x": -1, "y": 0, "piece": "R3", "owner": "host"},
            {"x": 4, "y": 2, "piece": "W4", "owner": "guest"}
        ],
        "side": "host",
        "depth": 2,
        "config": {"ttCapacity": 5000}
    }"#;
    let out: serde_json::Value = serde_json::from_str(&wasm_pick_best_move(request)).unwrap();
    assert_eq!(out["move"]["kind"], "arrange");
    assert_eq!(out["depth"], 2);
    assert!(out["nodes"].as_u64().unwrap() > 0);

    let out: serde_json::Value = serde_json::from_str(&wasm_pick_best_move("not json")).unwrap();
    assert!(out["move"].is_null());
    assert_eq!(out["depth"], 0);

    let off_grid = serde_json::json!({
        "pieces": [{"x": 8, "y": 8, "piece": "L", "owner": "host"}],
        "side": "host",
    });
    let reply = wasm_pick_best_move(&off_grid.to_string());
    let out: serde_json::Value = serde_json::from_str(&reply).unwrap();
    assert!(out["move"].is_null());
}
