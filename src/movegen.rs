//! Move generation: Arrange destinations per piece plus Wheel and Boat bonus moves.
//! Every candidate is checked by the same routines that apply moves, so the
//! search only sees moves that apply cleanly.

use std::collections::{HashSet, VecDeque};

use crate::board::{Board, Owner, PieceKind};
use crate::bonus::{apply_boat_accent, apply_boat_flower, apply_wheel};
use crate::geometry::{neighbors8, orthogonal_neighbors, Point, NUM_POINTS};
use crate::legality::validate_arrange;
use crate::moves::Move;
use crate::rules::{is_trapped, movement_limit};

const UNSEEN: u8 = u8::MAX;

/// Reusable BFS scratch space for one side's Arrange generation.
struct Reach {
    dist: [u8; NUM_POINTS + 1],
    parent: [Point; NUM_POINTS + 1],
    queue: VecDeque<Point>,
}

impl Reach {
    fn new() -> Self {
        Reach {
            dist: [UNSEEN; NUM_POINTS + 1],
            parent: [0; NUM_POINTS + 1],
            queue: VecDeque::with_capacity(64),
        }
    }

    fn path_to(&self, from: Point, to: Point) -> Vec<Point> {
        let mut path = Vec::with_capacity(self.dist[to] as usize);
        let mut cur = to;
        while cur != from {
            path.push(cur);
            cur = self.parent[cur];
        }
        path.reverse();
        path
    }

    /// Breadth-first walk over empty cells up to `limit` steps. Each newly
    /// reached cell is offered as a landing square along its shortest path.
    fn expand<F>(&mut self, from: Point, limit: usize, board: &Board, mut visit: F)
    where
        F: FnMut(Vec<Point>),
    {
        self.dist.fill(UNSEEN);
        self.queue.clear();
        self.dist[from] = 0;
        self.queue.push_back(from);

        while let Some(cur) = self.queue.pop_front() {
            let d = self.dist[cur];
            if d as usize >= limit {
                continue;
            }
            for next in orthogonal_neighbors(cur) {
                if self.dist[next] != UNSEEN {
                    continue;
                }
                self.dist[next] = d + 1;
                self.parent[next] = cur;
                visit(self.path_to(from, next));
                if board.is_empty_at(next) {
                    self.queue.push_back(next);
                }
            }
        }
    }
}

/// All legal Arrange moves for `side`, one per reachable landing square.
///
/// Each landing square gets a single shortest path; other valid paths to the
/// same square are not emitted. The set of reachable destinations is the same
/// as enumerating every path.
pub fn generate_legal_arrange_moves(board: &Board, side: Owner) -> Vec<Move> {
    let mut moves = Vec::new();
    let mut reach = Reach::new();
    for (from, kind, owner) in board.occupied() {
        if owner != side {
            continue;
        }
        let Some(limit) = movement_limit(kind) else {
            continue;
        };
        if is_trapped(board, from) {
            continue;
        }
        reach.expand(from, limit, board, |path| {
            if validate_arrange(board, from, &path).is_ok() {
                moves.push(Move::Arrange { from, path });
            }
        });
    }
    moves
}

/// Number of legal Arrange moves for `side`.
pub fn count_arrange_moves(board: &Board, side: Owner) -> usize {
    generate_legal_arrange_moves(board, side).len()
}

fn own_pieces(board: &Board, side: Owner, kind: PieceKind) -> impl Iterator<Item = Point> + '_ {
    board
        .occupied()
        .filter(move |&(_, k, o)| k == kind && o == side)
        .map(|(p, _, _)| p)
}

pub fn generate_wheel_bonus_moves(board: &Board, side: Owner) -> Vec<Move> {
    own_pieces(board, side, PieceKind::Wheel)
        .filter(|&center| apply_wheel(board, side, center).is_ok())
        .map(|center| Move::Wheel { center })
        .collect()
}

pub fn generate_boat_flower_bonus_moves(board: &Board, side: Owner) -> Vec<Move> {
    let mut seen = HashSet::new();
    let mut moves = Vec::new();
    for boat in own_pieces(board, side, PieceKind::Boat) {
        for from in neighbors8(boat).into_iter().flatten() {
            if !matches!(board.piece(from), Some((k, _)) if k.is_flower()) {
                continue;
            }
            for to in neighbors8(from).into_iter().flatten() {
                if !board.is_empty_at(to) || !seen.insert((boat, from, to)) {
                    continue;
                }
                if apply_boat_flower(board, side, boat, from, to).is_ok() {
                    moves.push(Move::BoatFlower { boat, from, to });
                }
            }
        }
    }
    moves
}

pub fn generate_boat_accent_bonus_moves(board: &Board, side: Owner) -> Vec<Move> {
    let mut seen = HashSet::new();
    let mut moves = Vec::new();
    for boat in own_pieces(board, side, PieceKind::Boat) {
        for target in neighbors8(boat).into_iter().flatten() {
            if !seen.insert((boat, target)) {
                continue;
            }
            if apply_boat_accent(board, side, boat, target).is_ok() {
                moves.push(Move::BoatAccent { boat, target });
            }
        }
    }
    moves
}

/// Every candidate move for `side`: Arrange moves first, then bonus moves.
pub fn generate_all_moves(board: &Board, side: Owner) -> Vec<Move> {
    let mut moves = generate_legal_arrange_moves(board, side);
    moves.extend(generate_wheel_bonus_moves(board, side));
    moves.extend(generate_boat_flower_bonus_moves(board, side));
    moves.extend(generate_boat_accent_bonus_moves(board, side));
    moves
}

pub fn count_moves(board: &Board, side: Owner) -> usize {
    generate_all_moves(board, side).len()
}
