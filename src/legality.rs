//! Arrange legality: path checks, line of sight and the post-move clash scan.

use crate::board::Board;
use crate::error::ArrangeRejection;
use crate::geometry::{all_points, axis_step, is_valid, manhattan, offset, Point};
use crate::rules::{
    blooming_basic_at, garden_at, is_clash_pair, is_gate, is_trapped, movement_limit, Flower,
};

/// Directions scanned from each piece so that every aligned pair is seen once.
const FORWARD: [(i32, i32); 2] = [(1, 0), (0, 1)];

/// True when `a` and `b` share an axis and every point strictly between them
/// is empty and not a gate.
pub fn line_of_sight_clear(board: &Board, a: Point, b: Point) -> bool {
    if !is_valid(a) || !is_valid(b) {
        return false;
    }
    let Some((dx, dy)) = axis_step(a, b) else {
        return false;
    };
    let mut cur = a;
    loop {
        let Some(next) = offset(cur, dx, dy) else {
            return false;
        };
        if next == b {
            return true;
        }
        if !board.is_empty_at(next) || is_gate(next) {
            return false;
        }
        cur = next;
    }
}

/// First occupied point seen from `p` along `(dx, dy)`. Sight stops at the
/// board edge and at empty gates.
#[inline]
pub(crate) fn first_in_sight(board: &Board, p: Point, dx: i32, dy: i32) -> Option<Point> {
    let mut cur = p;
    loop {
        let next = offset(cur, dx, dy)?;
        if !board.is_empty_at(next) {
            return Some(next);
        }
        if is_gate(next) {
            return None;
        }
        cur = next;
    }
}

/// Visit every aligned pair of blooming basics in clear sight of each other.
/// Stops early when `f` returns true and reports whether it did.
#[inline]
pub(crate) fn any_sighted_pair<F>(board: &Board, mut f: F) -> bool
where
    F: FnMut(Point, Flower, Point, Flower) -> bool,
{
    for p in all_points() {
        let Some(a) = blooming_basic_at(board, p) else {
            continue;
        };
        for &(dx, dy) in &FORWARD {
            let Some(q) = first_in_sight(board, p, dx, dy) else {
                continue;
            };
            if let Some(b) = blooming_basic_at(board, q) {
                if f(p, a, q, b) {
                    return true;
                }
            }
        }
    }
    false
}

/// Any aligned, unobstructed pair of blooming basics with the same number and
/// different gardens.
pub fn detect_any_clash(board: &Board) -> bool {
    any_sighted_pair(board, |_, a, _, b| is_clash_pair(a, b))
}

/// The board after moving the piece at `from` to `to`, capturing any occupant.
pub fn simulate_arrange(board: &Board, from: Point, to: Point) -> Board {
    let mut next = board.clone();
    let mover = next.get(from);
    next.set(from, 0);
    next.set(to, mover);
    next
}

/// Check an Arrange of the piece at `from` along `path`. The last point of
/// the path is the landing square.
pub fn validate_arrange(
    board: &Board,
    from: Point,
    path: &[Point],
) -> Result<(), ArrangeRejection> {
    let Some(&dest) = path.last() else {
        return Err(ArrangeRejection::EmptyPath);
    };
    if !is_valid(from) {
        return Err(ArrangeRejection::InvalidPoint(from));
    }
    let (kind, _) = board
        .piece(from)
        .ok_or(ArrangeRejection::NotArrangeable(from))?;
    let limit = movement_limit(kind).ok_or(ArrangeRejection::NotArrangeable(from))?;

    if is_trapped(board, from) {
        return Err(ArrangeRejection::Trapped(from));
    }

    if path.len() > limit {
        return Err(ArrangeRejection::TooLong {
            len: path.len(),
            limit,
        });
    }

    let mut prev = from;
    for (i, &p) in path.iter().enumerate() {
        if !is_valid(p) {
            return Err(ArrangeRejection::InvalidPoint(p));
        }
        if manhattan(prev, p) != 1 {
            return Err(ArrangeRejection::NotOrthogonal { from: prev, to: p });
        }
        if p == from || path[..i].contains(&p) {
            return Err(ArrangeRejection::Revisit(p));
        }
        prev = p;
    }

    if let Some(&blocked) = path[..path.len() - 1]
        .iter()
        .find(|&&p| !board.is_empty_at(p))
    {
        return Err(ArrangeRejection::Blocked(blocked));
    }

    if is_gate(dest) {
        return Err(ArrangeRejection::EndsOnGate(dest));
    }

    if let (Some(flower), Some(garden)) = (Flower::of(kind), garden_at(dest)) {
        if garden == flower.garden.opposite() {
            return Err(ArrangeRejection::WrongGarden {
                garden,
                point: dest,
            });
        }
    }

    if detect_any_clash(&simulate_arrange(board, from, dest)) {
        return Err(ArrangeRejection::CreatesClash);
    }

    Ok(())
}
