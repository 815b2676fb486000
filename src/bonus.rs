//! Special-piece effects: Wheel rotation, Boat on a flower, Boat on an accent.
//!
//! Planners are pure: they check the effect against the board and return a
//! plan or a `PlanRejection`. The `apply_*` functions re-plan against the
//! board they are given and return a new board.

use crate::board::{Board, Cell, Owner, PieceKind, EMPTY};
use crate::error::{PlanRejection, Result};
use crate::geometry::{is_adjacent8, is_valid, neighbors8, Point};
use crate::legality::detect_any_clash;
use crate::rules::{is_blooming, is_gate};

/// Pieces around a Wheel and where each one lands, one step clockwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WheelPlan {
    pub center: Point,
    /// (source, target) for each occupied ring slot.
    pub shifts: Vec<(Point, Point)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoatFlowerPlan {
    pub boat: Point,
    pub from: Point,
    pub to: Point,
}

/// The Boat and the accent it sinks are both removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoatAccentPlan {
    pub boat: Point,
    pub target: Point,
    pub removed: [Point; 2],
}

fn own_piece(
    board: &Board,
    side: Owner,
    p: Point,
    kind: PieceKind,
) -> std::result::Result<(), PlanRejection> {
    match board.piece(p) {
        Some((k, _)) if k != kind => Err(PlanRejection::WrongKind(p)),
        Some((_, o)) if o != side => Err(PlanRejection::NotOwnPiece(p)),
        Some(_) => Ok(()),
        None => Err(PlanRejection::WrongKind(p)),
    }
}

fn rotated(board: &Board, plan: &WheelPlan) -> Board {
    let mut next = board.clone();
    let moving: Vec<(Point, Cell)> = plan
        .shifts
        .iter()
        .map(|&(src, dst)| (dst, board.get(src)))
        .collect();
    for &(src, _) in &plan.shifts {
        next.set(src, EMPTY);
    }
    for (dst, cell) in moving {
        next.set(dst, cell);
    }
    next
}

/// Plan a one-step clockwise rotation of the pieces around the Wheel at
/// `center`. All eight ring cells must exist, no piece may land on a gate and
/// the rotated board must be free of clashes.
pub fn plan_wheel_rotation(
    board: &Board,
    side: Owner,
    center: Point,
) -> std::result::Result<WheelPlan, PlanRejection> {
    own_piece(board, side, center, PieceKind::Wheel)?;

    let ring = neighbors8(center);
    let mut slots = [0; 8];
    for (slot, cell) in slots.iter_mut().zip(ring.iter()) {
        *slot = cell.ok_or(PlanRejection::IncompleteRing(center))?;
    }

    let mut shifts = Vec::with_capacity(8);
    for i in 0..8 {
        if board.is_empty_at(slots[i]) {
            continue;
        }
        let target = slots[(i + 1) % 8];
        if is_gate(target) {
            return Err(PlanRejection::LandsOnGate(target));
        }
        shifts.push((slots[i], target));
    }
    if shifts.is_empty() {
        return Err(PlanRejection::NothingToRotate(center));
    }

    let plan = WheelPlan { center, shifts };
    if detect_any_clash(&rotated(board, &plan)) {
        return Err(PlanRejection::CreatesClash);
    }
    Ok(plan)
}

/// Plan moving the blooming flower at `from`, next to the Boat at `boat`,
/// onto the empty non-gate cell `to` next to it.
pub fn plan_boat_flower(
    board: &Board,
    side: Owner,
    boat: Point,
    from: Point,
    to: Point,
) -> std::result::Result<BoatFlowerPlan, PlanRejection> {
    own_piece(board, side, boat, PieceKind::Boat)?;
    if !is_valid(from) || !is_adjacent8(boat, from) {
        return Err(PlanRejection::NotAdjacent(boat, from));
    }
    match board.piece(from) {
        Some((kind, _)) if kind.is_flower() => {}
        _ => return Err(PlanRejection::NotAFlower(from)),
    }
    if !is_blooming(from) {
        return Err(PlanRejection::NotBlooming(from));
    }
    if !is_valid(to) || !is_adjacent8(from, to) {
        return Err(PlanRejection::NotAdjacent(from, to));
    }
    if !board.is_empty_at(to) {
        return Err(PlanRejection::TargetOccupied(to));
    }
    if is_gate(to) {
        return Err(PlanRejection::LandsOnGate(to));
    }

    let mut next = board.clone();
    next.set(to, board.get(from));
    next.set(from, EMPTY);
    if detect_any_clash(&next) {
        return Err(PlanRejection::CreatesClash);
    }
    Ok(BoatFlowerPlan { boat, from, to })
}

/// Plan removing the Boat at `boat` together with the adjacent non-Boat
/// accent at `target`.
pub fn plan_boat_accent(
    board: &Board,
    side: Owner,
    boat: Point,
    target: Point,
) -> std::result::Result<BoatAccentPlan, PlanRejection> {
    own_piece(board, side, boat, PieceKind::Boat)?;
    if !is_valid(target) || !is_adjacent8(boat, target) {
        return Err(PlanRejection::NotAdjacent(boat, target));
    }
    match board.piece(target) {
        Some((kind, _)) if kind.is_accent() && kind != PieceKind::Boat => {}
        _ => return Err(PlanRejection::NotAnAccent(target)),
    }

    let mut next = board.clone();
    next.set(boat, EMPTY);
    next.set(target, EMPTY);
    if detect_any_clash(&next) {
        return Err(PlanRejection::CreatesClash);
    }
    Ok(BoatAccentPlan {
        boat,
        target,
        removed: [boat, target],
    })
}

pub fn apply_wheel(board: &Board, side: Owner, center: Point) -> Result<Board> {
    let plan = plan_wheel_rotation(board, side, center)?;
    Ok(rotated(board, &plan))
}

pub fn apply_boat_flower(
    board: &Board,
    side: Owner,
    boat: Point,
    from: Point,
    to: Point,
) -> Result<Board> {
    let plan = plan_boat_flower(board, side, boat, from, to)?;
    let mut next = board.clone();
    next.set(plan.to, board.get(plan.from));
    next.set(plan.from, EMPTY);
    Ok(next)
}

pub fn apply_boat_accent(board: &Board, side: Owner, boat: Point, target: Point) -> Result<Board> {
    let plan = plan_boat_accent(board, side, boat, target)?;
    let mut next = board.clone();
    for p in plan.removed {
        next.set(p, EMPTY);
    }
    Ok(next)
}
