//! The move sum type and move application.

use serde::{Deserialize, Serialize};

use crate::board::{Board, Owner};
use crate::bonus::{apply_boat_accent, apply_boat_flower, apply_wheel};
use crate::error::{ApplyError, Result};
use crate::geometry::Point;
use crate::legality::{simulate_arrange, validate_arrange};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Move {
    /// Multi-step orthogonal move; the last path entry is the landing square.
    Arrange { from: Point, path: Vec<Point> },
    Wheel { center: Point },
    BoatFlower { boat: Point, from: Point, to: Point },
    BoatAccent { boat: Point, target: Point },
}

/// Compact identity used by the killer and history tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MoveKey {
    tag: u8,
    a: u16,
    b: u16,
    c: u16,
}

impl Move {
    /// Square a piece lands on, for moves that land one.
    pub fn landing(&self) -> Option<Point> {
        match self {
            Move::Arrange { path, .. } => path.last().copied(),
            Move::BoatFlower { to, .. } => Some(*to),
            Move::Wheel { .. } | Move::BoatAccent { .. } => None,
        }
    }

    pub fn is_arrange(&self) -> bool {
        matches!(self, Move::Arrange { .. })
    }

    pub fn key(&self) -> MoveKey {
        let (tag, a, b, c) = match *self {
            Move::Arrange { from, ref path } => (0, from, path.last().copied().unwrap_or(0), 0),
            Move::Wheel { center } => (1, center, 0, 0),
            Move::BoatFlower { boat, from, to } => (2, boat, from, to),
            Move::BoatAccent { boat, target } => (3, boat, target, 0),
        };
        MoveKey {
            tag,
            a: a as u16,
            b: b as u16,
            c: c as u16,
        }
    }
}

/// Apply an Arrange for `side`, re-validating it against `board`.
pub fn apply_planned_arrange(
    board: &Board,
    side: Owner,
    from: Point,
    path: &[Point],
) -> Result<Board> {
    match board.piece(from) {
        Some((_, owner)) if owner != side => {
            return Err(ApplyError::WrongOwner { point: from, side });
        }
        _ => {}
    }
    validate_arrange(board, from, path)?;
    // validate_arrange guarantees a non-empty path.
    let dest = path[path.len() - 1];
    Ok(simulate_arrange(board, from, dest))
}

/// Apply any move for `side`, returning the new board.
pub fn apply_move(board: &Board, side: Owner, mv: &Move) -> Result<Board> {
    match mv {
        Move::Arrange { from, path } => apply_planned_arrange(board, side, *from, path),
        Move::Wheel { center } => apply_wheel(board, side, *center),
        Move::BoatFlower { boat, from, to } => apply_boat_flower(board, side, *boat, *from, *to),
        Move::BoatAccent { boat, target } => apply_boat_accent(board, side, *boat, *target),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::PieceKind;
    use crate::error::{ArrangeRejection, PlanRejection};
    use crate::geometry::index_of;

    fn pt(x: i32, y: i32) -> Point {
        index_of(x, y).unwrap()
    }

    #[test]
    fn test_apply_arrange() {
        let from = pt(-1, 0);
        let board = Board::new().with(from, PieceKind::RedThree, Owner::Host);
        let mv = Move::Arrange {
            from,
            path: vec![pt(0, 0), pt(1, 0)],
        };
        let next = apply_move(&board, Owner::Host, &mv).unwrap();
        assert!(next.is_empty_at(from));
        assert_eq!(next.piece(pt(1, 0)), Some((PieceKind::RedThree, Owner::Host)));
        assert_eq!(board.piece(from), Some((PieceKind::RedThree, Owner::Host)));
    }

    #[test]
    fn test_arrange_captures_own_piece() {
        let from = pt(-1, 0);
        let own = pt(1, 0);
        let board = Board::new()
            .with(from, PieceKind::RedThree, Owner::Host)
            .with(own, PieceKind::Rock, Owner::Host);
        let mv = Move::Arrange {
            from,
            path: vec![pt(0, 0), own],
        };
        assert!(crate::movegen::generate_legal_arrange_moves(&board, Owner::Host)
            .iter()
            .any(|m| m.landing() == Some(own)));

        let next = apply_move(&board, Owner::Host, &mv).unwrap();
        assert!(next.is_empty_at(from));
        assert_eq!(next.piece(own), Some((PieceKind::RedThree, Owner::Host)));
        assert_eq!(next.piece_count(), 1);
    }

    #[test]
    fn test_apply_rejects_wrong_owner() {
        let from = pt(-1, 0);
        let board = Board::new().with(from, PieceKind::RedThree, Owner::Host);
        assert_eq!(
            apply_planned_arrange(&board, Owner::Guest, from, &[pt(0, 0)]),
            Err(ApplyError::WrongOwner {
                point: from,
                side: Owner::Guest
            })
        );
    }

    #[test]
    fn test_apply_stale_plans() {
        let board = Board::new();
        assert_eq!(
            apply_move(
                &board,
                Owner::Host,
                &Move::Arrange {
                    from: pt(0, 0),
                    path: vec![pt(1, 0)]
                }
            ),
            Err(ApplyError::Arrange(ArrangeRejection::NotArrangeable(pt(0, 0))))
        );
        assert_eq!(
            apply_move(&board, Owner::Host, &Move::Wheel { center: pt(0, 0) }),
            Err(ApplyError::Plan(PlanRejection::WrongKind(pt(0, 0))))
        );
    }

    #[test]
    fn test_move_keys() {
        let a = Move::Arrange {
            from: 10,
            path: vec![11, 12],
        };
        let b = Move::Arrange {
            from: 10,
            path: vec![27, 12],
        };
        assert_eq!(a.key(), b.key());
        assert_ne!(a.key(), Move::Wheel { center: 10 }.key());
        assert_eq!(a.landing(), Some(12));
        assert_eq!(Move::Wheel { center: 10 }.landing(), None);
    }

    #[test]
    fn test_move_json_shape() {
        let mv = Move::BoatAccent { boat: 3, target: 4 };
        let json = serde_json::to_string(&mv).unwrap();
        assert_eq!(json, r#"{"kind":"boatAccent","boat":3,"target":4}"#);
        let back: Move = serde_json::from_str(&json).unwrap();
        assert_eq!(back, mv);
    }
}
