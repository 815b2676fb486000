//! Terminal scoring: a side that owns a harmony ring has won.

use crate::board::{Board, Owner};
use crate::harmony::{find_harmony_rings, HarmonyRing};

/// Score of a won position before the ply adjustment.
pub const WIN_SCORE: i32 = 100_000;

/// Scores at or beyond this magnitude are forced wins or losses.
pub const DECISIVE: i32 = WIN_SCORE - 1_000;

/// Rings among `rings` owned entirely by `owner`.
pub fn owned_rings(board: &Board, rings: &[HarmonyRing], owner: Owner) -> usize {
    rings.iter().filter(|r| r.owner(board) == Some(owner)).count()
}

/// The side owning a ring on `board`, host checked first.
pub fn winner(board: &Board) -> Option<Owner> {
    let rings = find_harmony_rings(board);
    [Owner::Host, Owner::Guest]
        .into_iter()
        .find(|&side| owned_rings(board, &rings, side) > 0)
}

/// Terminal score from `pov`, reached `ply` moves below the root. Faster wins
/// score higher and slower losses score less badly.
pub fn terminal_score(board: &Board, pov: Owner, ply: usize) -> Option<i32> {
    let ply = ply as i32;
    winner(board).map(|side| {
        if side == pov {
            WIN_SCORE - ply
        } else {
            -WIN_SCORE + ply
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::PieceKind;
    use crate::geometry::{index_of, Point};

    fn pt(x: i32, y: i32) -> Point {
        index_of(x, y).unwrap()
    }

    fn ring_board(owner: Owner) -> Board {
        Board::new()
            .with(pt(-2, 2), PieceKind::WhiteThree, owner)
            .with(pt(2, 2), PieceKind::WhiteFour, owner)
            .with(pt(2, -2), PieceKind::WhiteThree, owner)
            .with(pt(-2, -2), PieceKind::WhiteFour, owner)
    }

    #[test]
    fn test_no_winner_on_empty_board() {
        assert_eq!(winner(&Board::new()), None);
        assert_eq!(terminal_score(&Board::new(), Owner::Host, 0), None);
    }

    #[test]
    fn test_ring_owner_wins() {
        let board = ring_board(Owner::Guest);
        assert_eq!(winner(&board), Some(Owner::Guest));
        assert_eq!(terminal_score(&board, Owner::Guest, 3), Some(WIN_SCORE - 3));
        assert_eq!(terminal_score(&board, Owner::Host, 3), Some(-WIN_SCORE + 3));
    }

    #[test]
    fn test_shared_ring_wins_nobody() {
        let mut board = ring_board(Owner::Host);
        board.place(pt(2, 2), PieceKind::WhiteFour, Owner::Guest);
        assert_eq!(winner(&board), None);
    }
}
