//! Move ordering: killer heuristic (2 slots per ply), history heuristic and a
//! static score of the position each move produces.

use std::collections::HashMap;

use crate::board::{Board, Owner};
use crate::eval::{evaluate_with, EvalWeights};
use crate::geometry::{distance_to_center, RADIUS};
use crate::moves::{Move, MoveKey};

// Ordering bonuses, added on top of the child's static evaluation.
const MO_CENTER: f64 = 3.0;
const MO_PATH: f64 = 0.5;

/// Deepest ply with killer slots.
pub const MAX_PLY_SLOTS: usize = 64;

/// A generated move with the board it leads to.
#[derive(Debug, Clone)]
pub struct ScoredMove {
    pub mv: Move,
    pub board: Board,
    pub score: f64,
}

impl ScoredMove {
    pub fn new(mv: Move, board: Board) -> Self {
        ScoredMove { mv, board, score: 0.0 }
    }
}

#[derive(Debug, Clone)]
pub struct MoveOrdering {
    killers: Vec<[Option<MoveKey>; 2]>,
    history: HashMap<MoveKey, i32>,
    history_cap: i32,
    killer_bonus: [f64; 2],
}

impl MoveOrdering {
    pub fn new(history_cap: i32, killer_bonus: [f64; 2]) -> Self {
        MoveOrdering {
            killers: vec![[None; 2]; MAX_PLY_SLOTS],
            history: HashMap::new(),
            history_cap,
            killer_bonus,
        }
    }

    /// Record a cutoff move at `ply`; a new killer pushes the old one to slot 2.
    pub fn record_killer(&mut self, ply: usize, key: MoveKey) {
        let Some(slots) = self.killers.get_mut(ply) else {
            return;
        };
        if slots[0] != Some(key) {
            slots[1] = slots[0];
            slots[0] = Some(key);
        }
    }

    pub fn record_history(&mut self, key: MoveKey, depth: i32) {
        let cap = self.history_cap;
        let h = self.history.entry(key).or_insert(0);
        *h = (*h + depth * depth).min(cap);
    }

    pub fn history(&self, key: MoveKey) -> i32 {
        self.history.get(&key).copied().unwrap_or(0)
    }

    /// Killer slot holding `key` at `ply`, if any.
    pub fn killer_slot(&self, ply: usize, key: MoveKey) -> Option<usize> {
        self.killers
            .get(ply)?
            .iter()
            .position(|k| *k == Some(key))
    }

    /// Score `moves` for `side` and sort best first; `tt_best` goes to the front.
    pub fn order_moves(
        &self,
        moves: &mut [ScoredMove],
        side: Owner,
        ply: usize,
        tt_best: Option<&Move>,
        weights: &EvalWeights,
        use_mobility: bool,
    ) {
        for m in moves.iter_mut() {
            let key = m.mv.key();
            let mut s = evaluate_with(&m.board, side, weights, use_mobility);

            if let Some(dest) = m.mv.landing() {
                s += (RADIUS - distance_to_center(dest)) as f64 * MO_CENTER;
            }
            if let Move::Arrange { path, .. } = &m.mv {
                s += path.len() as f64 * MO_PATH;
            }
            if let Some(slot) = self.killer_slot(ply, key) {
                s += self.killer_bonus[slot];
            }
            s += self.history(key) as f64;
            m.score = s;
        }

        // Stable, so equal scores keep generation order.
        moves.sort_by(|a, b| b.score.total_cmp(&a.score));

        if let Some(best) = tt_best {
            if let Some(i) = moves.iter().position(|m| &m.mv == best) {
                moves[..=i].rotate_right(1);
            }
        }
    }
}
