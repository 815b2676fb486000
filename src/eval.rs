//! Static evaluation: six features blended between opening and endgame
//! weights by how full the board is.

use serde::{Deserialize, Serialize};

use crate::board::{Board, Owner, PieceKind};
use crate::geometry::distance_to_center;
use crate::harmony::{build_harmony_graph, find_rings_in};
use crate::movegen::count_arrange_moves;
use crate::scoring::owned_rings;

/// Pieces within this Manhattan distance of the origin count as central.
const CENTER_RADIUS: i32 = 3;

/// Weight of one unit of each feature.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PhaseWeights {
    pub material: f64,
    pub piece_count: f64,
    pub harmony: f64,
    pub center: f64,
    pub mobility: f64,
    pub ring: f64,
}

impl PhaseWeights {
    const OPENING: PhaseWeights = PhaseWeights {
        material: 1.0,
        piece_count: 4.0,
        harmony: 12.0,
        center: 8.0,
        mobility: 0.5,
        ring: 400.0,
    };

    const ENDGAME: PhaseWeights = PhaseWeights {
        material: 1.5,
        piece_count: 6.0,
        harmony: 20.0,
        center: 4.0,
        mobility: 1.0,
        ring: 800.0,
    };

    /// `t * self + (1 - t) * other`.
    fn lerp(&self, other: &PhaseWeights, t: f64) -> PhaseWeights {
        let mix = |a: f64, b: f64| b + (a - b) * t;
        PhaseWeights {
            material: mix(self.material, other.material),
            piece_count: mix(self.piece_count, other.piece_count),
            harmony: mix(self.harmony, other.harmony),
            center: mix(self.center, other.center),
            mobility: mix(self.mobility, other.mobility),
            ring: mix(self.ring, other.ring),
        }
    }
}

impl Default for PhaseWeights {
    fn default() -> Self {
        PhaseWeights::OPENING
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EvalWeights {
    pub opening: PhaseWeights,
    pub endgame: PhaseWeights,
    /// Piece count at and above which the opening weights apply alone.
    pub max_pieces: f64,
}

impl Default for EvalWeights {
    fn default() -> Self {
        EvalWeights {
            opening: PhaseWeights::OPENING,
            endgame: PhaseWeights::ENDGAME,
            max_pieces: 40.0,
        }
    }
}

/// Host-minus-guest feature differences.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EvalFeatures {
    pub material: f64,
    pub piece_count: f64,
    pub harmony: f64,
    pub center: f64,
    pub mobility: f64,
    pub rings: f64,
}

impl EvalFeatures {
    fn dot(&self, w: &PhaseWeights) -> f64 {
        self.material * w.material
            + self.piece_count * w.piece_count
            + self.harmony * w.harmony
            + self.center * w.center
            + self.mobility * w.mobility
            + self.rings * w.ring
    }
}

/// Fixed material value per piece kind. Accents are worth nothing.
pub const fn material_value(kind: PieceKind) -> f64 {
    match kind {
        PieceKind::RedThree | PieceKind::WhiteThree => 30.0,
        PieceKind::RedFour | PieceKind::WhiteFour => 40.0,
        PieceKind::RedFive | PieceKind::WhiteFive => 50.0,
        PieceKind::Lotus => 60.0,
        PieceKind::Orchid => 70.0,
        PieceKind::Rock | PieceKind::Wheel | PieceKind::Boat | PieceKind::Knotweed => 0.0,
    }
}

pub fn extract_features(board: &Board, use_mobility: bool) -> EvalFeatures {
    let mut f = EvalFeatures::default();
    for (p, kind, owner) in board.occupied() {
        let s = owner.sign() as f64;
        f.material += s * material_value(kind);
        f.piece_count += s;
        if distance_to_center(p) <= CENTER_RADIUS {
            f.center += s;
        }
    }

    let graph = build_harmony_graph(board);
    f.harmony = graph.degree_of(board, Owner::Host) as f64
        - graph.degree_of(board, Owner::Guest) as f64;

    let rings = find_rings_in(&graph);
    if !rings.is_empty() {
        f.rings = owned_rings(board, &rings, Owner::Host) as f64
            - owned_rings(board, &rings, Owner::Guest) as f64;
    }

    if use_mobility {
        f.mobility = count_arrange_moves(board, Owner::Host) as f64
            - count_arrange_moves(board, Owner::Guest) as f64;
    }
    f
}

/// 1.0 (opening) for a full board down to 0.0 (endgame) for an empty one.
pub fn game_phase(board: &Board, max_pieces: f64) -> f64 {
    if max_pieces <= 0.0 {
        return 0.0;
    }
    (board.piece_count() as f64 / max_pieces).clamp(0.0, 1.0)
}

/// Static evaluation from `pov` with the default weights, mobility off.
#[inline]
pub fn evaluate(board: &Board, pov: Owner) -> f64 {
    evaluate_with(board, pov, &EvalWeights::default(), false)
}

pub fn evaluate_with(board: &Board, pov: Owner, weights: &EvalWeights, use_mobility: bool) -> f64 {
    let features = extract_features(board, use_mobility);
    let phase = game_phase(board, weights.max_pieces);
    let blended = weights.opening.lerp(&weights.endgame, phase);
    features.dot(&blended) * pov.sign() as f64
}
