//! Zobrist hashing. Keys are 64-bit, each assembled from two xorshift32 words
//! drawn in a fixed order from seed 0x12345678, so hashes are stable across
//! builds and targets.

use crate::board::{Board, Owner, NUM_KINDS};
use crate::geometry::NUM_POINTS;

const SEED: u32 = 0x12345678;

/// One xorshift32 step.
const fn xorshift32(mut s: u32) -> u32 {
    s ^= s << 13;
    s ^= s >> 17;
    s ^= s << 5;
    s
}

/// Order: every cell, every kind, host then guest; then the side key.
struct ZobristTables {
    piece_hash: [[[u64; 2]; NUM_KINDS]; NUM_POINTS + 1],
    side_hash: u64,
}

const fn generate_zobrist() -> ZobristTables {
    let mut rng_state: u32 = SEED;

    macro_rules! next_key {
        () => {{
            rng_state = xorshift32(rng_state);
            let hi = rng_state as u64;
            rng_state = xorshift32(rng_state);
            (hi << 32) | rng_state as u64
        }};
    }

    let mut piece_hash = [[[0u64; 2]; NUM_KINDS]; NUM_POINTS + 1];
    let mut p = 1;
    while p <= NUM_POINTS {
        let mut k = 0;
        while k < NUM_KINDS {
            piece_hash[p][k][0] = next_key!();
            piece_hash[p][k][1] = next_key!();
            k += 1;
        }
        p += 1;
    }

    let side_hash = next_key!();

    ZobristTables {
        piece_hash,
        side_hash,
    }
}

static ZOBRIST: ZobristTables = generate_zobrist();

/// Hash of `board` with `side` to move. Recomputed from scratch per node.
pub fn compute_hash(board: &Board, side: Owner) -> u64 {
    let mut h = 0u64;
    for (p, kind, owner) in board.occupied() {
        h ^= ZOBRIST.piece_hash[p][kind.index()][owner.index()];
    }
    if side == Owner::Guest {
        h ^= ZOBRIST.side_hash;
    }
    h
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::PieceKind;
    use crate::geometry::index_of;
    use std::collections::HashSet;

    #[test]
    fn test_xorshift32_sequence() {
        let v1 = xorshift32(SEED);
        let v2 = xorshift32(v1);
        assert_ne!(v1, 0);
        assert_ne!(v2, 0);
        assert_ne!(v1, v2);
    }

    #[test]
    fn test_tables_populated() {
        let mut seen = HashSet::new();
        for p in 1..=NUM_POINTS {
            for k in 0..NUM_KINDS {
                for o in 0..2 {
                    let key = ZOBRIST.piece_hash[p][k][o];
                    assert_ne!(key, 0);
                    assert!(seen.insert(key));
                }
            }
        }
        assert_ne!(ZOBRIST.side_hash, 0);
    }

    #[test]
    fn test_hash_deterministic() {
        let board = Board::new()
            .with(index_of(0, 0).unwrap(), PieceKind::Lotus, Owner::Host)
            .with(index_of(3, -2).unwrap(), PieceKind::RedFour, Owner::Guest);
        assert_eq!(compute_hash(&board, Owner::Host), compute_hash(&board.clone(), Owner::Host));
        assert_eq!(compute_hash(&Board::new(), Owner::Host), 0);
    }

    #[test]
    fn test_hash_distinguishes() {
        let p = index_of(1, 1).unwrap();
        let host = Board::new().with(p, PieceKind::RedThree, Owner::Host);
        let guest = Board::new().with(p, PieceKind::RedThree, Owner::Guest);
        let other = Board::new().with(p, PieceKind::RedFour, Owner::Host);
        assert_ne!(compute_hash(&host, Owner::Host), compute_hash(&guest, Owner::Host));
        assert_ne!(compute_hash(&host, Owner::Host), compute_hash(&other, Owner::Host));
        assert_ne!(compute_hash(&host, Owner::Host), compute_hash(&host, Owner::Guest));
    }
}
