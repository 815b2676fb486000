//! Transposition table keyed by Zobrist hash.
//! Owned by one search; entries carry a generation (one per deepening
//! iteration) and an insertion stamp used for aging.

use std::collections::HashMap;

use tracing::trace;

use crate::moves::Move;
use crate::scoring::DECISIVE;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    Exact,
    Lower,
    Upper,
}

#[derive(Debug, Clone)]
struct TtEntry {
    depth: i32,
    bound: Bound,
    score: i32,
    best: Option<Move>,
    generation: u32,
    stamp: u64,
}

/// Result of a probe: the stored move hint, the window after tightening by
/// the stored bound, and a score when that window closes.
#[derive(Debug, Clone, PartialEq)]
pub struct TtHit {
    pub best: Option<Move>,
    pub alpha: i32,
    pub beta: i32,
    pub score: Option<i32>,
}

#[derive(Debug)]
pub struct TranspositionTable {
    entries: HashMap<u64, TtEntry>,
    capacity: usize,
    evict_fraction: f64,
    generation: u32,
    clock: u64,
    pub probes: u64,
    pub hits: u64,
    pub cutoffs: u64,
}

impl TranspositionTable {
    pub fn new(capacity: usize, evict_fraction: f64) -> Self {
        TranspositionTable {
            entries: HashMap::new(),
            capacity: capacity.max(1),
            evict_fraction: evict_fraction.clamp(0.0, 1.0),
            generation: 0,
            clock: 0,
            probes: 0,
            hits: 0,
            cutoffs: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Call once per deepening iteration.
    #[inline]
    pub fn new_generation(&mut self) {
        self.generation = self.generation.wrapping_add(1);
    }

    /// Look up `hash` at `ply`. Bounds from entries searched at least `depth`
    /// deep tighten `alpha`/`beta`.
    pub fn probe(
        &mut self,
        hash: u64,
        depth: i32,
        ply: usize,
        alpha: i32,
        beta: i32,
    ) -> Option<TtHit> {
        self.probes += 1;
        let entry = self.entries.get(&hash)?;
        self.hits += 1;
        let score = score_from_tt(entry.score, ply);

        let mut hit = TtHit {
            best: entry.best.clone(),
            alpha,
            beta,
            score: None,
        };
        if entry.depth >= depth {
            match entry.bound {
                Bound::Exact => hit.score = Some(score),
                Bound::Lower => hit.alpha = hit.alpha.max(score),
                Bound::Upper => hit.beta = hit.beta.min(score),
            }
            if hit.score.is_none() && hit.alpha >= hit.beta {
                hit.score = Some(score);
            }
            if hit.score.is_some() {
                self.cutoffs += 1;
            }
        }
        Some(hit)
    }

    /// Stored move hint for `hash`, ignoring depth and bounds.
    pub fn best_move(&self, hash: u64) -> Option<Move> {
        self.entries.get(&hash).and_then(|e| e.best.clone())
    }

    /// Replacement: always over entries from an older generation, otherwise
    /// only when `depth` is at least the stored depth.
    pub fn store(
        &mut self,
        hash: u64,
        depth: i32,
        ply: usize,
        bound: Bound,
        score: i32,
        best: Option<Move>,
    ) {
        if let Some(old) = self.entries.get(&hash) {
            if old.generation == self.generation && depth < old.depth {
                return;
            }
        }
        self.clock += 1;
        self.entries.insert(
            hash,
            TtEntry {
                depth,
                bound,
                score: score_to_tt(score, ply),
                best,
                generation: self.generation,
                stamp: self.clock,
            },
        );
        if self.entries.len() > self.capacity {
            self.evict_oldest();
        }
    }

    /// Remove the oldest `evict_fraction` of entries, at least one.
    fn evict_oldest(&mut self) {
        let len = self.entries.len();
        let count = ((len as f64 * self.evict_fraction) as usize).clamp(1, len);
        let mut stamps: Vec<u64> = self.entries.values().map(|e| e.stamp).collect();
        let (_, &mut cutoff, _) = stamps.select_nth_unstable(count - 1);
        self.entries.retain(|_, e| e.stamp > cutoff);
        trace!(evicted = len - self.entries.len(), remaining = self.entries.len(), "tt eviction");
    }
}

/// Decisive scores count plies from the root. Stored entries count them from
/// the node instead, so a hit at another ply still reads the right distance.
fn score_to_tt(score: i32, ply: usize) -> i32 {
    let ply = ply as i32;
    if score >= DECISIVE {
        score + ply
    } else if score <= -DECISIVE {
        score - ply
    } else {
        score
    }
}

fn score_from_tt(score: i32, ply: usize) -> i32 {
    let ply = ply as i32;
    if score >= DECISIVE {
        score - ply
    } else if score <= -DECISIVE {
        score + ply
    } else {
        score
    }
}
