//! Core search engine: negamax with alpha-beta pruning, iterative deepening,
//! aspiration windows at the root, late-move reductions and a transposition
//! table. All mutable search state lives in one `SearchContext` per call.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

use crate::board::{Board, Owner};
use crate::eval::{evaluate_with, EvalWeights};
use crate::movegen::generate_all_moves;
use crate::moves::{apply_move, Move};
use crate::ordering::{MoveOrdering, ScoredMove};
use crate::scoring::{terminal_score, DECISIVE};
use crate::tt::{Bound, TranspositionTable};
use crate::zobrist::compute_hash;

/// Bound on every score the search produces.
pub const INF: i32 = 1_000_000;

/// Get current time in milliseconds (via js_sys in WASM, or std in native).
#[cfg(target_arch = "wasm32")]
fn now_ms() -> f64 {
    js_sys::Date::now()
}

#[cfg(not(target_arch = "wasm32"))]
fn now_ms() -> f64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as f64)
        .unwrap_or(0.0)
}

// =====================================================================
// Configuration and results
// =====================================================================

/// Tuning knobs. Every field has a default, so partial JSON is accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SearchConfig {
    pub tt_capacity: usize,
    /// Share of the table dropped, oldest first, when it overflows.
    pub tt_evict_fraction: f64,
    /// Initial half-width of the root window from depth 2 on.
    pub aspiration_window: i32,
    pub lmr_min_depth: i32,
    /// Ordered moves searched at full depth before reductions kick in.
    pub lmr_after_moves: usize,
    pub killer_bonus: [f64; 2],
    pub history_cap: i32,
    pub use_mobility: bool,
    pub eval: EvalWeights,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            tt_capacity: 200_000,
            tt_evict_fraction: 0.25,
            aspiration_window: 50,
            lmr_min_depth: 3,
            lmr_after_moves: 6,
            killer_bonus: [5000.0, 4500.0],
            history_cap: 10_000,
            use_mobility: false,
            eval: EvalWeights::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SearchOptions {
    /// Soft wall-clock budget. Depth 1 always completes.
    pub max_ms: Option<u64>,
}

/// Result of the root search.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    pub best_move: Option<Move>,
    pub best_score: i32,
    /// Deepest fully completed iteration; 0 when there was nothing to search.
    pub depth: i32,
    pub nodes: u64,
    // TT diagnostics
    pub tt_probes: u64,
    pub tt_hits: u64,
    pub tt_cutoffs: u64,
}

// =====================================================================
// Search context
// =====================================================================

pub struct SearchContext<'a> {
    config: &'a SearchConfig,
    tt: TranspositionTable,
    ordering: MoveOrdering,
    start_ms: f64,
    budget_ms: Option<f64>,
    enforce_deadline: bool,
    aborted: bool,
    nodes: u64,
}

impl<'a> SearchContext<'a> {
    pub fn new(config: &'a SearchConfig, opts: &SearchOptions) -> Self {
        SearchContext {
            config,
            tt: TranspositionTable::new(config.tt_capacity, config.tt_evict_fraction),
            ordering: MoveOrdering::new(config.history_cap, config.killer_bonus),
            start_ms: now_ms(),
            budget_ms: opts.max_ms.map(|ms| ms as f64),
            enforce_deadline: false,
            aborted: false,
            nodes: 0,
        }
    }

    fn out_of_time(&self) -> bool {
        self.budget_ms
            .is_some_and(|budget| now_ms() - self.start_ms >= budget)
    }

    fn leaf(&self, board: &Board, side: Owner) -> i32 {
        evaluate_with(board, side, &self.config.eval, self.config.use_mobility).round() as i32
    }

    /// Generate, apply and order every move for `side`. Moves that fail to
    /// apply are dropped.
    fn expand(
        &self,
        board: &Board,
        side: Owner,
        ply: usize,
        tt_best: Option<&Move>,
    ) -> Vec<ScoredMove> {
        let mut children: Vec<ScoredMove> = generate_all_moves(board, side)
            .into_iter()
            .filter_map(|mv| {
                apply_move(board, side, &mv)
                    .ok()
                    .map(|child| ScoredMove::new(mv, child))
            })
            .collect();
        self.ordering.order_moves(
            &mut children,
            side,
            ply,
            tt_best,
            &self.config.eval,
            self.config.use_mobility,
        );
        children
    }

    /// Negamax with alpha-beta. Returns a score from `side`'s point of view.
    fn negamax(
        &mut self,
        board: &Board,
        side: Owner,
        depth: i32,
        ply: usize,
        mut alpha: i32,
        mut beta: i32,
    ) -> i32 {
        self.nodes += 1;

        if self.enforce_deadline && (self.aborted || self.out_of_time()) {
            self.aborted = true;
            return self.leaf(board, side);
        }

        let hash = compute_hash(board, side);
        let alpha_orig = alpha;
        let mut tt_best = None;
        if let Some(hit) = self.tt.probe(hash, depth, ply, alpha, beta) {
            if let Some(score) = hit.score {
                return score;
            }
            alpha = hit.alpha;
            beta = hit.beta;
            tt_best = hit.best;
        }

        if depth <= 0 {
            return self.leaf(board, side);
        }

        let children = self.expand(board, side, ply, tt_best.as_ref());
        if children.is_empty() {
            return self.leaf(board, side);
        }

        let opp = side.opponent();
        let mut best = -INF;
        let mut best_move = None;

        for (i, child) in children.iter().enumerate() {
            let score = match terminal_score(&child.board, side, ply + 1) {
                Some(score) => score,
                None => {
                    let reduce = i >= self.config.lmr_after_moves
                        && depth >= self.config.lmr_min_depth
                        && is_quiet(board, &child.mv);
                    let next = ply + 1;
                    if reduce {
                        let s = -self.negamax(
                            &child.board,
                            opp,
                            depth - 2,
                            next,
                            -alpha - 1,
                            -alpha,
                        );
                        if s > alpha {
                            -self.negamax(&child.board, opp, depth - 1, next, -beta, -alpha)
                        } else {
                            s
                        }
                    } else {
                        -self.negamax(&child.board, opp, depth - 1, next, -beta, -alpha)
                    }
                }
            };

            if self.aborted {
                return best.max(score);
            }
            if score > best {
                best = score;
                best_move = Some(child.mv.clone());
            }
            alpha = alpha.max(score);
            if alpha >= beta {
                let key = child.mv.key();
                self.ordering.record_killer(ply, key);
                self.ordering.record_history(key, depth);
                break;
            }
        }

        let bound = if best <= alpha_orig {
            Bound::Upper
        } else if best >= beta {
            Bound::Lower
        } else {
            Bound::Exact
        };
        self.tt.store(hash, depth, ply, bound, best, best_move);
        best
    }

    /// One root pass at `depth` inside (`alpha`, `beta`).
    fn search_root(
        &mut self,
        board: &Board,
        side: Owner,
        depth: i32,
        mut alpha: i32,
        beta: i32,
    ) -> (i32, Option<Move>) {
        self.nodes += 1;
        let hash = compute_hash(board, side);
        let tt_best = self.tt.best_move(hash);
        let children = self.expand(board, side, 0, tt_best.as_ref());

        let alpha_orig = alpha;
        let opp = side.opponent();
        let mut best = -INF;
        let mut best_move = None;

        for child in &children {
            let score = match terminal_score(&child.board, side, 1) {
                Some(score) => score,
                None => -self.negamax(&child.board, opp, depth - 1, 1, -beta, -alpha),
            };
            if self.aborted {
                break;
            }
            if score > best {
                best = score;
                best_move = Some(child.mv.clone());
            }
            alpha = alpha.max(score);
            if alpha >= beta {
                break;
            }
        }

        if !self.aborted && best_move.is_some() {
            let bound = if best <= alpha_orig {
                Bound::Upper
            } else if best >= beta {
                Bound::Lower
            } else {
                Bound::Exact
            };
            self.tt.store(hash, depth, 0, bound, best, best_move.clone());
        }
        (best, best_move)
    }

    /// Root search at `depth` with an aspiration window around `prev`,
    /// doubling the window on each fail. `None` when the deadline hit.
    fn search_depth(
        &mut self,
        board: &Board,
        side: Owner,
        depth: i32,
        prev: i32,
    ) -> Option<(i32, Option<Move>)> {
        let mut delta = self.config.aspiration_window.max(1);
        let (mut alpha, mut beta) = if depth <= 1 {
            (-INF, INF)
        } else {
            (
                prev.saturating_sub(delta).max(-INF),
                prev.saturating_add(delta).min(INF),
            )
        };

        loop {
            let (score, mv) = self.search_root(board, side, depth, alpha, beta);
            if self.aborted {
                return None;
            }
            if score <= alpha && alpha > -INF {
                delta = delta.saturating_mul(2);
                alpha = prev.saturating_sub(delta).max(-INF);
                trace!(depth, score, alpha, beta, "aspiration fail low");
            } else if score >= beta && beta < INF {
                delta = delta.saturating_mul(2);
                beta = prev.saturating_add(delta).min(INF);
                trace!(depth, score, alpha, beta, "aspiration fail high");
            } else {
                return Some((score, mv));
            }
        }
    }
}

/// An Arrange onto an empty square.
fn is_quiet(board: &Board, mv: &Move) -> bool {
    mv.is_arrange() && mv.landing().is_some_and(|p| board.is_empty_at(p))
}

// =====================================================================
// Entry points
// =====================================================================

/// Iterative deepening from depth 1 to `max_depth`. The result always
/// reflects the deepest completed iteration.
pub fn search(
    board: &Board,
    side: Owner,
    max_depth: i32,
    opts: &SearchOptions,
    config: &SearchConfig,
) -> SearchResult {
    let mut ctx = SearchContext::new(config, opts);
    let mut result = SearchResult {
        best_move: None,
        best_score: ctx.leaf(board, side),
        depth: 0,
        nodes: 0,
        tt_probes: 0,
        tt_hits: 0,
        tt_cutoffs: 0,
    };

    if generate_all_moves(board, side).is_empty() {
        debug!(?side, score = result.best_score, "no legal moves");
        return result;
    }

    for depth in 1..=max_depth.max(1) {
        if depth > 1 && ctx.out_of_time() {
            break;
        }
        ctx.tt.new_generation();
        ctx.enforce_deadline = depth > 1;

        let Some((score, mv)) = ctx.search_depth(board, side, depth, result.best_score) else {
            debug!(depth, nodes = ctx.nodes, "iteration aborted on deadline");
            break;
        };
        if mv.is_some() {
            result.best_move = mv;
        }
        result.best_score = score;
        result.depth = depth;
        debug!(
            depth,
            score,
            nodes = ctx.nodes,
            elapsed_ms = now_ms() - ctx.start_ms,
            tt_len = ctx.tt.len(),
            "depth complete"
        );

        if score.abs() >= DECISIVE {
            break;
        }
    }

    result.nodes = ctx.nodes;
    result.tt_probes = ctx.tt.probes;
    result.tt_hits = ctx.tt.hits;
    result.tt_cutoffs = ctx.tt.cutoffs;
    info!(
        ?side,
        depth = result.depth,
        score = result.best_score,
        nodes = result.nodes,
        best = ?result.best_move,
        "search finished"
    );
    result
}

/// Best move for `side` with the default configuration.
pub fn pick_best_move(
    board: &Board,
    side: Owner,
    max_depth: i32,
    opts: &SearchOptions,
) -> Option<Move> {
    search(board, side, max_depth, opts, &SearchConfig::default()).best_move
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::PieceKind;
    use crate::geometry::{index_of, Point};
    use crate::scoring::{winner, WIN_SCORE};

    fn pt(x: i32, y: i32) -> Point {
        index_of(x, y).unwrap()
    }

    /// Host holds three corners of a ring; the fourth W4 is two steps away.
    fn ring_in_one() -> Board {
        Board::new()
            .with(pt(-2, 2), PieceKind::WhiteThree, Owner::Host)
            .with(pt(2, 2), PieceKind::WhiteFour, Owner::Host)
            .with(pt(2, -2), PieceKind::WhiteThree, Owner::Host)
            .with(pt(-2, -4), PieceKind::WhiteFour, Owner::Host)
    }

    fn run(board: &Board, depth: i32, config: &SearchConfig) -> SearchResult {
        search(board, Owner::Host, depth, &SearchOptions::default(), config)
    }

    fn midgame() -> Board {
        Board::new()
            .with(pt(-3, 1), PieceKind::RedFour, Owner::Host)
            .with(pt(0, -5), PieceKind::Lotus, Owner::Host)
            .with(pt(4, 2), PieceKind::WhiteThree, Owner::Guest)
            .with(pt(2, -3), PieceKind::RedFive, Owner::Guest)
    }

    #[test]
    fn test_no_moves_yields_no_move() {
        let result = run(&Board::new(), 3, &SearchConfig::default());
        assert_eq!(result.best_move, None);
        assert_eq!(result.depth, 0);
        assert_eq!(result.best_score, 0);
        assert_eq!(pick_best_move(&Board::new(), Owner::Guest, 2, &SearchOptions::default()), None);
    }

    #[test]
    fn test_finds_ring_completion() {
        let board = ring_in_one();
        assert_eq!(winner(&board), None);

        let result = run(&board, 2, &SearchConfig::default());
        let mv = result.best_move.clone().unwrap();
        let next = apply_move(&board, Owner::Host, &mv).unwrap();
        assert_eq!(winner(&next), Some(Owner::Host));
        assert_eq!(result.best_score, WIN_SCORE - 1);
        assert!(result.depth >= 1);
        assert!(result.nodes > 0);
    }

    #[test]
    fn test_search_is_deterministic() {
        let board = midgame();
        let config = SearchConfig::default();
        let a = run(&board, 2, &config);
        let b = run(&board, 2, &config);
        assert_eq!(a, b);
        assert!(a.tt_probes > 0);
        assert!(a.best_move.is_some());
    }

    #[test]
    fn test_late_move_reduction_prunes_nodes() {
        let board = midgame();
        let reduced = run(&board, 4, &SearchConfig::default());
        let full = run(
            &board,
            4,
            &SearchConfig {
                lmr_min_depth: 100,
                ..SearchConfig::default()
            },
        );
        assert_eq!((reduced.depth, full.depth), (4, 4));
        for result in [&reduced, &full] {
            let mv = result.best_move.clone().unwrap();
            assert!(apply_move(&board, Owner::Host, &mv).is_ok());
        }
        assert!(reduced.nodes < full.nodes, "{} vs {}", reduced.nodes, full.nodes);
    }

    #[test]
    fn test_aspiration_research_matches_full_window() {
        let board = midgame();
        let no_lmr = SearchConfig {
            lmr_min_depth: 100,
            ..SearchConfig::default()
        };
        // A one-point window around the previous score drives the root through
        // the fail and widen loop.
        let narrow = run(
            &board,
            3,
            &SearchConfig {
                aspiration_window: 1,
                ..no_lmr.clone()
            },
        );
        let wide = run(
            &board,
            3,
            &SearchConfig {
                aspiration_window: 10_000_000,
                ..no_lmr
            },
        );
        assert_eq!(narrow.depth, 3);
        assert_eq!(narrow.best_score, wide.best_score);
        let mv = narrow.best_move.unwrap();
        assert!(apply_move(&board, Owner::Host, &mv).is_ok());
    }

    #[test]
    fn test_zero_budget_still_completes_depth_one() {
        let board = Board::new()
            .with(pt(-3, 1), PieceKind::RedFour, Owner::Host)
            .with(pt(4, 2), PieceKind::WhiteThree, Owner::Guest);
        let opts = SearchOptions { max_ms: Some(0) };
        let result = search(&board, Owner::Host, 6, &opts, &SearchConfig::default());
        assert_eq!(result.depth, 1);
        let mv = result.best_move.unwrap();
        assert!(apply_move(&board, Owner::Host, &mv).is_ok());
    }

    #[test]
    fn test_config_from_partial_json() {
        let config: SearchConfig =
            serde_json::from_str(r#"{"ttCapacity": 1000, "useMobility": true}"#).unwrap();
        assert_eq!(config.tt_capacity, 1000);
        assert!(config.use_mobility);
        assert_eq!(config.aspiration_window, 50);
        assert_eq!(config.eval, EvalWeights::default());
    }
}
