//! Rules engine and game-tree search for a two-player flower-garden game on a
//! 249-point diamond grid.
//!
//! The WASM entry point accepts a JSON board, runs the search and returns the
//! chosen move as JSON. Everything underneath is also usable as a plain Rust
//! library.

pub mod board;
pub mod bonus;
pub mod error;
pub mod eval;
pub mod geometry;
pub mod harmony;
pub mod legality;
pub mod movegen;
pub mod moves;
pub mod ordering;
pub mod rules;
pub mod scoring;
pub mod search;
pub mod tt;
pub mod zobrist;

pub use board::{Board, Owner, PieceKind};
pub use error::{ApplyError, ArrangeRejection, PlanRejection};
pub use eval::{evaluate, EvalWeights};
pub use geometry::{coords_of, index_of, Point};
pub use harmony::{find_harmony_rings, HarmonyRing};
pub use legality::validate_arrange;
pub use movegen::{generate_all_moves, generate_legal_arrange_moves};
pub use moves::{apply_move, Move};
pub use scoring::winner;
pub use search::{pick_best_move, search, SearchConfig, SearchOptions, SearchResult};

use serde::{Deserialize, Serialize};
use tracing::warn;
use wasm_bindgen::prelude::*;

const DEFAULT_DEPTH: i32 = 3;

// =====================================================================
// Serde types matching the worker message format
// =====================================================================

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PieceDesc {
    x: i32,
    y: i32,
    piece: PieceKind,
    owner: Owner,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchInput {
    pieces: Vec<PieceDesc>,
    side: Owner,
    #[serde(default)]
    depth: Option<i32>,
    #[serde(default)]
    max_ms: Option<u64>,
    #[serde(default)]
    config: Option<SearchConfig>,
}

#[derive(Serialize, Default)]
#[serde(rename_all = "camelCase")]
struct SearchOutput {
    #[serde(rename = "move")]
    best_move: Option<Move>,
    score: i32,
    depth: i32,
    nodes: u64,
    // TT diagnostics (for debugging; ignored by the UI)
    tt_probes: u64,
    tt_hits: u64,
    tt_cutoffs: u64,
}

impl From<SearchResult> for SearchOutput {
    fn from(r: SearchResult) -> Self {
        SearchOutput {
            best_move: r.best_move,
            score: r.best_score,
            depth: r.depth,
            nodes: r.nodes,
            tt_probes: r.tt_probes,
            tt_hits: r.tt_hits,
            tt_cutoffs: r.tt_cutoffs,
        }
    }
}

/// Board from piece descriptors; `None` if any lies off the grid.
fn board_from_pieces(pieces: &[PieceDesc]) -> Option<Board> {
    let mut board = Board::new();
    for p in pieces {
        board.place(index_of(p.x, p.y)?, p.piece, p.owner);
    }
    Some(board)
}

fn run_search(input_json: &str) -> SearchOutput {
    let input: SearchInput = match serde_json::from_str(input_json) {
        Ok(v) => v,
        Err(e) => {
            warn!(error = %e, "malformed search request");
            return SearchOutput::default();
        }
    };
    let Some(board) = board_from_pieces(&input.pieces) else {
        warn!("search request has a piece off the grid");
        return SearchOutput::default();
    };

    let config = input.config.unwrap_or_default();
    let opts = SearchOptions { max_ms: input.max_ms };
    let depth = input.depth.unwrap_or(DEFAULT_DEPTH);
    search(&board, input.side, depth, &opts, &config).into()
}

// =====================================================================
// WASM exported function
// =====================================================================

#[wasm_bindgen]
pub fn wasm_pick_best_move(input_json: &str) -> String {
    serde_json::to_string(&run_search(input_json)).unwrap_or_else(|_| "{}".to_string())
}
