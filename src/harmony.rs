//! Harmony graph over blooming basic flowers, and ring detection.
//!
//! Two blooming basics are joined when they share an axis with clear sight,
//! sit next to each other on the harmony cycle, and no accent cancels them.
//! A ring is a simple cycle of that graph whose polygon encloses the centre.

use std::collections::{BTreeMap, HashSet};

use crate::board::{Board, Owner};
use crate::geometry::{all_points, xy, Point, NUM_POINTS};
use crate::legality::any_sighted_pair;
use crate::rules::{blooming_basic_at, harmonious_pair, harmony_cancelled};

/// Longest cycle, in edges, considered when looking for rings.
pub const MAX_RING_EDGES: usize = 20;

/// Adjacency lists keyed by board index. Rebuilt for every query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HarmonyGraph {
    adjacency: BTreeMap<Point, Vec<Point>>,
}

impl HarmonyGraph {
    pub fn nodes(&self) -> impl Iterator<Item = Point> + '_ {
        self.adjacency.keys().copied()
    }

    pub fn neighbors(&self, p: Point) -> &[Point] {
        self.adjacency.get(&p).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn degree(&self, p: Point) -> usize {
        self.neighbors(p).len()
    }

    pub fn has_edge(&self, a: Point, b: Point) -> bool {
        self.neighbors(a).contains(&b)
    }

    pub fn edge_count(&self) -> usize {
        self.adjacency.values().map(Vec::len).sum::<usize>() / 2
    }

    /// Sum of node degrees over the pieces owned by `owner`.
    pub fn degree_of(&self, board: &Board, owner: Owner) -> usize {
        self.adjacency
            .iter()
            .filter(|(&p, _)| matches!(board.piece(p), Some((_, o)) if o == owner))
            .map(|(_, n)| n.len())
            .sum()
    }

    fn add_edge(&mut self, a: Point, b: Point) {
        self.adjacency.entry(a).or_default().push(b);
        self.adjacency.entry(b).or_default().push(a);
    }
}

pub fn build_harmony_graph(board: &Board) -> HarmonyGraph {
    let mut graph = HarmonyGraph::default();
    for p in all_points() {
        if blooming_basic_at(board, p).is_some() {
            graph.adjacency.insert(p, Vec::new());
        }
    }
    any_sighted_pair(board, |p, a, q, b| {
        if harmonious_pair(a, b) && !harmony_cancelled(board, p, q) {
            graph.add_edge(p, q);
        }
        false
    });
    graph
}

/// A cycle of harmonies enclosing the centre, in traversal order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarmonyRing {
    pub points: Vec<Point>,
}

impl HarmonyRing {
    /// The side owning every piece of the ring, if there is one.
    pub fn owner(&self, board: &Board) -> Option<Owner> {
        let mut owners = self.points.iter().map(|&p| board.piece(p).map(|(_, o)| o));
        let first = owners.next()??;
        owners.all(|o| o == Some(first)).then_some(first)
    }
}

pub fn find_harmony_rings(board: &Board) -> Vec<HarmonyRing> {
    find_rings_in(&build_harmony_graph(board))
}

/// Enumerate simple cycles of at most `MAX_RING_EDGES` edges and keep those
/// enclosing (0, 0). Each cycle is walked from its lowest node, and cycles
/// with the same node set are reported once.
pub fn find_rings_in(graph: &HarmonyGraph) -> Vec<HarmonyRing> {
    let mut walk = RingWalk {
        graph,
        path: Vec::with_capacity(MAX_RING_EDGES),
        on_path: [false; NUM_POINTS + 1],
        seen: HashSet::new(),
        rings: Vec::new(),
    };
    for start in graph.nodes() {
        if graph.degree(start) < 2 {
            continue;
        }
        walk.path.push(start);
        walk.on_path[start] = true;
        walk.extend(start);
        walk.on_path[start] = false;
        walk.path.pop();
    }
    walk.rings
}

struct RingWalk<'a> {
    graph: &'a HarmonyGraph,
    path: Vec<Point>,
    on_path: [bool; NUM_POINTS + 1],
    seen: HashSet<Vec<Point>>,
    rings: Vec<HarmonyRing>,
}

impl RingWalk<'_> {
    fn extend(&mut self, start: Point) {
        let Some(&cur) = self.path.last() else {
            return;
        };
        let graph = self.graph;
        for &next in graph.neighbors(cur) {
            if next == start {
                if self.path.len() >= 3 {
                    self.close();
                }
            } else if next > start && !self.on_path[next] && self.path.len() < MAX_RING_EDGES {
                self.path.push(next);
                self.on_path[next] = true;
                self.extend(start);
                self.on_path[next] = false;
                self.path.pop();
            }
        }
    }

    fn close(&mut self) {
        if !encloses_center(&self.path) {
            return;
        }
        let mut key = self.path.clone();
        key.sort_unstable();
        if self.seen.insert(key) {
            self.rings.push(HarmonyRing {
                points: self.path.clone(),
            });
        }
    }
}

/// Ray-casting point-in-polygon test for (0, 0) against the polygon through
/// `points` in order.
pub fn encloses_center(points: &[Point]) -> bool {
    if points.len() < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = points.len() - 1;
    for i in 0..points.len() {
        let (xi, yi) = xy(points[i]);
        let (xj, yj) = xy(points[j]);
        if (yi > 0) != (yj > 0) {
            let cross = (xj - xi) as f64 * (0 - yi) as f64 / (yj - yi) as f64 + xi as f64;
            if 0.0 < cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}
