//! Piece codes and the board value type.
//!
//! A cell holds one packed byte: 0 for empty, otherwise
//! `(kind + 1) << 1 | owner`. Boards are plain values; every mutation
//! in the engine happens on a clone.

use serde::{Deserialize, Serialize};

use crate::geometry::{is_valid, Point, NUM_POINTS};

/// The 12 piece kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PieceKind {
    #[serde(rename = "R3")]
    RedThree,
    #[serde(rename = "R4")]
    RedFour,
    #[serde(rename = "R5")]
    RedFive,
    #[serde(rename = "W3")]
    WhiteThree,
    #[serde(rename = "W4")]
    WhiteFour,
    #[serde(rename = "W5")]
    WhiteFive,
    #[serde(rename = "L")]
    Lotus,
    #[serde(rename = "O")]
    Orchid,
    Rock,
    Wheel,
    Boat,
    Knotweed,
}

pub const NUM_KINDS: usize = 12;

impl PieceKind {
    pub const ALL: [PieceKind; NUM_KINDS] = [
        PieceKind::RedThree,
        PieceKind::RedFour,
        PieceKind::RedFive,
        PieceKind::WhiteThree,
        PieceKind::WhiteFour,
        PieceKind::WhiteFive,
        PieceKind::Lotus,
        PieceKind::Orchid,
        PieceKind::Rock,
        PieceKind::Wheel,
        PieceKind::Boat,
        PieceKind::Knotweed,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    #[inline]
    pub fn from_index(i: usize) -> Option<PieceKind> {
        Self::ALL.get(i).copied()
    }

    /// One of the six numbered garden flowers.
    #[inline]
    pub fn is_basic(self) -> bool {
        self.index() <= PieceKind::WhiteFive.index()
    }

    /// Rock, Wheel, Boat or Knotweed.
    #[inline]
    pub fn is_accent(self) -> bool {
        self.index() >= PieceKind::Rock.index()
    }

    /// Pieces that move with an Arrange: basics, Lotus and Orchid.
    #[inline]
    pub fn is_flower(self) -> bool {
        !self.is_accent()
    }
}

/// The two sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Owner {
    Host,
    Guest,
}

impl Owner {
    #[inline]
    pub fn opponent(self) -> Owner {
        match self {
            Owner::Host => Owner::Guest,
            Owner::Guest => Owner::Host,
        }
    }

    #[inline]
    pub fn index(self) -> usize {
        match self {
            Owner::Host => 0,
            Owner::Guest => 1,
        }
    }

    /// +1 for host, -1 for guest.
    #[inline]
    pub fn sign(self) -> i32 {
        match self {
            Owner::Host => 1,
            Owner::Guest => -1,
        }
    }
}

/// A raw board cell.
pub type Cell = u8;

pub const EMPTY: Cell = 0;

#[inline]
pub fn pack_piece(kind: PieceKind, owner: Owner) -> Cell {
    (((kind.index() + 1) << 1) | owner.index()) as Cell
}

/// Decode a cell. Empty or malformed cells decode to `None`.
#[inline]
pub fn unpack_piece(cell: Cell) -> Option<(PieceKind, Owner)> {
    if cell == EMPTY {
        return None;
    }
    let kind = PieceKind::from_index(((cell >> 1) as usize).checked_sub(1)?)?;
    let owner = if cell & 1 == 0 { Owner::Host } else { Owner::Guest };
    Some((kind, owner))
}

/// 249 cells addressed by 1-based index. Slot 0 is never used.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Board {
    cells: [Cell; NUM_POINTS + 1],
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    pub fn new() -> Self {
        Board {
            cells: [EMPTY; NUM_POINTS + 1],
        }
    }

    /// Raw cell at `p`; off-board indices read as empty.
    #[inline]
    pub fn get(&self, p: Point) -> Cell {
        if is_valid(p) {
            self.cells[p]
        } else {
            EMPTY
        }
    }

    /// Write a raw cell. Writes to off-board indices are ignored.
    #[inline]
    pub fn set(&mut self, p: Point, cell: Cell) {
        if is_valid(p) {
            self.cells[p] = cell;
        }
    }

    #[inline]
    pub fn piece(&self, p: Point) -> Option<(PieceKind, Owner)> {
        unpack_piece(self.get(p))
    }

    #[inline]
    pub fn is_empty_at(&self, p: Point) -> bool {
        self.get(p) == EMPTY
    }

    #[inline]
    pub fn place(&mut self, p: Point, kind: PieceKind, owner: Owner) {
        self.set(p, pack_piece(kind, owner));
    }

    #[inline]
    pub fn remove(&mut self, p: Point) -> Option<(PieceKind, Owner)> {
        let old = self.piece(p);
        self.set(p, EMPTY);
        old
    }

    /// Builder-style placement, handy for setting up positions.
    pub fn with(mut self, p: Point, kind: PieceKind, owner: Owner) -> Self {
        self.place(p, kind, owner);
        self
    }

    /// Occupied cells in index order.
    pub fn occupied(&self) -> impl Iterator<Item = (Point, PieceKind, Owner)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .skip(1)
            .filter_map(|(p, &c)| unpack_piece(c).map(|(k, o)| (p, k, o)))
    }

    pub fn piece_count(&self) -> usize {
        self.cells[1..].iter().filter(|&&c| c != EMPTY).count()
    }

    pub fn has_pieces(&self, owner: Owner) -> bool {
        self.occupied().any(|(_, _, o)| o == owner)
    }
}

impl std::fmt::Debug for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut list = f.debug_map();
        for (p, kind, owner) in self.occupied() {
            list.entry(&p, &(kind, owner));
        }
        list.finish()
    }
}
