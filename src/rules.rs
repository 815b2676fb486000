//! Rule primitives: intersection classes, piece descriptors, harmony and
//! clash predicates, accent cancellation and the Orchid trap.
//!
//! Descriptors are derived from the raw board on every query; nothing here
//! caches state.

use crate::board::{Board, Owner, PieceKind};
use crate::geometry::{axis_step, neighbors8, offset, xy, Point};

/// Class of an intersection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntersectionType {
    Gate,
    Red,
    White,
    Neutral,
}

/// Garden colour of a basic flower or a coloured intersection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Garden {
    Red,
    White,
}

impl Garden {
    #[inline]
    pub fn opposite(self) -> Garden {
        match self {
            Garden::Red => Garden::White,
            Garden::White => Garden::Red,
        }
    }
}

/// Classify (x, y). Gates are the four cardinal extremes; the midlines and
/// main diagonals are neutral; remaining quadrants are white where x*y > 0
/// and red otherwise.
pub fn intersection_type(x: i32, y: i32) -> IntersectionType {
    if (x.abs() == 8 && y == 0) || (x == 0 && y.abs() == 8) {
        IntersectionType::Gate
    } else if x == 0 || y == 0 || x.abs() == y.abs() {
        IntersectionType::Neutral
    } else if x * y > 0 {
        IntersectionType::White
    } else {
        IntersectionType::Red
    }
}

#[inline]
pub fn intersection_at(p: Point) -> IntersectionType {
    let (x, y) = xy(p);
    intersection_type(x, y)
}

#[inline]
pub fn is_gate(p: Point) -> bool {
    intersection_at(p) == IntersectionType::Gate
}

/// Garden colour of the intersection, `None` for gates and neutral points.
#[inline]
pub fn garden_at(p: Point) -> Option<Garden> {
    match intersection_at(p) {
        IntersectionType::Red => Some(Garden::Red),
        IntersectionType::White => Some(Garden::White),
        _ => None,
    }
}

/// A piece is blooming anywhere except on a gate.
#[inline]
pub fn is_blooming(p: Point) -> bool {
    !is_gate(p)
}

/// Garden and number of a basic flower.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Flower {
    pub garden: Garden,
    pub number: u8,
}

impl Flower {
    pub fn of(kind: PieceKind) -> Option<Flower> {
        let (garden, number) = match kind {
            PieceKind::RedThree => (Garden::Red, 3),
            PieceKind::RedFour => (Garden::Red, 4),
            PieceKind::RedFive => (Garden::Red, 5),
            PieceKind::WhiteThree => (Garden::White, 3),
            PieceKind::WhiteFour => (Garden::White, 4),
            PieceKind::WhiteFive => (Garden::White, 5),
            _ => return None,
        };
        Some(Flower { garden, number })
    }

    /// Position on the cycle R3 R4 R5 W3 W4 W5.
    #[inline]
    pub fn cycle_position(self) -> i32 {
        let base = match self.garden {
            Garden::Red => 0,
            Garden::White => 3,
        };
        base + self.number as i32 - 3
    }
}

/// True when `a` and `b` are neighbours on the harmony cycle.
#[inline]
pub fn harmonious_pair(a: Flower, b: Flower) -> bool {
    let d = (a.cycle_position() - b.cycle_position()).rem_euclid(6);
    d == 1 || d == 5
}

/// Same number, different garden.
#[inline]
pub fn is_clash_pair(a: Flower, b: Flower) -> bool {
    a.number == b.number && a.garden != b.garden
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccentKind {
    Rock,
    Wheel,
    Boat,
    Knotweed,
}

impl AccentKind {
    pub fn of(kind: PieceKind) -> Option<AccentKind> {
        match kind {
            PieceKind::Rock => Some(AccentKind::Rock),
            PieceKind::Wheel => Some(AccentKind::Wheel),
            PieceKind::Boat => Some(AccentKind::Boat),
            PieceKind::Knotweed => Some(AccentKind::Knotweed),
            _ => None,
        }
    }
}

/// Derived view of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PieceInfo {
    Empty,
    Basic {
        owner: Owner,
        flower: Flower,
        blooming: bool,
    },
    Lotus {
        owner: Owner,
        blooming: bool,
    },
    Orchid {
        owner: Owner,
        blooming: bool,
        wild: bool,
    },
    Accent {
        owner: Owner,
        kind: AccentKind,
    },
}

impl PieceInfo {
    pub fn owner(&self) -> Option<Owner> {
        match *self {
            PieceInfo::Empty => None,
            PieceInfo::Basic { owner, .. }
            | PieceInfo::Lotus { owner, .. }
            | PieceInfo::Orchid { owner, .. }
            | PieceInfo::Accent { owner, .. } => Some(owner),
        }
    }

    /// The flower of a blooming basic piece.
    pub fn blooming_flower(&self) -> Option<Flower> {
        match *self {
            PieceInfo::Basic {
                flower,
                blooming: true,
                ..
            } => Some(flower),
            _ => None,
        }
    }
}

/// Describe the piece at `p`. Orchid wildness is recomputed from the board.
pub fn describe(board: &Board, p: Point) -> PieceInfo {
    let Some((kind, owner)) = board.piece(p) else {
        return PieceInfo::Empty;
    };
    let blooming = is_blooming(p);
    if let Some(flower) = Flower::of(kind) {
        return PieceInfo::Basic {
            owner,
            flower,
            blooming,
        };
    }
    if let Some(kind) = AccentKind::of(kind) {
        return PieceInfo::Accent { owner, kind };
    }
    match kind {
        PieceKind::Lotus => PieceInfo::Lotus { owner, blooming },
        _ => PieceInfo::Orchid {
            owner,
            blooming,
            wild: has_blooming_lotus(board, owner),
        },
    }
}

/// Flower of the blooming basic piece at `p`, if there is one.
#[inline]
pub fn blooming_basic_at(board: &Board, p: Point) -> Option<Flower> {
    let (kind, _) = board.piece(p)?;
    if is_blooming(p) {
        Flower::of(kind)
    } else {
        None
    }
}

pub fn has_blooming_lotus(board: &Board, owner: Owner) -> bool {
    board
        .occupied()
        .any(|(p, k, o)| k == PieceKind::Lotus && o == owner && is_blooming(p))
}

/// Step limit for an Arrange, `None` for pieces that cannot arrange.
pub fn movement_limit(kind: PieceKind) -> Option<usize> {
    match kind {
        PieceKind::Lotus => Some(2),
        PieceKind::Orchid => Some(6),
        _ => Flower::of(kind).map(|f| f.number as usize),
    }
}

/// A flower next to an enemy Orchid cannot move.
pub fn is_trapped(board: &Board, p: Point) -> bool {
    let Some((_, owner)) = board.piece(p) else {
        return false;
    };
    neighbors8(p).iter().flatten().any(|&n| {
        matches!(board.piece(n), Some((PieceKind::Orchid, o)) if o != owner)
    })
}

/// Any Knotweed in the 8 cells around `p`.
pub fn knotweed_adjacent(board: &Board, p: Point) -> bool {
    neighbors8(p)
        .iter()
        .flatten()
        .any(|&n| matches!(board.piece(n), Some((PieceKind::Knotweed, _))))
}

/// A Rock strictly between `a` and `b` on their shared axis.
pub fn rock_between(board: &Board, a: Point, b: Point) -> bool {
    let Some((dx, dy)) = axis_step(a, b) else {
        return false;
    };
    let mut cur = a;
    while let Some(next) = offset(cur, dx, dy) {
        if next == b {
            break;
        }
        if matches!(board.piece(next), Some((PieceKind::Rock, _))) {
            return true;
        }
        cur = next;
    }
    false
}

/// Harmony between `a` and `b` is cancelled by a Rock between or on them,
/// or by a Knotweed next to either end.
pub fn harmony_cancelled(board: &Board, a: Point, b: Point) -> bool {
    let is_rock = |p| matches!(board.piece(p), Some((PieceKind::Rock, _)));
    is_rock(a)
        || is_rock(b)
        || rock_between(board, a, b)
        || knotweed_adjacent(board, a)
        || knotweed_adjacent(board, b)
}
