//! Error types for rule checks and move application.
//!
//! Rejections (`ArrangeRejection`, `PlanRejection`) are expected results of
//! legality checks. `ApplyError` is returned when a caller asks to apply a
//! move that is not valid against the board it was given.

use thiserror::Error;

use crate::board::Owner;
use crate::geometry::Point;
use crate::rules::Garden;

/// Why an Arrange path was refused.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ArrangeRejection {
    #[error("Path is empty")]
    EmptyPath,

    #[error("Point {0} is not on the board")]
    InvalidPoint(Point),

    #[error("No arrangeable piece at {0}")]
    NotArrangeable(Point),

    #[error("Piece at {0} is trapped by an enemy Orchid")]
    Trapped(Point),

    #[error("Path of {len} steps exceeds the limit of {limit}")]
    TooLong { len: usize, limit: usize },

    #[error("Step from {from} to {to} is not a single orthogonal move")]
    NotOrthogonal { from: Point, to: Point },

    #[error("Path revisits {0}")]
    Revisit(Point),

    #[error("Path is blocked at {0}")]
    Blocked(Point),

    #[error("Move may not end on the gate at {0}")]
    EndsOnGate(Point),

    #[error("Flower may not land in the {garden:?} garden at {point}")]
    WrongGarden { garden: Garden, point: Point },

    #[error("Move would create a clash")]
    CreatesClash,
}

/// Why a special-piece plan was refused.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlanRejection {
    #[error("Piece at {0} does not belong to the moving side")]
    NotOwnPiece(Point),

    #[error("Piece at {0} is not the expected kind")]
    WrongKind(Point),

    #[error("Wheel at {0} does not have a full ring of neighbours")]
    IncompleteRing(Point),

    #[error("Wheel at {0} has nothing to rotate")]
    NothingToRotate(Point),

    #[error("A piece would be rotated onto the gate at {0}")]
    LandsOnGate(Point),

    #[error("{0} and {1} are not adjacent")]
    NotAdjacent(Point, Point),

    #[error("Target {0} is not empty")]
    TargetOccupied(Point),

    #[error("Flower at {0} is not blooming")]
    NotBlooming(Point),

    #[error("No flower at {0}")]
    NotAFlower(Point),

    #[error("No removable accent at {0}")]
    NotAnAccent(Point),

    #[error("Effect would create a clash")]
    CreatesClash,
}

/// A move could not be applied to the board it was given.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApplyError {
    #[error("Illegal arrange: {0}")]
    Arrange(#[from] ArrangeRejection),

    #[error("Illegal bonus move: {0}")]
    Plan(#[from] PlanRejection),

    #[error("Piece at {point} is not owned by {side:?}")]
    WrongOwner { point: Point, side: Owner },
}

/// Result type alias for move application.
pub type Result<T> = std::result::Result<T, ApplyError>;
