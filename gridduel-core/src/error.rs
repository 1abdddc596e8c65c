//! Error types for the rules engine.

use crate::{Cell, Direction, PieceId, Player};

/// Why a move was refused. The state is never modified when this is returned.
///
/// Checks run in declaration order and the first failure wins. Besides the
/// five classic reasons, clients must expect `friendly_destination`: a move
/// whose final cell holds one of the mover's own pieces is refused, since two
/// pieces may never share a cell. Friendly pieces mid-path are still jumped.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoveRejected {
    #[error("game is over: player {winner} won")]
    GameOver { winner: Player },

    #[error("no living piece {piece}")]
    NoSuchPiece { piece: PieceId },

    #[error("{piece} cannot move on player {current}'s turn")]
    NotYourTurn { piece: PieceId, current: Player },

    #[error("{piece} cannot move {direction}")]
    IllegalDirection { piece: PieceId, direction: Direction },

    #[error("{piece} moving {direction} leaves the board")]
    OutOfBounds { piece: PieceId, direction: Direction },

    /// The destination holds a piece of the same owner.
    #[error("{piece} moving {direction} would land on {occupant}")]
    FriendlyDestination {
        piece: PieceId,
        direction: Direction,
        occupant: PieceId,
    },
}

impl MoveRejected {
    /// Stable machine-readable reason code.
    pub fn reason(&self) -> &'static str {
        match self {
            MoveRejected::GameOver { .. } => "game_over",
            MoveRejected::NoSuchPiece { .. } => "no_such_piece",
            MoveRejected::NotYourTurn { .. } => "not_your_turn",
            MoveRejected::IllegalDirection { .. } => "illegal_direction",
            MoveRejected::OutOfBounds { .. } => "out_of_bounds",
            MoveRejected::FriendlyDestination { .. } => "friendly_destination",
        }
    }
}

/// Invalid hand-built position.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SetupError {
    #[error("cell {cell} is already held by {occupant}")]
    CellOccupied { cell: Cell, occupant: PieceId },

    #[error("{piece} is already on the board")]
    AlreadyPlaced { piece: PieceId },
}

/// Malformed wire input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WireError {
    #[error("unknown player {0:?}")]
    UnknownPlayer(String),

    #[error("unknown piece kind {0:?}")]
    UnknownKind(String),

    #[error("unknown direction {0:?}")]
    UnknownDirection(String),

    #[error("malformed piece label {0:?}, expected \"<player>-<kind>\"")]
    MalformedLabel(String),
}
