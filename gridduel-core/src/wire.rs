//! JSON wire format shared with existing clients.
//!
//! ```text
//! {
//!   "grid":          [["A-P1", "A-H1", ...], [null, ...], ...]   5x5 labels
//!   "players":       {"A": [{"type": "P1", "position": [0, 0]}, ...], "B": [...]}
//!   "currentPlayer": "A" | "B"
//!   "moveHistory":   ["A-P1: F", "B-H1: F (Captured P2)", "Player B wins!"]
//!   "winner":        "A" | "B" | null
//! }
//! ```
//!
//! This is the only place piece labels are parsed.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::WireError;
use crate::state::GameState;
use crate::{Cell, Direction, PieceId, PieceKind, Player};

impl FromStr for Player {
    type Err = WireError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "A" => Ok(Player::A),
            "B" => Ok(Player::B),
            _ => Err(WireError::UnknownPlayer(s.to_string())),
        }
    }
}

impl FromStr for PieceKind {
    type Err = WireError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PieceKind::ALL
            .into_iter()
            .find(|kind| kind.code() == s)
            .ok_or_else(|| WireError::UnknownKind(s.to_string()))
    }
}

impl FromStr for Direction {
    type Err = WireError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Direction::ALL
            .into_iter()
            .find(|direction| direction.code() == s)
            .ok_or_else(|| WireError::UnknownDirection(s.to_string()))
    }
}

/// Parses `"A-P1"` style labels.
impl FromStr for PieceId {
    type Err = WireError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (owner, kind) = s
            .split_once('-')
            .ok_or_else(|| WireError::MalformedLabel(s.to_string()))?;
        Ok(PieceId::new(owner.parse()?, kind.parse()?))
    }
}

impl TryFrom<String> for PieceId {
    type Error = WireError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PieceId> for String {
    fn from(id: PieceId) -> Self {
        id.to_string()
    }
}

/// One living piece as clients see it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PieceModel {
    #[serde(rename = "type")]
    pub kind: PieceKind,
    pub position: [u8; 2],
}

/// Both rosters, keyed by player code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayersModel {
    #[serde(rename = "A")]
    pub a: Vec<PieceModel>,
    #[serde(rename = "B")]
    pub b: Vec<PieceModel>,
}

/// Full game state as broadcast to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateModel {
    pub grid: Vec<Vec<Option<String>>>,
    pub players: PlayersModel,
    pub current_player: Player,
    pub move_history: Vec<String>,
    pub winner: Option<Player>,
}

/// A move the side to move may make.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegalMoveModel {
    pub piece: PieceId,
    pub direction: Direction,
}

fn roster_model(state: &GameState, player: Player) -> Vec<PieceModel> {
    state
        .roster(player)
        .map(|piece| PieceModel {
            kind: piece.id.kind,
            position: [piece.position.row(), piece.position.col()],
        })
        .collect()
}

impl From<&GameState> for StateModel {
    fn from(state: &GameState) -> Self {
        let mut grid = vec![vec![None; crate::BOARD_SIZE]; crate::BOARD_SIZE];
        for cell in Cell::all() {
            grid[cell.row() as usize][cell.col() as usize] =
                state.piece_at(cell).map(|id| id.to_string());
        }

        StateModel {
            grid,
            players: PlayersModel {
                a: roster_model(state, Player::A),
                b: roster_model(state, Player::B),
            },
            current_player: state.current_player(),
            move_history: state.history().iter().map(|r| r.to_string()).collect(),
            winner: state.winner(),
        }
    }
}

impl From<(PieceId, Direction)> for LegalMoveModel {
    fn from((piece, direction): (PieceId, Direction)) -> Self {
        LegalMoveModel { piece, direction }
    }
}
