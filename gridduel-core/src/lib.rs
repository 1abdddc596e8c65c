//! Grid Duel rules engine.
//!
//! Two players each start with five pieces on opposite edges of a 5x5 board
//! and take turns moving one piece. Any opposing piece standing on a cell the
//! mover passes through is captured. Emptying the opponent's roster wins.
//!
//! # Board Layout
//!
//! ```text
//!          col 0  col 1  col 2  col 3  col 4
//! row 0    A-P1   A-H1   A-P2   A-H2   A-P3     A moves "forward" down (+row)
//! row 1     .      .      .      .      .
//! row 2     .      .      .      .      .
//! row 3     .      .      .      .      .
//! row 4    B-P1   B-H1   B-P2   B-H2   B-P3     B moves "forward" up (-row)
//! ```
//!
//! # Pieces
//!
//! ```text
//! P1, P2, P3: step 1 cell
//! H1, H2:     step exactly 2 cells, capturing on both cells of the path
//! ```
//!
//! `L`/`R` are board-relative (column -1/+1) for both players; `F`/`B` follow
//! the owner's forward direction.
//!
//! The crate is pure computation. A transport layer owns one [`GameState`]
//! per session, feeds it `(PieceId, Direction)` pairs through
//! [`rules::apply_move`], and broadcasts the returned snapshot (usually in its
//! [`wire::StateModel`] form).

pub mod error;
pub mod rules;
pub mod state;
pub mod wire;

#[cfg(feature = "wasm")]
pub mod wasm;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use error::{MoveRejected, SetupError, WireError};
pub use rules::{apply_move, DirectionPolicy, MovePlan, Ruleset};
pub use state::{GameState, MoveRecord, Piece};
pub use wire::StateModel;

/// Width and height of the board.
pub const BOARD_SIZE: usize = 5;

/// Number of pieces each player starts with.
pub const PIECES_PER_PLAYER: usize = 5;

/// Player identifier.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Player {
    A,
    B,
}

impl Player {
    pub const ALL: [Player; 2] = [Player::A, Player::B];

    /// Get the opponent player.
    #[inline]
    pub fn opponent(self) -> Player {
        match self {
            Player::A => Player::B,
            Player::B => Player::A,
        }
    }

    /// Row step of this player's "forward".
    #[inline]
    pub fn forward(self) -> i8 {
        match self {
            Player::A => 1,
            Player::B => -1,
        }
    }

    /// Row the player's pieces start on.
    #[inline]
    pub fn home_row(self) -> u8 {
        match self {
            Player::A => 0,
            Player::B => (BOARD_SIZE - 1) as u8,
        }
    }

    #[inline]
    pub(crate) fn index(self) -> usize {
        self as usize
    }

    pub fn code(self) -> &'static str {
        match self {
            Player::A => "A",
            Player::B => "B",
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Piece kind.
///
/// Declaration order is roster order and starting column.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PieceKind {
    P1,
    H1,
    P2,
    H2,
    P3,
}

impl PieceKind {
    pub const ALL: [PieceKind; PIECES_PER_PLAYER] = [
        PieceKind::P1,
        PieceKind::H1,
        PieceKind::P2,
        PieceKind::H2,
        PieceKind::P3,
    ];

    /// Whether this is a two-step piece.
    #[inline]
    pub fn is_hopper(self) -> bool {
        matches!(self, PieceKind::H1 | PieceKind::H2)
    }

    /// Number of cells the piece travels per move.
    #[inline]
    pub fn steps(self) -> u8 {
        if self.is_hopper() {
            2
        } else {
            1
        }
    }

    #[inline]
    pub(crate) fn index(self) -> usize {
        self as usize
    }

    pub fn code(self) -> &'static str {
        match self {
            PieceKind::P1 => "P1",
            PieceKind::H1 => "H1",
            PieceKind::P2 => "P2",
            PieceKind::H2 => "H2",
            PieceKind::P3 => "P3",
        }
    }
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Identity of a piece for the whole game: kinds are unique per roster.
///
/// Serializes as its `"A-P1"` label.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PieceId {
    pub owner: Player,
    pub kind: PieceKind,
}

impl PieceId {
    #[inline]
    pub const fn new(owner: Player, kind: PieceKind) -> PieceId {
        PieceId { owner, kind }
    }

    /// Cell this piece occupies in the starting position.
    pub fn home(self) -> Cell {
        Cell {
            row: self.owner.home_row(),
            col: self.kind.index() as u8,
        }
    }
}

impl fmt::Display for PieceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.owner, self.kind)
    }
}

/// Move direction.
///
/// `Forward`/`Backward` are relative to the moving piece's owner.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub enum Direction {
    #[serde(rename = "L")]
    Left,
    #[serde(rename = "R")]
    Right,
    #[serde(rename = "F")]
    Forward,
    #[serde(rename = "B")]
    Backward,
    #[serde(rename = "FL")]
    ForwardLeft,
    #[serde(rename = "FR")]
    ForwardRight,
    #[serde(rename = "BL")]
    BackwardLeft,
    #[serde(rename = "BR")]
    BackwardRight,
}

impl Direction {
    pub const ALL: [Direction; 8] = [
        Direction::Left,
        Direction::Right,
        Direction::Forward,
        Direction::Backward,
        Direction::ForwardLeft,
        Direction::ForwardRight,
        Direction::BackwardLeft,
        Direction::BackwardRight,
    ];

    #[inline]
    pub fn is_diagonal(self) -> bool {
        matches!(
            self,
            Direction::ForwardLeft
                | Direction::ForwardRight
                | Direction::BackwardLeft
                | Direction::BackwardRight
        )
    }

    /// One-cell `(row, col)` step for a piece owned by `owner`.
    pub fn delta(self, owner: Player) -> (i8, i8) {
        let f = owner.forward();
        match self {
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
            Direction::Forward => (f, 0),
            Direction::Backward => (-f, 0),
            Direction::ForwardLeft => (f, -1),
            Direction::ForwardRight => (f, 1),
            Direction::BackwardLeft => (-f, -1),
            Direction::BackwardRight => (-f, 1),
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Direction::Left => "L",
            Direction::Right => "R",
            Direction::Forward => "F",
            Direction::Backward => "B",
            Direction::ForwardLeft => "FL",
            Direction::ForwardRight => "FR",
            Direction::BackwardLeft => "BL",
            Direction::BackwardRight => "BR",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A cell on the 5x5 board. Always in range.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, PartialOrd, Ord)]
pub struct Cell {
    row: u8,
    col: u8,
}

impl Cell {
    /// Create a cell, or `None` if either coordinate is off the board.
    #[inline]
    pub fn new(row: u8, col: u8) -> Option<Cell> {
        let size = BOARD_SIZE as u8;
        (row < size && col < size).then_some(Cell { row, col })
    }

    #[inline]
    pub fn row(self) -> u8 {
        self.row
    }

    #[inline]
    pub fn col(self) -> u8 {
        self.col
    }

    /// The cell `(dr, dc)` away, or `None` if that leaves the board.
    pub fn offset(self, dr: i8, dc: i8) -> Option<Cell> {
        let row = u8::try_from(self.row as i16 + dr as i16).ok()?;
        let col = u8::try_from(self.col as i16 + dc as i16).ok()?;
        Cell::new(row, col)
    }

    /// Iterate over all 25 cells in row-major order.
    pub fn all() -> impl Iterator<Item = Cell> {
        let size = BOARD_SIZE as u8;
        (0..size).flat_map(move |row| (0..size).map(move |col| Cell { row, col }))
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.row, self.col)
    }
}

/// Build the starting position.
pub fn initialize() -> GameState {
    GameState::new()
}

/// Discard a game and start over. Same as [`initialize`].
pub fn reset() -> GameState {
    GameState::new()
}

/// Independent deep copy of `state` for transmission.
pub fn snapshot(state: &GameState) -> GameState {
    state.snapshot()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_opponent() {
        assert_eq!(Player::A.opponent(), Player::B);
        assert_eq!(Player::B.opponent(), Player::A);
    }

    #[test]
    fn test_forward_is_relative_to_owner() {
        assert_eq!(Direction::Forward.delta(Player::A), (1, 0));
        assert_eq!(Direction::Forward.delta(Player::B), (-1, 0));
        assert_eq!(Direction::BackwardRight.delta(Player::A), (-1, 1));
        assert_eq!(Direction::BackwardRight.delta(Player::B), (1, 1));
        // Left/right do not mirror
        assert_eq!(Direction::Left.delta(Player::A), (0, -1));
        assert_eq!(Direction::Left.delta(Player::B), (0, -1));
    }

    #[test]
    fn test_piece_steps() {
        assert_eq!(PieceKind::P1.steps(), 1);
        assert_eq!(PieceKind::P3.steps(), 1);
        assert_eq!(PieceKind::H1.steps(), 2);
        assert_eq!(PieceKind::H2.steps(), 2);
    }

    #[test]
    fn test_cell_bounds() {
        assert!(Cell::new(0, 0).is_some());
        assert!(Cell::new(4, 4).is_some());
        assert!(Cell::new(5, 0).is_none());
        assert!(Cell::new(0, 5).is_none());
        assert_eq!(Cell::all().count(), 25);
    }

    #[test]
    fn test_cell_offset() {
        let c = Cell::new(0, 4).unwrap();
        assert_eq!(c.offset(1, -1), Cell::new(1, 3));
        assert_eq!(c.offset(-1, 0), None);
        assert_eq!(c.offset(0, 1), None);
    }

    #[test]
    fn test_home_cells() {
        assert_eq!(PieceId::new(Player::A, PieceKind::P1).home(), Cell::new(0, 0).unwrap());
        assert_eq!(PieceId::new(Player::A, PieceKind::H2).home(), Cell::new(0, 3).unwrap());
        assert_eq!(PieceId::new(Player::B, PieceKind::H1).home(), Cell::new(4, 1).unwrap());
    }

    #[test]
    fn test_labels() {
        assert_eq!(PieceId::new(Player::B, PieceKind::H2).to_string(), "B-H2");
        assert_eq!(Direction::ForwardLeft.to_string(), "FL");
    }
}
