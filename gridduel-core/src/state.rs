//! Authoritative game state.
//!
//! Piece positions live in a fixed arena indexed by `(player, kind)`; the
//! board stores [`PieceId`]s only. Every mutation goes through
//! [`GameState::relocate`] or [`GameState::remove`], which update both sides
//! together.

use std::fmt;

use crate::error::SetupError;
use crate::{Cell, Direction, PieceId, PieceKind, Player, BOARD_SIZE, PIECES_PER_PLAYER};

/// A living piece and where it stands.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Piece {
    pub id: PieceId,
    pub position: Cell,
}

/// One entry of the move log. Entries are only ever appended.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum MoveRecord {
    /// A piece moved, capturing `captured` (in path order).
    Moved {
        actor: PieceId,
        direction: Direction,
        captured: Vec<PieceKind>,
    },
    /// Terminal record: the game ended.
    Victory { winner: Player },
}

impl fmt::Display for MoveRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveRecord::Moved {
                actor,
                direction,
                captured,
            } => {
                write!(f, "{}: {}", actor, direction)?;
                if !captured.is_empty() {
                    f.write_str(" (Captured ")?;
                    for (i, kind) in captured.iter().enumerate() {
                        if i > 0 {
                            f.write_str(", ")?;
                        }
                        write!(f, "{}", kind)?;
                    }
                    f.write_str(")")?;
                }
                Ok(())
            }
            MoveRecord::Victory { winner } => write!(f, "Player {} wins!", winner),
        }
    }
}

/// Full state of one game.
///
/// Owns all of its data, so `clone()` is a deep, independent copy.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct GameState {
    board: [[Option<PieceId>; BOARD_SIZE]; BOARD_SIZE],
    positions: [[Option<Cell>; PIECES_PER_PLAYER]; 2],
    current_player: Player,
    history: Vec<MoveRecord>,
    winner: Option<Player>,
}

impl GameState {
    /// Starting position: A on row 0, B on row 4, A to move.
    pub fn new() -> GameState {
        let mut state = GameState::empty(Player::A);
        for owner in Player::ALL {
            for kind in PieceKind::ALL {
                let id = PieceId::new(owner, kind);
                state.relocate(id, id.home());
            }
        }
        state
    }

    /// A board with no pieces and `current_player` to move.
    ///
    /// Populate it with [`GameState::place`].
    pub fn empty(current_player: Player) -> GameState {
        GameState {
            board: [[None; BOARD_SIZE]; BOARD_SIZE],
            positions: [[None; PIECES_PER_PLAYER]; 2],
            current_player,
            history: Vec::new(),
            winner: None,
        }
    }

    /// Put a piece that is not yet on the board onto an empty cell.
    pub fn place(&mut self, piece: PieceId, cell: Cell) -> Result<(), SetupError> {
        if self.position_of(piece).is_some() {
            return Err(SetupError::AlreadyPlaced { piece });
        }
        if let Some(occupant) = self.piece_at(cell) {
            return Err(SetupError::CellOccupied { cell, occupant });
        }
        self.relocate(piece, cell);
        Ok(())
    }

    /// Independent deep copy for transmission.
    pub fn snapshot(&self) -> GameState {
        self.clone()
    }

    #[inline]
    pub fn current_player(&self) -> Player {
        self.current_player
    }

    #[inline]
    pub fn winner(&self) -> Option<Player> {
        self.winner
    }

    #[inline]
    pub fn is_over(&self) -> bool {
        self.winner.is_some()
    }

    pub fn history(&self) -> &[MoveRecord] {
        &self.history
    }

    /// The piece standing on `cell`, if any.
    #[inline]
    pub fn piece_at(&self, cell: Cell) -> Option<PieceId> {
        self.board[cell.row() as usize][cell.col() as usize]
    }

    /// Where `piece` stands, or `None` if it has been captured.
    #[inline]
    pub fn position_of(&self, piece: PieceId) -> Option<Cell> {
        self.positions[piece.owner.index()][piece.kind.index()]
    }

    /// Living pieces of `player`, in kind order.
    pub fn roster(&self, player: Player) -> impl Iterator<Item = Piece> + '_ {
        PieceKind::ALL.into_iter().filter_map(move |kind| {
            let id = PieceId::new(player, kind);
            self.position_of(id).map(|position| Piece { id, position })
        })
    }

    pub fn roster_len(&self, player: Player) -> usize {
        self.positions[player.index()].iter().flatten().count()
    }

    /// Check that board and rosters agree and the turn marker is sane.
    pub fn is_consistent(&self) -> bool {
        let rosters_match = Player::ALL.into_iter().all(|player| {
            self.roster(player)
                .all(|piece| self.piece_at(piece.position) == Some(piece.id))
        });
        let board_matches = Cell::all().all(|cell| match self.piece_at(cell) {
            Some(id) => self.position_of(id) == Some(cell),
            None => true,
        });
        let occupied = Cell::all().filter(|&c| self.piece_at(c).is_some()).count();
        let living = self.roster_len(Player::A) + self.roster_len(Player::B);
        let turn_ok = self.winner.is_some() || self.roster_len(self.current_player) > 0;

        rosters_match && board_matches && occupied == living && turn_ok
    }

    // ========== Mutation (rules engine only) ==========

    /// Move `piece` to `to`, clearing its old cell. The caller must have
    /// emptied `to` first.
    pub(crate) fn relocate(&mut self, piece: PieceId, to: Cell) {
        debug_assert!(self.piece_at(to).is_none(), "{} is occupied", to);
        if let Some(from) = self.position_of(piece) {
            self.board[from.row() as usize][from.col() as usize] = None;
        }
        self.board[to.row() as usize][to.col() as usize] = Some(piece);
        self.positions[piece.owner.index()][piece.kind.index()] = Some(to);
    }

    /// Take `piece` off the board for good.
    pub(crate) fn remove(&mut self, piece: PieceId) {
        if let Some(at) = self.position_of(piece) {
            self.board[at.row() as usize][at.col() as usize] = None;
        }
        self.positions[piece.owner.index()][piece.kind.index()] = None;
    }

    pub(crate) fn record(&mut self, entry: MoveRecord) {
        self.history.push(entry);
    }

    pub(crate) fn switch_player(&mut self) {
        self.current_player = self.current_player.opponent();
    }

    pub(crate) fn declare_winner(&mut self, winner: Player) {
        self.winner = Some(winner);
        self.history.push(MoveRecord::Victory { winner });
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}
