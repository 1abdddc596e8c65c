//! Move legality and application.
//!
//! The engine is stateless: a [`Ruleset`] inspects a [`GameState`], and on
//! success commits every capture and the move itself in one step. Checks run
//! against the untouched state, so a rejected move never mutates anything.

use crate::error::MoveRejected;
use crate::state::{GameState, MoveRecord};
use crate::{Cell, Direction, PieceId, PieceKind};

/// Which directions each kind may take.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum DirectionPolicy {
    /// Every direction is legal for every kind.
    #[default]
    Unrestricted,
    /// P-kinds and H1 move orthogonally, H2 diagonally.
    ByKind,
}

impl DirectionPolicy {
    pub fn allows(self, kind: PieceKind, direction: Direction) -> bool {
        match self {
            DirectionPolicy::Unrestricted => true,
            DirectionPolicy::ByKind => match kind {
                PieceKind::H2 => direction.is_diagonal(),
                _ => !direction.is_diagonal(),
            },
        }
    }
}

/// Configurable rule set. `Ruleset::default()` is the standard game.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct Ruleset {
    pub directions: DirectionPolicy,
}

/// A validated move, ready to commit.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct MovePlan {
    pub piece: PieceId,
    pub direction: Direction,
    pub from: Cell,
    /// Cells stepped through, closest first, ending at the destination.
    pub path: Vec<Cell>,
    /// Opposing pieces on the path, in path order.
    pub captures: Vec<PieceId>,
}

impl MovePlan {
    pub fn destination(&self) -> Cell {
        // Paths always hold at least one cell
        self.path[self.path.len() - 1]
    }
}

/// Cells a `piece` standing on `from` passes through moving `direction`,
/// or `None` if any of them is off the board.
pub fn path(from: Cell, piece: PieceId, direction: Direction) -> Option<Vec<Cell>> {
    let (dr, dc) = direction.delta(piece.owner);
    (1..=piece.kind.steps() as i8)
        .map(|i| from.offset(dr * i, dc * i))
        .collect()
}

impl Ruleset {
    pub fn new(directions: DirectionPolicy) -> Ruleset {
        Ruleset { directions }
    }

    /// Validate a move without touching the state.
    ///
    /// Checks run in a fixed order and the first failure is reported.
    pub fn plan(
        &self,
        state: &GameState,
        piece: PieceId,
        direction: Direction,
    ) -> Result<MovePlan, MoveRejected> {
        if let Some(winner) = state.winner() {
            return Err(MoveRejected::GameOver { winner });
        }

        let from = state
            .position_of(piece)
            .ok_or(MoveRejected::NoSuchPiece { piece })?;

        if piece.owner != state.current_player() {
            return Err(MoveRejected::NotYourTurn {
                piece,
                current: state.current_player(),
            });
        }

        if !self.directions.allows(piece.kind, direction) {
            return Err(MoveRejected::IllegalDirection { piece, direction });
        }

        let path = path(from, piece, direction)
            .ok_or(MoveRejected::OutOfBounds { piece, direction })?;

        let destination = path[path.len() - 1];
        if let Some(occupant) = state.piece_at(destination) {
            if occupant.owner == piece.owner {
                return Err(MoveRejected::FriendlyDestination {
                    piece,
                    direction,
                    occupant,
                });
            }
        }

        // Friendly pieces mid-path are jumped, opposing ones are taken
        let captures = path
            .iter()
            .filter_map(|&cell| state.piece_at(cell))
            .filter(|occupant| occupant.owner != piece.owner)
            .collect();

        Ok(MovePlan {
            piece,
            direction,
            from,
            path,
            captures,
        })
    }

    /// Validate and apply a move, returning a snapshot of the new state.
    pub fn apply_move(
        &self,
        state: &mut GameState,
        piece: PieceId,
        direction: Direction,
    ) -> Result<GameState, MoveRejected> {
        let plan = self.plan(state, piece, direction)?;
        commit(state, plan);
        Ok(state.snapshot())
    }

    /// Every move the side to move may make, in roster then direction order.
    pub fn legal_moves(&self, state: &GameState) -> Vec<(PieceId, Direction)> {
        if state.is_over() {
            return Vec::new();
        }
        let player = state.current_player();
        state
            .roster(player)
            .flat_map(|p| Direction::ALL.into_iter().map(move |d| (p.id, d)))
            .filter(|&(id, d)| self.plan(state, id, d).is_ok())
            .collect()
    }
}

fn commit(state: &mut GameState, plan: MovePlan) {
    let mover = plan.piece.owner;
    let destination = plan.destination();

    for &captured in &plan.captures {
        state.remove(captured);
    }
    state.relocate(plan.piece, destination);

    state.record(MoveRecord::Moved {
        actor: plan.piece,
        direction: plan.direction,
        captured: plan.captures.iter().map(|id| id.kind).collect(),
    });

    if state.roster_len(mover.opponent()) == 0 {
        state.declare_winner(mover);
    } else {
        state.switch_player();
    }

    debug_assert!(state.is_consistent());
}

/// Apply a move under the standard rules.
pub fn apply_move(
    state: &mut GameState,
    piece: PieceId,
    direction: Direction,
) -> Result<GameState, MoveRejected> {
    Ruleset::default().apply_move(state, piece, direction)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Player;

    fn cell(row: u8, col: u8) -> Cell {
        Cell::new(row, col).unwrap()
    }

    fn id(owner: Player, kind: PieceKind) -> PieceId {
        PieceId::new(owner, kind)
    }

    #[test]
    fn test_first_move_forward() {
        let mut state = GameState::new();
        let a_p1 = id(Player::A, PieceKind::P1);

        let snap = apply_move(&mut state, a_p1, Direction::Forward).unwrap();

        assert_eq!(state.position_of(a_p1), Some(cell(1, 0)));
        assert_eq!(state.piece_at(cell(0, 0)), None);
        assert_eq!(state.piece_at(cell(1, 0)), Some(a_p1));
        assert_eq!(state.current_player(), Player::B);
        assert_eq!(state.history().len(), 1);
        assert_eq!(state.history()[0].to_string(), "A-P1: F");
        assert_eq!(snap, state);
    }

    #[test]
    fn test_capture_at_destination() {
        let mut state = GameState::empty(Player::A);
        let a_p1 = id(Player::A, PieceKind::P1);
        let b_p1 = id(Player::B, PieceKind::P1);
        state.place(a_p1, cell(0, 0)).unwrap();
        state.place(b_p1, cell(1, 0)).unwrap();
        state.place(id(Player::B, PieceKind::P2), cell(4, 4)).unwrap();

        apply_move(&mut state, a_p1, Direction::Forward).unwrap();

        assert_eq!(state.position_of(b_p1), None);
        assert_eq!(state.roster_len(Player::B), 1);
        assert_eq!(state.piece_at(cell(1, 0)), Some(a_p1));
        assert_eq!(state.history()[0].to_string(), "A-P1: F (Captured P1)");
        assert_eq!(state.current_player(), Player::B);
    }

    #[test]
    fn test_hopper_captures_on_intermediate_cell() {
        // B's H1 forward from (4,1) passes (3,1) and lands on empty (2,1)
        let mut state = GameState::new();
        let a_p2 = id(Player::A, PieceKind::P2);
        let b_h1 = id(Player::B, PieceKind::H1);
        state.remove(a_p2);
        state.place(a_p2, cell(3, 1)).unwrap();
        state.switch_player();

        apply_move(&mut state, b_h1, Direction::Forward).unwrap();

        assert_eq!(state.position_of(b_h1), Some(cell(2, 1)));
        assert_eq!(state.position_of(a_p2), None);
        assert_eq!(state.piece_at(cell(3, 1)), None);
        assert_eq!(state.roster_len(Player::A), 4);
        assert_eq!(state.history()[0].to_string(), "B-H1: F (Captured P2)");
    }

    #[test]
    fn test_hopper_captures_whole_path_in_order() {
        let mut state = GameState::empty(Player::B);
        let b_h1 = id(Player::B, PieceKind::H1);
        state.place(b_h1, cell(4, 1)).unwrap();
        state.place(id(Player::A, PieceKind::P3), cell(3, 1)).unwrap();
        state.place(id(Player::A, PieceKind::H2), cell(2, 1)).unwrap();
        state.place(id(Player::A, PieceKind::P1), cell(0, 0)).unwrap();

        let plan = Ruleset::default()
            .plan(&state, b_h1, Direction::Forward)
            .unwrap();
        assert_eq!(plan.path, vec![cell(3, 1), cell(2, 1)]);
        assert_eq!(
            plan.captures,
            vec![id(Player::A, PieceKind::P3), id(Player::A, PieceKind::H2)]
        );

        apply_move(&mut state, b_h1, Direction::Forward).unwrap();
        assert_eq!(
            state.history()[0].to_string(),
            "B-H1: F (Captured P3, H2)"
        );
        assert_eq!(state.roster_len(Player::A), 1);
    }

    #[test]
    fn test_hopper_jumps_friendly_piece() {
        let mut state = GameState::empty(Player::A);
        let a_h2 = id(Player::A, PieceKind::H2);
        let a_p1 = id(Player::A, PieceKind::P1);
        state.place(a_h2, cell(0, 3)).unwrap();
        state.place(a_p1, cell(1, 2)).unwrap();
        state.place(id(Player::B, PieceKind::P1), cell(4, 4)).unwrap();

        apply_move(&mut state, a_h2, Direction::ForwardLeft).unwrap();

        assert_eq!(state.position_of(a_h2), Some(cell(2, 1)));
        assert_eq!(state.position_of(a_p1), Some(cell(1, 2)));
        assert_eq!(state.history()[0].to_string(), "A-H2: FL");
    }

    #[test]
    fn test_landing_on_friendly_piece_rejected() {
        let mut state = GameState::new();
        state.remove(id(Player::A, PieceKind::P2));
        state
            .place(id(Player::A, PieceKind::P2), cell(2, 1))
            .unwrap();
        let before = state.clone();

        let err = apply_move(&mut state, id(Player::A, PieceKind::H1), Direction::Forward)
            .unwrap_err();
        assert_eq!(
            err,
            MoveRejected::FriendlyDestination {
                piece: id(Player::A, PieceKind::H1),
                direction: Direction::Forward,
                occupant: id(Player::A, PieceKind::P2),
            }
        );
        assert_eq!(state, before);
    }

    #[test]
    fn test_out_of_bounds_does_not_mutate() {
        let mut state = GameState::new();
        let before = state.clone();

        let err = apply_move(&mut state, id(Player::A, PieceKind::P1), Direction::Backward)
            .unwrap_err();
        assert_eq!(
            err,
            MoveRejected::OutOfBounds {
                piece: id(Player::A, PieceKind::P1),
                direction: Direction::Backward,
            }
        );
        assert_eq!(state, before);
    }

    #[test]
    fn test_hopper_out_of_bounds_on_second_step() {
        // First step already off the board
        let mut state = GameState::empty(Player::A);
        let a_h1 = id(Player::A, PieceKind::H1);
        state.place(a_h1, cell(1, 4)).unwrap();
        state.place(id(Player::B, PieceKind::P1), cell(3, 0)).unwrap();

        let err = apply_move(&mut state, a_h1, Direction::Right).unwrap_err();
        assert_eq!(err.reason(), "out_of_bounds");

        let mut state = GameState::empty(Player::A);
        state.place(a_h1, cell(3, 0)).unwrap();
        state.place(id(Player::B, PieceKind::P1), cell(4, 1)).unwrap();
        // Only the second step leaves the board
        let err = apply_move(&mut state, a_h1, Direction::Forward).unwrap_err();
        assert_eq!(err.reason(), "out_of_bounds");
    }

    #[test]
    fn test_not_your_turn() {
        let mut state = GameState::new();
        let err = apply_move(&mut state, id(Player::B, PieceKind::P1), Direction::Forward)
            .unwrap_err();
        assert_eq!(
            err,
            MoveRejected::NotYourTurn {
                piece: id(Player::B, PieceKind::P1),
                current: Player::A,
            }
        );
    }

    #[test]
    fn test_no_such_piece_checked_before_turn() {
        let mut state = GameState::new();
        let b_p3 = id(Player::B, PieceKind::P3);
        state.remove(b_p3);

        // B's captured piece on A's turn: missing piece wins over wrong turn
        let err = apply_move(&mut state, b_p3, Direction::Forward).unwrap_err();
        assert_eq!(err, MoveRejected::NoSuchPiece { piece: b_p3 });
    }

    #[test]
    fn test_turn_checked_before_bounds() {
        let mut state = GameState::new();
        let err = apply_move(&mut state, id(Player::B, PieceKind::P1), Direction::Backward)
            .unwrap_err();
        assert_eq!(err.reason(), "not_your_turn");
    }

    #[test]
    fn test_by_kind_policy() {
        let rules = Ruleset::new(DirectionPolicy::ByKind);
        let mut state = GameState::new();

        let err = rules
            .apply_move(&mut state, id(Player::A, PieceKind::H2), Direction::Forward)
            .unwrap_err();
        assert_eq!(
            err,
            MoveRejected::IllegalDirection {
                piece: id(Player::A, PieceKind::H2),
                direction: Direction::Forward,
            }
        );

        let err = rules
            .apply_move(&mut state, id(Player::A, PieceKind::P1), Direction::ForwardRight)
            .unwrap_err();
        assert_eq!(err.reason(), "illegal_direction");

        rules
            .apply_move(&mut state, id(Player::A, PieceKind::H2), Direction::ForwardLeft)
            .unwrap();
        assert_eq!(state.position_of(id(Player::A, PieceKind::H2)), Some(cell(2, 1)));
    }

    #[test]
    fn test_illegal_direction_checked_before_bounds() {
        let rules = Ruleset::new(DirectionPolicy::ByKind);
        let mut state = GameState::new();
        // Off the board and wrong direction for H2: direction is reported
        let err = rules
            .apply_move(&mut state, id(Player::A, PieceKind::H2), Direction::Backward)
            .unwrap_err();
        assert_eq!(err.reason(), "illegal_direction");
    }

    #[test]
    fn test_win_stops_turns() {
        let mut state = GameState::empty(Player::A);
        let a_p1 = id(Player::A, PieceKind::P1);
        state.place(a_p1, cell(2, 2)).unwrap();
        state.place(id(Player::B, PieceKind::P3), cell(3, 2)).unwrap();

        apply_move(&mut state, a_p1, Direction::Forward).unwrap();

        assert_eq!(state.winner(), Some(Player::A));
        assert_eq!(state.current_player(), Player::A);
        assert_eq!(state.roster_len(Player::B), 0);
        let log: Vec<String> = state.history().iter().map(|r| r.to_string()).collect();
        assert_eq!(log, vec!["A-P1: F (Captured P3)", "Player A wins!"]);

        let before = state.clone();
        for (piece, direction) in [
            (a_p1, Direction::Forward),
            (a_p1, Direction::Left),
            (id(Player::B, PieceKind::P3), Direction::Forward),
        ] {
            let err = apply_move(&mut state, piece, direction).unwrap_err();
            assert_eq!(err, MoveRejected::GameOver { winner: Player::A });
        }
        assert_eq!(state, before);
    }

    #[test]
    fn test_legal_moves_opening() {
        let state = GameState::new();
        let moves = Ruleset::default().legal_moves(&state);

        // Everything is from A's roster
        assert!(moves.iter().all(|(id, _)| id.owner == Player::A));
        // P1 in the corner: F, R is friendly (H1), FR; L/B/FL/BL/BR off board
        let p1: Vec<Direction> = moves
            .iter()
            .filter(|(id, _)| id.kind == PieceKind::P1)
            .map(|&(_, d)| d)
            .collect();
        assert_eq!(p1, vec![Direction::Forward, Direction::ForwardRight]);
        // H1 at (0,1): L leaves the board, R lands on H2 at (0,3)
        let h1: Vec<Direction> = moves
            .iter()
            .filter(|(id, _)| id.kind == PieceKind::H1)
            .map(|&(_, d)| d)
            .collect();
        assert_eq!(h1, vec![Direction::Forward, Direction::ForwardRight]);
    }

    #[test]
    fn test_legal_moves_empty_when_over() {
        let mut state = GameState::empty(Player::B);
        let b_p1 = id(Player::B, PieceKind::P1);
        state.place(b_p1, cell(1, 0)).unwrap();
        state.place(id(Player::A, PieceKind::P1), cell(0, 0)).unwrap();
        apply_move(&mut state, b_p1, Direction::Forward).unwrap();

        assert!(state.is_over());
        assert!(Ruleset::default().legal_moves(&state).is_empty());
    }

    #[test]
    fn test_path_lengths() {
        let from = cell(2, 2);
        let p = path(from, id(Player::A, PieceKind::P2), Direction::BackwardLeft).unwrap();
        assert_eq!(p, vec![cell(1, 1)]);
        let h = path(from, id(Player::B, PieceKind::H2), Direction::ForwardRight).unwrap();
        assert_eq!(h, vec![cell(1, 3), cell(0, 4)]);
        assert!(path(cell(0, 0), id(Player::B, PieceKind::H1), Direction::Forward).is_none());
    }
}
