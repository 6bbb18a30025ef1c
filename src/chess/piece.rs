//! [`Piece`] is a chess piece placed on the board together with its movement
//! history. It is the only entry point for move generation: the caller asks a
//! piece for its moves and passes the board snapshot to read occupancy from.

use std::collections::BTreeSet;

use crate::chess::board::Board;
use crate::chess::core::{Direction, Occupant, PieceKind, Player, Position};
use crate::chess::movegen;
use crate::chess::moves::{Move, MoveFlags};

/// A piece standing on the board.
///
/// Pieces are immutable values: committing a move produces a new [`Piece`]
/// through [`Piece::moved_to`] and the board replaces the old value with it.
/// A piece never holds a reference to the board.
///
/// The move history is tracked as the number of moves made by this piece, the
/// global index of the last one and the square it started from. Castling and
/// en passant eligibility depend on them.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Piece {
    kind: PieceKind,
    owner: Player,
    position: Position,
    move_count: u16,
    /// `None` iff the piece has never moved.
    last_move: Option<u32>,
    /// Where the last move of this piece started.
    last_origin: Option<Position>,
}

impl Piece {
    /// Creates a piece that has not moved yet.
    ///
    /// # Panics
    ///
    /// The piece has to be placed on the board.
    #[must_use]
    pub fn new(kind: PieceKind, owner: Player, position: Position) -> Self {
        assert!(
            position.is_valid(),
            "piece can not be placed at {position} outside of the board"
        );
        Self {
            kind,
            owner,
            position,
            move_count: 0,
            last_move: None,
            last_origin: None,
        }
    }

    #[must_use]
    #[allow(missing_docs)]
    pub const fn kind(&self) -> PieceKind {
        self.kind
    }

    #[must_use]
    #[allow(missing_docs)]
    pub const fn owner(&self) -> Player {
        self.owner
    }

    #[must_use]
    #[allow(missing_docs)]
    pub const fn is_white(&self) -> bool {
        matches!(self.owner, Player::White)
    }

    #[must_use]
    #[allow(missing_docs)]
    pub const fn position(&self) -> Position {
        self.position
    }

    /// What the board reports when this piece occupies a square.
    #[must_use]
    pub const fn occupant(&self) -> Occupant {
        Occupant {
            owner: self.owner,
            kind: self.kind,
        }
    }

    #[must_use]
    #[allow(missing_docs)]
    pub const fn is_moved(&self) -> bool {
        self.move_count != 0
    }

    #[must_use]
    #[allow(missing_docs)]
    pub const fn move_count(&self) -> u16 {
        self.move_count
    }

    /// The global index of the last move made by this piece.
    #[must_use]
    pub const fn last_move(&self) -> Option<u32> {
        self.last_move
    }

    /// The square the last move of this piece started from.
    #[must_use]
    pub const fn last_origin(&self) -> Option<Position> {
        self.last_origin
    }

    /// Returns true iff the last move of this piece went two rows forward or
    /// backward, i.e. it was a pawn's double push.
    #[must_use]
    pub fn advanced_two_rows(&self) -> bool {
        self.last_origin
            .is_some_and(|origin| (origin.row() - self.position.row()).abs() == 2)
    }

    /// Returns true iff the previous move of the game (the one before
    /// `current_move`) was made by this piece.
    ///
    /// ```
    /// use chessmoves::chess::core::{PieceKind, Player, Position};
    /// use chessmoves::chess::piece::Piece;
    ///
    /// let pawn = Piece::new(PieceKind::Pawn, Player::Black, Position::new(3, 6));
    /// assert!(!pawn.just_moved(0));
    /// let pawn = pawn.moved_to(Position::new(3, 4), 7);
    /// assert!(pawn.just_moved(8));
    /// assert!(!pawn.just_moved(7));
    /// assert!(!pawn.just_moved(9));
    /// ```
    #[must_use]
    pub fn just_moved(&self, current_move: u32) -> bool {
        current_move
            .checked_sub(1)
            .is_some_and(|previous| self.last_move == Some(previous))
    }

    /// Places the piece on another square without recording a move.
    #[must_use]
    pub fn with_position(self, position: Position) -> Self {
        Self::new(self.kind, self.owner, position).with_history(
            self.move_count,
            self.last_move,
            self.last_origin,
        )
    }

    /// Records a move made at `current_move` that ended on the current square
    /// and started on `origin`.
    #[must_use]
    pub fn with_last_move(self, origin: Position, current_move: u32) -> Self {
        self.with_history(
            self.move_count.saturating_add(1),
            Some(current_move),
            Some(origin),
        )
    }

    /// The state of this piece after it moved to `destination` as the
    /// `current_move`-th move of the game.
    #[must_use]
    pub fn moved_to(self, destination: Position, current_move: u32) -> Self {
        self.with_position(destination)
            .with_last_move(self.position, current_move)
    }

    /// Replaces a pawn reaching the last row. The history is carried over.
    #[must_use]
    pub const fn promoted(self, kind: PieceKind) -> Self {
        Self { kind, ..self }
    }

    const fn with_history(
        self,
        move_count: u16,
        last_move: Option<u32>,
        last_origin: Option<Position>,
    ) -> Self {
        Self {
            move_count,
            last_move,
            last_origin,
            ..self
        }
    }

    /// Packages a move of this piece to an already validated `destination`.
    /// The occupant of the destination decides whether it is a capture.
    ///
    /// This is the only place where captures and ordinary moves are told apart
    /// for the regular movement patterns.
    #[must_use]
    pub fn create_move(&self, destination: Position, board: &(impl Board + ?Sized)) -> Move {
        match board.occupant(destination) {
            None => Move::new(
                self.position,
                destination,
                None,
                MoveFlags::QUIET,
                self.owner,
            ),
            Some(occupant) => Move::new(
                self.position,
                destination,
                Some(occupant.kind),
                MoveFlags::CAPTURE,
                self.owner,
            ),
        }
    }

    /// Produces every square this piece can reach according to its movement
    /// pattern and the occupancy of the `board`. The moves are not checked for
    /// leaving the own king in check.
    ///
    /// The result is empty when the piece can not move at all. Neither the
    /// piece nor the board are modified, so calling this twice on the same
    /// snapshot gives the same set.
    #[must_use]
    pub fn generate_moves(&self, board: &(impl Board + ?Sized)) -> BTreeSet<Move> {
        let mut moves = BTreeSet::new();
        match self.kind {
            PieceKind::Queen => movegen::slide(self, board, &Direction::ALL, &mut moves),
            PieceKind::Rook => movegen::slide(self, board, &Direction::ORTHOGONAL, &mut moves),
            PieceKind::Bishop => movegen::slide(self, board, &Direction::DIAGONAL, &mut moves),
            PieceKind::Knight => movegen::leap(self, board, &movegen::KNIGHT_JUMPS, &mut moves),
            PieceKind::King => {
                movegen::leap(self, board, &movegen::KING_STEPS, &mut moves);
                movegen::castle(self, board, &mut moves);
            },
            PieceKind::Pawn => movegen::pawn(self, board, &mut moves),
        }
        log::trace!(
            "{} on {} reaches {} squares",
            self.occupant(),
            self.position,
            moves.len()
        );
        moves
    }
}
