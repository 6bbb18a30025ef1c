//! The read-only view of the board used by move generation and a simple
//! square-centric [`MailboxBoard`] implementing it.

use std::collections::BTreeSet;
use std::fmt::{self, Write};

use anyhow::{bail, Context};

use crate::chess::core::{Occupant, PieceKind, Player, Position, BOARD_SIZE, BOARD_WIDTH};
use crate::chess::movegen;
use crate::chess::moves::{Move, MoveFlags};
use crate::chess::piece::Piece;

const WIDTH: i8 = BOARD_WIDTH as i8;

/// Everything the move generators can learn about the board. Generators only
/// ever receive a shared reference: they can not modify the board.
pub trait Board {
    /// Returns the piece standing on a valid `position` or `None` if the
    /// square is empty.
    fn piece_at(&self, position: Position) -> Option<&Piece>;

    /// Global index of the move that is about to be made. The first move of
    /// the game has index 0.
    fn current_move(&self) -> u32;

    /// Reports what occupies the square. An empty square has no owner.
    ///
    /// # Panics
    ///
    /// Occupancy is only defined for the positions on the board.
    fn occupant(&self, position: Position) -> Option<Occupant> {
        assert!(
            position.is_valid(),
            "occupancy of {position} is undefined: it is outside of the board"
        );
        self.piece_at(position).map(Piece::occupant)
    }
}

/// Square-centric ([Mailbox]) board representation: each of the 64 squares
/// holds the piece standing on it, if any.
///
/// [Mailbox]: https://www.chessprogramming.org/Mailbox
#[derive(Clone, PartialEq, Eq)]
pub struct MailboxBoard {
    squares: [Option<Piece>; BOARD_SIZE as usize],
    current_move: u32,
}

impl MailboxBoard {
    /// Creates a board without any pieces.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            squares: [None; BOARD_SIZE as usize],
            current_move: 0,
        }
    }

    /// Creates the starting position of the standard chess variant.
    ///
    /// ```
    /// use chessmoves::chess::board::MailboxBoard;
    ///
    /// assert_eq!(
    ///     &MailboxBoard::starting().to_string(),
    ///     "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR"
    /// );
    /// ```
    #[must_use]
    pub fn starting() -> Self {
        const BACK_ROW: [PieceKind; BOARD_WIDTH as usize] = [
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Queen,
            PieceKind::King,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Rook,
        ];
        let mut result = Self::empty();
        for player in [Player::White, Player::Black] {
            for (column, kind) in (0..WIDTH).zip(BACK_ROW) {
                result.put(Piece::new(
                    kind,
                    player,
                    Position::new(column, player.back_row()),
                ));
                result.put(Piece::new(
                    PieceKind::Pawn,
                    player,
                    Position::new(column, player.pawn_row()),
                ));
            }
        }
        result
    }

    /// Parses the piece placement part of [Forsyth-Edwards Notation]. All
    /// pieces are created without any move history.
    ///
    /// NOTE: This expects properly-formatted inputs: no extra symbols or
    /// additional whitespace. Use [`MailboxBoard::try_from`] for cleaning up
    /// the input and dropping the FEN parts that describe the game rather than
    /// the board.
    ///
    /// [Forsyth-Edwards Notation]: https://www.chessprogramming.org/Forsyth-Edwards_Notation
    pub fn from_fen(placement: &str) -> anyhow::Result<Self> {
        let mut result = Self::empty();
        let mut row = WIDTH;
        for row_fen in placement.split('/') {
            if row == 0 {
                bail!("incorrect FEN: expected 8 ranks, got {placement}");
            }
            row -= 1;
            let mut column: u8 = 0;
            for symbol in row_fen.chars() {
                if column >= BOARD_WIDTH {
                    bail!("incorrect FEN: rank {row_fen} is longer than {BOARD_WIDTH} squares");
                }
                match symbol {
                    '0' => bail!("increment can not be 0"),
                    '1'..='8' => {
                        column += symbol as u8 - b'0';
                        continue;
                    },
                    _ => (),
                }
                let occupant = Occupant::try_from(symbol)
                    .with_context(|| format!("incorrect FEN: rank {row_fen}"))?;
                result.put(Piece::new(
                    occupant.kind,
                    occupant.owner,
                    Position::new(column as i8, row),
                ));
                column += 1;
            }
            if column != BOARD_WIDTH {
                bail!(
                    "incorrect FEN: rank size should be exactly {BOARD_WIDTH}, got {row_fen} of length {column}"
                );
            }
        }
        if row != 0 {
            bail!("incorrect FEN: there should be 8 ranks, got {placement}");
        }
        Ok(result)
    }

    /// Places a piece on the square it claims to stand on.
    pub fn put(&mut self, piece: Piece) {
        let square = &mut self.squares[piece.position().index()];
        debug_assert!(
            square.is_none(),
            "Can't put piece to already occupied square {}",
            piece.position()
        );
        *square = Some(piece);
    }

    /// Takes the piece off the square.
    pub fn remove(&mut self, position: Position) -> Option<Piece> {
        self.squares[position.index()].take()
    }

    /// Overrides the index of the next move of the game.
    pub fn set_current_move(&mut self, current_move: u32) {
        self.current_move = current_move;
    }

    /// All pieces on the board, from A1 to H8.
    pub fn pieces(&self) -> impl Iterator<Item = &Piece> {
        self.squares.iter().flatten()
    }

    /// Collects the moves of all pieces owned by the `player`.
    #[must_use]
    pub fn generate_moves(&self, player: Player) -> BTreeSet<Move> {
        self.pieces()
            .filter(|piece| piece.owner() == player)
            .flat_map(|piece| piece.generate_moves(self))
            .collect()
    }

    /// Commits a move produced by one of the pieces on this board. The moving
    /// piece (and the castling rook) record the move in their history, the
    /// captured piece is removed and a promoted pawn becomes a queen.
    ///
    /// # Errors
    ///
    /// Returns an error if the move origin does not hold a piece of the mover
    /// or castling has no rook to move.
    pub fn make_move(&mut self, next_move: &Move) -> anyhow::Result<()> {
        let (from, to) = (next_move.from(), next_move.to());
        let Some(piece) = self.squares[from.index()] else {
            bail!("there is no piece to move on {from}");
        };
        if piece.owner() != next_move.mover() {
            bail!("piece on {from} does not belong to the player making {next_move}");
        }
        let flags = next_move.flags();
        if flags.contains(MoveFlags::EN_PASSANT) {
            let _victim = self.remove(Position::new(to.column(), from.row()));
        }
        if let Some((rook_column, castled_column)) = movegen::castled_rook_columns(flags) {
            let Some(rook) = self.remove(Position::new(rook_column, from.row())) else {
                bail!("there is no rook to castle with for {next_move}");
            };
            self.put(rook.moved_to(Position::new(castled_column, from.row()), self.current_move));
        }
        let mut moved = piece.moved_to(to, self.current_move);
        if flags.contains(MoveFlags::PROMOTION) {
            moved = moved.promoted(PieceKind::Queen);
        }
        let _mover = self.remove(from);
        self.squares[to.index()] = Some(moved);
        log::debug!("committed {next_move} as move {}", self.current_move);
        self.current_move += 1;
        Ok(())
    }
}

impl Board for MailboxBoard {
    fn piece_at(&self, position: Position) -> Option<&Piece> {
        self.squares[position.index()].as_ref()
    }

    fn current_move(&self) -> u32 {
        self.current_move
    }
}

impl Default for MailboxBoard {
    fn default() -> Self {
        Self::empty()
    }
}

impl TryFrom<&str> for MailboxBoard {
    type Error = anyhow::Error;

    /// Parses the board from full or trimmed FEN, optionally prefixed with
    /// "fen". Only the piece placement is used: side to move, castling rights
    /// and the clocks describe the game rather than the board.
    fn try_from(input: &str) -> anyhow::Result<Self> {
        let input = input.trim();
        let input = input.strip_prefix("fen ").unwrap_or(input);
        match input.split_whitespace().next() {
            Some(placement) => Self::from_fen(placement),
            None => bail!("incorrect FEN: missing pieces placement"),
        }
    }
}

impl fmt::Display for MailboxBoard {
    /// Prints the piece placement in Forsyth-Edwards Notation.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in (0..WIDTH).rev() {
            let mut empty_squares = 0;
            for column in 0..WIDTH {
                match self.piece_at(Position::new(column, row)) {
                    Some(piece) => {
                        if empty_squares != 0 {
                            write!(f, "{empty_squares}")?;
                            empty_squares = 0;
                        }
                        write!(f, "{}", piece.occupant())?;
                    },
                    None => empty_squares += 1,
                }
            }
            if empty_squares != 0 {
                write!(f, "{empty_squares}")?;
            }
            if row != 0 {
                f.write_char('/')?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for MailboxBoard {
    /// Dumps the board in a human-readable format ('.' for empty square, FEN
    /// algebraic symbol for piece).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in (0..WIDTH).rev() {
            for column in 0..WIDTH {
                match self.piece_at(Position::new(column, row)) {
                    Some(piece) => write!(f, "{}", piece.occupant())?,
                    None => f.write_char('.')?,
                }
                if column != WIDTH - 1 {
                    f.write_char(' ')?;
                }
            }
            if row != 0 {
                f.write_char('\n')?;
            }
        }
        Ok(())
    }
}
