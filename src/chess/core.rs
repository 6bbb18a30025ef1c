//! Chess primitives commonly used within [`crate::chess`].

use std::fmt::{self, Write};
use std::ops::Not;

use anyhow::bail;
use itertools::Itertools;

#[allow(missing_docs)]
pub const BOARD_WIDTH: u8 = 8;
#[allow(missing_docs)]
pub const BOARD_SIZE: u8 = BOARD_WIDTH * BOARD_WIDTH;

const WIDTH: i8 = BOARD_WIDTH as i8;

/// A (column, row) coordinate on the board. Columns go from left to right (file
/// `a` is column 0) and rows go from bottom to top (rank `1` is row 0), both
/// from White's perspective.
///
/// A position may hold out-of-range coordinates: sliding pieces walk off the
/// board while casting rays and the walk is stopped by [`Position::is_valid`].
/// Such positions can only be tested for validity and offset further; they are
/// never used to query the board or to construct a
/// [`crate::chess::moves::Move`].
///
/// ```
/// use chessmoves::chess::core::Position;
///
/// let e4 = Position::new(4, 3);
/// assert!(e4.is_valid());
/// assert_eq!(e4.to_string(), "e4");
/// assert!(!e4.offset(0, 5).is_valid());
/// ```
///
/// Position is a compact representation using only two bytes.
///
/// ```
/// use chessmoves::chess::core::Position;
///
/// assert_eq!(std::mem::size_of::<Position>(), 2);
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    column: i8,
    row: i8,
}

impl Position {
    #[must_use]
    #[allow(missing_docs)]
    pub const fn new(column: i8, row: i8) -> Self {
        Self { column, row }
    }

    /// Returns column (file) on which the position is located.
    #[must_use]
    pub const fn column(self) -> i8 {
        self.column
    }

    /// Returns row (rank) on which the position is located.
    #[must_use]
    pub const fn row(self) -> i8 {
        self.row
    }

    /// Returns true iff both coordinates lie within the board.
    #[must_use]
    pub const fn is_valid(self) -> bool {
        0 <= self.column && self.column < WIDTH && 0 <= self.row && self.row < WIDTH
    }

    /// Moves the position by the given number of columns and rows. The result
    /// may be outside of the board. Arithmetic saturates, so an invalid
    /// position never wraps back onto the board.
    #[must_use]
    pub const fn offset(self, columns: i8, rows: i8) -> Self {
        Self {
            column: self.column.saturating_add(columns),
            row: self.row.saturating_add(rows),
        }
    }

    /// Moves the position one step in the given direction.
    #[must_use]
    pub const fn shift(self, direction: Direction) -> Self {
        let (columns, rows) = direction.delta();
        self.offset(columns, rows)
    }

    /// Returns the index of the square in the row-major order: A1 is 0, H1 is
    /// 7 and H8 is 63.
    ///
    /// # Panics
    ///
    /// Position has to be valid: indexing outside of the board is a
    /// programming error.
    #[must_use]
    pub fn index(self) -> usize {
        assert!(self.is_valid(), "position {self} is outside of the board");
        (self.row * WIDTH + self.column) as usize
    }
}

impl TryFrom<u8> for Position {
    type Error = anyhow::Error;

    /// Creates a position given its square index on the board.
    ///
    /// # Errors
    ///
    /// If given square index is outside 0..[`BOARD_SIZE`] range.
    fn try_from(square_index: u8) -> anyhow::Result<Self> {
        if square_index >= BOARD_SIZE {
            bail!("square index should be in 0..BOARD_SIZE, got {square_index}");
        }
        let index = square_index as i8;
        Ok(Self::new(index % WIDTH, index / WIDTH))
    }
}

impl TryFrom<&str> for Position {
    type Error = anyhow::Error;

    /// Parses a square in algebraic notation, e.g. `e4`.
    fn try_from(square: &str) -> anyhow::Result<Self> {
        let Some((file, rank)) = square.chars().collect_tuple() else {
            bail!(
                "square should be two-char, got {square} with {} chars",
                square.chars().count()
            )
        };
        let column = match file {
            'a'..='h' => file as u8 - b'a',
            _ => bail!("file should be within 'a'..='h', got '{file}'"),
        };
        let row = match rank {
            '1'..='8' => rank as u8 - b'1',
            _ => bail!("rank should be within '1'..='8', got '{rank}'"),
        };
        Ok(Self::new(column as i8, row as i8))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.is_valid() {
            return write!(f, "({}, {})", self.column, self.row);
        }
        f.write_char((b'a' + self.column as u8) as char)?;
        write!(f, "{}", self.row + 1)
    }
}

/// A standard game of chess is played between two players: White (having the
/// advantage of the first turn) and Black.
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Player {
    White,
    Black,
}

impl Player {
    /// "Flips" the color.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::White => Self::Black,
            Self::Black => Self::White,
        }
    }

    /// Row increment of a pawn push.
    #[must_use]
    pub const fn pawn_direction(self) -> i8 {
        match self {
            Self::White => 1,
            Self::Black => -1,
        }
    }

    /// Row where the pieces (other than pawns) start.
    #[must_use]
    pub const fn back_row(self) -> i8 {
        match self {
            Self::White => 0,
            Self::Black => WIDTH - 1,
        }
    }

    /// Row where the pawns start and can advance by two squares from.
    #[must_use]
    pub const fn pawn_row(self) -> i8 {
        match self {
            Self::White => 1,
            Self::Black => WIDTH - 2,
        }
    }

    /// Row on which a pawn stands when it can capture en passant.
    #[must_use]
    pub const fn en_passant_row(self) -> i8 {
        match self {
            Self::White => 4,
            Self::Black => 3,
        }
    }

    /// Row where the pawns of this player are promoted.
    #[must_use]
    pub const fn promotion_row(self) -> i8 {
        self.opponent().back_row()
    }
}

impl Not for Player {
    type Output = Self;

    fn not(self) -> Self::Output {
        self.opponent()
    }
}

impl TryFrom<&str> for Player {
    type Error = anyhow::Error;

    fn try_from(player: &str) -> anyhow::Result<Self> {
        match player {
            "w" => Ok(Self::White),
            "b" => Ok(Self::Black),
            _ => bail!("player should be 'w' or 'b', got '{player}'"),
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char(match &self {
            Self::White => 'w',
            Self::Black => 'b',
        })
    }
}

/// Standard [chess pieces].
///
/// An empty square does not have a kind: it is represented as `None` wherever
/// a square might be vacant.
///
/// [chess pieces]: https://en.wikipedia.org/wiki/Chess_piece
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PieceKind {
    King,
    Queen,
    Rook,
    Bishop,
    Knight,
    Pawn,
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char(match &self {
            Self::King => 'k',
            Self::Queen => 'q',
            Self::Rook => 'r',
            Self::Bishop => 'b',
            Self::Knight => 'n',
            Self::Pawn => 'p',
        })
    }
}

/// What the board reports for an occupied square: the piece kind and its
/// owner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Occupant {
    #[allow(missing_docs)]
    pub owner: Player,
    #[allow(missing_docs)]
    pub kind: PieceKind,
}

impl TryFrom<char> for Occupant {
    type Error = anyhow::Error;

    /// Parses a FEN piece symbol: uppercase for White, lowercase for Black.
    fn try_from(symbol: char) -> anyhow::Result<Self> {
        let kind = match symbol.to_ascii_lowercase() {
            'k' => PieceKind::King,
            'q' => PieceKind::Queen,
            'r' => PieceKind::Rook,
            'b' => PieceKind::Bishop,
            'n' => PieceKind::Knight,
            'p' => PieceKind::Pawn,
            _ => bail!("piece symbol should be within \"KQRBNPkqrbnp\", got '{symbol}'"),
        };
        let owner = if symbol.is_ascii_uppercase() {
            Player::White
        } else {
            Player::Black
        };
        Ok(Self { owner, kind })
    }
}

impl fmt::Display for Occupant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self.kind {
            PieceKind::King => 'k',
            PieceKind::Queen => 'q',
            PieceKind::Rook => 'r',
            PieceKind::Bishop => 'b',
            PieceKind::Knight => 'n',
            PieceKind::Pawn => 'p',
        };
        f.write_char(match self.owner {
            // White player: uppercase symbols.
            Player::White => symbol.to_ascii_uppercase(),
            // Black player: lowercase symbols.
            Player::Black => symbol,
        })
    }
}

/// Directions on the board from a perspective of White player.
///
/// Traditionally those are North (Up), West (Left), East (Right), South (Down)
/// and their combinations. However, using cardinal directions is confusing,
/// hence they are replaced by relative directions.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    /// Also known as North.
    Up,
    /// Also known as North-East.
    UpRight,
    /// Also known as East.
    Right,
    /// Also known as South-East.
    DownRight,
    /// Also known as South.
    Down,
    /// Also known as South-West.
    DownLeft,
    /// Also known as West.
    Left,
    /// Also known as North-West.
    UpLeft,
}

impl Direction {
    /// Directions along the files and ranks.
    pub const ORTHOGONAL: [Self; 4] = [Self::Up, Self::Right, Self::Down, Self::Left];
    /// Directions along the diagonals.
    pub const DIAGONAL: [Self; 4] = [
        Self::UpRight,
        Self::DownRight,
        Self::DownLeft,
        Self::UpLeft,
    ];
    #[allow(missing_docs)]
    pub const ALL: [Self; 8] = [
        Self::Up,
        Self::UpRight,
        Self::Right,
        Self::DownRight,
        Self::Down,
        Self::DownLeft,
        Self::Left,
        Self::UpLeft,
    ];

    /// Returns the (column, row) increment of a single step.
    #[must_use]
    pub const fn delta(self) -> (i8, i8) {
        match self {
            Self::Up => (0, 1),
            Self::UpRight => (1, 1),
            Self::Right => (1, 0),
            Self::DownRight => (1, -1),
            Self::Down => (0, -1),
            Self::DownLeft => (-1, -1),
            Self::Left => (-1, 0),
            Self::UpLeft => (-1, 1),
        }
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn validity() {
        assert!(Position::new(0, 0).is_valid());
        assert!(Position::new(7, 7).is_valid());
        assert!(Position::new(3, 5).is_valid());
        for (column, row) in [(-1, 0), (0, -1), (8, 0), (0, 8), (9, 9), (-1, -1)] {
            assert!(!Position::new(column, row).is_valid(), "({column}, {row})");
        }
    }

    #[test]
    fn offset_saturates() {
        let edge = Position::new(i8::MAX, 0);
        assert_eq!(edge.offset(1, 0), edge);
        assert!(!edge.offset(1, 0).is_valid());
        assert_eq!(Position::new(3, 3).offset(-4, 2), Position::new(-1, 5));
    }

    #[test]
    fn index() {
        assert_eq!(Position::new(0, 0).index(), 0);
        assert_eq!(Position::new(7, 0).index(), 7);
        assert_eq!(Position::new(0, 3).index(), 24);
        assert_eq!(Position::new(7, 7).index(), 63);
        for index in 0..BOARD_SIZE {
            assert_eq!(Position::try_from(index).unwrap().index(), index as usize);
        }
    }

    #[test]
    #[should_panic(expected = "position (8, 0) is outside of the board")]
    fn index_outside_board() {
        let _ = Position::new(8, 0).index();
    }

    #[test]
    #[should_panic(expected = "square index should be in 0..BOARD_SIZE, got 64")]
    fn position_from_incorrect_index() {
        let _ = Position::try_from(BOARD_SIZE).unwrap();
    }

    #[test]
    fn parse_and_print() {
        let positions: Vec<_> = ["a1", "h8", "e4", "b7", "i1", "a9", "e", "e44"]
            .iter()
            .filter_map(|square| Position::try_from(*square).ok())
            .collect();
        assert_eq!(
            positions,
            vec![
                Position::new(0, 0),
                Position::new(7, 7),
                Position::new(4, 3),
                Position::new(1, 6),
            ]
        );
        assert_eq!(
            positions.iter().map(ToString::to_string).collect::<Vec<_>>(),
            vec!["a1", "h8", "e4", "b7"]
        );
        assert_eq!(Position::new(-1, 8).to_string(), "(-1, 8)");
    }

    #[test]
    #[should_panic(expected = "file should be within 'a'..='h', got 'i'")]
    fn position_from_incorrect_file() {
        let _ = Position::try_from("i1").unwrap();
    }

    #[test]
    #[should_panic(expected = "rank should be within '1'..='8', got '0'")]
    fn position_from_incorrect_rank() {
        let _ = Position::try_from("a0").unwrap();
    }

    #[test]
    fn ordering() {
        let mut positions = vec![
            Position::new(1, 0),
            Position::new(0, 7),
            Position::new(0, 1),
            Position::new(1, -1),
        ];
        positions.sort();
        assert_eq!(
            positions,
            vec![
                Position::new(0, 1),
                Position::new(0, 7),
                Position::new(1, -1),
                Position::new(1, 0),
            ]
        );
    }

    #[test]
    fn shift_from_corner() {
        let square = Position::new(0, 0);
        assert_eq!(square.shift(Direction::Up), Position::new(0, 1));
        assert_eq!(square.shift(Direction::UpRight), Position::new(1, 1));
        assert_eq!(square.shift(Direction::Right), Position::new(1, 0));
        for direction in [
            Direction::DownRight,
            Direction::Down,
            Direction::DownLeft,
            Direction::Left,
            Direction::UpLeft,
        ] {
            assert!(!square.shift(direction).is_valid(), "{direction:?}");
        }
    }

    #[test]
    fn direction_sets() {
        assert_eq!(Direction::ALL.len(), 8);
        for direction in Direction::ORTHOGONAL {
            let (columns, rows) = direction.delta();
            assert_eq!(columns.abs() + rows.abs(), 1);
        }
        for direction in Direction::DIAGONAL {
            let (columns, rows) = direction.delta();
            assert_eq!((columns.abs(), rows.abs()), (1, 1));
        }
    }

    #[test]
    fn players() {
        assert_eq!(!Player::White, Player::Black);
        assert_eq!(Player::Black.opponent(), Player::White);
        assert_eq!(Player::White.promotion_row(), 7);
        assert_eq!(Player::Black.promotion_row(), 0);
        assert_eq!(Player::try_from("w").unwrap(), Player::White);
        assert!(Player::try_from("white").is_err());
    }

    #[test]
    fn occupant_symbols() {
        let symbols = "KQRBNPkqrbnp";
        let occupants: Vec<Occupant> = symbols
            .chars()
            .map(|symbol| Occupant::try_from(symbol).unwrap())
            .collect();
        assert_eq!(
            occupants[1],
            Occupant {
                owner: Player::White,
                kind: PieceKind::Queen
            }
        );
        assert_eq!(
            occupants[10],
            Occupant {
                owner: Player::Black,
                kind: PieceKind::Knight
            }
        );
        assert_eq!(
            occupants.iter().map(ToString::to_string).join(""),
            symbols
        );
        assert!(Occupant::try_from('x').is_err());
        assert!(Occupant::try_from('1').is_err());
    }
}
