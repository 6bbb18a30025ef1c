//! [`Move`] representation shared by every piece kind: capture detection, move
//! history and display all consume the same value.

use std::cmp::Ordering;
use std::fmt;

use crate::chess::core::{PieceKind, Player, Position};

bitflags::bitflags! {
    /// More information about [`Move`] that makes it possible to commit that
    /// move and classify it.
    ///
    /// Apart from the "regular" or "quiet" moves (simply moving a piece from
    /// one square to the other), there are few important rules:
    ///
    /// - [En passant] is a capture of opponent's pawn "in passing" (when it
    ///   advances two squares from its original position).
    /// - The [Castle] move that will involve a king and a rook "jumping" over
    ///   each other. Technically, castling is a king move, so `from` and `to`
    ///   move squares will correspond to the king.
    /// - [Promotion] replaces a pawn reaching the last row with another piece.
    ///
    /// [Castle]: https://en.wikipedia.org/wiki/Castling
    /// [En passant]: https://en.wikipedia.org/wiki/En_passant
    /// [Promotion]: https://en.wikipedia.org/wiki/Promotion_(chess)
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct MoveFlags: u8 {
        /// Moves that do not change the material balance.
        const QUIET = 0;
        /// Moves that change the material balance.
        const CAPTURE = 0b0000_0001;
        /// Pawn capture of the pawn that has just advanced by two squares.
        const EN_PASSANT = 0b0000_0010;
        /// Pawn move to the opponent's back row.
        const PROMOTION = 0b0000_0100;
        /// Short castle or O-O.
        const KINGSIDE_CASTLE = 0b0000_1000;
        /// Long castle or O-O-O.
        const QUEENSIDE_CASTLE = 0b0001_0000;

        /// Moves that require knowledge beyond the moving piece and the
        /// destination square.
        const SPECIAL = Self::EN_PASSANT.bits()
            | Self::PROMOTION.bits()
            | Self::KINGSIDE_CASTLE.bits()
            | Self::QUEENSIDE_CASTLE.bits();
    }
}

/// Coarse classification of a [`Move`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveKind {
    /// Moving to an empty square.
    Ordinary,
    /// Taking the opponent's piece on the destination square.
    Capture,
    /// En passant, promotion or castling.
    Special,
}

/// A transition of a single piece from one square to another. Moves are
/// constructed by the generators in [`crate::chess::movegen`] and consumed
/// immediately by the caller.
///
/// Two moves are considered equal when they share the `from` and `to`
/// squares: a square is either reachable or not, regardless of how it was
/// discovered. Ordering is lexicographic over (`from`, `to`) so that moves can
/// be collected into ordered sets.
#[derive(Clone, Copy, Debug)]
pub struct Move {
    from: Position,
    to: Position,
    captured: Option<PieceKind>,
    flags: MoveFlags,
    mover: Player,
}

impl Move {
    /// Creates a move.
    ///
    /// # Panics
    ///
    /// Both `from` and `to` have to be valid positions. Constructing a move
    /// with a position outside of the board is a programming error.
    #[must_use]
    pub fn new(
        from: Position,
        to: Position,
        captured: Option<PieceKind>,
        flags: MoveFlags,
        mover: Player,
    ) -> Self {
        assert!(from.is_valid(), "move origin {from} is outside of the board");
        assert!(to.is_valid(), "move destination {to} is outside of the board");
        Self {
            from,
            to,
            captured,
            flags,
            mover,
        }
    }

    #[must_use]
    #[allow(missing_docs)]
    pub const fn from(&self) -> Position {
        self.from
    }

    #[must_use]
    #[allow(missing_docs)]
    pub const fn to(&self) -> Position {
        self.to
    }

    /// The kind of the piece taken by this move, `None` for non-captures.
    #[must_use]
    pub const fn captured(&self) -> Option<PieceKind> {
        self.captured
    }

    #[must_use]
    #[allow(missing_docs)]
    pub const fn flags(&self) -> MoveFlags {
        self.flags
    }

    /// The owner of the moving piece.
    #[must_use]
    pub const fn mover(&self) -> Player {
        self.mover
    }

    /// Special moves take priority over captures: a promotion that also takes
    /// a piece is [`MoveKind::Special`].
    #[must_use]
    pub fn kind(&self) -> MoveKind {
        if self.flags.intersects(MoveFlags::SPECIAL) {
            MoveKind::Special
        } else if self.flags.contains(MoveFlags::CAPTURE) {
            MoveKind::Capture
        } else {
            MoveKind::Ordinary
        }
    }

    #[must_use]
    #[allow(missing_docs)]
    pub fn is_capture(&self) -> bool {
        self.flags.contains(MoveFlags::CAPTURE)
    }

    #[must_use]
    pub(crate) fn with_flags(self, flags: MoveFlags) -> Self {
        Self {
            flags: self.flags | flags,
            ..self
        }
    }
}

impl PartialEq for Move {
    fn eq(&self, other: &Self) -> bool {
        (self.from, self.to) == (other.from, other.to)
    }
}

impl Eq for Move {}

impl PartialOrd for Move {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Move {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.from, self.to).cmp(&(other.from, other.to))
    }
}

impl fmt::Display for Move {
    /// Serializes a move in [UCI format]. Promotions are always displayed as
    /// promotions to a queen: choosing another piece is up to the player.
    ///
    /// [UCI format]: http://wbec-ridderkerk.nl/html/UCIProtocol.html
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if self.flags.contains(MoveFlags::PROMOTION) {
            write!(f, "{}", PieceKind::Queen)?;
        }
        Ok(())
    }
}
