//! Movement patterns of the chess pieces on a [square-centric board].
//!
//! There are two basic patterns:
//!
//! - [Sliding pieces] (queen, rook and bishop) walk along fixed directions
//!   until they hit the edge of the board or another piece. The opponent's
//!   piece ends the ray with a capture, the own piece ends it right before.
//! - Leaping pieces (knight and king) test a fixed table of offsets. Each
//!   offset is independent: nothing in between can block it.
//!
//! Pawns and castling need a bit more information: whether the piece has
//! moved before and what was the last move of the game.
//!
//! [square-centric board]: https://www.chessprogramming.org/Mailbox
//! [Sliding pieces]: https://www.chessprogramming.org/Sliding_Pieces

use std::collections::BTreeSet;

use crate::chess::board::Board;
use crate::chess::core::{Direction, PieceKind, Position};
use crate::chess::moves::{Move, MoveFlags};
use crate::chess::piece::Piece;

/// Offsets of a knight jump: two squares in one direction and one square in
/// the perpendicular one.
pub const KNIGHT_JUMPS: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

/// Offsets of a king step: one square in any direction.
pub const KING_STEPS: [(i8, i8); 8] = [
    Direction::Up.delta(),
    Direction::UpRight.delta(),
    Direction::Right.delta(),
    Direction::DownRight.delta(),
    Direction::Down.delta(),
    Direction::DownLeft.delta(),
    Direction::Left.delta(),
    Direction::UpLeft.delta(),
];

/// Column of the king before castling.
pub const KING_COLUMN: i8 = 4;

/// Rook columns and king destination columns of the two castling sides.
const CASTLING_SIDES: [(i8, i8, MoveFlags); 2] = [
    (7, 6, MoveFlags::KINGSIDE_CASTLE),
    (0, 2, MoveFlags::QUEENSIDE_CASTLE),
];

/// Rook's (origin, destination) columns when castling to the given side.
#[must_use]
pub fn castled_rook_columns(side: MoveFlags) -> Option<(i8, i8)> {
    if side.contains(MoveFlags::KINGSIDE_CASTLE) {
        Some((7, 5))
    } else if side.contains(MoveFlags::QUEENSIDE_CASTLE) {
        Some((0, 3))
    } else {
        None
    }
}

fn is_opponent(piece: &Piece, board: &(impl Board + ?Sized), target: Position) -> bool {
    board
        .occupant(target)
        .is_some_and(|occupant| occupant.owner != piece.owner())
}

fn add(moves: &mut BTreeSet<Move>, next_move: Move) {
    let inserted = moves.insert(next_move);
    debug_assert!(inserted, "{next_move} was generated twice");
}

/// Casts a ray from the piece in each of the `directions`.
///
/// Empty squares along the ray are ordinary moves. When the ray stops on the
/// board, the stopping square is either the opponent's piece (a capture) or
/// our own piece (nothing).
pub(super) fn slide(
    piece: &Piece,
    board: &(impl Board + ?Sized),
    directions: &[Direction],
    moves: &mut BTreeSet<Move>,
) {
    for &direction in directions {
        let mut target = piece.position().shift(direction);
        while target.is_valid() && board.occupant(target).is_none() {
            add(moves, piece.create_move(target, board));
            target = target.shift(direction);
        }
        if target.is_valid() && is_opponent(piece, board, target) {
            add(moves, piece.create_move(target, board));
        }
    }
}

/// Tests each of the `offsets` independently: the target square has to be on
/// the board and not occupied by our own piece.
pub(super) fn leap(
    piece: &Piece,
    board: &(impl Board + ?Sized),
    offsets: &[(i8, i8)],
    moves: &mut BTreeSet<Move>,
) {
    for &(columns, rows) in offsets {
        let target = piece.position().offset(columns, rows);
        if !target.is_valid() {
            continue;
        }
        match board.occupant(target) {
            Some(occupant) if occupant.owner == piece.owner() => continue,
            _ => add(moves, piece.create_move(target, board)),
        }
    }
}

/// Pawn pushes, captures, promotions and en passant.
///
/// Pawns push forward to empty squares only (two squares from the starting
/// row if the pawn has not moved yet) and capture diagonally forward. Reaching
/// the last row is a promotion: it is produced once per destination and the
/// piece to promote to is chosen when the move is committed.
///
/// [En passant] is possible when the opponent's pawn has just advanced by two
/// squares and stopped right beside ours.
///
/// [En passant]: https://www.chessprogramming.org/En_passant
pub(super) fn pawn(piece: &Piece, board: &(impl Board + ?Sized), moves: &mut BTreeSet<Move>) {
    let owner = piece.owner();
    let origin = piece.position();
    let forward = owner.pawn_direction();
    let promotion = |target: Position| {
        if target.row() == owner.promotion_row() {
            MoveFlags::PROMOTION
        } else {
            MoveFlags::QUIET
        }
    };

    let push = origin.offset(0, forward);
    if push.is_valid() && board.occupant(push).is_none() {
        add(
            moves,
            piece.create_move(push, board).with_flags(promotion(push)),
        );
        let double_push = push.offset(0, forward);
        if !piece.is_moved()
            && origin.row() == owner.pawn_row()
            && double_push.is_valid()
            && board.occupant(double_push).is_none()
        {
            add(moves, piece.create_move(double_push, board));
        }
    }

    for columns in [-1, 1] {
        let target = origin.offset(columns, forward);
        if !target.is_valid() {
            continue;
        }
        if is_opponent(piece, board, target) {
            add(
                moves,
                piece.create_move(target, board).with_flags(promotion(target)),
            );
        } else if board.occupant(target).is_none() && can_capture_en_passant(piece, board, columns)
        {
            add(
                moves,
                Move::new(
                    origin,
                    target,
                    Some(PieceKind::Pawn),
                    MoveFlags::CAPTURE | MoveFlags::EN_PASSANT,
                    owner,
                ),
            );
        }
    }
}

fn can_capture_en_passant(piece: &Piece, board: &(impl Board + ?Sized), columns: i8) -> bool {
    if piece.position().row() != piece.owner().en_passant_row() {
        return false;
    }
    let beside = piece.position().offset(columns, 0);
    board.piece_at(beside).is_some_and(|victim| {
        victim.kind() == PieceKind::Pawn
            && victim.owner() != piece.owner()
            && victim.move_count() == 1
            && victim.advanced_two_rows()
            && victim.just_moved(board.current_move())
    })
}

/// [Castling] moves of the king.
///
/// Neither the king nor the castling rook may have moved and all squares
/// between them have to be empty. The king must not castle out of, through or
/// into check, but that is verified by the caller together with the other
/// checks.
///
/// [Castling]: https://www.chessprogramming.org/Castling
pub(super) fn castle(king: &Piece, board: &(impl Board + ?Sized), moves: &mut BTreeSet<Move>) {
    let row = king.owner().back_row();
    if king.is_moved() || king.position() != Position::new(KING_COLUMN, row) {
        return;
    }
    for (rook_column, destination_column, side) in CASTLING_SIDES {
        let Some(rook) = board.piece_at(Position::new(rook_column, row)) else {
            continue;
        };
        if rook.kind() != PieceKind::Rook || rook.owner() != king.owner() || rook.is_moved() {
            continue;
        }
        let mut between = rook_column.min(KING_COLUMN) + 1..rook_column.max(KING_COLUMN);
        if between.all(|column| board.occupant(Position::new(column, row)).is_none()) {
            add(
                moves,
                Move::new(
                    king.position(),
                    Position::new(destination_column, row),
                    None,
                    side,
                    king.owner(),
                ),
            );
        }
    }
}

#[cfg(test)]
mod test {
    use itertools::Itertools;
    use pretty_assertions::assert_eq;

    use crate::chess::board::{Board, MailboxBoard};
    use crate::chess::core::{PieceKind, Player, Position};
    use crate::chess::moves::{MoveFlags, MoveKind};
    use crate::chess::piece::Piece;

    fn setup(placement: &str) -> MailboxBoard {
        MailboxBoard::from_fen(placement).expect("parsing valid placement: {placement}")
    }

    fn position(square: &str) -> Position {
        Position::try_from(square).unwrap()
    }

    fn get_moves(board: &MailboxBoard, square: &str) -> Vec<String> {
        board
            .piece_at(position(square))
            .expect("there is a piece at {square}")
            .generate_moves(board)
            .iter()
            .map(ToString::to_string)
            .sorted()
            .collect()
    }

    fn sorted_moves(moves: &[&str]) -> Vec<String> {
        moves
            .iter()
            .map(|m| (*m).to_string())
            .sorted()
            .collect()
    }

    #[test]
    fn rook_on_empty_board() {
        let board = setup("8/8/8/8/3R4/8/8/8");
        assert_eq!(
            get_moves(&board, "d4"),
            sorted_moves(&[
                "d4d1", "d4d2", "d4d3", "d4d5", "d4d6", "d4d7", "d4d8", "d4a4", "d4b4", "d4c4",
                "d4e4", "d4f4", "d4g4", "d4h4",
            ])
        );
    }

    #[test]
    fn bishop_blocked_and_capturing() {
        let board = setup("8/8/5p2/8/3B4/2P5/8/8");
        assert_eq!(
            get_moves(&board, "d4"),
            sorted_moves(&["d4e5", "d4f6", "d4e3", "d4f2", "d4g1", "d4c5", "d4b6", "d4a7"])
        );
    }

    #[test]
    fn boxed_in_pieces() {
        let board = setup("8/8/8/8/8/8/PPP5/RNB5");
        // The knight still jumps over the pawns.
        assert_eq!(get_moves(&board, "b1"), sorted_moves(&["b1a3", "b1c3", "b1d2"]));
        assert!(get_moves(&board, "a1").is_empty());
        assert_eq!(
            get_moves(&board, "c1"),
            sorted_moves(&["c1d2", "c1e3", "c1f4", "c1g5", "c1h6"])
        );
    }

    #[test]
    fn knight_counts() {
        let board = setup("N7/8/8/8/8/8/8/7N");
        assert_eq!(get_moves(&board, "h1"), sorted_moves(&["h1f2", "h1g3"]));
        assert_eq!(get_moves(&board, "a8"), sorted_moves(&["a8b6", "a8c7"]));
        let board = setup("8/8/8/3n4/8/8/8/8");
        assert_eq!(get_moves(&board, "d5").len(), 8);
    }

    #[test]
    fn king_steps() {
        let board = setup("8/8/8/8/8/8/3p4/3K4");
        let king = board.piece_at(position("d1")).unwrap();
        let moves = king.generate_moves(&board);
        assert_eq!(
            moves.iter().map(ToString::to_string).sorted().collect::<Vec<_>>(),
            sorted_moves(&["d1c1", "d1c2", "d1d2", "d1e1", "d1e2"])
        );
        let capture = moves.iter().find(|m| m.to() == position("d2")).unwrap();
        assert_eq!(capture.kind(), MoveKind::Capture);
        assert_eq!(capture.captured(), Some(PieceKind::Pawn));
    }

    #[test]
    fn pawn_pushes() {
        let board = setup("8/pp6/1P6/8/8/4p3/3PP3/8");
        assert_eq!(get_moves(&board, "d2"), sorted_moves(&["d2d3", "d2d4", "d2e3"]));
        assert!(get_moves(&board, "e2").is_empty());
        assert_eq!(get_moves(&board, "a7"), sorted_moves(&["a7a6", "a7a5", "a7b6"]));
        // Blocked by the white pawn straight ahead.
        assert!(get_moves(&board, "b7").is_empty());
    }

    #[test]
    fn moved_pawn_does_not_double_push() {
        let mut board = setup("8/8/8/8/8/8/8/8");
        let pawn = Piece::new(PieceKind::Pawn, Player::White, position("c2"))
            .with_last_move(position("c2"), 3);
        board.put(pawn);
        assert_eq!(get_moves(&board, "c2"), sorted_moves(&["c2c3"]));
    }

    #[test]
    fn promotions() {
        let board = setup("2n4k/1P6/8/8/8/8/6p1/7K");
        let pawn = board.piece_at(position("b7")).unwrap();
        let moves = pawn.generate_moves(&board);
        assert_eq!(
            moves.iter().map(ToString::to_string).collect::<Vec<_>>(),
            vec!["b7b8q", "b7c8q"]
        );
        assert!(moves.iter().all(|m| m.kind() == MoveKind::Special));
        assert_eq!(
            moves.iter().find(|m| m.is_capture()).map(|m| m.captured()),
            Some(Some(PieceKind::Knight))
        );
        assert_eq!(get_moves(&board, "g2"), sorted_moves(&["g2g1q", "g2h1q"]));
    }

    #[test]
    fn en_passant() {
        let mut board = setup("8/3p4/8/4P3/8/8/8/8");
        board.set_current_move(10);
        let black_pawn = board.piece_at(position("d7")).copied().unwrap();
        let _ = board.remove(position("d7"));
        board.put(black_pawn.moved_to(position("d5"), 9));

        let moves = board
            .piece_at(position("e5"))
            .unwrap()
            .generate_moves(&board);
        assert_eq!(
            moves.iter().map(ToString::to_string).collect::<Vec<_>>(),
            vec!["e5d6", "e5e6"]
        );
        let en_passant = moves.iter().find(|m| m.to() == position("d6")).unwrap();
        assert_eq!(en_passant.kind(), MoveKind::Special);
        assert_eq!(en_passant.captured(), Some(PieceKind::Pawn));

        // One move later the opportunity is gone.
        board.set_current_move(11);
        assert_eq!(get_moves(&board, "e5"), sorted_moves(&["e5e6"]));
    }

    #[test]
    fn no_en_passant_after_single_step() {
        let mut board = setup("4k3/8/3p4/4P3/8/8/8/4K3");
        board.set_current_move(1);
        let black_pawn = board.remove(position("d6")).unwrap();
        board.put(black_pawn.moved_to(position("d5"), 1));
        board.set_current_move(2);
        assert_eq!(get_moves(&board, "e5"), sorted_moves(&["e5e6"]));
    }

    #[test]
    fn black_en_passant() {
        let mut board = setup("4k3/8/8/8/5p2/8/4P3/4K3");
        board.set_current_move(6);
        let white_pawn = board.remove(position("e2")).unwrap();
        board.put(white_pawn.moved_to(position("e4"), 6));
        board.set_current_move(7);
        let moves = board
            .piece_at(position("f4"))
            .unwrap()
            .generate_moves(&board);
        assert_eq!(
            moves.iter().map(ToString::to_string).collect::<Vec<_>>(),
            vec!["f4e3", "f4f3"]
        );
        let en_passant = moves.iter().find(|m| m.to() == position("e3")).unwrap();
        assert!(en_passant.flags().contains(MoveFlags::EN_PASSANT));
        assert_eq!(en_passant.mover(), Player::Black);
    }

    #[test]
    fn castling() {
        let board = setup("r3k2r/8/8/8/8/8/8/R3K1NR");
        assert_eq!(
            get_moves(&board, "e1"),
            sorted_moves(&["e1c1", "e1d1", "e1d2", "e1e2", "e1f1", "e1f2"])
        );
        assert_eq!(
            get_moves(&board, "e8"),
            sorted_moves(&["e8c8", "e8d8", "e8d7", "e8e7", "e8f8", "e8f7", "e8g8"])
        );
    }

    #[test]
    fn no_castling_after_rook_moved() {
        let mut board = setup("4k3/8/8/8/8/8/8/R3K2R");
        let rook = board.remove(position("h1")).unwrap();
        board.put(rook.moved_to(position("h1"), 4));
        assert_eq!(
            get_moves(&board, "e1"),
            sorted_moves(&["e1c1", "e1d1", "e1d2", "e1e2", "e1f1", "e1f2"])
        );
    }
}
