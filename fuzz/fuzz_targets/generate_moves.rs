#![no_main]
use chessmoves::chess::board::{Board, MailboxBoard};
use chessmoves::chess::core::PieceKind;
use chessmoves::chess::moves::MoveFlags;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(board) = MailboxBoard::try_from(input) else {
        return;
    };
    let occupied = shakmaty::Bitboard(
        board
            .pieces()
            .fold(0, |mask, piece| mask | (1_u64 << piece.position().index())),
    );
    for piece in board.pieces() {
        let moves = piece.generate_moves(&board);
        let origin = shakmaty::Square::new(piece.position().index() as u32);
        let attacks = match piece.kind() {
            PieceKind::Queen => shakmaty::attacks::queen_attacks(origin, occupied),
            PieceKind::Rook => shakmaty::attacks::rook_attacks(origin, occupied),
            PieceKind::Bishop => shakmaty::attacks::bishop_attacks(origin, occupied),
            PieceKind::Knight => shakmaty::attacks::knight_attacks(origin),
            PieceKind::King => shakmaty::attacks::king_attacks(origin),
            PieceKind::Pawn => continue,
        };
        for m in moves {
            assert!(m.to().is_valid());
            assert!(board
                .occupant(m.to())
                .map_or(true, |occupant| occupant.owner != piece.owner()));
            if !m.flags().intersects(MoveFlags::KINGSIDE_CASTLE | MoveFlags::QUEENSIDE_CASTLE) {
                assert!(attacks.contains(shakmaty::Square::new(m.to().index() as u32)));
            }
        }
    }
});
