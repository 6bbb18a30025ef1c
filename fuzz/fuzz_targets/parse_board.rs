#![no_main]
use chessmoves::chess::board::MailboxBoard;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(board) = MailboxBoard::try_from(s) {
            let placement = board.to_string();
            assert_eq!(MailboxBoard::from_fen(&placement).ok(), Some(board));
        }
    }
});
