//! Per-piece chess move generation. Given a piece and a read-only view of the
//! board, produces every square the piece's movement pattern can reach.
//!
//! The generated moves are *geometry-legal*: they respect blocking and
//! occupancy but do not check whether the mover's own king is left in check.
//! Filtering those out belongs to the caller.
//!
//! ```
//! use chessmoves::chess::board::{Board, MailboxBoard};
//! use chessmoves::chess::core::Position;
//!
//! let board = MailboxBoard::starting();
//! let knight = board.piece_at(Position::new(1, 0)).unwrap();
//! assert_eq!(knight.generate_moves(&board).len(), 2);
//! ```

pub mod chess;

use shadow_rs::shadow;

shadow!(build);

/// Returns the full crate version that can be used to identify how it was
/// built in the first place.
fn crate_version() -> String {
    format!(
        "{} (commit {}, branch {})",
        build::PKG_VERSION,
        build::SHORT_COMMIT,
        build::BRANCH
    )
}

/// Prints information about the crate version and the build type on binary
/// startup.
pub fn print_build_info() {
    println!("chessmoves {}", crate_version());
    println!("Release build: {}", !shadow_rs::is_debug());
    println!();
}
