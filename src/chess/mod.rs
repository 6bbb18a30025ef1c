//! Implementation of chess pieces, their movement rules and the board they
//! move on.

pub mod board;
pub mod core;
pub mod movegen;
pub mod moves;
pub mod piece;
