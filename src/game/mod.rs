pub mod types;
pub mod board;
pub mod tictactoe;
pub mod othello;

pub use types::*;
pub use board::*;
