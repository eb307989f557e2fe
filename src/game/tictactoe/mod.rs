pub mod board;
pub mod rules;

pub use board::*;
pub use rules::*;
