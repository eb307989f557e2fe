pub mod types;
pub mod board;
pub mod rules;

pub use types::*;
pub use board::*;
pub use rules::*;
