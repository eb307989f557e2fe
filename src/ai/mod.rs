pub mod strategies;
pub mod evaluation;
pub mod tictactoe;
pub mod othello;
pub mod service;
pub mod local_service;

pub use strategies::*;
pub use service::*;
pub use local_service::*;
