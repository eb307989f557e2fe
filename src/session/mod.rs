pub mod state;
pub mod manager;
pub mod service;

pub use state::*;
pub use manager::*;
pub use service::*;
