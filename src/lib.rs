pub mod board;
pub mod capture;
pub mod engine;
pub mod error;
pub mod layout;
pub mod notation;
pub mod tile;

pub use board::*;
pub use capture::*;
pub use engine::*;
pub use error::*;
pub use layout::*;
pub use notation::*;
pub use tile::*;
