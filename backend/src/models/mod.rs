pub mod board;
pub mod contribution;
pub mod grid;
pub mod macros;

pub use board::*;
pub use contribution::*;
pub use grid::*;
