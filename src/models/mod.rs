pub mod common;
pub mod draw;
pub mod pagination;

pub use common::*;
pub use draw::*;
pub use pagination::*;
