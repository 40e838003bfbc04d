pub mod reserved;
pub mod table;

pub use reserved::*;
pub use table::*;
