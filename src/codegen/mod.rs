pub mod buffer;
pub mod errors;
pub mod generator;
pub mod types;

pub use buffer::*;
pub use errors::*;
pub use generator::*;
pub use types::*;
