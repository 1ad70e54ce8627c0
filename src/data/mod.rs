pub mod generator;
pub mod loader;

pub use generator::*;
pub use loader::*;
