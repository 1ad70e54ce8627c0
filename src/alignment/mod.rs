pub mod orchestrator;
pub mod pair;
pub mod traits;
pub mod types;

pub use orchestrator::*;
pub use pair::*;
pub use traits::*;
pub use types::*;
