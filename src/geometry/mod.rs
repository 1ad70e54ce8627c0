pub mod point;
pub mod point_set;
pub mod rotation;
pub mod transform;

pub use point::*;
pub use point_set::*;
pub use rotation::*;
pub use transform::*;
