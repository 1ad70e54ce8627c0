pub mod benchmarks;
pub mod metrics;

pub use benchmarks::*;
pub use metrics::*;
