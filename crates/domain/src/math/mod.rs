//! Deterministic fixed-point math.

pub mod fixed_point;
pub mod sigmoid;

pub use fixed_point::Q64x64;
