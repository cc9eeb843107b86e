//! Domain model of the dynamic fee engine.
//!
//! This crate contains everything that is pure computation:
//! - 64.64 fixed-point arithmetic with a deterministic exponential
//! - The logistic (sigmoid) response function
//! - Fee curve parameters and evaluation
//! - Value objects and entities shared by the data and registry crates

/// Prelude module for convenient imports.
pub mod prelude;

/// Pool and feed registration records.
pub mod entities;
/// Domain enumerations.
pub mod enums;
/// Error types.
pub mod error;
/// Sigmoid fee curve.
pub mod fee_curve;
/// Fixed-point math.
pub mod math;
/// Value objects.
pub mod value_objects;
