//! VEIL Test Harness
//!
//! This crate provides:
//! - Pull-counting probes for checking stream laziness
//! - Proptest strategies for enum names, pair maps and values
//! - Fixtures shared by benchmarks
//! - Cross-crate properties of views, enums and streams

pub mod fixture;
pub mod probe;
pub mod strategies;

#[cfg(test)]
mod properties;

pub use fixture::*;
pub use probe::*;
pub use strategies::*;
