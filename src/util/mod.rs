//! Utility types and functions for x3dv.
//!
//! This module contains fundamental pieces used throughout the library:
//! - [`Error`] / [`Result`] - Error handling
//! - Math type re-exports from glam and fixed-precision rounding
//! - Declared-name sanitization

mod error;
mod math;
mod names;

pub use error::*;
pub use math::*;
pub use names::*;
