//! Price-structure indicators computed client-side.

pub mod error;
pub mod structure;

pub use error::IndicatorError;
pub use structure::*;
