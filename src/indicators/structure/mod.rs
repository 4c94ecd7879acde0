//! Structure indicators: support/resistance bands

pub mod support_resistance;

pub use support_resistance::*;
