//! View controllers owning dashboard UI state.

pub mod dashboard;

pub use dashboard::*;
