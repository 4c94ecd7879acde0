//! Timer-driven primitives owned by the view (polling, debouncing)

pub mod debounce;
pub mod refresher;

pub use debounce::*;
pub use refresher::*;
