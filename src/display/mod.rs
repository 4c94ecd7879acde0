//! Display-ready values: formatted numbers, tones and indicator cards.

pub mod badges;
pub mod format;

pub use badges::*;
pub use format::*;
