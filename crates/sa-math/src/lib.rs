//! Spot Analysis math utilities.

pub mod math;

pub use math::describe::*;
pub use math::mode::*;
pub use math::stable::*;
