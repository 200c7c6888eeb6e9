//! Core math modules.

pub mod describe;
pub mod mode;
pub mod stable;
