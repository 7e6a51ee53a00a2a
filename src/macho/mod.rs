//! Mach-O format constants.

mod constants;

pub use constants::*;
