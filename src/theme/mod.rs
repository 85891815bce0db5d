//! Shared colors and font sizes.

pub mod palette;
