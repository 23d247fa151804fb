//! Utility functions for common string transformations.

pub mod formatting;

pub use formatting::without_0x_prefix;
