//! Utility Module
//!
//! - [`color`]: CSS color string resolution into RGB components

pub mod color;

pub use color::{Rgb, parse_color, parse_color_hex};
