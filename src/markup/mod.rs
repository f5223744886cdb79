//! Markup input layer.
//!
//! The compiler consumes an already parsed element tree. This module holds
//! the thin readers it needs:
//! - [`Element`]: tag, attributes, children and text of one markup element
//! - [`StyleMap`] / [`StyleSheet`]: resolved style declarations, named rules
//!   and `@keyframes` blocks
//! - [`parse_transform`]: transform strings into named numeric components

pub mod element;
pub mod style;
pub mod transform;

pub use element::Element;
pub use style::{Keyframes, StyleMap, StyleSheet};
pub use transform::{TransformComponents, parse_transform};
