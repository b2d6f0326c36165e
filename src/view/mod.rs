//! View tree
//!
//! The renderers build a [`ViewElement`] tree instead of touching the DOM, so
//! rendering stays a pure function of the item and the configuration.

pub mod node;

pub use node::{ViewElement, ViewNode};
