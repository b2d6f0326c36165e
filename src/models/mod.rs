//! Data models for the corpus item viewer

pub mod item;

pub use item::*;
