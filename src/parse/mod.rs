//! Parsing of embedded payload text formats

pub mod fst;

pub use fst::{FstEdge, FstGraph, FstParseError, FstState, StateId};
