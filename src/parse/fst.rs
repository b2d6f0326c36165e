//! Transducer description parser
//!
//! Reads the tab-separated text form of a weighted finite-state transducer:
//!
//! ```text
//! 0	1	a	x	0.5     from, to, input, output, weight
//! 1	y               accepting state and its final output
//! ```
//!
//! and produces an [`FstGraph`] ready for drawing: every state mentioned
//! anywhere, sorted by id, plus one labelled edge per transition line.

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;

pub type StateId = u64;

/// A state node with its display label
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FstState {
    pub id: StateId,
    /// Output emitted when the transducer accepts in this state
    pub final_output: Option<String>,
}

impl FstState {
    pub fn is_final(&self) -> bool {
        self.final_output.is_some()
    }

    pub fn label(&self) -> String {
        match &self.final_output {
            Some(output) => format!("{}\n/{}", self.id, output),
            None => self.id.to_string(),
        }
    }
}

/// One transition
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FstEdge {
    pub from: StateId,
    pub to: StateId,
    pub input: String,
    pub output: String,
    /// Kept verbatim; semiring weights are not always plain decimals
    pub weight: String,
}

impl FstEdge {
    pub fn label(&self) -> String {
        format!("{}:{}/{}", self.input, self.output, self.weight)
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FstParseError {
    #[error("line {line}: expected 2 or 5 tab-separated fields, found {found}")]
    FieldCount { line: usize, found: usize },

    #[error("line {line}: invalid state id '{value}'")]
    InvalidState { line: usize, value: String },
}

/// A parsed transducer, states sorted by id
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct FstGraph {
    pub states: Vec<FstState>,
    pub edges: Vec<FstEdge>,
}

impl FstGraph {
    pub fn parse(src: &str) -> Result<Self, FstParseError> {
        let mut used = BTreeSet::new();
        let mut finals: BTreeMap<StateId, String> = BTreeMap::new();
        let mut edges = Vec::new();

        for (index, raw) in src.split('\n').enumerate() {
            let line = index + 1;
            let text = raw.strip_suffix('\r').unwrap_or(raw);
            if text.is_empty() {
                continue;
            }

            let fields: Vec<&str> = text.split('\t').collect();
            match fields.as_slice() {
                [state, output] => {
                    let state = parse_state(state, line)?;
                    // A repeated final line overrides the earlier output
                    finals.insert(state, (*output).to_string());
                    used.insert(state);
                }
                [from, to, input, output, weight] => {
                    let from = parse_state(from, line)?;
                    let to = parse_state(to, line)?;
                    used.insert(from);
                    used.insert(to);
                    edges.push(FstEdge {
                        from,
                        to,
                        input: (*input).to_string(),
                        output: (*output).to_string(),
                        weight: (*weight).to_string(),
                    });
                }
                other => {
                    return Err(FstParseError::FieldCount {
                        line,
                        found: other.len(),
                    })
                }
            }
        }

        let states = used
            .into_iter()
            .map(|id| FstState {
                id,
                final_output: finals.remove(&id),
            })
            .collect();

        Ok(Self { states, edges })
    }

    pub fn state(&self, id: StateId) -> Option<&FstState> {
        self.states.iter().find(|s| s.id == id)
    }
}

fn parse_state(field: &str, line: usize) -> Result<StateId, FstParseError> {
    field.trim().parse().map_err(|_| FstParseError::InvalidState {
        line,
        value: field.to_string(),
    })
}
