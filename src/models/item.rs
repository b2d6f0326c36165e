//! Corpus item model
//!
//! The untyped input object is decoded once, at the boundary, into a
//! [`CorpusItem`] whose fields are a closed set of [`FieldValue`] variants.
//! Renderers match on the variant and never re-inspect the raw JSON.

use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;
use thiserror::Error;

use crate::error::ViewerError;

/// Discriminator value for matrix payloads
pub const MATRIX_TYPE: &str = "matrix";

/// Discriminator value for transducer payloads
pub const FST_TYPE: &str = "fst";

/// A primitive field value, rendered as text
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Scalar {
    Text(String),
    Number(f64),
    Bool(bool),
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Text(s) => f.write_str(s),
            Scalar::Number(n) => f.write_str(&format_number(*n)),
            Scalar::Bool(b) => write!(f, "{}", b),
        }
    }
}

/// Format a number the way a browser's `String(n)` does
///
/// Integral values drop the fraction, and magnitudes at or above 1e21 or
/// below 1e-7 switch to exponent form with an explicit sign (`1e+21`).
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if n == 0.0 {
        return "0".to_string();
    }

    let magnitude = n.abs();
    if (1e-7..1e21).contains(&magnitude) {
        return n.to_string();
    }

    let exp = format!("{:e}", n);
    match exp.split_once('e') {
        Some((mantissa, power)) if !power.starts_with('-') => format!("{}e+{}", mantissa, power),
        _ => exp,
    }
}

/// A 2-D numeric grid, validated to be non-empty and rectangular
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatrixPayload {
    data: Vec<Vec<f64>>,
}

impl MatrixPayload {
    /// Validate a grid; rows must be non-empty and share one length
    pub fn new(data: Vec<Vec<f64>>) -> Result<Self, PayloadError> {
        let cols = match data.first() {
            Some(first) => first.len(),
            None => return Err(PayloadError::EmptyMatrix),
        };
        for (row, values) in data.iter().enumerate() {
            if values.is_empty() {
                return Err(PayloadError::EmptyRow { row });
            }
            if values.len() != cols {
                return Err(PayloadError::RaggedRow {
                    row,
                    expected: cols,
                    found: values.len(),
                });
            }
        }
        Ok(Self { data })
    }

    pub fn data(&self) -> &[Vec<f64>] {
        &self.data
    }

    pub fn rows(&self) -> usize {
        self.data.len()
    }

    pub fn cols(&self) -> usize {
        self.data.first().map_or(0, Vec::len)
    }

    /// A heatmap is only worth drawing with at least two rows and two columns
    pub fn has_heatmap(&self) -> bool {
        self.rows() > 1 && self.cols() > 1
    }
}

/// A line-oriented transducer description (see [`crate::parse::fst`])
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FstPayload {
    pub src: String,
}

/// One field of a corpus item
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Scalar(Scalar),
    Matrix(MatrixPayload),
    Fst(FstPayload),
    /// Composite value (object, array or null) without a `type` string
    Untyped,
    /// Composite value whose `type` is not one we render
    Unknown { type_tag: String },
    /// Recognised `type` with a payload that fails validation
    Invalid { type_tag: String, error: PayloadError },
}

/// Why a typed payload was rejected
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PayloadError {
    #[error("missing '{0}' key")]
    MissingKey(&'static str),

    #[error("'{0}' is not an array")]
    NotAnArray(&'static str),

    #[error("'{0}' is not a string")]
    NotAString(&'static str),

    #[error("matrix has no rows")]
    EmptyMatrix,

    #[error("row {row} is not an array")]
    RowNotArray { row: usize },

    #[error("row {row} is empty")]
    EmptyRow { row: usize },

    #[error("value at row {row}, col {col} is not a number")]
    NonNumeric { row: usize, col: usize },

    #[error("row {row} has {found} columns, expected {expected}")]
    RaggedRow { row: usize, expected: usize, found: usize },
}

impl FieldValue {
    /// Classify one raw field value
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::String(s) => FieldValue::Scalar(Scalar::Text(s.clone())),
            Value::Number(n) => FieldValue::Scalar(Scalar::Number(n.as_f64().unwrap_or(f64::NAN))),
            Value::Bool(b) => FieldValue::Scalar(Scalar::Bool(*b)),
            Value::Null | Value::Array(_) => FieldValue::Untyped,
            Value::Object(obj) => Self::from_typed_object(obj),
        }
    }

    fn from_typed_object(obj: &Map<String, Value>) -> Self {
        let type_tag = match obj.get("type") {
            None | Some(Value::Null) => return FieldValue::Untyped,
            Some(Value::String(s)) => s.as_str(),
            Some(other) => {
                return FieldValue::Unknown {
                    type_tag: other.to_string(),
                }
            }
        };

        let decoded = match type_tag {
            MATRIX_TYPE => decode_matrix(obj).map(FieldValue::Matrix),
            FST_TYPE => decode_fst(obj).map(FieldValue::Fst),
            _ => {
                return FieldValue::Unknown {
                    type_tag: type_tag.to_string(),
                }
            }
        };

        decoded.unwrap_or_else(|error| FieldValue::Invalid {
            type_tag: type_tag.to_string(),
            error,
        })
    }
}

fn decode_matrix(obj: &Map<String, Value>) -> Result<MatrixPayload, PayloadError> {
    let rows = obj
        .get("data")
        .ok_or(PayloadError::MissingKey("data"))?
        .as_array()
        .ok_or(PayloadError::NotAnArray("data"))?;

    let mut data = Vec::with_capacity(rows.len());
    for (row, values) in rows.iter().enumerate() {
        let values = values.as_array().ok_or(PayloadError::RowNotArray { row })?;
        let parsed = values
            .iter()
            .enumerate()
            .map(|(col, v)| v.as_f64().ok_or(PayloadError::NonNumeric { row, col }))
            .collect::<Result<Vec<f64>, _>>()?;
        data.push(parsed);
    }

    MatrixPayload::new(data)
}

fn decode_fst(obj: &Map<String, Value>) -> Result<FstPayload, PayloadError> {
    let src = obj
        .get("src")
        .ok_or(PayloadError::MissingKey("src"))?
        .as_str()
        .ok_or(PayloadError::NotAString("src"))?;
    Ok(FstPayload { src: src.to_string() })
}

/// The record being visualized: named fields in display order
#[derive(Debug, Clone, PartialEq)]
pub struct CorpusItem {
    fields: Vec<(String, FieldValue)>,
}

impl CorpusItem {
    /// Decode a JSON object, keeping its key order
    pub fn from_json(value: &Value) -> Result<Self, ViewerError> {
        let obj = value.as_object().ok_or_else(|| {
            ViewerError::InvalidItem(format!("expected an object, found {}", json_kind(value)))
        })?;

        let fields = obj
            .iter()
            .map(|(name, v)| (name.clone(), FieldValue::from_json(v)))
            .collect();
        Ok(Self { fields })
    }

    pub fn fields(&self) -> &[(String, FieldValue)] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scalars_decode_and_display() {
        assert_eq!(
            FieldValue::from_json(&json!("hello")),
            FieldValue::Scalar(Scalar::Text("hello".to_string()))
        );
        assert_eq!(Scalar::Number(3.0).to_string(), "3");
        assert_eq!(Scalar::Number(0.25).to_string(), "0.25");
        assert_eq!(Scalar::Bool(true).to_string(), "true");
    }

    #[test]
    fn test_numbers_display_like_the_browser() {
        let cases = [
            (1e21, "1e+21"),
            (1.5e22, "1.5e+22"),
            (1e-7, "1e-7"),
            (1.5e-7, "1.5e-7"),
            (-2e-8, "-2e-8"),
            (1e-6, "0.000001"),
            (123456789012.0, "123456789012"),
            (-0.0, "0"),
            (f64::INFINITY, "Infinity"),
            (f64::NEG_INFINITY, "-Infinity"),
        ];
        for (n, expected) in cases {
            assert_eq!(Scalar::Number(n).to_string(), expected, "formatting {:?}", n);
        }
        assert_eq!(format_number(f64::NAN), "NaN");
    }

    #[test]
    fn test_composites_without_type_are_untyped() {
        assert_eq!(FieldValue::from_json(&json!({ "data": [[1]] })), FieldValue::Untyped);
        assert_eq!(FieldValue::from_json(&json!([1, 2, 3])), FieldValue::Untyped);
        assert_eq!(FieldValue::from_json(&json!(null)), FieldValue::Untyped);
    }

    #[test]
    fn test_unknown_and_non_string_type_tags() {
        assert_eq!(
            FieldValue::from_json(&json!({ "type": "bogus" })),
            FieldValue::Unknown { type_tag: "bogus".to_string() }
        );
        assert_eq!(
            FieldValue::from_json(&json!({ "type": 7 })),
            FieldValue::Unknown { type_tag: "7".to_string() }
        );
    }

    #[test]
    fn test_matrix_decoding() {
        let value = FieldValue::from_json(&json!({ "type": "matrix", "data": [[1, 2.5], [3, 4]] }));
        let matrix = match value {
            FieldValue::Matrix(matrix) => matrix,
            other => panic!("expected a matrix, got {:?}", other),
        };
        assert_eq!(matrix.rows(), 2);
        assert_eq!(matrix.cols(), 2);
        assert_eq!(matrix.data(), &[vec![1.0, 2.5], vec![3.0, 4.0]]);
        assert!(matrix.has_heatmap());
    }

    #[test]
    fn test_matrix_shape_errors() {
        let cases = [
            (json!({ "type": "matrix" }), PayloadError::MissingKey("data")),
            (json!({ "type": "matrix", "data": [] }), PayloadError::EmptyMatrix),
            (json!({ "type": "matrix", "data": [[]] }), PayloadError::EmptyRow { row: 0 }),
            (json!({ "type": "matrix", "data": [1, 2] }), PayloadError::RowNotArray { row: 0 }),
            (
                json!({ "type": "matrix", "data": [[1, "x"]] }),
                PayloadError::NonNumeric { row: 0, col: 1 },
            ),
            (
                json!({ "type": "matrix", "data": [[1, 2], [3]] }),
                PayloadError::RaggedRow { row: 1, expected: 2, found: 1 },
            ),
        ];
        for (raw, expected) in cases {
            assert_eq!(
                FieldValue::from_json(&raw),
                FieldValue::Invalid { type_tag: "matrix".to_string(), error: expected }
            );
        }
    }

    #[test]
    fn test_fst_requires_string_src() {
        assert_eq!(
            FieldValue::from_json(&json!({ "type": "fst", "src": "0\t1\ta\tb\t0.5" })),
            FieldValue::Fst(FstPayload { src: "0\t1\ta\tb\t0.5".to_string() })
        );
        assert_eq!(
            FieldValue::from_json(&json!({ "type": "fst", "src": 3 })),
            FieldValue::Invalid {
                type_tag: "fst".to_string(),
                error: PayloadError::NotAString("src"),
            }
        );
    }

    #[test]
    fn test_item_keeps_field_order() {
        let item = CorpusItem::from_json(&json!({ "zeta": 1, "alpha": 2, "mid": 3 })).unwrap();
        let names: Vec<&str> = item.fields().iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, ["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_item_must_be_object() {
        let err = CorpusItem::from_json(&json!([1, 2])).unwrap_err();
        assert_eq!(err, ViewerError::InvalidItem("expected an object, found an array".to_string()));
    }
}
