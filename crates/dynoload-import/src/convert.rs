//! Field conversion and row encoding
//!
//! Maps raw text fields to typed DynamoDB attribute values according to a
//! caller-supplied [`FieldClassification`]. Conversion is pure and never
//! fails: malformed numeric text is passed through as-is (the store rejects
//! it at write time), and unrecognized boolean tokens coerce to `false`.

use crate::source::Row;
use aws_sdk_dynamodb::types::AttributeValue;
use dynoload_common::types::{FieldClassification, FieldKind};
use std::collections::HashMap;

/// A destination-ready record: field name to typed attribute value
pub type Item = HashMap<String, AttributeValue>;

/// Convert one raw text value according to its field classification.
///
/// Numeric values are not validated here; the destination store rejects
/// malformed numbers when the batch is written. Boolean conversion matches
/// the literal tokens `true`, `TRUE`, `false`, `FALSE` exactly; any other
/// token yields the default `false`.
pub fn attribute_value(kind: FieldKind, raw: &str) -> AttributeValue {
    match kind {
        FieldKind::String => AttributeValue::S(raw.to_string()),
        FieldKind::Numeric => AttributeValue::N(raw.to_string()),
        FieldKind::Boolean => match raw {
            "true" | "TRUE" => AttributeValue::Bool(true),
            "false" | "FALSE" => AttributeValue::Bool(false),
            _ => AttributeValue::Bool(false),
        },
    }
}

/// Encode a row into a destination item.
///
/// Every field present in the row appears in the item, typed per the
/// classification (default: string). No I/O, never fails.
pub fn encode_row(classification: &FieldClassification, row: &Row) -> Item {
    row.iter()
        .map(|(name, raw)| {
            (
                name.to_string(),
                attribute_value(classification.kind_of(name), raw),
            )
        })
        .collect()
}
