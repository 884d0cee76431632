//! Common types used across dynoload

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Input file delimiter selection.
///
/// The selector is permissive: `tab` maps to a tab character and any other
/// value maps to a comma, matching the behavior of the CLI surface this
/// tool replaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Delimiter {
    #[default]
    Comma,
    Tab,
}

impl Delimiter {
    /// The raw delimiter byte handed to the CSV reader
    pub fn as_byte(self) -> u8 {
        match self {
            Delimiter::Comma => b',',
            Delimiter::Tab => b'\t',
        }
    }
}

impl std::str::FromStr for Delimiter {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "tab" | "\t" => Ok(Delimiter::Tab),
            _ => Ok(Delimiter::Comma),
        }
    }
}

impl std::fmt::Display for Delimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Delimiter::Comma => write!(f, "comma"),
            Delimiter::Tab => write!(f, "tab"),
        }
    }
}

/// Intended destination type for a field's raw text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    /// Verbatim string value (the default for unlisted fields)
    #[default]
    String,
    /// Numeric value; the raw text is passed through unvalidated
    Numeric,
    /// Boolean value matched against the literal true/TRUE/false/FALSE tokens
    Boolean,
}

/// Mapping from field name to intended value type.
///
/// Supplied once at startup and immutable for the duration of a run.
/// Fields absent from the mapping are classified as strings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FieldClassification {
    kinds: HashMap<String, FieldKind>,
}

impl FieldClassification {
    /// Build a classification from two comma-separated field name lists.
    ///
    /// Empty list entries (for example a trailing comma) are ignored. A name
    /// present in both lists takes the boolean classification, as the later
    /// assignment wins.
    pub fn from_lists(numeric_fields: &str, boolean_fields: &str) -> Self {
        let mut kinds = HashMap::new();
        for name in numeric_fields.split(',').filter(|n| !n.is_empty()) {
            kinds.insert(name.to_string(), FieldKind::Numeric);
        }
        for name in boolean_fields.split(',').filter(|n| !n.is_empty()) {
            kinds.insert(name.to_string(), FieldKind::Boolean);
        }
        Self { kinds }
    }

    /// The classification for a field, defaulting to string
    pub fn kind_of(&self, field: &str) -> FieldKind {
        self.kinds.get(field).copied().unwrap_or_default()
    }

    /// Number of explicitly classified fields
    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    /// True when no field is explicitly classified
    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }
}
