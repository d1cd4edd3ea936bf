/*!
# Row & Value Types

Data shapes shared by the reader and writer:

- [`CsvValue`]: one scalar field (boolean, number, or string)
- [`ArrayRow`]: positional row, no names attached
- [`ObjectRow`]: row keyed by field name
- [`HeaderField`]: `{id, title}` column definition for object-form writes
*/

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Positional row
pub type ArrayRow = Vec<CsvValue>;

/// Row keyed by field name (header title on read, header id on write)
pub type ObjectRow = HashMap<String, CsvValue>;

// ================================================================================================
// Scalar Values
// ================================================================================================

/// A single CSV field after scalar coercion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CsvValue {
    Bool(bool),
    Number(f64),
    String(String),
}

impl CsvValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            CsvValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CsvValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            CsvValue::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

/// Integral numbers render without a fractional part (`30`, not `30.0`)
impl fmt::Display for CsvValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CsvValue::Bool(b) => write!(f, "{}", b),
            CsvValue::Number(n) => {
                if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
                    write!(f, "{}", *n as i64)
                } else {
                    write!(f, "{}", n)
                }
            }
            CsvValue::String(s) => f.write_str(s),
        }
    }
}

impl From<&str> for CsvValue {
    fn from(value: &str) -> Self {
        CsvValue::String(value.to_string())
    }
}

impl From<String> for CsvValue {
    fn from(value: String) -> Self {
        CsvValue::String(value)
    }
}

impl From<bool> for CsvValue {
    fn from(value: bool) -> Self {
        CsvValue::Bool(value)
    }
}

impl From<f64> for CsvValue {
    fn from(value: f64) -> Self {
        CsvValue::Number(value)
    }
}

macro_rules! impl_from_int {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for CsvValue {
                fn from(value: $ty) -> Self {
                    CsvValue::Number(value as f64)
                }
            }
        )*
    };
}

impl_from_int!(i32, i64, u32, u64, usize);

// ================================================================================================
// Rows
// ================================================================================================

/// One record as returned by [`crate::read_csv`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Row {
    Array(ArrayRow),
    Object(ObjectRow),
}

impl Row {
    pub fn as_array(&self) -> Option<&ArrayRow> {
        match self {
            Row::Array(fields) => Some(fields),
            Row::Object(_) => None,
        }
    }

    pub fn as_object(&self) -> Option<&ObjectRow> {
        match self {
            Row::Object(fields) => Some(fields),
            Row::Array(_) => None,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Row::Array(fields) => fields.len(),
            Row::Object(fields) => fields.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ================================================================================================
// Header Columns
// ================================================================================================

/// Column definition for object-form writes
///
/// `id` selects the value from each row, `title` is the emitted column label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderField {
    pub id: String,
    pub title: String,
}

impl HeaderField {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
        }
    }
}

impl From<(&str, &str)> for HeaderField {
    fn from((id, title): (&str, &str)) -> Self {
        Self::new(id, title)
    }
}

// ================================================================================================
// Tests
// ================================================================================================
