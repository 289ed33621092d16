//! Unity value types
//!
//! This module defines the UnityValue enum used when a serialized object is
//! materialized as a whole instead of being navigated field by field.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A fully materialized value decoded from a Unity object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UnityValue {
    Null,
    Bool(bool),
    Integer(i64),
    /// Unsigned values that do not fit an `i64` keep their exact bits here
    UInteger(u64),
    Float(f64),
    String(String),
    Array(Vec<UnityValue>),
    Object(IndexMap<String, UnityValue>),
}

impl UnityValue {
    /// Check if the value is null
    pub fn is_null(&self) -> bool {
        matches!(self, UnityValue::Null)
    }

    /// Get as boolean
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            UnityValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Get as signed integer
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            UnityValue::Integer(i) => Some(*i),
            UnityValue::UInteger(u) => i64::try_from(*u).ok(),
            _ => None,
        }
    }

    /// Get as unsigned integer
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            UnityValue::UInteger(u) => Some(*u),
            UnityValue::Integer(i) => u64::try_from(*i).ok(),
            _ => None,
        }
    }

    /// Get as float
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            UnityValue::Float(f) => Some(*f),
            UnityValue::Integer(i) => Some(*i as f64),
            UnityValue::UInteger(u) => Some(*u as f64),
            _ => None,
        }
    }

    /// Get as string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            UnityValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get as array
    pub fn as_array(&self) -> Option<&Vec<UnityValue>> {
        match self {
            UnityValue::Array(arr) => Some(arr),
            _ => None,
        }
    }

    /// Get as object
    pub fn as_object(&self) -> Option<&IndexMap<String, UnityValue>> {
        match self {
            UnityValue::Object(obj) => Some(obj),
            _ => None,
        }
    }

    /// Look up a `/`-separated path such as `m_SubMeshes/0/vertexCount`.
    ///
    /// Numeric segments index arrays, everything else is an object key.
    pub fn get_path(&self, path: &str) -> Option<&UnityValue> {
        path.split('/')
            .filter(|segment| !segment.is_empty())
            .try_fold(self, |current, segment| match current {
                UnityValue::Object(obj) => obj.get(segment),
                UnityValue::Array(arr) => segment.parse::<usize>().ok().and_then(|i| arr.get(i)),
                _ => None,
            })
    }
}

/// Write `items` separated by `, ` between `open` and `close`
fn write_seq<I, F>(
    f: &mut fmt::Formatter<'_>,
    open: &str,
    close: &str,
    items: I,
    mut item: F,
) -> fmt::Result
where
    I: IntoIterator,
    F: FnMut(&mut fmt::Formatter<'_>, I::Item) -> fmt::Result,
{
    f.write_str(open)?;
    for (index, value) in items.into_iter().enumerate() {
        if index > 0 {
            f.write_str(", ")?;
        }
        item(f, value)?;
    }
    f.write_str(close)
}

impl fmt::Display for UnityValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnityValue::Null => f.write_str("null"),
            UnityValue::Bool(value) => write!(f, "{}", value),
            UnityValue::Integer(value) => write!(f, "{}", value),
            UnityValue::UInteger(value) => write!(f, "{}", value),
            UnityValue::Float(value) => write!(f, "{}", value),
            UnityValue::String(value) => write!(f, "{:?}", value),
            UnityValue::Array(items) => {
                write_seq(f, "[", "]", items, |f, item| write!(f, "{}", item))
            }
            UnityValue::Object(fields) => write_seq(f, "{", "}", fields, |f, (key, value)| {
                write!(f, "{}: {}", key, value)
            }),
        }
    }
}

macro_rules! value_from {
    ($($ty:ty => $variant:ident($convert:expr)),+ $(,)?) => {
        $(
            impl From<$ty> for UnityValue {
                fn from(value: $ty) -> Self {
                    let convert: fn($ty) -> _ = $convert;
                    UnityValue::$variant(convert(value))
                }
            }
        )+
    };
}

value_from! {
    bool => Bool(|v| v),
    i32 => Integer(i64::from),
    i64 => Integer(|v| v),
    u32 => Integer(i64::from),
    f32 => Float(f64::from),
    f64 => Float(|v| v),
    String => String(|v| v),
    &str => String(str::to_string),
    Vec<UnityValue> => Array(|v| v),
    IndexMap<String, UnityValue> => Object(|v| v),
}

impl From<u64> for UnityValue {
    /// Values above `i64::MAX` stay unsigned
    fn from(value: u64) -> Self {
        i64::try_from(value).map_or(UnityValue::UInteger(value), UnityValue::Integer)
    }
}
