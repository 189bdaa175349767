use std::fmt;

use bytes::Bytes;
use recpack_layout::FieldKind;
use serde::{Deserialize, Serialize};

/// One typed value of a record.
///
/// Each variant corresponds to exactly one [`FieldKind`]; a byte block's
/// kind carries its length.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Value {
    Int16(i16),
    Int32(i32),
    Int64(i64),
    Float32(f32),
    Float64(f64),
    Bytes(Bytes),
}

impl Value {
    /// The field kind this value fits.
    pub fn kind(&self) -> FieldKind {
        match self {
            Self::Int16(_) => FieldKind::Int16,
            Self::Int32(_) => FieldKind::Int32,
            Self::Int64(_) => FieldKind::Int64,
            Self::Float32(_) => FieldKind::Float32,
            Self::Float64(_) => FieldKind::Float64,
            Self::Bytes(b) => FieldKind::Bytes(b.len()),
        }
    }

    pub fn as_i16(&self) -> Option<i16> {
        match self {
            Self::Int16(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Self::Int32(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f32(&self) -> Option<f32> {
        match self {
            Self::Float32(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bytes(b) => Some(b.as_ref()),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int16(v) => write!(f, "{v}"),
            Self::Int32(v) => write!(f, "{v}"),
            Self::Int64(v) => write!(f, "{v}"),
            Self::Float32(v) => write!(f, "{v}"),
            Self::Float64(v) => write!(f, "{v}"),
            Self::Bytes(b) => write!(f, "b\"{}\"", b.escape_ascii()),
        }
    }
}

impl From<i16> for Value {
    fn from(v: i16) -> Self {
        Self::Int16(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Int32(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int64(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Self::Float32(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float64(v)
    }
}

impl From<Bytes> for Value {
    fn from(v: Bytes) -> Self {
        Self::Bytes(v)
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Self::Bytes(Bytes::from(v))
    }
}

impl From<&[u8]> for Value {
    fn from(v: &[u8]) -> Self {
        Self::Bytes(Bytes::copy_from_slice(v))
    }
}

impl<const N: usize> From<&[u8; N]> for Value {
    fn from(v: &[u8; N]) -> Self {
        Self::Bytes(Bytes::copy_from_slice(v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_tracks_block_length() {
        assert_eq!(Value::from(b"abc").kind(), FieldKind::Bytes(3));
        assert_eq!(Value::from(Vec::<u8>::new()).kind(), FieldKind::Bytes(0));
        assert_eq!(Value::from(7i16).kind(), FieldKind::Int16);
        assert_eq!(Value::from(7i64).kind(), FieldKind::Int64);
        assert_eq!(Value::from(1.5f64).kind(), FieldKind::Float64);
    }

    #[test]
    fn accessors_only_match_their_variant() {
        let v = Value::Int32(5);
        assert_eq!(v.as_i32(), Some(5));
        assert_eq!(v.as_i16(), None);
        assert_eq!(v.as_f32(), None);
        assert_eq!(Value::from(b"ab").as_bytes(), Some(&b"ab"[..]));
        assert_eq!(Value::Float32(2.5).as_f32(), Some(2.5));
        assert_eq!(Value::Int64(-1).as_i64(), Some(-1));
        assert_eq!(Value::Float64(0.25).as_f64(), Some(0.25));
        assert_eq!(Value::Int16(3).as_i16(), Some(3));
    }

    #[test]
    fn display_escapes_blocks() {
        assert_eq!(Value::from(b"a\0").to_string(), "b\"a\\x00\"");
        assert_eq!(Value::Int32(-4).to_string(), "-4");
    }

    #[test]
    fn serializes_tagged() {
        let json = serde_json::to_value(Value::Int32(9)).unwrap();
        assert_eq!(json, serde_json::json!({"kind": "int32", "value": 9}));

        let json = serde_json::to_value(Value::from(b"hi")).unwrap();
        assert_eq!(json["kind"], "bytes");
        assert_eq!(json["value"], serde_json::json!([104, 105]));

        let back: Value = serde_json::from_value(json).unwrap();
        assert_eq!(back, Value::from(b"hi"));
    }
}
