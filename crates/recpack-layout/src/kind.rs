//! Field kinds and byte orders.
//!
//! Each kind has a one-character code used in layout strings:
//!
//! | Code | Kind | Width |
//! |---|---|---|
//! | `h` | signed 16-bit integer | 2 |
//! | `i` | signed 32-bit integer | 4 |
//! | `q` | signed 64-bit integer | 8 |
//! | `f` | IEEE-754 single precision float | 4 |
//! | `d` | IEEE-754 double precision float | 8 |
//! | `Ns` | byte block of width `N` | N |
//!
//! The pad code `x` is not a kind: pad bytes carry no value.

use std::fmt;
use std::mem;

use serde::{Deserialize, Serialize};

/// Layout code for a pad byte.
pub const PAD: u8 = b'x';

/// Layout code for a byte block.
pub const BYTES: u8 = b's';

/// The primitive kind of one value-carrying field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Int16,
    Int32,
    Int64,
    Float32,
    Float64,
    /// Raw byte block of exactly this many bytes.
    Bytes(usize),
}

impl FieldKind {
    /// Map a numeric layout code to its kind. Byte blocks are not numeric
    /// and need a width, so `s` returns `None` here.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            b'h' => Some(Self::Int16),
            b'i' => Some(Self::Int32),
            b'q' => Some(Self::Int64),
            b'f' => Some(Self::Float32),
            b'd' => Some(Self::Float64),
            _ => None,
        }
    }

    /// The layout code for this kind.
    pub fn code(self) -> char {
        match self {
            Self::Int16 => 'h',
            Self::Int32 => 'i',
            Self::Int64 => 'q',
            Self::Float32 => 'f',
            Self::Float64 => 'd',
            Self::Bytes(_) => 's',
        }
    }

    /// Encoded width in bytes.
    pub fn width(self) -> usize {
        match self {
            Self::Int16 => 2,
            Self::Int32 | Self::Float32 => 4,
            Self::Int64 | Self::Float64 => 8,
            Self::Bytes(width) => width,
        }
    }

    /// Alignment under native (`@`) layouts, as the host C compiler lays
    /// out the matching scalar.
    pub fn alignment(self) -> usize {
        match self {
            Self::Int16 => mem::align_of::<i16>(),
            Self::Int32 => mem::align_of::<i32>(),
            Self::Int64 => mem::align_of::<i64>(),
            Self::Float32 => mem::align_of::<f32>(),
            Self::Float64 => mem::align_of::<f64>(),
            Self::Bytes(_) => 1,
        }
    }

    /// Returns true for integer and float kinds.
    pub fn is_numeric(self) -> bool {
        !matches!(self, Self::Bytes(_))
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int16 => f.write_str("int16"),
            Self::Int32 => f.write_str("int32"),
            Self::Int64 => f.write_str("int64"),
            Self::Float32 => f.write_str("float32"),
            Self::Float64 => f.write_str("float64"),
            Self::Bytes(width) => write!(f, "bytes[{width}]"),
        }
    }
}

/// Byte order used for every numeric field of a record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ByteOrder {
    #[default]
    Big,
    Little,
}

impl ByteOrder {
    /// Network byte order.
    pub const NETWORK: ByteOrder = ByteOrder::Big;

    /// The byte order of the machine this code runs on.
    pub fn native() -> Self {
        if cfg!(target_endian = "little") {
            Self::Little
        } else {
            Self::Big
        }
    }
}
