//! Byte-exact packing and unpacking of fixed-layout binary records.
//!
//! A [`Record`] is an ordered tuple of typed [`Value`]s. Encoding checks the
//! record against a [`Layout`] before writing anything, then lays each value
//! out at its field offset:
//! - Integers as two's-complement
//! - Floats as IEEE-754
//! - Byte blocks as raw bytes, exactly as wide as declared
//!
//! There is no length prefix and no checksum: an encoded record is exactly
//! [`Layout::size`] bytes.

pub mod codec;
pub mod error;
pub mod record;
pub mod value;

pub use codec::{decode, decode_bytes, encode, encode_into, RecordCodec};
pub use error::{CodecError, Result};
pub use record::Record;
pub use value::Value;

pub use recpack_layout::{describe_layout, ByteOrder, Field, FieldKind, Layout, LayoutError};

/// Build a [`Record`] from a list of values convertible into [`Value`].
///
/// ```
/// use recpack_codec::{record, Value};
///
/// let rec = record![1i32, b"abc", 2.7f32];
/// assert_eq!(rec[0], Value::Int32(1));
/// assert_eq!(rec.len(), 3);
/// ```
#[macro_export]
macro_rules! record {
    ($($value:expr),* $(,)?) => {
        $crate::Record::new(vec![$($crate::Value::from($value)),*])
    };
}
