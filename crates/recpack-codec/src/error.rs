use recpack_layout::{FieldKind, LayoutError};

/// Errors that can occur while encoding or decoding a record.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    /// The record holds a different number of values than the layout has fields.
    #[error("record has {actual} values, layout expects {expected}")]
    ArityMismatch { expected: usize, actual: usize },

    /// A value's kind or byte-block width does not match its layout slot.
    #[error("field {index}: expected {expected}, got {actual}")]
    FieldMismatch {
        index: usize,
        expected: FieldKind,
        actual: FieldKind,
    },

    /// The encoded bytes are not exactly one record long.
    #[error("encoded length {actual} does not match layout size {expected}")]
    LengthMismatch { expected: usize, actual: usize },

    /// The layout string could not be parsed.
    #[error(transparent)]
    Layout(#[from] LayoutError),
}

pub type Result<T> = std::result::Result<T, CodecError>;
