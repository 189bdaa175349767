use std::fmt;

use serde::Serialize;

use crate::kind::{ByteOrder, FieldKind};

/// One value-carrying field and where it sits in the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Field {
    /// The field's primitive kind.
    pub kind: FieldKind,
    /// Byte offset of the field from the start of the record.
    pub offset: usize,
}

impl Field {
    /// Byte range covered by this field.
    pub fn range(&self) -> std::ops::Range<usize> {
        self.offset..self.offset + self.kind.width()
    }
}

/// An immutable, parsed record layout.
///
/// Construct one with [`describe_layout`](crate::describe_layout) and reuse
/// it for every record of that shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Layout {
    spec: String,
    byte_order: ByteOrder,
    aligned: bool,
    fields: Vec<Field>,
    size: usize,
}

impl Layout {
    pub(crate) fn new(
        spec: impl Into<String>,
        byte_order: ByteOrder,
        aligned: bool,
        fields: Vec<Field>,
        size: usize,
    ) -> Self {
        Self {
            spec: spec.into(),
            byte_order,
            aligned,
            fields,
            size,
        }
    }

    /// The layout string this layout was parsed from.
    pub fn spec(&self) -> &str {
        &self.spec
    }

    /// Byte order applied to every numeric field.
    pub fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }

    /// Whether fields are padded to their native alignment (`@` prefix).
    pub fn is_aligned(&self) -> bool {
        self.aligned
    }

    /// Value-carrying fields in declaration order. Pad bytes are not listed.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Field at `index`, if any.
    pub fn field(&self, index: usize) -> Option<&Field> {
        self.fields.get(index)
    }

    /// Number of values a record for this layout holds.
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Total encoded size in bytes, padding included.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Kinds of all fields in order.
    pub fn kinds(&self) -> impl Iterator<Item = FieldKind> + '_ {
        self.fields.iter().map(|field| field.kind)
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.spec)
    }
}
