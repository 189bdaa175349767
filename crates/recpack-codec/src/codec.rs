use std::sync::Arc;

use bytes::{Buf, BufMut, Bytes, BytesMut};
use recpack_layout::{describe_layout, ByteOrder, Field, FieldKind, Layout};
use tracing::trace;

use crate::error::{CodecError, Result};
use crate::record::Record;
use crate::value::Value;

/// Encode a record into a fresh buffer of exactly `layout.size()` bytes.
///
/// ```text
/// i3sf, (1, b"abc", 2.7) ->
/// ┌──────────────┬──────────┬──────────────┐
/// │ 00 00 00 01  │ 61 62 63 │ 40 2c cc cd  │
/// │ int32 (BE)   │ bytes[3] │ float32 (BE) │
/// └──────────────┴──────────┴──────────────┘
/// ```
pub fn encode(layout: &Layout, record: &Record) -> Result<Bytes> {
    let mut dst = BytesMut::with_capacity(layout.size());
    encode_into(layout, record, &mut dst)?;
    Ok(dst.freeze())
}

/// Append an encoded record to `dst`.
///
/// The record is fully checked before anything is written; on error `dst`
/// is left as it was.
pub fn encode_into(layout: &Layout, record: &Record, dst: &mut BytesMut) -> Result<()> {
    check_record(layout, record)?;

    let base = dst.len();
    let order = layout.byte_order();
    dst.reserve(layout.size());

    for (field, value) in layout.fields().iter().zip(record.iter()) {
        let gap = base + field.offset - dst.len();
        dst.put_bytes(0, gap);
        put_value(dst, order, value);
    }
    let tail = base + layout.size() - dst.len();
    dst.put_bytes(0, tail);

    trace!(
        layout = layout.spec(),
        size = layout.size(),
        "encoded record"
    );
    Ok(())
}

/// Decode one record from a byte slice, copying byte blocks out of it.
pub fn decode(layout: &Layout, src: &[u8]) -> Result<Record> {
    check_length(layout, src.len())?;
    decode_bytes(layout, Bytes::copy_from_slice(src))
}

/// Decode one record from shared bytes. Byte blocks are returned as
/// slices of `src` without copying.
pub fn decode_bytes(layout: &Layout, src: Bytes) -> Result<Record> {
    check_length(layout, src.len())?;

    let order = layout.byte_order();
    let record: Record = layout
        .fields()
        .iter()
        .map(|field| get_value(&src, order, field))
        .collect();

    trace!(
        layout = layout.spec(),
        size = layout.size(),
        "decoded record"
    );
    Ok(record)
}

fn check_record(layout: &Layout, record: &Record) -> Result<()> {
    if record.len() != layout.field_count() {
        return Err(CodecError::ArityMismatch {
            expected: layout.field_count(),
            actual: record.len(),
        });
    }

    for (index, (field, value)) in layout.fields().iter().zip(record.iter()).enumerate() {
        let actual = value.kind();
        if actual != field.kind {
            return Err(CodecError::FieldMismatch {
                index,
                expected: field.kind,
                actual,
            });
        }
    }
    Ok(())
}

fn check_length(layout: &Layout, actual: usize) -> Result<()> {
    if actual != layout.size() {
        return Err(CodecError::LengthMismatch {
            expected: layout.size(),
            actual,
        });
    }
    Ok(())
}

fn put_value(dst: &mut BytesMut, order: ByteOrder, value: &Value) {
    match (value, order) {
        (Value::Int16(v), ByteOrder::Big) => dst.put_i16(*v),
        (Value::Int16(v), ByteOrder::Little) => dst.put_i16_le(*v),
        (Value::Int32(v), ByteOrder::Big) => dst.put_i32(*v),
        (Value::Int32(v), ByteOrder::Little) => dst.put_i32_le(*v),
        (Value::Int64(v), ByteOrder::Big) => dst.put_i64(*v),
        (Value::Int64(v), ByteOrder::Little) => dst.put_i64_le(*v),
        (Value::Float32(v), ByteOrder::Big) => dst.put_f32(*v),
        (Value::Float32(v), ByteOrder::Little) => dst.put_f32_le(*v),
        (Value::Float64(v), ByteOrder::Big) => dst.put_f64(*v),
        (Value::Float64(v), ByteOrder::Little) => dst.put_f64_le(*v),
        (Value::Bytes(b), _) => dst.put_slice(b),
    }
}

// Callers have already checked that `src` is exactly one record long.
fn get_value(src: &Bytes, order: ByteOrder, field: &Field) -> Value {
    let mut cur = &src[field.range()];
    match (field.kind, order) {
        (FieldKind::Int16, ByteOrder::Big) => Value::Int16(cur.get_i16()),
        (FieldKind::Int16, ByteOrder::Little) => Value::Int16(cur.get_i16_le()),
        (FieldKind::Int32, ByteOrder::Big) => Value::Int32(cur.get_i32()),
        (FieldKind::Int32, ByteOrder::Little) => Value::Int32(cur.get_i32_le()),
        (FieldKind::Int64, ByteOrder::Big) => Value::Int64(cur.get_i64()),
        (FieldKind::Int64, ByteOrder::Little) => Value::Int64(cur.get_i64_le()),
        (FieldKind::Float32, ByteOrder::Big) => Value::Float32(cur.get_f32()),
        (FieldKind::Float32, ByteOrder::Little) => Value::Float32(cur.get_f32_le()),
        (FieldKind::Float64, ByteOrder::Big) => Value::Float64(cur.get_f64()),
        (FieldKind::Float64, ByteOrder::Little) => Value::Float64(cur.get_f64_le()),
        (FieldKind::Bytes(_), _) => Value::Bytes(src.slice(field.range())),
    }
}

/// A codec bound to one shared layout.
///
/// Owns the wire contract for a record shape: build it once, then encode
/// and decode any number of records against it.
#[derive(Debug, Clone)]
pub struct RecordCodec {
    layout: Arc<Layout>,
}

impl RecordCodec {
    /// Create a codec for an already parsed layout.
    pub fn new(layout: impl Into<Arc<Layout>>) -> Self {
        Self {
            layout: layout.into(),
        }
    }

    /// Parse `spec` and create a codec for it.
    pub fn parse(spec: &str) -> Result<Self> {
        Ok(Self::new(describe_layout(spec)?))
    }

    pub fn layout(&self) -> &Arc<Layout> {
        &self.layout
    }

    /// Encoded size of every record.
    pub fn record_size(&self) -> usize {
        self.layout.size()
    }

    pub fn encode(&self, record: &Record) -> Result<Bytes> {
        encode(&self.layout, record)
    }

    pub fn encode_into(&self, record: &Record, dst: &mut BytesMut) -> Result<()> {
        encode_into(&self.layout, record, dst)
    }

    pub fn decode(&self, src: &[u8]) -> Result<Record> {
        decode(&self.layout, src)
    }

    pub fn decode_bytes(&self, src: Bytes) -> Result<Record> {
        decode_bytes(&self.layout, src)
    }
}
