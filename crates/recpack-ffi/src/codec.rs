use std::ptr;

use recpack_codec::{Record, Value};

use crate::args;
use crate::error;
use crate::types::{
    RpBuffer, RpLayoutHandle, RpRecord, RpResult, RpValue, RP_KIND_BYTES, RP_KIND_FLOAT32,
    RP_KIND_FLOAT64, RP_KIND_INT16, RP_KIND_INT32, RP_KIND_INT64,
};

fn boxed_bytes(bytes: &[u8]) -> (*mut u8, usize) {
    if bytes.is_empty() {
        return (ptr::null_mut(), 0);
    }
    let boxed: Box<[u8]> = bytes.to_vec().into_boxed_slice();
    let len = boxed.len();
    (Box::into_raw(boxed) as *mut u8, len)
}

/// # Safety
/// `data` must be null or a pointer produced by `boxed_bytes` with this `len`.
unsafe fn free_boxed_bytes(data: *mut u8, len: usize) {
    if data.is_null() {
        return;
    }
    let slice_ptr = ptr::slice_from_raw_parts_mut(data, len);
    // SAFETY: `data` was allocated by `Box<[u8]>` in `boxed_bytes`.
    unsafe {
        drop(Box::from_raw(slice_ptr));
    }
}

fn int_in_range<T: TryFrom<i64>>(raw: &RpValue, index: usize, name: &str) -> Result<T, RpResult> {
    T::try_from(raw.int_value).map_err(|_| {
        error::set_error(
            RpResult::FieldMismatch,
            format!("field {index}: {} out of range for {name}", raw.int_value),
        )
    })
}

/// # Safety
/// For `RP_KIND_BYTES` with `len > 0`, `raw.data` must be readable for `len` bytes.
unsafe fn value_from_ffi(raw: &RpValue, index: usize) -> Result<Value, RpResult> {
    let value = match raw.kind {
        RP_KIND_INT16 => Value::Int16(int_in_range(raw, index, "int16")?),
        RP_KIND_INT32 => Value::Int32(int_in_range(raw, index, "int32")?),
        RP_KIND_INT64 => Value::Int64(raw.int_value),
        RP_KIND_FLOAT32 => Value::Float32(raw.float_value as f32),
        RP_KIND_FLOAT64 => Value::Float64(raw.float_value),
        RP_KIND_BYTES => {
            // SAFETY: Pointer and length validity are guaranteed by the caller.
            match unsafe { args::bytes_arg(raw.data, raw.len, "value data") } {
                Some(bytes) => Value::from(bytes),
                None => return Err(RpResult::InvalidArgument),
            }
        }
        other => {
            return Err(error::set_invalid_argument(format!(
                "field {index}: unknown value kind {other}"
            )));
        }
    };
    Ok(value)
}

fn value_to_ffi(value: &Value) -> RpValue {
    let mut out = RpValue::default();
    match value {
        Value::Int16(v) => {
            out.kind = RP_KIND_INT16;
            out.int_value = i64::from(*v);
        }
        Value::Int32(v) => {
            out.kind = RP_KIND_INT32;
            out.int_value = i64::from(*v);
        }
        Value::Int64(v) => {
            out.kind = RP_KIND_INT64;
            out.int_value = *v;
        }
        Value::Float32(v) => {
            out.kind = RP_KIND_FLOAT32;
            out.float_value = f64::from(*v);
        }
        Value::Float64(v) => {
            out.kind = RP_KIND_FLOAT64;
            out.float_value = *v;
        }
        Value::Bytes(b) => {
            let (data, len) = boxed_bytes(b);
            out.kind = RP_KIND_BYTES;
            out.data = data;
            out.len = len;
        }
    }
    out
}

/// Encode `count` values into a record buffer.
///
/// On success `out_buffer` owns library memory; release it with
/// `rp_buffer_free`.
///
/// # Safety
/// `layout` must be a valid layout handle. If `count > 0`, `values` must be
/// readable for `count` elements, and every byte-block value's `data` must be
/// readable for its `len`. `out_buffer` must be valid for writes.
#[no_mangle]
pub unsafe extern "C" fn rp_encode(
    layout: RpLayoutHandle,
    values: *const RpValue,
    count: usize,
    out_buffer: *mut RpBuffer,
) -> RpResult {
    crate::ffi_boundary(RpResult::Internal, || {
        error::clear_error_state();

        if out_buffer.is_null() {
            return error::set_invalid_argument("out_buffer cannot be null");
        }
        // SAFETY: Handle validity is guaranteed by the caller.
        let Some(handle) = (unsafe { args::layout_arg(layout) }) else {
            return RpResult::InvalidArgument;
        };
        // SAFETY: Pointer and count validity are guaranteed by the caller.
        let Some(raw_values) = (unsafe { args::values_arg(values, count) }) else {
            return RpResult::InvalidArgument;
        };

        let mut record = Record::with_capacity(raw_values.len());
        for (index, raw) in raw_values.iter().enumerate() {
            // SAFETY: Byte-block pointer validity is guaranteed by the caller.
            match unsafe { value_from_ffi(raw, index) } {
                Ok(value) => record.push(value),
                Err(code) => return code,
            }
        }

        match recpack_codec::encode(&handle.layout, &record) {
            Ok(bytes) => {
                let (data, len) = boxed_bytes(&bytes);
                // SAFETY: Non-null checked above; validity is guaranteed by the caller.
                unsafe { out_buffer.write(RpBuffer { data, len }) };
                RpResult::Ok
            }
            Err(err) => error::map_codec_error(&err),
        }
    })
}

/// Free bytes held by an [`RpBuffer`] populated by `rp_encode`.
///
/// # Safety
/// `buffer` must be null or point to an `RpBuffer` whose `data` is null or
/// was produced by this library.
#[no_mangle]
pub unsafe extern "C" fn rp_buffer_free(buffer: *mut RpBuffer) {
    crate::ffi_boundary((), || {
        if buffer.is_null() {
            return;
        }

        let buffer_ref = {
            // SAFETY: Pointer validity is guaranteed by the caller.
            unsafe { &mut *buffer }
        };
        // SAFETY: Data was allocated by `boxed_bytes`.
        unsafe { free_boxed_bytes(buffer_ref.data, buffer_ref.len) };
        *buffer_ref = RpBuffer::default();
    });
}

/// Decode one record.
///
/// On success `out_record` owns library memory; release it with
/// `rp_record_free`.
///
/// # Safety
/// `layout` must be a valid layout handle. If `len > 0`, `data` must be
/// readable for `len` bytes. `out_record` must be valid for writes.
#[no_mangle]
pub unsafe extern "C" fn rp_decode(
    layout: RpLayoutHandle,
    data: *const u8,
    len: usize,
    out_record: *mut RpRecord,
) -> RpResult {
    crate::ffi_boundary(RpResult::Internal, || {
        error::clear_error_state();

        if out_record.is_null() {
            return error::set_invalid_argument("out_record cannot be null");
        }
        // SAFETY: Handle validity is guaranteed by the caller.
        let Some(handle) = (unsafe { args::layout_arg(layout) }) else {
            return RpResult::InvalidArgument;
        };
        // SAFETY: Pointer and length validity are guaranteed by the caller.
        let Some(src) = (unsafe { args::bytes_arg(data, len, "data") }) else {
            return RpResult::InvalidArgument;
        };

        match recpack_codec::decode(&handle.layout, src) {
            Ok(record) => {
                let values: Box<[RpValue]> = record.iter().map(value_to_ffi).collect();
                let count = values.len();
                let values = if count == 0 {
                    ptr::null_mut()
                } else {
                    Box::into_raw(values) as *mut RpValue
                };
                // SAFETY: Non-null checked above; validity is guaranteed by the caller.
                unsafe { out_record.write(RpRecord { values, count }) };
                RpResult::Ok
            }
            Err(err) => error::map_codec_error(&err),
        }
    })
}

/// Free values held by an [`RpRecord`] populated by `rp_decode`.
///
/// # Safety
/// `record` must be null or point to an `RpRecord` whose `values` is null or
/// was produced by `rp_decode` with this `count`.
#[no_mangle]
pub unsafe extern "C" fn rp_record_free(record: *mut RpRecord) {
    crate::ffi_boundary((), || {
        if record.is_null() {
            return;
        }

        let record_ref = {
            // SAFETY: Pointer validity is guaranteed by the caller.
            unsafe { &mut *record }
        };

        if !record_ref.values.is_null() {
            let slice_ptr = ptr::slice_from_raw_parts_mut(record_ref.values, record_ref.count);
            // SAFETY: `values` was allocated by `Box<[RpValue]>` in `rp_decode`.
            let values = unsafe { Box::from_raw(slice_ptr) };
            for value in values.iter().filter(|v| v.kind == RP_KIND_BYTES) {
                // SAFETY: Byte-block data was allocated by `boxed_bytes`.
                unsafe { free_boxed_bytes(value.data, value.len) };
            }
        }

        *record_ref = RpRecord::default();
    });
}

#[cfg(test)]
mod tests {
    use std::ffi::{CStr, CString};

    use super::*;
    use crate::layout::{rp_layout_free, rp_layout_parse, rp_layout_size};

    struct Layout(RpLayoutHandle);

    impl Layout {
        fn parse(spec: &str) -> Self {
            let spec = CString::new(spec).unwrap();
            let mut handle: RpLayoutHandle = ptr::null_mut();
            // SAFETY: Valid C string and out pointer.
            let result = unsafe { rp_layout_parse(spec.as_ptr(), &mut handle) };
            assert_eq!(result, RpResult::Ok);
            Self(handle)
        }
    }

    impl Drop for Layout {
        fn drop(&mut self) {
            // SAFETY: Handle came from `rp_layout_parse` and is freed once.
            unsafe { rp_layout_free(self.0) };
        }
    }

    fn int(kind: i32, v: i64) -> RpValue {
        RpValue {
            kind,
            int_value: v,
            ..RpValue::default()
        }
    }

    fn float(kind: i32, v: f64) -> RpValue {
        RpValue {
            kind,
            float_value: v,
            ..RpValue::default()
        }
    }

    fn block(bytes: &[u8]) -> RpValue {
        RpValue {
            kind: RP_KIND_BYTES,
            data: bytes.as_ptr() as *mut u8,
            len: bytes.len(),
            ..RpValue::default()
        }
    }

    fn last_error() -> String {
        // SAFETY: Pointer refers to this thread's last-error CString.
        unsafe { CStr::from_ptr(crate::rp_last_error()) }
            .to_string_lossy()
            .into_owned()
    }

    #[test]
    fn encode_decode_roundtrip() {
        let layout = Layout::parse("i3sf");
        let values = [
            int(RP_KIND_INT32, 1),
            block(b"abc"),
            float(RP_KIND_FLOAT32, 2.5),
        ];

        let mut buffer = RpBuffer::default();
        // SAFETY: All pointers are valid for the call.
        let result = unsafe { rp_encode(layout.0, values.as_ptr(), values.len(), &mut buffer) };
        assert_eq!(result, RpResult::Ok);
        assert_eq!(buffer.len, 11);

        let mut record = RpRecord::default();
        // SAFETY: Buffer was produced by `rp_encode`.
        let result = unsafe { rp_decode(layout.0, buffer.data, buffer.len, &mut record) };
        assert_eq!(result, RpResult::Ok);
        assert_eq!(record.count, 3);

        // SAFETY: `rp_decode` returned `count` initialized values.
        let decoded = unsafe { std::slice::from_raw_parts(record.values, record.count) };
        assert_eq!(decoded[0].kind, RP_KIND_INT32);
        assert_eq!(decoded[0].int_value, 1);
        assert_eq!(decoded[1].kind, RP_KIND_BYTES);
        // SAFETY: Byte block points at `len` bytes owned by the record.
        let bytes = unsafe { std::slice::from_raw_parts(decoded[1].data, decoded[1].len) };
        assert_eq!(bytes, b"abc");
        assert_eq!(decoded[2].kind, RP_KIND_FLOAT32);
        assert_eq!(decoded[2].float_value, 2.5);

        // SAFETY: Both were populated by this library.
        unsafe {
            rp_record_free(&mut record);
            rp_buffer_free(&mut buffer);
        }
        assert!(record.values.is_null());
        assert!(buffer.data.is_null());
    }

    fn decode_all(layout: &Layout, buffer: &RpBuffer) -> Vec<RpValue> {
        let mut record = RpRecord::default();
        // SAFETY: Buffer was produced by `rp_encode`.
        let result = unsafe { rp_decode(layout.0, buffer.data, buffer.len, &mut record) };
        assert_eq!(result, RpResult::Ok);
        // SAFETY: `rp_decode` returned `count` initialized values.
        let decoded = unsafe { std::slice::from_raw_parts(record.values, record.count) }.to_vec();
        // SAFETY: Populated by `rp_decode`; `decoded` keeps no byte-block pointers past this.
        unsafe { rp_record_free(&mut record) };
        decoded
    }

    #[test]
    fn native_aligned_struct_roundtrip() {
        let layout = Layout::parse("@if8sdh2i0q");
        let values = [
            int(RP_KIND_INT32, 1),
            float(RP_KIND_FLOAT32, 2.25),
            block(b"aaaaaaaa"),
            float(RP_KIND_FLOAT64, 3.45),
            int(RP_KIND_INT16, -6),
            int(RP_KIND_INT32, 0),
            int(RP_KIND_INT32, i64::from(i32::MAX)),
        ];

        let mut buffer = RpBuffer::default();
        // SAFETY: All pointers are valid for the call.
        let result = unsafe { rp_encode(layout.0, values.as_ptr(), values.len(), &mut buffer) };
        assert_eq!(result, RpResult::Ok);
        let mut size = 0usize;
        // SAFETY: Valid handle and out pointer.
        assert_eq!(unsafe { rp_layout_size(layout.0, &mut size) }, RpResult::Ok);
        assert_eq!(buffer.len, size);
        #[cfg(target_pointer_width = "64")]
        assert_eq!(buffer.len, 40);

        let decoded = decode_all(&layout, &buffer);
        let kinds: Vec<i32> = decoded.iter().map(|v| v.kind).collect();
        assert_eq!(
            kinds,
            vec![
                RP_KIND_INT32,
                RP_KIND_FLOAT32,
                RP_KIND_BYTES,
                RP_KIND_FLOAT64,
                RP_KIND_INT16,
                RP_KIND_INT32,
                RP_KIND_INT32,
            ]
        );
        assert_eq!(decoded[0].int_value, 1);
        assert_eq!(decoded[1].float_value, 2.25);
        assert_eq!(decoded[2].len, 8);
        assert_eq!(decoded[3].float_value, 3.45);
        assert_eq!(decoded[4].int_value, -6);
        assert_eq!(decoded[5].int_value, 0);
        assert_eq!(decoded[6].int_value, i64::from(i32::MAX));
        assert!(decoded
            .iter()
            .filter(|v| v.kind != RP_KIND_BYTES)
            .all(|v| v.data.is_null() && v.len == 0));

        // SAFETY: Populated by `rp_encode`.
        unsafe { rp_buffer_free(&mut buffer) };
    }

    #[test]
    fn little_endian_wide_kinds_roundtrip() {
        let layout = Layout::parse("<hqd");
        let values = [
            int(RP_KIND_INT16, i64::from(i16::MIN)),
            int(RP_KIND_INT64, i64::MIN),
            float(RP_KIND_FLOAT64, -1.5e300),
        ];

        let mut buffer = RpBuffer::default();
        // SAFETY: All pointers are valid for the call.
        let result = unsafe { rp_encode(layout.0, values.as_ptr(), values.len(), &mut buffer) };
        assert_eq!(result, RpResult::Ok);
        assert_eq!(buffer.len, 18);
        // SAFETY: Buffer holds `len` bytes owned by the library.
        let bytes = unsafe { std::slice::from_raw_parts(buffer.data, buffer.len) };
        assert_eq!(&bytes[..2], &i16::MIN.to_le_bytes());
        assert_eq!(&bytes[2..10], &i64::MIN.to_le_bytes());
        assert_eq!(&bytes[10..], &(-1.5e300f64).to_le_bytes());

        let decoded = decode_all(&layout, &buffer);
        assert_eq!(decoded.len(), 3);
        assert_eq!(decoded[0].kind, RP_KIND_INT16);
        assert_eq!(decoded[0].int_value, i64::from(i16::MIN));
        assert_eq!(decoded[1].kind, RP_KIND_INT64);
        assert_eq!(decoded[1].int_value, i64::MIN);
        assert_eq!(decoded[2].kind, RP_KIND_FLOAT64);
        assert_eq!(decoded[2].float_value, -1.5e300);

        // SAFETY: Populated by `rp_encode`.
        unsafe { rp_buffer_free(&mut buffer) };
    }

    #[test]
    fn arity_and_field_mismatch_codes() {
        let layout = Layout::parse("ii");
        let mut buffer = RpBuffer::default();

        let one = [int(RP_KIND_INT32, 1)];
        // SAFETY: All pointers are valid for the call.
        let result = unsafe { rp_encode(layout.0, one.as_ptr(), one.len(), &mut buffer) };
        assert_eq!(result, RpResult::ArityMismatch);

        let wrong = [int(RP_KIND_INT32, 1), float(RP_KIND_FLOAT64, 1.0)];
        // SAFETY: All pointers are valid for the call.
        let result = unsafe { rp_encode(layout.0, wrong.as_ptr(), wrong.len(), &mut buffer) };
        assert_eq!(result, RpResult::FieldMismatch);
        assert!(last_error().contains("field 1"));
        assert!(buffer.data.is_null());
    }

    #[test]
    fn out_of_range_integer_is_field_mismatch() {
        let layout = Layout::parse("h");
        let values = [int(RP_KIND_INT16, 70_000)];
        let mut buffer = RpBuffer::default();
        // SAFETY: All pointers are valid for the call.
        let result = unsafe { rp_encode(layout.0, values.as_ptr(), values.len(), &mut buffer) };
        assert_eq!(result, RpResult::FieldMismatch);
        assert!(last_error().contains("out of range for int16"));
    }

    #[test]
    fn unknown_kind_is_invalid_argument() {
        let layout = Layout::parse("i");
        let values = [int(42, 1)];
        let mut buffer = RpBuffer::default();
        // SAFETY: All pointers are valid for the call.
        let result = unsafe { rp_encode(layout.0, values.as_ptr(), values.len(), &mut buffer) };
        assert_eq!(result, RpResult::InvalidArgument);
    }

    #[test]
    fn decode_length_mismatch_code() {
        let layout = Layout::parse("i");
        let data = [0u8; 3];
        let mut record = RpRecord::default();
        // SAFETY: All pointers are valid for the call.
        let result = unsafe { rp_decode(layout.0, data.as_ptr(), data.len(), &mut record) };
        assert_eq!(result, RpResult::LengthMismatch);
        assert!(record.values.is_null());
    }

    #[test]
    fn null_out_pointers_are_rejected() {
        let layout = Layout::parse("i");
        // SAFETY: Null out pointers are explicitly handled.
        unsafe {
            assert_eq!(
                rp_encode(layout.0, ptr::null(), 0, ptr::null_mut()),
                RpResult::InvalidArgument
            );
            assert_eq!(
                rp_decode(layout.0, ptr::null(), 0, ptr::null_mut()),
                RpResult::InvalidArgument
            );
            rp_buffer_free(ptr::null_mut());
            rp_record_free(ptr::null_mut());
        }
    }
}
