use std::ffi::CStr;
use std::os::raw::c_char;

use crate::error;
use crate::types::{LayoutHandle, RpLayoutHandle, RpValue};

/// Convert a required C string argument into UTF-8 `&str`.
///
/// # Safety
/// `value` must be null or point to a valid NUL-terminated C string.
pub(crate) unsafe fn required_str_arg<'a>(value: *const c_char, name: &str) -> Option<&'a str> {
    if value.is_null() {
        let _ = error::set_invalid_argument(format!("{name} cannot be null"));
        return None;
    }

    let as_cstr = {
        // SAFETY: The caller guarantees `value` points to a valid NUL-terminated C string.
        unsafe { CStr::from_ptr(value) }
    };

    match as_cstr.to_str() {
        Ok(v) => Some(v),
        Err(_) => {
            let _ = error::set_invalid_argument(format!("{name} must be valid UTF-8"));
            None
        }
    }
}

/// Convert an optional byte pointer + length into a slice.
///
/// # Safety
/// If `len > 0`, `data` must be non-null and readable for `len` bytes.
pub(crate) unsafe fn bytes_arg<'a>(data: *const u8, len: usize, name: &str) -> Option<&'a [u8]> {
    if len == 0 {
        return Some(&[]);
    }
    if data.is_null() {
        let _ = error::set_invalid_argument(format!("{name} cannot be null when len > 0"));
        return None;
    }

    // SAFETY: Pointer and length are validated above and owned by caller for the call duration.
    Some(unsafe { std::slice::from_raw_parts(data, len) })
}

/// Convert a value array pointer + count into a slice.
///
/// # Safety
/// If `count > 0`, `values` must be non-null and readable for `count` elements.
pub(crate) unsafe fn values_arg<'a>(values: *const RpValue, count: usize) -> Option<&'a [RpValue]> {
    if count == 0 {
        return Some(&[]);
    }
    if values.is_null() {
        let _ = error::set_invalid_argument("values cannot be null when count > 0");
        return None;
    }

    // SAFETY: Pointer and length are validated above and owned by caller for the call duration.
    Some(unsafe { std::slice::from_raw_parts(values, count) })
}

/// Borrow the layout behind a handle.
///
/// # Safety
/// `handle` must be null or a handle returned by `rp_layout_parse` that has
/// not been freed.
pub(crate) unsafe fn layout_arg<'a>(handle: RpLayoutHandle) -> Option<&'a LayoutHandle> {
    if handle.is_null() {
        let _ = error::set_invalid_argument("layout handle cannot be null");
        return None;
    }

    // SAFETY: Pointer validity is guaranteed by the caller.
    Some(unsafe { &*(handle as *const LayoutHandle) })
}

/// Write `value` through a required out pointer.
///
/// # Safety
/// `out` must be null or valid for writes of `T`.
pub(crate) unsafe fn write_out<T>(out: *mut T, value: T, name: &str) -> bool {
    if out.is_null() {
        let _ = error::set_invalid_argument(format!("{name} cannot be null"));
        return false;
    }

    // SAFETY: Non-null checked above; validity is guaranteed by the caller.
    unsafe { out.write(value) };
    true
}
