use crate::args;
use crate::error;
use crate::types::{LayoutHandle, RpLayoutHandle, RpResult};

/// Parse a layout string into a reusable layout handle.
///
/// # Safety
/// `spec` must be a non-null pointer to a valid UTF-8, NUL-terminated C string.
/// `out_layout` must be non-null and valid for writes.
#[no_mangle]
pub unsafe extern "C" fn rp_layout_parse(
    spec: *const std::os::raw::c_char,
    out_layout: *mut RpLayoutHandle,
) -> RpResult {
    crate::ffi_boundary(RpResult::Internal, || {
        error::clear_error_state();

        if out_layout.is_null() {
            return error::set_invalid_argument("out_layout cannot be null");
        }

        let spec = {
            // SAFETY: We validate null and UTF-8 in helper.
            match unsafe { args::required_str_arg(spec, "spec") } {
                Some(v) => v,
                None => return RpResult::InvalidArgument,
            }
        };

        match recpack_layout::describe_layout(spec) {
            Ok(layout) => {
                let handle = LayoutHandle { layout };
                let raw = Box::into_raw(Box::new(handle)) as RpLayoutHandle;
                // SAFETY: Non-null checked above; validity is guaranteed by the caller.
                unsafe { out_layout.write(raw) };
                RpResult::Ok
            }
            Err(err) => error::map_layout_error(&err),
        }
    })
}

/// Free a layout handle.
///
/// # Safety
/// `layout` must be null or a handle previously returned by `rp_layout_parse`.
#[no_mangle]
pub unsafe extern "C" fn rp_layout_free(layout: RpLayoutHandle) {
    crate::ffi_boundary((), || {
        if layout.is_null() {
            return;
        }

        // SAFETY: Pointer originated from `Box::into_raw` in `rp_layout_parse`.
        unsafe {
            drop(Box::from_raw(layout as *mut LayoutHandle));
        }
    });
}

/// Total encoded record size for a layout.
///
/// # Safety
/// `layout` must be a valid layout handle. `out_size` must be valid for writes.
#[no_mangle]
pub unsafe extern "C" fn rp_layout_size(layout: RpLayoutHandle, out_size: *mut usize) -> RpResult {
    crate::ffi_boundary(RpResult::Internal, || {
        error::clear_error_state();

        // SAFETY: Handle validity is guaranteed by the caller.
        let Some(handle) = (unsafe { args::layout_arg(layout) }) else {
            return RpResult::InvalidArgument;
        };
        // SAFETY: Out pointer validity is guaranteed by the caller.
        if unsafe { args::write_out(out_size, handle.layout.size(), "out_size") } {
            RpResult::Ok
        } else {
            RpResult::InvalidArgument
        }
    })
}

/// Number of values a record for this layout holds.
///
/// # Safety
/// `layout` must be a valid layout handle. `out_count` must be valid for writes.
#[no_mangle]
pub unsafe extern "C" fn rp_layout_field_count(
    layout: RpLayoutHandle,
    out_count: *mut usize,
) -> RpResult {
    crate::ffi_boundary(RpResult::Internal, || {
        error::clear_error_state();

        // SAFETY: Handle validity is guaranteed by the caller.
        let Some(handle) = (unsafe { args::layout_arg(layout) }) else {
            return RpResult::InvalidArgument;
        };
        // SAFETY: Out pointer validity is guaranteed by the caller.
        if unsafe { args::write_out(out_count, handle.layout.field_count(), "out_count") } {
            RpResult::Ok
        } else {
            RpResult::InvalidArgument
        }
    })
}
