//! recpack-ffi: C-ABI exports for parsing layouts and packing records.
//!
//! Every entry point returns an [`RpResult`] code and records a readable
//! message retrievable with [`rp_last_error`]. Memory handed out by this
//! library (layout handles, encoded buffers, decoded records) must be
//! released with the matching `*_free` function.

mod args;
mod codec;
mod error;
mod layout;
mod types;

use std::panic::AssertUnwindSafe;

pub use codec::{rp_buffer_free, rp_decode, rp_encode, rp_record_free};
pub use layout::{rp_layout_field_count, rp_layout_free, rp_layout_parse, rp_layout_size};
pub use types::{
    RpBuffer, RpLayoutHandle, RpRecord, RpResult, RpValue, RP_KIND_BYTES, RP_KIND_FLOAT32,
    RP_KIND_FLOAT64, RP_KIND_INT16, RP_KIND_INT32, RP_KIND_INT64,
};

fn ffi_boundary<T>(on_panic: T, f: impl FnOnce() -> T) -> T {
    match std::panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(value) => value,
        Err(_) => {
            error::set_panic_error();
            on_panic
        }
    }
}

/// Message describing the last failure on the calling thread.
///
/// The pointer stays valid until the next call into this library on the
/// same thread. Returns an empty string when the last call succeeded.
#[no_mangle]
pub extern "C" fn rp_last_error() -> *const std::os::raw::c_char {
    ffi_boundary(std::ptr::null(), error::last_error_ptr)
}

/// Reset the calling thread's last error message.
#[no_mangle]
pub extern "C" fn rp_clear_error() {
    ffi_boundary((), error::clear_error_state);
}

#[cfg(test)]
mod tests {
    use std::ffi::CStr;

    use super::*;

    #[test]
    fn last_error_starts_empty() {
        rp_clear_error();
        let ptr = rp_last_error();
        assert!(!ptr.is_null());

        // SAFETY: rp_last_error returns a pointer to a thread-local CString.
        let text = unsafe { CStr::from_ptr(ptr).to_str().unwrap() };
        assert!(text.is_empty());
    }

    #[test]
    fn panics_do_not_cross_boundary() {
        let result = ffi_boundary(RpResult::Internal, || panic!("boom"));
        assert_eq!(result, RpResult::Internal);

        // SAFETY: rp_last_error returns a pointer to a thread-local CString.
        let text = unsafe { CStr::from_ptr(rp_last_error()).to_str().unwrap() };
        assert_eq!(text, "panic across FFI boundary");
    }
}
