use std::ffi::c_void;

use recpack_layout::Layout;

#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RpResult {
    Ok = 0,
    InvalidArgument = 1,
    InvalidSpec = 2,
    ArityMismatch = 3,
    FieldMismatch = 4,
    LengthMismatch = 5,
    Internal = 99,
}

pub const RP_KIND_INT16: i32 = 1;
pub const RP_KIND_INT32: i32 = 2;
pub const RP_KIND_INT64: i32 = 3;
pub const RP_KIND_FLOAT32: i32 = 4;
pub const RP_KIND_FLOAT64: i32 = 5;
pub const RP_KIND_BYTES: i32 = 6;

/// One record value as seen from C.
///
/// Integer kinds use `int_value`, float kinds use `float_value` and byte
/// blocks use `data`/`len`. Unused members are ignored on input and zeroed on
/// output.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct RpValue {
    pub kind: i32,
    pub int_value: i64,
    pub float_value: f64,
    pub data: *mut u8,
    pub len: usize,
}

impl Default for RpValue {
    fn default() -> Self {
        Self {
            kind: 0,
            int_value: 0,
            float_value: 0.0,
            data: std::ptr::null_mut(),
            len: 0,
        }
    }
}

/// Encoded record bytes owned by this library.
#[repr(C)]
#[derive(Debug)]
pub struct RpBuffer {
    pub data: *mut u8,
    pub len: usize,
}

impl Default for RpBuffer {
    fn default() -> Self {
        Self {
            data: std::ptr::null_mut(),
            len: 0,
        }
    }
}

/// Decoded record values owned by this library.
#[repr(C)]
#[derive(Debug)]
pub struct RpRecord {
    pub values: *mut RpValue,
    pub count: usize,
}

impl Default for RpRecord {
    fn default() -> Self {
        Self {
            values: std::ptr::null_mut(),
            count: 0,
        }
    }
}

pub type RpLayoutHandle = *mut c_void;

pub(crate) struct LayoutHandle {
    pub(crate) layout: Layout,
}
