/// Default upper bound on the encoded size of one record: 1 MiB.
pub const DEFAULT_MAX_RECORD_SIZE: usize = 1024 * 1024;

/// Default upper bound on the number of value-carrying fields.
pub const DEFAULT_MAX_FIELDS: usize = 4096;

/// Limits applied while parsing layout strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutConfig {
    /// Maximum total record size in bytes, padding included.
    pub max_record_size: usize,
    /// Maximum number of fields after repeat counts are expanded.
    pub max_fields: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            max_record_size: DEFAULT_MAX_RECORD_SIZE,
            max_fields: DEFAULT_MAX_FIELDS,
        }
    }
}
