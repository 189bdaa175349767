use recpack_layout::LayoutConfig;

/// Default number of distinct layouts an endpoint keeps parsed.
pub const DEFAULT_MAX_CACHED_LAYOUTS: usize = 64;

/// Controls layout parsing and caching on the callee side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallConfig {
    /// Limits applied to layout strings received in envelopes.
    pub layout: LayoutConfig,
    /// Maximum number of parsed layouts kept in the cache. Layouts past the
    /// limit are parsed per call and not retained.
    pub max_cached_layouts: usize,
}

impl Default for CallConfig {
    fn default() -> Self {
        Self {
            layout: LayoutConfig::default(),
            max_cached_layouts: DEFAULT_MAX_CACHED_LAYOUTS,
        }
    }
}
