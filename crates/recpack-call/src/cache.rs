use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use recpack_layout::{describe_layout_with_config, Layout, LayoutConfig};
use tracing::{debug, warn};

use crate::config::CallConfig;
use crate::error::Result;

/// Layout strings mapped to their parsed layouts.
///
/// Each distinct string is parsed once and shared afterwards.
#[derive(Debug)]
pub struct LayoutCache {
    layouts: Mutex<HashMap<String, Arc<Layout>>>,
    layout_config: LayoutConfig,
    max_entries: usize,
}

impl LayoutCache {
    pub fn new() -> Self {
        Self::with_config(&CallConfig::default())
    }

    pub fn with_config(config: &CallConfig) -> Self {
        Self {
            layouts: Mutex::new(HashMap::new()),
            layout_config: config.layout,
            max_entries: config.max_cached_layouts,
        }
    }

    /// Return the parsed layout for `spec`, parsing it on first use.
    pub fn get_or_parse(&self, spec: &str) -> Result<Arc<Layout>> {
        let mut layouts = self.layouts.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(layout) = layouts.get(spec) {
            return Ok(Arc::clone(layout));
        }

        let layout = Arc::new(describe_layout_with_config(spec, &self.layout_config)?);
        if layouts.len() < self.max_entries {
            layouts.insert(spec.to_owned(), Arc::clone(&layout));
            debug!(spec, cached = layouts.len(), "cached record layout");
        } else {
            warn!(
                spec,
                max = self.max_entries,
                "layout cache full, layout not retained"
            );
        }
        Ok(layout)
    }

    /// Insert an already parsed layout under its own layout string.
    ///
    /// Ignored once the cache is full.
    pub fn insert(&self, layout: Arc<Layout>) {
        let mut layouts = self.layouts.lock().unwrap_or_else(PoisonError::into_inner);
        if layouts.len() < self.max_entries || layouts.contains_key(layout.spec()) {
            layouts.insert(layout.spec().to_owned(), layout);
        }
    }

    pub fn len(&self) -> usize {
        self.layouts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.layouts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl Default for LayoutCache {
    fn default() -> Self {
        Self::new()
    }
}
