use std::collections::HashMap;

use bytes::{Bytes, BytesMut};
use recpack_codec::{decode_bytes, encode};
use tracing::{debug, warn};

use crate::cache::LayoutCache;
use crate::config::CallConfig;
use crate::envelope::Envelope;
use crate::error::{CallError, Result};
use crate::handler::RecordHandler;

/// The far side of a record call.
///
/// Receives a named request envelope and answers with a response envelope.
pub trait Callee {
    fn invoke(&self, name: &str, request: &Envelope) -> Result<Envelope>;
}

/// Registry of named record handlers.
///
/// Incoming envelopes are decoded with the layout they carry, handed to the
/// named handler, and the handler's record is packed back with that same
/// layout.
pub struct Endpoint {
    handlers: HashMap<String, Box<dyn RecordHandler>>,
    layouts: LayoutCache,
}

impl Endpoint {
    /// Create an endpoint with default config.
    pub fn new() -> Self {
        Self::with_config(CallConfig::default())
    }

    /// Create an endpoint with explicit config.
    pub fn with_config(config: CallConfig) -> Self {
        Self {
            handlers: HashMap::new(),
            layouts: LayoutCache::with_config(&config),
        }
    }

    /// Register `handler` under `name`, replacing any previous handler.
    pub fn register(&mut self, name: impl Into<String>, handler: impl RecordHandler + 'static) {
        let name = name.into();
        if self.handlers.insert(name.clone(), Box::new(handler)).is_some() {
            warn!(handler = %name, "replaced record handler");
        } else {
            debug!(handler = %name, "registered record handler");
        }
    }

    /// Remove the handler registered under `name`.
    pub fn unregister(&mut self, name: &str) -> bool {
        self.handlers.remove(name).is_some()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    /// Names of all registered handlers, in no particular order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.handlers.keys().map(String::as_str)
    }

    /// Parsed layouts seen by this endpoint.
    pub fn layouts(&self) -> &LayoutCache {
        &self.layouts
    }

    /// Run the named handler on the record carried by `request`.
    pub fn dispatch(&self, name: &str, request: &Envelope) -> Result<Envelope> {
        let handler = self
            .handlers
            .get(name)
            .ok_or_else(|| CallError::UnknownHandler(name.to_owned()))?;

        let layout = self.layouts.get_or_parse(&request.layout)?;
        let record = decode_bytes(&layout, request.payload.clone())?;
        debug!(
            handler = name,
            layout = %layout,
            fields = record.len(),
            "dispatching record"
        );

        let response = handler.handle(&layout, record).map_err(|source| {
            warn!(handler = name, error = %source, "record handler failed");
            CallError::Handler {
                name: name.to_owned(),
                source,
            }
        })?;

        let payload = encode(&layout, &response)?;
        Ok(Envelope {
            layout: request.layout.clone(),
            payload,
        })
    }

    /// Dispatch an envelope given in its wire form and return the response
    /// in wire form.
    pub fn dispatch_wire(&self, name: &str, request: Bytes) -> Result<Bytes> {
        let request = Envelope::decode(request)?;
        let response = self.dispatch(name, &request)?;
        let mut dst = BytesMut::with_capacity(response.wire_size());
        response.encode(&mut dst)?;
        Ok(dst.freeze())
    }
}

impl Default for Endpoint {
    fn default() -> Self {
        Self::new()
    }
}

impl Callee for Endpoint {
    fn invoke(&self, name: &str, request: &Envelope) -> Result<Envelope> {
        self.dispatch(name, request)
    }
}
