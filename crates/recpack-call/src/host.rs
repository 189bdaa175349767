use recpack_codec::{decode_bytes, encode, Record};
use recpack_layout::Layout;
use tracing::trace;

use crate::config::CallConfig;
use crate::endpoint::{Callee, Endpoint};
use crate::envelope::Envelope;
use crate::error::{CallError, Result};
use crate::handler::RecordHandler;

/// Caller side of a record call.
///
/// Packs the caller's record with the caller's layout, invokes the callee and
/// unpacks the response against the same layout. By default the callee is an
/// in-process [`Endpoint`].
pub struct Host<C = Endpoint> {
    callee: C,
}

impl Host<Endpoint> {
    /// Create a host with an empty in-process endpoint.
    pub fn new() -> Self {
        Self::with_config(CallConfig::default())
    }

    /// Create a host whose endpoint uses explicit config.
    pub fn with_config(config: CallConfig) -> Self {
        Self::with_callee(Endpoint::with_config(config))
    }

    /// Register a handler on the in-process endpoint.
    pub fn register(&mut self, name: impl Into<String>, handler: impl RecordHandler + 'static) {
        self.callee.register(name, handler);
    }
}

impl Default for Host<Endpoint> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Callee> Host<C> {
    /// Create a host around any callee.
    pub fn with_callee(callee: C) -> Self {
        Self { callee }
    }

    pub fn callee(&self) -> &C {
        &self.callee
    }

    pub fn callee_mut(&mut self) -> &mut C {
        &mut self.callee
    }

    pub fn into_callee(self) -> C {
        self.callee
    }

    /// Call the named handler with `record` and return its response record.
    pub fn call(&self, name: &str, layout: &Layout, record: &Record) -> Result<Record> {
        let request = Envelope::new(layout.spec(), encode(layout, record)?);
        let response = self.call_raw(name, &request)?;

        if response.layout != request.layout {
            return Err(CallError::LayoutChanged {
                expected: request.layout,
                actual: response.layout,
            });
        }

        let record = decode_bytes(layout, response.payload)?;
        trace!(handler = name, fields = record.len(), "received response record");
        Ok(record)
    }

    /// Call the named handler with an already packed envelope.
    pub fn call_raw(&self, name: &str, request: &Envelope) -> Result<Envelope> {
        trace!(
            handler = name,
            layout = %request.layout,
            payload_size = request.payload.len(),
            "invoking callee"
        );
        self.callee.invoke(name, request)
    }
}
