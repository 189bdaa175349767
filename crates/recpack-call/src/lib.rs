//! Host-to-callback record exchange over fixed-layout binary records.
//!
//! A [`Host`] packs a record, hands the callee an [`Envelope`] carrying the
//! layout string next to the packed bytes, and unpacks whatever comes back
//! against the same layout. The callee side is an [`Endpoint`]: a registry
//! of named [`RecordHandler`]s that resolves layouts through a
//! [`LayoutCache`] so each distinct layout string is parsed once.

pub mod cache;
pub mod config;
pub mod endpoint;
pub mod envelope;
pub mod error;
pub mod handler;
pub mod host;

pub use cache::LayoutCache;
pub use config::{CallConfig, DEFAULT_MAX_CACHED_LAYOUTS};
pub use endpoint::{Callee, Endpoint};
pub use envelope::{Envelope, EnvelopeError, ENVELOPE_HEADER_SIZE, MAX_LAYOUT_LEN};
pub use error::{report, CallError, Result};
pub use handler::{HandlerError, RecordHandler};
pub use host::Host;
