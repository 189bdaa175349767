use std::error::Error as _;

use tracing::error;

use crate::envelope::EnvelopeError;

/// Errors that can occur while calling a record handler.
#[derive(Debug, thiserror::Error)]
pub enum CallError {
    /// No handler is registered under the requested name.
    #[error("no handler registered as {0:?}")]
    UnknownHandler(String),

    /// The envelope's layout string could not be parsed.
    #[error("layout error: {0}")]
    Layout(#[from] recpack_layout::LayoutError),

    /// A record did not fit its layout.
    #[error("codec error: {0}")]
    Codec(#[from] recpack_codec::CodecError),

    /// The envelope bytes are malformed.
    #[error("envelope error: {0}")]
    Envelope(#[from] EnvelopeError),

    /// The handler itself reported a failure.
    #[error("handler {name:?} failed: {source}")]
    Handler {
        name: String,
        #[source]
        source: crate::handler::HandlerError,
    },

    /// The response was packed with a different layout than the request.
    #[error("response layout {actual:?} does not match request layout {expected:?}")]
    LayoutChanged { expected: String, actual: String },
}

pub type Result<T> = std::result::Result<T, CallError>;

/// Log a call error and every error in its source chain.
///
/// Each link of the chain is logged on its own line, innermost last.
pub fn report(err: &CallError) {
    error!(error = %err, "record call failed");
    let mut source = err.source();
    let mut depth = 1usize;
    while let Some(cause) = source {
        error!(depth, cause = %cause, "caused by");
        source = cause.source();
        depth += 1;
    }
}
