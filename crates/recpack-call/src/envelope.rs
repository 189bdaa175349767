use bytes::{Buf, BufMut, Bytes, BytesMut};

/// Envelope header: layout length (2, big-endian).
pub const ENVELOPE_HEADER_SIZE: usize = 2;

/// Longest layout string an envelope can carry.
pub const MAX_LAYOUT_LEN: usize = u16::MAX as usize;

/// Errors that can occur while encoding or decoding an envelope.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EnvelopeError {
    /// The buffer ends before the declared layout string does.
    #[error("envelope truncated (need {needed} bytes, have {available})")]
    Truncated { needed: usize, available: usize },

    /// The layout string is not valid UTF-8.
    #[error("envelope layout is not valid UTF-8")]
    LayoutNotUtf8,

    /// The layout string does not fit the 2-byte length header.
    #[error("layout string too long ({0} bytes, max {MAX_LAYOUT_LEN})")]
    LayoutTooLong(usize),
}

/// A packed record together with the layout string it was packed with.
///
/// This is the unit handed across the host/callback boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    /// Layout string both sides parse to agree on the record shape.
    pub layout: String,
    /// The encoded record.
    pub payload: Bytes,
}

impl Envelope {
    pub fn new(layout: impl Into<String>, payload: impl Into<Bytes>) -> Self {
        Self {
            layout: layout.into(),
            payload: payload.into(),
        }
    }

    /// Size of this envelope in its wire form.
    pub fn wire_size(&self) -> usize {
        ENVELOPE_HEADER_SIZE + self.layout.len() + self.payload.len()
    }

    /// Append the wire form of this envelope to `dst`.
    ///
    /// Wire format:
    /// ```text
    /// ┌──────────────┬──────────────────┬──────────────────┐
    /// │ Length (2B)  │ Layout           │ Payload          │
    /// │ big-endian   │ (Length bytes)   │ (rest of buffer) │
    /// └──────────────┴──────────────────┴──────────────────┘
    /// ```
    pub fn encode(&self, dst: &mut BytesMut) -> Result<(), EnvelopeError> {
        let layout_len = u16::try_from(self.layout.len())
            .map_err(|_| EnvelopeError::LayoutTooLong(self.layout.len()))?;
        dst.reserve(self.wire_size());
        dst.put_u16(layout_len);
        dst.put_slice(self.layout.as_bytes());
        dst.put_slice(&self.payload);
        Ok(())
    }

    /// Decode an envelope that occupies all of `src`.
    ///
    /// The payload is a slice of `src`; nothing is copied.
    pub fn decode(mut src: Bytes) -> Result<Self, EnvelopeError> {
        if src.len() < ENVELOPE_HEADER_SIZE {
            return Err(EnvelopeError::Truncated {
                needed: ENVELOPE_HEADER_SIZE,
                available: src.len(),
            });
        }
        let layout_len = usize::from(src.get_u16());
        if src.len() < layout_len {
            return Err(EnvelopeError::Truncated {
                needed: ENVELOPE_HEADER_SIZE + layout_len,
                available: ENVELOPE_HEADER_SIZE + src.len(),
            });
        }

        let layout_bytes = src.split_to(layout_len);
        let layout = std::str::from_utf8(&layout_bytes)
            .map_err(|_| EnvelopeError::LayoutNotUtf8)?
            .to_owned();

        Ok(Self {
            layout,
            payload: src,
        })
    }
}
