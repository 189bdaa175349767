//! Fixed-layout binary records for host and embedded callback interop.
//!
//! recpack packs ordered tuples of typed values into exact-length byte
//! sequences described by compact layout strings (`"i3sf"`, `"@if8sdh2i"`),
//! and unpacks them again without loss.
//!
//! # Crate Structure
//!
//! - [`layout`]: Layout strings and the parsed [`layout::Layout`]
//! - [`codec`]: Values, records, encode and decode
//! - [`call`]: Host-to-callback record exchange (behind `call` feature)
//! - [`logging`]: `tracing` subscriber setup (behind `logging` feature)
//!
//! ```
//! use recpack::codec::{decode, encode, record};
//! use recpack::layout::describe_layout;
//!
//! let layout = describe_layout("ii4si").unwrap();
//! let rec = record![1i32, 2i32, b"bcde", 3i32];
//! let bytes = encode(&layout, &rec).unwrap();
//! assert_eq!(bytes.len(), 16);
//! assert_eq!(decode(&layout, &bytes).unwrap(), rec);
//! ```

/// Re-export layout types.
pub mod layout {
    pub use recpack_layout::*;
}

/// Re-export codec types.
pub mod codec {
    pub use recpack_codec::*;
}

/// Re-export call types (requires `call` feature).
#[cfg(feature = "call")]
pub mod call {
    pub use recpack_call::*;
}

#[cfg(feature = "logging")]
pub mod logging;
