//! Compact layout strings describing fixed-size binary records.
//!
//! A layout string such as `"i3sf"` names each field of a record in order:
//! a signed 32-bit integer, a 3-byte block and a 32-bit float. Parsing it
//! once yields an immutable [`Layout`] that knows every field's kind, byte
//! offset and the total record size. Layouts carry no values; see
//! `recpack-codec` for packing records against them.
//!
//! Records are big-endian (network order) unless the layout string starts
//! with a byte-order character:
//!
//! | Prefix | Byte order | Alignment |
//! |---|---|---|
//! | none, `!`, `>` | big-endian | none |
//! | `<` | little-endian | none |
//! | `=` | host | none |
//! | `@` | host | native (each numeric field aligned to its size) |

pub mod config;
pub mod error;
pub mod kind;
pub mod layout;
pub mod parse;

pub use config::{LayoutConfig, DEFAULT_MAX_FIELDS, DEFAULT_MAX_RECORD_SIZE};
pub use error::{LayoutError, Result};
pub use kind::{ByteOrder, FieldKind};
pub use layout::{Field, Layout};
pub use parse::{describe_layout, describe_layout_with_config};
