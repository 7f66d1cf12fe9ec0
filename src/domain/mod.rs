//! Domain models for tagconf
//!
//! Typed values, their text encoding and the entry record. No I/O here.

mod entry;
mod value;

pub use entry::{is_valid_id, Entry};
pub use value::{decode_hex, ConfigValue, DecodeError, Point, Rect, TypeTag};
