//! Wire codec and static/dynamic type duality (components E, G; §3.3, §4.6,
//! §6).

mod frame;
mod segment;
mod varint;
mod wire_type;

pub use frame::{FrameHeader, HEADER_BYTES, HEADER_WORDS, MAGIC, SENTINEL, WORD_SIZE};
pub use segment::DataSegment;
pub use varint::{decode, decode_advance, encode, encoded, MAX_VARINT_BYTES};
pub use wire_type::WireType;
