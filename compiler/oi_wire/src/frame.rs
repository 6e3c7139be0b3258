//! Wire framing (§6, version 0): little-endian, word = 8 bytes.
//!
//! ```text
//! word[0] = MAGIC
//! word[1] = COOKIE
//! word[2] = SIZE
//! word[3] = TIME_NS
//! payload = VarInts
//! trailer = VarInt(123456789), VarInt(123456789)
//! ```

use oi_errors::{Error, Result};

pub const WORD_SIZE: usize = 8;
pub const HEADER_WORDS: usize = 4;
pub const HEADER_BYTES: usize = HEADER_WORDS * WORD_SIZE;

/// Fixed 64-bit constant identifying a valid frame. Arbitrary but stable for
/// the lifetime of a single generator invocation (no cross-invocation
/// stability is guaranteed, per §1's non-goals).
pub const MAGIC: u64 = 0x4F49_5F46_5241_4D45; // "OI_FRAME" in ASCII hex nibbles

pub const SENTINEL: u64 = 123_456_789;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    pub magic: u64,
    pub cookie: u64,
    pub size: u64,
    pub time_ns: u64,
}

impl FrameHeader {
    pub fn new(cookie: u64) -> Self {
        FrameHeader {
            magic: MAGIC,
            cookie,
            size: 0,
            time_ns: 0,
        }
    }

    pub fn encode(&self) -> [u8; HEADER_BYTES] {
        let mut out = [0u8; HEADER_BYTES];
        out[0..8].copy_from_slice(&self.magic.to_le_bytes());
        out[8..16].copy_from_slice(&self.cookie.to_le_bytes());
        out[16..24].copy_from_slice(&self.size.to_le_bytes());
        out[24..32].copy_from_slice(&self.time_ns.to_le_bytes());
        out
    }

    pub fn decode(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < HEADER_BYTES {
            return Err(Error::UnexpectedEndOfSegment);
        }
        let word = |i: usize| -> u64 {
            let mut arr = [0u8; 8];
            arr.copy_from_slice(&bytes[i * WORD_SIZE..(i + 1) * WORD_SIZE]);
            u64::from_le_bytes(arr)
        };
        Ok(FrameHeader {
            magic: word(0),
            cookie: word(1),
            size: word(2),
            time_ns: word(3),
        })
    }

    /// Validate `MAGIC` and the caller's expected `COOKIE` (§7 `BadFrame`).
    pub fn validate(&self, expected_cookie: u64) -> Result<()> {
        if self.magic != MAGIC {
            return Err(Error::BadFrame(format!(
                "magic mismatch: expected {MAGIC:#x}, got {:#x}",
                self.magic
            )));
        }
        if self.cookie != expected_cookie {
            return Err(Error::BadFrame(format!(
                "cookie mismatch: expected {expected_cookie:#x}, got {:#x}",
                self.cookie
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, reason = "tests may panic")]
    use super::*;

    #[test]
    fn round_trips_header() {
        let mut header = FrameHeader::new(0xCAFE);
        header.size = 128;
        header.time_ns = 42;
        let bytes = header.encode();
        let decoded = FrameHeader::decode(&bytes).unwrap();
        assert_eq!(header, decoded);
        decoded.validate(0xCAFE).unwrap();
    }

    #[test]
    fn cookie_mismatch_is_bad_frame() {
        let header = FrameHeader::new(1);
        assert!(matches!(header.validate(2), Err(Error::BadFrame(_))));
    }
}
