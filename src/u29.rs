//! Variable-length encoding of 29-bit unsigned integers, used by every AMF3 header.
//! The first three bytes carry seven payload bits each and use the high bit as a
//! continuation flag; a fourth byte, when present, carries all eight of its bits.

use crate::error::{DecodeError, EncodeError};
use std::io::Write;

/// Values are masked to this range before encoding.
pub const MAX: u32 = 0x1fff_ffff;

/// Encodes `v & MAX` into one to four bytes. Returns the number of written bytes.
pub fn encode<W: Write>(v: u32, w: &mut W) -> Result<usize, EncodeError> {
    let v = v & MAX;
    if v < 1 << 7 {
        w.write_all(&[v as u8])?;
        Ok(1)
    } else if v < 1 << 14 {
        w.write_all(&[(v >> 7) as u8 | 0x80, (v & 0x7f) as u8])?;
        Ok(2)
    } else if v < 1 << 21 {
        w.write_all(&[
            (v >> 14) as u8 | 0x80,
            ((v >> 7) & 0x7f) as u8 | 0x80,
            (v & 0x7f) as u8,
        ])?;
        Ok(3)
    } else {
        w.write_all(&[
            (v >> 22) as u8 | 0x80,
            ((v >> 15) & 0x7f) as u8 | 0x80,
            ((v >> 8) & 0x7f) as u8 | 0x80,
            v as u8,
        ])?;
        Ok(4)
    }
}

/// Returns the decoded integer and the number of consumed bytes.
pub fn decode(buf: &[u8]) -> Result<(u32, usize), DecodeError> {
    let mut n: u32 = 0;
    for (i, &b) in buf.iter().enumerate().take(4) {
        if i == 3 {
            // the fourth byte is taken literally, continuation flag and all
            return Ok((n << 8 | b as u32, 4));
        }
        n = n << 7 | (b & 0x7f) as u32;
        if b & 0x80 == 0 {
            return Ok((n, i + 1));
        }
    }
    Err(DecodeError::Eof)
}
