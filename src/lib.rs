//! An implementation of the AMF0 and AMF3 wire formats, the value encodings
//! used by RTMP-style remoting protocols. All encoding functions take a value
//! and a writer and return the amount of written bytes. All decoding
//! functions take a buffer and return the value and the number of consumed
//! bytes, so sequential values can be decoded out of one buffer.
//!
//! # A note on strings
//!
//! Both formats assume string payloads to be UTF-8 but neither carries enough
//! information to enforce it, so [`Value::Str`] holds plain bytes and decoding
//! never validates them. Whatever a peer sent is what you get.
//!
//! # A note on maps
//!
//! [`Value::Object`] and [`Value::EcmaArray`] use `HashMap` and therefore have
//! no in-memory ordering. The encoders sort keys lexicographically before
//! emission, so two equal maps always serialize to identical bytes no matter
//! how they were built.
//!
//! # A note on references
//!
//! AMF3 headers reserve their lowest bit to mark a value as either inline or
//! a back-reference into a table of previously seen strings and objects. This
//! crate maintains no such table: encoders only ever emit inline values and
//! the decoder rejects any reference flag with [`DecodeError::Reference`].
//!
//! # Examples
//!
//! ```
//! use amf::{amf3, Value};
//!
//! let value = Value::StrictArray(vec![Value::Int(1), Value::str("a"), Value::Bool(true)]);
//! let mut buf = Vec::new();
//! let written = amf3::Encoder::encode(&value, &mut buf).unwrap();
//! assert_eq!(9, written);
//! assert_eq!(buf, [
//!     0x09, // array
//!     0x07, // three elements, inline
//!     0x01, // dense marker
//!     0x04, 0x01, // integer 1
//!     0x06, 0x03, 0x61, // string "a"
//!     0x03, // true
//! ]);
//! let (decoded, consumed) = amf3::Decoder::decode(&buf).unwrap();
//! assert_eq!(value, decoded);
//! assert_eq!(9, consumed);
//! ```

pub mod amf0;
pub mod amf3;
pub mod u29;

mod error;
mod value;
mod writer;

pub use error::{DecodeError, DecoderError, EncodeError};
pub use value::Value;
pub use writer::CountingWriter;

use std::io::Write;

/// The two wire formats a value can be encoded in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Version {
    Amf0,
    Amf3,
}

/// Encode a value in the given format. The resulting `usize` is the amount of
/// bytes that got written.
pub fn encode<W: Write>(version: Version, value: &Value, writer: &mut W) -> Result<usize, EncodeError> {
    match version {
        Version::Amf0 => amf0::Encoder::encode(value, writer),
        Version::Amf3 => amf3::Encoder::encode(value, writer),
    }
}
