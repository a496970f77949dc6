//! The AMF3 encoder and decoder. AMF3 compresses all lengths, counts and
//! integer values into U29 headers whose lowest bit distinguishes inline
//! data (1) from a back-reference into a reference table (0). This
//! implementation keeps no reference table: it only emits inline values and
//! rejects any reference flag it encounters while decoding.

use crate::error::{DecodeError, DecoderError, EncodeError};
use crate::u29;
use crate::value::{sorted_entries, Value};
use std::borrow::Cow;
use std::collections::HashMap;
use std::io::Write;

const NULL: u8 = 0x01;
const FALSE: u8 = 0x02;
const TRUE: u8 = 0x03;
const INTEGER: u8 = 0x04;
const DOUBLE: u8 = 0x05;
const STRING: u8 = 0x06;
const ARRAY: u8 = 0x09;
const DATE: u8 = 0x0b;

/// The largest value an AMF3 integer can carry, `2^28 - 1`.
pub const INTEGER_MAX: i64 = 268_435_455;
/// The smallest value an AMF3 integer can carry, `-2^28`.
pub const INTEGER_MIN: i64 = -268_435_456;

/// How many nested container levels [`Decoder::decode`] accepts before giving
/// up. Each level costs one stack frame, so unbounded input depth would allow
/// a crafted message to exhaust the call stack.
pub const DEFAULT_DEPTH_LIMIT: usize = 512;

pub struct Encoder<'w, W: Write> {
    writer: &'w mut W,
}

impl<'w, W: Write> Encoder<'w, W> {
    /// Encode a value to the given writer. The resulting `usize` is the amount
    /// of bytes that got written.
    ///
    /// `Value::Object` has no untyped AMF3 encoding and is rejected with
    /// [`EncodeError::UnsupportedType`]; use `Value::EcmaArray` for maps.
    pub fn encode(value: &Value, writer: &'w mut W) -> Result<usize, EncodeError> {
        Self { writer }.encode_value(value)
    }

    fn encode_value(&mut self, value: &Value) -> Result<usize, EncodeError> {
        match value {
            Value::Null => {
                self.writer.write_all(&[NULL])?;
                Ok(1)
            }
            Value::Bool(true) => {
                self.writer.write_all(&[TRUE])?;
                Ok(1)
            }
            Value::Bool(false) => {
                self.writer.write_all(&[FALSE])?;
                Ok(1)
            }
            Value::Int(v) if (INTEGER_MIN..=INTEGER_MAX).contains(v) => {
                self.writer.write_all(&[INTEGER])?;
                // two's complement over 29 bits
                Ok(1 + u29::encode(*v as u32 & u29::MAX, self.writer)?)
            }
            Value::Int(v) => self.double(*v as f64),
            Value::Number(v) => self.double(*v),
            Value::Str(v) => {
                self.writer.write_all(&[STRING])?;
                Ok(1 + self.string_body(v)?)
            }
            Value::Date(millis) => {
                self.writer.write_all(&[DATE])?;
                let c = u29::encode(1, self.writer)?; // inline flag
                self.writer.write_all(&millis.to_be_bytes())?;
                Ok(1 + c + 8)
            }
            Value::StrictArray(items) => {
                if items.len() > INTEGER_MAX as usize {
                    return Err(EncodeError::Length(items.len()));
                }
                self.writer.write_all(&[ARRAY])?;
                let mut c = 1 + u29::encode((items.len() as u32) << 1 | 1, self.writer)?;
                // empty class name, marking the array as dense
                self.writer.write_all(&[0x01])?;
                c += 1;
                for item in items.iter() {
                    c += self.encode_value(item)?;
                }
                Ok(c)
            }
            Value::EcmaArray(map) => {
                self.writer.write_all(&[ARRAY])?;
                let mut c = 1 + u29::encode(1, self.writer)?; // zero dense elements, inline
                for (key, val) in sorted_entries(map) {
                    c += self.string_body(key)?;
                    c += self.encode_value(val)?;
                }
                // an empty key terminates the associative section
                self.writer.write_all(&[0x01])?;
                Ok(c + 1)
            }
            Value::Object(_) => Err(EncodeError::UnsupportedType(value.typename())),
        }
    }

    fn double(&mut self, v: f64) -> Result<usize, EncodeError> {
        self.writer.write_all(&[DOUBLE])?;
        self.writer.write_all(&v.to_be_bytes())?;
        Ok(9)
    }

    /// An inline-flagged, U29-length-prefixed string without a type marker.
    /// Payloads beyond the 29-bit window lose their tail; the header and the
    /// written bytes stay consistent.
    fn string_body(&mut self, v: &[u8]) -> Result<usize, EncodeError> {
        let v = &v[..v.len().min(INTEGER_MAX as usize)];
        let c = u29::encode((v.len() as u32) << 1 | 1, self.writer)?;
        self.writer.write_all(v)?;
        Ok(c + v.len())
    }
}

pub struct Decoder<'a> {
    buf: &'a [u8],
    pos: usize,
    limit: usize,
    depth: usize,
}

impl<'a> Decoder<'a> {
    /// Decode a single value from the given buffer, which may contain further
    /// bytes beyond it. Strings and keys are borrowed from the buffer instead
    /// of copied. Returns the value and the number of consumed bytes.
    pub fn decode<B: ?Sized + AsRef<[u8]>>(buf: &'a B) -> Result<(Value<'a>, usize), DecoderError> {
        Self::decode_with_limit(buf, DEFAULT_DEPTH_LIMIT)
    }

    /// Like [`Decoder::decode`] with a caller-chosen bound on container nesting.
    pub fn decode_with_limit<B: ?Sized + AsRef<[u8]>>(
        buf: &'a B,
        limit: usize,
    ) -> Result<(Value<'a>, usize), DecoderError> {
        let mut decoder = Self {
            buf: buf.as_ref(),
            pos: 0,
            limit,
            depth: limit,
        };
        let value = decoder.decode_value().map_err(|e| e.at(decoder.pos))?;
        Ok((value, decoder.pos))
    }

    fn decode_value(&mut self) -> Result<Value<'a>, DecodeError> {
        match self.take_byte()? {
            NULL => Ok(Value::Null),
            FALSE => Ok(Value::Bool(false)),
            TRUE => Ok(Value::Bool(true)),
            INTEGER => {
                let n = self.decode_u29()? as i64;
                // sign extension from bit 28
                Ok(Value::Int(if n & 0x1000_0000 != 0 {
                    n - 0x2000_0000
                } else {
                    n
                }))
            }
            DOUBLE => Ok(Value::Number(self.decode_f64()?)),
            STRING => Ok(Value::Str(Cow::Borrowed(self.decode_string()?))),
            DATE => match self.take_byte()? {
                0x01 => Ok(Value::Date(self.decode_f64()?)),
                _ => Err(DecodeError::Reference("date")),
            },
            ARRAY => self.decode_array(),
            tag => Err(DecodeError::UnsupportedType(tag)),
        }
    }

    fn decode_array(&mut self) -> Result<Value<'a>, DecodeError> {
        match self.depth.checked_sub(1) {
            Some(depth) => self.depth = depth,
            None => return Err(DecodeError::Depth(self.limit)),
        }
        let value = self.decode_array_inner()?;
        self.depth += 1;
        Ok(value)
    }

    fn decode_array_inner(&mut self) -> Result<Value<'a>, DecodeError> {
        let header = self.decode_u29()?;
        if header == 1 {
            // zero dense elements: an associative array follows
            let mut entries = HashMap::new();
            loop {
                let key = self.decode_string()?;
                if key.is_empty() {
                    return Ok(Value::EcmaArray(entries));
                }
                let val = self.decode_value()?;
                entries.insert(Cow::Borrowed(key), val);
            }
        } else if header & 1 == 0 {
            Err(DecodeError::Reference("array"))
        } else {
            let count = (header >> 1) as usize;
            match self.take_byte()? {
                0x01 => {
                    let mut elements = Vec::new();
                    // the header can claim more elements than the remaining
                    // buffer could possibly hold, so cap the reservation
                    elements.try_reserve(count.min(self.buf.len() - self.pos))?;
                    for _ in 0..count {
                        elements.push(self.decode_value()?);
                    }
                    Ok(Value::StrictArray(elements))
                }
                b => Err(DecodeError::Marker(b)),
            }
        }
    }

    fn decode_string(&mut self) -> Result<&'a [u8], DecodeError> {
        let header = self.decode_u29()?;
        if header & 1 == 0 {
            return Err(DecodeError::Reference("string"));
        }
        self.decode_slice((header >> 1) as usize)
    }

    fn decode_u29(&mut self) -> Result<u32, DecodeError> {
        let (n, c) = u29::decode(&self.buf[self.pos..])?;
        self.pos += c;
        Ok(n)
    }

    fn decode_f64(&mut self) -> Result<f64, DecodeError> {
        Ok(f64::from_be_bytes(self.decode_slice(8)?.try_into().unwrap()))
    }

    fn take_byte(&mut self) -> Result<u8, DecodeError> {
        match self.buf.get(self.pos) {
            Some(&b) => {
                self.pos += 1;
                Ok(b)
            }
            None => Err(DecodeError::Eof),
        }
    }

    fn decode_slice(&mut self, len: usize) -> Result<&'a [u8], DecodeError> {
        if self.buf[self.pos..].len() < len {
            Err(DecodeError::Eof)
        } else {
            self.pos += len;
            Ok(&self.buf[self.pos - len..self.pos])
        }
    }
}
