//! The AMF0 encoder. Every value is written as a single-byte type marker
//! followed by a fixed-layout, big-endian payload. AMF0 is write-only in this
//! crate; there is no decoder for it.

use crate::error::EncodeError;
use crate::value::{sorted_entries, Value};
use std::borrow::Cow;
use std::collections::HashMap;
use std::io::Write;

const NUMBER: u8 = 0x00;
const BOOLEAN: u8 = 0x01;
const STRING: u8 = 0x02;
const OBJECT: u8 = 0x03;
const NULL: u8 = 0x05;
const ECMA_ARRAY: u8 = 0x08;
const OBJECT_END: u8 = 0x09;
const STRICT_ARRAY: u8 = 0x0a;
const DATE: u8 = 0x0b;
const LONG_STRING: u8 = 0x0c;

pub struct Encoder<'w, W: Write> {
    writer: &'w mut W,
}

impl<'w, W: Write> Encoder<'w, W> {
    /// Encode a value to the given writer. The resulting `usize` is the amount
    /// of bytes that got written.
    pub fn encode(value: &Value, writer: &'w mut W) -> Result<usize, EncodeError> {
        Self { writer }.encode_value(value)
    }

    fn encode_value(&mut self, value: &Value) -> Result<usize, EncodeError> {
        match value {
            Value::Number(v) => self.number(*v),
            Value::Int(v) => self.number(*v as f64),
            Value::Bool(v) => {
                self.writer.write_all(&[BOOLEAN, *v as u8])?;
                Ok(2)
            }
            Value::Str(v) => self.string(v),
            Value::Null => {
                self.writer.write_all(&[NULL])?;
                Ok(1)
            }
            Value::Object(map) => {
                self.writer.write_all(&[OBJECT])?;
                Ok(1 + self.entries(map)?)
            }
            Value::EcmaArray(map) => {
                // the count is informational only, readers delimit on the
                // empty-key terminator
                let count = u32::try_from(map.len()).map_err(|_| EncodeError::Length(map.len()))?;
                self.writer.write_all(&[ECMA_ARRAY])?;
                self.writer.write_all(&count.to_be_bytes())?;
                Ok(5 + self.entries(map)?)
            }
            Value::Date(millis) => {
                self.writer.write_all(&[DATE])?;
                self.writer.write_all(&millis.to_be_bytes())?;
                // reserved timezone offset, always zero
                self.writer.write_all(&[0x00, 0x00])?;
                Ok(11)
            }
            Value::StrictArray(items) => {
                let count =
                    u32::try_from(items.len()).map_err(|_| EncodeError::Length(items.len()))?;
                self.writer.write_all(&[STRICT_ARRAY])?;
                self.writer.write_all(&count.to_be_bytes())?;
                let mut c = 5;
                for item in items.iter() {
                    c += self.encode_value(item)?;
                }
                Ok(c)
            }
        }
    }

    fn number(&mut self, v: f64) -> Result<usize, EncodeError> {
        self.writer.write_all(&[NUMBER])?;
        self.writer.write_all(&v.to_be_bytes())?;
        Ok(9)
    }

    fn string(&mut self, v: &[u8]) -> Result<usize, EncodeError> {
        if v.len() < 0xffff {
            self.writer.write_all(&[STRING])?;
            Ok(1 + self.utf8(v)?)
        } else {
            let len = u32::try_from(v.len()).map_err(|_| EncodeError::Length(v.len()))?;
            self.writer.write_all(&[LONG_STRING])?;
            self.writer.write_all(&len.to_be_bytes())?;
            self.writer.write_all(v)?;
            Ok(5 + v.len())
        }
    }

    /// A length-prefixed string without a type marker, as used for map keys.
    fn utf8(&mut self, v: &[u8]) -> Result<usize, EncodeError> {
        let len = u16::try_from(v.len()).map_err(|_| EncodeError::Length(v.len()))?;
        self.writer.write_all(&len.to_be_bytes())?;
        self.writer.write_all(v)?;
        Ok(2 + v.len())
    }

    fn entries(&mut self, map: &HashMap<Cow<[u8]>, Value>) -> Result<usize, EncodeError> {
        let mut c = 0;
        for (key, val) in sorted_entries(map) {
            c += self.utf8(key)?;
            c += self.encode_value(val)?;
        }
        self.writer.write_all(&[0x00, 0x00, OBJECT_END])?;
        Ok(c + 3)
    }
}

#[cfg(test)]
mod tests {
    use super::Encoder;
    use crate::value::Value;
    use std::borrow::Cow;
    use std::collections::HashMap;

    #[test]
    fn number() {
        assert_bytes(
            Value::Number(1.0),
            &[0x00, 0x3f, 0xf0, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00],
        );
    }

    #[test]
    fn integer_widens_to_number() {
        let mut expected = Vec::new();
        Encoder::encode(&Value::Number(3.0), &mut expected).unwrap();
        assert_bytes(Value::Int(3), &expected);
    }

    #[test]
    fn boolean() {
        assert_bytes(Value::Bool(true), &[0x01, 0x01]);
        assert_bytes(Value::Bool(false), &[0x01, 0x00]);
    }

    #[test]
    fn null() {
        assert_bytes(Value::Null, &[0x05]);
    }

    #[test]
    fn string() {
        assert_bytes(Value::str("foo"), &[0x02, 0x00, 0x03, 0x66, 0x6f, 0x6f]);
    }

    #[test]
    fn string_length_boundary() {
        // lengths below 0xffff use the two-byte form, 0xffff and up the four-byte one
        let short = vec![b'x'; 0xfffe];
        let mut buf = Vec::new();
        Encoder::encode(&Value::Str(Cow::Borrowed(&short)), &mut buf).unwrap();
        assert_eq!(&buf[..3], &[0x02, 0xff, 0xfe]);
        assert_eq!(3 + 0xfffe, buf.len());

        let long = vec![b'x'; 0xffff];
        buf.clear();
        Encoder::encode(&Value::Str(Cow::Borrowed(&long)), &mut buf).unwrap();
        assert_eq!(&buf[..5], &[0x0c, 0x00, 0x00, 0xff, 0xff]);
        assert_eq!(5 + 0xffff, buf.len());
    }

    #[test]
    fn date_carries_reserved_bytes() {
        assert_bytes(
            Value::Date(1.0),
            &[0x0b, 0x3f, 0xf0, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00],
        );
    }

    #[test]
    fn object_sorts_keys() {
        let mut map = HashMap::new();
        map.insert(Cow::Borrowed(b"b".as_slice()), Value::Bool(true));
        map.insert(Cow::Borrowed(b"a".as_slice()), Value::Null);
        assert_bytes(
            Value::Object(map),
            &[
                0x03, // object
                0x00, 0x01, 0x61, 0x05, // "a": null
                0x00, 0x01, 0x62, 0x01, 0x01, // "b": true
                0x00, 0x00, 0x09, // terminator
            ],
        );
    }

    #[test]
    fn ecma_array() {
        let mut map = HashMap::new();
        map.insert(Cow::Borrowed(b"a".as_slice()), Value::Null);
        assert_bytes(
            Value::EcmaArray(map),
            &[
                0x08, 0x00, 0x00, 0x00, 0x01, // marker and count
                0x00, 0x01, 0x61, 0x05, // "a": null
                0x00, 0x00, 0x09, // terminator
            ],
        );
    }

    #[test]
    fn strict_array() {
        assert_bytes(
            Value::StrictArray(vec![Value::Bool(false), Value::Null]),
            &[0x0a, 0x00, 0x00, 0x00, 0x02, 0x01, 0x00, 0x05],
        );
    }

    #[test]
    fn deterministic_across_insertion_orders() {
        let pairs: [(&[u8], Value); 3] = [
            (b"gamma", Value::Int(3)),
            (b"alpha", Value::Int(1)),
            (b"beta", Value::Int(2)),
        ];
        let forward: HashMap<_, _> = pairs
            .iter()
            .map(|(k, v)| (Cow::Borrowed(*k), v.clone()))
            .collect();
        let reverse: HashMap<_, _> = pairs
            .iter()
            .rev()
            .map(|(k, v)| (Cow::Borrowed(*k), v.clone()))
            .collect();
        let mut a = Vec::new();
        let mut b = Vec::new();
        Encoder::encode(&Value::Object(forward), &mut a).unwrap();
        Encoder::encode(&Value::Object(reverse), &mut b).unwrap();
        assert_eq!(a, b);
    }

    fn assert_bytes(value: Value, expected: &[u8]) {
        let mut buf = Vec::new();
        let written = Encoder::encode(&value, &mut buf).unwrap();
        assert_eq!(written, buf.len());
        assert_eq!(expected, buf);
    }
}
