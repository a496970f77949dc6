//! A pass-through [`Write`] wrapper that keeps a running total of the bytes
//! successfully written, for callers that need exact serialized offsets, such
//! as transports that chunk the encoded stream.

use std::io::{self, Write};

pub struct CountingWriter<W> {
    inner: W,
    count: u64,
}

impl<W: Write> CountingWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner, count: 0 }
    }

    /// The total number of bytes the inner sink has accepted so far. Bytes
    /// written before a failure remain counted; nothing is rolled back.
    pub fn bytes_written(&self) -> u64 {
        self.count
    }

    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> Write for CountingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let written = self.inner.write(buf)?;
        self.count += written as u64;
        Ok(written)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::CountingWriter;
    use crate::error::EncodeError;
    use crate::value::Value;
    use crate::{amf0, amf3};
    use std::io::{self, Write};

    /// Accepts `limit` bytes, then fails every write.
    struct Sink {
        limit: usize,
        accepted: usize,
    }

    impl Write for Sink {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if self.accepted == self.limit {
                return Err(io::Error::new(io::ErrorKind::BrokenPipe, "sink full"));
            }
            let n = buf.len().min(self.limit - self.accepted);
            self.accepted += n;
            Ok(n)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn counts_match_encoder_totals() {
        let value = Value::StrictArray(vec![
            Value::Int(1),
            Value::str("a"),
            Value::Bool(true),
            Value::Number(2.5),
        ]);
        let mut writer = CountingWriter::new(Vec::new());
        let written = amf3::Encoder::encode(&value, &mut writer).unwrap();
        assert_eq!(written as u64, writer.bytes_written());
        assert_eq!(written, writer.get_ref().len());

        let mut writer = CountingWriter::new(Vec::new());
        let written = amf0::Encoder::encode(&value, &mut writer).unwrap();
        assert_eq!(written as u64, writer.bytes_written());
        assert_eq!(written, writer.into_inner().len());
    }

    #[test]
    fn failure_keeps_partial_count() {
        let value = Value::str("some payload that will not fit");
        let mut writer = CountingWriter::new(Sink {
            limit: 4,
            accepted: 0,
        });
        let err = amf3::Encoder::encode(&value, &mut writer).unwrap_err();
        assert!(matches!(err, EncodeError::Io(_)));
        assert_eq!(4, writer.bytes_written());
    }
}
