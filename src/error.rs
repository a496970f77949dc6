use thiserror::Error;

/// A [`DecodeError`] together with the input position at which it occurred.
#[derive(Debug, PartialEq, Error)]
#[error("{inner} at input position {at}")]
pub struct DecoderError {
    #[source]
    inner: DecodeError,
    at: usize,
}

impl DecoderError {
    pub fn into_inner(self) -> DecodeError {
        self.inner
    }

    pub fn position(&self) -> usize {
        self.at
    }
}

#[derive(Debug, PartialEq, Error)]
pub enum DecodeError {
    #[error("unexpected end of buffer while decoding")]
    Eof,
    #[error("unsupported type marker 0x{0:02x}")]
    UnsupportedType(u8),
    #[error("unsupported {0} reference")]
    Reference(&'static str),
    #[error("invalid strict array marker 0x{0:02x}")]
    Marker(u8),
    #[error("nesting exceeds the limit of {0} container levels")]
    Depth(usize),
    #[error("an allocation failed")]
    Allocation,
}

impl DecodeError {
    pub fn at(self, at: usize) -> DecoderError {
        DecoderError { inner: self, at }
    }
}

impl From<std::collections::TryReserveError> for DecodeError {
    fn from(_e: std::collections::TryReserveError) -> DecodeError {
        DecodeError::Allocation
    }
}

#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("cannot encode value of type {0}")]
    UnsupportedType(&'static str),
    #[error("length {0} exceeds the wire format's limits")]
    Length(usize),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
