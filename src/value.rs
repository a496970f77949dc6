//! The dynamic value model shared by both wire formats. Strings are byte
//! sequences: both formats assume UTF-8 content but neither validates it, so
//! the model must not either. Decoded values borrow from the input buffer;
//! use [`Value::into_owned`] to detach them.

use std::borrow::Cow;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq)]
pub enum Value<'a> {
    Null,
    Bool(bool),
    /// An IEEE-754 double. The only numeric type AMF0 has.
    Number(f64),
    /// An AMF3 integer. Values outside `[-2^28, 2^28 - 1]` are transparently
    /// widened to `Number` on encode; AMF0 always encodes this as `Number`.
    Int(i64),
    Str(Cow<'a, [u8]>),
    /// Milliseconds since the Unix epoch. Sub-millisecond precision does not
    /// survive either wire format.
    Date(f64),
    /// A string-keyed map serialized under the object markers. AMF3 has no
    /// untyped object encoding, so only AMF0 can carry this variant.
    Object(HashMap<Cow<'a, [u8]>, Value<'a>>),
    /// A string-keyed map serialized under the array markers.
    EcmaArray(HashMap<Cow<'a, [u8]>, Value<'a>>),
    /// An index-ordered sequence.
    StrictArray(Vec<Value<'a>>),
}

impl<'a> Value<'a> {
    /// Shorthand for the common case of building a string value from UTF-8 text.
    pub fn str(v: &'a str) -> Value<'a> {
        Value::Str(Cow::Borrowed(v.as_bytes()))
    }

    /// Copies all borrowed data so the value can outlive the buffer it was
    /// decoded from.
    pub fn into_owned(self) -> Value<'static> {
        fn own(map: HashMap<Cow<[u8]>, Value>) -> HashMap<Cow<'static, [u8]>, Value<'static>> {
            map.into_iter()
                .map(|(k, v)| (Cow::Owned(k.into_owned()), v.into_owned()))
                .collect()
        }
        match self {
            Value::Null => Value::Null,
            Value::Bool(v) => Value::Bool(v),
            Value::Number(v) => Value::Number(v),
            Value::Int(v) => Value::Int(v),
            Value::Str(v) => Value::Str(Cow::Owned(v.into_owned())),
            Value::Date(v) => Value::Date(v),
            Value::Object(v) => Value::Object(own(v)),
            Value::EcmaArray(v) => Value::EcmaArray(own(v)),
            Value::StrictArray(v) => {
                Value::StrictArray(v.into_iter().map(Value::into_owned).collect())
            }
        }
    }

    pub(crate) fn typename(&self) -> &'static str {
        match *self {
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Number(_) => "number",
            Self::Int(_) => "integer",
            Self::Str(_) => "string",
            Self::Date(_) => "date",
            Self::Object(_) => "object",
            Self::EcmaArray(_) => "ecma array",
            Self::StrictArray(_) => "strict array",
        }
    }
}

/// Map iteration order is unspecified, but equal maps must always serialize to
/// identical bytes, so every encoder emits entries in lexicographic key order.
pub(crate) fn sorted_entries<'m, 'a>(
    map: &'m HashMap<Cow<'a, [u8]>, Value<'a>>,
) -> Vec<(&'m Cow<'a, [u8]>, &'m Value<'a>)> {
    let mut entries: Vec<_> = map.iter().collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));
    entries
}
