//! Raw string to typed value decoding.
//!
//! Decoding never fails outright: an unparsable value becomes the zero value
//! of its type and the error travels alongside it so the caller can report a
//! diagnostic and carry on.

use crate::domain::errors::CoercionError;
use crate::domain::fields::{DecodeKind, TypedValue};
use crate::domain::model::{
    BoolValue, Float64Value, Int64Value, IntValue, StringValue, TimeValue, Timestamp, Value,
};
use crate::utils::time::{TimestampGrammar, TimestampParser};

/// The engine's negative boolean token
pub const NEGATIVE_TOKEN: &str = "No";

/// Result of decoding one raw value
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded<T> {
    pub value: T,
    pub error: Option<CoercionError>,
}

impl<T> Decoded<T> {
    fn ok(value: T) -> Self {
        Self { value, error: None }
    }

    fn failed(value: T, error: CoercionError) -> Self {
        Self {
            value,
            error: Some(error),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Decoded<U> {
        Decoded {
            value: f(self.value),
            error: self.error,
        }
    }
}

fn decode_number<T>(raw: &str, invalid: fn(String) -> CoercionError) -> Decoded<Value<T>>
where
    T: std::str::FromStr + Default,
    T::Err: std::fmt::Display,
{
    if raw.is_empty() {
        return Decoded::ok(Value::default());
    }

    match raw.parse::<T>() {
        Ok(val) => Decoded::ok(Value::new(val)),
        Err(e) => Decoded::failed(Value::default(), invalid(format!("{:?}: {}", raw, e))),
    }
}

/// Decode a 64-bit base-10 integer; empty is zero
pub fn decode_int(raw: &str) -> Decoded<IntValue> {
    decode_number(raw, CoercionError::InvalidInt)
}

/// Decode a size or count; empty is zero
pub fn decode_int64(raw: &str) -> Decoded<Int64Value> {
    decode_number(raw, CoercionError::InvalidInt)
}

/// Decode a floating point number; empty is zero
pub fn decode_float64(raw: &str) -> Decoded<Float64Value> {
    decode_number(raw, CoercionError::InvalidFloat)
}

/// Strings pass through unchanged, empty included
pub fn decode_string(raw: &str) -> Decoded<StringValue> {
    Decoded::ok(Value::new(raw.to_string()))
}

/// Anything but the exact negative token is `true`, including the empty string.
pub fn decode_bool(raw: &str) -> Decoded<BoolValue> {
    Decoded::ok(Value::new(raw != NEGATIVE_TOKEN))
}

/// Decode a timestamp with the given grammar; empty is the zero timestamp
pub fn decode_timestamp(raw: &str, grammar: TimestampGrammar) -> Decoded<TimeValue> {
    if raw.is_empty() {
        return Decoded::ok(Value::default());
    }

    match TimestampParser::new().parse(raw, grammar) {
        Ok(ts) => Decoded::ok(Value::new(ts)),
        Err(e) => Decoded::failed(
            Value::new(Timestamp::default()),
            CoercionError::InvalidTimestamp(e),
        ),
    }
}

/// Route a raw value through the decode function selected by `kind`
pub fn decode(kind: DecodeKind, raw: &str) -> Decoded<TypedValue> {
    match kind {
        DecodeKind::Int => decode_int(raw).map(TypedValue::Int),
        DecodeKind::Int64 => decode_int64(raw).map(TypedValue::Int),
        DecodeKind::Float => decode_float64(raw).map(TypedValue::Float),
        DecodeKind::Str => decode_string(raw).map(TypedValue::Str),
        DecodeKind::Bool => decode_bool(raw).map(TypedValue::Bool),
        DecodeKind::Time => decode_timestamp(raw, TimestampGrammar::Zoned).map(TypedValue::Time),
        DecodeKind::LocalTime => {
            decode_timestamp(raw, TimestampGrammar::Local).map(TypedValue::Time)
        }
    }
}
