//! Declarative field tables.
//!
//! Every track record is declared once with [`track_record!`]: struct field,
//! decode kind, engine field name and an optional correction rule. The macro
//! emits the struct, its static [`FieldSpec`] table and the constructor that
//! moves decoded values into the struct, so every provider shares one table.

use std::collections::HashMap;

use crate::domain::model::{
    BoolValue, Extra, Float64Value, IntValue, StreamKind, StringValue, TimeValue,
};
use crate::domain::rules::Correction;

/// Engine field holding a track's format name
pub const FORMAT: &str = "Format";
/// Engine field holding a track's format profile
pub const FORMAT_PROFILE: &str = "Format_Profile";
/// Engine field holding the bit depth of a video track
pub const BIT_DEPTH: &str = "BitDepth";
/// Secondary type tag of auxiliary ("Other") tracks
pub const SECONDARY_TYPE: &str = "Type";
/// Secondary type value identifying timecode tracks
pub const TIMECODE_TYPE: &str = "Time code";

/// Decode function a field is routed through
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeKind {
    Int,
    /// Same width as `Int`; marks sizes and sample counts
    Int64,
    Float,
    Str,
    Bool,
    /// Zone-tagged timestamp (`UTC 2020-01-15 10:30:00`)
    Time,
    /// Timestamp without zone, resolved in the host's zone
    LocalTime,
}

/// One row of a field table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub decode: DecodeKind,
    pub correction: Option<Correction>,
}

/// A decoded value of any supported kind
#[derive(Debug, Clone, PartialEq)]
pub enum TypedValue {
    Int(IntValue),
    Float(Float64Value),
    Str(StringValue),
    Bool(BoolValue),
    Time(TimeValue),
}

impl TypedValue {
    /// Attach extra metadata to the wrapped value
    pub fn with_extra(self, extra: Extra) -> Self {
        match self {
            TypedValue::Int(v) => TypedValue::Int(v.with_extra(extra)),
            TypedValue::Float(v) => TypedValue::Float(v.with_extra(extra)),
            TypedValue::Str(v) => TypedValue::Str(v.with_extra(extra)),
            TypedValue::Bool(v) => TypedValue::Bool(v.with_extra(extra)),
            TypedValue::Time(v) => TypedValue::Time(v.with_extra(extra)),
        }
    }
}

/// Conversion out of [`TypedValue`] into a concrete value type
pub trait FromTyped: Sized {
    fn from_typed(value: TypedValue) -> Option<Self>;
}

macro_rules! impl_from_typed {
    ($($variant:ident => $ty:ty),* $(,)?) => {
        $(
            impl FromTyped for $ty {
                fn from_typed(value: TypedValue) -> Option<Self> {
                    match value {
                        TypedValue::$variant(v) => Some(v),
                        _ => None,
                    }
                }
            }
        )*
    };
}

impl_from_typed! {
    Int => IntValue,
    Float => Float64Value,
    Str => StringValue,
    Bool => BoolValue,
    Time => TimeValue,
}

/// Values decoded so far for one track, keyed by engine field name
#[derive(Debug, Clone, Default)]
pub struct DecodedFields {
    values: HashMap<&'static str, TypedValue>,
}

impl DecodedFields {
    pub fn insert(&mut self, name: &'static str, value: TypedValue) {
        self.values.insert(name, value);
    }

    /// Decoded string value of a field, if it was decoded as a string
    pub fn str_value(&self, name: &str) -> Option<&str> {
        match self.values.get(name) {
            Some(TypedValue::Str(v)) => Some(v.val.as_str()),
            _ => None,
        }
    }

    /// Move a decoded value out; missing or mismatched entries yield the zero value
    pub fn take<T: FromTyped + Default>(&mut self, name: &str) -> T {
        self.values
            .remove(name)
            .and_then(T::from_typed)
            .unwrap_or_default()
    }
}

/// A typed track record with a fixed, exhaustive field table
pub trait TrackRecord: Sized + Default {
    /// Stream kind the record is read from
    const KIND: StreamKind;

    /// Field table, in decode order
    fn fields() -> &'static [FieldSpec];

    /// Build the record from decoded values
    fn from_decoded(decoded: &mut DecodedFields) -> Self;
}

/// Declare a track record and its field table.
///
/// ```ignore
/// track_record! {
///     pub struct VideoTrack(Video) {
///         format: Str = "Format",
///         bit_depth: Int = "BitDepth" => Correction::ProResBitDepth,
///     }
/// }
/// ```
macro_rules! track_record {
    (@ty Int) => { $crate::domain::model::IntValue };
    (@ty Int64) => { $crate::domain::model::Int64Value };
    (@ty Float) => { $crate::domain::model::Float64Value };
    (@ty Str) => { $crate::domain::model::StringValue };
    (@ty Bool) => { $crate::domain::model::BoolValue };
    (@ty Time) => { $crate::domain::model::TimeValue };
    (@ty LocalTime) => { $crate::domain::model::TimeValue };

    (@correction) => { None };
    (@correction $rule:expr) => { Some($rule) };

    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident($kind:ident) {
            $(
                $(#[$fmeta:meta])*
                $field:ident: $decode:ident = $key:literal $(=> $rule:expr)?
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, ::serde::Serialize)]
        $vis struct $name {
            $(
                $(#[$fmeta])*
                pub $field: $crate::domain::fields::track_record!(@ty $decode),
            )*
        }

        impl $crate::domain::fields::TrackRecord for $name {
            const KIND: $crate::domain::model::StreamKind =
                $crate::domain::model::StreamKind::$kind;

            fn fields() -> &'static [$crate::domain::fields::FieldSpec] {
                const FIELDS: &[$crate::domain::fields::FieldSpec] = &[
                    $(
                        $crate::domain::fields::FieldSpec {
                            name: $key,
                            decode: $crate::domain::fields::DecodeKind::$decode,
                            correction: $crate::domain::fields::track_record!(@correction $($rule)?),
                        },
                    )*
                ];
                FIELDS
            }

            fn from_decoded(decoded: &mut $crate::domain::fields::DecodedFields) -> Self {
                Self {
                    $( $field: decoded.take($key), )*
                }
            }
        }
    };
}

pub(crate) use track_record;
