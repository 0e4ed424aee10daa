// Domain rules - Corrections for values the engine under-reports
//
// At times the engine provides incomplete information and a value has to be
// derived from other, already decoded fields of the same track.

use crate::domain::fields::{DecodedFields, TypedValue, FORMAT, FORMAT_PROFILE};
use crate::domain::model::IntValue;

pub const VIDEO_FORMAT_PRORES: &str = "ProRes";

pub const VIDEO_PROFILE_422_HQ: &str = "422 HQ";
pub const VIDEO_PROFILE_4444: &str = "4444";

pub const BIT_DEPTH_10: i64 = 10;
pub const BIT_DEPTH_12: i64 = 12;

/// Correction rule attached to a field table entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Correction {
    /// Fixed bit depth for ProRes profiles the engine reports without one
    ProResBitDepth,
}

impl Correction {
    /// Derive the field's value from fields decoded earlier in the same track.
    ///
    /// `None` means the rule does not apply and the raw value must be decoded
    /// as usual.
    pub fn apply(&self, decoded: &DecodedFields) -> Option<TypedValue> {
        match self {
            Correction::ProResBitDepth => {
                let format = decoded.str_value(FORMAT).unwrap_or_default();
                let profile = decoded.str_value(FORMAT_PROFILE).unwrap_or_default();
                prores_bit_depth(format, profile).map(|depth| TypedValue::Int(IntValue::new(depth)))
            }
        }
    }
}

/// Bit depth mandated by the ProRes profile, when it is one of the profiles
/// the engine does not report reliably
pub fn prores_bit_depth(format: &str, profile: &str) -> Option<i64> {
    if format != VIDEO_FORMAT_PRORES {
        return None;
    }

    match profile {
        VIDEO_PROFILE_4444 => Some(BIT_DEPTH_12),
        VIDEO_PROFILE_422_HQ => Some(BIT_DEPTH_10),
        _ => None,
    }
}
