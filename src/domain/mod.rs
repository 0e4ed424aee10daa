// Domain layer - Typed model, field tables, decoding and correction rules

pub mod fields;
pub mod coercion;
pub mod errors;
pub mod model;
pub mod rules;
