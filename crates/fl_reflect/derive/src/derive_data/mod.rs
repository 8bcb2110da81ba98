//! Parsing of the derive input.

// -----------------------------------------------------------------------------
// Modules

mod field_attributes;
mod loggable_derive;
mod type_attributes;

// -----------------------------------------------------------------------------
// Internal API

pub(crate) use field_attributes::FieldTags;
pub(crate) use loggable_derive::{DeriveKind, LoggableDerive, StructField};
pub(crate) use type_attributes::CapabilityFlags;
