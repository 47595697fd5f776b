//! Trimmed FHIR R4 object model used as the decode target for the native
//! deserialization pipeline.
//!
//! The model follows the usual FHIR shape: primitive values live inside a
//! generic [`Element`] container carrying `id` and `extension`, coded values
//! live inside [`Coded`] together with their code system enumeration, and
//! complex datatypes / resources are plain structs with `Option` fields.
//! Serialization follows the FHIR JSON conventions (camelCase property names,
//! primitives collapsing to bare JSON values when they carry no metadata).

pub mod codes;
pub mod date_time;
pub mod fhir_version;
pub mod precise_decimal;
pub mod r4;
mod element;

pub use codes::CodeEnum;
pub use element::{Coded, Element};
pub use fhir_version::FhirVersion;
pub use precise_decimal::PreciseDecimal;
