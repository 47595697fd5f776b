//! FHIR R4 datatypes and resources.
//!
//! Primitive aliases follow the generated-model convention: every FHIR
//! primitive is an [`Element`] specialization so it can carry `id` and
//! `extension` alongside its value. Note that the `String` alias shadows
//! `std::string::String` inside this module tree; bare Rust strings are
//! spelled `std::string::String` here, as in the generated code this module
//! is patterned on.

pub mod complex_types;
pub use complex_types::*;

pub mod resources;
pub use resources::*;

use crate::element::{Coded, Element};

/// FHIR primitive type for boolean values (true/false)
pub type Boolean = Element<bool, Extension>;
/// FHIR primitive type for whole number values
pub type Integer = Element<std::primitive::i32, Extension>;
/// FHIR primitive type for character sequences
pub type String = Element<std::string::String, Extension>;
/// FHIR primitive type for Uniform Resource Identifiers (RFC 3986)
pub type Uri = Element<std::string::String, Extension>;
/// FHIR primitive type for coded values drawn from a defined set
pub type Code = Element<std::string::String, Extension>;
/// FHIR primitive type for decimal numbers with arbitrary precision
pub type Decimal = Element<crate::precise_decimal::PreciseDecimal, Extension>;
/// FHIR primitive type for date values (year, month, day)
pub type Date = Element<crate::date_time::PrecisionDate, Extension>;
/// FHIR primitive type for date and time values
pub type DateTime = Element<crate::date_time::PrecisionDateTime, Extension>;
/// FHIR primitive type for instant in time values (to millisecond precision)
pub type Instant = Element<crate::date_time::PrecisionInstant, Extension>;
/// FHIR primitive type for time of day values
pub type Time = Element<crate::date_time::PrecisionTime, Extension>;

/// Access to an element's own extension list.
///
/// Every first-class FHIR element carries its own extension container,
/// distinct from the extensions of the record that owns it. The native
/// decoder's extension side-channel routing is written against this trait.
pub trait HasExtensions {
    fn extensions_mut(&mut self) -> &mut Option<Vec<Extension>>;
}

impl<V> HasExtensions for Element<V, Extension> {
    fn extensions_mut(&mut self) -> &mut Option<Vec<Extension>> {
        &mut self.extension
    }
}

impl<C> HasExtensions for Coded<C, Extension> {
    fn extensions_mut(&mut self) -> &mut Option<Vec<Extension>> {
        &mut self.extension
    }
}

macro_rules! impl_has_extensions {
    ($($t:ty),* $(,)?) => {
        $(
            impl HasExtensions for $t {
                fn extensions_mut(&mut self) -> &mut Option<Vec<Extension>> {
                    &mut self.extension
                }
            }
        )*
    };
}

impl_has_extensions!(
    Coding,
    CodeableConcept,
    Quantity,
    Period,
    Reference,
    Identifier,
    HumanName,
    Patient,
    Observation,
    AllergyIntolerance,
);
