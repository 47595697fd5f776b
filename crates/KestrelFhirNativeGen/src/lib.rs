//! Generator for the native record decoding routines.
//!
//! The pipeline runs in two stages. Extraction pairs the runtime's native
//! schema tables with the domain type catalog and classifies every field
//! through the conversion rule registry, producing mapping plans. Emission
//! renders those plans into the source text of the generated module that is
//! checked in under the runtime crate.
//!
//! Extraction is strict: a native field with no catalog counterpart, or a
//! wrapper shape with no conversion rule for the catalog's value kind, fails
//! generation instead of producing a decoder that silently drops data.

pub mod catalog;
pub mod dispatch;
pub mod emit;
pub mod extract;
pub mod registry;
pub mod rules;

use kestrel_fhir_lib::FhirVersion;
use thiserror::Error;

pub use extract::{extract, extract_all, MappingInfo};

/// Failure while pairing native layouts with the domain catalog.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("no native layout or catalog entry for type {native_type}")]
    MissingType { native_type: String },

    #[error("{native_type}.{field} has no counterpart in the domain catalog")]
    UnknownProperty { native_type: String, field: String },

    #[error("{native_type}.{field} cannot be classified against property {property}")]
    Unclassifiable {
        native_type: String,
        field: String,
        property: String,
    },

    #[error("no registry entry for native type {native_type}")]
    MissingRegistryEntry { native_type: String },

    #[error("{native_type}.{field}: no conversion from {wrapper} to {value}")]
    MissingConversion {
        native_type: String,
        field: String,
        wrapper: String,
        value: String,
    },

    #[error("{native_type}.{field}: property {property} is not a primitive element")]
    NonNullableUnwrap {
        native_type: String,
        field: String,
        property: String,
    },

    #[error("{native_type}.{field}: layout invariant broken: {reason}")]
    LayoutInvariant {
        native_type: String,
        field: String,
        reason: String,
    },
}

/// Extracts mapping plans for every registered type and renders the full
/// generated module for the given FHIR release.
pub fn generate(version: FhirVersion) -> Result<String, SchemaError> {
    let mappings = extract::extract_all(version)?;
    Ok(emit::emit_module(&mappings))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generation_succeeds_for_r4() {
        let module = generate(FhirVersion::R4).unwrap();
        assert!(module.starts_with("//! Decoding routines for native R4 records."));
        assert!(module.contains("pub fn decode_patient"));
        assert!(module.contains("pub fn decode_resource"));
    }

    #[test]
    fn generation_fails_for_releases_the_layouts_do_not_cover() {
        // The native Observation layout has no field for R5's bodyStructure.
        assert!(matches!(
            generate(FhirVersion::R5),
            Err(SchemaError::UnknownProperty { .. })
        ));
    }
}
