//! Type registry: native record types paired with their domain types,
//! decoder names, and dispatch roles.

use crate::SchemaError;

/// One native-to-domain pairing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistryEntry {
    /// Native type name, as in the runtime schema tables.
    pub native: &'static str,
    /// Domain type name, as in the object model.
    pub domain: &'static str,
    /// Name of the emitted decoding routine.
    pub decoder: &'static str,
    /// Whether the type is a resource reachable from root dispatch.
    pub resource: bool,
}

/// Registry in emission order: shared complex types, then resources.
pub const ENTRIES: &[RegistryEntry] = &[
    RegistryEntry { native: "Extension", domain: "Extension", decoder: "decode_extension", resource: false },
    RegistryEntry { native: "Coding", domain: "Coding", decoder: "decode_coding", resource: false },
    RegistryEntry { native: "CodeableConcept", domain: "CodeableConcept", decoder: "decode_codeable_concept", resource: false },
    RegistryEntry { native: "Quantity", domain: "Quantity", decoder: "decode_quantity", resource: false },
    RegistryEntry { native: "Reference", domain: "Reference", decoder: "decode_reference", resource: false },
    RegistryEntry { native: "Period", domain: "Period", decoder: "decode_period", resource: false },
    RegistryEntry { native: "Identifier", domain: "Identifier", decoder: "decode_identifier", resource: false },
    RegistryEntry { native: "HumanName", domain: "HumanName", decoder: "decode_human_name", resource: false },
    RegistryEntry { native: "Patient", domain: "Patient", decoder: "decode_patient", resource: true },
    RegistryEntry { native: "Observation", domain: "Observation", decoder: "decode_observation", resource: true },
    RegistryEntry { native: "AllergyIntolerance", domain: "AllergyIntolerance", decoder: "decode_allergy_intolerance", resource: true },
];

/// Looks up the entry for a native type.
pub fn entry(native: &str) -> Result<&'static RegistryEntry, SchemaError> {
    ENTRIES
        .iter()
        .find(|entry| entry.native == native)
        .ok_or_else(|| SchemaError::MissingRegistryEntry {
            native_type: native.to_owned(),
        })
}

/// The decoder name for a native type.
pub fn decoder(native: &str) -> Result<&'static str, SchemaError> {
    entry(native).map(|entry| entry.decoder)
}

#[cfg(test)]
mod tests {
    use super::*;
    use kestrel_fhir_native::schema;

    #[test]
    fn registry_matches_the_native_schema_tables() {
        assert_eq!(ENTRIES.len(), schema::NATIVE_TYPES.len());
        for (entry, native) in ENTRIES.iter().zip(schema::NATIVE_TYPES) {
            assert_eq!(entry.native, native.name);
        }
    }

    #[test]
    fn resources_come_after_shared_types() {
        let first_resource = ENTRIES.iter().position(|e| e.resource).unwrap();
        assert!(ENTRIES[first_resource..].iter().all(|e| e.resource));
    }

    #[test]
    fn unknown_types_are_reported() {
        assert!(matches!(
            entry("Practitioner"),
            Err(SchemaError::MissingRegistryEntry { .. })
        ));
    }
}
