//! Root dispatch emitter: the routine that switches on a root record's tag
//! and hands off to the matching resource decoder.

use std::fmt::Write;

use crate::extract::MappingInfo;
use crate::registry;

/// Renders `decode_resource` over the resource mappings. Non-resource
/// mappings are skipped; they are only reachable through nesting.
pub fn emit_dispatch(mappings: &[MappingInfo]) -> String {
    let mut out = String::from(
        "\
/// Decodes the root record of an arena into a domain resource.
///
/// Returns `Ok(None)` for the null reference and an error when the root
/// record's tag matches no known resource.
pub fn decode_resource(arena: &NativeArena, at: NativeRef) -> Result<Option<Resource>, DecodeError> {
    let Some(view) = arena.view(at) else {
        return Ok(None);
    };
    match view.tag() {
",
    );
    for mapping in mappings {
        let is_resource = registry::entry(&mapping.native)
            .map(|entry| entry.resource)
            .unwrap_or(false);
        if !is_resource {
            continue;
        }
        let _ = writeln!(
            out,
            "        {} => Ok({}(arena, at).map(Resource::{})),",
            mapping.tag, mapping.decoder, mapping.domain
        );
    }
    out.push_str("        tag => Err(DecodeError::UnknownTag { tag }),\n    }\n}\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::extract_all;
    use kestrel_fhir_lib::FhirVersion;

    #[test]
    fn dispatch_covers_exactly_the_resources() {
        let mappings = extract_all(FhirVersion::R4).unwrap();
        let emitted = emit_dispatch(&mappings);
        assert!(emitted.contains("10 => Ok(decode_patient(arena, at).map(Resource::Patient)),"));
        assert!(
            emitted.contains("11 => Ok(decode_observation(arena, at).map(Resource::Observation)),")
        );
        assert!(emitted.contains(
            "12 => Ok(decode_allergy_intolerance(arena, at).map(Resource::AllergyIntolerance)),"
        ));
        assert!(!emitted.contains("decode_coding"));
    }

    #[test]
    fn unmatched_tags_fall_through_to_an_error() {
        let mappings = extract_all(FhirVersion::R4).unwrap();
        let emitted = emit_dispatch(&mappings);
        assert!(emitted.contains("tag => Err(DecodeError::UnknownTag { tag }),"));
    }

    #[test]
    fn null_roots_short_circuit() {
        let emitted = emit_dispatch(&[]);
        assert!(emitted.contains("return Ok(None);"));
        assert!(!emitted.contains("=> Ok("));
    }
}
