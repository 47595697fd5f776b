mod common;

use common::*;
use kestrel_fhir_native::generated::r4::{decode_observation, decode_patient};
use kestrel_fhir_native::NativeArena;

#[test]
fn extension_on_a_present_scalar_lands_on_its_element() {
    let mut arena = NativeArena::new();
    let extension = string_extension(&mut arena, "http://example.org/source", "registry");
    let record = new_record(&mut arena, "Patient");
    set_bool(&mut arena, record, "Patient", "active", true);
    attach_extensions(&mut arena, record, "active", &[extension]);

    let patient = decode_patient(&arena, record).unwrap();
    let active = patient.active.unwrap();
    assert_eq!(active.value, Some(true));
    let extensions = active.extension.unwrap();
    assert_eq!(extensions.len(), 1);
    assert_eq!(extensions[0].url, "http://example.org/source");
    assert_eq!(
        extensions[0].value_string.as_ref().unwrap().value.as_deref(),
        Some("registry")
    );
}

#[test]
fn extension_on_an_absent_scalar_materializes_an_empty_element() {
    let mut arena = NativeArena::new();
    let extension = string_extension(&mut arena, "http://example.org/reason", "masked");
    let record = new_record(&mut arena, "Patient");
    attach_extensions(&mut arena, record, "gender", &[extension]);

    let patient = decode_patient(&arena, record).unwrap();
    let gender = patient.gender.unwrap();
    assert_eq!(gender.literal(), None);
    assert_eq!(gender.extension.unwrap()[0].url, "http://example.org/reason");
}

#[test]
fn extension_on_a_repeated_element_appends_an_extension_only_item() {
    let mut arena = NativeArena::new();
    let name = new_record(&mut arena, "HumanName");
    set_text(&mut arena, name, "HumanName", "family", "Chalmers");
    let extension = string_extension(&mut arena, "http://example.org/alias", "PC");
    let record = new_record(&mut arena, "Patient");
    set_record_array(&mut arena, record, "Patient", "name", &[name]);
    attach_extensions(&mut arena, record, "name", &[extension]);

    let patient = decode_patient(&arena, record).unwrap();
    let names = patient.name.unwrap();
    assert_eq!(names.len(), 2);
    assert!(names[0].extension.is_none());
    assert!(names[1].family.is_none());
    assert_eq!(names[1].extension.as_ref().unwrap()[0].url, "http://example.org/alias");
}

#[test]
fn choice_extension_attaches_to_the_materialized_variant() {
    let mut arena = NativeArena::new();
    let extension = string_extension(&mut arena, "http://example.org/estimated", "true");
    let record = new_record(&mut arena, "Observation");
    let payload = select_variant(&mut arena, record, "Observation", "value", "valueInteger");
    write_int_at(&mut arena, payload, 7);
    attach_extensions(&mut arena, record, "value", &[extension]);

    let observation = decode_observation(&arena, record).unwrap();
    let value = observation.value_integer.unwrap();
    assert_eq!(value.value, Some(7));
    assert_eq!(value.extension.unwrap()[0].url, "http://example.org/estimated");
    assert!(observation.value_quantity.is_none());
    assert!(observation.value_string.is_none());
}

#[test]
fn choice_extension_without_a_variant_is_dropped() {
    let mut arena = NativeArena::new();
    let extension = string_extension(&mut arena, "http://example.org/orphan", "x");
    let record = new_record(&mut arena, "Observation");
    attach_extensions(&mut arena, record, "value", &[extension]);

    let observation = decode_observation(&arena, record).unwrap();
    assert!(observation.value_quantity.is_none());
    assert!(observation.value_string.is_none());
    assert!(observation.value_boolean.is_none());
    assert!(observation.value_integer.is_none());
}

#[test]
fn unknown_element_names_are_ignored() {
    let mut arena = NativeArena::new();
    let extension = string_extension(&mut arena, "http://example.org/ghost", "x");
    let record = new_record(&mut arena, "Patient");
    set_bool(&mut arena, record, "Patient", "active", true);
    attach_extensions(&mut arena, record, "notAField", &[extension]);

    let patient = decode_patient(&arena, record).unwrap();
    assert!(patient.active.unwrap().extension.is_none());
}

#[test]
fn several_nodes_and_items_all_route() {
    let mut arena = NativeArena::new();
    let first = string_extension(&mut arena, "http://example.org/a", "1");
    let second = string_extension(&mut arena, "http://example.org/b", "2");
    let third = string_extension(&mut arena, "http://example.org/c", "3");
    let record = new_record(&mut arena, "Patient");
    set_bool(&mut arena, record, "Patient", "active", false);
    set_text(&mut arena, record, "Patient", "gender", "other");
    attach_extensions(&mut arena, record, "active", &[first, second]);
    attach_extensions(&mut arena, record, "gender", &[third]);

    let patient = decode_patient(&arena, record).unwrap();
    assert_eq!(patient.active.unwrap().extension.unwrap().len(), 2);
    assert_eq!(patient.gender.unwrap().extension.unwrap().len(), 1);
}
