mod common;

use common::*;
use kestrel_fhir_lib::codes::{IdentifierUse, NameUse, QuantityComparator};
use kestrel_fhir_native::generated::r4::{
    decode_codeable_concept, decode_coding, decode_extension, decode_human_name,
    decode_identifier, decode_period, decode_quantity, decode_reference,
};
use kestrel_fhir_native::{NativeArena, NativeRef};

#[test]
fn coding_fields_decode_into_elements() {
    let mut arena = NativeArena::new();
    let record = new_record(&mut arena, "Coding");
    set_text(&mut arena, record, "Coding", "system", "http://loinc.org");
    set_text(&mut arena, record, "Coding", "code", "8867-4");
    set_text(&mut arena, record, "Coding", "display", "Heart rate");
    set_bool(&mut arena, record, "Coding", "userSelected", true);

    let coding = decode_coding(&arena, record).unwrap();
    assert_eq!(coding.system.unwrap().value.as_deref(), Some("http://loinc.org"));
    assert_eq!(coding.code.unwrap().value.as_deref(), Some("8867-4"));
    assert_eq!(coding.display.unwrap().value.as_deref(), Some("Heart rate"));
    assert_eq!(coding.user_selected.unwrap().value, Some(true));
    assert_eq!(coding.version, None);
}

#[test]
fn absent_fields_stay_none() {
    let mut arena = NativeArena::new();
    let record = new_record(&mut arena, "Coding");
    let coding = decode_coding(&arena, record).unwrap();
    assert_eq!(coding, Default::default());
}

#[test]
fn null_reference_decodes_to_none() {
    let arena = NativeArena::new();
    assert!(decode_coding(&arena, NativeRef::NULL).is_none());
}

#[test]
fn codeable_concept_collects_its_coding_array() {
    let mut arena = NativeArena::new();
    let first = new_record(&mut arena, "Coding");
    set_text(&mut arena, first, "Coding", "code", "active");
    let second = new_record(&mut arena, "Coding");
    set_text(&mut arena, second, "Coding", "code", "confirmed");
    let record = new_record(&mut arena, "CodeableConcept");
    set_record_array(&mut arena, record, "CodeableConcept", "coding", &[first, second]);
    set_text(&mut arena, record, "CodeableConcept", "text", "Active");

    let concept = decode_codeable_concept(&arena, record).unwrap();
    let coding = concept.coding.unwrap();
    assert_eq!(coding.len(), 2);
    assert_eq!(coding[0].code.as_ref().unwrap().value.as_deref(), Some("active"));
    assert_eq!(coding[1].code.as_ref().unwrap().value.as_deref(), Some("confirmed"));
    assert_eq!(concept.text.unwrap().value.as_deref(), Some("Active"));
}

#[test]
fn empty_coding_array_stays_none() {
    let mut arena = NativeArena::new();
    let record = new_record(&mut arena, "CodeableConcept");
    let concept = decode_codeable_concept(&arena, record).unwrap();
    assert!(concept.coding.is_none());
}

#[test]
fn quantity_value_keeps_decimal_text_verbatim() {
    let mut arena = NativeArena::new();
    let record = new_record(&mut arena, "Quantity");
    set_text(&mut arena, record, "Quantity", "value", "0.250");
    set_text(&mut arena, record, "Quantity", "comparator", "<=");
    set_text(&mut arena, record, "Quantity", "unit", "mg");

    let quantity = decode_quantity(&arena, record).unwrap();
    let value = quantity.value.unwrap().value.unwrap();
    assert_eq!(value.as_str(), "0.250");
    assert_eq!(value.value().map(|d| d.to_string()), Some("0.250".to_owned()));
    let comparator = quantity.comparator.unwrap();
    assert_eq!(comparator.as_enum(), Some(QuantityComparator::LessOrEqual));
    assert_eq!(quantity.unit.unwrap().value.as_deref(), Some("mg"));
}

#[test]
fn reference_decodes_its_nested_identifier() {
    let mut arena = NativeArena::new();
    let identifier = new_record(&mut arena, "Identifier");
    set_text(&mut arena, identifier, "Identifier", "system", "urn:mrn");
    set_text(&mut arena, identifier, "Identifier", "value", "12345");
    let record = new_record(&mut arena, "Reference");
    set_text(&mut arena, record, "Reference", "reference", "Patient/12345");
    set_text(&mut arena, record, "Reference", "type", "Patient");
    set_ref(&mut arena, record, "Reference", "identifier", identifier);

    let reference = decode_reference(&arena, record).unwrap();
    assert_eq!(reference.reference.unwrap().value.as_deref(), Some("Patient/12345"));
    assert_eq!(reference.r#type.unwrap().value.as_deref(), Some("Patient"));
    let identifier = reference.identifier.unwrap();
    assert_eq!(identifier.system.unwrap().value.as_deref(), Some("urn:mrn"));
    assert_eq!(identifier.value.unwrap().value.as_deref(), Some("12345"));
}

#[test]
fn identifier_use_resolves_against_its_enumeration() {
    let mut arena = NativeArena::new();
    let period = new_record(&mut arena, "Period");
    set_packed(&mut arena, period, "Period", "start", Packed::year(2019));
    let record = new_record(&mut arena, "Identifier");
    set_text(&mut arena, record, "Identifier", "use", "official");
    set_ref(&mut arena, record, "Identifier", "period", period);

    let identifier = decode_identifier(&arena, record).unwrap();
    assert_eq!(identifier.r#use.unwrap().as_enum(), Some(IdentifierUse::Official));
    let period = identifier.period.unwrap();
    assert_eq!(period.start.unwrap().value.unwrap().to_string(), "2019");
    assert!(period.end.is_none());
}

#[test]
fn period_datetimes_honor_the_precision_marker() {
    let mut arena = NativeArena::new();
    let record = new_record(&mut arena, "Period");
    set_packed(&mut arena, record, "Period", "start", Packed::date(2021, 3, 1));
    set_packed(
        &mut arena,
        record,
        "Period",
        "end",
        Packed::second_utc(2021, 3, 2, 14, 5, 30),
    );

    let period = decode_period(&arena, record).unwrap();
    assert_eq!(period.start.unwrap().value.unwrap().to_string(), "2021-03-01");
    assert_eq!(
        period.end.unwrap().value.unwrap().to_string(),
        "2021-03-02T14:05:30Z"
    );
}

#[test]
fn human_name_arrays_preserve_order() {
    let mut arena = NativeArena::new();
    let record = new_record(&mut arena, "HumanName");
    set_text(&mut arena, record, "HumanName", "use", "maiden");
    set_text(&mut arena, record, "HumanName", "family", "Chalmers");
    set_text_array(&mut arena, record, "HumanName", "given", &["Peter", "James"]);
    set_text_array(&mut arena, record, "HumanName", "prefix", &["Dr"]);

    let name = decode_human_name(&arena, record).unwrap();
    assert_eq!(name.r#use.unwrap().as_enum(), Some(NameUse::Maiden));
    assert_eq!(name.family.unwrap().value.as_deref(), Some("Chalmers"));
    let given: Vec<_> = name
        .given
        .unwrap()
        .into_iter()
        .map(|g| g.value.unwrap())
        .collect();
    assert_eq!(given, ["Peter", "James"]);
    assert_eq!(name.prefix.unwrap().len(), 1);
}

#[test]
fn extension_union_materializes_exactly_one_variant() {
    let mut arena = NativeArena::new();
    let record = new_record(&mut arena, "Extension");
    write_text_at(&mut arena, record.0 + 8, "http://example.org/weight");
    let payload = select_variant(&mut arena, record, "Extension", "value", "valueInteger");
    write_int_at(&mut arena, payload, 72);

    let extension = decode_extension(&arena, record).unwrap();
    assert_eq!(extension.url, "http://example.org/weight");
    assert_eq!(extension.value_integer.unwrap().value, Some(72));
    assert!(extension.value_string.is_none());
    assert!(extension.value_boolean.is_none());
    assert!(extension.value_coding.is_none());
}

#[test]
fn unmatched_union_discriminant_materializes_nothing() {
    let mut arena = NativeArena::new();
    let record = new_record(&mut arena, "Extension");
    write_text_at(&mut arena, record.0 + 8, "http://example.org/odd");
    // Payload bytes are present but the discriminant names no known variant.
    write_int_at(&mut arena, record.0 + 16, 7);
    set_discriminant(&mut arena, record, "Extension", "value", 9);

    let extension = decode_extension(&arena, record).unwrap();
    assert!(extension.value_string.is_none());
    assert!(extension.value_boolean.is_none());
    assert!(extension.value_integer.is_none());
    assert!(extension.value_coding.is_none());
}

#[test]
fn extension_coding_variant_decodes_the_referenced_record() {
    let mut arena = NativeArena::new();
    let coding = new_record(&mut arena, "Coding");
    set_text(&mut arena, coding, "Coding", "code", "H");
    let record = new_record(&mut arena, "Extension");
    write_text_at(&mut arena, record.0 + 8, "http://example.org/flag");
    let payload = select_variant(&mut arena, record, "Extension", "value", "valueCoding");
    write_ref_at(&mut arena, payload, coding);

    let extension = decode_extension(&arena, record).unwrap();
    let coding = extension.value_coding.unwrap();
    assert_eq!(coding.code.unwrap().value.as_deref(), Some("H"));
}
