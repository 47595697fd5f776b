//! Decoding routines for native R4 records.
//!
//! @generated by kestrel-fhir-native-gen against the native schema tables.
//! Do not edit by hand; regenerate instead.

use kestrel_fhir_lib::r4::{
    AllergyIntolerance, CodeableConcept, Coding, Extension, HumanName, Identifier, Observation,
    Patient, Period, Quantity, Reference, Resource,
};
use kestrel_fhir_lib::{Coded, Element, PreciseDecimal};

use crate::arena::{NativeArena, NativeRef};
use crate::error::DecodeError;
use crate::{ext, layout};

/// Decodes a native `Extension` record (tag 1).
pub fn decode_extension(arena: &NativeArena, at: NativeRef) -> Option<Extension> {
    let view = arena.view(at)?;
    let mut target = Extension::default();
    if let Some(value) = layout::text(&view, 8) {
        target.url = value;
    }
    match view.u32_at(28) {
        1 => {
            if let Some(value) = layout::text_opt(&view, 16) {
                target.value_string = Some(Element::from(value));
            }
        }
        2 => {
            if let Some(value) = layout::opt_bool(&view, 16) {
                target.value_boolean = Some(Element::from(value));
            }
        }
        3 => {
            if let Some(value) = layout::opt_int(&view, 16) {
                target.value_integer = Some(Element::from(value));
            }
        }
        4 => {
            if let Some(value) = decode_coding(arena, view.reference(16)) {
                target.value_coding = Some(value);
            }
        }
        _ => {}
    }
    for node in ext::nodes(arena, &view) {
        for item in node.items() {
            if let Some(extension) = decode_extension(arena, item) {
                match node.name() {
                    "value" => {
                        let mut pending = Some(extension);
                        pending = pending
                            .and_then(|e| ext::attach_existing(&mut target.value_string, e));
                        pending = pending
                            .and_then(|e| ext::attach_existing(&mut target.value_boolean, e));
                        pending = pending
                            .and_then(|e| ext::attach_existing(&mut target.value_integer, e));
                        let _ = pending
                            .and_then(|e| ext::attach_existing(&mut target.value_coding, e));
                    }
                    _ => {}
                }
            }
        }
    }
    Some(target)
}

/// Decodes a native `Coding` record (tag 2).
pub fn decode_coding(arena: &NativeArena, at: NativeRef) -> Option<Coding> {
    let view = arena.view(at)?;
    let mut target = Coding::default();
    if let Some(value) = layout::text_opt(&view, 8) {
        target.system = Some(Element::from(value));
    }
    if let Some(value) = layout::text_opt(&view, 20) {
        target.version = Some(Element::from(value));
    }
    if let Some(value) = layout::text_opt(&view, 32) {
        target.code = Some(Element::from(value));
    }
    if let Some(value) = layout::text_opt(&view, 44) {
        target.display = Some(Element::from(value));
    }
    if let Some(value) = layout::opt_bool(&view, 56) {
        target.user_selected = Some(Element::from(value));
    }
    for node in ext::nodes(arena, &view) {
        for item in node.items() {
            if let Some(extension) = decode_extension(arena, item) {
                match node.name() {
                    "system" => ext::attach(&mut target.system, extension),
                    "version" => ext::attach(&mut target.version, extension),
                    "code" => ext::attach(&mut target.code, extension),
                    "display" => ext::attach(&mut target.display, extension),
                    "userSelected" => ext::attach(&mut target.user_selected, extension),
                    _ => {}
                }
            }
        }
    }
    Some(target)
}

/// Decodes a native `CodeableConcept` record (tag 3).
pub fn decode_codeable_concept(arena: &NativeArena, at: NativeRef) -> Option<CodeableConcept> {
    let view = arena.view(at)?;
    let mut target = CodeableConcept::default();
    let count = view.count(8);
    if count > 0 {
        if let Some(items) = view.array(12) {
            let mut values = Vec::with_capacity(count as usize);
            for index in 0..count {
                if let Some(value) = decode_coding(arena, items.reference(index * 4)) {
                    values.push(value);
                }
            }
            if !values.is_empty() {
                target.coding = Some(values);
            }
        }
    }
    if let Some(value) = layout::text_opt(&view, 16) {
        target.text = Some(Element::from(value));
    }
    for node in ext::nodes(arena, &view) {
        for item in node.items() {
            if let Some(extension) = decode_extension(arena, item) {
                match node.name() {
                    "coding" => ext::attach_item(&mut target.coding, extension),
                    "text" => ext::attach(&mut target.text, extension),
                    _ => {}
                }
            }
        }
    }
    Some(target)
}

/// Decodes a native `Quantity` record (tag 4).
pub fn decode_quantity(arena: &NativeArena, at: NativeRef) -> Option<Quantity> {
    let view = arena.view(at)?;
    let mut target = Quantity::default();
    if let Some(value) = layout::text_opt(&view, 8) {
        target.value = Some(Element::from(PreciseDecimal::new(value)));
    }
    // comparator: < | <= | >= | >
    if let Some(value) = layout::text_opt(&view, 20) {
        target.comparator = Some(Coded::from_literal(value));
    }
    if let Some(value) = layout::text_opt(&view, 32) {
        target.unit = Some(Element::from(value));
    }
    if let Some(value) = layout::text_opt(&view, 44) {
        target.system = Some(Element::from(value));
    }
    if let Some(value) = layout::text_opt(&view, 56) {
        target.code = Some(Element::from(value));
    }
    for node in ext::nodes(arena, &view) {
        for item in node.items() {
            if let Some(extension) = decode_extension(arena, item) {
                match node.name() {
                    "value" => ext::attach(&mut target.value, extension),
                    "comparator" => ext::attach(&mut target.comparator, extension),
                    "unit" => ext::attach(&mut target.unit, extension),
                    "system" => ext::attach(&mut target.system, extension),
                    "code" => ext::attach(&mut target.code, extension),
                    _ => {}
                }
            }
        }
    }
    Some(target)
}

/// Decodes a native `Reference` record (tag 5).
pub fn decode_reference(arena: &NativeArena, at: NativeRef) -> Option<Reference> {
    let view = arena.view(at)?;
    let mut target = Reference::default();
    if let Some(value) = layout::text_opt(&view, 8) {
        target.reference = Some(Element::from(value));
    }
    if let Some(value) = layout::text_opt(&view, 20) {
        target.r#type = Some(Element::from(value));
    }
    if let Some(value) = decode_identifier(arena, view.reference(32)) {
        target.identifier = Some(value);
    }
    if let Some(value) = layout::text_opt(&view, 36) {
        target.display = Some(Element::from(value));
    }
    for node in ext::nodes(arena, &view) {
        for item in node.items() {
            if let Some(extension) = decode_extension(arena, item) {
                match node.name() {
                    "reference" => ext::attach(&mut target.reference, extension),
                    "type" => ext::attach(&mut target.r#type, extension),
                    "identifier" => ext::attach(&mut target.identifier, extension),
                    "display" => ext::attach(&mut target.display, extension),
                    _ => {}
                }
            }
        }
    }
    Some(target)
}

/// Decodes a native `Period` record (tag 6).
pub fn decode_period(arena: &NativeArena, at: NativeRef) -> Option<Period> {
    let view = arena.view(at)?;
    let mut target = Period::default();
    if let Some(value) = layout::date_time(&view, 8) {
        target.start = Some(Element::from(value));
    }
    if let Some(value) = layout::date_time(&view, 24) {
        target.end = Some(Element::from(value));
    }
    for node in ext::nodes(arena, &view) {
        for item in node.items() {
            if let Some(extension) = decode_extension(arena, item) {
                match node.name() {
                    "start" => ext::attach(&mut target.start, extension),
                    "end" => ext::attach(&mut target.end, extension),
                    _ => {}
                }
            }
        }
    }
    Some(target)
}

/// Decodes a native `Identifier` record (tag 7).
pub fn decode_identifier(arena: &NativeArena, at: NativeRef) -> Option<Identifier> {
    let view = arena.view(at)?;
    let mut target = Identifier::default();
    // use: usual | official | temp | secondary | old
    if let Some(value) = layout::text_opt(&view, 8) {
        target.r#use = Some(Coded::from_literal(value));
    }
    if let Some(value) = decode_codeable_concept(arena, view.reference(20)) {
        target.r#type = Some(value);
    }
    if let Some(value) = layout::text_opt(&view, 24) {
        target.system = Some(Element::from(value));
    }
    if let Some(value) = layout::text_opt(&view, 36) {
        target.value = Some(Element::from(value));
    }
    if let Some(value) = decode_period(arena, view.reference(48)) {
        target.period = Some(value);
    }
    for node in ext::nodes(arena, &view) {
        for item in node.items() {
            if let Some(extension) = decode_extension(arena, item) {
                match node.name() {
                    "use" => ext::attach(&mut target.r#use, extension),
                    "type" => ext::attach(&mut target.r#type, extension),
                    "system" => ext::attach(&mut target.system, extension),
                    "value" => ext::attach(&mut target.value, extension),
                    "period" => ext::attach(&mut target.period, extension),
                    _ => {}
                }
            }
        }
    }
    Some(target)
}

/// Decodes a native `HumanName` record (tag 8).
pub fn decode_human_name(arena: &NativeArena, at: NativeRef) -> Option<HumanName> {
    let view = arena.view(at)?;
    let mut target = HumanName::default();
    // use: usual | official | temp | nickname | anonymous | old | maiden
    if let Some(value) = layout::text_opt(&view, 8) {
        target.r#use = Some(Coded::from_literal(value));
    }
    if let Some(value) = layout::text_opt(&view, 20) {
        target.text = Some(Element::from(value));
    }
    if let Some(value) = layout::text_opt(&view, 32) {
        target.family = Some(Element::from(value));
    }
    let count = view.count(44);
    if count > 0 {
        if let Some(items) = view.array(48) {
            let mut values = Vec::with_capacity(count as usize);
            for index in 0..count {
                if let Some(value) = layout::text_opt(&items, index * 12) {
                    values.push(Element::from(value));
                }
            }
            if !values.is_empty() {
                target.given = Some(values);
            }
        }
    }
    let count = view.count(52);
    if count > 0 {
        if let Some(items) = view.array(56) {
            let mut values = Vec::with_capacity(count as usize);
            for index in 0..count {
                if let Some(value) = layout::text_opt(&items, index * 12) {
                    values.push(Element::from(value));
                }
            }
            if !values.is_empty() {
                target.prefix = Some(values);
            }
        }
    }
    for node in ext::nodes(arena, &view) {
        for item in node.items() {
            if let Some(extension) = decode_extension(arena, item) {
                match node.name() {
                    "use" => ext::attach(&mut target.r#use, extension),
                    "text" => ext::attach(&mut target.text, extension),
                    "family" => ext::attach(&mut target.family, extension),
                    "given" => ext::attach_item(&mut target.given, extension),
                    "prefix" => ext::attach_item(&mut target.prefix, extension),
                    _ => {}
                }
            }
        }
    }
    Some(target)
}

/// Decodes a native `Patient` record (tag 10).
pub fn decode_patient(arena: &NativeArena, at: NativeRef) -> Option<Patient> {
    let view = arena.view(at)?;
    let mut target = Patient::default();
    let count = view.count(8);
    if count > 0 {
        if let Some(items) = view.array(12) {
            let mut values = Vec::with_capacity(count as usize);
            for index in 0..count {
                if let Some(value) = decode_identifier(arena, items.reference(index * 4)) {
                    values.push(value);
                }
            }
            if !values.is_empty() {
                target.identifier = Some(values);
            }
        }
    }
    if let Some(value) = layout::opt_bool(&view, 16) {
        target.active = Some(Element::from(value));
    }
    let count = view.count(20);
    if count > 0 {
        if let Some(items) = view.array(24) {
            let mut values = Vec::with_capacity(count as usize);
            for index in 0..count {
                if let Some(value) = decode_human_name(arena, items.reference(index * 4)) {
                    values.push(value);
                }
            }
            if !values.is_empty() {
                target.name = Some(values);
            }
        }
    }
    // gender: male | female | other | unknown
    if let Some(value) = layout::text_opt(&view, 28) {
        target.gender = Some(Coded::from_literal(value));
    }
    if let Some(value) = layout::date(&view, 40) {
        target.birth_date = Some(Element::from(value));
    }
    match view.u32_at(72) {
        1 => {
            if let Some(value) = layout::opt_bool(&view, 56) {
                target.deceased_boolean = Some(Element::from(value));
            }
        }
        2 => {
            if let Some(value) = layout::date_time(&view, 56) {
                target.deceased_date_time = Some(Element::from(value));
            }
        }
        _ => {}
    }
    match view.u32_at(84) {
        1 => {
            if let Some(value) = layout::opt_bool(&view, 76) {
                target.multiple_birth_boolean = Some(Element::from(value));
            }
        }
        2 => {
            if let Some(value) = layout::opt_int(&view, 76) {
                target.multiple_birth_integer = Some(Element::from(value));
            }
        }
        _ => {}
    }
    if let Some(value) = decode_reference(arena, view.reference(88)) {
        target.managing_organization = Some(value);
    }
    for node in ext::nodes(arena, &view) {
        for item in node.items() {
            if let Some(extension) = decode_extension(arena, item) {
                match node.name() {
                    "identifier" => ext::attach_item(&mut target.identifier, extension),
                    "active" => ext::attach(&mut target.active, extension),
                    "name" => ext::attach_item(&mut target.name, extension),
                    "gender" => ext::attach(&mut target.gender, extension),
                    "birthDate" => ext::attach(&mut target.birth_date, extension),
                    "deceased" => {
                        let mut pending = Some(extension);
                        pending = pending
                            .and_then(|e| ext::attach_existing(&mut target.deceased_boolean, e));
                        let _ = pending
                            .and_then(|e| ext::attach_existing(&mut target.deceased_date_time, e));
                    }
                    "multipleBirth" => {
                        let mut pending = Some(extension);
                        pending = pending.and_then(|e| {
                            ext::attach_existing(&mut target.multiple_birth_boolean, e)
                        });
                        let _ = pending.and_then(|e| {
                            ext::attach_existing(&mut target.multiple_birth_integer, e)
                        });
                    }
                    "managingOrganization" => {
                        ext::attach(&mut target.managing_organization, extension)
                    }
                    _ => {}
                }
            }
        }
    }
    Some(target)
}

/// Decodes a native `Observation` record (tag 11).
pub fn decode_observation(arena: &NativeArena, at: NativeRef) -> Option<Observation> {
    let view = arena.view(at)?;
    let mut target = Observation::default();
    let count = view.count(8);
    if count > 0 {
        if let Some(items) = view.array(12) {
            let mut values = Vec::with_capacity(count as usize);
            for index in 0..count {
                if let Some(value) = decode_identifier(arena, items.reference(index * 4)) {
                    values.push(value);
                }
            }
            if !values.is_empty() {
                target.identifier = Some(values);
            }
        }
    }
    // status: registered | preliminary | final | amended | corrected | cancelled | entered-in-error | unknown
    if let Some(value) = layout::text_opt(&view, 16) {
        target.status = Some(Coded::from_literal(value));
    }
    let count = view.count(28);
    if count > 0 {
        if let Some(items) = view.array(32) {
            let mut values = Vec::with_capacity(count as usize);
            for index in 0..count {
                if let Some(value) = decode_codeable_concept(arena, items.reference(index * 4)) {
                    values.push(value);
                }
            }
            if !values.is_empty() {
                target.category = Some(values);
            }
        }
    }
    if let Some(value) = decode_codeable_concept(arena, view.reference(36)) {
        target.code = Some(value);
    }
    if let Some(value) = decode_reference(arena, view.reference(40)) {
        target.subject = Some(value);
    }
    match view.u32_at(60) {
        1 => {
            if let Some(value) = layout::date_time(&view, 44) {
                target.effective_date_time = Some(Element::from(value));
            }
        }
        2 => {
            if let Some(value) = decode_period(arena, view.reference(44)) {
                target.effective_period = Some(value);
            }
        }
        _ => {}
    }
    if let Some(value) = layout::instant(&view, 64) {
        target.issued = Some(Element::from(value));
    }
    match view.u32_at(92) {
        1 => {
            if let Some(value) = decode_quantity(arena, view.reference(80)) {
                target.value_quantity = Some(value);
            }
        }
        2 => {
            if let Some(value) = layout::text_opt(&view, 80) {
                target.value_string = Some(Element::from(value));
            }
        }
        3 => {
            if let Some(value) = layout::opt_bool(&view, 80) {
                target.value_boolean = Some(Element::from(value));
            }
        }
        4 => {
            if let Some(value) = layout::opt_int(&view, 80) {
                target.value_integer = Some(Element::from(value));
            }
        }
        _ => {}
    }
    let count = view.count(96);
    if count > 0 {
        if let Some(items) = view.array(100) {
            let mut values = Vec::with_capacity(count as usize);
            for index in 0..count {
                if let Some(value) = decode_reference(arena, items.reference(index * 4)) {
                    values.push(value);
                }
            }
            if !values.is_empty() {
                target.performer = Some(values);
            }
        }
    }
    for node in ext::nodes(arena, &view) {
        for item in node.items() {
            if let Some(extension) = decode_extension(arena, item) {
                match node.name() {
                    "identifier" => ext::attach_item(&mut target.identifier, extension),
                    "status" => ext::attach(&mut target.status, extension),
                    "category" => ext::attach_item(&mut target.category, extension),
                    "code" => ext::attach(&mut target.code, extension),
                    "subject" => ext::attach(&mut target.subject, extension),
                    "effective" => {
                        let mut pending = Some(extension);
                        pending = pending
                            .and_then(|e| ext::attach_existing(&mut target.effective_date_time, e));
                        let _ = pending
                            .and_then(|e| ext::attach_existing(&mut target.effective_period, e));
                    }
                    "issued" => ext::attach(&mut target.issued, extension),
                    "value" => {
                        let mut pending = Some(extension);
                        pending = pending
                            .and_then(|e| ext::attach_existing(&mut target.value_quantity, e));
                        pending = pending
                            .and_then(|e| ext::attach_existing(&mut target.value_string, e));
                        pending = pending
                            .and_then(|e| ext::attach_existing(&mut target.value_boolean, e));
                        let _ = pending
                            .and_then(|e| ext::attach_existing(&mut target.value_integer, e));
                    }
                    "performer" => ext::attach_item(&mut target.performer, extension),
                    _ => {}
                }
            }
        }
    }
    Some(target)
}

/// Decodes a native `AllergyIntolerance` record (tag 12).
pub fn decode_allergy_intolerance(
    arena: &NativeArena,
    at: NativeRef,
) -> Option<AllergyIntolerance> {
    let view = arena.view(at)?;
    let mut target = AllergyIntolerance::default();
    if let Some(value) = decode_codeable_concept(arena, view.reference(8)) {
        target.clinical_status = Some(value);
    }
    if let Some(value) = decode_codeable_concept(arena, view.reference(12)) {
        target.verification_status = Some(value);
    }
    // category: food | medication | environment | biologic
    let count = view.count(16);
    if count > 0 {
        if let Some(items) = view.array(20) {
            let mut values = Vec::with_capacity(count as usize);
            for index in 0..count {
                if let Some(value) = layout::text_opt(&items, index * 12) {
                    values.push(Coded::from_literal(value));
                }
            }
            if !values.is_empty() {
                target.category = Some(values);
            }
        }
    }
    // criticality: low | high | unable-to-assess
    if let Some(value) = layout::text_opt(&view, 24) {
        target.criticality = Some(Coded::from_literal(value));
    }
    if let Some(value) = decode_codeable_concept(arena, view.reference(36)) {
        target.code = Some(value);
    }
    if let Some(value) = decode_reference(arena, view.reference(40)) {
        target.patient = Some(value);
    }
    match view.u32_at(60) {
        1 => {
            if let Some(value) = layout::date_time(&view, 44) {
                target.onset_date_time = Some(Element::from(value));
            }
        }
        2 => {
            if let Some(value) = decode_period(arena, view.reference(44)) {
                target.onset_period = Some(value);
            }
        }
        3 => {
            if let Some(value) = layout::text_opt(&view, 44) {
                target.onset_string = Some(Element::from(value));
            }
        }
        _ => {}
    }
    if let Some(value) = layout::date_time(&view, 64) {
        target.recorded_date = Some(Element::from(value));
    }
    for node in ext::nodes(arena, &view) {
        for item in node.items() {
            if let Some(extension) = decode_extension(arena, item) {
                match node.name() {
                    "clinicalStatus" => ext::attach(&mut target.clinical_status, extension),
                    "verificationStatus" => {
                        ext::attach(&mut target.verification_status, extension)
                    }
                    "category" => ext::attach_item(&mut target.category, extension),
                    "criticality" => ext::attach(&mut target.criticality, extension),
                    "code" => ext::attach(&mut target.code, extension),
                    "patient" => ext::attach(&mut target.patient, extension),
                    "onset" => {
                        let mut pending = Some(extension);
                        pending = pending
                            .and_then(|e| ext::attach_existing(&mut target.onset_date_time, e));
                        pending = pending
                            .and_then(|e| ext::attach_existing(&mut target.onset_period, e));
                        let _ = pending
                            .and_then(|e| ext::attach_existing(&mut target.onset_string, e));
                    }
                    "recordedDate" => ext::attach(&mut target.recorded_date, extension),
                    _ => {}
                }
            }
        }
    }
    Some(target)
}

/// Decodes the root record of an arena into a domain resource.
///
/// Returns `Ok(None)` for the null reference and an error when the root
/// record's tag matches no known resource.
pub fn decode_resource(
    arena: &NativeArena,
    at: NativeRef,
) -> Result<Option<Resource>, DecodeError> {
    let Some(view) = arena.view(at) else {
        return Ok(None);
    };
    match view.tag() {
        10 => Ok(decode_patient(arena, at).map(Resource::Patient)),
        11 => Ok(decode_observation(arena, at).map(Resource::Observation)),
        12 => Ok(decode_allergy_intolerance(arena, at).map(Resource::AllergyIntolerance)),
        tag => Err(DecodeError::UnknownTag { tag }),
    }
}
