//! Rendering mapping plans into the decoding routines' source text.
//!
//! The emitter produces canonical source with one statement per line; the
//! generation pipeline runs the output through rustfmt before it is checked
//! in, so long lines may be re-wrapped there.

use std::fmt::Write;

use crate::dispatch;
use crate::extract::{ArmPayload, ExtensionRoute, MappingInfo, MemberMapping};

const HEADER: &str = "\
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
";

/// Renders the complete generated module: header, one decoding routine per
/// mapping, then root dispatch over the resource mappings.
pub fn emit_module(mappings: &[MappingInfo]) -> String {
    let mut out = String::from(HEADER);
    for mapping in mappings {
        out.push('\n');
        out.push_str(&emit_decoder(mapping));
    }
    out.push('\n');
    out.push_str(&dispatch::emit_dispatch(mappings));
    out
}

/// Renders the decoding routine for one mapping plan.
pub fn emit_decoder(mapping: &MappingInfo) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "/// Decodes a native `{}` record (tag {}).",
        mapping.domain, mapping.tag
    );
    let _ = writeln!(
        out,
        "pub fn {}(arena: &NativeArena, at: NativeRef) -> Option<{}> {{",
        mapping.decoder, mapping.domain
    );
    out.push_str("    let view = arena.view(at)?;\n");
    let _ = writeln!(out, "    let mut target = {}::default();", mapping.domain);
    for member in &mapping.members {
        emit_member(&mut out, member);
    }
    emit_routes(&mut out, &mapping.routes);
    out.push_str("    Some(target)\n}\n");
    out
}

/// The expression assigned from a read value, applying the constructor when
/// the conversion rule carries one.
fn value_expr(constructor: &Option<String>) -> String {
    match constructor {
        Some(constructor) => format!("{}(value)", constructor),
        None => "value".to_owned(),
    }
}

fn emit_member(out: &mut String, member: &MemberMapping) {
    match member {
        MemberMapping::Value {
            field,
            offset,
            reader,
            constructor,
            ..
        } => {
            let _ = writeln!(out, "    if let Some(value) = {}(&view, {}) {{", reader, offset);
            let _ = writeln!(
                out,
                "        target.{} = Some(Element::from({}));",
                field,
                value_expr(constructor)
            );
            out.push_str("    }\n");
        }
        MemberMapping::Code {
            element,
            field,
            offset,
            literals,
            ..
        } => {
            let _ = writeln!(out, "    // {}: {}", element, literals.join(" | "));
            let _ = writeln!(out, "    if let Some(value) = layout::text_opt(&view, {}) {{", offset);
            let _ = writeln!(out, "        target.{} = Some(Coded::from_literal(value));", field);
            out.push_str("    }\n");
        }
        MemberMapping::RawText { field, offset, .. } => {
            let _ = writeln!(out, "    if let Some(value) = layout::text(&view, {}) {{", offset);
            let _ = writeln!(out, "        target.{} = value;", field);
            out.push_str("    }\n");
        }
        MemberMapping::Record {
            field,
            offset,
            decoder,
            ..
        } => {
            let _ = writeln!(
                out,
                "    if let Some(value) = {}(arena, view.reference({})) {{",
                decoder, offset
            );
            let _ = writeln!(out, "        target.{} = Some(value);", field);
            out.push_str("    }\n");
        }
        MemberMapping::RecordList {
            field,
            count_offset,
            array_offset,
            decoder,
            ..
        } => {
            let item = format!("{}(arena, items.reference(index * 4))", decoder);
            emit_list(out, field, *count_offset, *array_offset, &item, "value");
        }
        MemberMapping::ValueList {
            field,
            count_offset,
            array_offset,
            stride,
            reader,
            constructor,
            ..
        } => {
            let item = format!("{}(&items, index * {})", reader, stride);
            let push = format!("Element::from({})", value_expr(constructor));
            emit_list(out, field, *count_offset, *array_offset, &item, &push);
        }
        MemberMapping::CodeList {
            element,
            field,
            count_offset,
            array_offset,
            stride,
            literals,
            ..
        } => {
            let _ = writeln!(out, "    // {}: {}", element, literals.join(" | "));
            let item = format!("layout::text_opt(&items, index * {})", stride);
            emit_list(
                out,
                field,
                *count_offset,
                *array_offset,
                &item,
                "Coded::from_literal(value)",
            );
        }
        MemberMapping::Choice {
            offset,
            discriminant_offset,
            arms,
            ..
        } => {
            let _ = writeln!(out, "    match view.u32_at({}) {{", discriminant_offset);
            for arm in arms {
                let _ = writeln!(out, "        {} => {{", arm.discriminant);
                match &arm.payload {
                    ArmPayload::Value {
                        reader,
                        constructor,
                    } => {
                        let _ = writeln!(
                            out,
                            "            if let Some(value) = {}(&view, {}) {{",
                            reader, offset
                        );
                        let _ = writeln!(
                            out,
                            "                target.{} = Some(Element::from({}));",
                            arm.field,
                            value_expr(constructor)
                        );
                    }
                    ArmPayload::Record { decoder } => {
                        let _ = writeln!(
                            out,
                            "            if let Some(value) = {}(arena, view.reference({})) {{",
                            decoder, offset
                        );
                        let _ = writeln!(
                            out,
                            "                target.{} = Some(value);",
                            arm.field
                        );
                    }
                }
                out.push_str("            }\n        }\n");
            }
            out.push_str("        _ => {}\n    }\n");
        }
    }
}

/// Shared shell for counted arrays: count check, item view, collect loop.
fn emit_list(
    out: &mut String,
    field: &str,
    count_offset: u32,
    array_offset: u32,
    item: &str,
    push: &str,
) {
    let _ = writeln!(out, "    let count = view.count({});", count_offset);
    out.push_str("    if count > 0 {\n");
    let _ = writeln!(out, "        if let Some(items) = view.array({}) {{", array_offset);
    out.push_str("            let mut values = Vec::with_capacity(count as usize);\n");
    out.push_str("            for index in 0..count {\n");
    let _ = writeln!(out, "                if let Some(value) = {} {{", item);
    let _ = writeln!(out, "                    values.push({});", push);
    out.push_str("                }\n            }\n");
    out.push_str("            if !values.is_empty() {\n");
    let _ = writeln!(out, "                target.{} = Some(values);", field);
    out.push_str("            }\n        }\n    }\n");
}

fn emit_routes(out: &mut String, routes: &[ExtensionRoute]) {
    out.push_str("    for node in ext::nodes(arena, &view) {\n");
    out.push_str("        for item in node.items() {\n");
    out.push_str("            if let Some(extension) = decode_extension(arena, item) {\n");
    out.push_str("                match node.name() {\n");
    for route in routes {
        match route {
            ExtensionRoute::Attach { element, field } => {
                let _ = writeln!(
                    out,
                    "                    \"{}\" => ext::attach(&mut target.{}, extension),",
                    element, field
                );
            }
            ExtensionRoute::AttachItem { element, field } => {
                let _ = writeln!(
                    out,
                    "                    \"{}\" => ext::attach_item(&mut target.{}, extension),",
                    element, field
                );
            }
            ExtensionRoute::Chain { element, fields } => {
                let _ = writeln!(out, "                    \"{}\" => {{", element);
                out.push_str("                        let mut pending = Some(extension);\n");
                for (index, field) in fields.iter().enumerate() {
                    let binding = if index + 1 == fields.len() {
                        "let _ = pending"
                    } else {
                        "pending = pending"
                    };
                    let _ = writeln!(
                        out,
                        "                        {}.and_then(|e| ext::attach_existing(&mut target.{}, e));",
                        binding, field
                    );
                }
                out.push_str("                    }\n");
            }
        }
    }
    out.push_str("                    _ => {}\n");
    out.push_str("                }\n            }\n        }\n    }\n");
}
