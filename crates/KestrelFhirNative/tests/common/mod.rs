#![allow(dead_code)]

//! Arena-building helpers for the decoding tests.
//!
//! Records are assembled against the schema descriptor tables, so the tests
//! never repeat a field offset by hand: every write looks the offset up by
//! native type and field name.

use kestrel_fhir_native::arena::{NativeArena, NativeRef};
use kestrel_fhir_native::ext::{
    NODE_COUNT_OFFSET, NODE_ITEMS_OFFSET, NODE_NAME_OFFSET, NODE_NEXT_OFFSET, NODE_SIZE,
};
use kestrel_fhir_native::layout::{precision, RECORD_EXT_OFFSET};
use kestrel_fhir_native::schema::{self, FieldShape, NativeTypeDescriptor};

fn descriptor(type_name: &str) -> &'static NativeTypeDescriptor {
    schema::native_type(type_name).unwrap()
}

fn offset_of(type_name: &str, field: &str) -> u32 {
    descriptor(type_name).field(field).unwrap().offset
}

/// Allocates a record of the named type with its tag written.
pub fn new_record(arena: &mut NativeArena, type_name: &str) -> NativeRef {
    let ty = descriptor(type_name);
    let record = arena.alloc(ty.size);
    arena.write(record.0, &ty.tag.to_le_bytes());
    record
}

/// Writes a `TextOpt` wrapper at an absolute arena address.
pub fn write_text_opt_at(arena: &mut NativeArena, at: u32, value: &str) {
    let span = arena.push_bytes(value.as_bytes());
    arena.write(at, &span.to_le_bytes());
    arena.write(at + 4, &(value.len() as u32).to_le_bytes());
    arena.write(at + 8, &1u32.to_le_bytes());
}

/// Writes a bare `Text` span at an absolute arena address.
pub fn write_text_at(arena: &mut NativeArena, at: u32, value: &str) {
    let span = arena.push_bytes(value.as_bytes());
    arena.write(at, &span.to_le_bytes());
    arena.write(at + 4, &(value.len() as u32).to_le_bytes());
}

/// Writes an `OptBool` wrapper at an absolute arena address.
pub fn write_bool_at(arena: &mut NativeArena, at: u32, value: bool) {
    arena.write(at, &[1, value as u8]);
}

/// Writes an `OptInt` wrapper at an absolute arena address.
pub fn write_int_at(arena: &mut NativeArena, at: u32, value: i32) {
    arena.write(at, &1u32.to_le_bytes());
    arena.write(at + 4, &value.to_le_bytes());
}

/// Writes a record reference at an absolute arena address.
pub fn write_ref_at(arena: &mut NativeArena, at: u32, target: NativeRef) {
    arena.write(at, &target.0.to_le_bytes());
}

/// Packed date/time components for [`write_packed_at`].
#[derive(Debug, Clone, Copy)]
pub struct Packed {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
    pub precision: u8,
    pub milli: u16,
    pub tz_sign: i8,
    pub tz_hour: u8,
    pub tz_minute: u8,
}

impl Packed {
    pub fn date(year: u16, month: u8, day: u8) -> Self {
        Packed {
            year,
            month,
            day,
            hour: 0,
            minute: 0,
            second: 0,
            precision: precision::DAY,
            milli: 0,
            tz_sign: 0,
            tz_hour: 0,
            tz_minute: 0,
        }
    }

    pub fn year(year: u16) -> Self {
        Packed {
            precision: precision::YEAR,
            ..Packed::date(year, 0, 0)
        }
    }

    pub fn second_utc(year: u16, month: u8, day: u8, hour: u8, minute: u8, second: u8) -> Self {
        Packed {
            hour,
            minute,
            second,
            precision: precision::SECOND,
            tz_sign: 1,
            ..Packed::date(year, month, day)
        }
    }
}

/// Writes a packed date/time wrapper at an absolute arena address.
pub fn write_packed_at(arena: &mut NativeArena, at: u32, packed: Packed) {
    arena.write(at, &packed.year.to_le_bytes());
    arena.write(at + 2, &[packed.month, packed.day, packed.hour, packed.minute]);
    arena.write(at + 6, &[packed.second, packed.precision]);
    arena.write(at + 8, &packed.milli.to_le_bytes());
    arena.write(at + 10, &[packed.tz_sign as u8, packed.tz_hour, packed.tz_minute]);
}

/// Sets a `TextOpt` field, looked up by name.
pub fn set_text(arena: &mut NativeArena, record: NativeRef, type_name: &str, field: &str, value: &str) {
    write_text_opt_at(arena, record.0 + offset_of(type_name, field), value);
}

/// Sets an `OptBool` field, looked up by name.
pub fn set_bool(arena: &mut NativeArena, record: NativeRef, type_name: &str, field: &str, value: bool) {
    write_bool_at(arena, record.0 + offset_of(type_name, field), value);
}

/// Sets an `OptInt` field, looked up by name.
pub fn set_int(arena: &mut NativeArena, record: NativeRef, type_name: &str, field: &str, value: i32) {
    write_int_at(arena, record.0 + offset_of(type_name, field), value);
}

/// Sets a record-reference field, looked up by name.
pub fn set_ref(arena: &mut NativeArena, record: NativeRef, type_name: &str, field: &str, target: NativeRef) {
    write_ref_at(arena, record.0 + offset_of(type_name, field), target);
}

/// Sets a packed date/time field, looked up by name.
pub fn set_packed(arena: &mut NativeArena, record: NativeRef, type_name: &str, field: &str, packed: Packed) {
    write_packed_at(arena, record.0 + offset_of(type_name, field), packed);
}

fn array_slots(type_name: &str, field: &str) -> (u32, u32) {
    let ty = descriptor(type_name);
    let index = ty.fields.iter().position(|f| f.name == field).unwrap();
    assert_eq!(ty.fields[index - 1].shape, FieldShape::Count);
    (ty.fields[index - 1].offset, ty.fields[index].offset)
}

/// Sets a record-array field from already-built records.
pub fn set_record_array(
    arena: &mut NativeArena,
    record: NativeRef,
    type_name: &str,
    field: &str,
    targets: &[NativeRef],
) {
    let (count_off, array_off) = array_slots(type_name, field);
    let items = arena.alloc(4 * targets.len() as u32);
    for (index, target) in targets.iter().enumerate() {
        arena.write(items.0 + 4 * index as u32, &target.0.to_le_bytes());
    }
    arena.write(record.0 + count_off, &(targets.len() as u32).to_le_bytes());
    arena.write(record.0 + array_off, &items.0.to_le_bytes());
}

/// Sets a `TextOpt`-array field from string values.
pub fn set_text_array(
    arena: &mut NativeArena,
    record: NativeRef,
    type_name: &str,
    field: &str,
    values: &[&str],
) {
    let (count_off, array_off) = array_slots(type_name, field);
    let items = arena.alloc(12 * values.len() as u32);
    for (index, value) in values.iter().enumerate() {
        write_text_opt_at(arena, items.0 + 12 * index as u32, value);
    }
    arena.write(record.0 + count_off, &(values.len() as u32).to_le_bytes());
    arena.write(record.0 + array_off, &items.0.to_le_bytes());
}

/// Selects a union variant by name, writing the discriminant and returning
/// the absolute address of the union payload.
pub fn select_variant(
    arena: &mut NativeArena,
    record: NativeRef,
    type_name: &str,
    field: &str,
    variant: &str,
) -> u32 {
    let ty = descriptor(type_name);
    let index = ty.fields.iter().position(|f| f.name == field).unwrap();
    let FieldShape::Union(variants) = ty.fields[index].shape else {
        panic!("{}.{} is not a union", type_name, field);
    };
    assert_eq!(ty.fields[index + 1].shape, FieldShape::Discriminant);
    let chosen = variants.iter().find(|v| v.name == variant).unwrap();
    arena.write(
        record.0 + ty.fields[index + 1].offset,
        &chosen.discriminant.to_le_bytes(),
    );
    record.0 + ty.fields[index].offset
}

/// Writes a raw discriminant value, bypassing the variant table.
pub fn set_discriminant(
    arena: &mut NativeArena,
    record: NativeRef,
    type_name: &str,
    union_field: &str,
    value: u32,
) {
    let ty = descriptor(type_name);
    let index = ty.fields.iter().position(|f| f.name == union_field).unwrap();
    arena.write(
        record.0 + ty.fields[index + 1].offset,
        &value.to_le_bytes(),
    );
}

/// Builds an `Extension` record with a string value.
pub fn string_extension(arena: &mut NativeArena, url: &str, value: &str) -> NativeRef {
    let record = new_record(arena, "Extension");
    write_text_at(arena, record.0 + offset_of("Extension", "url"), url);
    let payload = select_variant(arena, record, "Extension", "value", "valueString");
    write_text_opt_at(arena, payload, value);
    record
}

/// Prepends a side-channel node routing `extensions` to `element`.
pub fn attach_extensions(
    arena: &mut NativeArena,
    record: NativeRef,
    element: &str,
    extensions: &[NativeRef],
) {
    let node = arena.alloc(NODE_SIZE);
    write_text_at(arena, node.0 + NODE_NAME_OFFSET, element);
    let items = arena.alloc(4 * extensions.len() as u32);
    for (index, extension) in extensions.iter().enumerate() {
        arena.write(items.0 + 4 * index as u32, &extension.0.to_le_bytes());
    }
    arena.write(node.0 + NODE_COUNT_OFFSET, &(extensions.len() as u32).to_le_bytes());
    arena.write(node.0 + NODE_ITEMS_OFFSET, &items.0.to_le_bytes());
    let head = arena.u32_at(record.0 + RECORD_EXT_OFFSET);
    arena.write(node.0 + NODE_NEXT_OFFSET, &head.to_le_bytes());
    arena.write(record.0 + RECORD_EXT_OFFSET, &node.0.to_le_bytes());
}
