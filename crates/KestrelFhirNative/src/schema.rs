//! Descriptor tables for every record layout the native parser produces.
//!
//! The generator crate introspects these tables to build its mapping plans,
//! and the tests use them to assemble well-formed arenas without repeating
//! offsets by hand. Offsets are relative to the record base; every record
//! starts with the common header (type tag, then extension anchor).

use crate::layout::WrapperKind;

/// Shape of one field inside a native record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldShape {
    /// The `u32` type tag at the start of every record.
    Tag,
    /// The extension side-channel anchor reference.
    ExtensionAnchor,
    /// An inline nullable primitive wrapper.
    Wrapper(WrapperKind),
    /// A nullable reference to another record, named by native type.
    Record(&'static str),
    /// A `u32` element count for the array field that follows it.
    Count,
    /// A reference to a packed array of inline wrappers.
    WrapperArray(WrapperKind),
    /// A reference to a packed array of record references.
    RecordArray(&'static str),
    /// An inline union region; the active variant is named by the
    /// discriminant field that follows.
    Union(&'static [VariantShape]),
    /// The `u32` discriminant for the union that precedes it (0 = none).
    Discriminant,
}

/// Payload shape of one union variant, laid out at the union base offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariantKind {
    Wrapper(WrapperKind),
    Record(&'static str),
}

/// One variant of a choice-typed field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VariantShape {
    /// Discriminant value selecting this variant.
    pub discriminant: u32,
    /// Element name of the materialized variant, e.g. `deceasedBoolean`.
    pub name: &'static str,
    pub kind: VariantKind,
}

impl VariantKind {
    pub fn size(self) -> u32 {
        match self {
            VariantKind::Wrapper(kind) => kind.size(),
            VariantKind::Record(_) => 4,
        }
    }
}

/// One field of a native record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NativeFieldDescriptor {
    /// Native field name.
    pub name: &'static str,
    /// Element name in the domain model, when this field carries data.
    /// Header, count, and discriminant fields have none.
    pub element: Option<&'static str>,
    pub shape: FieldShape,
    /// Byte offset relative to the record base.
    pub offset: u32,
}

/// One native record type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NativeTypeDescriptor {
    pub name: &'static str,
    /// Type tag stored in the record header.
    pub tag: u32,
    /// Total record size in bytes.
    pub size: u32,
    pub fields: &'static [NativeFieldDescriptor],
}

impl FieldShape {
    /// In-record size of this field, in bytes.
    pub fn size(self) -> u32 {
        match self {
            FieldShape::Tag
            | FieldShape::ExtensionAnchor
            | FieldShape::Record(_)
            | FieldShape::Count
            | FieldShape::WrapperArray(_)
            | FieldShape::RecordArray(_)
            | FieldShape::Discriminant => 4,
            FieldShape::Wrapper(kind) => kind.size(),
            FieldShape::Union(variants) => variants
                .iter()
                .map(|variant| variant.kind.size())
                .max()
                .unwrap_or(0),
        }
    }
}

impl NativeTypeDescriptor {
    /// Looks up a field by native name.
    pub fn field(&self, name: &str) -> Option<&NativeFieldDescriptor> {
        self.fields.iter().find(|field| field.name == name)
    }
}

macro_rules! field {
    ($name:expr, $element:expr, $shape:expr, $offset:expr) => {
        NativeFieldDescriptor {
            name: $name,
            element: $element,
            shape: $shape,
            offset: $offset,
        }
    };
}

use FieldShape::*;
use WrapperKind::{DateTime, OptBool, OptInt, Text, TextOpt};

const EXTENSION_VALUE: &[VariantShape] = &[
    VariantShape { discriminant: 1, name: "valueString", kind: VariantKind::Wrapper(TextOpt) },
    VariantShape { discriminant: 2, name: "valueBoolean", kind: VariantKind::Wrapper(OptBool) },
    VariantShape { discriminant: 3, name: "valueInteger", kind: VariantKind::Wrapper(OptInt) },
    VariantShape { discriminant: 4, name: "valueCoding", kind: VariantKind::Record("Coding") },
];

const EXTENSION_FIELDS: &[NativeFieldDescriptor] = &[
    field!("tag", None, Tag, 0),
    field!("extensions", None, ExtensionAnchor, 4),
    field!("url", Some("url"), Wrapper(Text), 8),
    field!("value", Some("value"), Union(EXTENSION_VALUE), 16),
    field!("valueKind", None, Discriminant, 28),
];

const CODING_FIELDS: &[NativeFieldDescriptor] = &[
    field!("tag", None, Tag, 0),
    field!("extensions", None, ExtensionAnchor, 4),
    field!("system", Some("system"), Wrapper(TextOpt), 8),
    field!("version", Some("version"), Wrapper(TextOpt), 20),
    field!("code", Some("code"), Wrapper(TextOpt), 32),
    field!("display", Some("display"), Wrapper(TextOpt), 44),
    field!("userSelected", Some("userSelected"), Wrapper(OptBool), 56),
];

const CODEABLE_CONCEPT_FIELDS: &[NativeFieldDescriptor] = &[
    field!("tag", None, Tag, 0),
    field!("extensions", None, ExtensionAnchor, 4),
    field!("codingCount", None, Count, 8),
    field!("coding", Some("coding"), RecordArray("Coding"), 12),
    field!("text", Some("text"), Wrapper(TextOpt), 16),
];

const QUANTITY_FIELDS: &[NativeFieldDescriptor] = &[
    field!("tag", None, Tag, 0),
    field!("extensions", None, ExtensionAnchor, 4),
    field!("value", Some("value"), Wrapper(TextOpt), 8),
    field!("comparator", Some("comparator"), Wrapper(TextOpt), 20),
    field!("unit", Some("unit"), Wrapper(TextOpt), 32),
    field!("system", Some("system"), Wrapper(TextOpt), 44),
    field!("code", Some("code"), Wrapper(TextOpt), 56),
];

const REFERENCE_FIELDS: &[NativeFieldDescriptor] = &[
    field!("tag", None, Tag, 0),
    field!("extensions", None, ExtensionAnchor, 4),
    field!("reference", Some("reference"), Wrapper(TextOpt), 8),
    field!("type", Some("type"), Wrapper(TextOpt), 20),
    field!("identifier", Some("identifier"), Record("Identifier"), 32),
    field!("display", Some("display"), Wrapper(TextOpt), 36),
];

const PERIOD_FIELDS: &[NativeFieldDescriptor] = &[
    field!("tag", None, Tag, 0),
    field!("extensions", None, ExtensionAnchor, 4),
    field!("start", Some("start"), Wrapper(DateTime), 8),
    field!("end", Some("end"), Wrapper(DateTime), 24),
];

const IDENTIFIER_FIELDS: &[NativeFieldDescriptor] = &[
    field!("tag", None, Tag, 0),
    field!("extensions", None, ExtensionAnchor, 4),
    field!("use", Some("use"), Wrapper(TextOpt), 8),
    field!("type", Some("type"), Record("CodeableConcept"), 20),
    field!("system", Some("system"), Wrapper(TextOpt), 24),
    field!("value", Some("value"), Wrapper(TextOpt), 36),
    field!("period", Some("period"), Record("Period"), 48),
];

const HUMAN_NAME_FIELDS: &[NativeFieldDescriptor] = &[
    field!("tag", None, Tag, 0),
    field!("extensions", None, ExtensionAnchor, 4),
    field!("use", Some("use"), Wrapper(TextOpt), 8),
    field!("text", Some("text"), Wrapper(TextOpt), 20),
    field!("family", Some("family"), Wrapper(TextOpt), 32),
    field!("givenCount", None, Count, 44),
    field!("given", Some("given"), WrapperArray(TextOpt), 48),
    field!("prefixCount", None, Count, 52),
    field!("prefix", Some("prefix"), WrapperArray(TextOpt), 56),
];

const PATIENT_DECEASED: &[VariantShape] = &[
    VariantShape { discriminant: 1, name: "deceasedBoolean", kind: VariantKind::Wrapper(OptBool) },
    VariantShape { discriminant: 2, name: "deceasedDateTime", kind: VariantKind::Wrapper(DateTime) },
];

const PATIENT_MULTIPLE_BIRTH: &[VariantShape] = &[
    VariantShape { discriminant: 1, name: "multipleBirthBoolean", kind: VariantKind::Wrapper(OptBool) },
    VariantShape { discriminant: 2, name: "multipleBirthInteger", kind: VariantKind::Wrapper(OptInt) },
];

const PATIENT_FIELDS: &[NativeFieldDescriptor] = &[
    field!("tag", None, Tag, 0),
    field!("extensions", None, ExtensionAnchor, 4),
    field!("identifierCount", None, Count, 8),
    field!("identifier", Some("identifier"), RecordArray("Identifier"), 12),
    field!("active", Some("active"), Wrapper(OptBool), 16),
    field!("nameCount", None, Count, 20),
    field!("name", Some("name"), RecordArray("HumanName"), 24),
    field!("gender", Some("gender"), Wrapper(TextOpt), 28),
    field!("birthDate", Some("birthDate"), Wrapper(DateTime), 40),
    field!("deceased", Some("deceased"), Union(PATIENT_DECEASED), 56),
    field!("deceasedKind", None, Discriminant, 72),
    field!("multipleBirth", Some("multipleBirth"), Union(PATIENT_MULTIPLE_BIRTH), 76),
    field!("multipleBirthKind", None, Discriminant, 84),
    field!("managingOrganization", Some("managingOrganization"), Record("Reference"), 88),
];

const OBSERVATION_EFFECTIVE: &[VariantShape] = &[
    VariantShape { discriminant: 1, name: "effectiveDateTime", kind: VariantKind::Wrapper(DateTime) },
    VariantShape { discriminant: 2, name: "effectivePeriod", kind: VariantKind::Record("Period") },
];

const OBSERVATION_VALUE: &[VariantShape] = &[
    VariantShape { discriminant: 1, name: "valueQuantity", kind: VariantKind::Record("Quantity") },
    VariantShape { discriminant: 2, name: "valueString", kind: VariantKind::Wrapper(TextOpt) },
    VariantShape { discriminant: 3, name: "valueBoolean", kind: VariantKind::Wrapper(OptBool) },
    VariantShape { discriminant: 4, name: "valueInteger", kind: VariantKind::Wrapper(OptInt) },
];

const OBSERVATION_FIELDS: &[NativeFieldDescriptor] = &[
    field!("tag", None, Tag, 0),
    field!("extensions", None, ExtensionAnchor, 4),
    field!("identifierCount", None, Count, 8),
    field!("identifier", Some("identifier"), RecordArray("Identifier"), 12),
    field!("status", Some("status"), Wrapper(TextOpt), 16),
    field!("categoryCount", None, Count, 28),
    field!("category", Some("category"), RecordArray("CodeableConcept"), 32),
    field!("code", Some("code"), Record("CodeableConcept"), 36),
    field!("subject", Some("subject"), Record("Reference"), 40),
    field!("effective", Some("effective"), Union(OBSERVATION_EFFECTIVE), 44),
    field!("effectiveKind", None, Discriminant, 60),
    field!("issued", Some("issued"), Wrapper(DateTime), 64),
    field!("value", Some("value"), Union(OBSERVATION_VALUE), 80),
    field!("valueKind", None, Discriminant, 92),
    field!("performerCount", None, Count, 96),
    field!("performer", Some("performer"), RecordArray("Reference"), 100),
];

const ALLERGY_ONSET: &[VariantShape] = &[
    VariantShape { discriminant: 1, name: "onsetDateTime", kind: VariantKind::Wrapper(DateTime) },
    VariantShape { discriminant: 2, name: "onsetPeriod", kind: VariantKind::Record("Period") },
    VariantShape { discriminant: 3, name: "onsetString", kind: VariantKind::Wrapper(TextOpt) },
];

const ALLERGY_INTOLERANCE_FIELDS: &[NativeFieldDescriptor] = &[
    field!("tag", None, Tag, 0),
    field!("extensions", None, ExtensionAnchor, 4),
    field!("clinicalStatus", Some("clinicalStatus"), Record("CodeableConcept"), 8),
    field!("verificationStatus", Some("verificationStatus"), Record("CodeableConcept"), 12),
    field!("categoryCount", None, Count, 16),
    field!("category", Some("category"), WrapperArray(TextOpt), 20),
    field!("criticality", Some("criticality"), Wrapper(TextOpt), 24),
    field!("code", Some("code"), Record("CodeableConcept"), 36),
    field!("patient", Some("patient"), Record("Reference"), 40),
    field!("onset", Some("onset"), Union(ALLERGY_ONSET), 44),
    field!("onsetKind", None, Discriminant, 60),
    field!("recordedDate", Some("recordedDate"), Wrapper(DateTime), 64),
];

/// Every native record type, in generation order: shared complex types
/// first, then resources.
pub const NATIVE_TYPES: &[NativeTypeDescriptor] = &[
    NativeTypeDescriptor { name: "Extension", tag: 1, size: 32, fields: EXTENSION_FIELDS },
    NativeTypeDescriptor { name: "Coding", tag: 2, size: 60, fields: CODING_FIELDS },
    NativeTypeDescriptor { name: "CodeableConcept", tag: 3, size: 28, fields: CODEABLE_CONCEPT_FIELDS },
    NativeTypeDescriptor { name: "Quantity", tag: 4, size: 68, fields: QUANTITY_FIELDS },
    NativeTypeDescriptor { name: "Reference", tag: 5, size: 48, fields: REFERENCE_FIELDS },
    NativeTypeDescriptor { name: "Period", tag: 6, size: 40, fields: PERIOD_FIELDS },
    NativeTypeDescriptor { name: "Identifier", tag: 7, size: 52, fields: IDENTIFIER_FIELDS },
    NativeTypeDescriptor { name: "HumanName", tag: 8, size: 60, fields: HUMAN_NAME_FIELDS },
    NativeTypeDescriptor { name: "Patient", tag: 10, size: 92, fields: PATIENT_FIELDS },
    NativeTypeDescriptor { name: "Observation", tag: 11, size: 104, fields: OBSERVATION_FIELDS },
    NativeTypeDescriptor { name: "AllergyIntolerance", tag: 12, size: 80, fields: ALLERGY_INTOLERANCE_FIELDS },
];

/// Looks up a native type by name.
pub fn native_type(name: &str) -> Option<&'static NativeTypeDescriptor> {
    NATIVE_TYPES.iter().find(|ty| ty.name == name)
}

/// Looks up a native type by record tag.
pub fn native_type_by_tag(tag: u32) -> Option<&'static NativeTypeDescriptor> {
    NATIVE_TYPES.iter().find(|ty| ty.tag == tag)
}
