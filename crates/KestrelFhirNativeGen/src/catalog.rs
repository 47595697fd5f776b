//! Catalog of the domain object model the decoders are generated against.
//!
//! Each domain type lists its properties with their Rust field names, their
//! shapes, and the FHIR release they first appeared in. Choice (`value[x]`)
//! elements are listed separately with their variants. Code system bindings
//! reference the literal tables declared in `kestrel-fhir-lib`, so the
//! generated literal comments can never drift from the model.

use kestrel_fhir_lib::codes::{
    AdministrativeGender, AllergyCategory, AllergyCriticality, CodeEnum, IdentifierUse, NameUse,
    ObservationStatus, QuantityComparator,
};
use kestrel_fhir_lib::FhirVersion;

/// Primitive value kinds a property can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Bool,
    Int,
    Str,
    Decimal,
    Date,
    DateTime,
    Instant,
    Time,
}

impl ValueKind {
    pub fn name(self) -> &'static str {
        match self {
            ValueKind::Bool => "boolean",
            ValueKind::Int => "integer",
            ValueKind::Str => "string",
            ValueKind::Decimal => "decimal",
            ValueKind::Date => "date",
            ValueKind::DateTime => "dateTime",
            ValueKind::Instant => "instant",
            ValueKind::Time => "time",
        }
    }
}

/// A code system binding: the enumeration name plus its declared literals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodeBinding {
    pub enumeration: &'static str,
    pub literals: &'static [&'static str],
}

/// Shape of one domain property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyType {
    /// An `Element`-wrapped primitive (the nullable-unwrappable case).
    Element(ValueKind),
    /// A bare primitive with no element container, e.g. `Extension.url`.
    Scalar(ValueKind),
    /// A `Coded` value bound to a code system enumeration.
    Coded(&'static CodeBinding),
    /// A nested complex type, named by its native type.
    Record(&'static str),
    /// A repeated property.
    List(&'static PropertyType),
}

/// One property of a domain type.
#[derive(Debug, Clone, Copy)]
pub struct Property {
    /// Element name on the wire, e.g. `birthDate`.
    pub name: &'static str,
    /// Rust field name on the domain struct, e.g. `birth_date`.
    pub field: &'static str,
    pub ty: PropertyType,
    /// First FHIR release carrying this property.
    pub since: FhirVersion,
}

/// One variant of a choice element.
#[derive(Debug, Clone, Copy)]
pub struct ChoiceVariant {
    /// Materialized element name, e.g. `deceasedBoolean`.
    pub name: &'static str,
    /// Rust field name, e.g. `deceased_boolean`.
    pub field: &'static str,
    pub ty: PropertyType,
}

/// A choice (`[x]`) element with its variants, in declaration order.
#[derive(Debug, Clone, Copy)]
pub struct Choice {
    /// Base element name, e.g. `deceased`.
    pub name: &'static str,
    pub variants: &'static [ChoiceVariant],
    pub since: FhirVersion,
}

/// One domain type the generator can target.
#[derive(Debug, Clone, Copy)]
pub struct DomainType {
    pub name: &'static str,
    pub properties: &'static [Property],
    pub choices: &'static [Choice],
}

impl DomainType {
    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.name == name)
    }

    pub fn choice(&self, name: &str) -> Option<&Choice> {
        self.choices.iter().find(|c| c.name == name)
    }
}

pub const ADMINISTRATIVE_GENDER: CodeBinding = CodeBinding {
    enumeration: AdministrativeGender::NAME,
    literals: AdministrativeGender::LITERALS,
};
pub const OBSERVATION_STATUS: CodeBinding = CodeBinding {
    enumeration: ObservationStatus::NAME,
    literals: ObservationStatus::LITERALS,
};
pub const NAME_USE: CodeBinding = CodeBinding {
    enumeration: NameUse::NAME,
    literals: NameUse::LITERALS,
};
pub const IDENTIFIER_USE: CodeBinding = CodeBinding {
    enumeration: IdentifierUse::NAME,
    literals: IdentifierUse::LITERALS,
};
pub const QUANTITY_COMPARATOR: CodeBinding = CodeBinding {
    enumeration: QuantityComparator::NAME,
    literals: QuantityComparator::LITERALS,
};
pub const ALLERGY_CATEGORY: CodeBinding = CodeBinding {
    enumeration: AllergyCategory::NAME,
    literals: AllergyCategory::LITERALS,
};
pub const ALLERGY_CRITICALITY: CodeBinding = CodeBinding {
    enumeration: AllergyCriticality::NAME,
    literals: AllergyCriticality::LITERALS,
};

macro_rules! prop {
    ($name:expr, $field:expr, $ty:expr) => {
        Property {
            name: $name,
            field: $field,
            ty: $ty,
            since: FhirVersion::R4,
        }
    };
    ($name:expr, $field:expr, $ty:expr, since $version:expr) => {
        Property {
            name: $name,
            field: $field,
            ty: $ty,
            since: $version,
        }
    };
}

macro_rules! variant {
    ($name:expr, $field:expr, $ty:expr) => {
        ChoiceVariant {
            name: $name,
            field: $field,
            ty: $ty,
        }
    };
}

use PropertyType::*;
use ValueKind::{Bool, Date, DateTime, Decimal, Instant, Int, Str};

const EXTENSION: DomainType = DomainType {
    name: "Extension",
    properties: &[prop!("url", "url", Scalar(Str))],
    choices: &[Choice {
        name: "value",
        variants: &[
            variant!("valueString", "value_string", Element(Str)),
            variant!("valueBoolean", "value_boolean", Element(Bool)),
            variant!("valueInteger", "value_integer", Element(Int)),
            variant!("valueCoding", "value_coding", Record("Coding")),
        ],
        since: FhirVersion::R4,
    }],
};

const CODING: DomainType = DomainType {
    name: "Coding",
    properties: &[
        prop!("system", "system", Element(Str)),
        prop!("version", "version", Element(Str)),
        prop!("code", "code", Element(Str)),
        prop!("display", "display", Element(Str)),
        prop!("userSelected", "user_selected", Element(Bool)),
    ],
    choices: &[],
};

const CODEABLE_CONCEPT: DomainType = DomainType {
    name: "CodeableConcept",
    properties: &[
        prop!("coding", "coding", List(&Record("Coding"))),
        prop!("text", "text", Element(Str)),
    ],
    choices: &[],
};

const QUANTITY: DomainType = DomainType {
    name: "Quantity",
    properties: &[
        prop!("value", "value", Element(Decimal)),
        prop!("comparator", "comparator", Coded(&QUANTITY_COMPARATOR)),
        prop!("unit", "unit", Element(Str)),
        prop!("system", "system", Element(Str)),
        prop!("code", "code", Element(Str)),
    ],
    choices: &[],
};

const REFERENCE: DomainType = DomainType {
    name: "Reference",
    properties: &[
        prop!("reference", "reference", Element(Str)),
        prop!("type", "r#type", Element(Str)),
        prop!("identifier", "identifier", Record("Identifier")),
        prop!("display", "display", Element(Str)),
    ],
    choices: &[],
};

const PERIOD: DomainType = DomainType {
    name: "Period",
    properties: &[
        prop!("start", "start", Element(DateTime)),
        prop!("end", "end", Element(DateTime)),
    ],
    choices: &[],
};

const IDENTIFIER: DomainType = DomainType {
    name: "Identifier",
    properties: &[
        prop!("use", "r#use", Coded(&IDENTIFIER_USE)),
        prop!("type", "r#type", Record("CodeableConcept")),
        prop!("system", "system", Element(Str)),
        prop!("value", "value", Element(Str)),
        prop!("period", "period", Record("Period")),
    ],
    choices: &[],
};

const HUMAN_NAME: DomainType = DomainType {
    name: "HumanName",
    properties: &[
        prop!("use", "r#use", Coded(&NAME_USE)),
        prop!("text", "text", Element(Str)),
        prop!("family", "family", Element(Str)),
        prop!("given", "given", List(&Element(Str))),
        prop!("prefix", "prefix", List(&Element(Str))),
    ],
    choices: &[],
};

const PATIENT: DomainType = DomainType {
    name: "Patient",
    properties: &[
        prop!("identifier", "identifier", List(&Record("Identifier"))),
        prop!("active", "active", Element(Bool)),
        prop!("name", "name", List(&Record("HumanName"))),
        prop!("gender", "gender", Coded(&ADMINISTRATIVE_GENDER)),
        prop!("birthDate", "birth_date", Element(Date)),
        prop!("managingOrganization", "managing_organization", Record("Reference")),
    ],
    choices: &[
        Choice {
            name: "deceased",
            variants: &[
                variant!("deceasedBoolean", "deceased_boolean", Element(Bool)),
                variant!("deceasedDateTime", "deceased_date_time", Element(DateTime)),
            ],
            since: FhirVersion::R4,
        },
        Choice {
            name: "multipleBirth",
            variants: &[
                variant!("multipleBirthBoolean", "multiple_birth_boolean", Element(Bool)),
                variant!("multipleBirthInteger", "multiple_birth_integer", Element(Int)),
            ],
            since: FhirVersion::R4,
        },
    ],
};

const OBSERVATION: DomainType = DomainType {
    name: "Observation",
    properties: &[
        prop!("identifier", "identifier", List(&Record("Identifier"))),
        prop!("status", "status", Coded(&OBSERVATION_STATUS)),
        prop!("category", "category", List(&Record("CodeableConcept"))),
        prop!("code", "code", Record("CodeableConcept")),
        prop!("subject", "subject", Record("Reference")),
        prop!("issued", "issued", Element(Instant)),
        prop!("performer", "performer", List(&Record("Reference"))),
        // R5 adds Observation.bodyStructure; the R4 native schema has no
        // field for it, so it must be version-filtered out.
        prop!("bodyStructure", "body_structure", Record("Reference"), since FhirVersion::R5),
    ],
    choices: &[
        Choice {
            name: "effective",
            variants: &[
                variant!("effectiveDateTime", "effective_date_time", Element(DateTime)),
                variant!("effectivePeriod", "effective_period", Record("Period")),
            ],
            since: FhirVersion::R4,
        },
        Choice {
            name: "value",
            variants: &[
                variant!("valueQuantity", "value_quantity", Record("Quantity")),
                variant!("valueString", "value_string", Element(Str)),
                variant!("valueBoolean", "value_boolean", Element(Bool)),
                variant!("valueInteger", "value_integer", Element(Int)),
            ],
            since: FhirVersion::R4,
        },
    ],
};

const ALLERGY_INTOLERANCE: DomainType = DomainType {
    name: "AllergyIntolerance",
    properties: &[
        prop!("clinicalStatus", "clinical_status", Record("CodeableConcept")),
        prop!("verificationStatus", "verification_status", Record("CodeableConcept")),
        prop!("category", "category", List(&Coded(&ALLERGY_CATEGORY))),
        prop!("criticality", "criticality", Coded(&ALLERGY_CRITICALITY)),
        prop!("code", "code", Record("CodeableConcept")),
        prop!("patient", "patient", Record("Reference")),
        prop!("recordedDate", "recorded_date", Element(DateTime)),
    ],
    choices: &[Choice {
        name: "onset",
        variants: &[
            variant!("onsetDateTime", "onset_date_time", Element(DateTime)),
            variant!("onsetPeriod", "onset_period", Record("Period")),
            variant!("onsetString", "onset_string", Element(Str)),
        ],
        since: FhirVersion::R4,
    }],
};

/// Every domain type, in the order decoders are emitted.
pub const DOMAIN_TYPES: &[DomainType] = &[
    EXTENSION,
    CODING,
    CODEABLE_CONCEPT,
    QUANTITY,
    REFERENCE,
    PERIOD,
    IDENTIFIER,
    HUMAN_NAME,
    PATIENT,
    OBSERVATION,
    ALLERGY_INTOLERANCE,
];

/// Looks up a domain type by name.
pub fn domain_type(name: &str) -> Option<&'static DomainType> {
    DOMAIN_TYPES.iter().find(|ty| ty.name == name)
}
