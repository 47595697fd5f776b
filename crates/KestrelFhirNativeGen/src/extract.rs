//! Schema extraction: pairing native record layouts with catalog types to
//! produce the mapping plans the emitters render.
//!
//! Extraction walks a native type's fields in layout order, resolves each
//! element-named field against the catalog (filtered by the target FHIR
//! release), and classifies the pairing through the conversion rule
//! registry. Anything that does not classify is an error here, never a
//! silently skipped field.

use kestrel_fhir_lib::FhirVersion;
use kestrel_fhir_native::layout::WrapperKind;
use kestrel_fhir_native::schema::{
    self, FieldShape, NativeFieldDescriptor, NativeTypeDescriptor, VariantKind, VariantShape,
};
use serde::Serialize;
use tracing::debug;

use crate::catalog::{self, DomainType, Property, PropertyType, ValueKind};
use crate::{registry, rules, SchemaError};

/// Complete mapping plan for one native type.
#[derive(Debug, Clone, Serialize)]
pub struct MappingInfo {
    pub native: String,
    pub domain: String,
    pub decoder: String,
    pub tag: u32,
    pub size: u32,
    pub members: Vec<MemberMapping>,
    pub routes: Vec<ExtensionRoute>,
}

/// One decoded member of a native record.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum MemberMapping {
    /// Primitive wrapper read into an `Element`.
    Value {
        element: String,
        field: String,
        offset: u32,
        reader: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        constructor: Option<String>,
    },
    /// Coded wrapper read into a `Coded` value.
    Code {
        element: String,
        field: String,
        offset: u32,
        enumeration: String,
        literals: Vec<String>,
    },
    /// Bare text span assigned without an element container.
    RawText {
        element: String,
        field: String,
        offset: u32,
    },
    /// Nested record decoded through another routine.
    Record {
        element: String,
        field: String,
        offset: u32,
        decoder: String,
    },
    /// Counted array of record references.
    RecordList {
        element: String,
        field: String,
        count_offset: u32,
        array_offset: u32,
        decoder: String,
    },
    /// Counted array of inline primitive wrappers.
    ValueList {
        element: String,
        field: String,
        count_offset: u32,
        array_offset: u32,
        stride: u32,
        reader: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        constructor: Option<String>,
    },
    /// Counted array of coded wrappers.
    CodeList {
        element: String,
        field: String,
        count_offset: u32,
        array_offset: u32,
        stride: u32,
        enumeration: String,
        literals: Vec<String>,
    },
    /// Choice element selected by a discriminant.
    Choice {
        element: String,
        offset: u32,
        discriminant_offset: u32,
        arms: Vec<UnionArm>,
    },
}

/// One arm of a choice element.
#[derive(Debug, Clone, Serialize)]
pub struct UnionArm {
    pub discriminant: u32,
    pub variant: String,
    pub field: String,
    pub payload: ArmPayload,
}

/// How a choice arm's payload is decoded.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ArmPayload {
    Value {
        reader: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        constructor: Option<String>,
    },
    Record {
        decoder: String,
    },
}

/// Where side-channel extensions for one element are attached.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ExtensionRoute {
    /// Attach to the element, materializing it when absent.
    Attach { element: String, field: String },
    /// Append an extension-only item to a repeated element.
    AttachItem { element: String, field: String },
    /// Attach to whichever choice variant was materialized.
    Chain { element: String, fields: Vec<String> },
}

/// Extracts mapping plans for every registered type, in emission order.
pub fn extract_all(version: FhirVersion) -> Result<Vec<MappingInfo>, SchemaError> {
    registry::ENTRIES
        .iter()
        .map(|entry| extract(entry.native, version))
        .collect()
}

/// Extracts the mapping plan for one native type.
pub fn extract(native_name: &str, version: FhirVersion) -> Result<MappingInfo, SchemaError> {
    let native = schema::native_type(native_name).ok_or_else(|| SchemaError::MissingType {
        native_type: native_name.to_owned(),
    })?;
    let entry = registry::entry(native_name)?;
    let domain = catalog::domain_type(entry.domain).ok_or_else(|| SchemaError::MissingType {
        native_type: entry.domain.to_owned(),
    })?;

    let mut extraction = Extraction {
        native,
        domain,
        version,
        members: Vec::new(),
        routes: Vec::new(),
        consumed: Vec::new(),
    };
    extraction.run()?;
    extraction.check_coverage()?;
    debug!(
        native = native.name,
        members = extraction.members.len(),
        routes = extraction.routes.len(),
        "extracted mapping plan"
    );

    Ok(MappingInfo {
        native: native.name.to_owned(),
        domain: domain.name.to_owned(),
        decoder: entry.decoder.to_owned(),
        tag: native.tag,
        size: native.size,
        members: extraction.members,
        routes: extraction.routes,
    })
}

struct Extraction<'a> {
    native: &'a NativeTypeDescriptor,
    domain: &'a DomainType,
    version: FhirVersion,
    members: Vec<MemberMapping>,
    routes: Vec<ExtensionRoute>,
    consumed: Vec<&'a str>,
}

impl<'a> Extraction<'a> {
    fn run(&mut self) -> Result<(), SchemaError> {
        let fields = self.native.fields;
        let mut index = 0;
        while index < fields.len() {
            let field = &fields[index];
            match field.shape {
                FieldShape::Tag | FieldShape::ExtensionAnchor | FieldShape::Discriminant => {
                    index += 1;
                }
                FieldShape::Wrapper(kind) => {
                    self.wrapper_member(field, kind)?;
                    index += 1;
                }
                FieldShape::Record(target) => {
                    self.record_member(field, target)?;
                    index += 1;
                }
                FieldShape::Count => {
                    let array = fields.get(index + 1).filter(|next| {
                        next.offset == field.offset + 4
                            && matches!(
                                next.shape,
                                FieldShape::WrapperArray(_) | FieldShape::RecordArray(_)
                            )
                    });
                    let Some(array) = array else {
                        return Err(self.layout_error(field, "count field has no array"));
                    };
                    self.list_member(field, array)?;
                    index += 2;
                }
                FieldShape::WrapperArray(_) | FieldShape::RecordArray(_) => {
                    return Err(self.layout_error(field, "array field has no preceding count"));
                }
                FieldShape::Union(variants) => {
                    let discriminant = fields.get(index + 1).filter(|next| {
                        next.shape == FieldShape::Discriminant
                            && next.offset == field.offset + field.shape.size()
                    });
                    let Some(discriminant) = discriminant else {
                        return Err(self.layout_error(field, "union has no discriminant"));
                    };
                    self.union_member(field, variants, discriminant.offset)?;
                    index += 2;
                }
            }
        }
        Ok(())
    }

    /// Every catalog entry available at the target release must have been
    /// consumed by some native field.
    fn check_coverage(&self) -> Result<(), SchemaError> {
        for property in self.domain.properties {
            if property.since <= self.version && !self.consumed.contains(&property.name) {
                return Err(SchemaError::UnknownProperty {
                    native_type: self.native.name.to_owned(),
                    field: property.name.to_owned(),
                });
            }
        }
        for choice in self.domain.choices {
            if choice.since <= self.version && !self.consumed.contains(&choice.name) {
                return Err(SchemaError::UnknownProperty {
                    native_type: self.native.name.to_owned(),
                    field: choice.name.to_owned(),
                });
            }
        }
        Ok(())
    }

    fn element_name(&self, field: &NativeFieldDescriptor) -> Result<&'a str, SchemaError> {
        field
            .element
            .ok_or_else(|| self.layout_error(field, "data field carries no element name"))
    }

    /// Resolves a property by element name; `Ok(None)` means the property
    /// exists but postdates the target release.
    fn property(
        &mut self,
        field: &NativeFieldDescriptor,
    ) -> Result<Option<&'a Property>, SchemaError> {
        let element = self.element_name(field)?;
        let property =
            self.domain
                .property(element)
                .ok_or_else(|| SchemaError::UnknownProperty {
                    native_type: self.native.name.to_owned(),
                    field: field.name.to_owned(),
                })?;
        if property.since > self.version {
            debug!(
                native = self.native.name,
                element,
                since = %property.since,
                "skipping property past the target release"
            );
            return Ok(None);
        }
        self.consumed.push(element);
        Ok(Some(property))
    }

    fn wrapper_member(
        &mut self,
        field: &NativeFieldDescriptor,
        kind: WrapperKind,
    ) -> Result<(), SchemaError> {
        let Some(property) = self.property(field)? else {
            return Ok(());
        };
        match property.ty {
            PropertyType::Coded(binding) => {
                if kind != WrapperKind::TextOpt {
                    return Err(self.conversion_error(field, kind, "code"));
                }
                self.members.push(MemberMapping::Code {
                    element: property.name.to_owned(),
                    field: property.field.to_owned(),
                    offset: field.offset,
                    enumeration: binding.enumeration.to_owned(),
                    literals: binding.literals.iter().map(|s| (*s).to_owned()).collect(),
                });
            }
            PropertyType::Scalar(ValueKind::Str) => {
                // The one identity fallback: bare text into a bare string.
                if kind != WrapperKind::Text {
                    return Err(self.conversion_error(field, kind, "string"));
                }
                self.members.push(MemberMapping::RawText {
                    element: property.name.to_owned(),
                    field: property.field.to_owned(),
                    offset: field.offset,
                });
                // Bare scalars have no extension container, so no route.
                return Ok(());
            }
            _ => {
                let value = self.unwrap_value(field, property)?;
                let rule = rules::rule_for(value)
                    .filter(|rule| rule.wrapper == kind)
                    .ok_or_else(|| self.conversion_error(field, kind, value.name()))?;
                self.members.push(MemberMapping::Value {
                    element: property.name.to_owned(),
                    field: property.field.to_owned(),
                    offset: field.offset,
                    reader: rule.reader.to_owned(),
                    constructor: rule.constructor.map(str::to_owned),
                });
            }
        }
        self.routes.push(ExtensionRoute::Attach {
            element: property.name.to_owned(),
            field: property.field.to_owned(),
        });
        Ok(())
    }

    fn record_member(
        &mut self,
        field: &NativeFieldDescriptor,
        target: &str,
    ) -> Result<(), SchemaError> {
        let Some(property) = self.property(field)? else {
            return Ok(());
        };
        let PropertyType::Record(domain_target) = property.ty else {
            return Err(self.classify_error(field, property));
        };
        if domain_target != target {
            return Err(self.classify_error(field, property));
        }
        self.members.push(MemberMapping::Record {
            element: property.name.to_owned(),
            field: property.field.to_owned(),
            offset: field.offset,
            decoder: registry::decoder(target)?.to_owned(),
        });
        self.routes.push(ExtensionRoute::Attach {
            element: property.name.to_owned(),
            field: property.field.to_owned(),
        });
        Ok(())
    }

    fn list_member(
        &mut self,
        count: &NativeFieldDescriptor,
        array: &NativeFieldDescriptor,
    ) -> Result<(), SchemaError> {
        let Some(property) = self.property(array)? else {
            return Ok(());
        };
        let PropertyType::List(item) = property.ty else {
            return Err(self.classify_error(array, property));
        };
        match (array.shape, *item) {
            (FieldShape::RecordArray(target), PropertyType::Record(domain_target)) => {
                if domain_target != target {
                    return Err(self.classify_error(array, property));
                }
                self.members.push(MemberMapping::RecordList {
                    element: property.name.to_owned(),
                    field: property.field.to_owned(),
                    count_offset: count.offset,
                    array_offset: array.offset,
                    decoder: registry::decoder(target)?.to_owned(),
                });
            }
            (FieldShape::WrapperArray(kind), PropertyType::Element(value)) => {
                let rule = rules::rule_for(value)
                    .filter(|rule| rule.wrapper == kind)
                    .ok_or_else(|| self.conversion_error(array, kind, value.name()))?;
                self.members.push(MemberMapping::ValueList {
                    element: property.name.to_owned(),
                    field: property.field.to_owned(),
                    count_offset: count.offset,
                    array_offset: array.offset,
                    stride: kind.size(),
                    reader: rule.reader.to_owned(),
                    constructor: rule.constructor.map(str::to_owned),
                });
            }
            (FieldShape::WrapperArray(kind), PropertyType::Coded(binding)) => {
                if kind != WrapperKind::TextOpt {
                    return Err(self.conversion_error(array, kind, "code"));
                }
                self.members.push(MemberMapping::CodeList {
                    element: property.name.to_owned(),
                    field: property.field.to_owned(),
                    count_offset: count.offset,
                    array_offset: array.offset,
                    stride: kind.size(),
                    enumeration: binding.enumeration.to_owned(),
                    literals: binding.literals.iter().map(|s| (*s).to_owned()).collect(),
                });
            }
            _ => return Err(self.classify_error(array, property)),
        }
        self.routes.push(ExtensionRoute::AttachItem {
            element: property.name.to_owned(),
            field: property.field.to_owned(),
        });
        Ok(())
    }

    fn union_member(
        &mut self,
        field: &NativeFieldDescriptor,
        variants: &[VariantShape],
        discriminant_offset: u32,
    ) -> Result<(), SchemaError> {
        let element = self.element_name(field)?;
        let choice = self
            .domain
            .choice(element)
            .ok_or_else(|| SchemaError::UnknownProperty {
                native_type: self.native.name.to_owned(),
                field: field.name.to_owned(),
            })?;
        if choice.since > self.version {
            return Ok(());
        }
        self.consumed.push(element);

        let mut arms = Vec::with_capacity(variants.len());
        for variant in variants {
            let counterpart = choice
                .variants
                .iter()
                .find(|v| v.name == variant.name)
                .ok_or_else(|| SchemaError::UnknownProperty {
                    native_type: self.native.name.to_owned(),
                    field: variant.name.to_owned(),
                })?;
            let payload = match (variant.kind, counterpart.ty) {
                (VariantKind::Wrapper(kind), PropertyType::Element(value)) => {
                    let rule = rules::rule_for(value)
                        .filter(|rule| rule.wrapper == kind)
                        .ok_or_else(|| self.conversion_error(field, kind, value.name()))?;
                    ArmPayload::Value {
                        reader: rule.reader.to_owned(),
                        constructor: rule.constructor.map(str::to_owned),
                    }
                }
                (VariantKind::Record(target), PropertyType::Record(domain_target)) => {
                    if domain_target != target {
                        return Err(SchemaError::Unclassifiable {
                            native_type: self.native.name.to_owned(),
                            field: variant.name.to_owned(),
                            property: counterpart.name.to_owned(),
                        });
                    }
                    ArmPayload::Record {
                        decoder: registry::decoder(target)?.to_owned(),
                    }
                }
                _ => {
                    return Err(SchemaError::Unclassifiable {
                        native_type: self.native.name.to_owned(),
                        field: variant.name.to_owned(),
                        property: counterpart.name.to_owned(),
                    });
                }
            };
            arms.push(UnionArm {
                discriminant: variant.discriminant,
                variant: variant.name.to_owned(),
                field: counterpart.field.to_owned(),
                payload,
            });
        }

        self.routes.push(ExtensionRoute::Chain {
            element: element.to_owned(),
            fields: arms.iter().map(|arm| arm.field.clone()).collect(),
        });
        self.members.push(MemberMapping::Choice {
            element: element.to_owned(),
            offset: field.offset,
            discriminant_offset,
            arms,
        });
        Ok(())
    }

    fn unwrap_value(
        &self,
        field: &NativeFieldDescriptor,
        property: &Property,
    ) -> Result<ValueKind, SchemaError> {
        match property.ty {
            PropertyType::Element(value) => Ok(value),
            _ => Err(SchemaError::NonNullableUnwrap {
                native_type: self.native.name.to_owned(),
                field: field.name.to_owned(),
                property: property.name.to_owned(),
            }),
        }
    }

    fn layout_error(&self, field: &NativeFieldDescriptor, reason: &str) -> SchemaError {
        SchemaError::LayoutInvariant {
            native_type: self.native.name.to_owned(),
            field: field.name.to_owned(),
            reason: reason.to_owned(),
        }
    }

    fn classify_error(&self, field: &NativeFieldDescriptor, property: &Property) -> SchemaError {
        SchemaError::Unclassifiable {
            native_type: self.native.name.to_owned(),
            field: field.name.to_owned(),
            property: property.name.to_owned(),
        }
    }

    fn conversion_error(
        &self,
        field: &NativeFieldDescriptor,
        wrapper: WrapperKind,
        value: &str,
    ) -> SchemaError {
        SchemaError::MissingConversion {
            native_type: self.native.name.to_owned(),
            field: field.name.to_owned(),
            wrapper: format!("{:?}", wrapper),
            value: value.to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_registered_type_extracts_for_r4() {
        let mappings = extract_all(FhirVersion::R4).unwrap();
        assert_eq!(mappings.len(), registry::ENTRIES.len());
        for mapping in &mappings {
            assert!(!mapping.members.is_empty(), "{}", mapping.native);
        }
    }

    #[test]
    fn extraction_is_deterministic() {
        let first = extract("Patient", FhirVersion::R4).unwrap();
        let second = extract("Patient", FhirVersion::R4).unwrap();
        assert_eq!(
            serde_json::to_value(&first).unwrap(),
            serde_json::to_value(&second).unwrap()
        );
    }

    #[test]
    fn coded_members_carry_their_literal_tables() {
        let mapping = extract("Patient", FhirVersion::R4).unwrap();
        let gender = mapping
            .members
            .iter()
            .find_map(|member| match member {
                MemberMapping::Code { element, literals, .. } if element == "gender" => {
                    Some(literals.clone())
                }
                _ => None,
            })
            .unwrap();
        assert_eq!(gender, ["male", "female", "other", "unknown"]);
    }

    #[test]
    fn decimal_members_get_the_constructor() {
        let mapping = extract("Quantity", FhirVersion::R4).unwrap();
        let value = mapping
            .members
            .iter()
            .find_map(|member| match member {
                MemberMapping::Value { element, constructor, .. } if element == "value" => {
                    Some(constructor.clone())
                }
                _ => None,
            })
            .unwrap();
        assert_eq!(value.as_deref(), Some("PreciseDecimal::new"));
    }

    #[test]
    fn bare_url_maps_through_the_identity_fallback() {
        let mapping = extract("Extension", FhirVersion::R4).unwrap();
        assert!(mapping.members.iter().any(|member| matches!(
            member,
            MemberMapping::RawText { element, .. } if element == "url"
        )));
        // Bare scalars get no extension route.
        assert!(!mapping.routes.iter().any(|route| matches!(
            route,
            ExtensionRoute::Attach { element, .. } if element == "url"
        )));
    }

    #[test]
    fn choice_arms_follow_the_variant_table() {
        let mapping = extract("Observation", FhirVersion::R4).unwrap();
        let arms = mapping
            .members
            .iter()
            .find_map(|member| match member {
                MemberMapping::Choice { element, arms, .. } if element == "value" => Some(arms),
                _ => None,
            })
            .unwrap();
        assert_eq!(arms.len(), 4);
        assert_eq!(arms[0].variant, "valueQuantity");
        assert!(matches!(arms[0].payload, ArmPayload::Record { .. }));
        assert!(matches!(arms[1].payload, ArmPayload::Value { .. }));
    }

    #[test]
    fn release_filtering_drops_later_properties() {
        // Observation.bodyStructure arrived in R5; targeting R4 must succeed
        // without it, targeting R5 must fail since the native layout has no
        // field to read it from.
        let mapping = extract("Observation", FhirVersion::R4).unwrap();
        assert!(!mapping
            .members
            .iter()
            .any(|member| matches!(member, MemberMapping::Record { element, .. } if element == "bodyStructure")));
        let error = extract("Observation", FhirVersion::R5).unwrap_err();
        assert!(matches!(error, SchemaError::UnknownProperty { .. }));
    }

    #[test]
    fn repeated_elements_route_extensions_as_items() {
        let mapping = extract("HumanName", FhirVersion::R4).unwrap();
        assert!(mapping.routes.iter().any(|route| matches!(
            route,
            ExtensionRoute::AttachItem { element, .. } if element == "given"
        )));
    }
}
