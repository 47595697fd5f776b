use serde::{Deserialize, Serialize};

use super::*;
use crate::codes::{
    AdministrativeGender, AllergyCategory, AllergyCriticality, ObservationStatus,
};
use crate::element::Coded;

/// Demographics and administrative information about a person receiving care.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Patient {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<std::string::String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension: Option<Vec<Extension>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identifier: Option<Vec<Identifier>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<Boolean>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<Vec<HumanName>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<Coded<AdministrativeGender, Extension>>,
    #[serde(rename = "birthDate", skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<Date>,
    #[serde(rename = "deceasedBoolean", skip_serializing_if = "Option::is_none")]
    pub deceased_boolean: Option<Boolean>,
    #[serde(rename = "deceasedDateTime", skip_serializing_if = "Option::is_none")]
    pub deceased_date_time: Option<DateTime>,
    #[serde(rename = "multipleBirthBoolean", skip_serializing_if = "Option::is_none")]
    pub multiple_birth_boolean: Option<Boolean>,
    #[serde(rename = "multipleBirthInteger", skip_serializing_if = "Option::is_none")]
    pub multiple_birth_integer: Option<Integer>,
    #[serde(rename = "managingOrganization", skip_serializing_if = "Option::is_none")]
    pub managing_organization: Option<Reference>,
}

/// Measurements and simple assertions made about a patient.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Observation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<std::string::String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension: Option<Vec<Extension>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identifier: Option<Vec<Identifier>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<Coded<ObservationStatus, Extension>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Vec<CodeableConcept>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<CodeableConcept>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<Reference>,
    #[serde(rename = "effectiveDateTime", skip_serializing_if = "Option::is_none")]
    pub effective_date_time: Option<DateTime>,
    #[serde(rename = "effectivePeriod", skip_serializing_if = "Option::is_none")]
    pub effective_period: Option<Period>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issued: Option<Instant>,
    #[serde(rename = "valueQuantity", skip_serializing_if = "Option::is_none")]
    pub value_quantity: Option<Quantity>,
    #[serde(rename = "valueString", skip_serializing_if = "Option::is_none")]
    pub value_string: Option<String>,
    #[serde(rename = "valueBoolean", skip_serializing_if = "Option::is_none")]
    pub value_boolean: Option<Boolean>,
    #[serde(rename = "valueInteger", skip_serializing_if = "Option::is_none")]
    pub value_integer: Option<Integer>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub performer: Option<Vec<Reference>>,
}

/// Risk of harmful or undesirable physiological response to a substance.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AllergyIntolerance {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<std::string::String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension: Option<Vec<Extension>>,
    #[serde(rename = "clinicalStatus", skip_serializing_if = "Option::is_none")]
    pub clinical_status: Option<CodeableConcept>,
    #[serde(rename = "verificationStatus", skip_serializing_if = "Option::is_none")]
    pub verification_status: Option<CodeableConcept>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Vec<Coded<AllergyCategory, Extension>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub criticality: Option<Coded<AllergyCriticality, Extension>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<CodeableConcept>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patient: Option<Reference>,
    #[serde(rename = "onsetDateTime", skip_serializing_if = "Option::is_none")]
    pub onset_date_time: Option<DateTime>,
    #[serde(rename = "onsetPeriod", skip_serializing_if = "Option::is_none")]
    pub onset_period: Option<Period>,
    #[serde(rename = "onsetString", skip_serializing_if = "Option::is_none")]
    pub onset_string: Option<String>,
    #[serde(rename = "recordedDate", skip_serializing_if = "Option::is_none")]
    pub recorded_date: Option<DateTime>,
}

/// Any concrete resource the model supports, routed by `resourceType`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "resourceType")]
pub enum Resource {
    Patient(Patient),
    Observation(Observation),
    AllergyIntolerance(AllergyIntolerance),
}

impl Resource {
    /// The resource type name as it appears on the wire.
    pub fn resource_type(&self) -> &'static str {
        match self {
            Resource::Patient(_) => "Patient",
            Resource::Observation(_) => "Observation",
            Resource::AllergyIntolerance(_) => "AllergyIntolerance",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resource_enum_serializes_with_resource_type_tag() {
        let patient = Patient {
            active: Some(true.into()),
            ..Default::default()
        };
        let json = serde_json::to_value(Resource::Patient(patient)).unwrap();
        assert_eq!(json["resourceType"], "Patient");
        assert_eq!(json["active"], true);
    }

    #[test]
    fn absent_fields_are_omitted_from_json() {
        let observation = Observation::default();
        let json = serde_json::to_value(Resource::Observation(observation)).unwrap();
        assert_eq!(json.as_object().unwrap().len(), 1); // resourceType only
    }
}
