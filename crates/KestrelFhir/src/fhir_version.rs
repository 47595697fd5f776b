use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// FHIR specification releases the model can be bound to.
///
/// Only R4 is shipped with a populated type catalog today; the later
/// releases exist so that version bounds on property descriptors and the
/// generator CLI keep the same surface the multi-version tooling expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, ValueEnum, Serialize, Deserialize)]
pub enum FhirVersion {
    /// FHIR 4.0.1 (normative)
    R4,
    /// FHIR 4.3.0
    R4B,
    /// FHIR 5.0.0
    R5,
    /// FHIR 6.0.0 (draft)
    R6,
}

impl FhirVersion {
    pub fn as_str(&self) -> &'static str {
        match self {
            FhirVersion::R4 => "R4",
            FhirVersion::R4B => "R4B",
            FhirVersion::R5 => "R5",
            FhirVersion::R6 => "R6",
        }
    }
}

impl std::fmt::Display for FhirVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn versions_are_ordered_by_release() {
        assert!(FhirVersion::R4 < FhirVersion::R5);
        assert!(FhirVersion::R5 < FhirVersion::R6);
    }
}
