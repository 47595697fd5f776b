//! Code system enumerations with their declared wire literals.
//!
//! Each enumeration mirrors a required FHIR R4 value set binding. The wire
//! literal tables are consulted at generation time (to record the legal
//! literal set for a coded member) and by [`crate::Coded::as_enum`] for lazy
//! interpretation; decoding itself never validates literals.

/// A code system enumeration bound to a FHIR coded property.
pub trait CodeEnum: Copy + Sized {
    /// Value set name as it appears in the FHIR specification.
    const NAME: &'static str;
    /// Declared wire literals, in specification order.
    const LITERALS: &'static [&'static str];

    /// Resolves a wire literal to an enumeration member.
    fn from_literal(literal: &str) -> Option<Self>;

    /// Returns the wire literal for this member.
    fn literal(self) -> &'static str;
}

/// AdministrativeGender (<http://hl7.org/fhir/administrative-gender>)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AdministrativeGender {
    Male,
    Female,
    Other,
    Unknown,
}

impl CodeEnum for AdministrativeGender {
    const NAME: &'static str = "AdministrativeGender";
    const LITERALS: &'static [&'static str] = &["male", "female", "other", "unknown"];

    fn from_literal(literal: &str) -> Option<Self> {
        match literal {
            "male" => Some(Self::Male),
            "female" => Some(Self::Female),
            "other" => Some(Self::Other),
            "unknown" => Some(Self::Unknown),
            _ => None,
        }
    }

    fn literal(self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
            Self::Other => "other",
            Self::Unknown => "unknown",
        }
    }
}

/// ObservationStatus (<http://hl7.org/fhir/observation-status>)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObservationStatus {
    Registered,
    Preliminary,
    Final,
    Amended,
    Corrected,
    Cancelled,
    EnteredInError,
    Unknown,
}

impl CodeEnum for ObservationStatus {
    const NAME: &'static str = "ObservationStatus";
    const LITERALS: &'static [&'static str] = &[
        "registered",
        "preliminary",
        "final",
        "amended",
        "corrected",
        "cancelled",
        "entered-in-error",
        "unknown",
    ];

    fn from_literal(literal: &str) -> Option<Self> {
        match literal {
            "registered" => Some(Self::Registered),
            "preliminary" => Some(Self::Preliminary),
            "final" => Some(Self::Final),
            "amended" => Some(Self::Amended),
            "corrected" => Some(Self::Corrected),
            "cancelled" => Some(Self::Cancelled),
            "entered-in-error" => Some(Self::EnteredInError),
            "unknown" => Some(Self::Unknown),
            _ => None,
        }
    }

    fn literal(self) -> &'static str {
        match self {
            Self::Registered => "registered",
            Self::Preliminary => "preliminary",
            Self::Final => "final",
            Self::Amended => "amended",
            Self::Corrected => "corrected",
            Self::Cancelled => "cancelled",
            Self::EnteredInError => "entered-in-error",
            Self::Unknown => "unknown",
        }
    }
}

/// NameUse (<http://hl7.org/fhir/name-use>)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NameUse {
    Usual,
    Official,
    Temp,
    Nickname,
    Anonymous,
    Old,
    Maiden,
}

impl CodeEnum for NameUse {
    const NAME: &'static str = "NameUse";
    const LITERALS: &'static [&'static str] = &[
        "usual",
        "official",
        "temp",
        "nickname",
        "anonymous",
        "old",
        "maiden",
    ];

    fn from_literal(literal: &str) -> Option<Self> {
        match literal {
            "usual" => Some(Self::Usual),
            "official" => Some(Self::Official),
            "temp" => Some(Self::Temp),
            "nickname" => Some(Self::Nickname),
            "anonymous" => Some(Self::Anonymous),
            "old" => Some(Self::Old),
            "maiden" => Some(Self::Maiden),
            _ => None,
        }
    }

    fn literal(self) -> &'static str {
        match self {
            Self::Usual => "usual",
            Self::Official => "official",
            Self::Temp => "temp",
            Self::Nickname => "nickname",
            Self::Anonymous => "anonymous",
            Self::Old => "old",
            Self::Maiden => "maiden",
        }
    }
}

/// IdentifierUse (<http://hl7.org/fhir/identifier-use>)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdentifierUse {
    Usual,
    Official,
    Temp,
    Secondary,
    Old,
}

impl CodeEnum for IdentifierUse {
    const NAME: &'static str = "IdentifierUse";
    const LITERALS: &'static [&'static str] = &["usual", "official", "temp", "secondary", "old"];

    fn from_literal(literal: &str) -> Option<Self> {
        match literal {
            "usual" => Some(Self::Usual),
            "official" => Some(Self::Official),
            "temp" => Some(Self::Temp),
            "secondary" => Some(Self::Secondary),
            "old" => Some(Self::Old),
            _ => None,
        }
    }

    fn literal(self) -> &'static str {
        match self {
            Self::Usual => "usual",
            Self::Official => "official",
            Self::Temp => "temp",
            Self::Secondary => "secondary",
            Self::Old => "old",
        }
    }
}

/// QuantityComparator (<http://hl7.org/fhir/quantity-comparator>)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuantityComparator {
    LessThan,
    LessOrEqual,
    GreaterOrEqual,
    GreaterThan,
}

impl CodeEnum for QuantityComparator {
    const NAME: &'static str = "QuantityComparator";
    const LITERALS: &'static [&'static str] = &["<", "<=", ">=", ">"];

    fn from_literal(literal: &str) -> Option<Self> {
        match literal {
            "<" => Some(Self::LessThan),
            "<=" => Some(Self::LessOrEqual),
            ">=" => Some(Self::GreaterOrEqual),
            ">" => Some(Self::GreaterThan),
            _ => None,
        }
    }

    fn literal(self) -> &'static str {
        match self {
            Self::LessThan => "<",
            Self::LessOrEqual => "<=",
            Self::GreaterOrEqual => ">=",
            Self::GreaterThan => ">",
        }
    }
}

/// AllergyIntoleranceCategory (<http://hl7.org/fhir/allergy-intolerance-category>)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AllergyCategory {
    Food,
    Medication,
    Environment,
    Biologic,
}

impl CodeEnum for AllergyCategory {
    const NAME: &'static str = "AllergyIntoleranceCategory";
    const LITERALS: &'static [&'static str] = &["food", "medication", "environment", "biologic"];

    fn from_literal(literal: &str) -> Option<Self> {
        match literal {
            "food" => Some(Self::Food),
            "medication" => Some(Self::Medication),
            "environment" => Some(Self::Environment),
            "biologic" => Some(Self::Biologic),
            _ => None,
        }
    }

    fn literal(self) -> &'static str {
        match self {
            Self::Food => "food",
            Self::Medication => "medication",
            Self::Environment => "environment",
            Self::Biologic => "biologic",
        }
    }
}

/// AllergyIntoleranceCriticality (<http://hl7.org/fhir/allergy-intolerance-criticality>)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AllergyCriticality {
    Low,
    High,
    UnableToAssess,
}

impl CodeEnum for AllergyCriticality {
    const NAME: &'static str = "AllergyIntoleranceCriticality";
    const LITERALS: &'static [&'static str] = &["low", "high", "unable-to-assess"];

    fn from_literal(literal: &str) -> Option<Self> {
        match literal {
            "low" => Some(Self::Low),
            "high" => Some(Self::High),
            "unable-to-assess" => Some(Self::UnableToAssess),
            _ => None,
        }
    }

    fn literal(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::High => "high",
            Self::UnableToAssess => "unable-to-assess",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_tables_round_trip() {
        for literal in ObservationStatus::LITERALS {
            let member = ObservationStatus::from_literal(literal).unwrap();
            assert_eq!(member.literal(), *literal);
        }
        for literal in QuantityComparator::LITERALS {
            let member = QuantityComparator::from_literal(literal).unwrap();
            assert_eq!(member.literal(), *literal);
        }
    }

    #[test]
    fn unknown_literal_is_rejected() {
        assert_eq!(AllergyCategory::from_literal("mineral"), None);
    }
}
