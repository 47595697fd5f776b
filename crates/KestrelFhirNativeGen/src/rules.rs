//! Conversion rule registry: which native wrapper shape carries each
//! primitive value kind, and how the generated code reads it.
//!
//! The registry is a closed table. Decimal is the one kind with no native
//! representation of its own: it travels as decimal text inside a `TextOpt`
//! wrapper and is rebuilt through a constructor on the decoded string.

use kestrel_fhir_native::layout::WrapperKind;

use crate::catalog::ValueKind;

/// One conversion rule: value kind, expected wrapper, and emitted reader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConversionRule {
    pub value: ValueKind,
    pub wrapper: WrapperKind,
    /// Reader path emitted into the decoding routine.
    pub reader: &'static str,
    /// Constructor wrapped around the read value, when the wrapper carries
    /// an intermediate representation instead of the value itself.
    pub constructor: Option<&'static str>,
}

const RULES: &[ConversionRule] = &[
    ConversionRule {
        value: ValueKind::Bool,
        wrapper: WrapperKind::OptBool,
        reader: "layout::opt_bool",
        constructor: None,
    },
    ConversionRule {
        value: ValueKind::Int,
        wrapper: WrapperKind::OptInt,
        reader: "layout::opt_int",
        constructor: None,
    },
    ConversionRule {
        value: ValueKind::Str,
        wrapper: WrapperKind::TextOpt,
        reader: "layout::text_opt",
        constructor: None,
    },
    ConversionRule {
        value: ValueKind::Decimal,
        wrapper: WrapperKind::TextOpt,
        reader: "layout::text_opt",
        constructor: Some("PreciseDecimal::new"),
    },
    ConversionRule {
        value: ValueKind::Date,
        wrapper: WrapperKind::DateTime,
        reader: "layout::date",
        constructor: None,
    },
    ConversionRule {
        value: ValueKind::DateTime,
        wrapper: WrapperKind::DateTime,
        reader: "layout::date_time",
        constructor: None,
    },
    ConversionRule {
        value: ValueKind::Instant,
        wrapper: WrapperKind::DateTime,
        reader: "layout::instant",
        constructor: None,
    },
    ConversionRule {
        value: ValueKind::Time,
        wrapper: WrapperKind::DateTime,
        reader: "layout::time",
        constructor: None,
    },
];

/// Returns the rule for a value kind, if the table carries one.
pub fn rule_for(value: ValueKind) -> Option<&'static ConversionRule> {
    RULES.iter().find(|rule| rule.value == value)
}

/// Whether some rule reads directly from the given wrapper shape.
pub fn has_direct_rule(wrapper: WrapperKind) -> bool {
    RULES.iter().any(|rule| rule.wrapper == wrapper)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_value_kind_has_a_rule() {
        for kind in [
            ValueKind::Bool,
            ValueKind::Int,
            ValueKind::Str,
            ValueKind::Decimal,
            ValueKind::Date,
            ValueKind::DateTime,
            ValueKind::Instant,
            ValueKind::Time,
        ] {
            assert_eq!(rule_for(kind).unwrap().value, kind);
        }
    }

    #[test]
    fn decimal_travels_as_text_with_a_constructor() {
        let rule = rule_for(ValueKind::Decimal).unwrap();
        assert_eq!(rule.wrapper, WrapperKind::TextOpt);
        assert_eq!(rule.constructor, Some("PreciseDecimal::new"));
    }

    #[test]
    fn bare_text_has_no_direct_rule() {
        // `Text` is only reachable through the raw-scalar fallback.
        assert!(!has_direct_rule(WrapperKind::Text));
        assert!(has_direct_rule(WrapperKind::TextOpt));
    }
}
