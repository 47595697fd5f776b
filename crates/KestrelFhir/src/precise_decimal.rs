use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// FHIR decimal preserving the original lexical form.
///
/// FHIR decimals are significant-digit-preserving: `1.50` and `1.5` are
/// different values on the wire even though they compare equal numerically.
/// The original text is therefore authoritative; numeric access goes through
/// [`PreciseDecimal::value`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct PreciseDecimal {
    original: String,
}

impl PreciseDecimal {
    /// Wraps a lexical decimal representation.
    pub fn new(original: impl Into<String>) -> Self {
        PreciseDecimal {
            original: original.into(),
        }
    }

    /// The original wire text.
    pub fn as_str(&self) -> &str {
        &self.original
    }

    /// Parses the stored text as a numeric value.
    pub fn value(&self) -> Option<Decimal> {
        self.original.parse().ok()
    }
}

impl fmt::Display for PreciseDecimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.original)
    }
}

impl Serialize for PreciseDecimal {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        // Prefer a JSON number when the text parses as one.
        match self.original.parse::<serde_json::Number>() {
            Ok(number) => number.serialize(serializer),
            Err(_) => serializer.serialize_str(&self.original),
        }
    }
}

impl<'de> Deserialize<'de> for PreciseDecimal {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        match value {
            serde_json::Value::Number(number) => Ok(PreciseDecimal::new(number.to_string())),
            serde_json::Value::String(text) => Ok(PreciseDecimal::new(text)),
            other => Err(serde::de::Error::custom(format!(
                "expected a decimal, got {}",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn original_text_is_preserved() {
        let d = PreciseDecimal::new("1.50");
        assert_eq!(d.as_str(), "1.50");
        assert_eq!(d.value(), Some(dec!(1.50)));
    }

    #[test]
    fn unparsable_text_has_no_numeric_value() {
        assert_eq!(PreciseDecimal::new("not-a-number").value(), None);
    }
}
