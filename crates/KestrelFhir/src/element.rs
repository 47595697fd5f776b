use std::marker::PhantomData;

use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeStruct;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::codes::CodeEnum;

/// Generic element container supporting FHIR's extension mechanism.
///
/// In FHIR, most primitive elements can be extended with additional metadata
/// through the `id` and `extension` fields. This container provides that
/// infrastructure for every primitive-valued property in the model.
///
/// # Type Parameters
///
/// * `V` - The value type (e.g., `String`, `i32`, `PrecisionDate`)
/// * `E` - The extension type (the `r4::Extension` struct)
///
/// # Serialization Behavior
///
/// - If only `value` is present: serializes as the bare primitive value
/// - If `id` or `extension` are present: serializes as an object
/// - If everything is `None`: serializes as `null`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element<V, E> {
    /// Optional element identifier for referencing within the resource
    pub id: Option<String>,
    /// Optional extensions providing additional metadata
    pub extension: Option<Vec<E>>,
    /// The actual primitive value
    pub value: Option<V>,
}

// Manual impl so `Element<V, E>: Default` does not require `V: Default`.
impl<V, E> Default for Element<V, E> {
    fn default() -> Self {
        Element {
            id: None,
            extension: None,
            value: None,
        }
    }
}

impl<V, E> Element<V, E> {
    /// Returns `true` if no value, id, or extensions are present.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.value.is_none() && self.id.is_none() && self.extension.is_none()
    }
}

impl<V, E> From<V> for Element<V, E> {
    fn from(value: V) -> Self {
        Element {
            id: None,
            extension: None,
            value: Some(value),
        }
    }
}

struct ElementObjectVisitor<V, E>(PhantomData<(V, E)>);

impl<'de, V, E> Visitor<'de> for ElementObjectVisitor<V, E>
where
    V: Deserialize<'de>,
    E: Deserialize<'de>,
{
    type Value = Element<V, E>;

    fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        formatter.write_str("an Element object")
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut id: Option<String> = None;
        let mut extension: Option<Vec<E>> = None;
        let mut value: Option<V> = None;

        while let Some(key) = map.next_key::<String>()? {
            match key.as_str() {
                "id" => {
                    if id.is_some() {
                        return Err(de::Error::duplicate_field("id"));
                    }
                    id = Some(map.next_value()?);
                }
                "extension" => {
                    if extension.is_some() {
                        return Err(de::Error::duplicate_field("extension"));
                    }
                    extension = Some(map.next_value()?);
                }
                "value" => {
                    if value.is_some() {
                        return Err(de::Error::duplicate_field("value"));
                    }
                    value = Some(map.next_value()?);
                }
                // Ignore any unknown fields encountered
                _ => {
                    let _ = map.next_value::<de::IgnoredAny>()?;
                }
            }
        }

        Ok(Element {
            id,
            extension,
            value,
        })
    }
}

impl<'de, V, E> Deserialize<'de> for Element<V, E>
where
    V: Deserialize<'de>,
    E: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct AnyValueVisitor<V, E>(PhantomData<(V, E)>);

        impl<'de, V, E> Visitor<'de> for AnyValueVisitor<V, E>
        where
            V: Deserialize<'de>,
            E: Deserialize<'de>,
        {
            type Value = Element<V, E>;

            fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                formatter
                    .write_str("a primitive value (string, number, boolean), an object, or null")
            }

            fn visit_bool<Er>(self, v: bool) -> Result<Self::Value, Er>
            where
                Er: de::Error,
            {
                V::deserialize(de::value::BoolDeserializer::new(v)).map(Element::from)
            }

            fn visit_i64<Er>(self, v: i64) -> Result<Self::Value, Er>
            where
                Er: de::Error,
            {
                V::deserialize(de::value::I64Deserializer::new(v)).map(Element::from)
            }

            fn visit_u64<Er>(self, v: u64) -> Result<Self::Value, Er>
            where
                Er: de::Error,
            {
                V::deserialize(de::value::U64Deserializer::new(v)).map(Element::from)
            }

            fn visit_f64<Er>(self, v: f64) -> Result<Self::Value, Er>
            where
                Er: de::Error,
            {
                V::deserialize(de::value::F64Deserializer::new(v)).map(Element::from)
            }

            fn visit_str<Er>(self, v: &str) -> Result<Self::Value, Er>
            where
                Er: de::Error,
            {
                V::deserialize(de::value::StrDeserializer::new(v)).map(Element::from)
            }

            fn visit_none<Er>(self) -> Result<Self::Value, Er>
            where
                Er: de::Error,
            {
                Ok(Element::default())
            }

            fn visit_unit<Er>(self) -> Result<Self::Value, Er>
            where
                Er: de::Error,
            {
                Ok(Element::default())
            }

            fn visit_some<De>(self, deserializer: De) -> Result<Self::Value, De::Error>
            where
                De: Deserializer<'de>,
            {
                deserializer.deserialize_any(self)
            }

            fn visit_map<A>(self, map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let map_deserializer = de::value::MapAccessDeserializer::new(map);
                map_deserializer.deserialize_map(ElementObjectVisitor(PhantomData))
            }

            fn visit_seq<A>(self, _seq: A) -> Result<Self::Value, A::Error>
            where
                A: de::SeqAccess<'de>,
            {
                Err(de::Error::invalid_type(de::Unexpected::Seq, &self))
            }
        }

        deserializer.deserialize_any(AnyValueVisitor(PhantomData))
    }
}

impl<V, E> Serialize for Element<V, E>
where
    V: Serialize,
    E: Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        // If id and extension are None, serialize value directly (or null)
        if self.id.is_none() && self.extension.is_none() {
            match &self.value {
                Some(val) => val.serialize(serializer),
                None => serializer.serialize_none(),
            }
        } else {
            let mut len = 0;
            if self.id.is_some() {
                len += 1;
            }
            if self.extension.is_some() {
                len += 1;
            }
            if self.value.is_some() {
                len += 1;
            }

            let mut state = serializer.serialize_struct("Element", len)?;
            if let Some(id) = &self.id {
                state.serialize_field("id", id)?;
            }
            if let Some(extension) = &self.extension {
                state.serialize_field("extension", extension)?;
            }
            if let Some(value) = &self.value {
                state.serialize_field("value", value)?;
            }
            state.end()
        }
    }
}

/// Coded-value container for properties bound to a code system enumeration.
///
/// The wire literal is stored verbatim: FHIR systems routinely exchange codes
/// from newer terminology releases, so the raw text is authoritative and
/// enumeration interpretation happens lazily through [`Coded::as_enum`].
///
/// # Type Parameters
///
/// * `C` - The code system enumeration ([`CodeEnum`]) the property is bound to
/// * `E` - The extension type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Coded<C, E> {
    /// Optional element identifier for referencing within the resource
    pub id: Option<String>,
    /// Optional extensions providing additional metadata
    pub extension: Option<Vec<E>>,
    /// The wire literal, untouched
    pub value: Option<String>,
    marker: PhantomData<C>,
}

impl<C, E> Default for Coded<C, E> {
    fn default() -> Self {
        Coded {
            id: None,
            extension: None,
            value: None,
            marker: PhantomData,
        }
    }
}

impl<C, E> Coded<C, E> {
    /// Wraps a wire literal without validating it against the enumeration.
    pub fn from_literal(literal: impl Into<String>) -> Self {
        Coded {
            id: None,
            extension: None,
            value: Some(literal.into()),
            marker: PhantomData,
        }
    }

    /// Returns the raw wire literal, if present.
    pub fn literal(&self) -> Option<&str> {
        self.value.as_deref()
    }
}

impl<C: CodeEnum, E> Coded<C, E> {
    /// Interprets the stored literal against the bound enumeration.
    ///
    /// Returns `None` when no value is present or the literal is not part of
    /// the enumeration's declared literal table.
    pub fn as_enum(&self) -> Option<C> {
        self.value.as_deref().and_then(C::from_literal)
    }
}

impl<C, E> Serialize for Coded<C, E>
where
    E: Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if self.id.is_none() && self.extension.is_none() {
            match &self.value {
                Some(val) => serializer.serialize_str(val),
                None => serializer.serialize_none(),
            }
        } else {
            let mut len = 0;
            if self.id.is_some() {
                len += 1;
            }
            if self.extension.is_some() {
                len += 1;
            }
            if self.value.is_some() {
                len += 1;
            }

            let mut state = serializer.serialize_struct("Coded", len)?;
            if let Some(id) = &self.id {
                state.serialize_field("id", id)?;
            }
            if let Some(extension) = &self.extension {
                state.serialize_field("extension", extension)?;
            }
            if let Some(value) = &self.value {
                state.serialize_field("value", value)?;
            }
            state.end()
        }
    }
}

impl<'de, C, E> Deserialize<'de> for Coded<C, E>
where
    E: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let inner = Element::<String, E>::deserialize(deserializer)?;
        Ok(Coded {
            id: inner.id,
            extension: inner.extension,
            value: inner.value,
            marker: PhantomData,
        })
    }
}
