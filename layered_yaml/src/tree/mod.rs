//! Generic YAML tree model shared by the merge engine and the provider.
//!
//! Trees are plain [`serde_yaml::Value`]s. Parsing goes through
//! [`TreeSeed`] rather than `Value`'s own `Deserialize` impl so that the
//! duplicate-key policy follows the provider's strict flag: strict parsing
//! rejects a mapping that repeats a key, permissive parsing keeps the last
//! occurrence.

use std::cell::RefCell;
use std::fmt;

use serde::de::{
    self, DeserializeSeed, Deserializer, EnumAccess, MapAccess, SeqAccess, VariantAccess, Visitor,
};
use serde_yaml::value::{Tag, TaggedValue};
use serde_yaml::{Mapping, Value};
use tracing::debug;

use crate::{ConfigError, ConfigResult};

/// Parse the first YAML document in `bytes`.
///
/// Returns `Ok(None)` when the input holds no document at all (empty or
/// comment-only), which callers must treat differently from an explicit
/// top-level `null`.
///
/// # Errors
///
/// Returns [`ConfigError::DuplicateKey`] when `strict` is set and a mapping
/// repeats a key, and [`ConfigError::SourceParse`] for any other parse
/// failure.
pub(crate) fn parse_document(
    origin: &str,
    bytes: &[u8],
    strict: bool,
) -> ConfigResult<Option<Value>> {
    let mut documents = serde_yaml::Deserializer::from_slice(bytes);
    let Some(document) = documents.next() else {
        return Ok(None);
    };
    let duplicate = RefCell::new(None);
    let seed = TreeSeed {
        strict,
        duplicate: &duplicate,
    };
    let tree = seed.deserialize(document).map_err(|source| match duplicate.take() {
        Some(key) => ConfigError::DuplicateKey {
            origin: origin.to_owned(),
            key,
            source,
        },
        None => ConfigError::SourceParse {
            origin: origin.to_owned(),
            source,
        },
    })?;
    if documents.next().is_some() {
        debug!(origin, "ignoring YAML documents after the first");
    }
    Ok(Some(tree))
}

/// Serialise a tree back to YAML text.
pub(crate) fn render(tree: &Value) -> Result<String, serde_yaml::Error> {
    serde_yaml::to_string(tree)
}

/// Returns `true` for the node kinds allowed as mapping keys.
pub(crate) const fn is_scalar(node: &Value) -> bool {
    matches!(
        node,
        Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_)
    )
}

/// Interpret a path segment as a YAML scalar, e.g. `"1"` as the integer
/// key `1`, `"true"` as a boolean key or `"~"` as the null key.
pub(crate) fn parse_scalar_key(segment: &str) -> Option<Value> {
    let key: Value = serde_yaml::from_str(segment).ok()?;
    is_scalar(&key).then_some(key)
}

/// Human-readable rendering of a mapping key for diagnostics.
pub(crate) fn describe_key(key: &Value) -> String {
    match key {
        Value::String(text) => text.clone(),
        other => render(other).map_or_else(
            |_| format!("{other:?}"),
            |text| text.trim_end().to_owned(),
        ),
    }
}

const fn kind_of(node: &Value) -> &'static str {
    match node {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}

/// Seed building a [`Value`] while enforcing the duplicate-key policy.
///
/// The first duplicate key found in strict mode is recorded in
/// `duplicate` so the caller can classify the resulting parser error.
#[derive(Clone, Copy)]
struct TreeSeed<'a> {
    strict: bool,
    duplicate: &'a RefCell<Option<String>>,
}

impl<'de> DeserializeSeed<'de> for TreeSeed<'_> {
    type Value = Value;

    fn deserialize<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(self)
    }
}

impl<'de> Visitor<'de> for TreeSeed<'_> {
    type Value = Value;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("any YAML value")
    }

    fn visit_bool<E>(self, v: bool) -> Result<Value, E>
    where
        E: de::Error,
    {
        Ok(Value::Bool(v))
    }

    fn visit_i64<E>(self, v: i64) -> Result<Value, E>
    where
        E: de::Error,
    {
        Ok(Value::Number(v.into()))
    }

    fn visit_u64<E>(self, v: u64) -> Result<Value, E>
    where
        E: de::Error,
    {
        Ok(Value::Number(v.into()))
    }

    fn visit_f64<E>(self, v: f64) -> Result<Value, E>
    where
        E: de::Error,
    {
        Ok(Value::Number(v.into()))
    }

    fn visit_str<E>(self, v: &str) -> Result<Value, E>
    where
        E: de::Error,
    {
        Ok(Value::String(v.to_owned()))
    }

    fn visit_string<E>(self, v: String) -> Result<Value, E>
    where
        E: de::Error,
    {
        Ok(Value::String(v))
    }

    fn visit_unit<E>(self) -> Result<Value, E>
    where
        E: de::Error,
    {
        Ok(Value::Null)
    }

    fn visit_none<E>(self) -> Result<Value, E>
    where
        E: de::Error,
    {
        Ok(Value::Null)
    }

    fn visit_some<D>(self, deserializer: D) -> Result<Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        DeserializeSeed::deserialize(self, deserializer)
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element_seed(self)? {
            items.push(item);
        }
        Ok(Value::Sequence(items))
    }

    fn visit_map<A>(self, mut map: A) -> Result<Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut mapping = Mapping::new();
        while let Some(key) = map.next_key_seed(self)? {
            if !is_scalar(&key) {
                return Err(<A::Error as de::Error>::custom(format_args!(
                    "mapping keys must be scalars, found {}",
                    kind_of(&key)
                )));
            }
            if self.strict && mapping.contains_key(&key) {
                let rendered = describe_key(&key);
                let err = <A::Error as de::Error>::custom(format_args!("duplicate key \"{rendered}\""));
                *self.duplicate.borrow_mut() = Some(rendered);
                return Err(err);
            }
            let value = map.next_value_seed(self)?;
            mapping.insert(key, value);
        }
        Ok(Value::Mapping(mapping))
    }

    fn visit_enum<A>(self, data: A) -> Result<Value, A::Error>
    where
        A: EnumAccess<'de>,
    {
        let (tag, contents) = data.variant::<String>()?;
        let value = contents.newtype_variant_seed(self)?;
        Ok(Value::Tagged(Box::new(TaggedValue {
            tag: Tag::new(tag),
            value,
        })))
    }
}
