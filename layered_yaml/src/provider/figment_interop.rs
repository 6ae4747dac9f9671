//! Figment provider support, so a merged provider can seed a `Figment`.

use std::collections::BTreeMap;

use figment::{
    Metadata, Profile,
    error::Kind,
    value::{Dict, Value as FigmentValue},
};
use serde_yaml::Value as YamlValue;
use serde_yaml::value::TaggedValue;

use super::YamlProvider;
use crate::tree::describe_key;

impl figment::Provider for YamlProvider {
    fn metadata(&self) -> Metadata {
        Metadata::named(self.name().to_owned())
    }

    fn data(&self) -> Result<BTreeMap<Profile, Dict>, figment::Error> {
        let Some(tree) = self.contents() else {
            return Ok(Profile::Default.collect(Dict::new()));
        };
        let value = FigmentValue::serialize(stringify_keys(tree))?;
        let actual = value.to_actual();
        let dict = value
            .into_dict()
            .ok_or_else(|| figment::Error::from(Kind::InvalidType(actual, "map".into())))?;
        Ok(Profile::Default.collect(dict))
    }
}

/// Figment dictionaries are string-keyed; render every mapping key.
fn stringify_keys(node: &YamlValue) -> YamlValue {
    match node {
        YamlValue::Mapping(mapping) => YamlValue::Mapping(
            mapping
                .iter()
                .map(|(key, value)| (YamlValue::String(describe_key(key)), stringify_keys(value)))
                .collect(),
        ),
        YamlValue::Sequence(items) => YamlValue::Sequence(items.iter().map(stringify_keys).collect()),
        YamlValue::Tagged(tagged) => YamlValue::Tagged(Box::new(TaggedValue {
            tag: tagged.tag.clone(),
            value: stringify_keys(&tagged.value),
        })),
        YamlValue::Null | YamlValue::Bool(_) | YamlValue::Number(_) | YamlValue::String(_) => {
            node.clone()
        }
    }
}
