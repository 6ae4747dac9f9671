//! Decoding a configuration node over a pre-filled destination.
//!
//! The node is merged over the destination's serialised form so untouched
//! fields keep their values. Entries that only exist because the
//! destination serialised them are never reported as unknown, and are
//! dropped again when the node sets the same field under an alias.

use serde::de::DeserializeOwned;
use serde_ignored::Path;
use serde_yaml::{Mapping, Number, Value as YamlValue};
use tracing::{debug, trace};

use crate::merge::merge_value;
use crate::tree::describe_key;
use crate::{ConfigError, ConfigResult};

/// Decode `node` merged over `base` (the destination's serialised form).
///
/// `strict` rejects fields of `node` that `T` does not consume.
pub(super) fn decode_over<T>(
    base: &YamlValue,
    node: &YamlValue,
    strict: bool,
    key: &str,
) -> ConfigResult<T>
where
    T: DeserializeOwned,
{
    let mut merged = base.clone();
    merge_value(&mut merged, node.clone());
    let decoded = decode_merged(&mut merged, base, node, key)?;
    if strict {
        reject_unknown::<T>(&merged, node, key)?;
    }
    Ok(decoded)
}

fn decode_merged<T>(
    merged: &mut YamlValue,
    base: &YamlValue,
    node: &YamlValue,
    key: &str,
) -> ConfigResult<T>
where
    T: DeserializeOwned,
{
    loop {
        let err = match serde_yaml::from_value(merged.clone()) {
            Ok(decoded) => return Ok(decoded),
            Err(err) => err,
        };
        let Some(field) = duplicate_field(&err) else {
            return Err(ConfigError::decode(key, err.to_string()));
        };
        if !drop_shadowed(merged, Some(base), Some(node), &field) {
            return Err(ConfigError::decode(key, err.to_string()));
        }
        trace!(key, field = field.as_str(), "dropped pre-filled field set through an alias");
    }
}

/// Extract the field name from serde's `duplicate field` message.
fn duplicate_field(err: &serde_yaml::Error) -> Option<String> {
    let message = err.to_string();
    let (_, rest) = message.split_once("duplicate field `")?;
    let (field, _) = rest.split_once('`')?;
    Some(field.to_owned())
}

/// Remove `field` from mappings where it came from the destination while
/// the configuration introduced keys the destination did not have.
///
/// Returns `true` when anything was removed.
fn drop_shadowed(
    merged: &mut YamlValue,
    base: Option<&YamlValue>,
    node: Option<&YamlValue>,
    field: &str,
) -> bool {
    let (YamlValue::Mapping(entries), Some(YamlValue::Mapping(config))) = (merged, node) else {
        return false;
    };
    let prefilled = match base {
        Some(YamlValue::Mapping(mapping)) => Some(mapping),
        _ => None,
    };
    let introduces_keys = config
        .keys()
        .any(|candidate| prefilled.is_none_or(|mapping| !mapping.contains_key(candidate)));
    let mut dropped = false;
    if introduces_keys
        && !config.contains_key(field)
        && prefilled.is_some_and(|mapping| mapping.contains_key(field))
    {
        dropped = entries.remove(field).is_some();
    }
    for (name, child) in entries.iter_mut() {
        let Some(config_child) = config.get(name) else {
            continue;
        };
        let base_child = prefilled.and_then(|mapping| mapping.get(name));
        dropped |= drop_shadowed(child, base_child, Some(config_child), field);
    }
    dropped
}

/// Fail when `T` ignores any entry that `node` itself supplies.
fn reject_unknown<T>(merged: &YamlValue, node: &YamlValue, key: &str) -> ConfigResult<()>
where
    T: DeserializeOwned,
{
    let mut unknown = Vec::new();
    let outcome: Result<T, _> = serde_ignored::deserialize(capturable_keys(merged), |ignored| {
        let mut segments = Vec::new();
        collect_segments(&ignored, &mut segments);
        if mentions(node, &segments) {
            unknown.push(ignored.to_string());
        }
    });
    if let Err(err) = outcome {
        debug!(key, error = %err, "unknown-field detection stopped early");
    }
    if unknown.is_empty() {
        return Ok(());
    }
    Err(ConfigError::decode(
        key,
        format!("unknown field(s): {}", unknown.join(", ")),
    ))
}

/// Copy of `node` whose mapping keys are all strings, integers or booleans,
/// the key kinds `serde_ignored` can track. Other keys are rendered.
fn capturable_keys(node: &YamlValue) -> YamlValue {
    match node {
        YamlValue::Mapping(mapping) => YamlValue::Mapping(
            mapping
                .iter()
                .map(|(name, value)| {
                    let tracked = match name {
                        YamlValue::String(_) | YamlValue::Bool(_) => name.clone(),
                        YamlValue::Number(number) if !is_float(number) => name.clone(),
                        other => YamlValue::String(describe_key(other)),
                    };
                    (tracked, capturable_keys(value))
                })
                .collect::<Mapping>(),
        ),
        YamlValue::Sequence(items) => YamlValue::Sequence(items.iter().map(capturable_keys).collect()),
        YamlValue::Tagged(tagged) => {
            let mut copy = (**tagged).clone();
            copy.value = capturable_keys(&tagged.value);
            YamlValue::Tagged(Box::new(copy))
        }
        YamlValue::Null | YamlValue::Bool(_) | YamlValue::Number(_) | YamlValue::String(_) => {
            node.clone()
        }
    }
}

fn is_float(number: &Number) -> bool {
    number.is_f64()
}

enum Segment {
    Key(String),
    Index(usize),
}

fn collect_segments(path: &Path<'_>, segments: &mut Vec<Segment>) {
    match path {
        Path::Root => {}
        Path::Seq { parent, index } => {
            collect_segments(parent, segments);
            segments.push(Segment::Index(*index));
        }
        Path::Map { parent, key } => {
            collect_segments(parent, segments);
            segments.push(Segment::Key(key.clone()));
        }
        Path::Some { parent } | Path::NewtypeStruct { parent } | Path::NewtypeVariant { parent } => {
            collect_segments(parent, segments);
        }
    }
}

/// Returns `true` when `node` contains an entry at `segments`.
fn mentions(node: &YamlValue, segments: &[Segment]) -> bool {
    let Some((first, rest)) = segments.split_first() else {
        return true;
    };
    let next = match (untagged(node), first) {
        (YamlValue::Mapping(mapping), Segment::Key(wanted)) => mapping
            .iter()
            .find_map(|(name, value)| (describe_key(name) == *wanted).then_some(value)),
        (YamlValue::Sequence(items), Segment::Index(index)) => items.get(*index),
        _ => None,
    };
    next.is_some_and(|child| mentions(child, rest))
}

fn untagged(mut node: &YamlValue) -> &YamlValue {
    while let YamlValue::Tagged(tagged) = node {
        node = &tagged.value;
    }
    node
}
