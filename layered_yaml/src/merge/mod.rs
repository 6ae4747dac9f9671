//! Merge engine combining ordered sources into one YAML document.
//!
//! Each source is parsed on its own (so strict mode can reject a document
//! that repeats a key before anything is combined) and the resulting trees
//! are folded left to right with [`merge_value`]. The fold is re-serialised
//! so that expansion and the final decode each run exactly once over plain
//! text, free of any source's comments or formatting.

use serde_yaml::{Mapping, Value};
use tracing::debug;

use crate::source::Source;
use crate::tree::{parse_document, render};
use crate::{ConfigResult, YamlResultExt};

/// Merge `sources` in priority order and serialise the result.
///
/// Sources without a YAML document (empty or comment-only) are skipped. If
/// no source has content the result is the empty string, which is distinct
/// from a merged explicit `null`.
///
/// # Errors
///
/// Returns the first parse or duplicate-key failure, naming the source.
pub(crate) fn merge_sources(sources: &[Source], strict: bool) -> ConfigResult<String> {
    let mut merged: Option<Value> = None;
    for source in sources {
        let Some(tree) = parse_document(source.origin(), source.bytes(), strict)? else {
            debug!(origin = source.origin(), "skipping source without content");
            continue;
        };
        match merged.as_mut() {
            Some(accumulated) => merge_value(accumulated, tree),
            None => merged = Some(tree),
        }
    }
    debug!(sources = sources.len(), empty = merged.is_none(), "merged YAML sources");
    merged.map_or_else(
        || Ok(String::new()),
        |tree| render(&tree).into_internal("re-serialising merged sources"),
    )
}

/// Overlay `layer` onto `target`, updating `target` in place.
///
/// Two mappings merge key by key, recursively. Any other combination,
/// including sequences, explicit nulls and mismatched kinds, replaces
/// `target` with `layer` wholesale.
///
/// # Examples
///
/// ```
/// use layered_yaml::merge_value;
/// use serde_yaml::Value;
///
/// let mut target: Value = serde_yaml::from_str("a: {x: 1}").expect("valid YAML");
/// let layer: Value = serde_yaml::from_str("a: {y: 2}").expect("valid YAML");
/// merge_value(&mut target, layer);
/// let expected: Value = serde_yaml::from_str("a: {x: 1, y: 2}").expect("valid YAML");
/// assert_eq!(target, expected);
/// ```
pub fn merge_value(target: &mut Value, layer: Value) {
    match layer {
        Value::Mapping(map) => merge_mapping(target, map),
        Value::Null
        | Value::Bool(_)
        | Value::Number(_)
        | Value::String(_)
        | Value::Sequence(_)
        | Value::Tagged(_) => {
            *target = layer;
        }
    }
}

/// Merge the mapping `map` into `target`, replacing `target` outright when
/// it is not itself a mapping.
fn merge_mapping(target: &mut Value, map: Mapping) {
    let Value::Mapping(target_map) = target else {
        *target = Value::Mapping(map);
        return;
    };
    for (key, value) in map {
        match target_map.get_mut(&key) {
            Some(existing) => merge_value(existing, value),
            None => {
                target_map.insert(key, value);
            }
        }
    }
}
