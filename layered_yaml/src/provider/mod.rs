//! The merged, expanded and decoded configuration tree.
//!
//! A [`YamlProvider`] is an immutable, cheaply cloned handle. Reads never
//! mutate it; applying a default rebuilds a brand-new provider from the
//! recorded sources so earlier providers and values stay valid.

mod decode;
mod figment_interop;

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_yaml::Value as YamlValue;
use tracing::{debug, trace};

use crate::builder::YamlBuilder;
use crate::expand::LookupFn;
use crate::source::Source;
use crate::tree::parse_scalar_key;
use crate::{ConfigResult, Provider, ROOT, Value, YamlResultExt};
use decode::decode_over;

/// Separator between path segments.
pub(crate) const SEPARATOR: char = '.';

/// Frozen state shared by a provider and every value derived from it.
pub(crate) struct ProviderState {
    pub(crate) name: String,
    /// Sources as merged, raw ones already escaped.
    pub(crate) sources: Vec<Source>,
    pub(crate) lookup: LookupFn,
    /// `None` when no source had any content.
    pub(crate) contents: Option<YamlValue>,
    pub(crate) strict: bool,
}

/// Provider reading configuration from one or more YAML sources.
///
/// Build one with [`YamlProvider::builder`] or the `from_*` shortcuts, then
/// read it through [`YamlProvider::get`].
///
/// # Examples
///
/// ```rust
/// use layered_yaml::{ROOT, YamlProvider};
///
/// let provider = YamlProvider::from_bytes(["a: {x: 1}", "a: {y: 2}"])?;
/// assert!(provider.get("a.x").has_value());
/// assert!(provider.get("a.y").has_value());
/// assert!(!provider.get("a.z").has_value());
/// assert_eq!(provider.get(ROOT), provider.get(ROOT).get(ROOT));
/// # Ok::<_, layered_yaml::ConfigError>(())
/// ```
#[derive(Clone)]
pub struct YamlProvider {
    state: Arc<ProviderState>,
}

impl fmt::Debug for YamlProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("YamlProvider")
            .field("name", &self.state.name)
            .field("sources", &self.state.sources.len())
            .field("strict", &self.state.strict)
            .field("contents", &self.state.contents)
            .finish_non_exhaustive()
    }
}

impl YamlProvider {
    /// Starts configuring a provider.
    #[must_use]
    pub fn builder() -> YamlBuilder {
        YamlBuilder::new()
    }

    /// Builds a strict provider from in-memory sources in priority order.
    ///
    /// # Errors
    ///
    /// See [`YamlBuilder::build`].
    pub fn from_bytes<I, B>(sources: I) -> ConfigResult<Self>
    where
        I: IntoIterator<Item = B>,
        B: AsRef<[u8]>,
    {
        sources
            .into_iter()
            .fold(Self::builder(), |builder, source| builder.source(source))
            .build()
    }

    /// Builds a strict provider from YAML files in priority order.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ConfigError::InvalidOption`] when a file cannot be read,
    /// otherwise see [`YamlBuilder::build`].
    pub fn from_files<I, P>(paths: I) -> ConfigResult<Self>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        paths
            .into_iter()
            .fold(Self::builder(), |builder, path| builder.file(path))
            .build()
    }

    /// Builds a provider holding a serialised copy of `value`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ConfigError::InvalidOption`] when `value` cannot be
    /// serialised.
    pub fn from_static<T>(value: &T) -> ConfigResult<Self>
    where
        T: Serialize + ?Sized,
    {
        Self::builder().name("static").static_value(value).build()
    }

    pub(crate) fn from_state(state: ProviderState) -> Self {
        Self {
            state: Arc::new(state),
        }
    }

    /// Returns the provider name. Defaults to `"YAML"`.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.state.name
    }

    /// Returns `true` when strict validation is enabled.
    #[must_use]
    pub fn is_strict(&self) -> bool {
        self.state.strict
    }

    /// Returns `true` when no source contributed any content.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.state.contents.is_none()
    }

    /// Returns a handle on the configuration at the dotted `key`.
    ///
    /// Each segment is used as a mapping key. Pass [`ROOT`] for the whole
    /// document. The lookup itself is deferred until the value is read.
    #[must_use]
    pub fn get(&self, key: &str) -> Value {
        Value::new(self.clone(), split_key(key))
    }

    /// Returns the node at `path`, or `None` when any segment is missing,
    /// an intermediate node is not a mapping, or the provider is empty.
    ///
    /// Segments match keys literally first, then as parsed YAML scalars so
    /// that `"1"` reaches an integer key `1`.
    pub(crate) fn at(&self, path: &[String]) -> Option<&YamlValue> {
        let mut current = self.state.contents.as_ref()?;
        for segment in path {
            let YamlValue::Mapping(mapping) = current else {
                trace!(segment = segment.as_str(), "path descends into a non-mapping");
                return None;
            };
            let next = mapping.get(segment.as_str()).or_else(|| {
                parse_scalar_key(segment).and_then(|key| mapping.get(&key))
            });
            let Some(node) = next else {
                trace!(segment = segment.as_str(), "path segment not found");
                return None;
            };
            current = node;
        }
        Some(current)
    }

    /// Decodes the node at `path` into `target`.
    ///
    /// An absent path leaves `target` untouched. Otherwise the node is
    /// deep-merged over the current contents of `target`, so fields the
    /// configuration does not mention keep their values.
    pub(crate) fn populate<T>(&self, path: &[String], target: &mut T) -> ConfigResult<()>
    where
        T: Serialize + DeserializeOwned,
    {
        let Some(node) = self.at(path) else {
            return Ok(());
        };
        let key = path.join(".");
        let base = serde_yaml::to_value(&*target).into_encode("populate target")?;
        *target = decode_over(&base, node, self.state.strict, &key)?;
        Ok(())
    }

    /// Rebuilds the provider with `default` as its lowest-priority source.
    ///
    /// Every recorded source is merged over the default again, so an
    /// explicit `null` in any of them still removes defaulted content.
    pub(crate) fn with_default<T>(&self, default: &T) -> ConfigResult<Self>
    where
        T: Serialize + ?Sized,
    {
        let rendered = serde_yaml::to_string(default).into_encode("default")?;
        debug!(name = self.name(), "rebuilding provider with default overlay");
        let mut builder = YamlBuilder::new()
            .name(self.name())
            .lookup(Arc::clone(&self.state.lookup))
            .push(Source::new("default", rendered.as_bytes(), true));
        for source in &self.state.sources {
            builder = builder.push(source.clone());
        }
        if !self.state.strict {
            builder = builder.permissive();
        }
        builder.build()
    }

    pub(crate) fn contents(&self) -> Option<&YamlValue> {
        self.state.contents.as_ref()
    }
}

impl Provider for YamlProvider {
    fn name(&self) -> &str {
        Self::name(self)
    }

    fn get(&self, key: &str) -> Value {
        Self::get(self, key)
    }
}

/// Split a dotted key into path segments; [`ROOT`] is the empty path.
pub(crate) fn split_key(key: &str) -> Vec<String> {
    if key == ROOT {
        return Vec::new();
    }
    key.split(SEPARATOR).map(str::to_owned).collect()
}
