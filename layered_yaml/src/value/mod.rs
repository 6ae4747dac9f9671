//! Path-addressed handles into a provider's configuration.

use std::fmt;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_yaml::{Mapping, Value as YamlValue};

use crate::provider::{SEPARATOR, YamlProvider, split_key};
use crate::tree::render;
use crate::{ConfigResult, Provider, ROOT, YamlResultExt};

/// A subset of a provider's configuration, addressed by path.
///
/// Values never own configuration data: they pair a path with the provider
/// that holds the tree, so creating and descending them is cheap and never
/// fails. Lookups happen when the value is read.
#[derive(Clone)]
pub struct Value {
    path: Vec<String>,
    provider: YamlProvider,
}

impl Value {
    pub(crate) const fn new(provider: YamlProvider, path: Vec<String>) -> Self {
        Self { path, provider }
    }

    /// Descends further into the configuration.
    ///
    /// `path` is split on `.` and each segment is treated as a nested
    /// mapping key, so `value.get("a.b").get("c")` addresses the same node
    /// as `value.get("a.b.c")`. [`ROOT`] returns this value unchanged.
    #[must_use]
    pub fn get(&self, path: &str) -> Self {
        if path == ROOT {
            return self.clone();
        }
        let mut extended = self.path.clone();
        extended.extend(split_key(path));
        Self::new(self.provider.clone(), extended)
    }

    /// Returns `true` if any configuration exists at this path, including
    /// an explicit `null`.
    ///
    /// Configuration supplied at construction and configuration supplied
    /// through [`Value::with_default`] are indistinguishable here.
    #[must_use]
    pub fn has_value(&self) -> bool {
        self.provider.at(&self.path).is_some()
    }

    /// Decodes the configuration at this path into `target`.
    ///
    /// Nothing happens when the path is absent. Fields of `target` that
    /// the configuration does not mention keep their current values, so
    /// defaults can be set on the struct before populating it. Those
    /// pre-filled fields never count as unknown, and a field the
    /// configuration sets through a `#[serde(alias)]` replaces its
    /// pre-filled value.
    ///
    /// An explicit `null` replaces the target outright: `Option` and generic
    /// targets become empty, while types that cannot represent `null`, such
    /// as structs, report a decode error and are left unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ConfigError::Decode`] when the configuration does not
    /// fit `target` (including unknown fields under strict mode) and
    /// [`crate::ConfigError::Encode`] when `target` cannot be serialised.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use layered_yaml::YamlProvider;
    /// use serde::{Deserialize, Serialize};
    ///
    /// #[derive(Deserialize, Serialize)]
    /// struct Server {
    ///     host: String,
    ///     port: u16,
    /// }
    ///
    /// let provider = YamlProvider::from_bytes(["server:\n  port: 9000\n"])?;
    /// let mut server = Server { host: String::from("localhost"), port: 80 };
    /// provider.get("server").populate(&mut server)?;
    /// assert_eq!(server.host, "localhost");
    /// assert_eq!(server.port, 9000);
    /// # Ok::<_, layered_yaml::ConfigError>(())
    /// ```
    pub fn populate<T>(&self, target: &mut T) -> ConfigResult<()>
    where
        T: Serialize + DeserializeOwned,
    {
        self.provider.populate(&self.path, target)
    }

    /// Returns a deep copy of the configuration at this path, or `null`
    /// when the path is absent.
    ///
    /// The copy is detached from the provider and keeps every key kind the
    /// provider accepted, including `null` and float keys.
    #[must_use]
    pub fn value(&self) -> YamlValue {
        self.provider.at(&self.path).cloned().unwrap_or(YamlValue::Null)
    }

    /// Supplies default configuration for this path.
    ///
    /// The default is nested under this value's path and placed beneath
    /// every source of the provider, which is then rebuilt. Existing values
    /// are untouched; the returned value addresses the same path on the new
    /// provider. Variables are expanded again during the rebuild.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ConfigError::Encode`] when `default` cannot be
    /// serialised, or any error raised while rebuilding the provider.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use layered_yaml::YamlProvider;
    /// use serde_yaml::Value;
    ///
    /// let provider = YamlProvider::from_bytes(["a:\n  b:\n    x: 1\n"])?;
    /// let defaulted = provider.get("a.b").with_default(&serde_yaml::from_str::<Value>("z: 9").expect("valid YAML"))?;
    /// assert_eq!(defaulted.value(), serde_yaml::from_str::<Value>("{x: 1, z: 9}").expect("valid YAML"));
    /// # Ok::<_, layered_yaml::ConfigError>(())
    /// ```
    pub fn with_default<T>(&self, default: &T) -> ConfigResult<Self>
    where
        T: Serialize + ?Sized,
    {
        let mut fallback = serde_yaml::to_value(default).into_encode("default")?;
        for segment in self.path.iter().rev() {
            let mut wrapper = Mapping::new();
            wrapper.insert(YamlValue::String(segment.clone()), fallback);
            fallback = YamlValue::Mapping(wrapper);
        }
        let provider = self.provider.with_default(&fallback)?;
        Ok(Self::new(provider, self.path.clone()))
    }

    /// Returns the name of the provider this value reads from.
    #[must_use]
    pub fn source(&self) -> &str {
        self.provider.name()
    }

    /// Returns the dotted path of this value; empty for the root.
    #[must_use]
    pub fn key(&self) -> String {
        self.path.join(&SEPARATOR.to_string())
    }

    /// Returns the provider this value reads from.
    #[must_use]
    pub const fn provider(&self) -> &YamlProvider {
        &self.provider
    }
}

impl PartialEq for Value {
    /// Values are equal when they come from providers with the same name,
    /// address the same path, and find the same configuration there.
    fn eq(&self, other: &Self) -> bool {
        self.source() == other.source()
            && self.path == other.path
            && self.provider.at(&self.path) == other.provider.at(&other.path)
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Value")
            .field("source", &self.source())
            .field("key", &self.key())
            .field("contents", &self.provider.at(&self.path))
            .finish()
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered = render(&self.value()).map_err(|_| fmt::Error)?;
        f.write_str(rendered.trim_end())
    }
}

/// Builds a value while checking caller expectations against the provider.
///
/// # Panics
///
/// Panics when `found` disagrees with whether `provider` has configuration
/// at `key`, or when `value` differs from that configuration.
#[deprecated(
    since = "0.2.0",
    note = "use `Provider::get` directly; this constructor panics on inconsistent input"
)]
#[track_caller]
pub fn new_value<P, T>(provider: &P, key: &str, value: &T, found: bool) -> Value
where
    P: Provider + ?Sized,
    T: Serialize + ?Sized,
{
    let actual = provider.get(key);
    let has = actual.has_value();
    if has != found {
        let name = provider.name();
        if has {
            panic!(
                "inconsistent parameters: provider {name} has value at key {key:?} but found parameter was false"
            );
        }
        panic!(
            "inconsistent parameters: provider {name} has no value at key {key:?} but found parameter was true"
        );
    }
    let contents = actual.value();
    let expected = match serde_yaml::to_value(value) {
        Ok(expected) => expected,
        Err(err) => panic!("can't check new_value parameter consistency: {err}"),
    };
    if contents != expected {
        panic!(
            "inconsistent parameters: provider {} has {contents:?} at key {key:?} but value was {expected:?}",
            provider.name()
        );
    }
    actual
}

#[cfg(test)]
mod tests;
