//! Construction options for [`YamlProvider`].
//!
//! Option failures (an unreadable file, a value that cannot be serialised)
//! are held back and reported by [`YamlBuilder::build`], so option calls
//! chain without intermediate `?`.

use std::fmt;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::expand::{LookupFn, env_lookup, expand_variables};
use crate::merge::merge_sources;
use crate::provider::{ProviderState, YamlProvider};
use crate::source::Source;
use crate::tree::parse_document;
use crate::{ConfigError, ConfigResult};

/// Name given to providers that do not set one.
pub const DEFAULT_NAME: &str = "YAML";

/// Builder for [`YamlProvider`].
///
/// Sources are merged in the order they are added: later sources override
/// earlier ones. Strict validation and environment lookup are on by
/// default.
///
/// # Examples
///
/// ```rust
/// use layered_yaml::YamlProvider;
///
/// let provider = YamlProvider::builder()
///     .name("service")
///     .source("server:\n  port: 80\n  host: example.com\n")
///     .source("server:\n  host: ${HOST:localhost}\n")
///     .expand(|_| None)
///     .build()?;
///
/// let mut host = String::new();
/// provider.get("server.host").populate(&mut host)?;
/// assert_eq!(host, "localhost");
/// # Ok::<_, layered_yaml::ConfigError>(())
/// ```
pub struct YamlBuilder {
    name: String,
    sources: Vec<Source>,
    lookup: LookupFn,
    strict: bool,
    error: Option<ConfigError>,
}

impl Default for YamlBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for YamlBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("YamlBuilder")
            .field("name", &self.name)
            .field("sources", &self.sources.len())
            .field("strict", &self.strict)
            .field("error", &self.error)
            .finish_non_exhaustive()
    }
}

impl YamlBuilder {
    /// Creates a strict builder named [`DEFAULT_NAME`] that expands
    /// variables from the process environment.
    #[must_use]
    pub fn new() -> Self {
        Self {
            name: DEFAULT_NAME.to_owned(),
            sources: Vec::new(),
            lookup: env_lookup(),
            strict: true,
            error: None,
        }
    }

    /// Overrides the provider name used in diagnostics.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Appends a YAML source whose `${...}` references are expanded.
    #[must_use]
    pub fn source(self, contents: impl AsRef<[u8]>) -> Self {
        let origin = self.next_origin();
        self.push(Source::new(origin, contents.as_ref(), false))
    }

    /// Appends a YAML source protected from variable expansion.
    ///
    /// Use this for text that legitimately contains `${...}`, such as
    /// embedded shell snippets.
    #[must_use]
    pub fn raw_source(self, contents: impl AsRef<[u8]>) -> Self {
        let origin = self.next_origin();
        self.push(Source::new(origin, contents.as_ref(), true))
    }

    /// Reads a source from `reader`, marking it raw when `raw` is set.
    ///
    /// A read failure is reported by [`YamlBuilder::build`].
    #[must_use]
    pub fn source_reader(mut self, mut reader: impl Read, raw: bool) -> Self {
        let origin = self.next_origin();
        let mut contents = Vec::new();
        match reader.read_to_end(&mut contents) {
            Ok(_) => self.push(Source::new(origin, contents, raw)),
            Err(err) => {
                self.record_error(ConfigError::invalid_option(origin, err));
                self
            }
        }
    }

    /// Reads a YAML file as an expandable source.
    ///
    /// A missing or unreadable file is reported by [`YamlBuilder::build`].
    #[must_use]
    pub fn file(mut self, path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let origin = path.display().to_string();
        match std::fs::read(path) {
            Ok(contents) => self.push(Source::new(origin, contents, false)),
            Err(err) => {
                self.record_error(ConfigError::invalid_option(format!("file {origin}"), err));
                self
            }
        }
    }

    /// Serialises `value` to YAML and appends it as a raw source.
    ///
    /// Static values are data rather than templates, so they are never
    /// expanded.
    #[must_use]
    pub fn static_value<T>(mut self, value: &T) -> Self
    where
        T: Serialize + ?Sized,
    {
        match serde_yaml::to_string(value) {
            Ok(contents) => self.push(Source::new("static value", contents.as_bytes(), true)),
            Err(err) => {
                self.record_error(ConfigError::invalid_option("static value", err));
                self
            }
        }
    }

    /// Disables strict validation: duplicate keys keep their last value
    /// and unknown fields are ignored when populating.
    #[must_use]
    pub const fn permissive(mut self) -> Self {
        self.strict = false;
        self
    }

    /// Replaces the environment lookup used for `${...}` expansion.
    #[must_use]
    pub fn expand<F>(self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        self.lookup(Arc::new(lookup))
    }

    /// Merges, expands and decodes the configured sources.
    ///
    /// # Errors
    ///
    /// Returns the first option failure, or any parse, duplicate-key or
    /// variable error found while merging and expanding. No provider is
    /// produced on failure.
    pub fn build(self) -> ConfigResult<YamlProvider> {
        if let Some(err) = self.error {
            return Err(err);
        }
        let recorded: Vec<Source> = self.sources.iter().map(Source::protect).collect();
        let merged = merge_sources(&recorded, self.strict)?;
        let expanded = expand_variables(self.lookup.as_ref(), &merged)?;
        let contents = parse_document("merged document", expanded.as_bytes(), self.strict)?;
        if contents.is_none() {
            debug!(name = %self.name, "provider has no content");
        }
        Ok(YamlProvider::from_state(ProviderState {
            name: self.name,
            sources: recorded,
            lookup: self.lookup,
            contents,
            strict: self.strict,
        }))
    }

    pub(crate) fn lookup(mut self, lookup: LookupFn) -> Self {
        self.lookup = lookup;
        self
    }

    pub(crate) fn push(mut self, source: Source) -> Self {
        self.sources.push(source);
        self
    }

    fn next_origin(&self) -> String {
        format!("source #{}", self.sources.len())
    }

    fn record_error(&mut self, err: ConfigError) {
        if self.error.is_none() {
            self.error = Some(err);
        }
    }
}
