//! Layered YAML configuration.
//!
//! A [`YamlProvider`] reads one or more YAML sources, deep-merges them in
//! order (later sources win), expands `${NAME}` and `${NAME:default}`
//! references once over the merged text, and exposes the result through
//! dotted paths.
//!
//! Merging follows three rules: mappings merge key by key, recursively;
//! every other pairing (scalars, sequences, explicit `null`, mismatched
//! kinds) is replaced by the later source; sources without any document
//! are skipped. Strict mode, the default, additionally rejects a source
//! that repeats a key and rejects unknown fields when populating.
//!
//! ```rust
//! use layered_yaml::YamlProvider;
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, Default, Deserialize, Serialize)]
//! struct Logging {
//!     level: String,
//!     targets: Vec<String>,
//! }
//!
//! let base = "logging:\n  level: info\n  targets: [stdout]\n";
//! let overrides = "logging:\n  level: ${LOG_LEVEL:debug}\n";
//! let provider = YamlProvider::builder()
//!     .source(base)
//!     .source(overrides)
//!     .expand(|_| None)
//!     .build()?;
//!
//! let mut logging = Logging::default();
//! provider.get("logging").populate(&mut logging)?;
//! assert_eq!(logging.level, "debug");
//! assert_eq!(logging.targets, ["stdout"]);
//! # Ok::<_, layered_yaml::ConfigError>(())
//! ```
//!
//! Providers are immutable. [`Value::with_default`] returns a value on a
//! rebuilt provider whose defaults sit beneath every original source.

mod builder;
mod error;
mod expand;
mod merge;
mod provider;
mod result_ext;
mod source;
mod tree;
mod value;

pub use builder::{DEFAULT_NAME, YamlBuilder};
pub use error::{ConfigError, ConfigResult};
pub use expand::{LookupFn, env_lookup, escape_variables, expand_variables};
pub use merge::merge_value;
pub use provider::YamlProvider;
pub use result_ext::{IntoFigmentError, ResultIntoFigment, YamlResultExt};
pub use value::{Value, new_value};

pub use serde_yaml;

/// Key addressing the whole configuration document.
pub const ROOT: &str = "";

/// A source of configuration addressed by dotted keys.
pub trait Provider {
    /// Name of the provider, used in diagnostics.
    fn name(&self) -> &str;

    /// Returns a handle on the configuration at `key`; see [`ROOT`].
    fn get(&self, key: &str) -> Value;
}
