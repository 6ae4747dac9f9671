//! Extensions for mapping errors to `ConfigResult` concisely.
//!
//! These helpers reduce repetitive `.map_err(|e| ConfigError::…)` patterns
//! when classifying `serde_yaml` failures into the crate's taxonomy.
//!
//! - Use [`YamlResultExt::into_internal`] where the provider guarantees the
//!   operation cannot fail, e.g. re-serialising a tree it parsed itself.
//! - Use [`YamlResultExt::into_decode`] where a caller's destination type
//!   rejected the data.
//! - Use [`YamlResultExt::into_encode`] where a caller-supplied value could
//!   not be serialised.
//!
//! # Examples
//!
//! ```
//! use layered_yaml::{ConfigResult, YamlResultExt};
//!
//! fn render(value: &serde_yaml::Value) -> ConfigResult<String> {
//!     serde_yaml::to_string(value).into_internal("rendering a parsed tree")
//! }
//!
//! assert!(render(&serde_yaml::Value::Null).is_ok());
//! ```

use crate::{ConfigError, ConfigResult};

/// Classification helpers for `Result<T, serde_yaml::Error>`.
pub trait YamlResultExt<T> {
    /// Map the error into [`ConfigError::Internal`], prefixed with `context`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Internal`] when the input is `Err`.
    fn into_internal(self, context: &str) -> ConfigResult<T>;

    /// Map the error into [`ConfigError::Decode`] for the dotted `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Decode`] when the input is `Err`.
    fn into_decode(self, path: &str) -> ConfigResult<T>;

    /// Map the error into [`ConfigError::Encode`] describing `what`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Encode`] when the input is `Err`.
    fn into_encode(self, what: &str) -> ConfigResult<T>;
}

impl<T> YamlResultExt<T> for Result<T, serde_yaml::Error> {
    fn into_internal(self, context: &str) -> ConfigResult<T> {
        self.map_err(|e| ConfigError::internal(format!("{context}: {e}")))
    }

    fn into_decode(self, path: &str) -> ConfigResult<T> {
        self.map_err(|e| ConfigError::decode(path, e.to_string()))
    }

    fn into_encode(self, what: &str) -> ConfigResult<T> {
        self.map_err(|source| ConfigError::Encode {
            what: what.to_owned(),
            source,
        })
    }
}

/// Convert crate errors into `figment::Error` for interop with code that
/// expects Figment's error type.
pub trait IntoFigmentError {
    /// Convert into a `figment::Error`, preserving the message text.
    fn into_figment(self) -> figment::Error;
}

impl IntoFigmentError for ConfigError {
    fn into_figment(self) -> figment::Error {
        figment::Error::from(self)
    }
}

impl IntoFigmentError for &ConfigError {
    fn into_figment(self) -> figment::Error {
        figment::Error::from(self.to_string())
    }
}

/// Extension to convert `ConfigResult<T>` into `Result<T, figment::Error>`.
pub trait ResultIntoFigment<T> {
    /// Map the error into a `figment::Error` using [`IntoFigmentError`].
    ///
    /// # Errors
    ///
    /// Returns a `figment::Error` containing the original message.
    fn to_figment(self) -> Result<T, figment::Error>;
}

impl<T> ResultIntoFigment<T> for ConfigResult<T> {
    fn to_figment(self) -> Result<T, figment::Error> {
        self.map_err(IntoFigmentError::into_figment)
    }
}
