//! Constructors and classification helpers for `ConfigError`.

use super::ConfigError;

impl ConfigError {
    /// Construct an [`ConfigError::InvalidOption`] for the named option.
    ///
    /// # Examples
    ///
    /// ```
    /// use layered_yaml::ConfigError;
    /// let io = std::io::Error::other("boom");
    /// let e = ConfigError::invalid_option("file config.yaml", io);
    /// assert!(matches!(e, ConfigError::InvalidOption { .. }));
    /// ```
    #[must_use]
    pub fn invalid_option(
        option: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::InvalidOption {
            option: option.into(),
            source: source.into(),
        }
    }

    /// Report a variable without a value. `empty_default` adds a hint for
    /// references written as `${NAME:}`.
    #[must_use]
    pub fn missing_variable(name: &str, empty_default: bool) -> Self {
        let message = if empty_default {
            format!(r#"default is empty for "{name}" (use "" for empty string)"#)
        } else {
            format!(r#"variable "{name}" is not set and has no default"#)
        };
        Self::MissingVariable {
            name: name.to_owned(),
            message,
        }
    }

    /// Construct a [`ConfigError::VariableSyntax`] at `offset`.
    #[must_use]
    pub fn variable_syntax(offset: usize, message: impl Into<String>) -> Self {
        Self::VariableSyntax {
            offset,
            message: message.into(),
        }
    }

    /// Construct a [`ConfigError::Decode`] for the dotted `path`.
    #[must_use]
    pub fn decode(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Construct a [`ConfigError::Internal`].
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Returns `true` when the error reports a library bug rather than
    /// invalid input.
    ///
    /// # Examples
    ///
    /// ```
    /// use layered_yaml::ConfigError;
    /// assert!(ConfigError::internal("boom").is_internal());
    /// assert!(!ConfigError::decode("a.b", "boom").is_internal());
    /// ```
    #[must_use]
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal { .. })
    }
}
