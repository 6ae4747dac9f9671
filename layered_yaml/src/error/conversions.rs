//! Conversions between `ConfigError` and figment's error type.

use figment::Error as FigmentError;

use super::ConfigError;

impl From<ConfigError> for FigmentError {
    /// Allow using `?` in code that returns `figment::Error`.
    fn from(e: ConfigError) -> Self {
        Self::from(e.to_string())
    }
}
