//! Error types produced while building and reading a provider.

mod constructors;
mod conversions;
mod types;

pub use types::ConfigError;

/// Convenience alias used throughout the crate.
pub type ConfigResult<T> = Result<T, ConfigError>;
