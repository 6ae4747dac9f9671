//! Primary error enum for provider construction and reads.

use thiserror::Error;

/// Errors that can occur while building or reading a YAML provider.
///
/// Construction-time variants (`InvalidOption`, `SourceParse`,
/// `DuplicateKey`, `MissingVariable` and `VariableSyntax`) abort the build
/// entirely. `Encode` and `Decode` are reported by `populate` and
/// `with_default`. `Internal` signals a broken library invariant rather
/// than bad input.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// A builder option could not be applied.
    #[error("error applying options: {option}: {source}")]
    InvalidOption {
        /// Option that failed, e.g. the file path being read.
        option: String,
        /// Underlying failure.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A source, or the merged document, is not valid YAML.
    #[error("couldn't parse YAML from {origin}: {source}")]
    SourceParse {
        /// Label of the offending source.
        origin: String,
        /// Parser diagnostic.
        #[source]
        source: serde_yaml::Error,
    },

    /// Strict mode found the same key twice in one mapping of one source.
    #[error("duplicate key '{key}' in {origin}: {source}")]
    DuplicateKey {
        /// Label of the offending source.
        origin: String,
        /// Rendering of the repeated key.
        key: String,
        /// Parser diagnostic carrying the location.
        #[source]
        source: serde_yaml::Error,
    },

    /// A variable reference had no value and no inline default.
    #[error("{message}")]
    MissingVariable {
        /// Name of the variable.
        name: String,
        /// Human-readable explanation.
        message: String,
    },

    /// A variable reference is malformed.
    #[error("invalid variable reference at byte {offset}: {message}")]
    VariableSyntax {
        /// Byte offset of the `$` opening the reference.
        offset: usize,
        /// Human-readable explanation.
        message: String,
    },

    /// A caller-supplied value could not be serialised to YAML.
    #[error("can't marshal {what} to YAML: {source}")]
    Encode {
        /// What was being serialised.
        what: String,
        /// Serialiser diagnostic.
        #[source]
        source: serde_yaml::Error,
    },

    /// The destination rejected the configuration at `path`.
    #[error("couldn't decode configuration at key '{path}': {message}")]
    Decode {
        /// Dotted path being populated.
        path: String,
        /// Human-readable explanation.
        message: String,
    },

    /// An operation the provider guarantees cannot fail did fail.
    #[error("internal invariant violated (this is a bug in layered_yaml): {message}")]
    Internal {
        /// Description of the broken invariant.
        message: String,
    },
}
