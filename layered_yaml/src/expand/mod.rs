//! Variable expansion over merged YAML text.
//!
//! References take the form `${NAME}` or `${NAME:default}`. `$$` stands for
//! a literal `$`; raw sources are protected by doubling every `$` before
//! merging, so a single expansion pass restores their text verbatim.
//! Expansion runs once, on the merged document, never per source.

use std::sync::Arc;

use tracing::trace;

use crate::{ConfigError, ConfigResult};

/// Resolves a variable name to its value, or `None` when it is unset.
pub type LookupFn = Arc<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// The default lookup, reading the process environment.
#[must_use]
pub fn env_lookup() -> LookupFn {
    Arc::new(|name: &str| std::env::var(name).ok())
}

/// Double every `$` so the text passes through expansion unchanged.
///
/// # Examples
///
/// ```
/// use layered_yaml::escape_variables;
/// assert_eq!(escape_variables(b"cmd: echo ${HOME}"), b"cmd: echo $${HOME}".to_vec());
/// ```
#[must_use]
pub fn escape_variables(bytes: &[u8]) -> Vec<u8> {
    let mut escaped = Vec::with_capacity(bytes.len());
    for &byte in bytes {
        if byte == b'$' {
            escaped.push(b'$');
        }
        escaped.push(byte);
    }
    escaped
}

/// Substitute every variable reference in `document` using `lookup`.
///
/// # Errors
///
/// Returns [`ConfigError::MissingVariable`] for an unset variable without a
/// usable default and [`ConfigError::VariableSyntax`] for an unterminated
/// reference or an empty name.
///
/// # Examples
///
/// ```
/// use layered_yaml::expand_variables;
///
/// let lookup = |name: &str| (name == "PORT").then(|| "8080".to_owned());
/// let expanded = expand_variables(&lookup, "port: ${PORT}\nhost: ${HOST:localhost}\n")?;
/// assert_eq!(expanded, "port: 8080\nhost: localhost\n");
/// # Ok::<_, layered_yaml::ConfigError>(())
/// ```
pub fn expand_variables(
    lookup: &dyn Fn(&str) -> Option<String>,
    document: &str,
) -> ConfigResult<String> {
    let mut expanded = String::with_capacity(document.len());
    let mut rest = document;
    while let Some(dollar) = rest.find('$') {
        let (literal, tail) = rest.split_at(dollar);
        expanded.push_str(literal);
        let offset = document.len() - tail.len();
        let after = tail.strip_prefix('$').unwrap_or(tail);
        if let Some(remaining) = after.strip_prefix('$') {
            expanded.push('$');
            rest = remaining;
        } else if let Some(reference) = after.strip_prefix('{') {
            let Some((body, remaining)) = reference.split_once('}') else {
                return Err(ConfigError::variable_syntax(offset, r#"unclosed "${""#));
            };
            expanded.push_str(&resolve(lookup, body, offset)?);
            rest = remaining;
        } else {
            expanded.push('$');
            rest = after;
        }
    }
    expanded.push_str(rest);
    Ok(expanded)
}

fn resolve(
    lookup: &dyn Fn(&str) -> Option<String>,
    body: &str,
    offset: usize,
) -> ConfigResult<String> {
    let (name, default) = match body.split_once(':') {
        Some((name, default)) => (name, default),
        None => (body, ""),
    };
    if name.is_empty() {
        return Err(ConfigError::variable_syntax(offset, "empty variable name"));
    }
    if let Some(value) = lookup(name) {
        trace!(name, "expanded variable");
        return Ok(value);
    }
    if default.is_empty() {
        return Err(ConfigError::missing_variable(name, body.contains(':')));
    }
    trace!(name, "variable unset; using inline default");
    Ok(default.to_owned())
}

#[cfg(test)]
mod tests;
