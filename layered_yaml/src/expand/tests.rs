//! Expansion and escaping coverage.

use std::collections::HashMap;

use anyhow::{Result, anyhow, ensure};
use rstest::{fixture, rstest};

use super::{escape_variables, expand_variables};
use crate::ConfigError;

#[fixture]
fn vars() -> HashMap<&'static str, &'static str> {
    HashMap::from([("USER", "alice"), ("PORT", "8080"), ("EMPTY", "")])
}

fn expand(vars: &HashMap<&'static str, &'static str>, text: &str) -> Result<String> {
    let lookup = |name: &str| vars.get(name).map(|value| (*value).to_owned());
    expand_variables(&lookup, text).map_err(|err| anyhow!(err.to_string()))
}

#[rstest]
#[case("user: ${USER}", "user: alice")]
#[case("addr: ${HOST:localhost}:${PORT}", "addr: localhost:8080")]
#[case("user: ${USER:bob}", "user: alice")]
#[case("empty: '${EMPTY}'", "empty: ''")]
#[case("price: $5", "price: $5")]
#[case("trailing: $", "trailing: $")]
#[case("escaped: $${USER}", "escaped: ${USER}")]
#[case("double: $$$$", "double: $$")]
#[case("url: ${URL:http://example.com}", "url: http://example.com")]
#[case("plain: text", "plain: text")]
fn expands_references(
    vars: HashMap<&'static str, &'static str>,
    #[case] input: &str,
    #[case] expected: &str,
) -> Result<()> {
    let output = expand(&vars, input)?;
    ensure!(output == expected, "expected {expected:?}, got {output:?}");
    Ok(())
}

#[rstest]
fn missing_variable_without_default_is_an_error() {
    let lookup = |_: &str| -> Option<String> { None };
    let err = expand_variables(&lookup, "key: ${NOPE}").expect_err("missing variable");
    assert!(
        matches!(err, ConfigError::MissingVariable { ref name, .. } if name == "NOPE"),
        "unexpected error: {err:?}"
    );
}

#[rstest]
fn empty_inline_default_counts_as_missing() {
    let lookup = |_: &str| -> Option<String> { None };
    let err = expand_variables(&lookup, "key: ${NOPE:}").expect_err("empty default");
    assert!(err.to_string().contains(r#"use "" for empty string"#), "missing hint: {err}");
}

#[rstest]
#[case("key: ${UNCLOSED", 5)]
#[case("a: b\nkey: ${}", 10)]
#[case("key: ${:fallback}", 5)]
fn malformed_references_report_offsets(#[case] input: &str, #[case] expected: usize) {
    let lookup = |_: &str| Some(String::from("x"));
    match expand_variables(&lookup, input) {
        Err(ConfigError::VariableSyntax { offset, .. }) => assert_eq!(offset, expected),
        other => panic!("expected VariableSyntax, got {other:?}"),
    }
}

#[rstest]
fn escaped_text_survives_one_expansion(vars: HashMap<&'static str, &'static str>) -> Result<()> {
    let original = "script: echo ${USER} costs $5";
    let escaped = String::from_utf8(escape_variables(original.as_bytes()))?;
    ensure!(expand(&vars, &escaped)? == original, "escaping should round-trip");
    Ok(())
}

#[rstest]
fn lookup_sees_only_the_name() -> Result<()> {
    let lookup = |name: &str| (name == "A").then(|| String::from("value"));
    let output = expand_variables(&lookup, "${A:ignored}").map_err(|err| anyhow!(err.to_string()))?;
    ensure!(output == "value", "found variables take precedence over defaults");
    Ok(())
}
