//! Value handle coverage: descent, equality, rendering and the deprecated
//! validating constructor.

use anyhow::{Result, anyhow, ensure};
use rstest::{fixture, rstest};
use serde_yaml::Value as YamlValue;

use crate::{ROOT, YamlProvider};

#[fixture]
fn provider() -> YamlProvider {
    YamlProvider::builder()
        .name("fixture")
        .source("a:\n  b:\n    c: 1\n    d: ~\nlist: [x, y]\n")
        .build()
        .expect("fixture YAML is valid")
}

#[rstest]
fn descent_composes(provider: YamlProvider) {
    assert_eq!(provider.get("a.b").get("c"), provider.get("a.b.c"));
    assert_eq!(provider.get("a").get("b.c"), provider.get("a.b.c"));
    assert_eq!(provider.get("a.b").get(ROOT), provider.get("a.b"));
    assert_eq!(provider.get("a.b.c").key(), "a.b.c");
    assert_eq!(provider.get(ROOT).key(), "");
}

#[rstest]
fn values_from_differently_named_providers_differ(provider: YamlProvider) -> Result<()> {
    let other = YamlProvider::builder()
        .name("other")
        .source("a:\n  b:\n    c: 1\n    d: ~\nlist: [x, y]\n")
        .build()
        .map_err(|err| anyhow!(err.to_string()))?;
    ensure!(provider.get("a") != other.get("a"), "provider names should differ");
    ensure!(provider.get("a") != provider.get("list"), "paths should differ");
    Ok(())
}

#[rstest]
fn has_value_distinguishes_null_from_absent(provider: YamlProvider) {
    assert!(provider.get("a.b.d").has_value());
    assert!(!provider.get("a.b.e").has_value());
    assert!(!provider.get("list.x").has_value());
}

#[rstest]
fn value_returns_a_detached_copy(provider: YamlProvider) -> Result<()> {
    let mut copy = provider.get("a.b").value();
    if let YamlValue::Mapping(mapping) = &mut copy {
        mapping.insert(YamlValue::from("c"), YamlValue::from(99));
    }
    ensure!(provider.get("a.b.c").value() == YamlValue::from(1), "provider state mutated");
    ensure!(provider.get("missing").value() == YamlValue::Null, "absent paths read as null");
    Ok(())
}

#[rstest]
fn display_renders_yaml(provider: YamlProvider) {
    assert_eq!(provider.get("a.b.c").to_string(), "1");
    assert_eq!(provider.get("list").to_string(), "- x\n- y");
}

#[rstest]
fn source_reports_provider_name(provider: YamlProvider) {
    assert_eq!(provider.get("a").source(), "fixture");
    assert_eq!(provider.get("a").provider().name(), "fixture");
}

#[rstest]
fn with_default_at_root_merges_whole_document(provider: YamlProvider) -> Result<()> {
    let defaults: YamlValue = serde_yaml::from_str("extra: true\na: {b: {c: 0}}")?;
    let value = provider
        .get(ROOT)
        .with_default(&defaults)
        .map_err(|err| anyhow!(err.to_string()))?;
    ensure!(value.get("extra").value() == YamlValue::Bool(true), "default missing");
    ensure!(value.get("a.b.c").value() == YamlValue::from(1), "source should beat default");
    Ok(())
}

#[expect(deprecated, reason = "exercises the backwards-compatible constructor")]
mod new_value {
    use rstest::rstest;
    use serde_yaml::Value as YamlValue;

    use super::provider;
    use crate::{YamlProvider, new_value};

    #[rstest]
    fn accepts_consistent_parameters(provider: YamlProvider) {
        let value = new_value(&provider, "a.b.c", &1, true);
        assert_eq!(value, provider.get("a.b.c"));
        let absent = new_value(&provider, "nope", &YamlValue::Null, false);
        assert!(!absent.has_value());
    }

    #[rstest]
    #[should_panic(expected = "has value at key \"a.b.c\" but found parameter was false")]
    fn panics_when_found_is_wrongly_false(provider: YamlProvider) {
        let _ = new_value(&provider, "a.b.c", &1, false);
    }

    #[rstest]
    #[should_panic(expected = "has no value at key \"nope\" but found parameter was true")]
    fn panics_when_found_is_wrongly_true(provider: YamlProvider) {
        let _ = new_value(&provider, "nope", &YamlValue::Null, true);
    }

    #[rstest]
    #[should_panic(expected = "inconsistent parameters: provider fixture has")]
    fn panics_when_contents_differ(provider: YamlProvider) {
        let _ = new_value(&provider, "a.b.c", &2, true);
    }
}
