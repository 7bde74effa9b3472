//! Environment overlay tests.
//!
//! Responsibilities:
//! - Test that the active section overrides top-level values.
//! - Test that inactive sections and the scope key are dropped.

use serde_yaml::{Mapping, Value};

use super::yaml_to_path;
use crate::resolver::Resolver;

fn foo_only(value: &str) -> Mapping {
    let mut expected = Mapping::new();
    expected.insert(Value::from("foo"), Value::from(value));
    expected
}

#[test]
fn test_merges_environment_specific_values() {
    let (_dir, path) = yaml_to_path("foo: bar\ntest:\n  foo: baz\n");
    let resolver = Resolver::new(&path).with_environment("test");

    assert_eq!(resolver.configuration().unwrap(), &foo_only("baz"));
}

#[test]
fn test_drops_unused_environment_specific_values() {
    let (_dir, path) = yaml_to_path("foo: bar\ntest:\n  foo: baz\nproduction:\n  foo: bad\n");
    let resolver = Resolver::new(&path).with_environment("test");

    assert_eq!(resolver.configuration().unwrap(), &foo_only("baz"));
}

#[test]
fn test_anchored_section_inherits_defaults() {
    let yaml = "defaults: &defaults\n  foo: bar\n  baz: base\ntest:\n  <<: *defaults\n  baz: qux\n";
    let (_dir, path) = yaml_to_path(yaml);
    let resolver = Resolver::new(&path).with_environment("test");
    let configuration = resolver.configuration().unwrap();

    assert_eq!(configuration.len(), 2);
    assert_eq!(configuration.get("foo"), Some(&Value::from("bar")));
    assert_eq!(configuration.get("baz"), Some(&Value::from("qux")));
    assert!(configuration.get("<<").is_none());
    assert!(configuration.get("defaults").is_none());
}

#[test]
fn test_section_only_keys_are_added() {
    let (_dir, path) = yaml_to_path("foo: bar\nproduction:\n  secret: s3cr3t\n");
    let resolver = Resolver::new(&path).with_environment("production");
    let configuration = resolver.configuration().unwrap();

    assert_eq!(configuration.len(), 2);
    assert_eq!(configuration.get("foo"), Some(&Value::from("bar")));
    assert_eq!(configuration.get("secret"), Some(&Value::from("s3cr3t")));
}

#[test]
fn test_unknown_environment_keeps_top_level_values() {
    let (_dir, path) = yaml_to_path("foo: bar\ntest:\n  foo: baz\n");
    let resolver = Resolver::new(&path).with_environment("staging");

    assert_eq!(resolver.configuration().unwrap(), &foo_only("bar"));
}

#[test]
fn test_without_environment_sections_are_kept_verbatim() {
    let (_dir, path) = yaml_to_path("foo: bar\ntest:\n  foo: baz\n");
    let resolver = Resolver::new(&path);
    let configuration = resolver.configuration().unwrap();

    assert_eq!(configuration.get("foo"), Some(&Value::from("bar")));
    assert!(configuration.get("test").unwrap().is_mapping());
}

#[test]
fn test_changing_environment_re_resolves() {
    let (_dir, path) = yaml_to_path("foo: bar\ntest:\n  foo: baz\n");
    let mut resolver = Resolver::new(&path).with_environment("test");
    assert_eq!(resolver.configuration().unwrap(), &foo_only("baz"));

    resolver.set_environment("development");
    assert!(!resolver.is_resolved());
    assert_eq!(resolver.configuration().unwrap(), &foo_only("bar"));
}
