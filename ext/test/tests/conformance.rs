//! Conformance tests that run YAML fixtures against pathmux
//!
//! Run with: cargo test -p pathmux-test --test conformance --features pathmux-test/fixtures
//!
//! Note: This test file requires the `fixtures` feature to be enabled.

#![cfg(feature = "fixtures")]

use pathmux_test::fixture::Fixture;
use std::fs;
use std::path::{Path, PathBuf};

fn fixtures_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures")
}

/// Load and run every fixture in one file
fn run_fixture_file(name: &str) {
    let path = fixtures_dir().join(name);
    println!("Running fixture file: {}", path.display());

    let yaml = fs::read_to_string(&path).expect("read yaml");

    // Parse potentially multiple fixtures (separated by ---)
    let fixtures = Fixture::from_yaml_multi(&yaml).unwrap_or_else(|e| {
        panic!("Failed to parse {}: {}", path.display(), e);
    });
    assert!(!fixtures.is_empty(), "{} has no fixtures", path.display());

    for fixture in fixtures {
        println!("  Running: {}", fixture.name);
        fixture.run_and_assert();
    }
}

#[test]
fn test_precedence() {
    run_fixture_file("01_precedence.yaml");
}

#[test]
fn test_methods() {
    run_fixture_file("02_methods.yaml");
}

#[test]
fn test_trailing_slash() {
    run_fixture_file("03_trailing_slash.yaml");
}

#[test]
fn test_escapes() {
    run_fixture_file("04_escapes.yaml");
}

#[test]
fn test_conflicts() {
    run_fixture_file("05_conflicts.yaml");
}

#[test]
fn test_every_fixture_file_is_covered() {
    let covered = [
        "01_precedence.yaml",
        "02_methods.yaml",
        "03_trailing_slash.yaml",
        "04_escapes.yaml",
        "05_conflicts.yaml",
    ];
    for entry in fs::read_dir(fixtures_dir()).expect("read dir") {
        let path = entry.expect("dir entry").path();
        if path.extension().is_some_and(|e| e == "yaml" || e == "yml") {
            let name = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
            assert!(covered.contains(&name), "fixture {name} is not run");
        }
    }
}
