//! Integration tests for the complete protonorm pipeline
//!
//! These tests verify end-to-end functionality across crates:
//! - descriptor-set JSON → SchemaFile (DirectoryProvider)
//! - SchemaFile → canonical text (driver + renderer)
//! - canonical text → digest
//!
//! Run with: cargo test --test integration_tests

use std::fs;
use std::path::PathBuf;

use protonorm_canon::{canonical_digest, canonicalize, canonicalize_module, CanonicalizeError, Error};
use protonorm_descriptor::{parse_descriptor_set_json, DirectoryProvider, LoadError, SchemaProvider};
use tempfile::tempdir;

fn fixtures() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn read_fixture(path: &str) -> String {
    fs::read_to_string(fixtures().join(path)).expect("read fixture")
}

// ============================================================================
// Canonical output
// ============================================================================

#[test]
fn test_payments_module_matches_golden_output() {
    let provider = DirectoryProvider::new(fixtures());
    let text = canonicalize_module(&provider, "acme.payments_pb2").expect("canonicalize");
    assert_eq!(text, read_fixture("acme/payments.canonical.txt"));
}

#[test]
fn test_reordered_descriptor_set_renders_identically() {
    let buf_style = parse_descriptor_set_json(&read_fixture("acme/payments_pb2.json"))
        .expect("parse")
        .file("acme/payments.proto")
        .expect("convert");
    let protoc_style = parse_descriptor_set_json(&read_fixture("acme/payments_reordered_pb2.json"))
        .expect("parse")
        .file("acme/payments.proto")
        .expect("convert");

    let a = canonicalize(&buf_style).expect("canonicalize");
    let b = canonicalize(&protoc_style).expect("canonicalize");
    assert_eq!(a, b);
    assert_eq!(
        canonical_digest(&buf_style).expect("digest"),
        canonical_digest(&protoc_style).expect("digest")
    );
}

#[test]
fn test_repeated_runs_are_byte_identical() {
    let provider = DirectoryProvider::new(fixtures());
    let first = canonicalize_module(&provider, "acme.payments_pb2").expect("first");
    let second = canonicalize_module(&provider, "acme.payments_pb2").expect("second");
    assert_eq!(first.as_bytes(), second.as_bytes());
}

#[test]
fn test_imported_file_can_be_rendered_on_its_own() {
    let set = parse_descriptor_set_json(&read_fixture("acme/payments_pb2.json")).expect("parse");
    let timestamp = set.file("google/protobuf/timestamp.proto").expect("convert");
    assert_eq!(
        canonicalize(&timestamp).expect("canonicalize"),
        "message Timestamp {\n  int64 seconds = 0;\n  int32 nanos = 1;\n}\n"
    );
}

// ============================================================================
// Failures
// ============================================================================

#[test]
fn test_direct_enum_values_abort_with_unsupported_shape() {
    let provider = DirectoryProvider::new(fixtures());
    let err = canonicalize_module(&provider, "legacy_pb2").unwrap_err();
    assert!(matches!(
        err,
        Error::Canonicalize(CanonicalizeError::UnsupportedShape { ref message, count: 2 }) if message == "Flags"
    ));
}

#[test]
fn test_unknown_label_aborts_with_unknown_field_label() {
    let provider = DirectoryProvider::new(fixtures());
    let err = canonicalize_module(&provider, "bad_label_pb2").unwrap_err();
    match err {
        Error::Canonicalize(CanonicalizeError::UnknownFieldLabel { message, field, label }) => {
            assert_eq!(message, "Broken");
            assert_eq!(field, "odd");
            assert_eq!(label, "LABEL_SOMETIMES");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_missing_module_is_a_load_failure() {
    let dir = tempdir().expect("tempdir");
    let provider = DirectoryProvider::new(dir.path());
    let err = canonicalize_module(&provider, "acme.nothing_pb2").unwrap_err();
    assert!(matches!(
        err,
        Error::ModuleLoad {
            source: LoadError::ModuleNotFound { .. },
            ..
        }
    ));
}

#[test]
fn test_multi_file_set_without_match_is_a_load_failure() {
    let dir = tempdir().expect("tempdir");
    fs::write(
        dir.path().join("other_pb2.json"),
        read_fixture("acme/payments_pb2.json"),
    )
    .expect("write");

    let provider = DirectoryProvider::new(dir.path());
    let err = provider.load("other_pb2").unwrap_err();
    assert!(matches!(err, LoadError::NoMatchingFile { .. }));
}
