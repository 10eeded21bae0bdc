use std::fs;
use std::path::PathBuf;
use std::process::Command;

use tempfile::tempdir;

fn repo_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../..")
        .canonicalize()
        .expect("canonicalize repo root")
}

fn protonorm_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_protonorm"))
}

fn fixtures() -> PathBuf {
    repo_root().join("tests/fixtures")
}

#[test]
fn prints_canonical_text_and_exits_zero() {
    let output = Command::new(protonorm_bin())
        .current_dir(fixtures())
        .arg("acme.payments_pb2")
        .env_remove("RUST_LOG")
        .output()
        .expect("run protonorm");

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let expected = fs::read_to_string(fixtures().join("acme/payments.canonical.txt"))
        .expect("read golden");
    assert_eq!(String::from_utf8(output.stdout).expect("utf8"), expected);
}

#[test]
fn accepts_a_descriptor_set_path() {
    let dir = tempdir().expect("tempdir");
    fs::write(
        dir.path().join("single.json"),
        r#"{ "file": [ { "name": "single.proto", "enumType": [
            { "name": "Mode", "value": [ { "name": "ON", "number": 1 }, { "name": "OFF", "number": 0 } ] }
        ] } ] }"#,
    )
    .expect("write descriptor");

    let output = Command::new(protonorm_bin())
        .current_dir(dir.path())
        .arg("single.json")
        .output()
        .expect("run protonorm");

    assert!(output.status.success());
    assert_eq!(
        String::from_utf8(output.stdout).expect("utf8"),
        "enum Mode {\n  OFF = 0;\n  ON = 1;\n}\n"
    );
}

#[test]
fn unsupported_shape_exits_one_with_empty_stdout() {
    let output = Command::new(protonorm_bin())
        .current_dir(fixtures())
        .arg("legacy_pb2")
        .output()
        .expect("run protonorm");

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Flags"), "stderr: {stderr}");
}

#[test]
fn unknown_label_exits_one() {
    let output = Command::new(protonorm_bin())
        .current_dir(fixtures())
        .arg("bad_label_pb2")
        .output()
        .expect("run protonorm");

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("LABEL_SOMETIMES"));
}

#[test]
fn failure_is_logged_at_the_default_level() {
    let output = Command::new(protonorm_bin())
        .current_dir(fixtures())
        .arg("legacy_pb2")
        .env_remove("RUST_LOG")
        .output()
        .expect("run protonorm");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ERROR"), "stderr: {stderr}");
    assert!(
        stderr.contains("failed to canonicalize schema module"),
        "stderr: {stderr}"
    );
}

#[test]
fn missing_module_exits_one() {
    let dir = tempdir().expect("tempdir");
    let output = Command::new(protonorm_bin())
        .current_dir(dir.path())
        .arg("acme.absent_pb2")
        .output()
        .expect("run protonorm");

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("acme.absent_pb2"));
}

#[test]
fn missing_argument_exits_one() {
    let output = Command::new(protonorm_bin())
        .output()
        .expect("run protonorm");
    assert_eq!(output.status.code(), Some(1));
}
