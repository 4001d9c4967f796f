//! Command-line tests for the `ted-ocds` binary.

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use tempfile::tempdir;

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn notice_dir(names: &[&str]) -> tempfile::TempDir {
    let dir = tempdir().unwrap();
    for name in names {
        fs::copy(fixture(name), dir.path().join(name)).unwrap();
    }
    dir
}

fn ted_ocds() -> Command {
    let mut cmd = Command::cargo_bin("ted-ocds").unwrap();
    cmd.env_remove("TED_OCDS_OCID_PREFIX")
        .env_remove("TED_OCDS_PER_PROCEDURE")
        .env_remove("TED_OCDS_PARALLEL");
    cmd
}

#[test]
fn test_order_command() {
    let dir = notice_dir(&["can.xml", "unknown.xml", "cn.xml", "pin.xml"]);

    ted_ocds()
        .arg("order")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"(?s)PIN\s+pin\.xml.*CN\s+cn\.xml.*CAN\s+can\.xml").unwrap())
        .stdout(predicate::str::contains("unknown.xml").not());
}

#[test]
fn test_convert_writes_release_files() {
    let dir = notice_dir(&["cn.xml", "can.xml"]);
    let out = tempdir().unwrap();

    ted_ocds()
        .arg("convert")
        .arg(dir.path())
        .arg("--output")
        .arg(out.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Saved to:"));

    let cn = out.path().join("5f1c2a9e-0b7d-4e61-9a3c-2b6f4d8e1002.json");
    let release: Value = serde_json::from_str(&fs::read_to_string(cn).unwrap()).unwrap();
    assert_eq!(release["tag"], serde_json::json!(["tender"]));
    assert!(out.path().join("5f1c2a9e-0b7d-4e61-9a3c-2b6f4d8e1003.json").exists());
}

#[test]
fn test_convert_package_per_procedure() {
    let dir = notice_dir(&["pin.xml", "cn.xml", "can.xml", "can_modif.xml"]);
    let out = tempdir().unwrap();

    ted_ocds()
        .args(["convert", "--per-procedure", "--package", "--ocid-prefix", "ocds-abc123"])
        .arg(dir.path())
        .arg("--output")
        .arg(out.path())
        .assert()
        .success();

    let package: Value =
        serde_json::from_str(&fs::read_to_string(out.path().join("release-package.json")).unwrap())
            .unwrap();
    let releases = package["releases"].as_array().unwrap();
    assert_eq!(releases.len(), 1);
    assert_eq!(
        releases[0]["ocid"],
        serde_json::json!("ocds-abc123-1e86a664-ae3c-41eb-8529-0242ac130003")
    );
}

#[test]
fn test_convert_rejects_invalid_prefix() {
    ted_ocds()
        .args(["convert", "--ocid-prefix", "not-a-prefix"])
        .arg(fixture("cn.xml"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid OCID prefix"));
}

#[test]
fn test_convert_missing_input() {
    let out = tempdir().unwrap();

    ted_ocds()
        .arg("convert")
        .arg(out.path().join("nowhere"))
        .arg("--output")
        .arg(out.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a file or directory"));
}

#[test]
fn test_convert_output_must_be_directory() {
    let out = tempdir().unwrap();
    let file = out.path().join("file.txt");
    fs::write(&file, "").unwrap();

    ted_ocds()
        .arg("convert")
        .arg(fixture("cn.xml"))
        .arg("--output")
        .arg(&file)
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a directory"));
}
