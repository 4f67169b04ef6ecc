use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;

mod common;

use common::{Fixture, SAMPLE_LG};

fn lgbox() -> Command {
    let mut cmd = Command::cargo_bin("lgbox").unwrap();
    cmd.env_remove("LGBOX_CONFIG");
    cmd
}

#[test]
fn runs() {
    lgbox().assert().success();
}

#[test]
fn outputs_tool_name() {
    let mut cmd = lgbox();
    cmd.arg("-V");
    cmd.assert().success().stdout("lgbox 0.1.0\n");
}

// Convert subcommand tests

#[test]
fn convert_writes_both_artifacts() {
    let fixture = Fixture::new();
    fixture.write_lg("0001", SAMPLE_LG);
    let config = fixture.write_config();

    let mut cmd = lgbox();
    cmd.arg("convert").arg("--config").arg(&config);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Scanned 1 label-graph file(s)"))
        .stdout(predicate::str::contains("Wrote 3 class(es)"));

    let mapping = fs::read_to_string(fixture.mapping_path()).expect("read mapping");
    assert_eq!(mapping, "{\n    \"+\": 1,\n    \"2\": 2,\n    \"x\": 3\n}");
    assert!(fixture.annotations_path().is_file());
}

#[test]
fn convert_flags_override_config() {
    let fixture = Fixture::new();
    fixture.write_lg("0001", SAMPLE_LG);
    let config = fixture.write_config();
    let other_lg = fixture.path().join("other");
    fs::create_dir_all(&other_lg).expect("create other dir");
    fs::write(other_lg.join("9.lg"), "O, q, q, 1\nBB, q, 0, 0, 1, 1\n").expect("write lg");
    let mapping_out = fixture.path().join("mapping_override.json");

    let mut cmd = lgbox();
    cmd.arg("convert")
        .arg("--config")
        .arg(&config)
        .arg("--lg-dir")
        .arg(&other_lg)
        .arg("--mapping-out")
        .arg(&mapping_out)
        .args(["--source", "Validation"]);
    cmd.assert().success();

    let mapping = fs::read_to_string(&mapping_out).expect("read mapping");
    assert_eq!(mapping, "{\n    \"q\": 1\n}");
    assert!(!fixture.mapping_path().exists());

    let annotations = fs::read_to_string(fixture.annotations_path()).expect("read annotations");
    assert!(annotations.contains("\"source\": \"Validation\""));
    assert!(annotations.contains("\"file_id\": \"9\""));
}

#[test]
fn convert_missing_config_fails() {
    let fixture = Fixture::new();

    let mut cmd = lgbox();
    cmd.arg("convert")
        .arg("--config")
        .arg(fixture.path().join("nope.json"));
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Config file not found"));

    assert!(!fixture.mapping_path().exists());
}

#[test]
fn convert_accepts_yaml_config() {
    let fixture = Fixture::new();
    fixture.write_lg("0001", SAMPLE_LG);
    let config = fixture.path().join("config.yaml");
    fs::write(
        &config,
        format!(
            "paths:\n  train_lg_dir: {}\n  train_img_dir: {}\noutput:\n  class_mapping: {}\n  annotations: {}\n",
            fixture.lg_dir().display(),
            fixture.img_dir().display(),
            fixture.mapping_path().display(),
            fixture.annotations_path().display(),
        ),
    )
    .expect("write yaml config");

    let mut cmd = lgbox();
    cmd.arg("convert").arg("--config").arg(&config);
    cmd.assert().success();
    assert!(fixture.mapping_path().is_file());
}

#[test]
fn convert_missing_lg_dir_still_succeeds() {
    let fixture = Fixture::new();
    let config = fixture.write_config();
    fs::remove_dir_all(fixture.lg_dir()).expect("remove lg dir");

    let mut cmd = lgbox();
    cmd.arg("convert").arg("--config").arg(&config);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Scan failed"));

    assert_eq!(
        fs::read_to_string(fixture.mapping_path()).expect("read mapping"),
        "{}"
    );
}

// Check subcommand tests

#[test]
fn check_passes_for_matching_images() {
    let fixture = Fixture::new();
    fixture.write_lg("0001", SAMPLE_LG);
    fixture.write_png("0001", 100, 60);
    let config = fixture.write_config();

    lgbox()
        .arg("convert")
        .arg("--config")
        .arg(&config)
        .assert()
        .success();

    let mut cmd = lgbox();
    cmd.arg("check")
        .arg("--config")
        .arg(&config)
        .arg("--mapping")
        .arg(fixture.mapping_path());
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Check passed: 1 file(s)"));
}

#[test]
fn check_reports_missing_image() {
    let fixture = Fixture::new();
    fixture.write_lg("0001", SAMPLE_LG);
    let config = fixture.write_config();

    lgbox()
        .arg("convert")
        .arg("--config")
        .arg(&config)
        .assert()
        .success();

    let mut cmd = lgbox();
    cmd.arg("check").arg("--config").arg(&config);
    cmd.assert()
        .failure()
        .stdout(predicate::str::contains("ImageMissing"))
        .stderr(predicate::str::contains("Check failed with 1 error(s)"));
}

#[test]
fn check_strict_fails_on_out_of_bounds_box() {
    let fixture = Fixture::new();
    fixture.write_lg("0001", SAMPLE_LG);
    fixture.write_png("0001", 50, 50);
    let config = fixture.write_config();

    lgbox()
        .arg("convert")
        .arg("--config")
        .arg(&config)
        .assert()
        .success();

    lgbox()
        .arg("check")
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("BBoxOutOfBounds"));

    lgbox()
        .arg("check")
        .arg("--config")
        .arg(&config)
        .arg("--strict")
        .assert()
        .failure();
}

// Visualize subcommand tests

#[test]
fn visualize_named_file_writes_overlay() {
    let fixture = Fixture::new();
    fixture.write_lg("0001", SAMPLE_LG);
    fixture.write_png("0001", 100, 60);
    let config = fixture.write_config();
    let out_dir = fixture.path().join("overlays");

    let mut cmd = lgbox();
    cmd.arg("visualize")
        .arg("--config")
        .arg(&config)
        .args(["--file", "0001.lg"])
        .arg("--out-dir")
        .arg(&out_dir);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("0001_overlay.png"));

    assert!(out_dir.join("0001_overlay.png").is_file());
}

#[test]
fn visualize_random_samples_with_seed() {
    let fixture = Fixture::new();
    for id in ["a", "b", "c"] {
        fixture.write_lg(id, SAMPLE_LG);
        fixture.write_png(id, 80, 80);
    }
    let config = fixture.write_config();
    let out_dir = fixture.path().join("overlays");

    let mut cmd = lgbox();
    cmd.arg("visualize")
        .arg("--config")
        .arg(&config)
        .args(["--count", "2", "--seed", "42"])
        .arg("--out-dir")
        .arg(&out_dir);
    cmd.assert().success();

    let written = fs::read_dir(&out_dir).expect("read overlays").count();
    assert_eq!(written, 2);
}

#[test]
fn visualize_empty_directory_fails() {
    let fixture = Fixture::new();
    let config = fixture.write_config();

    let mut cmd = lgbox();
    cmd.arg("visualize")
        .arg("--config")
        .arg(&config)
        .arg("--out-dir")
        .arg(fixture.path().join("overlays"));
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("No .lg files found"));
}
