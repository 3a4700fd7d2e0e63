#![cfg(feature = "cli")]

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use typed_image::{AnyImage, ColorTag, DepthTag};

fn typed_image() -> Command {
    Command::cargo_bin("typed-image").expect("binary is built")
}

fn write_config(dir: &Path, body: &str) -> std::path::PathBuf {
    let path = dir.join("synth.json");
    fs::write(&path, body).expect("write config");
    path
}

#[test]
fn synth_writes_the_configured_image() {
    let dir = tempfile::tempdir().expect("tempdir");
    let out = dir.path().join("noise.timg");
    let cfg = write_config(
        dir.path(),
        &format!(
            r#"{{"width": 32, "height": 16, "color": "gray", "depth": "u8", "seed": 5,
                "output_path": {}}}"#,
            serde_json::to_string(&out).expect("path as json")
        ),
    );

    typed_image()
        .args(["synth", "--config"])
        .arg(&cfg)
        .assert()
        .success()
        .stdout(predicate::str::contains("gray/u8 32x16"));

    let img = AnyImage::open(&out).expect("synthesized image");
    assert_eq!(img.color(), ColorTag::Gray);
    assert_eq!(img.size().width, 32);
}

#[test]
fn info_reports_layout_as_json() {
    let dir = tempfile::tempdir().expect("tempdir");
    let cfg = write_config(
        dir.path(),
        r#"{"width": 4, "height": 2, "fill": {"kind": "constant", "value": [1, 2, 3, 0]}}"#,
    );
    let out = dir.path().join("const.json");
    typed_image()
        .args(["synth", "--config"])
        .arg(&cfg)
        .arg("--out")
        .arg(&out)
        .assert()
        .success();

    let output = typed_image()
        .arg("info")
        .arg(&out)
        .arg("--json")
        .output()
        .expect("run info");
    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json report");
    assert_eq!(report["color"], "bgr");
    assert_eq!(report["depth"], "u8");
    assert_eq!(report["sum"], serde_json::json!([8.0, 16.0, 24.0]));
    assert_eq!(report["max"], serde_json::json!([1.0, 2.0, 3.0]));
}

#[test]
fn convert_changes_format_and_depth() {
    let dir = tempfile::tempdir().expect("tempdir");
    let cfg = write_config(dir.path(), r#"{"width": 10, "height": 10, "seed": 1}"#);
    let timg = dir.path().join("src.timg");
    let png = dir.path().join("dst.png");
    let wide = dir.path().join("wide.timg");

    typed_image()
        .args(["synth", "--config"])
        .arg(&cfg)
        .arg("--out")
        .arg(&timg)
        .assert()
        .success();
    typed_image().arg("convert").arg(&timg).arg(&png).assert().success();
    assert_eq!(
        AnyImage::open(&png).expect("png"),
        AnyImage::open(&timg).expect("timg")
    );

    typed_image()
        .arg("-v")
        .arg("convert")
        .arg(&timg)
        .arg(&wide)
        .args(["--depth", "f32"])
        .assert()
        .success();
    let converted = AnyImage::open(&wide).expect("converted");
    assert_eq!(converted.depth(), DepthTag::F32);
    assert_eq!(converted.sum(), AnyImage::open(&timg).expect("timg").sum());
}

#[test]
fn failures_exit_nonzero() {
    let dir = tempfile::tempdir().expect("tempdir");
    let bogus = dir.path().join("bogus.timg");
    fs::write(&bogus, b"TIMGgarbage").expect("write");

    typed_image()
        .arg("info")
        .arg(&bogus)
        .assert()
        .failure()
        .stderr(predicate::str::contains("serialization failure"));

    typed_image()
        .arg("info")
        .arg(dir.path().join("missing.timg"))
        .assert()
        .failure();

    typed_image()
        .args(["convert", "a.timg", "b.timg", "--depth", "u64"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown depth"));
}
