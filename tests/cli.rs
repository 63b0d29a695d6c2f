use assert_cmd::Command;
use predicates::prelude::*;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn slotscriber_cmd() -> Command {
    Command::cargo_bin("slotscriber").expect("binary exists")
}

fn write_png(path: &Path) {
    let image = cairo::ImageSurface::create(cairo::Format::ARgb32, 4, 4).unwrap();
    {
        let ctx = cairo::Context::new(&image).unwrap();
        ctx.set_source_rgb(0.2, 0.6, 0.2);
        ctx.paint().unwrap();
    }
    let mut file = std::fs::File::create(path).unwrap();
    image.write_to_png(&mut file).unwrap();
}

/// Writes a config with two image slots and histories stored under `<temp>/store`.
fn write_config(temp: &TempDir) -> PathBuf {
    write_png(&temp.path().join("a.png"));
    write_png(&temp.path().join("b.png"));

    let config_path = temp.path().join("config.toml");
    let config = format!(
        r#"
[[images]]
image_url = "a.png"

[[images]]
image_url = "b.png"

[background]
asset_dir = "{dir}"
timeout_ms = 2000

[storage]
storage = "custom"
custom_directory = "{dir}/store"
"#,
        dir = temp.path().display()
    );
    std::fs::write(&config_path, config).unwrap();
    config_path
}

#[test]
fn slotscriber_help_prints_usage() {
    slotscriber_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Two-click line annotation over background images",
        ));
}

#[test]
fn draw_requires_click() {
    slotscriber_cmd()
        .args(["draw", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "required arguments were not provided",
        ));
}

#[test]
fn draw_persists_line_under_slot_key() {
    let temp = TempDir::new().unwrap();
    let config = write_config(&temp);
    let output = temp.path().join("out.png");

    slotscriber_cmd()
        .arg("--config")
        .arg(&config)
        .args(["draw", "0", "--click", "10,10", "--click", "50,60", "--output"])
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("Slot 0 now holds 1 line(s)"));

    let stored = std::fs::read_to_string(temp.path().join("store").join("0.json")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&stored).unwrap();
    assert_eq!(
        value,
        serde_json::json!([{"x1": 10.0, "y1": 10.0, "x2": 50.0, "y2": 60.0}])
    );
    assert!(output.exists());
}

#[test]
fn draw_translates_clicks_by_offset() {
    let temp = TempDir::new().unwrap();
    let config = write_config(&temp);

    slotscriber_cmd()
        .arg("--config")
        .arg(&config)
        .args([
            "draw", "1", "--offset", "100,40", "--click", "110,50", "--click", "150,100",
        ])
        .assert()
        .success();

    let stored = std::fs::read_to_string(temp.path().join("store").join("1.json")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&stored).unwrap();
    assert_eq!(
        value,
        serde_json::json!([{"x1": 10.0, "y1": 10.0, "x2": 50.0, "y2": 60.0}])
    );
}

#[test]
fn clear_then_inspect_reports_empty_slot() {
    let temp = TempDir::new().unwrap();
    let config = write_config(&temp);

    slotscriber_cmd()
        .arg("--config")
        .arg(&config)
        .args(["draw", "1", "--click", "1,1", "--click", "2,2"])
        .assert()
        .success();

    slotscriber_cmd()
        .arg("--config")
        .arg(&config)
        .args(["clear", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Cleared slot 1"));

    let stored = std::fs::read_to_string(temp.path().join("store").join("1.json")).unwrap();
    assert_eq!(stored, "[]");

    slotscriber_cmd()
        .arg("--config")
        .arg(&config)
        .arg("inspect")
        .assert()
        .success()
        .stdout(predicate::str::contains("Slot 0 [a.png]: no history"))
        .stdout(predicate::str::contains("Slot 1 [b.png]: 0 line(s)"));
}

#[test]
fn render_writes_one_png_per_slot() {
    let temp = TempDir::new().unwrap();
    let config = write_config(&temp);
    let out_dir = temp.path().join("renders");

    slotscriber_cmd()
        .arg("--config")
        .arg(&config)
        .arg("render")
        .arg("--output-dir")
        .arg(&out_dir)
        .assert()
        .success();

    assert!(out_dir.join("slot-0.png").exists());
    assert!(out_dir.join("slot-1.png").exists());
}

#[test]
fn unknown_slot_fails() {
    let temp = TempDir::new().unwrap();
    let config = write_config(&temp);

    slotscriber_cmd()
        .arg("--config")
        .arg(&config)
        .args(["draw", "7", "--click", "1,1", "--click", "2,2"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("slot 7 is not configured"));
}

#[test]
fn schema_prints_config_properties() {
    slotscriber_cmd()
        .arg("schema")
        .assert()
        .success()
        .stdout(predicate::str::contains("max_segments_per_slot"))
        .stdout(predicate::str::contains("image_url"));
}
