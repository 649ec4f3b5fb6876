//! CLI integration tests
//!
//! These tests run the `fgrid` binary against the fixture files and check
//! exit codes, messages and written images. Each command runs inside a
//! fresh temporary directory so no stray fgrid.toml is picked up.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use image::Rgba;
use tempfile::TempDir;

fn fixture(path: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(path)
}

fn fgrid(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_fgrid"))
        .args(args)
        .current_dir(dir)
        .env("XDG_CONFIG_HOME", dir)
        .env_remove("FGRID_LOG")
        .output()
        .expect("Failed to execute fgrid")
}

fn path_arg(path: &Path) -> &str {
    path.to_str().expect("test paths are UTF-8")
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn test_render_carpet_depth_one() {
    let temp = TempDir::new().unwrap();
    let out = temp.path().join("a.png");
    let input = fixture("valid/carpet.jsonl");

    let output = fgrid(
        temp.path(),
        &["render", path_arg(&input), "-c", "A", "-d", "1", "-o", path_arg(&out)],
    );

    assert!(output.status.success(), "Render failed: {}", stderr(&output));
    assert!(stdout(&output).contains("Saved:"));

    let image = image::open(&out).unwrap().to_rgba8();
    assert_eq!(image.dimensions(), (9, 9));
    assert_eq!(*image.get_pixel(0, 0), Rgba([0, 0, 0, 255]));
    assert_eq!(*image.get_pixel(3, 3), Rgba([0, 0, 255, 255]));
    assert_eq!(*image.get_pixel(4, 4), Rgba([255, 255, 255, 255]));
}

#[test]
fn test_render_scale() {
    let temp = TempDir::new().unwrap();
    let out = temp.path().join("d.png");
    let input = fixture("valid/diagonal.jsonl");

    let output = fgrid(
        temp.path(),
        &["render", path_arg(&input), "-d", "2", "--scale", "3", "-o", path_arg(&out)],
    );

    assert!(output.status.success(), "Render failed: {}", stderr(&output));
    let image = image::open(&out).unwrap().to_rgba8();
    assert_eq!(image.dimensions(), (24, 24));
    assert_eq!(*image.get_pixel(0, 0), Rgba([0xFF, 0x00, 0x4D, 255]));
    assert_eq!(image.get_pixel(3, 0)[3], 0);
}

#[test]
fn test_render_all_into_directory() {
    let temp = TempDir::new().unwrap();
    let out_dir = temp.path().join("renders");
    let input = fixture("valid/carpet.jsonl");

    let dir_arg = format!("{}/", out_dir.display());
    let output =
        fgrid(temp.path(), &["render", path_arg(&input), "--all", "-d", "2", "-o", &dir_arg]);

    assert!(output.status.success(), "Render failed: {}", stderr(&output));
    for name in ["A", "B", "C"] {
        let path = out_dir.join(format!("{}_d2.png", name));
        let image = image::open(&path).unwrap();
        assert_eq!((image.width(), image.height()), (27, 27));
    }
}

#[test]
fn test_render_default_output_path() {
    let temp = TempDir::new().unwrap();
    let input = temp.path().join("diag.jsonl");
    fs::copy(fixture("valid/diagonal.jsonl"), &input).unwrap();

    let output = fgrid(temp.path(), &["render", path_arg(&input), "-d", "1"]);

    assert!(output.status.success(), "Render failed: {}", stderr(&output));
    assert!(temp.path().join("diag_D_d1.png").exists());
}

#[test]
fn test_render_uses_config_file() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("fgrid.toml"), "[render]\ndepth = 2\nscale = 2\nout = \"build\"\n")
        .unwrap();
    let input = fixture("valid/diagonal.jsonl");

    let output = fgrid(temp.path(), &["render", path_arg(&input)]);
    assert!(output.status.success(), "Render failed: {}", stderr(&output));

    let image = image::open(temp.path().join("build/D_d2.png")).unwrap();
    assert_eq!((image.width(), image.height()), (16, 16));
}

#[test]
fn test_render_no_config_ignores_config_file() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("fgrid.toml"), "[render]\nscale = 0\n").unwrap();
    let out = temp.path().join("d.png");
    let input = fixture("valid/diagonal.jsonl");

    let broken = fgrid(temp.path(), &["render", path_arg(&input), "-o", path_arg(&out)]);
    assert_eq!(broken.status.code(), Some(1));
    assert!(stderr(&broken).contains("render.scale"));

    let output =
        fgrid(temp.path(), &["render", path_arg(&input), "--no-config", "-o", path_arg(&out)]);
    assert!(output.status.success(), "Render failed: {}", stderr(&output));
    let image = image::open(&out).unwrap();
    // Default depth 3
    assert_eq!((image.width(), image.height()), (16, 16));
}

#[test]
fn test_render_dimension_conflict() {
    let temp = TempDir::new().unwrap();
    let input = fixture("invalid/conflict.jsonl");

    let output = fgrid(temp.path(), &["render", path_arg(&input), "-d", "1"]);

    assert_eq!(output.status.code(), Some(1));
    let err = stderr(&output);
    assert!(err.contains("Error: color 'Top'"), "stderr: {}", err);
    assert!(err.contains("W=2"), "stderr: {}", err);
    assert!(fs::read_dir(temp.path()).unwrap().next().is_none());
}

#[test]
fn test_render_unknown_color_name() {
    let temp = TempDir::new().unwrap();
    let input = fixture("valid/carpet.jsonl");

    let output = fgrid(temp.path(), &["render", path_arg(&input), "-c", "Z"]);

    assert_eq!(output.status.code(), Some(1));
    let err = stderr(&output);
    assert!(err.contains("No color named 'Z'"));
    assert!(err.contains("Available colors: A, B, C"));
}

#[test]
fn test_render_missing_input() {
    let temp = TempDir::new().unwrap();
    let output = fgrid(temp.path(), &["render", "does-not-exist.jsonl"]);
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("Cannot open input file"));
}

#[test]
fn test_invalid_arguments_exit_code() {
    let temp = TempDir::new().unwrap();
    let output = fgrid(temp.path(), &["render", "x.jsonl", "--scale", "0"]);
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_strict_mode_rejects_stray_characters() {
    let temp = TempDir::new().unwrap();
    let input = fixture("invalid/stray_characters.jsonl");
    let out = temp.path().join("a.png");

    let lenient = fgrid(temp.path(), &["render", path_arg(&input), "-d", "1", "-o", path_arg(&out)]);
    assert!(lenient.status.success(), "Render failed: {}", stderr(&lenient));
    assert!(stderr(&lenient).contains("Warning:"));

    let strict = fgrid(temp.path(), &["render", path_arg(&input), "--strict", "-o", path_arg(&out)]);
    assert_eq!(strict.status.code(), Some(1));
    assert!(stderr(&strict).contains("Error:"));
}

#[test]
fn test_invalid_utf8_line_is_reported() {
    let temp = TempDir::new().unwrap();
    let input = temp.path().join("broken.jsonl");
    let mut bytes = br#"{"type": "color", "name": "A", "grid": ["{A}{A}"]}"#.to_vec();
    bytes.extend_from_slice(b"\n{\"type\": \"color\", \"name\": \"\xff\"}\n");
    fs::write(&input, bytes).unwrap();

    let lenient = fgrid(temp.path(), &["validate", path_arg(&input), "-d", "2"]);
    assert!(lenient.status.success(), "Validate failed: {}", stderr(&lenient));
    assert!(stderr(&lenient).contains("Warning: line 2: invalid UTF-8"));
    assert!(stdout(&lenient).contains("A: 1x8 at depth 2"));

    let strict = fgrid(temp.path(), &["validate", path_arg(&input), "--strict"]);
    assert_eq!(strict.status.code(), Some(1));
    assert!(stderr(&strict).contains("Error: line 2: invalid UTF-8"));
}

#[test]
fn test_validate_valid_files() {
    let temp = TempDir::new().unwrap();
    for name in ["carpet.jsonl", "diagonal.jsonl", "mixed_sizes.jsonl", "sierpinski.fgrid"] {
        let input = fixture(&format!("valid/{}", name));
        let output = fgrid(temp.path(), &["validate", path_arg(&input), "-d", "12"]);
        assert!(output.status.success(), "{} failed: {}", name, stderr(&output));
        assert!(stdout(&output).contains("All colors valid through depth 12"));
    }
}

#[test]
fn test_validate_reports_shapes_without_rendering() {
    let temp = TempDir::new().unwrap();
    let input = fixture("valid/carpet.jsonl");

    // Far too large to materialize, cheap to check
    let output = fgrid(temp.path(), &["validate", path_arg(&input), "-d", "20"]);

    assert!(output.status.success(), "Validate failed: {}", stderr(&output));
    assert!(stdout(&output).contains("A: 10460353203x10460353203 at depth 20"));
}

#[test]
fn test_validate_invalid_files() {
    let temp = TempDir::new().unwrap();

    let output = fgrid(temp.path(), &["validate", path_arg(&fixture("invalid/underspecified.jsonl"))]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("row 1"));

    let output = fgrid(temp.path(), &["validate", path_arg(&fixture("invalid/conflict.jsonl"))]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("color 'Top' at depth 1"));

    let output = fgrid(temp.path(), &["validate", path_arg(&fixture("invalid/unknown_color.jsonl"))]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("unknown color 'Missing'"));
}

#[test]
fn test_show_plain() {
    let temp = TempDir::new().unwrap();
    let input = fixture("valid/diagonal.jsonl");

    let output = fgrid(temp.path(), &["show", path_arg(&input), "-d", "1", "--plain"]);

    assert!(output.status.success(), "Show failed: {}", stderr(&output));
    let text = stdout(&output);
    assert!(text.contains("D at depth 1 (4x4)"));
    assert!(text.contains("D...\n.D..\n..D.\n...D\n"));
    assert!(text.contains("D = D"));
}

#[test]
fn test_show_ansi() {
    let temp = TempDir::new().unwrap();
    let input = fixture("valid/diagonal.jsonl");

    let output = fgrid(temp.path(), &["show", path_arg(&input), "-d", "0"]);

    assert!(output.status.success(), "Show failed: {}", stderr(&output));
    assert!(stdout(&output).contains("\x1b[48;2;255;0;77m"));
}

#[test]
fn test_info_json() {
    let temp = TempDir::new().unwrap();
    let input = fixture("valid/carpet.jsonl");

    let output = fgrid(temp.path(), &["info", path_arg(&input), "--json"]);

    assert!(output.status.success(), "Info failed: {}", stderr(&output));
    let info: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    let colors = info["colors"].as_array().unwrap();
    assert_eq!(colors.len(), 3);
    assert_eq!(colors[1]["name"], "B");
    assert_eq!(colors[1]["id"], 2);
    assert_eq!(colors[1]["references"], serde_json::json!(["A", "B", "C"]));
    assert_eq!(info["background"], "#000000");
}

#[test]
fn test_info_table() {
    let temp = TempDir::new().unwrap();
    let input = fixture("valid/diagonal.jsonl");

    let output = fgrid(temp.path(), &["info", path_arg(&input)]);

    assert!(output.status.success(), "Info failed: {}", stderr(&output));
    let text = stdout(&output);
    assert!(text.contains("Background: #00000000"));
    assert!(text.contains("2x2"));
    assert!(text.contains("D, _"));
}
