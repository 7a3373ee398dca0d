use ocr_normalize::preprocessing::steps::codec;
use ocr_normalize::{NormalizeConfig, Pipeline, PixelGrid};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::process::{Command, Output};

const BLACK: [u8; 4] = [0, 0, 0, 255];
const WHITE: [u8; 4] = [255, 255, 255, 255];
const DARK: [u8; 4] = [19, 18, 24, 255];
const GLYPH: [u8; 4] = [220, 60, 60, 255];

#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct StepTiming {
    name: String,
    time_ms: u64,
}

#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct RemovalStats {
    total_pixels: u64,
    background_pixels: u64,
    preserved_pixels: u64,
    original_width: u32,
    output_width: u32,
    content_columns: Option<(u32, u32)>,
}

#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct Report {
    width: u32,
    height: u32,
    marker_column: u32,
    removal: RemovalStats,
    total_time_ms: u64,
    steps: Vec<StepTiming>,
}

/// 30x12 screenshot: black margin, white frame column at x=6, dark panel with a glyph
fn screenshot() -> PixelGrid {
    PixelGrid::from_fn(30, 12, |x, y| match x {
        0..=5 => BLACK,
        6 => WHITE,
        15..=17 if (4..=7).contains(&y) => GLYPH,
        _ => DARK,
    })
}

fn write_fixture(dir: &Path, name: &str, grid: &PixelGrid) -> String {
    let path = dir.join(name);
    fs::write(&path, codec::encode(grid).unwrap()).expect("Failed to write fixture");
    path.to_string_lossy().into_owned()
}

fn run_cli(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_ocr-normalize"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to run ocr-normalize")
}

#[test]
fn test_cli_writes_normalized_png() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_fixture(dir.path(), "input.png", &screenshot());
    let output = dir.path().join("out.png");

    let result = run_cli(&[input.as_str(), "-o", output.to_str().unwrap()]);
    assert!(
        result.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&result.stderr)
    );

    let grid = codec::decode(&fs::read(&output).unwrap()).unwrap();
    // content: white column (x=0 after crop) through glyph (x=11), full height
    assert_eq!(grid.dimensions(), (12 + 60, 12 + 20));
    assert_eq!(grid.pixel(30, 10), WHITE);
    assert_eq!(grid.pixel(30 + 9, 10 + 4), GLYPH);
    assert_eq!(grid.pixel(31, 10), [0, 0, 0, 0]);
}

#[test]
fn test_cli_matches_library_output() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_fixture(dir.path(), "input.png", &screenshot());
    let output = dir.path().join("out.png");

    let result = run_cli(&[input.as_str(), "-o", output.to_str().unwrap()]);
    assert!(result.status.success());

    let expected = Pipeline::new(NormalizeConfig::default())
        .unwrap()
        .process(&fs::read(&input).unwrap())
        .unwrap();
    assert_eq!(fs::read(&output).unwrap(), expected.bytes);
}

#[test]
fn test_cli_report_and_overrides() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_fixture(dir.path(), "input.png", &screenshot());
    let output = dir.path().join("out.png");

    let result = run_cli(&[
        input.as_str(),
        "-o",
        output.to_str().unwrap(),
        "--box-padding-h",
        "2",
        "--box-padding-v",
        "1",
        "--background-metric",
        "euclidean",
        "--recenter",
        "--report",
    ]);
    assert!(
        result.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&result.stderr)
    );

    let report: Report =
        serde_json::from_slice(&result.stdout).expect("Failed to parse report");
    assert_eq!(report.marker_column, 6);
    assert_eq!((report.width, report.height), (12 + 4, 12 + 2));
    assert_eq!(report.removal.content_columns, Some((0, 11)));
    assert_eq!(report.steps.first().unwrap().name, "decoded");
    assert_eq!(report.steps.last().unwrap().name, "encoded");
}

#[test]
fn test_cli_config_file_and_intermediates() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_fixture(dir.path(), "input.png", &screenshot());
    let output = dir.path().join("out.png");
    let stages = dir.path().join("stages");
    let config = dir.path().join("config.json");
    fs::write(
        &config,
        r#"{ "leftPadding": 5, "flattenForeground": true, "inkColor": { "r": 0, "g": 0, "b": 0 } }"#,
    )
    .unwrap();

    let result = run_cli(&[
        input.as_str(),
        "-o",
        output.to_str().unwrap(),
        "--config",
        config.to_str().unwrap(),
        "--save-intermediates",
        stages.to_str().unwrap(),
    ]);
    assert!(
        result.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&result.stderr)
    );

    let mut names: Vec<String> = fs::read_dir(&stages)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    assert_eq!(
        names,
        [
            "00-decoded.png",
            "01-cropped.png",
            "02-background_removed.png",
            "03-left_padded.png",
            "04-box_padded.png",
            "05-flattened.png"
        ]
    );

    let left_padded = codec::decode(&fs::read(stages.join("03-left_padded.png")).unwrap()).unwrap();
    assert_eq!(left_padded.dimensions(), (24 + 5, 12));

    let grid = codec::decode(&fs::read(&output).unwrap()).unwrap();
    assert_eq!(grid.pixel(30 + 9, 10 + 4), BLACK);
}

#[test]
fn test_cli_fails_without_marker() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_fixture(dir.path(), "dark.png", &PixelGrid::from_pixel(8, 8, DARK));
    let output = dir.path().join("out.png");

    let result = run_cli(&[input.as_str(), "-o", output.to_str().unwrap()]);
    assert!(!result.status.success());
    assert!(String::from_utf8_lossy(&result.stderr).contains("NO_MARKER_FOUND"));
    assert!(!output.exists());
}

#[test]
fn test_cli_rejects_non_image_input() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("notes.txt");
    fs::write(&input, "not an image").unwrap();
    let output = dir.path().join("out.png");

    let result = run_cli(&[input.to_str().unwrap(), "-o", output.to_str().unwrap()]);
    assert!(!result.status.success());
    assert!(String::from_utf8_lossy(&result.stderr).contains("DECODE_ERROR"));
    assert!(!output.exists());
}

#[test]
fn test_cli_rejects_bad_metric() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_fixture(dir.path(), "input.png", &screenshot());

    let result = run_cli(&[input.as_str(), "--marker-metric", "manhattan"]);
    assert!(!result.status.success());
    assert!(String::from_utf8_lossy(&result.stderr).contains("manhattan"));
}
