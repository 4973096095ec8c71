use std::fs;
use std::process::Command;

use lottie_merge::data::{Color, Composition, Layer, LayerCollection, LayerKind};
use lottie_merge::{load_composition, load_config, run, save_composition, Pass, RunOptions};

fn solid(index: u32, in_point: f64, out_point: f64) -> Layer {
    Layer::new(
        index,
        LayerKind::Solid {
            width: 100.0,
            height: 100.0,
            color: Color::rgb(1.0, 0.0, 0.0),
        },
        in_point,
        out_point,
    )
}

fn sample() -> Composition {
    Composition {
        name: "sample".into(),
        version: "5.7.0".into(),
        width: 256.0,
        height: 256.0,
        in_point: 0.0,
        out_point: 30.0,
        frames_per_second: 30.0,
        is_3d: false,
        assets: Vec::new(),
        layers: LayerCollection::from_top_to_bottom(vec![solid(1, 0.0, 10.0), solid(2, 20.0, 30.0)]),
        markers: Vec::new(),
    }
}

#[test]
fn test_save_and_load_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("comp.json");
    save_composition(&sample(), &path).unwrap();
    assert_eq!(load_composition(&path).unwrap(), sample());
}

#[test]
fn test_run_merges_layers() {
    let (optimized, reports) = run(&sample(), &RunOptions::default()).unwrap();
    assert_eq!(optimized.layers.len(), 1);
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].merges_accepted, 1);
}

#[test]
fn test_both_passes_report_separately() {
    let options = RunOptions {
        pass: Pass::Both,
        ..Default::default()
    };
    let (_, reports) = run(&sample(), &options).unwrap();
    assert_eq!(reports.len(), 2);
    assert_eq!(reports[0].merges_accepted, 0);
    assert_eq!(reports[1].merges_accepted, 1);
}

#[test]
fn test_partial_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    fs::write(&path, r#"{ "initial_distance": 4.0 }"#).unwrap();
    let config = load_config(&path).unwrap();
    assert_eq!(config.initial_distance, 4.0);
    assert_eq!(config.distance_growth, 2.0);
}

#[test]
fn test_invalid_config_is_rejected() {
    let options = RunOptions {
        config: lottie_merge::optimize::OptimizerConfig {
            distance_growth: 0.5,
            ..Default::default()
        },
        ..Default::default()
    };
    assert!(run(&sample(), &options).is_err());
}

#[test]
fn test_missing_input_reports_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.json");
    let error = load_composition(&path).unwrap_err();
    assert!(format!("{error:#}").contains("missing.json"));
}

#[test]
fn test_binary_writes_output_file() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.json");
    let output = dir.path().join("out.json");
    save_composition(&sample(), &input).unwrap();

    let status = Command::new(env!("CARGO_BIN_EXE_lottie-merge"))
        .arg(&input)
        .arg("--output")
        .arg(&output)
        .args(["--pass", "both", "--log-level", "error"])
        .status()
        .unwrap();
    assert!(status.success());
    assert_eq!(load_composition(&output).unwrap().layers.len(), 1);
}
