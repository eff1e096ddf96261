//! End-to-end pipeline tests against temporary directories.

use convertir::cli::LogLevel;
use convertir::config::ConvertConfig;
use convertir::pipeline::{run_pipeline, PipelineError};
use convertir::tflite::TfliteFixture;
use std::collections::BTreeSet;
use std::path::Path;
use tempfile::TempDir;

fn config_in(dir: &TempDir) -> ConvertConfig {
    ConvertConfig {
        source_model: dir.path().join("model.tflite"),
        intermediate_dir: dir.path().join("intermediate"),
        output_dir: dir.path().join("tfjs"),
    }
}

fn write_fixture(config: &ConvertConfig, input: Vec<i32>, output: Vec<i32>) {
    TfliteFixture::new(input, output)
        .write_to(&config.source_model)
        .unwrap();
}

fn dir_entries(dir: &Path) -> BTreeSet<String> {
    std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect()
}

#[test]
fn converts_mobilefacenet_shapes() {
    let dir = TempDir::new().unwrap();
    let config = config_in(&dir);
    write_fixture(&config, vec![1, 112, 112, 3], vec![1, 512]);

    let report = run_pipeline(&config, LogLevel::Quiet).unwrap();

    assert_eq!(report.input_shape, vec![1, 112, 112, 3]);
    assert_eq!(report.output_shape, vec![1, 512]);
    assert_eq!(report.embedding_width, 512);
    assert!(report.shard_count >= 1);

    // Intermediate bundle and final layout both exist.
    assert!(config.intermediate_dir.join("graph.json").is_file());
    assert!(config.intermediate_dir.join("params.bin").is_file());
    assert!(config.output_dir.join("model.json").is_file());

    // Shard bytes add up to the reported weight total.
    let total: usize = dir_entries(&config.output_dir)
        .iter()
        .filter(|name| name.ends_with(".bin"))
        .map(|name| std::fs::read(config.output_dir.join(name)).unwrap().len())
        .sum();
    assert_eq!(total, report.weight_bytes);
}

#[test]
fn embedding_width_follows_source_output() {
    let dir = TempDir::new().unwrap();
    let config = config_in(&dir);
    write_fixture(&config, vec![1, 112, 112, 3], vec![1, 128]);

    let report = run_pipeline(&config, LogLevel::Quiet).unwrap();
    assert_eq!(report.embedding_width, 128);

    let text = std::fs::read_to_string(config.output_dir.join("model.json")).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
    let dense = parsed["weightsManifest"][0]["weights"]
        .as_array()
        .unwrap()
        .iter()
        .find(|w| w["name"] == "dense/kernel")
        .unwrap()
        .clone();
    assert_eq!(dense["shape"][1], 128);
}

#[test]
fn missing_source_fails_before_any_write() {
    let dir = TempDir::new().unwrap();
    let config = config_in(&dir);

    let err = run_pipeline(&config, LogLevel::Quiet).unwrap_err();
    assert!(matches!(err, PipelineError::MissingSourceArtifact(_)));
    assert!(err.to_string().contains("not found"));

    assert!(!config.intermediate_dir.exists());
    assert!(!config.output_dir.exists());
}

#[test]
fn corrupt_source_is_an_inspection_failure() {
    let dir = TempDir::new().unwrap();
    let config = config_in(&dir);
    std::fs::write(&config.source_model, b"garbage bytes, not a flatbuffer").unwrap();

    let err = run_pipeline(&config, LogLevel::Quiet).unwrap_err();
    assert!(matches!(err, PipelineError::Inspect(_)));
    assert!(!config.intermediate_dir.exists());
    assert!(!config.output_dir.exists());
}

#[test]
fn second_run_produces_identical_structure() {
    let dir = TempDir::new().unwrap();
    let config = config_in(&dir);
    write_fixture(&config, vec![1, 112, 112, 3], vec![1, 512]);

    run_pipeline(&config, LogLevel::Quiet).unwrap();
    let first = dir_entries(&config.output_dir);

    run_pipeline(&config, LogLevel::Quiet).unwrap();
    let second = dir_entries(&config.output_dir);

    assert_eq!(first, second);
}

#[test]
fn stale_output_files_do_not_survive() {
    let dir = TempDir::new().unwrap();
    let config = config_in(&dir);
    write_fixture(&config, vec![1, 112, 112, 3], vec![1, 512]);

    // Simulate leftovers of a prior run with a different output shape.
    std::fs::create_dir_all(&config.intermediate_dir).unwrap();
    std::fs::write(config.intermediate_dir.join("stale.json"), b"{}").unwrap();
    std::fs::create_dir_all(&config.output_dir).unwrap();
    std::fs::write(config.output_dir.join("group1-shard9of9.bin"), b"old").unwrap();

    run_pipeline(&config, LogLevel::Quiet).unwrap();

    assert!(!config.intermediate_dir.join("stale.json").exists());
    assert!(!config.output_dir.join("group1-shard9of9.bin").exists());
}

#[test]
fn export_failure_leaves_intermediate_behind() {
    let dir = TempDir::new().unwrap();
    let config = config_in(&dir);
    write_fixture(&config, vec![1, 112, 112, 3], vec![1, 512]);

    // A plain file at the output path makes the export stage's directory
    // reset fail.
    std::fs::write(&config.output_dir, b"in the way").unwrap();

    let err = run_pipeline(&config, LogLevel::Quiet).unwrap_err();
    assert!(matches!(err, PipelineError::Export(_)));

    // The intermediate stage completed; its directory stays on disk.
    assert!(config.intermediate_dir.join("graph.json").is_file());
    assert!(config.intermediate_dir.join("params.bin").is_file());
}

#[test]
fn unsupported_input_rank_is_a_reconstruction_failure() {
    let dir = TempDir::new().unwrap();
    let config = config_in(&dir);
    write_fixture(&config, vec![1, 512], vec![1, 512]);

    let err = run_pipeline(&config, LogLevel::Quiet).unwrap_err();
    assert!(matches!(err, PipelineError::Reconstruct(_)));
    assert!(!config.intermediate_dir.exists());
}
