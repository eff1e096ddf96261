//! Inspect command implementation

use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::config::InspectArgs;
use crate::tflite::{Interpreter, TensorInfo};

pub fn run_inspect(args: InspectArgs, level: LogLevel) -> Result<(), String> {
    let file_size = std::fs::metadata(&args.model)
        .map_err(|e| format!("Failed to read {}: {e}", args.model.display()))?
        .len();

    let mut interpreter =
        Interpreter::from_file(&args.model).map_err(|e| format!("Failed to load model: {e}"))?;
    interpreter
        .allocate_tensors()
        .map_err(|e| format!("Failed to allocate tensors: {e}"))?;

    log(level, LogLevel::Normal, "TFLite Model Information:");
    log(
        level,
        LogLevel::Normal,
        &format!("  File size: {:.2} MB", file_size as f64 / 1_000_000.0),
    );
    log(
        level,
        LogLevel::Normal,
        &format!("  Schema version: {}", interpreter.version()),
    );
    if !interpreter.description().is_empty() {
        log(
            level,
            LogLevel::Normal,
            &format!("  Description: {}", interpreter.description()),
        );
    }
    log(
        level,
        LogLevel::Normal,
        &format!("  Tensors: {}", interpreter.tensor_count()),
    );

    let inputs = interpreter.input_details().map_err(|e| e.to_string())?;
    let outputs = interpreter.output_details().map_err(|e| e.to_string())?;
    log_details(level, LogLevel::Normal, "Inputs", inputs);
    log_details(level, LogLevel::Normal, "Outputs", outputs);

    if level == LogLevel::Verbose {
        let tensors = interpreter.tensors().map_err(|e| e.to_string())?;
        log_details(level, LogLevel::Verbose, "All tensors", tensors);
    }

    Ok(())
}

fn log_details(level: LogLevel, required: LogLevel, heading: &str, tensors: &[TensorInfo]) {
    log(level, required, &format!("{heading}:"));
    for t in tensors {
        log(
            level,
            required,
            &format!(
                "  {}: {:?} ({}, {} bytes)",
                t.name, t.shape, t.dtype, t.byte_len
            ),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tflite::TfliteFixture;
    use tempfile::TempDir;

    #[test]
    fn test_run_inspect_fixture() {
        let dir = TempDir::new().unwrap();
        let model_path = dir.path().join("model.tflite");
        TfliteFixture::new(vec![1, 112, 112, 3], vec![1, 512])
            .write_to(&model_path)
            .unwrap();

        let args = InspectArgs { model: model_path };
        run_inspect(args, LogLevel::Quiet).unwrap();
    }

    #[test]
    fn test_run_inspect_missing_file() {
        let args = InspectArgs {
            model: "/nonexistent/model.tflite".into(),
        };
        assert!(run_inspect(args, LogLevel::Quiet).is_err());
    }

    #[test]
    fn test_run_inspect_garbage_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("junk.tflite");
        std::fs::write(&path, b"definitely not a flatbuffer").unwrap();

        let args = InspectArgs { model: path };
        let err = run_inspect(args, LogLevel::Quiet).unwrap_err();
        assert!(err.contains("Failed to load model"));
    }
}
