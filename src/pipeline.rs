//! End-to-end conversion pipeline
//!
//! Runs the five stages in order: locate the source artifact, inspect its
//! tensor shapes, reconstruct the stand-in graph, write the intermediate
//! bundle, export the TensorFlow.js layout. The first error is terminal;
//! directories already written by earlier stages are left on disk so a failed
//! run can be diagnosed.

use crate::bundle::{save_bundle, BundleError};
use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::config::ConvertConfig;
use crate::graph::{reconstruct, GraphError};
use crate::tfjs::{export_layers_model, ExportError};
use crate::tflite::{Interpreter, TfliteError};
use std::path::PathBuf;
use thiserror::Error;

/// Pipeline failures, by stage. Callers can tell a missing-precondition
/// failure from a mid-pipeline one.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("source model not found at {}", .0.display())]
    MissingSourceArtifact(PathBuf),

    #[error("model inspection failed: {0}")]
    Inspect(#[from] TfliteError),

    #[error("graph reconstruction failed: {0}")]
    Reconstruct(#[from] GraphError),

    #[error("intermediate serialization failed: {0}")]
    Serialize(#[from] BundleError),

    #[error("TensorFlow.js export failed: {0}")]
    Export(#[from] ExportError),
}

/// Summary of a successful conversion.
#[derive(Debug, Clone)]
pub struct ConvertReport {
    /// Source input tensor shape, batch placeholder included.
    pub input_shape: Vec<i32>,
    /// Source output tensor shape, batch placeholder included.
    pub output_shape: Vec<i32>,
    /// Embedding dimensionality of the exported model.
    pub embedding_width: usize,
    /// Number of weight shard files written.
    pub shard_count: usize,
    /// Total bytes of weight data across shards.
    pub weight_bytes: usize,
}

/// Run the conversion pipeline. The missing-source check happens before any
/// filesystem write; on failure after that point, partially written
/// directories remain on disk.
pub fn run_pipeline(
    config: &ConvertConfig,
    level: LogLevel,
) -> Result<ConvertReport, PipelineError> {
    // Stage 1: locate the source artifact.
    if !config.source_model.exists() {
        return Err(PipelineError::MissingSourceArtifact(
            config.source_model.clone(),
        ));
    }
    log(
        level,
        LogLevel::Normal,
        &format!("Converting model: {}", config.source_model.display()),
    );

    // Stage 2: inspect shapes. Only index 0 of each tensor list is consulted;
    // multi-input/multi-output models are not supported.
    let mut interpreter = Interpreter::from_file(&config.source_model)?;
    interpreter.allocate_tensors()?;
    let input_shape = interpreter.input_details()?[0].shape.clone();
    let output_shape = interpreter.output_details()?[0].shape.clone();
    log(
        level,
        LogLevel::Normal,
        &format!("Input shape: {input_shape:?}"),
    );
    log(
        level,
        LogLevel::Normal,
        &format!("Output shape: {output_shape:?}"),
    );

    // Stage 3: reconstruct the graph and attach the compile configuration the
    // bundle format requires.
    let model = reconstruct(&input_shape, &output_shape)?.compile("adam", "mse");
    let embedding_width = model.graph.output_units();
    log(
        level,
        LogLevel::Verbose,
        &format!(
            "Reconstructed graph: {} layers, {} parameters",
            model.graph.layers.len(),
            model.graph.params.len()
        ),
    );

    // Stage 4: write the intermediate bundle.
    save_bundle(&model, &config.intermediate_dir)?;
    log(
        level,
        LogLevel::Normal,
        &format!(
            "Saved intermediate bundle to {}",
            config.intermediate_dir.display()
        ),
    );

    // Stage 5: export the TensorFlow.js layout from the bundle on disk.
    let summary = export_layers_model(&config.intermediate_dir, &config.output_dir)?;
    log(
        level,
        LogLevel::Normal,
        &format!(
            "Exported TensorFlow.js model to {} ({} shard{})",
            config.output_dir.display(),
            summary.shard_count,
            if summary.shard_count == 1 { "" } else { "s" }
        ),
    );

    Ok(ConvertReport {
        input_shape,
        output_shape,
        embedding_width,
        shard_count: summary.shard_count,
        weight_bytes: summary.weight_bytes,
    })
}
