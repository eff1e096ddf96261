//! Configuration types: CLI definitions and the pipeline path configuration.

mod cli;

pub use cli::{Cli, Command, ConvertArgs, InspectArgs};

use std::path::PathBuf;

/// Filesystem paths the pipeline operates on. Defaults reproduce the
/// historical fixed layout of the web app checkout; tests point these at
/// temporary directories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertConfig {
    /// Quantized TFLite source artifact.
    pub source_model: PathBuf,
    /// Intermediate bundle directory, overwritten on every run.
    pub intermediate_dir: PathBuf,
    /// Final TensorFlow.js directory served as static assets.
    pub output_dir: PathBuf,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            source_model: PathBuf::from("assets/models/mobilefacenet.tflite"),
            intermediate_dir: PathBuf::from("temp_saved_model"),
            output_dir: PathBuf::from("public/models/mobilefacenet"),
        }
    }
}

impl From<&ConvertArgs> for ConvertConfig {
    fn from(args: &ConvertArgs) -> Self {
        Self {
            source_model: args.model.clone(),
            intermediate_dir: args.intermediate.clone(),
            output_dir: args.output.clone(),
        }
    }
}
