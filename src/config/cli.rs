//! CLI argument definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Convertir: MobileFaceNet TFLite to TensorFlow.js conversion
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "convertir")]
#[command(version)]
#[command(about = "Convert the MobileFaceNet TFLite model to the TensorFlow.js layers format")]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Run the full conversion pipeline
    Convert(ConvertArgs),

    /// Inspect a TFLite model's tensor shapes
    Inspect(InspectArgs),
}

/// Arguments for the convert command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct ConvertArgs {
    /// Path to the quantized TFLite source model
    #[arg(short, long, default_value = "assets/models/mobilefacenet.tflite")]
    pub model: PathBuf,

    /// Intermediate bundle directory (overwritten on every run)
    #[arg(long, default_value = "temp_saved_model")]
    pub intermediate: PathBuf,

    /// Output directory for the TensorFlow.js model
    #[arg(short, long, default_value = "public/models/mobilefacenet")]
    pub output: PathBuf,
}

/// Arguments for the inspect command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct InspectArgs {
    /// Path to the TFLite model file
    #[arg(value_name = "MODEL")]
    pub model: PathBuf,
}
