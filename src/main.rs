//! Convertir CLI
//!
//! Converts the MobileFaceNet TFLite model into the TensorFlow.js layout
//! served to the web client.
//!
//! # Usage
//!
//! ```bash
//! # Full conversion with the default asset paths
//! convertir convert
//!
//! # Conversion against explicit paths
//! convertir convert --model mobilefacenet.tflite --output public/models/mobilefacenet
//!
//! # Inspect a TFLite file's tensor shapes
//! convertir inspect mobilefacenet.tflite --verbose
//! ```

use clap::Parser;
use convertir::cli::{run_command, Cli};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run_command(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
