//! Convert command implementation

use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::config::{ConvertArgs, ConvertConfig};
use crate::pipeline::run_pipeline;

pub fn run_convert(args: ConvertArgs, level: LogLevel) -> Result<(), String> {
    log(
        level,
        LogLevel::Normal,
        "Starting MobileFaceNet model conversion...",
    );

    let config = ConvertConfig::from(&args);
    let report = run_pipeline(&config, level).map_err(|e| e.to_string())?;

    log(level, LogLevel::Normal, "Conversion completed successfully.");
    log(
        level,
        LogLevel::Normal,
        &format!(
            "Model available at: {} (embedding width {})",
            config.output_dir.display(),
            report.embedding_width
        ),
    );
    Ok(())
}
