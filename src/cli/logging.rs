//! Plain-println progress output with a quiet/normal/verbose switch.

/// Output level selected by the global CLI flags
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Suppress all output
    Quiet,
    /// Normal progress output
    Normal,
    /// Additional per-tensor and per-file details
    Verbose,
}

/// Print a message if the current level permits it
pub fn log(level: LogLevel, required: LogLevel, msg: &str) {
    if level != LogLevel::Quiet && (level == required || required == LogLevel::Normal) {
        println!("{msg}");
    }
}
