//! Convertir: TFLite to TensorFlow.js conversion for the MobileFaceNet
//! face-embedding model.
//!
//! The web client compares 512-dimensional face embeddings in the browser, so
//! the model has to be loadable by TensorFlow.js rather than served from a
//! Python backend. This crate reads the quantized TFLite artifact shipped with
//! the mobile app, inspects its input/output tensor shapes, re-authors an
//! equivalent (structurally approximate) graph sized to those shapes, and
//! emits the TensorFlow.js layers-model layout: one `model.json` plus binary
//! weight shards, ready to be served as static assets.
//!
//! # Pipeline
//!
//! ```text
//! locate source -> inspect shapes -> reconstruct graph
//!               -> write intermediate bundle -> export TF.js layout
//! ```
//!
//! See [`pipeline::run_pipeline`] for the end-to-end entry point. Paths are
//! carried in [`config::ConvertConfig`] so the pipeline can be pointed at
//! temporary directories.
//!
//! # Example
//!
//! ```no_run
//! use convertir::cli::LogLevel;
//! use convertir::config::ConvertConfig;
//! use convertir::pipeline::run_pipeline;
//!
//! let config = ConvertConfig::default();
//! let report = run_pipeline(&config, LogLevel::Normal).unwrap();
//! assert_eq!(report.embedding_width, 512);
//! ```

pub mod bundle;
pub mod cli;
pub mod config;
pub mod graph;
pub mod pipeline;
pub mod tfjs;
pub mod tflite;

pub use config::ConvertConfig;
pub use pipeline::{run_pipeline, ConvertReport, PipelineError};
