//! Intermediate bundle serialization
//!
//! The reconstructed model is persisted as a self-contained directory before
//! export: `graph.json` carries the metadata, layer configs, compile config,
//! and parameter manifest; `params.bin` carries the raw little-endian f32
//! parameter data in manifest order. The bundle is overwritten wholesale on
//! every run; there is no merging or versioning.

mod load;
mod save;

pub use load::load_bundle;
pub use save::save_bundle;

use crate::graph::{CompileConfig, LayerConfig};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const GRAPH_FILE: &str = "graph.json";
pub const PARAMS_FILE: &str = "params.bin";

/// Format tag written into `graph.json`; checked on load.
pub const BUNDLE_FORMAT: &str = "convertir-bundle/1";

/// Errors raised while writing or reading the intermediate bundle
#[derive(Debug, Error)]
pub enum BundleError {
    #[error("bundle I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("bundle JSON is invalid: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unrecognized bundle format '{0}'")]
    UnknownFormat(String),

    #[error("parameter '{name}' expects {expected} bytes but {available} remain")]
    ParamSize {
        name: String,
        expected: usize,
        available: usize,
    },

    #[error("parameter data has {0} trailing bytes not covered by the manifest")]
    TrailingData(usize),
}

/// Manifest entry for one parameter in `params.bin`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParamInfo {
    pub name: String,
    pub shape: Vec<usize>,
    pub dtype: String,
}

/// Contents of `graph.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BundleManifest {
    pub format: String,
    pub name: String,
    pub input_shape: Vec<usize>,
    pub output_units: usize,
    pub layers: Vec<LayerConfig>,
    pub compile: CompileConfig,
    pub params: Vec<ParamInfo>,
}
