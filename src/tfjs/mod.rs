//! TensorFlow.js layers-model export
//!
//! Re-encodes the intermediate bundle into the layout tf.loadLayersModel
//! consumes: a `model.json` carrying the Keras-style topology and a weights
//! manifest, plus `group1-shardKofN.bin` binary weight shards. The output
//! directory is served to the browser as static assets.

mod export;
mod manifest;

pub use export::{export_layers_model, ExportSummary, MODEL_JSON, SHARD_CAP_BYTES};
pub use manifest::{ModelJson, ModelTopology, WeightEntry, WeightsGroup};

use crate::bundle::BundleError;
use thiserror::Error;

/// Errors raised while emitting the TensorFlow.js layout
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to read intermediate bundle: {0}")]
    Bundle(#[from] BundleError),

    #[error("export I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to serialize model.json: {0}")]
    Json(#[from] serde_json::Error),
}
