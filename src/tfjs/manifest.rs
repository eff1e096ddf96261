//! model.json structures
//!
//! Top-level keys are camelCase per the TensorFlow.js contract; the embedded
//! `modelTopology` keeps Keras's snake_case keys.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelJson {
    pub format: String,
    pub generated_by: String,
    pub converted_by: String,
    pub model_topology: ModelTopology,
    pub weights_manifest: Vec<WeightsGroup>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelTopology {
    pub keras_version: String,
    pub backend: String,
    pub model_config: serde_json::Value,
    pub training_config: serde_json::Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeightsGroup {
    pub paths: Vec<String>,
    pub weights: Vec<WeightEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeightEntry {
    pub name: String,
    pub shape: Vec<usize>,
    pub dtype: String,
}
