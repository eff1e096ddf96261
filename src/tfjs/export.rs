//! Export to the TensorFlow.js on-disk layout

use super::manifest::{ModelJson, ModelTopology, WeightEntry, WeightsGroup};
use super::ExportError;
use crate::bundle::load_bundle;
use crate::graph::{CompileConfig, CompiledModel, Layer};
use serde_json::json;
use std::fs;
use std::path::Path;

pub const MODEL_JSON: &str = "model.json";

/// Per-shard byte cap, matching the tensorflowjs converter default.
pub const SHARD_CAP_BYTES: usize = 4 * 1024 * 1024;

const KERAS_VERSION: &str = "2.15.0";

/// What was written, for reporting.
#[derive(Debug, Clone)]
pub struct ExportSummary {
    pub shard_count: usize,
    pub weight_bytes: usize,
}

/// Read the intermediate bundle and emit the TensorFlow.js layers-model
/// layout into `out_dir`. Any existing directory at `out_dir` is deleted
/// first.
pub fn export_layers_model(
    intermediate_dir: impl AsRef<Path>,
    out_dir: impl AsRef<Path>,
) -> Result<ExportSummary, ExportError> {
    let model = load_bundle(intermediate_dir)?;
    let out_dir = out_dir.as_ref();

    if out_dir.exists() {
        fs::remove_dir_all(out_dir)?;
    }
    fs::create_dir_all(out_dir)?;

    let mut weight_data = Vec::new();
    let mut weights = Vec::with_capacity(model.graph.params.len());
    for param in &model.graph.params {
        weights.push(WeightEntry {
            name: param.name.clone(),
            shape: param.shape(),
            dtype: "float32".to_string(),
        });
        for &value in param.data.iter() {
            weight_data.extend_from_slice(&value.to_le_bytes());
        }
    }

    let shards = split_shards(&weight_data, SHARD_CAP_BYTES);
    let paths = shard_paths(shards.len());
    for (path, shard) in paths.iter().zip(&shards) {
        fs::write(out_dir.join(path), shard)?;
    }

    let manifest = ModelJson {
        format: "layers-model".to_string(),
        generated_by: format!("convertir {}", env!("CARGO_PKG_VERSION")),
        converted_by: format!("convertir {}", env!("CARGO_PKG_VERSION")),
        model_topology: ModelTopology {
            keras_version: KERAS_VERSION.to_string(),
            backend: "tensorflow".to_string(),
            model_config: model_config(&model),
            training_config: training_config(&model.compile),
        },
        weights_manifest: vec![WeightsGroup { paths, weights }],
    };
    let text = serde_json::to_string_pretty(&manifest)?;
    fs::write(out_dir.join(MODEL_JSON), text)?;

    Ok(ExportSummary {
        shard_count: shards.len(),
        weight_bytes: weight_data.len(),
    })
}

/// Split the flat weight blob into shards of at most `cap` bytes.
pub(crate) fn split_shards(data: &[u8], cap: usize) -> Vec<&[u8]> {
    if data.is_empty() {
        return vec![data];
    }
    data.chunks(cap).collect()
}

/// TensorFlow.js shard naming: group1-shard1of3.bin, group1-shard2of3.bin, ...
pub(crate) fn shard_paths(count: usize) -> Vec<String> {
    (1..=count)
        .map(|k| format!("group1-shard{k}of{count}.bin"))
        .collect()
}

fn model_config(model: &CompiledModel) -> serde_json::Value {
    let layers: Vec<serde_json::Value> = model
        .graph
        .layers
        .iter()
        .map(layer_config)
        .collect();
    json!({
        "class_name": "Model",
        "config": {
            "name": "mobilefacenet",
            "layers": layers,
        }
    })
}

fn layer_config(layer: &Layer) -> serde_json::Value {
    let config = match layer {
        Layer::Input { shape } => {
            let mut batch_shape = vec![serde_json::Value::Null];
            batch_shape.extend(shape.iter().map(|&d| json!(d)));
            json!({
                "name": layer.layer_name(),
                "batch_input_shape": batch_shape,
                "dtype": "float32",
            })
        }
        Layer::Conv2D {
            filters,
            kernel,
            strides,
        } => json!({
            "name": layer.layer_name(),
            "filters": filters,
            "kernel_size": [kernel, kernel],
            "strides": [strides, strides],
            "padding": "same",
            "activation": "linear",
            "use_bias": true,
            "dtype": "float32",
        }),
        Layer::BatchNorm => json!({
            "name": layer.layer_name(),
            "axis": -1,
            "epsilon": 0.001,
            "center": true,
            "scale": true,
            "dtype": "float32",
        }),
        Layer::ReLU => json!({
            "name": layer.layer_name(),
            "dtype": "float32",
        }),
        Layer::Dense { units } => json!({
            "name": layer.layer_name(),
            "units": units,
            "activation": "linear",
            "use_bias": true,
            "dtype": "float32",
        }),
    };
    json!({
        "class_name": layer.class_name(),
        "config": config,
    })
}

fn training_config(compile: &CompileConfig) -> serde_json::Value {
    let optimizer = match compile.optimizer.as_str() {
        "adam" => "Adam",
        other => other,
    };
    let loss = match compile.loss.as_str() {
        "mse" => "mean_squared_error",
        other => other,
    };
    json!({
        "optimizer_config": {
            "class_name": optimizer,
            "config": {},
        },
        "loss": loss,
    })
}
