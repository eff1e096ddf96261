//! Bundle writing

use super::{BundleError, BundleManifest, ParamInfo, BUNDLE_FORMAT, GRAPH_FILE, PARAMS_FILE};
use crate::graph::{CompiledModel, LayerConfig};
use std::fs;
use std::path::Path;

/// Write a compiled model as a self-contained bundle directory. An existing
/// directory at `dir` is deleted first; the bundle never merges with stale
/// output.
pub fn save_bundle(model: &CompiledModel, dir: impl AsRef<Path>) -> Result<(), BundleError> {
    let dir = dir.as_ref();
    if dir.exists() {
        fs::remove_dir_all(dir)?;
    }
    fs::create_dir_all(dir)?;

    let manifest = BundleManifest {
        format: BUNDLE_FORMAT.to_string(),
        name: "mobilefacenet".to_string(),
        input_shape: model.graph.input_shape.clone(),
        output_units: model.graph.output_units(),
        layers: model.graph.layers.iter().map(LayerConfig::from).collect(),
        compile: model.compile.clone(),
        params: model
            .graph
            .params
            .iter()
            .map(|p| ParamInfo {
                name: p.name.clone(),
                shape: p.shape(),
                dtype: "f32".to_string(),
            })
            .collect(),
    };

    let json = serde_json::to_string_pretty(&manifest)?;
    fs::write(dir.join(GRAPH_FILE), json)?;

    let mut data = Vec::new();
    for param in &model.graph.params {
        for &value in param.data.iter() {
            data.extend_from_slice(&value.to_le_bytes());
        }
    }
    fs::write(dir.join(PARAMS_FILE), data)?;

    Ok(())
}
