//! Bundle reading
//!
//! The target exporter reads the intermediate bundle back from disk rather
//! than reusing the in-memory model, so the bundle must be loadable
//! independently of the process that wrote it.

use super::{BundleError, BundleManifest, BUNDLE_FORMAT, GRAPH_FILE, PARAMS_FILE};
use crate::graph::{CompiledModel, EmbeddingGraph, Param};
use ndarray::{ArrayD, IxDyn};
use std::fs;
use std::path::Path;

/// Load a bundle directory written by [`super::save_bundle`].
pub fn load_bundle(dir: impl AsRef<Path>) -> Result<CompiledModel, BundleError> {
    let dir = dir.as_ref();

    let json = fs::read_to_string(dir.join(GRAPH_FILE))?;
    let manifest: BundleManifest = serde_json::from_str(&json)?;
    if manifest.format != BUNDLE_FORMAT {
        return Err(BundleError::UnknownFormat(manifest.format));
    }

    let data = fs::read(dir.join(PARAMS_FILE))?;
    let mut offset: usize = 0;
    let mut params = Vec::with_capacity(manifest.params.len());
    for info in &manifest.params {
        let elements = info
            .shape
            .iter()
            .fold(1usize, |acc, &dim| acc.saturating_mul(dim));
        let byte_len = elements.saturating_mul(4);
        let bytes = offset
            .checked_add(byte_len)
            .and_then(|end| data.get(offset..end))
            .ok_or_else(|| BundleError::ParamSize {
                name: info.name.clone(),
                expected: byte_len,
                available: data.len() - offset,
            })?;
        let values: Vec<f32> = bytes
            .chunks_exact(4)
            .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
            .collect();
        offset += byte_len;

        let array = ArrayD::from_shape_vec(IxDyn(&info.shape), values).map_err(|_| {
            BundleError::ParamSize {
                name: info.name.clone(),
                expected: byte_len,
                available: byte_len,
            }
        })?;
        params.push(Param {
            name: info.name.clone(),
            data: array,
        });
    }
    if offset != data.len() {
        return Err(BundleError::TrailingData(data.len() - offset));
    }

    let layers = manifest.layers.iter().map(|c| c.layer.clone()).collect();
    let graph = EmbeddingGraph::from_parts(
        manifest.input_shape,
        layers,
        params,
        manifest.output_units,
    );
    Ok(CompiledModel {
        graph,
        compile: manifest.compile,
    })
}
