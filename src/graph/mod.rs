//! Graph reconstruction
//!
//! Re-authors a stand-in computational graph sized to the inspected TFLite
//! shapes: an input node, a downsampling Conv2D / BatchNormalization / ReLU
//! stack, and a Dense projection to the embedding width. This is a structural
//! approximation of MobileFaceNet, not a reproduction of its topology or
//! weights; the real network is far deeper. What the web client depends on is
//! the contract that the output feature width matches the source model
//! exactly.

mod init;
mod layers;

pub use layers::{Layer, LayerConfig};

use init::{glorot_uniform, InitRng};
use ndarray::{ArrayD, IxDyn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Width of the stand-in convolution stack.
const CONV_FILTERS: usize = 64;
const CONV_KERNEL: usize = 3;
const CONV_STRIDES: usize = 2;

/// Errors raised while reconstructing the graph
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("expected rank-4 input shape (batch, height, width, channels), got rank {0}")]
    InputRank(usize),

    #[error("expected an output shape of rank >= 2 with a feature dimension, got rank {0}")]
    OutputRank(usize),

    #[error("non-positive dimension {dim} in {what} shape")]
    BadDimension { what: &'static str, dim: i32 },
}

/// One initialized parameter of the reconstructed graph.
#[derive(Debug, Clone)]
pub struct Param {
    pub name: String,
    pub data: ArrayD<f32>,
}

impl Param {
    pub fn shape(&self) -> Vec<usize> {
        self.data.shape().to_vec()
    }
}

/// Optimizer/loss configuration attached before serialization. The bundle
/// format requires a compiled model; no training ever runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompileConfig {
    pub optimizer: String,
    pub loss: String,
}

/// The reconstructed computation graph with initialized parameters.
#[derive(Debug, Clone)]
pub struct EmbeddingGraph {
    /// Input node shape, batch dimension stripped.
    pub input_shape: Vec<usize>,
    pub layers: Vec<Layer>,
    pub params: Vec<Param>,
    output_units: usize,
}

impl EmbeddingGraph {
    /// Reassemble a graph from bundle parts; shapes were validated when the
    /// bundle was written.
    pub(crate) fn from_parts(
        input_shape: Vec<usize>,
        layers: Vec<Layer>,
        params: Vec<Param>,
        output_units: usize,
    ) -> Self {
        EmbeddingGraph {
            input_shape,
            layers,
            params,
            output_units,
        }
    }

    /// Feature width of the output node. Guaranteed to equal the inspected
    /// source output width.
    pub fn output_units(&self) -> usize {
        self.output_units
    }

    /// Attach an optimizer/loss configuration, producing a model ready for
    /// serialization.
    pub fn compile(self, optimizer: impl Into<String>, loss: impl Into<String>) -> CompiledModel {
        CompiledModel {
            graph: self,
            compile: CompileConfig {
                optimizer: optimizer.into(),
                loss: loss.into(),
            },
        }
    }
}

/// A graph plus its compile configuration; the unit of serialization.
#[derive(Debug, Clone)]
pub struct CompiledModel {
    pub graph: EmbeddingGraph,
    pub compile: CompileConfig,
}

/// Build the stand-in graph from the inspected source shapes. Both shapes
/// arrive with their leading batch placeholder still present.
pub fn reconstruct(input_shape: &[i32], output_shape: &[i32]) -> Result<EmbeddingGraph, GraphError> {
    if input_shape.len() != 4 {
        return Err(GraphError::InputRank(input_shape.len()));
    }
    if output_shape.len() < 2 {
        return Err(GraphError::OutputRank(output_shape.len()));
    }
    check_positive(input_shape, "input")?;
    check_positive(output_shape, "output")?;

    let input: Vec<usize> = input_shape[1..].iter().map(|&d| d as usize).collect();
    let in_channels = input[2];
    let units = output_shape[1] as usize;

    let layers = vec![
        Layer::Input {
            shape: input.clone(),
        },
        Layer::Conv2D {
            filters: CONV_FILTERS,
            kernel: CONV_KERNEL,
            strides: CONV_STRIDES,
        },
        Layer::BatchNorm,
        Layer::ReLU,
        Layer::Dense { units },
    ];

    let mut rng = InitRng::fixed();
    let kernel_shape = [CONV_KERNEL, CONV_KERNEL, in_channels, CONV_FILTERS];
    let conv_fan_in = CONV_KERNEL * CONV_KERNEL * in_channels;
    let conv_fan_out = CONV_KERNEL * CONV_KERNEL * CONV_FILTERS;

    let params = vec![
        Param {
            name: "conv2d/kernel".to_string(),
            data: glorot_uniform(&mut rng, &kernel_shape, conv_fan_in, conv_fan_out),
        },
        Param {
            name: "conv2d/bias".to_string(),
            data: ArrayD::zeros(IxDyn(&[CONV_FILTERS])),
        },
        Param {
            name: "batch_normalization/gamma".to_string(),
            data: ArrayD::from_elem(IxDyn(&[CONV_FILTERS]), 1.0),
        },
        Param {
            name: "batch_normalization/beta".to_string(),
            data: ArrayD::zeros(IxDyn(&[CONV_FILTERS])),
        },
        Param {
            name: "batch_normalization/moving_mean".to_string(),
            data: ArrayD::zeros(IxDyn(&[CONV_FILTERS])),
        },
        Param {
            name: "batch_normalization/moving_variance".to_string(),
            data: ArrayD::from_elem(IxDyn(&[CONV_FILTERS]), 1.0),
        },
        Param {
            name: "dense/kernel".to_string(),
            data: glorot_uniform(&mut rng, &[CONV_FILTERS, units], CONV_FILTERS, units),
        },
        Param {
            name: "dense/bias".to_string(),
            data: ArrayD::zeros(IxDyn(&[units])),
        },
    ];

    Ok(EmbeddingGraph {
        input_shape: input,
        layers,
        params,
        output_units: units,
    })
}

fn check_positive(shape: &[i32], what: &'static str) -> Result<(), GraphError> {
    for &dim in shape {
        if dim <= 0 {
            return Err(GraphError::BadDimension { what, dim });
        }
    }
    Ok(())
}
