//! Layer definitions for the reconstructed graph

use serde::{Deserialize, Serialize};

/// Layers of the stand-in graph, in forward order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Layer {
    #[serde(rename = "input")]
    Input { shape: Vec<usize> },
    #[serde(rename = "conv2d")]
    Conv2D {
        filters: usize,
        kernel: usize,
        strides: usize,
    },
    #[serde(rename = "batch_norm")]
    BatchNorm,
    #[serde(rename = "relu")]
    ReLU,
    #[serde(rename = "dense")]
    Dense { units: usize },
}

impl Layer {
    /// Keras class name used in the exported topology.
    pub fn class_name(&self) -> &'static str {
        match self {
            Layer::Input { .. } => "InputLayer",
            Layer::Conv2D { .. } => "Conv2D",
            Layer::BatchNorm => "BatchNormalization",
            Layer::ReLU => "ReLU",
            Layer::Dense { .. } => "Dense",
        }
    }

    /// Layer instance name; parameter names are prefixed with this.
    pub fn layer_name(&self) -> &'static str {
        match self {
            Layer::Input { .. } => "input",
            Layer::Conv2D { .. } => "conv2d",
            Layer::BatchNorm => "batch_normalization",
            Layer::ReLU => "re_lu",
            Layer::Dense { .. } => "dense",
        }
    }
}

/// Serialized layer entry in the intermediate bundle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayerConfig {
    pub name: String,
    #[serde(flatten)]
    pub layer: Layer,
}

impl From<&Layer> for LayerConfig {
    fn from(layer: &Layer) -> Self {
        LayerConfig {
            name: layer.layer_name().to_string(),
            layer: layer.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_names() {
        assert_eq!(
            Layer::Conv2D {
                filters: 64,
                kernel: 3,
                strides: 2
            }
            .class_name(),
            "Conv2D"
        );
        assert_eq!(Layer::BatchNorm.class_name(), "BatchNormalization");
        assert_eq!(Layer::Dense { units: 512 }.class_name(), "Dense");
    }

    #[test]
    fn test_layer_serde_round_trip() {
        let layer = Layer::Conv2D {
            filters: 64,
            kernel: 3,
            strides: 2,
        };
        let json = serde_json::to_string(&layer).unwrap();
        assert!(json.contains("\"type\":\"conv2d\""));
        let back: Layer = serde_json::from_str(&json).unwrap();
        assert_eq!(back, layer);
    }
}
