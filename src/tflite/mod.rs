//! TFLite model inspection
//!
//! Reads just enough of the TFLite flatbuffer container to answer one
//! question: what are the declared input and output tensor shapes? The
//! interpreter mirrors the tf.lite API surface the conversion historically
//! relied on (load, allocate tensors, read descriptors) without pulling in a
//! TensorFlow runtime. Operator semantics, buffers, and quantization
//! parameters are ignored.

mod builder;
mod flatbuffer;
mod interpreter;

pub use builder::TfliteFixture;
pub use interpreter::{Interpreter, TensorInfo};

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading or inspecting a TFLite model
#[derive(Debug, Error)]
pub enum TfliteError {
    #[error("failed to read model file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("model file too small ({0} bytes)")]
    TooSmall(usize),

    #[error("not a TFLite flatbuffer (missing TFL3 identifier)")]
    BadIdentifier,

    #[error("malformed flatbuffer: {0}")]
    Malformed(&'static str),

    #[error("model contains no subgraph")]
    NoSubgraph,

    #[error("subgraph declares no {0} tensors")]
    NoIoTensor(&'static str),

    #[error("tensor index {0} out of range")]
    TensorIndex(usize),

    #[error("tensors are not allocated; call allocate_tensors() first")]
    TensorsNotAllocated,

    #[error("tensor '{name}' has non-positive dimension {dim}")]
    BadDimension { name: String, dim: i32 },

    #[error("unsupported tensor element type (code {0})")]
    UnsupportedDtype(i8),
}

/// Result type for TFLite inspection operations
pub type Result<T> = std::result::Result<T, TfliteError>;

/// Tensor element types from the TFLite schema
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TensorType {
    Float32,
    Float16,
    Int32,
    Uint8,
    Int64,
    Bool,
    Int16,
    Int8,
    Unknown(i8),
}

impl TensorType {
    pub(crate) fn from_code(code: i8) -> Self {
        match code {
            0 => TensorType::Float32,
            1 => TensorType::Float16,
            2 => TensorType::Int32,
            3 => TensorType::Uint8,
            4 => TensorType::Int64,
            6 => TensorType::Bool,
            7 => TensorType::Int16,
            9 => TensorType::Int8,
            other => TensorType::Unknown(other),
        }
    }

    pub(crate) fn code(self) -> i8 {
        match self {
            TensorType::Float32 => 0,
            TensorType::Float16 => 1,
            TensorType::Int32 => 2,
            TensorType::Uint8 => 3,
            TensorType::Int64 => 4,
            TensorType::Bool => 6,
            TensorType::Int16 => 7,
            TensorType::Int8 => 9,
            TensorType::Unknown(code) => code,
        }
    }

    /// Bytes per element, used when sizing tensor buffers
    pub fn byte_size(self) -> Result<usize> {
        match self {
            TensorType::Float32 | TensorType::Int32 => Ok(4),
            TensorType::Float16 | TensorType::Int16 => Ok(2),
            TensorType::Uint8 | TensorType::Bool | TensorType::Int8 => Ok(1),
            TensorType::Int64 => Ok(8),
            TensorType::Unknown(code) => Err(TfliteError::UnsupportedDtype(code)),
        }
    }
}

impl std::fmt::Display for TensorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TensorType::Float32 => "float32",
            TensorType::Float16 => "float16",
            TensorType::Int32 => "int32",
            TensorType::Uint8 => "uint8",
            TensorType::Int64 => "int64",
            TensorType::Bool => "bool",
            TensorType::Int16 => "int16",
            TensorType::Int8 => "int8",
            TensorType::Unknown(_) => "unknown",
        };
        write!(f, "{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tensor_type_codes_round_trip() {
        for code in [0i8, 1, 2, 3, 4, 6, 7, 9] {
            assert_eq!(TensorType::from_code(code).code(), code);
        }
        assert_eq!(TensorType::from_code(42), TensorType::Unknown(42));
    }

    #[test]
    fn test_tensor_type_byte_sizes() {
        assert_eq!(TensorType::Float32.byte_size().unwrap(), 4);
        assert_eq!(TensorType::Uint8.byte_size().unwrap(), 1);
        assert_eq!(TensorType::Int64.byte_size().unwrap(), 8);
        assert!(matches!(
            TensorType::Unknown(42).byte_size(),
            Err(TfliteError::UnsupportedDtype(42))
        ));
    }

    #[test]
    fn test_tensor_type_display() {
        assert_eq!(TensorType::Float32.to_string(), "float32");
        assert_eq!(TensorType::Uint8.to_string(), "uint8");
    }
}
