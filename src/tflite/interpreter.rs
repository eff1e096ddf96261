//! TFLite interpreter abstraction
//!
//! Follows the load / allocate / read-details shape of the tf.lite
//! Interpreter: tensor descriptors only become readable after
//! [`Interpreter::allocate_tensors`] has resolved and sized them.

use super::flatbuffer::Table;
use super::{Result, TensorType, TfliteError};
use std::path::Path;

// TFLite schema field ids.
const MODEL_VERSION: u16 = 0;
const MODEL_SUBGRAPHS: u16 = 2;
const MODEL_DESCRIPTION: u16 = 3;
const SUBGRAPH_TENSORS: u16 = 0;
const SUBGRAPH_INPUTS: u16 = 1;
const SUBGRAPH_OUTPUTS: u16 = 2;
const TENSOR_SHAPE: u16 = 0;
const TENSOR_TYPE: u16 = 1;
const TENSOR_NAME: u16 = 3;

const FILE_IDENTIFIER: &[u8; 4] = b"TFL3";

/// Descriptor for one tensor slot: shape, element type, and the buffer size
/// computed during allocation.
#[derive(Debug, Clone)]
pub struct TensorInfo {
    pub name: String,
    pub shape: Vec<i32>,
    pub dtype: TensorType,
    pub byte_len: usize,
}

/// Tensor metadata as declared in the file, before allocation.
#[derive(Debug, Clone)]
struct RawTensor {
    name: String,
    shape: Vec<i32>,
    dtype: TensorType,
}

/// Descriptors resolved by `allocate_tensors`.
#[derive(Debug)]
struct Allocated {
    all: Vec<TensorInfo>,
    inputs: Vec<TensorInfo>,
    outputs: Vec<TensorInfo>,
}

/// A loaded TFLite model with tf.lite-style accessors.
#[derive(Debug)]
pub struct Interpreter {
    version: u32,
    description: String,
    tensors: Vec<RawTensor>,
    input_indices: Vec<usize>,
    output_indices: Vec<usize>,
    allocated: Option<Allocated>,
}

impl Interpreter {
    /// Load a TFLite model from disk.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read(path).map_err(|source| TfliteError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_bytes(&data)
    }

    /// Parse a TFLite model from an in-memory buffer.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        if data.len() < 8 {
            return Err(TfliteError::TooSmall(data.len()));
        }
        if &data[4..8] != FILE_IDENTIFIER {
            return Err(TfliteError::BadIdentifier);
        }

        let model = Table::root(data)?;
        let version = model.get_u32(MODEL_VERSION, 0)?;
        let description = model.get_string(MODEL_DESCRIPTION)?.unwrap_or_default();

        let subgraphs = model
            .get_vector(MODEL_SUBGRAPHS)?
            .ok_or(TfliteError::NoSubgraph)?;
        if subgraphs.len() == 0 {
            return Err(TfliteError::NoSubgraph);
        }
        // Multi-subgraph models are not supported; only subgraph 0 is read.
        let subgraph = subgraphs.table_at(0)?;

        let tensor_tables = subgraph
            .get_vector(SUBGRAPH_TENSORS)?
            .ok_or(TfliteError::Malformed("subgraph without tensors"))?;
        let mut tensors = Vec::with_capacity(tensor_tables.len());
        for i in 0..tensor_tables.len() {
            let t = tensor_tables.table_at(i)?;
            let shape = match t.get_vector(TENSOR_SHAPE)? {
                Some(dims) => {
                    let mut shape = Vec::with_capacity(dims.len());
                    for d in 0..dims.len() {
                        shape.push(dims.i32_at(d)?);
                    }
                    shape
                }
                None => Vec::new(),
            };
            tensors.push(RawTensor {
                name: t.get_string(TENSOR_NAME)?.unwrap_or_default(),
                shape,
                dtype: TensorType::from_code(t.get_i8(TENSOR_TYPE, 0)?),
            });
        }

        let input_indices = read_index_vector(&subgraph, SUBGRAPH_INPUTS, "input")?;
        let output_indices = read_index_vector(&subgraph, SUBGRAPH_OUTPUTS, "output")?;

        Ok(Interpreter {
            version,
            description,
            tensors,
            input_indices,
            output_indices,
            allocated: None,
        })
    }

    /// Resolve and size all tensor descriptors. Must be called before the
    /// detail accessors return anything.
    pub fn allocate_tensors(&mut self) -> Result<()> {
        let mut all = Vec::with_capacity(self.tensors.len());
        for raw in &self.tensors {
            all.push(allocate_one(raw)?);
        }
        let inputs = resolve(&all, &self.input_indices)?;
        let outputs = resolve(&all, &self.output_indices)?;
        self.allocated = Some(Allocated {
            all,
            inputs,
            outputs,
        });
        Ok(())
    }

    /// Input tensor descriptors, in declaration order.
    pub fn input_details(&self) -> Result<&[TensorInfo]> {
        self.allocated
            .as_ref()
            .map(|a| a.inputs.as_slice())
            .ok_or(TfliteError::TensorsNotAllocated)
    }

    /// Output tensor descriptors, in declaration order.
    pub fn output_details(&self) -> Result<&[TensorInfo]> {
        self.allocated
            .as_ref()
            .map(|a| a.outputs.as_slice())
            .ok_or(TfliteError::TensorsNotAllocated)
    }

    /// Every tensor in subgraph 0, for verbose inspection.
    pub fn tensors(&self) -> Result<&[TensorInfo]> {
        self.allocated
            .as_ref()
            .map(|a| a.all.as_slice())
            .ok_or(TfliteError::TensorsNotAllocated)
    }

    pub fn tensor_count(&self) -> usize {
        self.tensors.len()
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

fn read_index_vector(subgraph: &Table<'_>, field: u16, what: &'static str) -> Result<Vec<usize>> {
    let vector = subgraph
        .get_vector(field)?
        .ok_or(TfliteError::NoIoTensor(what))?;
    if vector.len() == 0 {
        return Err(TfliteError::NoIoTensor(what));
    }
    let mut indices = Vec::with_capacity(vector.len());
    for i in 0..vector.len() {
        let index = vector.i32_at(i)?;
        if index < 0 {
            return Err(TfliteError::Malformed("negative tensor index"));
        }
        indices.push(index as usize);
    }
    Ok(indices)
}

fn allocate_one(raw: &RawTensor) -> Result<TensorInfo> {
    let mut elements: usize = 1;
    for &dim in &raw.shape {
        if dim <= 0 {
            return Err(TfliteError::BadDimension {
                name: raw.name.clone(),
                dim,
            });
        }
        elements = elements.saturating_mul(dim as usize);
    }
    let byte_len = elements.saturating_mul(raw.dtype.byte_size()?);
    Ok(TensorInfo {
        name: raw.name.clone(),
        shape: raw.shape.clone(),
        dtype: raw.dtype,
        byte_len,
    })
}

fn resolve(all: &[TensorInfo], indices: &[usize]) -> Result<Vec<TensorInfo>> {
    indices
        .iter()
        .map(|&i| {
            all.get(i)
                .cloned()
                .ok_or(TfliteError::TensorIndex(i))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tflite::TfliteFixture;

    fn mobilefacenet_bytes() -> Vec<u8> {
        TfliteFixture::new(vec![1, 112, 112, 3], vec![1, 512]).to_bytes()
    }

    #[test]
    fn test_parse_fixture_shapes() {
        let mut interp = Interpreter::from_bytes(&mobilefacenet_bytes()).unwrap();
        interp.allocate_tensors().unwrap();

        let inputs = interp.input_details().unwrap();
        let outputs = interp.output_details().unwrap();
        assert_eq!(inputs[0].shape, vec![1, 112, 112, 3]);
        assert_eq!(outputs[0].shape, vec![1, 512]);
        assert_eq!(inputs[0].dtype, TensorType::Float32);
        assert_eq!(inputs[0].byte_len, 112 * 112 * 3 * 4);
        assert_eq!(outputs[0].byte_len, 512 * 4);
    }

    #[test]
    fn test_details_require_allocation() {
        let interp = Interpreter::from_bytes(&mobilefacenet_bytes()).unwrap();
        assert!(matches!(
            interp.input_details(),
            Err(TfliteError::TensorsNotAllocated)
        ));
        assert!(matches!(
            interp.output_details(),
            Err(TfliteError::TensorsNotAllocated)
        ));
    }

    #[test]
    fn test_tensor_names_and_metadata() {
        let mut interp = Interpreter::from_bytes(&mobilefacenet_bytes()).unwrap();
        interp.allocate_tensors().unwrap();

        assert_eq!(interp.version(), 3);
        assert_eq!(interp.tensor_count(), 2);
        let tensors = interp.tensors().unwrap();
        assert_eq!(tensors[0].name, "input");
        assert_eq!(tensors[1].name, "embeddings");
    }

    #[test]
    fn test_quantized_input_dtype() {
        let bytes = TfliteFixture::new(vec![1, 112, 112, 3], vec![1, 512])
            .input_dtype(TensorType::Uint8)
            .to_bytes();
        let mut interp = Interpreter::from_bytes(&bytes).unwrap();
        interp.allocate_tensors().unwrap();
        let inputs = interp.input_details().unwrap();
        assert_eq!(inputs[0].dtype, TensorType::Uint8);
        assert_eq!(inputs[0].byte_len, 112 * 112 * 3);
    }

    #[test]
    fn test_rejects_non_tflite_bytes() {
        assert!(matches!(
            Interpreter::from_bytes(b"not a model at all"),
            Err(TfliteError::BadIdentifier)
        ));
        assert!(matches!(
            Interpreter::from_bytes(b"abc"),
            Err(TfliteError::TooSmall(3))
        ));
    }

    #[test]
    fn test_rejects_truncated_model() {
        let bytes = mobilefacenet_bytes();
        let truncated = &bytes[..bytes.len() / 2];
        assert!(Interpreter::from_bytes(truncated).is_err());
    }

    #[test]
    fn test_rejects_non_positive_dimension() {
        let bytes = TfliteFixture::new(vec![1, -1, 112, 3], vec![1, 512]).to_bytes();
        let mut interp = Interpreter::from_bytes(&bytes).unwrap();
        assert!(matches!(
            interp.allocate_tensors(),
            Err(TfliteError::BadDimension { dim: -1, .. })
        ));
    }

    #[test]
    fn test_interpreter_is_debuggable() {
        let mut interp = Interpreter::from_bytes(&mobilefacenet_bytes()).unwrap();
        interp.allocate_tensors().unwrap();
        let repr = format!("{interp:?}");
        assert!(repr.contains("Interpreter"));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = Interpreter::from_file("/nonexistent/model.tflite").unwrap_err();
        assert!(matches!(err, TfliteError::Io { .. }));
    }
}
