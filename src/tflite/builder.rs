//! TFLite fixture writer
//!
//! Emits a minimal valid TFLite flatbuffer: one subgraph, one input tensor,
//! one output tensor, no operators or buffers. The conversion pipeline only
//! reads shape metadata, so this is enough to stand in for a real quantized
//! model in tests and local experiments.

use super::TensorType;
use std::collections::HashMap;
use std::path::Path;

/// Builder for a minimal TFLite model file.
pub struct TfliteFixture {
    input_shape: Vec<i32>,
    output_shape: Vec<i32>,
    input_dtype: TensorType,
    output_dtype: TensorType,
    description: String,
}

impl TfliteFixture {
    pub fn new(input_shape: Vec<i32>, output_shape: Vec<i32>) -> Self {
        Self {
            input_shape,
            output_shape,
            input_dtype: TensorType::Float32,
            output_dtype: TensorType::Float32,
            description: "convertir fixture".to_string(),
        }
    }

    pub fn input_dtype(mut self, dtype: TensorType) -> Self {
        self.input_dtype = dtype;
        self
    }

    pub fn output_dtype(mut self, dtype: TensorType) -> Self {
        self.output_dtype = dtype;
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Serialize the model to flatbuffer bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut w = Writer::default();

        // Header: root uoffset + file identifier.
        w.uoffset_to("model");
        w.bytes(b"TFL3");

        // Model table: version, subgraphs, description. The vtable follows
        // the table body directly, hence the fixed negative soffset.
        w.align4();
        w.mark("model");
        w.i32(-16);
        w.u32(3); // schema version
        w.uoffset_to("subgraphs");
        w.uoffset_to("description");
        w.u16(12); // vtable length (4 fields)
        w.u16(16); // table length
        w.u16(4); // version
        w.u16(0); // operator_codes (absent)
        w.u16(8); // subgraphs
        w.u16(12); // description

        w.align4();
        w.mark("description");
        w.string(&self.description);

        w.align4();
        w.mark("subgraphs");
        w.u32(1);
        w.uoffset_to("subgraph0");

        // SubGraph table: tensors, inputs, outputs.
        w.align4();
        w.mark("subgraph0");
        w.i32(-16);
        w.uoffset_to("tensors");
        w.uoffset_to("inputs");
        w.uoffset_to("outputs");
        w.u16(10); // vtable length (3 fields)
        w.u16(16);
        w.u16(4); // tensors
        w.u16(8); // inputs
        w.u16(12); // outputs

        w.align4();
        w.mark("tensors");
        w.u32(2);
        w.uoffset_to("tensor0");
        w.uoffset_to("tensor1");

        w.align4();
        w.mark("inputs");
        w.u32(1);
        w.i32(0);

        w.align4();
        w.mark("outputs");
        w.u32(1);
        w.i32(1);

        let tensors = [
            ("tensor0", "shape0", "name0", &self.input_shape, self.input_dtype, "input"),
            ("tensor1", "shape1", "name1", &self.output_shape, self.output_dtype, "embeddings"),
        ];

        for (i, (table_key, shape_key, name_key, shape, dtype, name)) in
            tensors.into_iter().enumerate()
        {
            // Tensor table: shape, type, buffer, name.
            w.align4();
            w.mark(table_key);
            w.i32(-20);
            w.uoffset_to(shape_key);
            w.uoffset_to(name_key);
            w.u32(i as u32 + 1); // buffer index; not read by the inspector
            w.byte(dtype.code() as u8);
            w.bytes(&[0, 0, 0]); // padding to the 20-byte table length
            w.u16(12); // vtable length (4 fields)
            w.u16(20);
            w.u16(4); // shape
            w.u16(16); // type
            w.u16(12); // buffer
            w.u16(8); // name

            w.align4();
            w.mark(shape_key);
            w.u32(shape.len() as u32);
            for &dim in shape {
                w.i32(dim);
            }

            w.align4();
            w.mark(name_key);
            w.string(name);
        }

        w.finish()
    }

    /// Write the model file, creating parent directories as needed.
    pub fn write_to(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_bytes())
    }
}

/// Forward-layout flatbuffer writer. References always point at later
/// positions, so fields that reference not-yet-written objects are patched
/// once the target position is known.
#[derive(Default)]
struct Writer {
    buf: Vec<u8>,
    marks: HashMap<&'static str, usize>,
    patches: Vec<(usize, &'static str)>,
}

impl Writer {
    fn bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    fn byte(&mut self, b: u8) {
        self.buf.push(b);
    }

    fn u16(&mut self, v: u16) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn i32(&mut self, v: i32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn align4(&mut self) {
        while self.buf.len() % 4 != 0 {
            self.buf.push(0);
        }
    }

    /// Flatbuffer string: u32 length prefix, bytes, NUL terminator (not
    /// counted in the length).
    fn string(&mut self, s: &str) {
        self.u32(s.len() as u32);
        self.bytes(s.as_bytes());
        self.byte(0);
    }

    /// Record the current position as the start of a named object.
    fn mark(&mut self, key: &'static str) {
        self.marks.insert(key, self.buf.len());
    }

    /// Emit a uoffset placeholder pointing at a named object.
    fn uoffset_to(&mut self, key: &'static str) {
        self.patches.push((self.buf.len(), key));
        self.u32(0);
    }

    fn finish(mut self) -> Vec<u8> {
        for (pos, key) in &self.patches {
            let target = self.marks[key];
            let uoffset = (target - pos) as u32;
            self.buf[*pos..pos + 4].copy_from_slice(&uoffset.to_le_bytes());
        }
        self.buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_carries_identifier() {
        let bytes = TfliteFixture::new(vec![1, 4], vec![1, 2]).to_bytes();
        assert_eq!(&bytes[4..8], b"TFL3");
    }

    #[test]
    fn test_fixture_offsets_are_forward() {
        // The root uoffset must land inside the buffer.
        let bytes = TfliteFixture::new(vec![1, 4], vec![1, 2]).to_bytes();
        let root = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) as usize;
        assert!(root < bytes.len());
    }

    #[test]
    fn test_fixture_strings_survive_parsing() {
        let bytes = TfliteFixture::new(vec![1, 4], vec![1, 2])
            .description("quantized export")
            .to_bytes();
        let mut interp = crate::tflite::Interpreter::from_bytes(&bytes).unwrap();
        interp.allocate_tensors().unwrap();

        assert_eq!(interp.description(), "quantized export");
        let tensors = interp.tensors().unwrap();
        assert_eq!(tensors[0].name, "input");
        assert_eq!(tensors[1].name, "embeddings");
    }

    #[test]
    fn test_fixture_write_to_creates_parents() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("nested/models/fixture.tflite");
        TfliteFixture::new(vec![1, 8, 8, 1], vec![1, 16])
            .write_to(&path)
            .unwrap();
        assert!(path.is_file());
    }
}
