//! Minimal flatbuffer reader
//!
//! Just the pieces of the flatbuffer wire format that TFLite model metadata
//! needs: the root table, vtable field lookup, vectors of scalars and table
//! offsets, and strings. Every access is bounds-checked so a truncated or
//! corrupt file surfaces as [`TfliteError::Malformed`] instead of a panic.

use super::{Result, TfliteError};

fn read_u16(buf: &[u8], pos: usize) -> Result<u16> {
    let bytes = buf
        .get(pos..pos + 2)
        .ok_or(TfliteError::Malformed("read past end of buffer"))?;
    Ok(u16::from_le_bytes([bytes[0], bytes[1]]))
}

fn read_u32(buf: &[u8], pos: usize) -> Result<u32> {
    let bytes = buf
        .get(pos..pos + 4)
        .ok_or(TfliteError::Malformed("read past end of buffer"))?;
    Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

fn read_i32(buf: &[u8], pos: usize) -> Result<i32> {
    Ok(read_u32(buf, pos)? as i32)
}

/// Follow a uoffset stored at `pos` to its target position.
fn indirect(buf: &[u8], pos: usize) -> Result<usize> {
    let uoffset = read_u32(buf, pos)? as usize;
    let target = pos + uoffset;
    if target >= buf.len() {
        return Err(TfliteError::Malformed("offset points past end of buffer"));
    }
    Ok(target)
}

/// A flatbuffer table positioned inside a raw buffer.
pub(crate) struct Table<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Table<'a> {
    /// Resolve the root table of a buffer (uoffset at position 0).
    pub(crate) fn root(buf: &'a [u8]) -> Result<Self> {
        let pos = indirect(buf, 0)?;
        Ok(Table { buf, pos })
    }

    /// Absolute position of a field's data, or `None` if the field is absent.
    fn field_pos(&self, id: u16) -> Result<Option<usize>> {
        let soffset = read_i32(self.buf, self.pos)?;
        let vtable = self.pos as i64 - i64::from(soffset);
        if vtable < 0 || vtable as usize >= self.buf.len() {
            return Err(TfliteError::Malformed("vtable position out of range"));
        }
        let vtable = vtable as usize;
        let vtable_len = read_u16(self.buf, vtable)? as usize;
        let slot = 4 + 2 * id as usize;
        if slot + 2 > vtable_len {
            return Ok(None);
        }
        let voffset = read_u16(self.buf, vtable + slot)?;
        if voffset == 0 {
            return Ok(None);
        }
        Ok(Some(self.pos + voffset as usize))
    }

    pub(crate) fn get_u32(&self, id: u16, default: u32) -> Result<u32> {
        match self.field_pos(id)? {
            Some(pos) => read_u32(self.buf, pos),
            None => Ok(default),
        }
    }

    pub(crate) fn get_i8(&self, id: u16, default: i8) -> Result<i8> {
        match self.field_pos(id)? {
            Some(pos) => {
                let byte = self
                    .buf
                    .get(pos)
                    .ok_or(TfliteError::Malformed("read past end of buffer"))?;
                Ok(*byte as i8)
            }
            None => Ok(default),
        }
    }

    pub(crate) fn get_vector(&self, id: u16) -> Result<Option<Vector<'a>>> {
        match self.field_pos(id)? {
            Some(pos) => {
                let vec_pos = indirect(self.buf, pos)?;
                let len = read_u32(self.buf, vec_pos)? as usize;
                Ok(Some(Vector {
                    buf: self.buf,
                    pos: vec_pos + 4,
                    len,
                }))
            }
            None => Ok(None),
        }
    }

    pub(crate) fn get_string(&self, id: u16) -> Result<Option<String>> {
        match self.field_pos(id)? {
            Some(pos) => {
                let str_pos = indirect(self.buf, pos)?;
                let len = read_u32(self.buf, str_pos)? as usize;
                let bytes = self
                    .buf
                    .get(str_pos + 4..str_pos + 4 + len)
                    .ok_or(TfliteError::Malformed("string extends past end of buffer"))?;
                Ok(Some(String::from_utf8_lossy(bytes).into_owned()))
            }
            None => Ok(None),
        }
    }
}

/// A flatbuffer vector; `pos` addresses the first element.
pub(crate) struct Vector<'a> {
    buf: &'a [u8],
    pos: usize,
    len: usize,
}

impl<'a> Vector<'a> {
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    pub(crate) fn i32_at(&self, index: usize) -> Result<i32> {
        if index >= self.len {
            return Err(TfliteError::Malformed("vector index out of range"));
        }
        read_i32(self.buf, self.pos + 4 * index)
    }

    pub(crate) fn table_at(&self, index: usize) -> Result<Table<'a>> {
        if index >= self.len {
            return Err(TfliteError::Malformed("vector index out of range"));
        }
        let elem_pos = self.pos + 4 * index;
        let pos = indirect(self.buf, elem_pos)?;
        Ok(Table { buf: self.buf, pos })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncated_buffer_is_malformed() {
        let buf = [4u8, 0, 0];
        assert!(matches!(
            Table::root(&buf),
            Err(TfliteError::Malformed(_))
        ));
    }

    #[test]
    fn test_root_offset_past_end_is_malformed() {
        let buf = [200u8, 0, 0, 0, 0, 0, 0, 0];
        assert!(matches!(
            Table::root(&buf),
            Err(TfliteError::Malformed(_))
        ));
    }
}
