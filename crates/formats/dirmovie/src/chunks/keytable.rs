use serde::Serialize;

use crate::cursor::{Cursor, Writer};
use crate::error::Result;
use crate::fourcc::FourCC;

/// One key-table row relating an owner cast id to a chunk slot.
/// `section_id == 0` marks an empty row.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyTableEntry {
    pub section_id: i32,
    pub cast_id: i32,
    pub fourcc: FourCC,
}

impl KeyTableEntry {
    pub fn read(stream: &mut Cursor) -> Result<Self> {
        Ok(Self {
            section_id: stream.read_i32()?,
            cast_id: stream.read_i32()?,
            fourcc: stream.read_fourcc()?,
        })
    }

    pub fn write(&self, w: &mut Writer) {
        w.write_i32(self.section_id);
        w.write_i32(self.cast_id);
        w.write_fourcc(self.fourcc);
    }
}

/// `KEY*` chunk: the cross-reference table between cast ids and the chunk
/// slots that belong to them.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyTableChunk {
    pub entry_size: u16,
    pub entry_size2: u16,
    pub entry_count: u32,
    pub used_count: u32,
    pub entries: Vec<KeyTableEntry>,
}

impl KeyTableChunk {
    pub fn read(mut stream: Cursor) -> Result<Self> {
        let entry_size = stream.read_u16()?;
        let entry_size2 = stream.read_u16()?;
        let entry_count = stream.read_u32()?;
        let used_count = stream.read_u32()?;

        let mut entries = Vec::with_capacity(entry_count as usize);
        for _ in 0..entry_count {
            entries.push(KeyTableEntry::read(&mut stream)?);
        }

        Ok(Self {
            entry_size,
            entry_size2,
            entry_count,
            used_count,
            entries,
        })
    }

    pub fn size(&self) -> usize {
        12 + self.entries.len() * 12
    }

    pub fn write(&self, w: &mut Writer) {
        w.write_u16(self.entry_size);
        w.write_u16(self.entry_size2);
        w.write_u32(self.entry_count);
        w.write_u32(self.used_count);
        for entry in &self.entries {
            entry.write(w);
        }
    }
}
