use serde::Serialize;

use crate::cursor::{Cursor, Writer};
use crate::error::Result;
use crate::fourcc::FourCC;

/// `imap` chunk: locates the memory map. Always exactly 24 bytes.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InitialMapChunk {
    pub one: u32,
    pub mmap_offset: u32,
    pub version: u32,
    pub unused1: u32,
    pub unused2: u32,
    pub unused3: u32,
}

impl InitialMapChunk {
    pub fn read(mut stream: Cursor) -> Result<Self> {
        Ok(Self {
            one: stream.read_u32()?,
            mmap_offset: stream.read_u32()?,
            version: stream.read_u32()?,
            unused1: stream.read_u32()?,
            unused2: stream.read_u32()?,
            unused3: stream.read_u32()?,
        })
    }

    pub fn size(&self) -> usize {
        24
    }

    pub fn write(&self, w: &mut Writer) {
        w.write_u32(self.one);
        w.write_u32(self.mmap_offset);
        w.write_u32(self.version);
        w.write_u32(self.unused1);
        w.write_u32(self.unused2);
        w.write_u32(self.unused3);
    }
}

/// One slot record in the memory map. The slot's id is its position in the
/// array; `next` chains junk/free slots together.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryMapEntry {
    pub fourcc: FourCC,
    pub len: u32,
    pub offset: u32,
    pub flags: u16,
    pub unknown0: u16,
    pub next: i32,
}

impl MemoryMapEntry {
    pub fn read(stream: &mut Cursor) -> Result<Self> {
        Ok(Self {
            fourcc: stream.read_fourcc()?,
            len: stream.read_u32()?,
            offset: stream.read_u32()?,
            flags: stream.read_u16()?,
            unknown0: stream.read_u16()?,
            next: stream.read_i32()?,
        })
    }

    pub fn write(&self, w: &mut Writer) {
        w.write_fourcc(self.fourcc);
        w.write_u32(self.len);
        w.write_u32(self.offset);
        w.write_u16(self.flags);
        w.write_u16(self.unknown0);
        w.write_i32(self.next);
    }
}

/// `mmap` chunk: the slot table enumerating every chunk in the container by
/// tag, offset and length.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryMapChunk {
    pub header_length: u16,
    pub entry_length: u16,
    pub chunk_count_max: i32,
    pub chunk_count_used: i32,
    pub junk_head: i32,
    pub junk_head2: i32,
    pub free_head: i32,
    pub map_array: Vec<MemoryMapEntry>,
}

impl MemoryMapChunk {
    pub fn read(mut stream: Cursor) -> Result<Self> {
        let header_length = stream.read_u16()?;
        let entry_length = stream.read_u16()?;
        let chunk_count_max = stream.read_i32()?;
        let chunk_count_used = stream.read_i32()?;
        let junk_head = stream.read_i32()?;
        let junk_head2 = stream.read_i32()?;
        let free_head = stream.read_i32()?;

        let mut map_array = Vec::with_capacity(chunk_count_used.max(0) as usize);
        for _ in 0..chunk_count_used.max(0) {
            map_array.push(MemoryMapEntry::read(&mut stream)?);
        }

        Ok(Self {
            header_length,
            entry_length,
            chunk_count_max,
            chunk_count_used,
            junk_head,
            junk_head2,
            free_head,
            map_array,
        })
    }

    pub fn size(&self) -> usize {
        self.header_length as usize + self.map_array.len() * self.entry_length as usize
    }

    pub fn write(&self, w: &mut Writer) {
        w.write_u16(self.header_length);
        w.write_u16(self.entry_length);
        w.write_i32(self.chunk_count_max);
        w.write_i32(self.chunk_count_used);
        w.write_i32(self.junk_head);
        w.write_i32(self.junk_head2);
        w.write_i32(self.free_head);
        for entry in &self.map_array {
            entry.write(w);
        }
    }
}
