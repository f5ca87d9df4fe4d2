use std::collections::BTreeMap;

use serde::Serialize;

use crate::cursor::{Cursor, Endian, Writer};
use crate::error::Result;

/// One record of a script context's section map.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptContextMapEntry {
    pub unknown0: i32,
    pub section_id: i32,
    pub unknown1: u16,
    pub unknown2: u16,
}

impl ScriptContextMapEntry {
    pub fn read(stream: &mut Cursor) -> Result<Self> {
        Ok(Self {
            unknown0: stream.read_i32()?,
            section_id: stream.read_i32()?,
            unknown1: stream.read_u16()?,
            unknown2: stream.read_u16()?,
        })
    }

    pub fn write(&self, w: &mut Writer) {
        w.write_i32(self.unknown0);
        w.write_i32(self.section_id);
        w.write_u16(self.unknown1);
        w.write_u16(self.unknown2);
    }
}

/// `Lctx`/`LctX` chunk: per-cast binding of scripts to a shared name
/// table. Always big-endian.
///
/// Parsing covers the header and section map only; resolving the name
/// table and the scripts the map points at is the directory's link step,
/// which fills `lnam_slot` and `scripts`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptContextChunk {
    pub unknown0: i32,
    pub unknown1: i32,
    pub entry_count: u32,
    pub entry_count2: u32,
    pub entries_offset: u16,
    pub unknown2: i16,
    pub unknown3: i32,
    pub unknown4: i32,
    pub unknown5: i32,
    pub lnam_section_id: i32,
    pub valid_count: u16,
    pub flags: u16,
    pub free_pointer: i16,
    pub section_map: Vec<ScriptContextMapEntry>,
    /// Whether the tag was `LctX`; capital-X contexts give their scripts'
    /// handler records an extra stack-height field.
    #[serde(skip)]
    pub capital_x: bool,
    /// Section-map key (1-based) → `Lscr` slot id, filled at link time.
    #[serde(skip)]
    pub scripts: BTreeMap<u32, i32>,
    /// Slot of the `Lnam` chunk, filled at link time.
    #[serde(skip)]
    pub lnam_slot: Option<i32>,
    #[serde(skip)]
    gap: Vec<u8>,
}

impl ScriptContextChunk {
    pub fn read(stream: Cursor, capital_x: bool) -> Result<Self> {
        let mut stream = stream.with_endian(Endian::Big);

        let unknown0 = stream.read_i32()?;
        let unknown1 = stream.read_i32()?;
        let entry_count = stream.read_u32()?;
        let entry_count2 = stream.read_u32()?;
        let entries_offset = stream.read_u16()?;
        let unknown2 = stream.read_i16()?;
        let unknown3 = stream.read_i32()?;
        let unknown4 = stream.read_i32()?;
        let unknown5 = stream.read_i32()?;
        let lnam_section_id = stream.read_i32()?;
        let valid_count = stream.read_u16()?;
        let flags = stream.read_u16()?;
        let free_pointer = stream.read_i16()?;

        // reserved bytes between the header and the section map, kept for
        // byte-exact write-back
        let gap = stream.copy_bytes((entries_offset as usize).saturating_sub(stream.pos()))?;

        stream.seek(entries_offset as usize);
        let mut section_map = Vec::with_capacity(entry_count as usize);
        for _ in 0..entry_count {
            section_map.push(ScriptContextMapEntry::read(&mut stream)?);
        }

        Ok(Self {
            unknown0,
            unknown1,
            entry_count,
            entry_count2,
            entries_offset,
            unknown2,
            unknown3,
            unknown4,
            unknown5,
            lnam_section_id,
            valid_count,
            flags,
            free_pointer,
            section_map,
            capital_x,
            scripts: BTreeMap::new(),
            lnam_slot: None,
            gap,
        })
    }

    pub fn size(&self) -> usize {
        42 + self.gap.len() + self.section_map.len() * 12
    }

    pub fn write(&self, w: &mut Writer) {
        w.set_endian(Endian::Big);
        w.write_i32(self.unknown0);
        w.write_i32(self.unknown1);
        w.write_u32(self.section_map.len() as u32);
        w.write_u32(self.entry_count2);
        w.write_u16(self.entries_offset);
        w.write_i16(self.unknown2);
        w.write_i32(self.unknown3);
        w.write_i32(self.unknown4);
        w.write_i32(self.unknown5);
        w.write_i32(self.lnam_section_id);
        w.write_u16(self.valid_count);
        w.write_u16(self.flags);
        w.write_i16(self.free_pointer);
        w.write_bytes(&self.gap);
        for entry in &self.section_map {
            entry.write(w);
        }
    }
}
