use serde::Serialize;

use crate::cursor::{Cursor, Endian, Writer};
use crate::error::Result;

/// `Lnam` chunk: the ordered identifier table scripts resolve their
/// name-ids against. Always big-endian.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptNamesChunk {
    pub unknown0: i32,
    pub unknown1: i32,
    pub len1: u32,
    pub len2: u32,
    pub names_offset: u16,
    pub names_count: u16,
    pub names: Vec<String>,
    #[serde(skip)]
    gap: Vec<u8>,
}

impl ScriptNamesChunk {
    /// A table with no names; every lookup resolves to a sentinel. Stands
    /// in when a context's `Lnam` slot is missing or empty.
    pub fn empty() -> Self {
        Self {
            unknown0: 0,
            unknown1: 0,
            len1: 0,
            len2: 0,
            names_offset: 20,
            names_count: 0,
            names: Vec::new(),
            gap: Vec::new(),
        }
    }

    pub fn read(stream: Cursor) -> Result<Self> {
        let mut stream = stream.with_endian(Endian::Big);

        let unknown0 = stream.read_i32()?;
        let unknown1 = stream.read_i32()?;
        let len1 = stream.read_u32()?;
        let len2 = stream.read_u32()?;
        let names_offset = stream.read_u16()?;
        let names_count = stream.read_u16()?;

        // unparsed bytes between the header and the name table, kept so the
        // chunk writes back byte-exact
        let gap = stream.copy_bytes((names_offset as usize).saturating_sub(stream.pos()))?;

        stream.seek(names_offset as usize);
        let mut names = Vec::with_capacity(names_count as usize);
        for _ in 0..names_count {
            names.push(stream.read_pascal_string()?);
        }

        Ok(Self {
            unknown0,
            unknown1,
            len1,
            len2,
            names_offset,
            names_count,
            names,
            gap,
        })
    }

    /// Resolve a script name-id. Out-of-range ids (including negatives)
    /// yield a sentinel rather than an error; scripts reference names the
    /// table no longer carries in the wild.
    pub fn get_name(&self, id: i32) -> String {
        if id >= 0 {
            if let Some(name) = self.names.get(id as usize) {
                return name.clone();
            }
        }
        format!("UNKNOWN_NAME_{id}")
    }

    pub fn size(&self) -> usize {
        20 + self.gap.len()
            + self
                .names
                .iter()
                .map(|n| 1 + n.chars().count())
                .sum::<usize>()
    }

    pub fn write(&self, w: &mut Writer) {
        w.set_endian(Endian::Big);
        w.write_i32(self.unknown0);
        w.write_i32(self.unknown1);
        w.write_u32(self.len1);
        w.write_u32(self.len2);
        w.write_u16(self.names_offset);
        w.write_u16(self.names.len() as u16);
        w.write_bytes(&self.gap);
        for name in &self.names {
            w.write_pascal_string(name);
        }
    }
}
