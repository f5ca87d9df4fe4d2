use std::collections::BTreeMap;

use serde::Serialize;

use crate::cursor::{Cursor, Endian, Writer};
use crate::error::Result;

/// `CAS*` chunk: a flat array of section ids, one per member slot of a
/// cast. Position `i` maps to member index `i + minMember` of the owning
/// cast-list entry; zero means the slot is empty. Always big-endian.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CastChunk {
    pub member_ids: Vec<i32>,
    /// Name from the owning cast-list entry; set when populated.
    pub name: String,
    /// Member index → `CASt` slot id, filled in by the directory's link
    /// step.
    pub members: BTreeMap<u16, i32>,
    /// Slot of this cast's script context, if the key table names one.
    #[serde(skip)]
    pub lctx_slot: Option<i32>,
}

impl CastChunk {
    pub fn read(stream: Cursor) -> Result<Self> {
        let mut stream = stream.with_endian(Endian::Big);
        let mut member_ids = Vec::new();
        while !stream.eof() {
            member_ids.push(stream.read_i32()?);
        }
        Ok(Self {
            member_ids,
            name: String::new(),
            members: BTreeMap::new(),
            lctx_slot: None,
        })
    }

    pub fn size(&self) -> usize {
        self.member_ids.len() * 4
    }

    pub fn write(&self, w: &mut Writer) {
        w.set_endian(Endian::Big);
        for &id in &self.member_ids {
            w.write_i32(id);
        }
    }
}
