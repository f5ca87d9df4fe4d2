use serde::Serialize;

use crate::chunks::list::ListData;
use crate::cursor::{Cursor, Endian, Writer};
use crate::error::Result;

/// One cast named by the movie-level cast list.
///
/// Items past the name exist only when `itemsPerCast` says so; a writer
/// must not invent later items when earlier ones are absent. This codec
/// re-emits the raw items, so it cannot.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CastListEntry {
    pub name: String,
    pub file_path: String,
    pub preload_settings: u16,
    pub min_member: u16,
    pub max_member: u16,
    pub id: i32,
}

/// `MCsL` chunk: names, file paths and member-id ranges of the casts
/// present in the movie. Always big-endian.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CastListChunk {
    pub data_offset: u32,
    pub unk0: u16,
    pub cast_count: u16,
    pub items_per_cast: u16,
    pub unk1: u16,
    pub entries: Vec<CastListEntry>,
    #[serde(skip)]
    pub list: ListData,
}

impl CastListChunk {
    pub fn read(stream: Cursor) -> Result<Self> {
        let mut stream = stream.with_endian(Endian::Big);

        let data_offset = stream.read_u32()?;
        let unk0 = stream.read_u16()?;
        let cast_count = stream.read_u16()?;
        let items_per_cast = stream.read_u16()?;
        let unk1 = stream.read_u16()?;

        let list = ListData::read(&mut stream, data_offset)?;

        let mut entries = Vec::with_capacity(cast_count as usize);
        for i in 0..cast_count as usize {
            let base = i * items_per_cast as usize;
            let mut entry = CastListEntry::default();
            if items_per_cast >= 1 {
                entry.name = list.pascal_string_item(base + 1);
            }
            if items_per_cast >= 2 {
                entry.file_path = list.pascal_string_item(base + 2);
            }
            if items_per_cast >= 3 {
                entry.preload_settings = list.u16_item(base + 3);
            }
            if items_per_cast >= 4 {
                if let Some(mut item) = list.item(base + 4) {
                    entry.min_member = item.read_u16()?;
                    entry.max_member = item.read_u16()?;
                    entry.id = item.read_i32()?;
                }
            }
            entries.push(entry);
        }

        Ok(Self {
            data_offset,
            unk0,
            cast_count,
            items_per_cast,
            unk1,
            entries,
            list,
        })
    }

    fn header_size() -> usize {
        12
    }

    pub fn size(&self) -> usize {
        Self::header_size() + self.list.size(|i| self.list.raw_item_size(i))
    }

    pub fn write(&self, w: &mut Writer) {
        w.set_endian(Endian::Big);
        w.write_u32(Self::header_size() as u32);
        w.write_u16(self.unk0);
        w.write_u16(self.cast_count);
        w.write_u16(self.items_per_cast);
        w.write_u16(self.unk1);
        self.list.write(
            w,
            |i| self.list.raw_item_size(i),
            |w, i| self.list.write_raw_item(w, i),
        );
    }
}
