use serde::Serialize;

use crate::chunks::list::ListData;
use crate::cursor::{Cursor, Writer};
use crate::error::Result;

/// Cast-info sub-chunk embedded in every `CASt` record: a list chunk whose
/// items hold the member's metadata. Item 0 is the script source text, item
/// 1 the member name. Items 2..21 are recognized (comment at 4, xtra GUID
/// at 9, file format id at 16, created/modified timestamps at 17/18, image
/// compression at 21) but carried as opaque bytes; only the slots this
/// pipeline edits are decoded.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CastInfoChunk {
    pub data_offset: u32,
    pub unk1: u32,
    pub unk2: u32,
    pub flags: u32,
    pub script_id: u32,
    pub script_src_text: String,
    pub name: String,
    #[serde(skip)]
    pub list: ListData,
}

impl CastInfoChunk {
    pub fn read(mut stream: Cursor) -> Result<Self> {
        let data_offset = stream.read_u32()?;
        let unk1 = stream.read_u32()?;
        let unk2 = stream.read_u32()?;
        let flags = stream.read_u32()?;
        let script_id = stream.read_u32()?;

        let list = ListData::read(&mut stream, data_offset)?;
        let script_src_text = list.string_item(0);
        let name = list.pascal_string_item(1);

        Ok(Self {
            data_offset,
            unk1,
            unk2,
            flags,
            script_id,
            script_src_text,
            name,
            list,
        })
    }

    fn header_size() -> usize {
        20
    }

    fn item_size(&self, index: usize) -> usize {
        match index {
            0 => self.script_src_text.chars().count(),
            1 => {
                let n = self.name.chars().count();
                if n > 0 {
                    1 + n
                } else {
                    0
                }
            }
            _ => self.list.raw_item_size(index),
        }
    }

    fn write_item(&self, w: &mut Writer, index: usize) {
        match index {
            0 => w.write_string(&self.script_src_text),
            1 => {
                if !self.name.is_empty() {
                    w.write_pascal_string(&self.name);
                }
            }
            _ => self.list.write_raw_item(w, index),
        }
    }

    pub fn size(&self) -> usize {
        Self::header_size() + self.list.size(|i| self.item_size(i))
    }

    pub fn write(&self, w: &mut Writer) {
        w.write_u32(Self::header_size() as u32);
        w.write_u32(self.unk1);
        w.write_u32(self.unk2);
        w.write_u32(self.flags);
        w.write_u32(self.script_id);
        self.list
            .write(w, |i| self.item_size(i), |w, i| self.write_item(w, i));
    }
}
