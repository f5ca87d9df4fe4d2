use serde::Serialize;

use crate::cursor::{Cursor, Endian, Writer};
use crate::error::Result;

/// Shared framing for "offset-table list" chunks.
///
/// Payload layout: a `dataOffset` u32 (read by the variant's own header
/// code), optional variant header bytes, then at `dataOffset` a u16 count
/// followed by that many u32 offsets, a u32 `itemsLen`, and the item
/// payloads. Item `i` occupies `[offsetTable[i], offsetTable[i+1])` within
/// the items region; the last item ends at `itemsLen`.
///
/// Out-of-range accessor indices return empty/zero rather than erroring:
/// the format relies on optional trailing items, and an absent item is
/// normal, not malformed.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListData {
    pub offset_table: Vec<u32>,
    pub items_len: u32,
    #[serde(skip)]
    pub item_endian: Endian,
    #[serde(skip)]
    pub items: Vec<Vec<u8>>,
}

impl ListData {
    /// Read the offset table and items. `data_offset` is the absolute
    /// position of the offset table within the chunk payload, as read from
    /// the variant header.
    pub fn read(stream: &mut Cursor, data_offset: u32) -> Result<Self> {
        stream.seek(data_offset as usize);
        let count = stream.read_u16()? as usize;
        let mut offset_table = Vec::with_capacity(count);
        for _ in 0..count {
            offset_table.push(stream.read_u32()?);
        }
        let items_len = stream.read_u32()?;

        let item_endian = stream.endian();
        let list_offset = stream.pos();
        let mut items = Vec::with_capacity(count);
        for i in 0..count {
            let start = offset_table[i];
            let end = if i + 1 < count {
                offset_table[i + 1]
            } else {
                items_len
            };
            stream.seek(list_offset + start as usize);
            items.push(stream.copy_bytes(end.saturating_sub(start) as usize)?);
        }

        Ok(Self {
            offset_table,
            items_len,
            item_endian,
            items,
        })
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Cursor over item `index`'s raw bytes, or `None` when out of range.
    pub fn item(&self, index: usize) -> Option<Cursor<'_>> {
        self.items
            .get(index)
            .map(|bytes| Cursor::new(bytes, self.item_endian))
    }

    /// Item `index` as a full-length string; empty when absent.
    pub fn string_item(&self, index: usize) -> String {
        match self.item(index) {
            Some(mut c) => c.read_string(c.len()).unwrap_or_default(),
            None => String::new(),
        }
    }

    /// Item `index` as a Pascal string; empty when absent or zero-length.
    pub fn pascal_string_item(&self, index: usize) -> String {
        match self.item(index) {
            Some(mut c) if !c.is_empty() => c.read_pascal_string().unwrap_or_default(),
            _ => String::new(),
        }
    }

    /// Item `index` as a u16; zero when absent or too short.
    pub fn u16_item(&self, index: usize) -> u16 {
        self.item(index)
            .and_then(|mut c| c.read_u16().ok())
            .unwrap_or(0)
    }

    /// Item `index` as a u32; zero when absent or too short.
    pub fn u32_item(&self, index: usize) -> u32 {
        self.item(index)
            .and_then(|mut c| c.read_u32().ok())
            .unwrap_or(0)
    }

    /// Raw size of item `index`; the default item codec.
    pub fn raw_item_size(&self, index: usize) -> usize {
        self.items.get(index).map_or(0, Vec::len)
    }

    /// Re-emit item `index` verbatim; the default item codec.
    pub fn write_raw_item(&self, w: &mut Writer, index: usize) {
        if let Some(bytes) = self.items.get(index) {
            w.write_bytes(bytes);
        }
    }

    /// Recompute the offset table from per-item sizes. Returns the table
    /// and the total items length, packed contiguously from zero.
    pub fn layout(&self, item_size: impl Fn(usize) -> usize) -> (Vec<u32>, u32) {
        let mut table = Vec::with_capacity(self.items.len());
        let mut offset = 0u32;
        for i in 0..self.items.len() {
            table.push(offset);
            offset += item_size(i) as u32;
        }
        (table, offset)
    }

    /// Byte size of the offset table and items region, under the given item
    /// codec. The variant header is the caller's to count.
    pub fn size(&self, item_size: impl Fn(usize) -> usize) -> usize {
        let (_, items_len) = self.layout(&item_size);
        2 + 4 * self.items.len() + 4 + items_len as usize
    }

    /// Write the offset table and items. `item_size` and `write_item` form
    /// the item codec; variants pass the raw defaults for indices they do
    /// not interpret.
    pub fn write(
        &self,
        w: &mut Writer,
        item_size: impl Fn(usize) -> usize,
        write_item: impl Fn(&mut Writer, usize),
    ) {
        let (table, items_len) = self.layout(&item_size);
        w.write_u16(self.items.len() as u16);
        for offset in table {
            w.write_u32(offset);
        }
        w.write_u32(items_len);
        for i in 0..self.items.len() {
            write_item(w, i);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(items: &[&[u8]]) -> Vec<u8> {
        let mut w = Writer::new(Endian::Big);
        w.write_u32(4); // dataOffset: table immediately follows
        w.write_u16(items.len() as u16);
        let mut offset = 0u32;
        for item in items {
            w.write_u32(offset);
            offset += item.len() as u32;
        }
        w.write_u32(offset);
        for item in items {
            w.write_bytes(item);
        }
        w.into_bytes()
    }

    #[test]
    fn empty_list_parses() {
        let bytes = build(&[]);
        let mut c = Cursor::new(&bytes, Endian::Big);
        let data_offset = c.read_u32().unwrap();
        let list = ListData::read(&mut c, data_offset).unwrap();
        assert!(list.is_empty());
        assert_eq!(list.string_item(0), "");
        assert_eq!(list.u16_item(3), 0);
        assert_eq!(list.u32_item(7), 0);
    }

    #[test]
    fn items_are_sliced_by_offsets() {
        let bytes = build(&[b"abc", b"", b"\x02hi"]);
        let mut c = Cursor::new(&bytes, Endian::Big);
        let data_offset = c.read_u32().unwrap();
        let list = ListData::read(&mut c, data_offset).unwrap();
        assert_eq!(list.len(), 3);
        assert_eq!(list.string_item(0), "abc");
        assert_eq!(list.string_item(1), "");
        assert_eq!(list.pascal_string_item(2), "hi");
        // out of range is silently absent
        assert_eq!(list.string_item(3), "");
    }

    #[test]
    fn raw_write_round_trips() {
        let bytes = build(&[b"abc", b"", b"\x02hi"]);
        let mut c = Cursor::new(&bytes, Endian::Big);
        let data_offset = c.read_u32().unwrap();
        let list = ListData::read(&mut c, data_offset).unwrap();

        let mut w = Writer::new(Endian::Big);
        w.write_u32(4);
        list.write(
            &mut w,
            |i| list.raw_item_size(i),
            |w, i| list.write_raw_item(w, i),
        );
        assert_eq!(w.into_bytes(), bytes);
    }
}
