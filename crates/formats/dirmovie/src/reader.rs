use crate::chunks::map::{InitialMapChunk, MemoryMapChunk};
use crate::cursor::{Cursor, Endian};
use crate::error::{Error, Result};
use crate::fourcc::FourCC;

/// Location of one chunk within the container, taken from a memory-map
/// slot. The slot's id is its position in the map array; `offset` points
/// at the chunk's own tag+length header.
#[derive(Debug, Clone, Copy)]
pub struct ChunkSlot {
    pub fourcc: FourCC,
    pub len: u32,
    pub offset: u32,
}

/// The parsed container envelope.
///
/// This is Layer 1: the 12-byte wrapper, the initial map and the memory
/// map. It locates chunks but does not decode any chunk internals.
#[derive(Debug)]
pub struct Container {
    pub endian: Endian,
    pub codec: FourCC,
    pub imap: InitialMapChunk,
    pub mmap: MemoryMapChunk,
}

impl Container {
    /// Parse the wrapper and both maps. `data` must be the entire file.
    ///
    /// The wrapper is tag (4 bytes), size (u32), codec tag (4 bytes); a
    /// byte-reversed `RIFX` spelling means the rest of the container is
    /// little-endian. Compressed (`FGDM`/`FGDC`) containers belong to the
    /// projector extractor and are rejected here.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let mut header = Cursor::new(data, Endian::Big);
        let meta = header.read_fourcc()?;
        let endian = match meta {
            FourCC::RIFX => Endian::Big,
            FourCC::XFIR => Endian::Little,
            found => return Err(Error::InvalidMagic { found }),
        };

        let mut stream = Cursor::new(data, endian);
        stream.seek(4);
        let _wrapper_len = stream.read_u32()?;
        let codec = stream.read_fourcc()?;
        if codec == FourCC::FGDM || codec == FourCC::FGDC {
            // afterburner-compressed movie; decompression belongs to the
            // projector extractor
            return Err(Error::UnsupportedCodec { codec });
        }
        if codec != FourCC::MV93 && codec != FourCC::MC95 {
            return Err(Error::UnsupportedCodec { codec });
        }

        // imap chunk immediately follows the wrapper
        let imap_payload = Self::chunk_payload(&mut stream, 12, FourCC::IMAP)?;
        let imap = InitialMapChunk::read(Cursor::new(imap_payload, endian))?;

        let mmap_payload =
            Self::chunk_payload(&mut stream, imap.mmap_offset as usize, FourCC::MMAP)?;
        let mmap = MemoryMapChunk::read(Cursor::new(mmap_payload, endian))?;

        Ok(Self {
            endian,
            codec,
            imap,
            mmap,
        })
    }

    /// Read a chunk header at `offset`, validate its tag, and return its
    /// payload slice.
    fn chunk_payload<'a>(
        stream: &mut Cursor<'a>,
        offset: usize,
        expected: FourCC,
    ) -> Result<&'a [u8]> {
        stream.seek(offset);
        let found = stream.read_fourcc()?;
        if found != expected {
            return Err(Error::TagMismatch {
                id: -1,
                expected,
                found,
            });
        }
        let len = stream.read_u32()?;
        stream.read_bytes(len as usize)
    }

    /// The slot table: index = slot id.
    pub fn slots(&self) -> Vec<ChunkSlot> {
        self.mmap
            .map_array
            .iter()
            .map(|entry| ChunkSlot {
                fourcc: entry.fourcc,
                len: entry.len,
                offset: entry.offset,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cursor::Writer;

    fn minimal_container(endian: Endian) -> Vec<u8> {
        let mut w = Writer::new(endian);
        // a little-endian write spells RIFX out reversed, i.e. XFIR
        w.write_fourcc(FourCC::RIFX);
        w.write_u32(0); // wrapper size; unchecked by the parser
        w.write_fourcc(FourCC::MV93);
        // imap
        w.write_fourcc(FourCC::IMAP);
        w.write_u32(24);
        w.write_u32(1);
        w.write_u32(0x2C); // mmap offset
        w.write_u32(1223);
        w.write_u32(0);
        w.write_u32(0);
        w.write_u32(0);
        // mmap with a single entry describing itself
        w.write_fourcc(FourCC::MMAP);
        w.write_u32(24 + 20);
        w.write_u16(24);
        w.write_u16(20);
        w.write_i32(1);
        w.write_i32(1);
        w.write_i32(-1);
        w.write_i32(-1);
        w.write_i32(-1);
        w.write_fourcc(FourCC::MMAP);
        w.write_u32(24 + 20);
        w.write_u32(0x2C);
        w.write_u16(0);
        w.write_u16(0);
        w.write_i32(0);
        w.into_bytes()
    }

    #[test]
    fn parses_big_endian_wrapper() {
        let data = minimal_container(Endian::Big);
        let container = Container::parse(&data).unwrap();
        assert_eq!(container.endian, Endian::Big);
        assert_eq!(container.codec, FourCC::MV93);
        assert_eq!(container.imap.mmap_offset, 0x2C);
        assert_eq!(container.mmap.map_array.len(), 1);
        assert_eq!(container.slots()[0].fourcc, FourCC::MMAP);
    }

    #[test]
    fn reversed_spelling_means_little_endian() {
        let data = minimal_container(Endian::Little);
        let container = Container::parse(&data).unwrap();
        assert_eq!(container.endian, Endian::Little);
    }

    #[test]
    fn rejects_unknown_wrapper() {
        let err = Container::parse(b"JUNKxxxxyyyy").unwrap_err();
        assert!(matches!(err, Error::InvalidMagic { .. }));
    }

    #[test]
    fn rejects_afterburner_codec() {
        let mut w = Writer::new(Endian::Big);
        w.write_fourcc(FourCC::RIFX);
        w.write_u32(4);
        w.write_fourcc(FourCC::FGDM);
        let err = Container::parse(w.as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            Error::UnsupportedCodec {
                codec: FourCC::FGDM
            }
        ));
    }
}
