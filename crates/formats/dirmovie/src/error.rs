use thiserror::Error;

use crate::fourcc::FourCC;

#[derive(Debug, Error)]
pub enum Error {
    #[error("end of stream at offset {offset:#x} (need {need} bytes, have {have})")]
    EndOfStream {
        offset: usize,
        need: usize,
        have: usize,
    },

    #[error("not a RIFX container: starts with {found}")]
    InvalidMagic { found: FourCC },

    #[error("unsupported container codec {codec}")]
    UnsupportedCodec { codec: FourCC },

    #[error("no chunk with tag {fourcc} at slot {id}")]
    ChunkNotFound { fourcc: FourCC, id: i32 },

    #[error("slot {id} holds a {found} chunk, expected {expected}")]
    TagMismatch {
        id: i32,
        expected: FourCC,
        found: FourCC,
    },

    #[error("chunk at slot {id} lies outside the container (offset {offset:#x}, len {len})")]
    SlotOutOfBounds { id: i32, offset: u32, len: u32 },
}

pub type Result<T> = std::result::Result<T, Error>;
