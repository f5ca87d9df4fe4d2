//! Typed codecs for the individual chunk formats, plus the `Chunk` sum
//! type the directory stores.

pub mod cast;
pub mod castinfo;
pub mod castlist;
pub mod castmember;
pub mod config;
pub mod context;
pub mod keytable;
pub mod list;
pub mod map;
pub mod names;
pub mod script;

use serde::Serialize;

pub use cast::CastChunk;
pub use castinfo::CastInfoChunk;
pub use castlist::{CastListChunk, CastListEntry};
pub use castmember::{CastMemberChunk, Member, MemberType, ScriptType};
pub use config::ConfigChunk;
pub use context::{ScriptContextChunk, ScriptContextMapEntry};
pub use keytable::{KeyTableChunk, KeyTableEntry};
pub use list::ListData;
pub use map::{InitialMapChunk, MemoryMapChunk, MemoryMapEntry};
pub use names::ScriptNamesChunk;
pub use script::{Handler, LiteralKind, LiteralStore, LiteralValue, ScriptChunk};

use crate::cursor::{Cursor, Writer};
use crate::error::Result;
use crate::fourcc::FourCC;
use crate::version::MovieVersion;

/// A chunk whose tag no decoder claims, preserved as opaque bytes so the
/// container still re-emits byte-exact.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RawChunk {
    pub fourcc: FourCC,
    #[serde(skip)]
    pub data: Vec<u8>,
}

/// The semantic sum type over every chunk kind the directory understands.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Chunk {
    Cast(CastChunk),
    CastList(CastListChunk),
    CastMember(CastMemberChunk),
    Config(ConfigChunk),
    InitialMap(InitialMapChunk),
    KeyTable(KeyTableChunk),
    MemoryMap(MemoryMapChunk),
    Script(ScriptChunk),
    ScriptContext(ScriptContextChunk),
    ScriptNames(ScriptNamesChunk),
    Raw(RawChunk),
}

impl Chunk {
    /// Decode a chunk payload by tag. The cursor carries the container
    /// endianness; codecs for script-related (and other always-big-endian)
    /// chunks switch order themselves.
    pub fn read(
        fourcc: FourCC,
        mut stream: Cursor,
        version: MovieVersion,
        capital_x: bool,
    ) -> Result<Self> {
        Ok(match fourcc {
            FourCC::CAST => Self::Cast(CastChunk::read(stream)?),
            FourCC::CAST_LIST => Self::CastList(CastListChunk::read(stream)?),
            FourCC::CAST_MEMBER => Self::CastMember(CastMemberChunk::read(stream, version)?),
            FourCC::DRCF | FourCC::VWCF => Self::Config(ConfigChunk::read(stream)?),
            FourCC::IMAP => Self::InitialMap(InitialMapChunk::read(stream)?),
            FourCC::KEY_TABLE => Self::KeyTable(KeyTableChunk::read(stream)?),
            FourCC::MMAP => Self::MemoryMap(MemoryMapChunk::read(stream)?),
            FourCC::LSCR => Self::Script(ScriptChunk::read(stream, version, capital_x)?),
            FourCC::LCTX => Self::ScriptContext(ScriptContextChunk::read(stream, false)?),
            FourCC::LCTX_CAP => Self::ScriptContext(ScriptContextChunk::read(stream, true)?),
            FourCC::LNAM => Self::ScriptNames(ScriptNamesChunk::read(stream)?),
            _ => {
                let data = stream.copy_bytes(stream.len())?;
                Self::Raw(RawChunk { fourcc, data })
            }
        })
    }

    /// Byte size this chunk will occupy when written.
    pub fn size(&self, version: MovieVersion) -> usize {
        match self {
            Self::Cast(c) => c.size(),
            Self::CastList(c) => c.size(),
            Self::CastMember(c) => c.size(version),
            Self::Config(c) => c.size(),
            Self::InitialMap(c) => c.size(),
            Self::KeyTable(c) => c.size(),
            Self::MemoryMap(c) => c.size(),
            Self::Script(c) => c.size(),
            Self::ScriptContext(c) => c.size(),
            Self::ScriptNames(c) => c.size(),
            Self::Raw(c) => c.data.len(),
        }
    }

    /// Re-emit this chunk's payload. The writer starts in the container
    /// endianness; codecs switch where the format demands it.
    pub fn write(&self, w: &mut Writer, version: MovieVersion) {
        match self {
            Self::Cast(c) => c.write(w),
            Self::CastList(c) => c.write(w),
            Self::CastMember(c) => c.write(w, version),
            Self::Config(c) => c.write(w),
            Self::InitialMap(c) => c.write(w),
            Self::KeyTable(c) => c.write(w),
            Self::MemoryMap(c) => c.write(w),
            Self::Script(c) => c.write(w),
            Self::ScriptContext(c) => c.write(w),
            Self::ScriptNames(c) => c.write(w),
            Self::Raw(c) => w.write_bytes(&c.data),
        }
    }

    pub fn as_cast(&self) -> Option<&CastChunk> {
        match self {
            Self::Cast(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_cast_member(&self) -> Option<&CastMemberChunk> {
        match self {
            Self::CastMember(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_config(&self) -> Option<&ConfigChunk> {
        match self {
            Self::Config(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_key_table(&self) -> Option<&KeyTableChunk> {
        match self {
            Self::KeyTable(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_cast_list(&self) -> Option<&CastListChunk> {
        match self {
            Self::CastList(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_script(&self) -> Option<&ScriptChunk> {
        match self {
            Self::Script(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_script_context(&self) -> Option<&ScriptContextChunk> {
        match self {
            Self::ScriptContext(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_script_names(&self) -> Option<&ScriptNamesChunk> {
        match self {
            Self::ScriptNames(c) => Some(c),
            _ => None,
        }
    }
}
