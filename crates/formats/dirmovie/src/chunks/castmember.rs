use serde::{Serialize, Serializer};

use crate::chunks::castinfo::CastInfoChunk;
use crate::cursor::{Cursor, Endian, Writer};
use crate::error::Result;
use crate::version::MovieVersion;

/// Kind of a cast member. Unrecognized values are preserved for re-emission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberType {
    Null,
    Bitmap,
    FilmLoop,
    Text,
    Palette,
    Picture,
    Sound,
    Button,
    Shape,
    Movie,
    DigitalVideo,
    Script,
    RichText,
    Other(u32),
}

impl MemberType {
    pub fn from_raw(raw: u32) -> Self {
        match raw {
            0 => Self::Null,
            1 => Self::Bitmap,
            2 => Self::FilmLoop,
            3 => Self::Text,
            4 => Self::Palette,
            5 => Self::Picture,
            6 => Self::Sound,
            7 => Self::Button,
            8 => Self::Shape,
            9 => Self::Movie,
            10 => Self::DigitalVideo,
            11 => Self::Script,
            12 => Self::RichText,
            other => Self::Other(other),
        }
    }

    pub fn to_raw(self) -> u32 {
        match self {
            Self::Null => 0,
            Self::Bitmap => 1,
            Self::FilmLoop => 2,
            Self::Text => 3,
            Self::Palette => 4,
            Self::Picture => 5,
            Self::Sound => 6,
            Self::Button => 7,
            Self::Shape => 8,
            Self::Movie => 9,
            Self::DigitalVideo => 10,
            Self::Script => 11,
            Self::RichText => 12,
            Self::Other(other) => other,
        }
    }
}

impl Serialize for MemberType {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_u32(self.to_raw())
    }
}

/// Lingo script flavor carried by a script member's specific data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ScriptType {
    Score,
    Movie,
    Parent,
    Other(u16),
}

impl ScriptType {
    pub fn from_raw(raw: u16) -> Self {
        match raw {
            1 => Self::Score,
            3 => Self::Movie,
            7 => Self::Parent,
            other => Self::Other(other),
        }
    }
}

/// Decoded view of a member's type-specific data. Only script members are
/// interpreted; everything else stays opaque bytes on the parent chunk
/// (bitmap/text/sound decoding belongs to other consumers).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Member {
    Script { script_type: ScriptType },
    Generic,
}

/// `CASt` chunk: one cast member. Always big-endian.
///
/// Two physical layouts share this logical record. From version 500 the
/// type field leads as a u32; before that the type byte (and an optional
/// flags byte) sits at the front of the specific-data region, and
/// `has_flags1` records whether the flags byte was present so the write
/// side stays symmetrical.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CastMemberChunk {
    pub member_type: MemberType,
    pub info_len: u32,
    pub specific_data_len: u32,
    pub has_flags1: bool,
    pub flags1: u8,
    pub info: CastInfoChunk,
    pub member: Member,
    #[serde(skip)]
    pub specific_data: Vec<u8>,
    /// Member index within the owning cast; assigned when the cast is
    /// populated.
    #[serde(skip)]
    pub id: u16,
    /// Slot of the `Lscr` chunk this member owns, bound at link time.
    #[serde(skip)]
    pub script_slot: Option<i32>,
}

impl CastMemberChunk {
    pub fn read(stream: Cursor, version: MovieVersion) -> Result<Self> {
        let mut stream = stream.with_endian(Endian::Big);

        let member_type;
        let info_len;
        let specific_data_len;
        let mut has_flags1 = false;
        let mut flags1 = 0;
        let info;
        let specific_data;

        if version.has_modern_member_layout() {
            member_type = MemberType::from_raw(stream.read_u32()?);
            info_len = stream.read_u32()?;
            specific_data_len = stream.read_u32()?;

            let info_stream = stream.sub_stream(info_len as usize)?;
            info = CastInfoChunk::read(info_stream)?;

            specific_data = stream.copy_bytes(specific_data_len as usize)?;
        } else {
            specific_data_len = stream.read_u16()? as u32;
            info_len = stream.read_u32()?;

            // the type byte (and optional flags byte) live inside the
            // specific-data region on the wire
            let mut specific_left = specific_data_len;
            member_type = MemberType::from_raw(stream.read_u8()? as u32);
            specific_left = specific_left.saturating_sub(1);
            if specific_left > 0 {
                has_flags1 = true;
                flags1 = stream.read_u8()?;
                specific_left -= 1;
            }
            specific_data = stream.copy_bytes(specific_left as usize)?;

            let info_stream = stream.sub_stream(info_len as usize)?;
            info = CastInfoChunk::read(info_stream)?;
        }

        let member = match member_type {
            MemberType::Script => {
                let mut specific = Cursor::new(&specific_data, Endian::Big);
                Member::Script {
                    script_type: ScriptType::from_raw(specific.read_u16()?),
                }
            }
            _ => Member::Generic,
        };

        Ok(Self {
            member_type,
            info_len,
            specific_data_len,
            has_flags1,
            flags1,
            info,
            member,
            specific_data,
            id: 0,
            script_slot: None,
        })
    }

    /// On-wire length of the specific-data region, which in the old layout
    /// includes the leading type byte and optional flags byte.
    fn wire_specific_len(&self, version: MovieVersion) -> usize {
        if version.has_modern_member_layout() {
            self.specific_data.len()
        } else {
            self.specific_data.len() + 1 + usize::from(self.has_flags1)
        }
    }

    pub fn size(&self, version: MovieVersion) -> usize {
        let info_len = self.info.size();
        if version.has_modern_member_layout() {
            12 + info_len + self.wire_specific_len(version)
        } else {
            6 + self.wire_specific_len(version) + info_len
        }
    }

    pub fn write(&self, w: &mut Writer, version: MovieVersion) {
        w.set_endian(Endian::Big);

        if version.has_modern_member_layout() {
            w.write_u32(self.member_type.to_raw());
            w.write_u32(self.info.size() as u32);
            w.write_u32(self.wire_specific_len(version) as u32);
            self.info.write(w);
            w.write_bytes(&self.specific_data);
        } else {
            w.write_u16(self.wire_specific_len(version) as u16);
            w.write_u32(self.info.size() as u32);
            w.write_u8(self.member_type.to_raw() as u8);
            if self.has_flags1 {
                w.write_u8(self.flags1);
            }
            w.write_bytes(&self.specific_data);
            self.info.write(w);
        }
    }
}
