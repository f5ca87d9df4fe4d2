use serde::Serialize;
use tracing::warn;

use crate::cursor::{Cursor, Endian, Writer};
use crate::error::Result;
use crate::fourcc::FourCC;
use crate::version::MovieVersion;

/// `DRCF`/`VWCF` chunk: movie-wide settings plus a checksum over most
/// fields. Always big-endian. Fields named `field*` have no documented
/// meaning; they are preserved verbatim and participate in the checksum.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigChunk {
    pub len: u16,
    pub file_version: u16,
    pub movie_top: i16,
    pub movie_left: i16,
    pub movie_bottom: i16,
    pub movie_right: i16,
    pub min_member: u16,
    pub max_member: u16,
    pub field9: u8,
    pub field10: u8,
    pub field11: i16,
    pub comment_font: i16,
    pub comment_size: i16,
    pub comment_style: u16,
    pub stage_color: i16,
    pub bit_depth: i16,
    pub field17: u8,
    pub field18: u8,
    pub field19: i32,
    pub director_version: i16,
    pub field21: i16,
    pub field22: i32,
    pub field23: i32,
    pub field24: i32,
    pub field25: u8,
    pub field26: u8,
    pub frame_rate: i16,
    pub platform: i16,
    pub protection: i16,
    pub field29: i32,
    pub checksum: u32,
    #[serde(skip)]
    pub remnants: Vec<u8>,
}

impl ConfigChunk {
    pub fn read(stream: Cursor) -> Result<Self> {
        let mut stream = stream.with_endian(Endian::Big);

        let mut config = Self {
            /*  0 */ len: stream.read_u16()?,
            /*  2 */ file_version: stream.read_u16()?,
            /*  4 */ movie_top: stream.read_i16()?,
            /*  6 */ movie_left: stream.read_i16()?,
            /*  8 */ movie_bottom: stream.read_i16()?,
            /* 10 */ movie_right: stream.read_i16()?,
            /* 12 */ min_member: stream.read_u16()?,
            /* 14 */ max_member: stream.read_u16()?,
            /* 16 */ field9: stream.read_u8()?,
            /* 17 */ field10: stream.read_u8()?,
            /* 18 */ field11: stream.read_i16()?,
            /* 20 */ comment_font: stream.read_i16()?,
            /* 22 */ comment_size: stream.read_i16()?,
            /* 24 */ comment_style: stream.read_u16()?,
            /* 26 */ stage_color: stream.read_i16()?,
            /* 28 */ bit_depth: stream.read_i16()?,
            /* 30 */ field17: stream.read_u8()?,
            /* 31 */ field18: stream.read_u8()?,
            /* 32 */ field19: stream.read_i32()?,
            /* 36 */ director_version: stream.read_i16()?,
            /* 38 */ field21: stream.read_i16()?,
            /* 40 */ field22: stream.read_i32()?,
            /* 44 */ field23: stream.read_i32()?,
            /* 48 */ field24: stream.read_i32()?,
            /* 52 */ field25: stream.read_u8()?,
            /* 53 */ field26: stream.read_u8()?,
            /* 54 */ frame_rate: stream.read_i16()?,
            /* 56 */ platform: stream.read_i16()?,
            /* 58 */ protection: stream.read_i16()?,
            /* 60 */ field29: stream.read_i32()?,
            /* 64 */ checksum: stream.read_u32()?,
            remnants: Vec::new(),
        };
        /* 68 */
        let remnant_len = (config.len as usize).saturating_sub(stream.pos());
        config.remnants = stream.copy_bytes(remnant_len)?;

        let computed = config.compute_checksum();
        if config.checksum != computed {
            warn!(
                stored = config.checksum,
                computed, "config checksums don't match"
            );
        }

        Ok(config)
    }

    pub fn size(&self) -> usize {
        self.len as usize
    }

    pub fn write(&self, w: &mut Writer) {
        w.set_endian(Endian::Big);

        let checksum = self.compute_checksum();

        /*  0 */ w.write_u16(self.len);
        /*  2 */ w.write_u16(self.file_version);
        /*  4 */ w.write_i16(self.movie_top);
        /*  6 */ w.write_i16(self.movie_left);
        /*  8 */ w.write_i16(self.movie_bottom);
        /* 10 */ w.write_i16(self.movie_right);
        /* 12 */ w.write_u16(self.min_member);
        /* 14 */ w.write_u16(self.max_member);
        /* 16 */ w.write_u8(self.field9);
        /* 17 */ w.write_u8(self.field10);
        /* 18 */ w.write_i16(self.field11);
        /* 20 */ w.write_i16(self.comment_font);
        /* 22 */ w.write_i16(self.comment_size);
        /* 24 */ w.write_u16(self.comment_style);
        /* 26 */ w.write_i16(self.stage_color);
        /* 28 */ w.write_i16(self.bit_depth);
        /* 30 */ w.write_u8(self.field17);
        /* 31 */ w.write_u8(self.field18);
        /* 32 */ w.write_i32(self.field19);
        /* 36 */ w.write_i16(self.director_version);
        /* 38 */ w.write_i16(self.field21);
        /* 40 */ w.write_i32(self.field22);
        /* 44 */ w.write_i32(self.field23);
        /* 48 */ w.write_i32(self.field24);
        /* 52 */ w.write_u8(self.field25);
        /* 53 */ w.write_u8(self.field26);
        /* 54 */ w.write_i16(self.frame_rate);
        /* 56 */ w.write_i16(self.platform);
        /* 58 */ w.write_i16(self.protection);
        /* 60 */ w.write_i32(self.field29);
        /* 64 */ w.write_u32(checksum);
        /* 68 */ w.write_bytes(&self.remnants);
    }

    /// The marketing version this movie declares, which gates cast-member
    /// layout and parts of the checksum itself.
    pub fn version(&self) -> MovieVersion {
        MovieVersion::from_raw(self.director_version)
    }

    /// Recompute the checksum over the config fields.
    ///
    /// The accumulator is a 32-bit signed register; wrap on overflow and
    /// truncated division are part of the format. A zero divisor (possible
    /// only in corrupt files) contributes zero rather than aborting.
    pub fn compute_checksum(&self) -> u32 {
        let ver = self.version();

        fn div(a: i32, b: i32) -> i32 {
            if b == 0 {
                0
            } else {
                a.wrapping_div(b)
            }
        }

        let mut check: i32 = self.len as i32 + 1;
        check = check.wrapping_mul(self.file_version as i32 + 2);
        check = div(check, self.movie_top as i32 + 3);
        check = check.wrapping_mul(self.movie_left as i32 + 4);
        check = div(check, self.movie_bottom as i32 + 5);
        check = check.wrapping_mul(self.movie_right as i32 + 6);
        check = check.wrapping_sub(self.min_member as i32 + 7);
        check = check.wrapping_mul(self.max_member as i32 + 8);
        check = check.wrapping_sub(self.field9 as i32 + 9);
        check = check.wrapping_sub(self.field10 as i32 + 10);
        check = check.wrapping_add(self.field11 as i32 + 11);
        check = check.wrapping_mul(self.comment_font as i32 + 12);
        check = check.wrapping_add(self.comment_size as i32 + 13);
        if ver.checksum_uses_full_comment_style() {
            check = check.wrapping_mul(self.comment_style as i32 + 14);
        } else {
            check = check.wrapping_mul(((self.comment_style >> 8) & 0xFF) as i32 + 14);
        }
        if ver.checksum_masks_stage_color() {
            check = check.wrapping_add((self.stage_color & 0xFF) as i32 + 15);
        } else {
            check = check.wrapping_add(self.stage_color as i32 + 15);
        }
        check = check.wrapping_add(self.bit_depth as i32 + 16);
        check = check.wrapping_add(self.field17 as i32 + 17);
        check = check.wrapping_mul(self.field18 as i32 + 18);
        check = check.wrapping_add(self.field19.wrapping_add(19));
        check = check.wrapping_mul(self.director_version as i32 + 20);
        check = check.wrapping_add(self.field21 as i32 + 21);
        check = check.wrapping_add(self.field22.wrapping_add(22));
        check = check.wrapping_add(self.field23.wrapping_add(23));
        check = check.wrapping_add(self.field24.wrapping_add(24));
        check = check.wrapping_mul(self.field25 as i32 + 25);
        check = check.wrapping_add(self.frame_rate as i32 + 26);
        check = check.wrapping_mul(self.platform as i32 + 27);
        check = check.wrapping_mul((self.protection as i32).wrapping_mul(0xE06).wrapping_add(0xFF450000u32 as i32));
        check ^= FourCC::RALF.0 as i32;
        check as u32
    }
}
