use std::fmt;

use serde::{Serialize, Serializer};

/// A four-character chunk tag, packed from four ASCII bytes in big-endian
/// order. Comparisons are on the packed value; the spelling on disk is
/// byte-swapped in little-endian containers, which the cursor's endianness
/// already undoes.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FourCC(pub u32);

impl FourCC {
    pub const RIFX: Self = Self::new(b"RIFX");
    pub const XFIR: Self = Self::new(b"XFIR");
    pub const MV93: Self = Self::new(b"MV93");
    pub const MC95: Self = Self::new(b"MC95");
    pub const FGDM: Self = Self::new(b"FGDM");
    pub const FGDC: Self = Self::new(b"FGDC");
    pub const IMAP: Self = Self::new(b"imap");
    pub const MMAP: Self = Self::new(b"mmap");
    pub const KEY_TABLE: Self = Self::new(b"KEY*");
    pub const DRCF: Self = Self::new(b"DRCF");
    pub const VWCF: Self = Self::new(b"VWCF");
    pub const CAST_LIST: Self = Self::new(b"MCsL");
    pub const CAST: Self = Self::new(b"CAS*");
    pub const CAST_MEMBER: Self = Self::new(b"CASt");
    pub const LCTX: Self = Self::new(b"Lctx");
    pub const LCTX_CAP: Self = Self::new(b"LctX");
    pub const LNAM: Self = Self::new(b"Lnam");
    pub const LSCR: Self = Self::new(b"Lscr");
    pub const FREE: Self = Self::new(b"free");
    pub const JUNK: Self = Self::new(b"junk");
    pub const RALF: Self = Self::new(b"ralf");

    pub const fn new(tag: &[u8; 4]) -> Self {
        Self(u32::from_be_bytes(*tag))
    }

    pub const fn to_bytes(self) -> [u8; 4] {
        self.0.to_be_bytes()
    }
}

impl fmt::Display for FourCC {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for b in self.to_bytes() {
            let c = if b.is_ascii_graphic() || b == b' ' {
                b as char
            } else {
                '?'
            };
            write!(f, "{c}")?;
        }
        Ok(())
    }
}

// Debug renders the same as Display so log lines and error messages stay
// readable ("CASt", not "FourCC(1128354932)").
impl fmt::Debug for FourCC {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}

impl Serialize for FourCC {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
