/// Marketing major version of the authoring tool, derived from the raw
/// `directorVersion` field in the config chunk.
///
/// Known versions: 200/300/310 (Director 2–3), 400/404 (4.x), 500 (5.x),
/// 600 (6.x), 700 (7.x), 800 (8.0), 850 (8.5), 1000 (MX), 1100/1150 (MX
/// 2004), 1200 (11+).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MovieVersion(pub u16);

impl MovieVersion {
    /// Map a raw `directorVersion` value to the marketing version.
    pub fn from_raw(raw: i16) -> Self {
        let v = match raw {
            1951.. => 1200,
            1922.. => 1150,
            1921.. => 1100,
            1851.. => 1000,
            1700.. => 850,
            1410.. => 800,
            1224.. => 700,
            1218.. => 600,
            1201.. => 500,
            1117.. => 404,
            1115.. => 400,
            1029.. => 310,
            1028.. => 300,
            _ => 200,
        };
        Self(v)
    }

    /// Whether cast members use the D5+ layout (u32 type field up front)
    /// rather than the old layout with the type byte inside the specific
    /// data region. Also gates the wide (u32) literal type field and the
    /// movie-level cast list.
    pub fn has_modern_member_layout(self) -> bool {
        self.0 >= 500
    }

    /// Whether the config checksum's stage-color step uses only the low
    /// byte of `stageColor`.
    pub fn checksum_masks_stage_color(self) -> bool {
        self.0 >= 700
    }

    /// Whether the config checksum's comment-style step uses the full u16
    /// rather than its high byte.
    pub fn checksum_uses_full_comment_style(self) -> bool {
        self.0 >= 800
    }
}

impl std::fmt::Display for MovieVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_raw_versions() {
        assert_eq!(MovieVersion::from_raw(1028).0, 300);
        assert_eq!(MovieVersion::from_raw(1201).0, 500);
        assert_eq!(MovieVersion::from_raw(1116).0, 400);
        assert_eq!(MovieVersion::from_raw(1217).0, 500);
        assert_eq!(MovieVersion::from_raw(1223).0, 600);
        assert_eq!(MovieVersion::from_raw(1224).0, 700);
        assert_eq!(MovieVersion::from_raw(1410).0, 800);
        assert_eq!(MovieVersion::from_raw(2000).0, 1200);
        assert_eq!(MovieVersion::from_raw(0).0, 200);
    }

    #[test]
    fn gates() {
        assert!(!MovieVersion(404).has_modern_member_layout());
        assert!(MovieVersion(500).has_modern_member_layout());
        assert!(!MovieVersion(600).checksum_masks_stage_color());
        assert!(MovieVersion(700).checksum_masks_stage_color());
        assert!(!MovieVersion(700).checksum_uses_full_comment_style());
        assert!(MovieVersion(800).checksum_uses_full_comment_style());
    }
}
