use std::fmt;

/// The sound effects the simulation core can trigger. Discriminants follow the
/// `sfxenum_t` ordering of the original game so lump names line up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SfxName {
    None = 0,
    Pistol = 1,
    Oof = 34,
    Pstart = 18,
    Pstop = 19,
    Stnmov = 22,
    Swtchn = 23,
    Swtchx = 24,
    Barexp = 82,
    Sgcock = 3,
    Itemup = 32,
    Wpnup = 33,
    Getpow = 93,
    Noway = 81,
}

impl SfxName {
    /// The `DS` lump name without the prefix
    pub const fn lump_name(self) -> &'static str {
        match self {
            SfxName::None => "none",
            SfxName::Pistol => "pistol",
            SfxName::Oof => "oof",
            SfxName::Pstart => "pstart",
            SfxName::Pstop => "pstop",
            SfxName::Stnmov => "stnmov",
            SfxName::Swtchn => "swtchn",
            SfxName::Swtchx => "swtchx",
            SfxName::Barexp => "barexp",
            SfxName::Sgcock => "sgcock",
            SfxName::Itemup => "itemup",
            SfxName::Wpnup => "wpnup",
            SfxName::Getpow => "getpow",
            SfxName::Noway => "noway",
        }
    }
}

impl fmt::Display for SfxName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ds{}", self.lump_name())
    }
}
