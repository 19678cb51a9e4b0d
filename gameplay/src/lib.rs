//! The play simulation: levels, map objects, movers, players, and the save
//! archive. Everything here runs at a fixed `TICRATE` and is driven one tic at
//! a time by the game state.

mod doom_def;
pub mod env;
pub mod lang;
pub mod level;
pub mod player;
pub mod save;
pub mod thing;
pub mod thinker;
pub mod tic_cmd;

use std::{error::Error, fmt, str::FromStr, sync::mpsc::Sender};

use sound_traits::{SfxName, SoundAction};

pub use doom_def::{
    AmmoType, BACKUPTICS, Card, DOOM_191_VERSION, DOOM_VERSION, GameAction, GameMission,
    GameMode, MAXHEALTH, MAXPLAYERS, PowerType, TICRATE, WeaponType,
};
pub use env::platforms::{PlatKind, PlatStatus, Platform};
pub use lang::english;
pub use level::{
    Level, LevelError,
    flags::LineDefFlags,
    map_data::MapData,
    map_defs::{LineDef, Sector},
};
pub use log;
pub use math::{m_clear_random, p_random, rnd_index};
pub use player::{Player, PlayerCheat, PlayerState, WBPlayerStruct, WBStartStruct};
pub use thing::{MapObjFlag, MapObject};
pub use thinker::{ThinkerAlloc, ThinkerData, ThinkerId};
pub use tic_cmd::{TIC_CMD_BUTTONS, TicCmd};

/// The channel levels use to start sounds
pub type SndServerTx = Sender<SoundAction<SfxName>>;

#[derive(Debug)]
pub enum DoomArgError {
    InvalidSkill(String),
}

impl Error for DoomArgError {}

impl fmt::Display for DoomArgError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DoomArgError::InvalidSkill(m) => write!(f, "{}", m),
        }
    }
}

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, PartialOrd)]
pub enum Skill {
    Baby = 0,
    Easy = 1,
    #[default]
    Medium = 2,
    Hard = 3,
    Nightmare = 4,
}

impl Skill {
    pub fn to_byte(self) -> u8 {
        self as u8
    }

    pub fn from_byte(b: u8) -> Option<Self> {
        match b {
            0 => Some(Skill::Baby),
            1 => Some(Skill::Easy),
            2 => Some(Skill::Medium),
            3 => Some(Skill::Hard),
            4 => Some(Skill::Nightmare),
            _ => None,
        }
    }
}

impl FromStr for Skill {
    type Err = DoomArgError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<u8>()
            .ok()
            .and_then(Skill::from_byte)
            .ok_or_else(|| DoomArgError::InvalidSkill(format!("Invalid skill: {s}")))
    }
}

/// Static limits on what a level can hold. Going over is an engine error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelLimits {
    /// Platforms that can be stopped and restarted at once
    pub max_platforms: usize,
}

impl Default for LevelLimits {
    fn default() -> Self {
        Self { max_platforms: 30 }
    }
}

#[cfg(test)]
mod tests {
    use super::Skill;

    #[test]
    fn skill_parse() {
        assert_eq!("0".parse::<Skill>().unwrap(), Skill::Baby);
        assert_eq!("4".parse::<Skill>().unwrap(), Skill::Nightmare);
        assert!("5".parse::<Skill>().is_err());
        assert!("hard".parse::<Skill>().is_err());
        assert!(Skill::Hard > Skill::Medium);
    }
}
