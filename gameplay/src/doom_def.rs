use math::FixedPoint;

/// Tics per second. Everything in the simulation is clocked off this.
pub const TICRATE: i32 = 35;

pub const BFGCELLS: u32 = 40;

/// P_MOBJ
pub const MAXHEALTH: i32 = 100;
pub const VIEWHEIGHT: FixedPoint = FixedPoint::from_int(41);
pub const USERANGE: FixedPoint = FixedPoint::from_int(64);
/// Largest step a walking thing can climb
pub const MAXSTEPHEIGHT: FixedPoint = FixedPoint::from_int(24);

/// DOOM version, as written in demos and savegames
pub const DOOM_VERSION: u8 = 109;
/// The "v1.91 hack" demo version with 16bit turning
pub const DOOM_191_VERSION: u8 = 111;

/// The maximum number of players, multiplayer/networking.
pub const MAXPLAYERS: usize = 4;
pub const MAX_DEATHMATCH_STARTS: usize = 10;
/// Size of the netgame command ring
pub const BACKUPTICS: usize = 12;

/// Game mode handling - identify IWAD version to handle IWAD dependend rules.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameMode {
    /// DOOM 1 shareware, E1, M9
    Shareware,
    /// DOOM 1 registered, E3, M27
    Registered,
    /// DOOM 2 retail, E1 M34
    Commercial,
    /// DOOM 1 retail, E4, M36
    Retail,
    Indetermined, // Well, no IWAD found.
}

/// Mission packs. Mostly matters for the map routing and par times.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameMission {
    /// Doom (shareware, registered)
    Doom,
    /// Doom II
    Doom2,
    /// TNT mission pack
    PackTnt,
    /// Plutonia mission pack
    PackPlut,
    /// No Rest for the Living
    PackNerve,
    None,
}

impl GameMission {
    pub fn to_byte(self) -> u8 {
        match self {
            GameMission::Doom => 0,
            GameMission::Doom2 => 1,
            GameMission::PackTnt => 2,
            GameMission::PackPlut => 3,
            GameMission::PackNerve => 5,
            GameMission::None => 4,
        }
    }

    pub fn from_byte(b: u8) -> Self {
        match b {
            0 => GameMission::Doom,
            1 => GameMission::Doom2,
            2 => GameMission::PackTnt,
            3 => GameMission::PackPlut,
            5 => GameMission::PackNerve,
            _ => GameMission::None,
        }
    }
}

/// A pending one-shot transition. Set by input, the menu, or level logic and
/// drained every tic by `Game::ticker`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameAction {
    None,
    LoadLevel,
    /// Player died in single player with a quicksave slot set
    ReloadGame,
    NewGame,
    LoadGame,
    SaveGame,
    PlayDemo,
    Completed,
    Victory,
    WorldDone,
    Screenshot,
}

/// Deaf monsters/do not react to sound.
pub const MTF_AMBUSH: i16 = 8;
/// A single flag used to determine if the thing options are multiplayer of singleplayer enabled.
pub const MTF_SINGLE_PLAYER: i16 = 16;

/// Key cards.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Card {
    Bluecard,
    Yellowcard,
    Redcard,
    Blueskull,
    Yellowskull,
    Redskull,
    NumCards,
}

/// The defined weapons, including a marker indicating user has not changed weapon.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, PartialOrd)]
pub enum WeaponType {
    Fist,
    #[default]
    Pistol,
    Shotgun,
    Chaingun,
    Missile,
    Plasma,
    BFG,
    Chainsaw,
    SuperShotgun,
    NumWeapons,
    // No pending weapon change.
    NoChange,
}

impl From<u8> for WeaponType {
    fn from(w: u8) -> Self {
        match w {
            0 => WeaponType::Fist,
            1 => WeaponType::Pistol,
            2 => WeaponType::Shotgun,
            3 => WeaponType::Chaingun,
            4 => WeaponType::Missile,
            5 => WeaponType::Plasma,
            6 => WeaponType::BFG,
            7 => WeaponType::Chainsaw,
            8 => WeaponType::SuperShotgun,
            _ => WeaponType::NoChange,
        }
    }
}

pub const MAX_AMMO: [u32; 4] = [200, 50, 300, 50];
pub const CLIP_AMMO: [u32; 4] = [10, 4, 20, 1];

/// Ammunition types defined.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum AmmoType {
    /// Pistol / chaingun ammo.
    Clip,
    /// Shotgun / double barreled shotgun.
    Shell,
    /// Plasma rifle, BFG.
    Cell,
    /// Missile launcher.
    Missile,
    NumAmmo,
    /// Unlimited for chainsaw / fist.
    NoAmmo,
}

/// Which ammo each weapon draws from, indexed by `WeaponType as usize`
pub const WEAPON_AMMO: [AmmoType; 9] = [
    AmmoType::NoAmmo,
    AmmoType::Clip,
    AmmoType::Shell,
    AmmoType::Clip,
    AmmoType::Missile,
    AmmoType::Cell,
    AmmoType::Cell,
    AmmoType::NoAmmo,
    AmmoType::Shell,
];

/// Power up artifacts.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PowerType {
    Invulnerability,
    Strength,
    Invisibility,
    IronFeet,
    Allmap,
    Infrared,
    NumPowers,
}

impl PowerType {
    /// How many tics till expiration. Zero for powers that don't wear off.
    pub const fn duration(self) -> i32 {
        match self {
            PowerType::Invulnerability => 30 * TICRATE,
            PowerType::Invisibility | PowerType::IronFeet => 60 * TICRATE,
            PowerType::Infrared => 120 * TICRATE,
            PowerType::Strength | PowerType::Allmap | PowerType::NumPowers => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weapon_from_button_bits() {
        assert_eq!(WeaponType::from(0), WeaponType::Fist);
        assert_eq!(WeaponType::from(7), WeaponType::Chainsaw);
        assert_eq!(WeaponType::from(8), WeaponType::SuperShotgun);
        assert_eq!(WeaponType::from(9), WeaponType::NoChange);
        assert_eq!(WEAPON_AMMO[WeaponType::BFG as usize], AmmoType::Cell);
    }

    #[test]
    fn power_durations() {
        assert_eq!(PowerType::Invulnerability.duration(), 1050);
        assert_eq!(PowerType::Invisibility.duration(), 2100);
        assert_eq!(PowerType::IronFeet.duration(), 2100);
        assert_eq!(PowerType::Infrared.duration(), 4200);
        assert_eq!(PowerType::Allmap.duration(), 0);
    }

    #[test]
    fn mission_byte() {
        for m in [
            GameMission::Doom,
            GameMission::Doom2,
            GameMission::PackTnt,
            GameMission::PackPlut,
            GameMission::PackNerve,
        ] {
            assert_eq!(GameMission::from_byte(m.to_byte()), m);
        }
    }
}
