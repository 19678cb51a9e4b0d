//! The data that makes up an entire level, along with functions to record state,
//! or get ref/mutable-ref to parts of it.
//!
//! Some of the state is mirrored from the overall game state.

pub mod flags;
pub mod map_data;
pub mod map_defs;

use std::{error::Error, fmt};

use log::{debug, info};
use math::FixedPoint;
use sound_traits::{SfxName, SoundAction};
use wad::{WadData, lumps::WadThing};

use crate::{
    LevelLimits, Skill, SndServerTx,
    doom_def::{GameAction, GameMode, MAXPLAYERS},
    env::{platforms::PlatformRegistry, specials::Button},
    level::map_data::MapData,
    thinker::{ThinkerAlloc, ThinkerId},
    tic_cmd::TicCmd,
};

/// Things that go wrong while building or running a level. All of these are
/// fatal to the level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LevelError {
    /// The map's marker lump is not in any loaded WAD
    MissingMap(String),
    /// A map lump references something that doesn't exist
    BadMap(String),
    /// Too many platforms active at once
    PlatformTableFull(usize),
}

impl Error for LevelError {}

impl fmt::Display for LevelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LevelError::MissingMap(m) => write!(f, "Map {m} not found"),
            LevelError::BadMap(m) => write!(f, "Bad map data: {m}"),
            LevelError::PlatformTableFull(n) => {
                write!(f, "P_AddActivePlat: no more plats! ({n} active)")
            }
        }
    }
}

/// The level is considered a `World` or sorts. One that exists only
/// while the player is in it. Another benefit of this structure is
/// it makes it easier for all involved thinkers and functions to
/// work with the data, as much of it is interlinked.
pub struct Level {
    pub map_data: MapData,
    pub thinkers: ThinkerAlloc,
    pub skill: Skill,
    pub respawn_monsters: bool,
    pub level_time: u32,
    pub episode: i32,
    pub game_map: i32,
    /// This needs to be synced with `Game`
    pub game_tic: u32,
    /// The `Things` for player start locations
    pub player_starts: [Option<WadThing>; MAXPLAYERS],
    /// The `Things` for deathmatch start locations
    pub deathmatch_starts: Vec<WadThing>,
    /// Was the level set for deathmatch game
    pub deathmatch: bool,
    pub netgame: bool,
    /// Don't spawn monsters
    pub nomonsters: bool,
    /// for intermission
    pub total_kills: i32,
    /// for intermission
    pub total_items: i32,
    /// for intermission
    pub total_secrets: i32,
    /// Kills without an owning player, credited by `take_unowned_kills`
    unowned_kills: i32,
    /// Set when the level wants the game to do something, such as exit
    pub game_action: Option<GameAction>,
    pub secret_exit: bool,
    /// Commercial only: does MAP31 exist for the secret exit to go to
    pub secret_map_exists: bool,
    pub game_mode: GameMode,
    /// Sound channel
    pub snd_command: SndServerTx,
    pub active_platforms: PlatformRegistry,
    /// Pressed repeatable switches
    pub buttons: Vec<Button>,
    pub limits: LevelLimits,
    /// This tic's commands, mirrored for thinkers that need player input
    pub player_cmds: [TicCmd; MAXPLAYERS],
    /// Specials touched by a player's body this tic, picked up in the
    /// player's next think
    pub(crate) touched: Vec<(usize, ThinkerId)>,
}

impl Level {
    /// Set up a complete level including difficulty, spawns, players etc.
    /// After `new()` the `load()` function should be called.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        skill: Skill,
        episode: i32,
        map: i32,
        game_mode: GameMode,
        snd_command: SndServerTx,
        limits: LevelLimits,
    ) -> Self {
        let respawn_monsters = skill == Skill::Nightmare;
        Self {
            map_data: MapData::default(),
            thinkers: ThinkerAlloc::new(512),
            skill,
            respawn_monsters,
            level_time: 0,
            episode,
            game_map: map,
            game_tic: 0,
            player_starts: [None; MAXPLAYERS],
            deathmatch_starts: Vec::with_capacity(crate::doom_def::MAX_DEATHMATCH_STARTS),
            deathmatch: false,
            netgame: false,
            nomonsters: false,
            total_kills: 0,
            total_items: 0,
            total_secrets: 0,
            unowned_kills: 0,
            game_action: None,
            secret_exit: false,
            secret_map_exists: false,
            game_mode,
            snd_command,
            active_platforms: PlatformRegistry::new(limits.max_platforms),
            buttons: Vec::new(),
            limits,
            player_cmds: [TicCmd::new(); MAXPLAYERS],
            touched: Vec::new(),
        }
    }

    /// The map lump name for an episode and map
    pub fn map_name(game_mode: GameMode, episode: i32, map: i32) -> String {
        if game_mode == GameMode::Commercial {
            format!("MAP{map:02}")
        } else {
            format!("E{episode}M{map}")
        }
    }

    /// Load the map geometry. Things are spawned separately with
    /// `spawn_things()` as they need the players.
    pub fn load(&mut self, wad_data: &WadData) -> Result<(), LevelError> {
        let map_name = Self::map_name(self.game_mode, self.episode, self.game_map);
        self.map_data = MapData::load(&map_name, wad_data)?;
        self.secret_map_exists =
            self.game_mode == GameMode::Commercial && wad_data.lump_exists("MAP31");
        info!("Loaded level {map_name}");
        Ok(())
    }

    /// After the map loaded, set up the sector specials. Only secrets need
    /// anything up front.
    ///
    /// Doom function `P_SpawnSpecials`
    pub fn spawn_specials(&mut self) {
        self.total_secrets = self
            .map_data
            .sectors
            .iter()
            .filter(|s| s.special == 9)
            .count() as i32;
        debug!("{} secrets in level", self.total_secrets);
    }

    /// Doom function `G_ExitLevel`
    pub fn do_exit_level(&mut self) {
        self.secret_exit = false;
        self.game_action = Some(GameAction::Completed);
    }

    /// Here's for the german edition.
    /// IF NO WOLF3D LEVELS, NO SECRET EXIT!
    ///
    /// Doom function `G_SecretExitLevel`
    pub fn do_secret_exit_level(&mut self) {
        self.secret_exit = !(self.game_mode == GameMode::Commercial && !self.secret_map_exists);
        self.game_action = Some(GameAction::Completed);
    }

    pub fn start_sound(&self, sfx: SfxName, x: FixedPoint, y: FixedPoint, uid: usize) {
        self.snd_command
            .send(SoundAction::StartSfx {
                uid,
                sfx,
                x: x.to_f32(),
                y: y.to_f32(),
            })
            .unwrap_or_else(|e| debug!("Sound channel closed: {e}"));
    }

    /// Play a sound from the middle of a sector, such as a mover
    pub fn start_sector_sound(&self, sfx: SfxName, sector: usize) {
        let Some(sec) = self.map_data.sectors.get(sector) else {
            return;
        };
        let mut min = (FixedPoint::MAX, FixedPoint::MAX);
        let mut max = (FixedPoint::MIN, FixedPoint::MIN);
        for &l in sec.lines.iter() {
            let line = &self.map_data.linedefs[l];
            for v in [line.v1, line.v2] {
                min = (min.0.min(v.x), min.1.min(v.y));
                max = (max.0.max(v.x), max.1.max(v.y));
            }
        }
        if sec.lines.is_empty() {
            min = (FixedPoint::ZERO, FixedPoint::ZERO);
            max = min;
        }
        let x = min.0 + (max.0 - min.0) / 2;
        let y = min.1 + (max.1 - min.1) / 2;
        self.start_sound(sfx, x, y, usize::MAX - sector);
    }

    /// A player body touched a special thing
    pub(crate) fn touch_special(&mut self, player: usize, thing: ThinkerId) {
        if !self.touched.contains(&(player, thing)) {
            self.touched.push((player, thing));
        }
    }

    /// A kill with nobody to credit it to, such as a crusher
    pub(crate) fn add_unowned_kill(&mut self) {
        self.unowned_kills += 1;
    }

    /// Take the count of kills made by the world. In single player the game
    /// credits these to player 1.
    pub fn take_unowned_kills(&mut self) -> i32 {
        std::mem::take(&mut self.unowned_kills)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::mpsc::channel;

    use wad::test_utils::test_room;

    use super::{Level, map_data::MapData};
    use crate::{
        LevelLimits, Skill,
        doom_def::{GameAction, GameMode, MAXPLAYERS},
        player::Player,
    };

    pub(crate) fn test_players() -> [Player; MAXPLAYERS] {
        std::array::from_fn(|_| Player::new())
    }

    /// A level on the test room with nothing spawned
    pub(crate) fn new_level(skill: Skill) -> Level {
        let (tx, rx) = channel();
        // keep the channel open for the life of the test thread
        std::mem::forget(rx);
        let mut level = Level::new(skill, 1, 1, GameMode::Shareware, tx, LevelLimits::default());
        let r = test_room();
        level.map_data =
            MapData::from_parts("E1M1", r.things, r.vertexes, r.linedefs, r.sidedefs, r.sectors)
                .unwrap();
        level
    }

    /// The test room in single player with player 1 spawned
    pub(crate) fn test_level_with_players() -> (Level, [Player; MAXPLAYERS]) {
        let mut players = test_players();
        let mut level = new_level(Skill::Medium);
        level.spawn_things(&mut players, &[true, false, false, false]);
        level.spawn_specials();
        (level, players)
    }

    pub(crate) fn test_level() -> Level {
        test_level_with_players().0
    }

    #[test]
    fn map_names() {
        assert_eq!(Level::map_name(GameMode::Commercial, 1, 7), "MAP07");
        assert_eq!(Level::map_name(GameMode::Retail, 4, 2), "E4M2");
    }

    #[test]
    fn exits() {
        let mut level = test_level();
        level.do_secret_exit_level();
        assert!(level.secret_exit);
        assert_eq!(level.game_action, Some(GameAction::Completed));
        level.do_exit_level();
        assert!(!level.secret_exit);

        level.game_mode = GameMode::Commercial;
        level.secret_map_exists = false;
        level.do_secret_exit_level();
        assert!(!level.secret_exit);
    }

    #[test]
    fn unowned_kills_drain() {
        let mut level = test_level();
        level.add_unowned_kill();
        level.add_unowned_kill();
        assert_eq!(level.take_unowned_kills(), 2);
        assert_eq!(level.take_unowned_kills(), 0);
    }
}
