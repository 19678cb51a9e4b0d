//! Game state, fairly self-descriptive but bares expanding on in a little more
//! detail.
//!
//! The state of the game can be a few states only:
//!
//! - level playing
//! - intermission/finale
//! - demo screens (title pages between demos)
//!
//! The game state can be changed by a few actions - these are more concretely
//! defined as trait functions in `GameTraits`, where the exposed functions
//! trigger an action from `GameAction`. When an action is set it takes effect
//! on the next tic.
//!
//! Note that the primary state is either demo-play or level-play.
//!
//! The active game state also determines which `Machinations` are run, and the
//! order in which they run - these are such things as intermission screens or
//! the HUD messages during gameplay. The HUD for example ticks only during the
//! `GameState::Level` state.

pub mod demo;
pub mod game_impl;
pub mod machination;
pub mod pars;
pub mod save;

use std::error::Error;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

#[cfg(feature = "hprof")]
use coarse_prof::profile;
use gameplay::log::{debug, error, info, trace, warn};
use gameplay::save::SaveError;
use gameplay::tic_cmd::{TIC_CMD_BUTTONS, TURBOTHRESHOLD, TicCmd};
use gameplay::{
    BACKUPTICS, DOOM_191_VERSION, DOOM_VERSION, GameAction, GameMission, GameMode, Level,
    LevelError, LevelLimits, MAXPLAYERS, Player, PlayerState, SndServerTx, WBStartStruct,
    english, log, m_clear_random, rnd_index,
};
use gamestate_traits::{GameState, MachinationTrait, Skill};
use sound_traits::{SfxName, SoundAction};
use wad::{WadData, WadError};

use crate::demo::{DemoHeader, DemoPlayer, DemoRecorder};
use crate::machination::Machinations;
use crate::pars::{NextMap, next_map_after, par_time};

/// Description of the unregistered shareware release
pub const DESC_SHAREWARE: &str = "DOOM Shareware";
/// Description of registered shareware release
pub const DESC_REGISTERED: &str = "DOOM Registered";
/// Description of The Ultimate Doom release
pub const DESC_ULTIMATE: &str = "The Ultimate DOOM";
/// Description of DOOM II commercial release
pub const DESC_COMMERCIAL: &str = "DOOM 2: Hell on Earth";

/// How many actions may follow on from each other in one tic before the game
/// is considered stuck.
pub const MAX_ACTION_CHAIN: usize = 8;

/// Fatal engine errors. `Game::ticker` returns these and the game cannot
/// continue after one.
#[derive(Debug)]
pub enum GameError {
    /// A netgame player's command was built from a different game state
    ConsistencyFailure {
        player: usize,
        found: i16,
        expected: i16,
    },
    /// The demo lump is from a version this engine can't play back
    DemoVersion {
        found: u8,
        expected: u8,
        description: String,
    },
    /// The level ran out of something, e.g. the platform table
    Level(LevelError),
    /// The save grew past `SAVEGAMESIZE`, nothing was written
    SaveOverrun(usize),
    /// The save header was fine but the body isn't
    BadSave(SaveError),
    /// Something the game needs is not in the WAD files
    MissingContent(String),
    /// Actions kept causing more actions
    ActionChain(usize),
    Wad(WadError),
}

impl Error for GameError {}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameError::ConsistencyFailure {
                player,
                found,
                expected,
            } => write!(
                f,
                "Consistency failure for player {} ({found} should be {expected})",
                player + 1
            ),
            GameError::DemoVersion {
                found,
                expected,
                description,
            } => write!(
                f,
                "Demo is from a different game version! (read {found}, should be {expected}). \
                 This appears to be {description}."
            ),
            GameError::Level(e) => write!(f, "{e}"),
            GameError::SaveOverrun(s) => write!(f, "Savegame buffer overrun ({s} bytes)"),
            GameError::BadSave(e) => write!(f, "{e}"),
            GameError::MissingContent(m) => write!(f, "Missing content: {m}"),
            GameError::ActionChain(n) => write!(f, "Game actions chained {n} times in one tic"),
            GameError::Wad(e) => write!(f, "{e}"),
        }
    }
}

impl From<LevelError> for GameError {
    fn from(e: LevelError) -> Self {
        GameError::Level(e)
    }
}

impl From<WadError> for GameError {
    fn from(e: WadError) -> Self {
        GameError::Wad(e)
    }
}

/// Options specific to Doom gameplay
#[derive(Debug, Clone)]
pub struct DoomOptions {
    pub iwad: String,
    pub pwad: Vec<String>,
    pub no_monsters: bool,
    pub respawn_parm: bool,
    pub fast_parm: bool,
    pub dev_parm: bool,
    pub deathmatch: u8,
    pub skill: Skill,
    pub warp: bool,
    pub episode: i32,
    pub map: i32,
    pub autostart: bool,
    pub verbose: log::LevelFilter,
    /// Play this demo lump then quit
    pub play_demo: Option<String>,
    /// Record a new game to `<name>.lmp`
    pub record: Option<String>,
    /// Record with the 16 bit turn format
    pub long_tics: bool,
    /// Load this save slot on startup
    pub load_slot: Option<usize>,
    /// Where `doomsav<n>.dsg` files live
    pub save_dir: PathBuf,
    pub limits: LevelLimits,
}

impl Default for DoomOptions {
    fn default() -> Self {
        Self {
            iwad: "doom.wad".to_string(),
            pwad: Default::default(),
            no_monsters: Default::default(),
            respawn_parm: Default::default(),
            fast_parm: Default::default(),
            dev_parm: Default::default(),
            deathmatch: Default::default(),
            skill: Default::default(),
            episode: Default::default(),
            map: Default::default(),
            warp: false,
            autostart: Default::default(),
            verbose: log::LevelFilter::Info,
            play_demo: None,
            record: None,
            long_tics: false,
            load_slot: None,
            save_dir: PathBuf::from("."),
            limits: LevelLimits::default(),
        }
    }
}

/// Work out which release the IWAD is from its map lumps
pub fn identify_version(
    wad: &WadData,
) -> Result<(GameMode, GameMission, &'static str), GameError> {
    let game_mode;
    let game_mission;
    let game_description;

    if wad.lump_exists("MAP01") {
        game_mission = GameMission::Doom2;
    } else if wad.lump_exists("E1M1") {
        game_mission = GameMission::Doom;
    } else {
        return Err(GameError::MissingContent(
            "Could not determine IWAD type".to_string(),
        ));
    }

    if game_mission == GameMission::Doom {
        // Doom 1.  But which version?
        if wad.lump_exists("E4M1") {
            game_mode = GameMode::Retail;
            game_description = DESC_ULTIMATE;
        } else if wad.lump_exists("E3M1") {
            game_mode = GameMode::Registered;
            game_description = DESC_REGISTERED;
        } else {
            game_mode = GameMode::Shareware;
            game_description = DESC_SHAREWARE;
        }
    } else {
        game_mode = GameMode::Commercial;
        game_description = DESC_COMMERCIAL;
    }
    Ok((game_mode, game_mission, game_description))
}

/// The mission packs can only be told apart by file name
fn mission_pack(iwad: &str, pwads: &[String]) -> Option<GameMission> {
    let stem = |p: &str| {
        Path::new(p)
            .file_stem()
            .map(|s| s.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default()
    };
    match stem(iwad).as_str() {
        "tnt" => return Some(GameMission::PackTnt),
        "plutonia" => return Some(GameMission::PackPlut),
        _ => {}
    }
    if pwads.iter().any(|p| stem(p) == "nerve") {
        return Some(GameMission::PackNerve);
    }
    None
}

/// Game is very much driven by d_main, which operates as an orchestrator
pub struct Game {
    /// Contains the full wad file. Wads are tiny in terms of today's memory use
    /// so it doesn't hurt to store the full file in ram.
    pub wad_data: WadData,
    /// The complete `Level` data encompassing the everything everywhere all at
    /// once... (if loaded).
    pub level: Option<Level>,
    /// Is the game running? Used as main loop control
    running: bool,
    /// Demo being played?
    demo_playback: bool,
    /// Playing back a two or more player demo
    netdemo: bool,
    /// Quit after the demo ends instead of going back to the demo loop
    singledemo: bool,
    /// Is in the overall demo loop? (titles, credits, demos)
    pub demo_advance: bool,
    demo_sequence: i8,
    demo_player: Option<DemoPlayer>,
    demo_recorder: Option<DemoRecorder>,
    demo_name: String,
    pub page_name: &'static str,
    page_tic: i32,

    /// only if started as net death
    deathmatch: bool,
    /// only true if packets are broadcast
    netgame: bool,

    /// Tracks which players are currently active, set by d_net.c loop
    pub player_in_game: [bool; MAXPLAYERS],
    /// Each player in the array may be controlled
    pub players: [Player; MAXPLAYERS],

    old_game_state: GameState,
    game_action: GameAction,
    pub gamestate: GameState,
    game_skill: Skill,
    respawn_monsters: bool,
    game_episode: i32,
    game_map: i32,
    pub game_tic: u32,
    /// Each command is run this many tics
    ticdup: u32,

    pub paused: bool,
    /// Set by `toggle_pause_game`, sent in the next local command
    sendpause: bool,
    /// Set by `save_game`, sent in the next local command
    sendsave: bool,

    /// player taking events and displaying
    pub consoleplayer: usize,
    /// view being displayed
    displayplayer: usize,
    /// gametic at level start
    level_start_tic: u32,
    /// The level just completed was left by the secret exit
    secret_exit: bool,
    usergame: bool,
    turbodetected: [bool; MAXPLAYERS],

    wminfo: WBStartStruct,
    /// d_net.c
    pub netcmds: [[TicCmd; BACKUPTICS]; MAXPLAYERS],
    /// d_net.c, the state each player's commands are expected to be built on
    consistancy: [[i16; BACKUPTICS]; MAXPLAYERS],

    save_name: PathBuf,
    save_slot: usize,
    save_description: String,
    /// Slot to reload from when the player dies in single player
    pub quicksave_slot: Option<usize>,

    pub game_mode: GameMode,
    game_mission: GameMission,

    /// The options the game-exe exe was started with
    pub options: DoomOptions,

    /// Sound tx
    pub snd_command: SndServerTx,
}

impl Drop for Game {
    fn drop(&mut self) {
        self.snd_command
            .send(SoundAction::Shutdown)
            .unwrap_or_else(|e| debug!("Sound server already gone: {e}"));
    }
}

impl Game {
    pub fn new(
        mut options: DoomOptions,
        mut wad: WadData,
        snd_command: SndServerTx,
    ) -> Result<Game, GameError> {
        let (game_mode, mut game_mission, game_description) = identify_version(&wad)?;
        if game_mission == GameMission::Doom2 {
            if let Some(pack) = mission_pack(&options.iwad, &options.pwad) {
                game_mission = pack;
            }
        }

        // make sure map + episode aren't 0 from CLI option block
        if options.map == 0 {
            options.map = 1;
        }
        if options.episode == 0 {
            options.episode = 1;
        }

        if !options.pwad.is_empty() {
            info!("Init PWADfiles");
            for pwad in options.pwad.iter() {
                wad.add_file(pwad.into())?;
                info!("Added: {}", pwad);
            }
        }

        // Mimic the OG output
        println!(
            "\nROOM-4-DOOM v{}. Playing {}",
            env!("CARGO_PKG_VERSION"),
            game_description,
        );

        match game_mode {
            GameMode::Shareware => {
                println!(
                    r#"
===========================================================================
                            Shareware WAD!
===========================================================================
"#
                );
            }
            _ => {
                println!(
                    r#"
===========================================================================
                 Commercial WAD - do not distribute!
===========================================================================
"#
                );
            }
        }

        info!("Init playloop state.");
        let respawn_monsters = options.skill == Skill::Nightmare || options.respawn_parm;
        let mut game = Game {
            wad_data: wad,
            level: None,
            running: true,
            demo_playback: false,
            netdemo: false,
            singledemo: false,
            demo_advance: false,
            demo_sequence: 0,
            demo_player: None,
            demo_recorder: None,
            demo_name: String::new(),
            page_name: "TITLEPIC",
            page_tic: 200,

            deathmatch: options.deathmatch != 0,
            netgame: false,
            player_in_game: [false; MAXPLAYERS],
            players: std::array::from_fn(|_| Player::default()),

            old_game_state: GameState::DemoScreen,
            game_action: GameAction::None,
            gamestate: GameState::DemoScreen,
            game_skill: options.skill,
            respawn_monsters,
            game_episode: options.episode,
            game_map: options.map,
            game_tic: 0,
            ticdup: 1,

            paused: false,
            sendpause: false,
            sendsave: false,
            consoleplayer: 0,
            displayplayer: 0,
            level_start_tic: 0,
            secret_exit: false,
            usergame: false,
            turbodetected: [false; MAXPLAYERS],
            wminfo: WBStartStruct::default(),

            netcmds: [[TicCmd::new(); BACKUPTICS]; MAXPLAYERS],
            consistancy: [[0; BACKUPTICS]; MAXPLAYERS],

            save_name: PathBuf::new(),
            save_slot: 0,
            save_description: String::new(),
            quicksave_slot: None,

            game_mode,
            game_mission,
            options,
            snd_command,
        };

        // What the command line asked for, in the order d_main checks it
        if let Some(name) = game.options.play_demo.clone() {
            game.singledemo = true;
            game.defered_play_demo(&name);
        } else if let Some(slot) = game.options.load_slot {
            game.save_name = game.save_file_path(slot);
            game.game_action = GameAction::LoadGame;
        } else if let Some(name) = game.options.record.clone() {
            game.record_demo(&name);
            game.game_action = GameAction::NewGame;
        } else if game.options.warp || game.options.autostart {
            game.game_action = GameAction::NewGame;
        } else {
            game.start_title();
        }

        Ok(game)
    }

    pub fn running(&self) -> bool {
        self.running
    }

    pub fn set_running(&mut self, run: bool) {
        self.running = run;
    }

    pub fn is_netgame(&self) -> bool {
        self.netgame
    }

    pub fn is_demo_playback(&self) -> bool {
        self.demo_playback
    }

    pub fn is_demo_recording(&self) -> bool {
        self.demo_recorder.is_some()
    }

    pub fn game_skill(&self) -> Skill {
        self.game_skill
    }

    pub fn game_mission(&self) -> GameMission {
        self.game_mission
    }

    pub fn game_episode(&self) -> i32 {
        self.game_episode
    }

    pub fn game_map(&self) -> i32 {
        self.game_map
    }

    pub fn game_action(&self) -> GameAction {
        self.game_action
    }

    pub fn level_start_tic(&self) -> u32 {
        self.level_start_tic
    }

    fn send_sound(&self, action: SoundAction<SfxName>) {
        self.snd_command
            .send(action)
            .unwrap_or_else(|e| debug!("Sound channel closed: {e}"));
    }

    /// Start a local multiplayer session with these players in it. Commands
    /// for every player come in through `netcmds`.
    ///
    /// The `D_CheckNetGame` then `G_InitNew` startup path
    pub fn begin_net_game(
        &mut self,
        player_in_game: [bool; MAXPLAYERS],
        deathmatch: bool,
    ) -> Result<(), GameError> {
        self.player_in_game = player_in_game;
        self.netgame = player_in_game.iter().filter(|p| **p).count() > 1;
        self.deathmatch = deathmatch;
        self.consoleplayer = 0;
        // the title loop and any queued start are superseded
        self.demo_advance = false;
        self.game_action = GameAction::None;
        self.init_new()
    }

    /// Builds this tic's command for the console player. `build` fills in
    /// the movement and buttons, then any pending pause or save request
    /// replaces the buttons and the consistency value is stamped on.
    ///
    /// Doom function name `G_BuildTiccmd`, the parts that need the game
    pub fn build_local_cmd(&mut self, build: impl FnOnce(&mut TicCmd)) {
        let maketic = (self.game_tic / self.ticdup) as usize % BACKUPTICS;
        let mut cmd = TicCmd::new();
        build(&mut cmd);

        if self.sendpause {
            self.sendpause = false;
            cmd.buttons = TIC_CMD_BUTTONS.bt_special | TIC_CMD_BUTTONS.bts_pause;
        }
        if self.sendsave {
            self.sendsave = false;
            cmd.buttons = TIC_CMD_BUTTONS.bt_special
                | TIC_CMD_BUTTONS.bts_savegame
                | ((self.save_slot as u8) << TIC_CMD_BUTTONS.bts_saveshift);
        }

        cmd.consistancy = self.consistancy[self.consoleplayer][maketic];
        self.netcmds[self.consoleplayer][maketic] = cmd;
    }

    fn do_new_game(&mut self) -> Result<(), GameError> {
        debug!("Entered do_new_game");

        self.netgame = false;
        self.deathmatch = false;
        for i in 1..self.players.len() {
            self.player_in_game[i] = false;
        }
        self.consoleplayer = 0;
        self.player_in_game[0] = true;

        self.init_new()?;
        self.game_action = GameAction::None;

        if self.demo_recorder.as_ref().is_some_and(|r| !r.started()) {
            self.begin_recording();
        }
        Ok(())
    }

    /// Doom function name `G_InitNew`
    ///
    /// Can be called by the startup code or the menu task,
    /// consoleplayer, displayplayer, playeringame[] should be set.
    fn init_new(&mut self) -> Result<(), GameError> {
        debug!("Entered init_new");

        if self.paused {
            self.paused = false;
            self.send_sound(SoundAction::Resume);
        }

        debug!("Game: init_new: mode = {:?}", self.game_mode);
        if self.game_mode == GameMode::Retail {
            if self.game_episode > 4 {
                warn!(
                    "Game: init_new: {:?} mode but episode {} is greater than 4",
                    self.game_mode, self.game_episode
                );
                self.game_episode = 4;
            }
        } else if self.game_mode == GameMode::Shareware {
            if self.game_episode > 1 {
                warn!(
                    "Game: init_new: {:?} mode but episode {} is greater than 1",
                    self.game_mode, self.game_episode
                );
                self.game_episode = 1; // only start episode 1 on shareware
            }
        } else if self.game_episode > 3 {
            warn!(
                "Game: init_new: {:?} mode but episode {} is greater than 3",
                self.game_mode, self.game_episode
            );
            self.game_episode = 3;
        }

        if self.game_episode < 1 {
            warn!("Game: init_new: episode {} is less than 1", self.game_episode);
            self.game_episode = 1;
        }
        if self.game_map < 1 {
            warn!("Game: init_new: map {} is less than 1", self.game_map);
            self.game_map = 1;
        }
        if self.game_map > 9 && self.game_mode != GameMode::Commercial {
            warn!(
                "Game: init_new: {:?} mode but map {} is greater than 9",
                self.game_mode, self.game_map
            );
            self.game_map = 9;
        }

        m_clear_random();

        self.respawn_monsters = self.game_skill == Skill::Nightmare || self.options.respawn_parm;

        // force players to be initialized upon first level load
        for player in self.players.iter_mut() {
            player.player_state = PlayerState::Reborn;
        }

        self.demo_playback = false;
        self.usergame = true; // will be set false if a demo

        info!("Begin new game!");
        self.do_load_level()
    }

    /// Doom function name `G_DoLoadLevel`
    fn do_load_level(&mut self) -> Result<(), GameError> {
        debug!("Entered do_load_level");
        #[cfg(feature = "hprof")]
        profile!("do_load_level");

        self.level_start_tic = self.game_tic;
        self.gamestate = GameState::Level;

        for (i, player) in self.players.iter_mut().enumerate() {
            self.turbodetected[i] = false;
            if self.player_in_game[i] && player.player_state == PlayerState::Dead {
                player.player_state = PlayerState::Reborn;
            }
            player.frags = [0; MAXPLAYERS];
            // Player setup from P_SetupLevel
            player.killcount = 0;
            player.secretcount = 0;
            player.itemcount = 0;
        }

        self.displayplayer = self.consoleplayer; // view the guy you are playing
        self.game_action = GameAction::None;

        let mut level = Level::new(
            self.game_skill,
            self.game_episode,
            self.game_map,
            self.game_mode,
            self.snd_command.clone(),
            self.options.limits,
        );
        level.netgame = self.netgame;
        level.deathmatch = self.deathmatch;
        level.nomonsters = self.options.no_monsters;
        level.respawn_monsters = self.respawn_monsters;
        level.load(&self.wad_data)?;
        level.spawn_things(&mut self.players, &self.player_in_game);
        level.spawn_specials();
        level.game_tic = self.game_tic;

        debug!("Level: skill = {:?}", &level.skill);
        debug!("Level: player_starts = {:?}", &level.player_starts);
        info!("Level started: E{} M{}", level.episode, level.game_map);
        self.level = Some(level);

        self.wminfo.maxfrags = 0;
        self.wminfo.partime = 180;
        Ok(())
    }

    /// Doom function name `G_DoReborn`
    fn do_reborn(&mut self, player_num: usize) {
        if !self.netgame {
            // reload the level from scratch
            self.game_action = if self.quicksave_slot.is_some() {
                GameAction::ReloadGame
            } else {
                GameAction::LoadLevel
            };
            info!("Player died, reloading");
            return;
        }

        // respawn at the start
        if let Some(level) = self.level.as_mut() {
            level.respawn_player(player_num, &mut self.players);
            info!("Player {} respawned", player_num + 1);
        }
    }

    pub fn start_title(&mut self) {
        self.demo_sequence = -1;
        self.game_action = GameAction::None;
        self.advance_demo();
    }

    /// Called after a demo ends or the game quits so a demo being played or
    /// recorded can be cleaned up. Returns true if a new demo loop action will
    /// take place.
    ///
    /// Doom function name `G_CheckDemoStatus`
    pub fn check_demo_status(&mut self) -> bool {
        if self.demo_playback {
            self.demo_playback = false;
            self.demo_player = None;
            self.netdemo = false;
            self.netgame = false;
            self.deathmatch = false;
            for p in self.player_in_game.iter_mut().skip(1) {
                *p = false;
            }
            self.options.respawn_parm = false;
            self.options.fast_parm = false;
            self.options.no_monsters = false;
            self.consoleplayer = 0;

            if self.singledemo {
                info!("Demo {} finished", self.demo_name);
                self.running = false;
            } else {
                self.advance_demo();
            }
            return true;
        }

        self.end_recording();
        false
    }

    /// Write out a demo being recorded, if there is one
    fn end_recording(&mut self) {
        let Some(recorder) = self.demo_recorder.take() else {
            return;
        };
        if !recorder.started() {
            return;
        }
        let name = recorder.file_name().to_owned();
        match fs::write(&name, recorder.finish()) {
            Ok(_) => info!("Demo {name} recorded"),
            Err(e) => error!("Could not write demo {name}: {e}"),
        }
    }

    /// Doom function name `G_RecordDemo`
    pub fn record_demo(&mut self, name: &str) {
        self.usergame = false;
        self.demo_recorder = Some(DemoRecorder::new(name, self.options.long_tics));
    }

    /// Doom function name `G_BeginRecording`
    fn begin_recording(&mut self) {
        let Some(recorder) = self.demo_recorder.as_mut() else {
            return;
        };
        let header = DemoHeader {
            version: if recorder.long_tics() {
                DOOM_191_VERSION
            } else {
                DOOM_VERSION
            },
            skill: self.game_skill,
            episode: self.game_episode,
            map: self.game_map,
            deathmatch: self.deathmatch,
            respawn: self.options.respawn_parm,
            fast: self.options.fast_parm,
            nomonsters: self.options.no_monsters,
            consoleplayer: self.consoleplayer,
            player_in_game: self.player_in_game,
        };
        recorder.begin(&header);
        info!("Recording demo to {}", recorder.file_name());
    }

    /// G_ReadDemoTicCmd
    fn read_demo_tic_cmd(&mut self, cmd: &mut TicCmd) {
        match self.demo_player.as_mut().and_then(DemoPlayer::read_cmd) {
            Some(demo_cmd) => {
                cmd.forwardmove = demo_cmd.forwardmove;
                cmd.sidemove = demo_cmd.sidemove;
                cmd.angleturn = demo_cmd.angleturn;
                cmd.buttons = demo_cmd.buttons;
            }
            None => {
                // end of demo data stream
                self.check_demo_status();
            }
        }
    }

    pub fn advance_demo(&mut self) {
        self.demo_advance = true;
    }

    /// D_PageTicker();
    fn page_ticker(&mut self) {
        self.page_tic -= 1;
        if self.page_tic < 0 {
            self.advance_demo();
        }
    }

    /// Doom function name `D_DoAdvanceDemo`
    pub fn do_advance_demo(&mut self) {
        self.players[self.consoleplayer].player_state = PlayerState::Live;
        self.demo_advance = false;
        self.usergame = false;
        self.paused = false;
        self.game_action = GameAction::None;

        if self.game_mode == GameMode::Retail {
            self.demo_sequence = (self.demo_sequence + 1) % 7;
        } else {
            self.demo_sequence = (self.demo_sequence + 1) % 6;
        }

        debug!("Demo sequence {}", self.demo_sequence);
        match self.demo_sequence {
            0 => {
                if self.game_mode == GameMode::Commercial {
                    self.page_tic = 35 * 11;
                } else {
                    self.page_tic = 170;
                }
                self.gamestate = GameState::DemoScreen;
                self.page_name = "TITLEPIC";
            }
            1 => self.defered_play_demo("demo1"),
            2 => {
                self.page_tic = 200;
                self.gamestate = GameState::DemoScreen;
                self.page_name = "CREDIT";
            }
            3 => self.defered_play_demo("demo2"),
            4 => {
                self.gamestate = GameState::DemoScreen;
                if self.game_mode == GameMode::Commercial {
                    self.page_tic = 35 * 11;
                    self.page_name = "TITLEPIC";
                } else {
                    self.page_tic = 200;
                    if self.game_mode == GameMode::Retail {
                        self.page_name = "CREDIT";
                    } else {
                        self.page_name = "HELP2";
                    }
                }
            }
            5 => self.defered_play_demo("demo3"),
            6 => self.defered_play_demo("demo4"),
            _ => {}
        }
        if self.gamestate == GameState::DemoScreen {
            debug!("Showing page {}", self.page_name);
        }
    }

    /// G_DeferedPlayDemo
    pub fn defered_play_demo(&mut self, name: &str) {
        self.demo_name = name.to_ascii_uppercase();
        self.game_action = GameAction::PlayDemo;
    }

    /// G_DoPlayDemo
    fn do_play_demo(&mut self) -> Result<(), GameError> {
        self.game_action = GameAction::None;

        let Some(lump) = self.wad_data.get_lump(&self.demo_name) else {
            error!("Demo {} does not exist", self.demo_name);
            return Ok(());
        };
        let (header, player) = DemoPlayer::read_header(lump.data.clone())?;

        self.game_skill = header.skill;
        self.game_episode = header.episode;
        self.game_map = header.map;
        self.deathmatch = header.deathmatch;
        self.options.respawn_parm = header.respawn;
        self.options.fast_parm = header.fast;
        self.options.no_monsters = header.nomonsters;
        self.consoleplayer = header.consoleplayer;
        self.player_in_game = header.player_in_game;
        if self.player_in_game[1] {
            self.netgame = true;
            self.netdemo = true;
        }

        self.init_new()?;
        self.usergame = false;
        self.demo_playback = true;
        self.demo_player = Some(player);
        info!("Playing demo {}", self.demo_name);
        Ok(())
    }

    /// Load the next level and set the `GameAction` to None
    ///
    /// Doom function name `G_DoWorldDone`
    fn do_world_done(&mut self) -> Result<(), GameError> {
        self.game_map = self.wminfo.next + 1;
        self.do_load_level()?;
        self.gamestate = GameState::Level;
        self.game_action = GameAction::None;
        Ok(())
    }

    /// Cleanup, re-init, and set up for next level or episode. Also sets up
    /// info that can be displayed on the intermission screene.
    ///
    /// Doom function name `G_DoCompleted`
    fn do_completed(&mut self) {
        self.game_action = GameAction::None;

        let Some(mut level) = self.level.take() else {
            warn!("Game: level completed with no level loaded");
            return;
        };

        for (i, in_game) in self.player_in_game.iter().enumerate() {
            if *in_game {
                self.players[i].finish_level(&mut level);
            }
        }
        self.secret_exit = level.secret_exit;

        if self.game_mode != GameMode::Commercial && self.game_map == 9 {
            for p in self.players.iter_mut() {
                p.didsecret = true;
            }
        }

        // wminfo.next is 0 biased, unlike gamemap, which is just bloody confusing...
        match next_map_after(
            self.game_mode,
            self.game_mission,
            self.game_episode,
            self.game_map,
            self.secret_exit,
        ) {
            NextMap::Victory => {
                self.game_action = GameAction::Victory;
                return;
            }
            NextMap::Map(next) => self.wminfo.next = next,
            NextMap::Unchanged => {}
        }

        self.wminfo.didsecret = self.players[self.consoleplayer].didsecret;
        self.wminfo.epsd = self.game_episode - 1;
        self.wminfo.last = self.game_map - 1;

        self.wminfo.maxkills = level.total_kills;
        self.wminfo.maxitems = level.total_items;
        self.wminfo.maxsecret = level.total_secrets;
        self.wminfo.maxfrags = 0;

        let map_name = Level::map_name(self.game_mode, self.game_episode, self.game_map);
        self.wminfo.partime = par_time(
            self.game_mode,
            self.game_mission,
            self.game_episode,
            self.game_map,
            self.wad_data.lump_count(&map_name) > 1,
        );
        self.wminfo.pnum = self.consoleplayer as i32;

        for (i, in_game) in self.player_in_game.iter().enumerate() {
            let plyr = &mut self.wminfo.plyr[i];
            plyr.inn = *in_game;
            plyr.skills = self.players[i].killcount;
            plyr.sitems = self.players[i].itemcount;
            plyr.ssecret = self.players[i].secretcount;
            plyr.stime = level.level_time;
            plyr.frags.copy_from_slice(&self.players[i].frags);
        }

        info!(
            "Completed {map_name} in {} tics, next map {}",
            level.level_time,
            self.wminfo.next + 1
        );
        // Drop level data
        drop(level);
        self.gamestate = GameState::Intermission;
    }

    /// Doom function name `F_StartFinale`, the game state part
    fn start_finale(&mut self) {
        self.gamestate = GameState::Finale;
        self.level = None; // drop the level
        self.game_action = GameAction::None;
        info!("Starting finale");
    }

    /// Run the pending action, and any it sets in turn
    fn dispatch_actions<I, H, F>(
        &mut self,
        machinations: &mut Machinations<I, H, F>,
    ) -> Result<(), GameError>
    where
        I: MachinationTrait,
        H: MachinationTrait,
        F: MachinationTrait,
    {
        let mut chain = 0;
        while self.game_action != GameAction::None {
            chain += 1;
            if chain > MAX_ACTION_CHAIN {
                return Err(GameError::ActionChain(chain - 1));
            }
            let action = std::mem::replace(&mut self.game_action, GameAction::None);
            debug!("Game action: {:?}", action);
            match action {
                GameAction::LoadLevel => {
                    machinations.hud_msgs.init(self);
                    self.do_load_level()?;
                }
                GameAction::ReloadGame => {
                    let reloaded = match self.quicksave_slot {
                        Some(slot) => {
                            let path = self.save_file_path(slot);
                            self.save_name = path.clone();
                            self.check_save_game(&path) && self.do_load_game()?
                        }
                        None => false,
                    };
                    if !reloaded {
                        self.do_load_level()?;
                    }
                }
                GameAction::NewGame => {
                    machinations.hud_msgs.init(self);
                    self.do_new_game()?;
                }
                GameAction::LoadGame => {
                    if !self.do_load_game()? {
                        warn!("Game: could not load {}", self.save_name.display());
                    }
                }
                GameAction::SaveGame => self.do_save_game()?,
                GameAction::PlayDemo => self.do_play_demo()?,
                GameAction::Completed => {
                    self.do_completed();
                    if self.gamestate == GameState::Intermission {
                        machinations.intermission.init(self);
                        machinations.hud_msgs.init(self);
                    }
                }
                GameAction::Victory => {
                    self.start_finale();
                    machinations.finale.init(self);
                    machinations.hud_msgs.init(self);
                }
                GameAction::WorldDone => self.do_world_done()?,
                GameAction::Screenshot => {
                    info!("Screenshots need a renderer, ignoring");
                }
                GameAction::None => {}
            }
        }
        Ok(())
    }

    /// The value a player's commands are checked against in a netgame
    fn consistancy_value(&self, player: usize) -> i16 {
        self.players[player]
            .mobj
            .and_then(|id| self.level.as_ref()?.thinkers.get(id)?.mobj())
            .map(|mobj| mobj.x.raw() as i16)
            .unwrap_or(rnd_index() as i16)
    }

    /// The ticker which controls the state the game-exe is in. For example the
    /// game-exe could be in demo play, intermission (`GameState`). A state may
    /// also be running other functions that can change the game-exe state or
    /// cause an action through `GameAction`.
    ///
    /// Doom function name `G_Ticker`
    pub fn ticker<I, H, F>(
        &mut self,
        machinations: &mut Machinations<I, H, F>,
    ) -> Result<(), GameError>
    where
        I: MachinationTrait,
        H: MachinationTrait,
        F: MachinationTrait,
    {
        trace!("Entered ticker");
        #[cfg(feature = "hprof")]
        profile!("ticker");

        if self.demo_advance {
            self.do_advance_demo();
        }

        // do player reborns if needed
        for i in 0..MAXPLAYERS {
            if self.player_in_game[i] && self.players[i].player_state == PlayerState::Reborn {
                self.do_reborn(i);
            }
        }

        if let Some(level) = &mut self.level {
            if let Some(action) = level.game_action.take() {
                self.game_action = action;
                info!("Game state changed: {:?}", self.game_action);
            }
        }

        // do things to change the game-exe state
        self.dispatch_actions(machinations)?;

        // get commands, check consistancy,
        // and build new consistancy check
        let buf = (self.game_tic / self.ticdup) as usize % BACKUPTICS;

        for i in 0..MAXPLAYERS {
            if !self.player_in_game[i] {
                continue;
            }
            let mut cmd = self.netcmds[i][buf];
            if self.demo_playback {
                self.read_demo_tic_cmd(&mut cmd);
            }
            if let Some(recorder) = self.demo_recorder.as_mut() {
                if recorder.started() {
                    recorder.write_cmd(&mut cmd);
                }
            }

            // check ~ 4 seconds whether to display the turbo message.
            if self.netgame || self.demo_playback {
                if cmd.forwardmove > TURBOTHRESHOLD {
                    self.turbodetected[i] = true;
                }
                if self.game_tic & 31 == 0
                    && (self.game_tic >> 5) as usize % MAXPLAYERS == i
                    && self.turbodetected[i]
                {
                    let msg = format!("{}{}", english::PLAYER_NAMES[i], english::TURBO_SUFFIX);
                    debug!("{msg}");
                    self.players[self.consoleplayer].message = Some(msg);
                    self.turbodetected[i] = false;
                }
            }

            if self.netgame && !self.netdemo && self.game_tic % self.ticdup == 0 {
                if self.game_tic as usize > BACKUPTICS && self.consistancy[i][buf] != cmd.consistancy
                {
                    return Err(GameError::ConsistencyFailure {
                        player: i,
                        found: cmd.consistancy,
                        expected: self.consistancy[i][buf],
                    });
                }
                self.consistancy[i][buf] = self.consistancy_value(i);
            }
            self.players[i].cmd = cmd;
        }

        // check for special buttons
        for i in 0..MAXPLAYERS {
            if !self.player_in_game[i] || !self.players[i].cmd.is_special() {
                continue;
            }
            let buttons = self.players[i].cmd.buttons;
            match buttons & TIC_CMD_BUTTONS.bt_specialmask {
                m if m == TIC_CMD_BUTTONS.bts_pause => {
                    self.paused = !self.paused;
                    if self.paused {
                        self.send_sound(SoundAction::StopSfxAll);
                        self.send_sound(SoundAction::StartSfx {
                            uid: 0,
                            sfx: SfxName::Swtchn,
                            x: 0.0,
                            y: 0.0,
                        });
                        self.send_sound(SoundAction::Pause);
                    } else {
                        self.send_sound(SoundAction::Resume);
                        self.send_sound(SoundAction::StartSfx {
                            uid: 0,
                            sfx: SfxName::Swtchx,
                            x: 0.0,
                            y: 0.0,
                        });
                    }
                    info!("Paused: {}", self.paused);
                }
                m if m == TIC_CMD_BUTTONS.bts_savegame => {
                    if self.save_description.is_empty() {
                        self.save_description = english::NETGAME_DESCRIPTION.to_string();
                    }
                    self.save_slot = ((buttons & TIC_CMD_BUTTONS.bts_savemask)
                        >> TIC_CMD_BUTTONS.bts_saveshift)
                        as usize;
                    self.game_action = GameAction::SaveGame;
                }
                _ => {}
            }
        }

        // Intermission ends here, the hook can release what it holds
        if self.old_game_state == GameState::Intermission
            && self.gamestate != GameState::Intermission
        {
            machinations.intermission.end(self);
        }
        self.old_game_state = self.gamestate;

        match self.gamestate {
            GameState::Level => {
                // player movements, run thinkers etc
                self.p_ticker()?;
                // update the HUD statuses (things like timeout displayed messages)
                machinations.hud_msgs.ticker(self);
            }
            GameState::Intermission => {
                // WI_Ticker calls level_done()
                machinations.intermission.ticker(self);
            }
            GameState::Finale => {
                machinations.finale.ticker(self);
            }
            GameState::DemoScreen => {
                self.page_ticker();
            }
        }
        Ok(())
    }

    /// Gameplay ticker. Updates the game-exe level state along with all
    /// thinkers inside that level.
    ///
    /// Doom function name `P_Ticker`
    fn p_ticker(&mut self) -> Result<(), GameError> {
        if self.paused {
            return Ok(());
        }
        #[cfg(feature = "hprof")]
        profile!("p_ticker");

        // Only run thinkers if a level is loaded
        let Some(level) = self.level.as_mut() else {
            return Ok(());
        };
        level.game_tic = self.game_tic;
        level.player_cmds = std::array::from_fn(|i| self.players[i].cmd);

        for (i, player) in self.players.iter_mut().enumerate() {
            if self.player_in_game[i] {
                player.think(i, level)?;
            }
        }

        level.run_thinkers()?;
        level.update_specials();
        level.level_time += 1;

        // kills by the world go to the only player there is
        let unowned = level.take_unowned_kills();
        if !self.netgame {
            self.players[0].killcount += unowned;
        }
        Ok(())
    }
}
