//! A stand-in for the game so intermission and finale tickers can be driven
//! without a level.

use gameplay::MAXPLAYERS;

use crate::{
    GameMission, GameMode, GameTraits, PlayerButtons, SfxName, Skill, WBPlayerStruct, WorldInfo,
};

#[derive(Debug)]
pub struct FakeGame {
    pub mode: GameMode,
    pub mission: GameMission,
    pub episode: i32,
    pub map: i32,
    pub info: WorldInfo,
    pub buttons: [Option<PlayerButtons>; MAXPLAYERS],
    pub sounds: Vec<SfxName>,
    pub level_done: usize,
    pub finale_done: usize,
    pub message: Option<String>,
}

impl FakeGame {
    /// Single player, nothing pressed
    pub fn new(mode: GameMode, episode: i32, map: i32) -> Self {
        let mut buttons = [None; MAXPLAYERS];
        buttons[0] = Some(PlayerButtons::default());
        Self {
            mode,
            mission: if mode == GameMode::Commercial {
                GameMission::Doom2
            } else {
                GameMission::Doom
            },
            episode,
            map,
            info: WorldInfo::default(),
            buttons,
            sounds: Vec::new(),
            level_done: 0,
            finale_done: 0,
            message: None,
        }
    }

    pub fn press_attack(&mut self, down: bool) {
        if let Some(b) = self.buttons[0].as_mut() {
            b.attack = down;
        }
    }

    pub fn press_use(&mut self, down: bool) {
        if let Some(b) = self.buttons[0].as_mut() {
            b.use_ = down;
        }
    }
}

impl GameTraits for FakeGame {
    fn defered_init_new(&mut self, _skill: Skill, episode: i32, map: i32) {
        self.episode = episode;
        self.map = map;
    }

    fn get_mode(&self) -> GameMode {
        self.mode
    }

    fn get_mission(&self) -> GameMission {
        self.mission
    }

    fn get_episode(&self) -> i32 {
        self.episode
    }

    fn get_map(&self) -> i32 {
        self.map
    }

    fn load_game(&mut self, _name: String) {}

    fn save_game(&mut self, _slot: usize, _description: String) {}

    fn toggle_pause_game(&mut self) {}

    fn quit_game(&mut self) {}

    fn start_sound(&mut self, sfx: SfxName) {
        self.sounds.push(sfx);
    }

    fn level_done(&mut self) {
        self.level_done += 1;
    }

    fn finale_done(&mut self) {
        self.finale_done += 1;
    }

    fn level_end_info(&self) -> &WorldInfo {
        &self.info
    }

    fn player_end_info(&self) -> &WBPlayerStruct {
        &self.info.plyr[0]
    }

    fn player_buttons(&self) -> [Option<PlayerButtons>; MAXPLAYERS] {
        self.buttons
    }

    fn player_msg_take(&mut self) -> Option<String> {
        self.message.take()
    }
}
