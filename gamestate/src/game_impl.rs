use std::path::PathBuf;

use gameplay::log::{debug, info};
use gameplay::{GameAction, GameMission, GameMode, MAXPLAYERS, Skill, TIC_CMD_BUTTONS};
use gamestate_traits::{GameTraits, PlayerButtons, WBPlayerStruct, WorldInfo};
use sound_traits::{SfxName, SoundAction};

use crate::Game;

impl GameTraits for Game {
    /// G_InitNew
    /// Can be called by the startup code or the menu task,
    /// consoleplayer, displayplayer, playeringame[] should be set.
    ///
    /// This appears to be defered because the function call can happen at any
    /// time in the game-exe. So rather than just abruptly stop everything
    /// we should set the action so that the right sequences are run.
    fn defered_init_new(&mut self, skill: Skill, episode: i32, map: i32) {
        self.game_skill = skill;
        self.game_episode = episode;
        self.game_map = map;
        self.game_action = GameAction::NewGame;
    }

    fn get_mode(&self) -> GameMode {
        self.game_mode
    }

    fn get_mission(&self) -> GameMission {
        self.game_mission
    }

    fn get_episode(&self) -> i32 {
        self.game_episode
    }

    fn get_map(&self) -> i32 {
        self.game_map
    }

    /// G_LoadGame
    fn load_game(&mut self, name: String) {
        self.save_name = PathBuf::from(name);
        self.game_action = GameAction::LoadGame;
    }

    /// G_SaveGame. The request goes out with the next command so that every
    /// player saves on the same tic.
    fn save_game(&mut self, slot: usize, description: String) {
        self.save_slot = slot;
        self.save_description = description;
        self.sendsave = true;
    }

    fn toggle_pause_game(&mut self) {
        self.sendpause = true;
    }

    fn quit_game(&mut self) {
        if self.is_demo_recording() {
            self.check_demo_status();
        }
        info!("Quitting");
        self.set_running(false);
    }

    fn start_sound(&mut self, sfx: SfxName) {
        let sfx = SoundAction::StartSfx {
            uid: 0,
            sfx,
            x: 0.0,
            y: 0.0,
        };
        self.snd_command
            .send(sfx)
            .unwrap_or_else(|e| debug!("Sound channel closed: {e}"));
    }

    /// Doom function name `G_WorldDone`
    fn level_done(&mut self) {
        self.game_action = GameAction::WorldDone;
        if self.secret_exit {
            self.players[self.consoleplayer].didsecret = true;
        }
        if self.game_mode == GameMode::Commercial {
            if self.game_mission == GameMission::PackNerve {
                if self.game_map == 8 {
                    self.game_action = GameAction::Victory;
                }
                return;
            }
            match self.game_map {
                15 | 31 if !self.secret_exit => {}
                6 | 11 | 15 | 20 | 30 | 31 => self.game_action = GameAction::Victory,
                _ => {}
            }
        }
    }

    fn finale_done(&mut self) {
        self.game_action = GameAction::WorldDone;
    }

    fn level_end_info(&self) -> &WorldInfo {
        &self.wminfo
    }

    fn player_end_info(&self) -> &WBPlayerStruct {
        &self.wminfo.plyr[self.consoleplayer]
    }

    fn player_buttons(&self) -> [Option<PlayerButtons>; MAXPLAYERS] {
        std::array::from_fn(|i| {
            self.player_in_game[i].then(|| {
                let buttons = self.players[i].cmd.buttons;
                PlayerButtons {
                    attack: buttons & TIC_CMD_BUTTONS.bt_attack != 0,
                    use_: buttons & TIC_CMD_BUTTONS.bt_use != 0,
                }
            })
        })
    }

    fn player_msg_take(&mut self) -> Option<String> {
        self.players[self.consoleplayer].message.take()
    }
}
