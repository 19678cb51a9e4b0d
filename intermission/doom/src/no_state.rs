use gamestate_traits::{GameMode, GameTraits, TICRATE};
use log::info;

use crate::{Intermission, State};

impl Intermission {
    /// Doom function name `WI_initNoState`
    pub(super) fn init_no_state(&mut self) {
        self.state = State::None;
        self.accelerate = false;
        self.pointer_on = true;
        self.count = if self.mode == GameMode::Commercial {
            TICRATE
        } else {
            10
        };
    }

    /// Returns false once the game has been told to move on
    pub(super) fn update_no_state(&mut self, game: &mut impl GameTraits) -> bool {
        self.count -= 1;
        if self.count != 0 {
            return true;
        }

        let player = &self.player_info;
        let level = &self.level_info;
        info!("Player: Total Items: {}/{}", player.sitems, level.maxitems);
        info!("Player: Total Kills: {}/{}", player.skills, level.maxkills);
        info!(
            "Player: Total Secrets: {}/{}",
            player.ssecret, level.maxsecret
        );
        info!("Player: Level Time: {}", player.stime);
        game.level_done();
        false
    }
}
