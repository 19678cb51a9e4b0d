//! Save game files. The byte layout lives in `gameplay::save`, this is the
//! part that knows about files and the rest of the game.

use std::fs;
use std::path::{Path, PathBuf};

use gameplay::GameAction;
use gameplay::english;
use gameplay::log::{info, warn};
use gameplay::save::{
    SaveError, SaveHeader, SaveReader, SaveWriter, archive_level, unarchive_level,
};

use crate::{Game, GameError};

impl Game {
    /// `doomsav<slot>.dsg` in the save directory
    pub fn save_file_path(&self, slot: usize) -> PathBuf {
        self.options.save_dir.join(format!("doomsav{slot}.dsg"))
    }

    fn temp_save_file_path(&self) -> PathBuf {
        self.options.save_dir.join("temp.dsg")
    }

    /// Is the save at `path` for the map being played? Used to decide if a
    /// quicksave can be reloaded after dying.
    ///
    /// Doom function name `G_CheckSaveGame`
    pub fn check_save_game(&self, path: &Path) -> bool {
        let Ok(data) = fs::read(path) else {
            return false;
        };
        let Ok(header) = SaveHeader::read(&mut SaveReader::new(&data)) else {
            return false;
        };
        header.mission == self.game_mission
            && header.episode == self.game_episode
            && header.map == self.game_map
    }

    /// Write the level to `temp.dsg` then swap it in as the slot's file, so a
    /// failed save never clobbers a good one.
    ///
    /// Doom function name `G_DoSaveGame`
    pub(crate) fn do_save_game(&mut self) -> Result<(), GameError> {
        self.game_action = GameAction::None;
        let Some(level) = self.level.as_ref() else {
            warn!("Game: not in a level, nothing to save");
            return Ok(());
        };

        let header = SaveHeader {
            description: self.save_description.clone(),
            skill: self.game_skill,
            episode: self.game_episode,
            map: self.game_map,
            mission: self.game_mission,
            player_in_game: self.player_in_game,
            level_time: level.level_time,
        };
        let mut w = SaveWriter::new();
        header.write(&mut w);
        archive_level(&mut w, level, &self.players, &self.player_in_game);
        let data = w.finish().map_err(|e| match e {
            SaveError::Overrun(size) => GameError::SaveOverrun(size),
            e => GameError::BadSave(e),
        })?;

        let temp = self.temp_save_file_path();
        let target = self.save_file_path(self.save_slot);
        let written = fs::create_dir_all(&self.options.save_dir)
            .and_then(|_| fs::write(&temp, &data))
            .and_then(|_| fs::rename(&temp, &target));
        if let Err(e) = written {
            warn!("Game: could not write {}: {e}", target.display());
            return Ok(());
        }

        info!("Saved {} bytes to {}", data.len(), target.display());
        self.players[self.consoleplayer].message = Some(format!(
            "\"{}\" {}",
            self.save_description,
            english::GGSAVED
        ));
        self.save_description.clear();
        Ok(())
    }

    /// Load the save named by the last `load_game`. Returns false if the file
    /// couldn't be used, in which case nothing has changed. Damage found after
    /// the header is fatal as the level is already half restored.
    ///
    /// Doom function name `G_DoLoadGame`
    pub(crate) fn do_load_game(&mut self) -> Result<bool, GameError> {
        self.game_action = GameAction::None;

        let data = match fs::read(&self.save_name) {
            Ok(data) => data,
            Err(e) => {
                warn!("Game: could not read {}: {e}", self.save_name.display());
                return Ok(false);
            }
        };
        let mut r = SaveReader::new(&data);
        let header = match SaveHeader::read(&mut r) {
            Ok(header) => header,
            Err(e) => {
                warn!("Game: {}: {e}", self.save_name.display());
                return Ok(false);
            }
        };

        self.game_skill = header.skill;
        self.game_episode = header.episode;
        self.game_map = header.map;
        self.player_in_game = header.player_in_game;

        // load a base level
        self.init_new()?;

        if let Some(level) = self.level.as_mut() {
            level.level_time = header.level_time;
            // dearchive all the modifications
            unarchive_level(&mut r, level, &mut self.players, &self.player_in_game)
                .map_err(GameError::BadSave)?;
            r.read_eof().map_err(GameError::BadSave)?;
        }

        info!(
            "Loaded \"{}\" from {}",
            header.description,
            self.save_name.display()
        );
        Ok(true)
    }
}
