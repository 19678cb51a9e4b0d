//! The end of episode text crawl. Only the timing lives here; a frontend
//! asks for `text_shown()` and `background()` to draw it.

mod text;

use crate::text::*;
use gamestate_traits::{GameMission, GameMode, GameTraits, MachinationTrait};
use log::{debug, info};

/// Tics per character of the crawl
const TEXTSPEED: usize = 3;
/// Tics the full text stays up before the art screen
const TEXTWAIT: usize = 250;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Text,
    ArtScreen,
    /// Doom II's cast call after map 30
    Cast,
}

pub struct Finale {
    mode: GameMode,
    stage: Stage,
    count: usize,
    map: i32,
    text: &'static str,
    background: &'static str,
}

impl Default for Finale {
    fn default() -> Self {
        Self::new()
    }
}

impl Finale {
    pub fn new() -> Self {
        Self {
            mode: GameMode::Shareware,
            stage: Stage::Text,
            count: 0,
            map: 0,
            text: "",
            background: "FLOOR4_8",
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// The part of the text crawled out so far
    pub fn text_shown(&self) -> &str {
        let chars = self.count / TEXTSPEED;
        match self.text.char_indices().nth(chars) {
            Some((end, _)) => &self.text[..end],
            None => self.text,
        }
    }

    /// Flat tiled behind the text
    pub fn background(&self) -> &str {
        self.background
    }

    fn commercial_text(mission: GameMission, map: i32) -> Option<(&'static str, &'static str)> {
        let texts = match mission {
            GameMission::PackPlut => [P1TEXT, P2TEXT, P3TEXT, P4TEXT, P5TEXT, P6TEXT],
            GameMission::PackTnt => [T1TEXT, T2TEXT, T3TEXT, T4TEXT, T5TEXT, T6TEXT],
            _ => [C1TEXT, C2TEXT, C3TEXT, C4TEXT, C5TEXT, C6TEXT],
        };
        let (idx, flat) = match map {
            6 => (0, "SLIME16"),
            11 => (1, "RROCK14"),
            20 => (2, "RROCK07"),
            30 => (3, "RROCK17"),
            15 => (4, "RROCK13"),
            31 => (5, "RROCK19"),
            _ => return None,
        };
        Some((texts[idx], flat))
    }
}

impl MachinationTrait for Finale {
    /// Doom function name `F_StartFinale`
    fn init(&mut self, game: &impl GameTraits) {
        self.mode = game.get_mode();
        self.map = game.get_map();
        self.stage = Stage::Text;
        self.count = 0;

        let (text, flat) = if self.mode == GameMode::Commercial {
            Self::commercial_text(game.get_mission(), self.map).unwrap_or(("", "FLOOR4_8"))
        } else {
            match game.get_episode() {
                2 => (E2TEXT, "SFLR6_1"),
                3 => (E3TEXT, "MFLR8_4"),
                4 => (E4TEXT, "MFLR8_3"),
                _ => (E1TEXT, "FLOOR4_8"),
            }
        };
        self.text = text;
        self.background = flat;
        info!("Finale for map {}, background {flat}", self.map);
        debug!("{text}");
    }

    /// Doom function name `F_Ticker`
    fn ticker(&mut self, game: &mut impl GameTraits) -> bool {
        // check for skipping
        if self.mode == GameMode::Commercial && self.count > 50 {
            let pressed = game
                .player_buttons()
                .iter()
                .flatten()
                .any(|b| b.attack || b.use_);
            if pressed {
                if self.map == 30 {
                    if self.stage != Stage::Cast {
                        info!("Starting the cast call");
                    }
                    self.stage = Stage::Cast;
                } else {
                    // go on to the next level
                    game.finale_done();
                    return false;
                }
            }
        }

        self.count += 1;
        if self.stage == Stage::Cast || self.mode == GameMode::Commercial {
            return true;
        }

        if self.stage == Stage::Text && self.count > self.text.len() * TEXTSPEED + TEXTWAIT {
            self.count = 0;
            self.stage = Stage::ArtScreen;
            info!("Finale text done, showing the art screen");
        }
        true
    }
}
