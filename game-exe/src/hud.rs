//! Player messages. With no screen to draw them on they go to the log, and
//! the last few are kept for the time they would have been shown.

use std::collections::VecDeque;

use gamestate_traits::{GameTraits, MachinationTrait, TICRATE};
use gameplay::log::info;

const COUNT_DOWN: i32 = 2 * TICRATE;
const MAX_LINES: usize = 4;

#[derive(Debug)]
pub struct Messages {
    lines: VecDeque<String>,
    count_down: i32,
}

impl Messages {
    pub fn new() -> Self {
        Self {
            lines: VecDeque::with_capacity(MAX_LINES),
            count_down: COUNT_DOWN,
        }
    }

    pub fn add_line(&mut self, line: String) {
        if self.lines.len() == MAX_LINES {
            self.lines.pop_front();
        }
        info!("{line}");
        self.lines.push_back(line);
        self.count_down = COUNT_DOWN;
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }
}

impl MachinationTrait for Messages {
    fn init(&mut self, _game: &impl GameTraits) {
        self.lines.clear();
    }

    fn ticker(&mut self, game: &mut impl GameTraits) -> bool {
        if let Some(msg) = game.player_msg_take() {
            self.add_line(msg.to_ascii_uppercase());
        }
        self.count_down -= 1;
        if self.count_down <= 0 {
            self.count_down = COUNT_DOWN;
            self.lines.clear();
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use gamestate_traits::test_utils::FakeGame;
    use gamestate_traits::{GameMode, MachinationTrait, TICRATE};

    use super::Messages;

    #[test]
    fn messages_expire() {
        let mut game = FakeGame::new(GameMode::Shareware, 1, 1);
        let mut hud = Messages::new();
        game.message = Some("Picked up a clip.".to_string());
        hud.ticker(&mut game);
        assert_eq!(hud.lines().collect::<Vec<_>>(), vec!["PICKED UP A CLIP."]);
        assert!(game.message.is_none());

        for _ in 0..2 * TICRATE - 1 {
            hud.ticker(&mut game);
        }
        assert_eq!(hud.lines().count(), 0);
    }

    #[test]
    fn keeps_last_four() {
        let mut hud = Messages::new();
        for i in 0..6 {
            hud.add_line(format!("{i}"));
        }
        assert_eq!(hud.lines().collect::<Vec<_>>(), vec!["2", "3", "4", "5"]);
    }
}
