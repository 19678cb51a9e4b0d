//! The scoreboard shown between levels. Nothing is drawn here, the ticker
//! runs the counters and timing so that a frontend can show them and the
//! game moves on at the right tic.

use gamestate_traits::{
    GameMode, GameTraits, MachinationTrait, PlayerButtons, TICRATE, WBPlayerStruct, WorldInfo,
};

mod loc_state;
mod no_state;
mod stat_state;

/// Seconds the "entering" screen stays up
const SHOW_NEXT_LOC_DELAY: i32 = 4;
const MAXPLAYERS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    StatCount,
    NextLoc,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatCounts {
    /// Percentages, -1 before they start counting
    pub kills: i32,
    pub items: i32,
    pub secret: i32,
    /// Seconds
    pub time: i32,
    pub par: i32,
}

impl Default for StatCounts {
    fn default() -> Self {
        Self {
            kills: -1,
            items: -1,
            secret: -1,
            time: -1,
            par: -1,
        }
    }
}

pub struct Intermission {
    mode: GameMode,
    state: State,
    // info copied at init
    player_info: WBPlayerStruct,
    level_info: WorldInfo,

    /// Tics since the intermission started
    bcnt: i32,
    /// Countdown for the loc and none states
    count: i32,
    /// Odd stages pause, even stages count up
    sp_state: i32,
    cnt_pause: i32,
    counts: StatCounts,

    accelerate: bool,
    attack_down: [bool; MAXPLAYERS],
    use_down: [bool; MAXPLAYERS],
    pointer_on: bool,
}

impl Intermission {
    pub fn new(mode: GameMode) -> Self {
        Self {
            mode,
            state: State::StatCount,
            player_info: WBPlayerStruct::default(),
            level_info: WorldInfo::default(),
            bcnt: 0,
            count: 0,
            sp_state: 1,
            cnt_pause: TICRATE,
            counts: StatCounts::default(),
            accelerate: false,
            attack_down: [false; MAXPLAYERS],
            use_down: [false; MAXPLAYERS],
            pointer_on: false,
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn counts(&self) -> StatCounts {
        self.counts
    }

    /// The "you are here" pointer blinks while showing the next location
    pub fn pointer_on(&self) -> bool {
        self.pointer_on
    }

    pub fn level_info(&self) -> &WorldInfo {
        &self.level_info
    }

    /// Any new press of attack or use skips ahead
    ///
    /// Doom function name `WI_checkForAccelerate`
    fn check_for_accelerate(&mut self, buttons: [Option<PlayerButtons>; MAXPLAYERS]) {
        for (i, b) in buttons.iter().enumerate() {
            let Some(b) = b else {
                continue;
            };
            if b.attack {
                if !self.attack_down[i] {
                    self.accelerate = true;
                }
                self.attack_down[i] = true;
            } else {
                self.attack_down[i] = false;
            }
            if b.use_ {
                if !self.use_down[i] {
                    self.accelerate = true;
                }
                self.use_down[i] = true;
            } else {
                self.use_down[i] = false;
            }
        }
    }
}

impl MachinationTrait for Intermission {
    /// Doom function name `WI_Start`
    fn init(&mut self, game: &impl GameTraits) {
        self.mode = game.get_mode();
        self.level_info = game.level_end_info().clone();
        self.player_info = game.player_end_info().clone();

        self.accelerate = false;
        self.bcnt = 0;
        self.count = 0;
        // avoid a divide by zero when working out percentages
        self.level_info.maxkills = self.level_info.maxkills.max(1);
        self.level_info.maxitems = self.level_info.maxitems.max(1);
        self.level_info.maxsecret = self.level_info.maxsecret.max(1);
        if self.mode != GameMode::Retail && self.level_info.epsd > 2 {
            self.level_info.epsd -= 3;
        }

        self.init_stats();
    }

    /// Doom function name `WI_Ticker`
    fn ticker(&mut self, game: &mut impl GameTraits) -> bool {
        self.bcnt += 1;
        self.check_for_accelerate(game.player_buttons());

        match self.state {
            State::StatCount => self.update_stats(game),
            State::NextLoc => self.update_show_next_loc(),
            State::None => return self.update_no_state(game),
        }
        true
    }

    fn end(&mut self, _game: &mut impl GameTraits) {
        self.attack_down = [false; MAXPLAYERS];
        self.use_down = [false; MAXPLAYERS];
    }
}

#[cfg(test)]
mod tests {
    use gamestate_traits::test_utils::FakeGame;
    use gamestate_traits::{GameMode, MachinationTrait, SfxName, TICRATE};

    use crate::{Intermission, State};

    fn finished_e1m2() -> FakeGame {
        let mut game = FakeGame::new(GameMode::Registered, 1, 2);
        game.info.epsd = 0;
        game.info.last = 1;
        game.info.next = 2;
        game.info.maxkills = 10;
        game.info.maxitems = 4;
        game.info.maxsecret = 0;
        game.info.partime = 75 * TICRATE;
        game.info.plyr[0].inn = true;
        game.info.plyr[0].skills = 5;
        game.info.plyr[0].sitems = 4;
        game.info.plyr[0].stime = 40 * TICRATE as u32;
        game
    }

    fn run_until_state(wi: &mut Intermission, game: &mut FakeGame, state: State) -> usize {
        for tic in 0..2000 {
            if wi.state() == state {
                return tic;
            }
            wi.ticker(game);
        }
        panic!("never reached {state:?}");
    }

    #[test]
    fn counts_up_to_totals() {
        let mut game = finished_e1m2();
        let mut wi = Intermission::new(GameMode::Registered);
        wi.init(&game);
        assert_eq!(wi.counts().kills, -1);

        // a second of nothing first
        for _ in 0..TICRATE {
            wi.ticker(&mut game);
        }
        assert_eq!(wi.counts().kills, -1);
        wi.ticker(&mut game);
        assert_eq!(wi.counts().kills, 1);

        for _ in 0..400 {
            wi.ticker(&mut game);
        }
        let counts = wi.counts();
        assert_eq!(counts.kills, 50);
        assert_eq!(counts.items, 100);
        assert_eq!(counts.secret, 0);
        assert_eq!(counts.time, 40);
        assert_eq!(counts.par, 75);
        // waits on a button once all stats are shown
        assert_eq!(wi.state(), State::StatCount);
        assert!(game.sounds.contains(&SfxName::Pistol));
        assert!(game.sounds.contains(&SfxName::Barexp));
        assert_eq!(game.level_done, 0);
    }

    #[test]
    fn buttons_skip_to_level_done() {
        let mut game = finished_e1m2();
        let mut wi = Intermission::new(GameMode::Registered);
        wi.init(&game);

        game.press_attack(true);
        wi.ticker(&mut game);
        assert_eq!(wi.counts().kills, 50);
        assert_eq!(wi.counts().time, 40);

        // holding doesn't count as another press
        wi.ticker(&mut game);
        assert_eq!(wi.state(), State::StatCount);

        game.press_attack(false);
        wi.ticker(&mut game);
        game.press_use(true);
        wi.ticker(&mut game);
        assert_eq!(wi.state(), State::NextLoc);
        assert_eq!(game.sounds.last(), Some(&SfxName::Sgcock));

        game.press_use(false);
        wi.ticker(&mut game);
        game.press_use(true);
        wi.ticker(&mut game);
        assert_eq!(wi.state(), State::None);

        for _ in 0..9 {
            assert!(wi.ticker(&mut game));
        }
        assert_eq!(game.level_done, 0);
        assert!(!wi.ticker(&mut game));
        assert_eq!(game.level_done, 1);
    }

    #[test]
    fn next_location_times_out() {
        let mut game = finished_e1m2();
        let mut wi = Intermission::new(GameMode::Registered);
        wi.init(&game);
        game.press_attack(true);
        wi.ticker(&mut game);
        game.press_attack(false);
        wi.ticker(&mut game);
        game.press_attack(true);
        wi.ticker(&mut game);
        game.press_attack(false);
        assert_eq!(wi.state(), State::NextLoc);

        let tics = run_until_state(&mut wi, &mut game, State::None);
        assert_eq!(tics as i32, 4 * TICRATE);
    }

    #[test]
    fn commercial_skips_next_location() {
        let mut game = finished_e1m2();
        game.mode = GameMode::Commercial;
        let mut wi = Intermission::new(GameMode::Commercial);
        wi.init(&game);
        game.press_attack(true);
        wi.ticker(&mut game);
        game.press_attack(false);
        wi.ticker(&mut game);
        game.press_attack(true);
        wi.ticker(&mut game);
        assert_eq!(wi.state(), State::None);

        for _ in 0..TICRATE - 1 {
            wi.ticker(&mut game);
        }
        assert_eq!(game.level_done, 0);
        wi.ticker(&mut game);
        assert_eq!(game.level_done, 1);
    }

    #[test]
    fn zero_totals_are_safe() {
        let mut game = finished_e1m2();
        game.info.maxkills = 0;
        game.info.plyr[0].skills = 0;
        let mut wi = Intermission::new(GameMode::Registered);
        wi.init(&game);
        assert_eq!(wi.level_info().maxkills, 1);
        game.press_use(true);
        wi.ticker(&mut game);
        assert_eq!(wi.counts().kills, 0);
    }
}
