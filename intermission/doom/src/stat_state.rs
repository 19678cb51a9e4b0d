use gamestate_traits::{GameMode, GameTraits, SfxName, TICRATE};

use crate::{Intermission, State, StatCounts};

/// Stage the stat counter sits in once everything is shown
const STATS_DONE: i32 = 10;

impl Intermission {
    /// Doom function name `WI_initStats`
    pub(super) fn init_stats(&mut self) {
        self.state = State::StatCount;
        self.accelerate = false;
        self.sp_state = 1;
        self.counts = StatCounts::default();
        self.cnt_pause = TICRATE;
    }

    fn percent(count: i32, max: i32) -> i32 {
        count * 100 / max
    }

    fn final_counts(&self) -> StatCounts {
        let p = &self.player_info;
        let l = &self.level_info;
        StatCounts {
            kills: Self::percent(p.skills, l.maxkills).min(100),
            items: Self::percent(p.sitems, l.maxitems).min(100),
            secret: Self::percent(p.ssecret, l.maxsecret).min(100),
            time: p.stime as i32 / TICRATE,
            par: l.partime / TICRATE,
        }
    }

    /// Each even stage counts one stat up 2% a tic with a pistol shot every
    /// fourth tic, odd stages are a second's pause.
    ///
    /// Doom function name `WI_updateStats`
    pub(super) fn update_stats(&mut self, game: &mut impl GameTraits) {
        let target = self.final_counts();

        if self.accelerate && self.sp_state != STATS_DONE {
            self.accelerate = false;
            self.counts = target;
            game.start_sound(SfxName::Barexp);
            self.sp_state = STATS_DONE;
        }

        let tick_sound = self.bcnt & 3 == 0;
        match self.sp_state {
            2 => {
                self.counts.kills += 2;
                if tick_sound {
                    game.start_sound(SfxName::Pistol);
                }
                if self.counts.kills >= target.kills {
                    self.counts.kills = target.kills;
                    game.start_sound(SfxName::Barexp);
                    self.sp_state += 1;
                }
            }
            4 => {
                self.counts.items += 2;
                if tick_sound {
                    game.start_sound(SfxName::Pistol);
                }
                if self.counts.items >= target.items {
                    self.counts.items = target.items;
                    game.start_sound(SfxName::Barexp);
                    self.sp_state += 1;
                }
            }
            6 => {
                self.counts.secret += 2;
                if tick_sound {
                    game.start_sound(SfxName::Pistol);
                }
                if self.counts.secret >= target.secret {
                    self.counts.secret = target.secret;
                    game.start_sound(SfxName::Barexp);
                    self.sp_state += 1;
                }
            }
            8 => {
                if tick_sound {
                    game.start_sound(SfxName::Pistol);
                }
                self.counts.time = (self.counts.time + 3).min(target.time);
                self.counts.par += 3;
                if self.counts.par >= target.par {
                    self.counts.par = target.par;
                    if self.counts.time >= target.time {
                        game.start_sound(SfxName::Barexp);
                        self.sp_state += 1;
                    }
                }
            }
            STATS_DONE => {
                if self.accelerate {
                    game.start_sound(SfxName::Sgcock);
                    if self.mode == GameMode::Commercial {
                        self.init_no_state();
                    } else {
                        self.init_next_loc();
                    }
                }
            }
            _ => {
                self.cnt_pause -= 1;
                if self.cnt_pause == 0 {
                    self.sp_state += 1;
                    self.cnt_pause = TICRATE;
                }
            }
        }
    }
}
