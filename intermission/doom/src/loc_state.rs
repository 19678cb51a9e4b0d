use gamestate_traits::TICRATE;

use crate::{Intermission, SHOW_NEXT_LOC_DELAY, State};

impl Intermission {
    /// Doom function name `WI_initShowNextLoc`
    pub(super) fn init_next_loc(&mut self) {
        self.state = State::NextLoc;
        self.accelerate = false;
        self.count = SHOW_NEXT_LOC_DELAY * TICRATE;
    }

    /// Doom function name `WI_updateShowNextLoc`
    pub(super) fn update_show_next_loc(&mut self) {
        self.count -= 1;
        if self.count == 0 || self.accelerate {
            self.init_no_state();
        } else {
            self.pointer_on = (self.count & 31) < 20;
        }
    }
}
