pub const FORWARDMOVE: [i32; 2] = [0x19, 0x32];
pub const SIDEMOVE: [i32; 2] = [0x18, 0x28];
pub const ANGLETURN: [i16; 3] = [640, 1280, 320]; // + slow turn

pub const MAXPLMOVE: i32 = FORWARDMOVE[1];

pub const SLOWTURNTICS: i32 = 6;

/// `forwardmove` above this in a netgame or demo means the player is using
/// the turbo switch
pub const TURBOTHRESHOLD: i8 = 0x32;

pub struct ButtonCode {
    // Press "Fire".
    pub bt_attack: u8,
    // Use button, to open doors, activate switches.
    pub bt_use: u8,

    // Flag: game events, not really buttons.
    pub bt_special: u8,
    pub bt_specialmask: u8,

    // Flag, weapon change pending.
    // If true, the next 3 bits hold weapon num.
    pub bt_change: u8,
    // The 3bit weapon mask and shift, convenience.
    pub bt_weaponmask: u8,
    pub bt_weaponshift: u8,

    // Pause the game.
    pub bts_pause: u8,
    // Save the game at each console.
    pub bts_savegame: u8,

    // Savegame slot numbers
    //  occupy the second byte of buttons.
    pub bts_savemask: u8,
    pub bts_saveshift: u8,
}

pub const TIC_CMD_BUTTONS: ButtonCode = ButtonCode {
    bt_attack: 1,
    bt_use: 2,

    bt_special: 128,
    bt_specialmask: 3,

    bt_change: 4,
    bt_weaponmask: (8 + 16 + 32),
    bt_weaponshift: 3,

    bts_pause: 1,
    bts_savegame: 2,

    bts_savemask: (4 + 8 + 16),
    bts_saveshift: 2,
};

/// The data sampled per tick (single player)
/// and transmitted to other peers (multiplayer).
/// Mainly movements/button commands per game tick,
/// plus a checksum for internal state consistency.
// G_BuildTiccmd
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct TicCmd {
    /// *2048 for move
    pub forwardmove: i8,
    /// *2048 for move
    pub sidemove: i8,
    /// <<16 for angle delta
    pub angleturn: i16,
    /// checks for net game
    pub consistancy: i16,
    pub chatchar: u8,
    pub buttons: u8,
}

impl TicCmd {
    pub const fn new() -> Self {
        TicCmd {
            forwardmove: 0,
            sidemove: 0,
            angleturn: 0,
            consistancy: 0,
            chatchar: 0,
            buttons: 0,
        }
    }

    /// True if this command carries a game event rather than buttons
    pub const fn is_special(&self) -> bool {
        self.buttons & TIC_CMD_BUTTONS.bt_special != 0
    }

    /// The requested weapon slot, if `BT_CHANGE` is set and it is not a
    /// special command
    pub const fn weapon_change(&self) -> Option<u8> {
        if self.is_special() || self.buttons & TIC_CMD_BUTTONS.bt_change == 0 {
            return None;
        }
        Some((self.buttons & TIC_CMD_BUTTONS.bt_weaponmask) >> TIC_CMD_BUTTONS.bt_weaponshift)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weapon_bits() {
        let mut cmd = TicCmd::new();
        assert_eq!(cmd.weapon_change(), None);
        cmd.buttons = TIC_CMD_BUTTONS.bt_change | (5 << TIC_CMD_BUTTONS.bt_weaponshift);
        assert_eq!(cmd.weapon_change(), Some(5));
        cmd.buttons |= TIC_CMD_BUTTONS.bt_special;
        assert_eq!(cmd.weapon_change(), None);
    }
}
