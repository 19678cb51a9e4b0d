//! All input handling. The output is generally a `TicCmd` used to run
//! inputs in the `Game` in a generalised way.
//!
//! Nothing here knows about a window. A backend turns whatever it polls into
//! `InputEvent`s and hands them to `Input::update`.
//!
//! Also does config options for controls.

pub mod config;

use std::collections::hash_set::HashSet;

use config::{InputConfig, Key, MouseButton, WEAPON_KEYS};
use gameplay::tic_cmd::*;

/// What a backend reports
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    KeyDown(Key),
    KeyUp(Key),
    MouseDown(MouseButton),
    MouseUp(MouseButton),
    MouseMotion { xrel: i32, yrel: i32 },
    Quit,
}

#[derive(Debug, Default, Clone)]
pub struct InputEvents {
    key_state: HashSet<Key>,
    mouse_state: HashSet<MouseButton>,
    mouse_delta: (i32, i32),
    mouse_sensitivity: (i32, i32),
    mouse_threshold: f32,
    mouse_acceleration: f32,
    turn_held: i32,
    weapon_keys_held: [bool; WEAPON_KEYS.len()],
    send_pause: bool,
    send_save: Option<u8>,
    ticdup: i32,
}

impl InputEvents {
    pub fn new(mouse_scale: (i32, i32)) -> Self {
        let mut i = Self::default();
        i.set_mouse_scale(mouse_scale);
        i.mouse_threshold = 10.0;
        i.mouse_acceleration = 2.0;
        i.ticdup = 1;
        i
    }

    pub fn is_kb_pressed(&self, s: Key) -> bool {
        self.key_state.contains(&s)
    }

    pub fn keys_pressed(&self) -> &HashSet<Key> {
        &self.key_state
    }

    pub fn is_mb_pressed(&self, m: MouseButton) -> bool {
        self.mouse_state.contains(&m)
    }

    pub fn set_kb(&mut self, b: Key) {
        self.key_state.insert(b);
    }

    pub fn unset_kb(&mut self, b: Key) {
        self.key_state.remove(&b);
    }

    pub fn set_mb(&mut self, b: MouseButton) {
        self.mouse_state.insert(b);
    }

    pub fn unset_mb(&mut self, b: MouseButton) {
        self.mouse_state.remove(&b);
    }

    pub fn set_mouse_scale(&mut self, scale: (i32, i32)) {
        self.mouse_sensitivity = scale;
    }

    /// Tics each command is run for
    pub fn set_ticdup(&mut self, ticdup: i32) {
        self.ticdup = ticdup.max(1);
    }

    /// The next command asks every player's game to pause
    pub fn send_pause(&mut self) {
        self.send_pause = true;
    }

    /// The next command asks every player's game to save to `slot`
    pub fn send_save(&mut self, slot: u8) {
        self.send_save = Some(slot);
    }

    fn reset_mouse_delta(&mut self) {
        self.mouse_delta = (0, 0);
    }

    fn apply_mouse_sensitivity(&mut self, state: (i32, i32)) {
        self.mouse_delta = (
            self.mouse_delta.0 + state.0 * (self.mouse_sensitivity.0 + 5),
            self.mouse_delta.1 + state.1 * (self.mouse_sensitivity.1 + 5),
        );
    }

    fn apply_mouse_accel(&self, val: f32) -> f32 {
        if val < 0.0 {
            return -self.apply_mouse_accel(-val);
        }

        if val > self.mouse_threshold {
            (val - self.mouse_threshold) * self.mouse_acceleration + self.mouse_threshold
        } else {
            val
        }
    }

    /// Doom function name `G_BuildTiccmd`. The consistency value is the
    /// game's to fill in.
    pub fn build_tic_cmd(&mut self, cfg: &InputConfig) -> TicCmd {
        let mut cmd = TicCmd::new();

        let strafe = self.is_kb_pressed(cfg.key_strafe) || self.is_mb_pressed(cfg.mousebstrafe);
        let speed = if self.is_kb_pressed(cfg.key_speed) {
            1
        } else {
            0
        };

        let mut side = 0;
        let mut forward = 0;

        let turn_right = self.is_kb_pressed(cfg.key_right);
        let turn_left = self.is_kb_pressed(cfg.key_left);

        // use two stage accelerative turning on the keyboard
        if turn_left || turn_right {
            self.turn_held += self.ticdup;
        } else {
            self.turn_held = 0;
        }

        let turn_speed = if self.turn_held < SLOWTURNTICS {
            2
        } else {
            speed
        };

        if strafe {
            if turn_right {
                side += SIDEMOVE[speed];
            }
            if turn_left {
                side -= SIDEMOVE[speed];
            }
        } else {
            if turn_right {
                cmd.angleturn -= ANGLETURN[turn_speed];
            }
            if turn_left {
                cmd.angleturn += ANGLETURN[turn_speed];
            }
        }

        if self.is_kb_pressed(cfg.key_up) {
            forward += FORWARDMOVE[speed];
        }

        if self.is_kb_pressed(cfg.key_down) {
            forward -= FORWARDMOVE[speed];
        }

        if self.is_kb_pressed(cfg.key_straferight) {
            side += SIDEMOVE[speed];
        }

        if self.is_kb_pressed(cfg.key_strafeleft) {
            side -= SIDEMOVE[speed];
        }

        if self.is_kb_pressed(cfg.key_fire) || self.is_mb_pressed(cfg.mousebfire) {
            cmd.buttons |= TIC_CMD_BUTTONS.bt_attack;
        }

        if self.is_kb_pressed(cfg.key_use) {
            cmd.buttons |= TIC_CMD_BUTTONS.bt_use;
        }

        // One change per press, holding a key doesn't repeat it. A second
        // fresh press waits for the next tic.
        let mut change = None;
        for (i, key) in WEAPON_KEYS.iter().enumerate() {
            if !self.is_kb_pressed(*key) {
                self.weapon_keys_held[i] = false;
            } else if !self.weapon_keys_held[i] && change.is_none() {
                self.weapon_keys_held[i] = true;
                change = Some(i);
            }
        }
        if let Some(i) = change {
            cmd.buttons |= TIC_CMD_BUTTONS.bt_change;
            cmd.buttons |= (i as u8) << TIC_CMD_BUTTONS.bt_weaponshift;
        }

        // Mouse
        if self.is_mb_pressed(cfg.mousebforward) {
            forward += FORWARDMOVE[speed];
        }

        let mousex = self.mouse_delta.0;

        forward += -self.mouse_delta.1;
        if strafe {
            side += mousex * 2;
        } else {
            cmd.angleturn = cmd.angleturn.wrapping_sub((mousex * 0x8) as i16);
        }
        self.reset_mouse_delta();

        forward = forward.clamp(-MAXPLMOVE, MAXPLMOVE);
        side = side.clamp(-MAXPLMOVE, MAXPLMOVE);

        cmd.forwardmove += forward as i8;
        cmd.sidemove += side as i8;

        // special buttons
        if self.send_pause {
            self.send_pause = false;
            cmd.buttons = TIC_CMD_BUTTONS.bt_special | TIC_CMD_BUTTONS.bts_pause;
        }

        if let Some(slot) = self.send_save.take() {
            cmd.buttons = TIC_CMD_BUTTONS.bt_special
                | TIC_CMD_BUTTONS.bts_savegame
                | (slot << TIC_CMD_BUTTONS.bts_saveshift);
        }

        cmd
    }
}

/// Holds the input state between tics
pub struct Input {
    pub events: InputEvents,
    pub config: InputConfig,
    quit: bool,
}

impl Input {
    pub fn new(config: InputConfig) -> Input {
        Input {
            events: InputEvents::new(config.mouse_sensitivity),
            config,
            quit: false,
        }
    }

    /// Feed this frame's events in. Key state persists until the key is
    /// released, so a held key keeps showing in every `TicCmd` built.
    ///
    /// `input_callback` is offered each key-down first. If it returns true
    /// the key was taken (by a menu for example) and isn't recorded as held.
    /// The pause key is turned in to a pause request here.
    pub fn update(
        &mut self,
        events: impl IntoIterator<Item = InputEvent>,
        mut input_callback: impl FnMut(Key) -> bool,
    ) {
        for event in events {
            match event {
                InputEvent::KeyDown(key) => {
                    if input_callback(key) {
                        self.events.unset_kb(key);
                    } else if key == self.config.key_pause {
                        self.events.send_pause();
                    } else {
                        self.events.set_kb(key);
                    }
                }
                InputEvent::KeyUp(key) => self.events.unset_kb(key),
                InputEvent::MouseDown(b) => self.events.set_mb(b),
                InputEvent::MouseUp(b) => self.events.unset_mb(b),
                InputEvent::MouseMotion { xrel, yrel } => {
                    let xrel = self.events.apply_mouse_accel(xrel as f32) as i32;
                    let yrel = self.events.apply_mouse_accel(yrel as f32) as i32;
                    self.events.apply_mouse_sensitivity((xrel, yrel));
                }
                InputEvent::Quit => self.quit = true,
            }
        }
    }

    pub fn build_tic_cmd(&mut self) -> TicCmd {
        self.events.build_tic_cmd(&self.config)
    }

    pub fn get_quit(&self) -> bool {
        self.quit
    }
}

#[cfg(test)]
mod tests {
    use gameplay::tic_cmd::{ANGLETURN, FORWARDMOVE, MAXPLMOVE, SIDEMOVE, TIC_CMD_BUTTONS};

    use crate::config::{InputConfig, Key, MouseButton};
    use crate::{Input, InputEvent};

    fn input() -> Input {
        Input::new(InputConfig::default())
    }

    #[test]
    fn walk_and_run() {
        let mut i = input();
        i.update([InputEvent::KeyDown(Key::W)], |_| false);
        assert_eq!(i.build_tic_cmd().forwardmove as i32, FORWARDMOVE[0]);
        i.update([InputEvent::KeyDown(Key::LShift)], |_| false);
        assert_eq!(i.build_tic_cmd().forwardmove as i32, FORWARDMOVE[1]);
        i.update([InputEvent::KeyDown(Key::D)], |_| false);
        assert_eq!(i.build_tic_cmd().sidemove as i32, SIDEMOVE[1]);
        i.update([InputEvent::KeyUp(Key::W), InputEvent::KeyUp(Key::D)], |_| false);
        let cmd = i.build_tic_cmd();
        assert_eq!(cmd.forwardmove, 0);
        assert_eq!(cmd.sidemove, 0);
    }

    #[test]
    fn slow_turn_then_fast() {
        let mut i = input();
        i.update([InputEvent::KeyDown(Key::Left)], |_| false);
        for _ in 0..5 {
            assert_eq!(i.build_tic_cmd().angleturn, ANGLETURN[2]);
        }
        // turn_held reached SLOWTURNTICS, walking speed now
        assert_eq!(i.build_tic_cmd().angleturn, ANGLETURN[0]);
        i.update([InputEvent::KeyUp(Key::Left)], |_| false);
        assert_eq!(i.build_tic_cmd().angleturn, 0);
        i.update([InputEvent::KeyDown(Key::Right)], |_| false);
        assert_eq!(i.build_tic_cmd().angleturn, -ANGLETURN[2]);
    }

    #[test]
    fn strafe_turns_into_side() {
        let mut i = input();
        i.update(
            [InputEvent::KeyDown(Key::RAlt), InputEvent::KeyDown(Key::Right)],
            |_| false,
        );
        let cmd = i.build_tic_cmd();
        assert_eq!(cmd.angleturn, 0);
        assert_eq!(cmd.sidemove as i32, SIDEMOVE[0]);
    }

    #[test]
    fn mouse_motion_used_once() {
        let mut i = input();
        i.update([InputEvent::MouseMotion { xrel: 1, yrel: 0 }], |_| false);
        // sensitivity 5 + 5
        assert_eq!(i.build_tic_cmd().angleturn, -10 * 8);
        assert_eq!(i.build_tic_cmd().angleturn, 0);

        i.update([InputEvent::MouseMotion { xrel: 0, yrel: -100 }], |_| false);
        assert_eq!(i.build_tic_cmd().forwardmove as i32, MAXPLMOVE);

        i.update(
            [
                InputEvent::MouseDown(MouseButton::Middle),
                InputEvent::MouseMotion { xrel: -100, yrel: 0 },
            ],
            |_| false,
        );
        let cmd = i.build_tic_cmd();
        assert_eq!(cmd.sidemove as i32, -MAXPLMOVE);
        assert_eq!(cmd.angleturn, 0);
    }

    #[test]
    fn buttons() {
        let mut i = input();
        i.update(
            [
                InputEvent::KeyDown(Key::Space),
                InputEvent::MouseDown(MouseButton::Left),
            ],
            |_| false,
        );
        let cmd = i.build_tic_cmd();
        assert_eq!(
            cmd.buttons,
            TIC_CMD_BUTTONS.bt_use | TIC_CMD_BUTTONS.bt_attack
        );
    }

    #[test]
    fn weapon_key_changes_once() {
        let mut i = input();
        i.update([InputEvent::KeyDown(Key::Num3)], |_| false);
        let cmd = i.build_tic_cmd();
        assert_eq!(cmd.weapon_change(), Some(2));
        assert_eq!(i.build_tic_cmd().buttons, 0);
        i.update([InputEvent::KeyUp(Key::Num3)], |_| false);
        assert_eq!(i.build_tic_cmd().buttons, 0);
        i.update([InputEvent::KeyDown(Key::Num1)], |_| false);
        assert_eq!(i.build_tic_cmd().weapon_change(), Some(0));
    }

    #[test]
    fn second_weapon_key_while_holding_first() {
        let mut i = input();
        i.update([InputEvent::KeyDown(Key::Num2)], |_| false);
        assert_eq!(i.build_tic_cmd().weapon_change(), Some(1));
        i.update([InputEvent::KeyDown(Key::Num4)], |_| false);
        assert_eq!(i.build_tic_cmd().weapon_change(), Some(3));
        assert_eq!(i.build_tic_cmd().buttons, 0);

        // both fresh on one tic, the other one follows on the next
        let mut i = input();
        i.update(
            [InputEvent::KeyDown(Key::Num5), InputEvent::KeyDown(Key::Num6)],
            |_| false,
        );
        assert_eq!(i.build_tic_cmd().weapon_change(), Some(4));
        assert_eq!(i.build_tic_cmd().weapon_change(), Some(5));
        assert_eq!(i.build_tic_cmd().buttons, 0);
    }

    #[test]
    fn pause_and_save_replace_buttons() {
        let mut i = input();
        i.update(
            [InputEvent::KeyDown(Key::RCtrl), InputEvent::KeyDown(Key::Pause)],
            |_| false,
        );
        let cmd = i.build_tic_cmd();
        assert!(cmd.is_special());
        assert_eq!(
            cmd.buttons,
            TIC_CMD_BUTTONS.bt_special | TIC_CMD_BUTTONS.bts_pause
        );
        assert_eq!(i.build_tic_cmd().buttons, TIC_CMD_BUTTONS.bt_attack);

        i.events.send_save(3);
        let cmd = i.build_tic_cmd();
        assert_eq!(
            (cmd.buttons & TIC_CMD_BUTTONS.bts_savemask) >> TIC_CMD_BUTTONS.bts_saveshift,
            3
        );
        assert_eq!(
            cmd.buttons & TIC_CMD_BUTTONS.bt_specialmask,
            TIC_CMD_BUTTONS.bts_savegame
        );
    }

    #[test]
    fn taken_keys_are_not_held() {
        let mut i = input();
        i.update([InputEvent::KeyDown(Key::W)], |k| k == Key::W);
        assert_eq!(i.build_tic_cmd().forwardmove, 0);
        i.update([InputEvent::Quit], |_| false);
        assert!(i.get_quit());
    }
}
