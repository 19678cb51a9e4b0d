//! The player: everything that persists between levels, plus the per-tic
//! think that turns a `TicCmd` into movement of the player's body.
//!
//! Doom source name `p_user`, with `G_PlayerReborn`, `G_PlayerFinishLevel`
//! and the player half of `p_inter`.

use log::{debug, error, info};
use math::{ANG90, Angle, FINEANGLES, FINEMASK, FixedPoint, p_random};
use sound_traits::SfxName;

use crate::{
    Skill,
    doom_def::{
        AmmoType, BFGCELLS, CLIP_AMMO, Card, GameMode, MAX_AMMO, MAXHEALTH, MAXPLAYERS,
        PowerType, TICRATE, VIEWHEIGHT, WEAPON_AMMO, WeaponType,
    },
    lang::english::*,
    level::{Level, LevelError},
    thing::{MapObjFlag, MapObject},
    thinker::{ThinkerData, ThinkerId},
    tic_cmd::{TIC_CMD_BUTTONS, TicCmd},
};

/// 16 pixels of bob
const MAXBOB: FixedPoint = FixedPoint::new(0x100000);
/// How much a pickup flashes the screen
pub const BONUSADD: i32 = 6;
/// Colormap for the invulnerability effect
const INVERSECOLORMAP: i32 = 32;

//// Player states.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PlayerState {
    /// Playing or camping.
    Live,
    /// Dead on the ground, view follows killer.
    Dead,
    /// Ready to restart/respawn???
    Reborn,
}

impl PlayerState {
    pub fn to_byte(self) -> u8 {
        self as u8
    }

    pub fn from_byte(b: u8) -> Self {
        match b {
            0 => PlayerState::Live,
            1 => PlayerState::Dead,
            _ => PlayerState::Reborn,
        }
    }
}

//// Player internal flags, for cheats and debug.
#[derive(Debug, Copy, Clone)]
pub enum PlayerCheat {
    /// No clipping, walk through barriers.
    Noclip = 1,
    /// No damage, no health loss.
    Godmode = 2,
    /// Not really a cheat, just a debug aid.
    NoMomentum = 4,
}

/// INTERMISSION
/// Structure passed e.g. to WI_Start(wb)
#[derive(Debug, Default, Clone)]
pub struct WBPlayerStruct {
    /// whether the player is in game
    pub inn: bool,
    // Player stats, kills, collected items etc.
    pub skills: i32,
    pub sitems: i32,
    pub ssecret: i32,
    pub stime: u32,
    pub frags: [i32; 4],
    /// current score on entry, modified on return
    pub score: i32,
}

/// parms for world level / intermission
#[derive(Debug, Default, Clone)]
pub struct WBStartStruct {
    /// episode # (0-2)
    pub epsd: i32,
    /// if true, splash the secret level
    pub didsecret: bool,
    /// previous and next levels, origin 0
    pub last: i32,
    pub next: i32,
    pub maxkills: i32,
    pub maxitems: i32,
    pub maxsecret: i32,
    pub maxfrags: i32,
    /// the par time
    pub partime: i32,
    /// index of this player in game
    pub pnum: i32,
    pub plyr: [WBPlayerStruct; MAXPLAYERS],
}

/// player_t
#[derive(Debug, Clone)]
pub struct Player {
    pub mobj: Option<ThinkerId>,
    pub player_state: PlayerState,
    pub cmd: TicCmd,

    /// Determine POV,
    ///  including viewpoint bobbing during movement.
    /// Focal origin above r.z
    pub viewz: FixedPoint,
    /// Base height above floor for viewz.
    pub viewheight: FixedPoint,
    /// Bob/squat speed.
    pub deltaviewheight: FixedPoint,
    /// bounded/scaled total momentum.
    pub bob: FixedPoint,
    pub onground: bool,

    /// This is only used between levels,
    /// mo->health is used during levels.
    pub health: i32,
    pub armorpoints: i32,
    /// Armor type is 0-2.
    pub armortype: i32,

    /// Power ups. invinc and invis are tic counters.
    pub powers: [i32; PowerType::NumPowers as usize],
    pub cards: [bool; Card::NumCards as usize],
    pub backpack: bool,

    /// Frags, kills of other players.
    pub frags: [i32; MAXPLAYERS],
    pub readyweapon: WeaponType,

    /// Is wp_nochange if not changing.
    pub pendingweapon: WeaponType,

    pub weaponowned: [bool; WeaponType::NumWeapons as usize],
    pub ammo: [u32; AmmoType::NumAmmo as usize],
    pub maxammo: [u32; AmmoType::NumAmmo as usize],

    /// True if button down last tic.
    pub attackdown: bool,
    pub usedown: bool,

    /// Bit flags, for cheats and debug.
    /// See cheat_t, above.
    pub cheats: u32,

    /// Refired shots are less accurate.
    pub refire: i32,

    /// For intermission stats.
    pub killcount: i32,
    pub itemcount: i32,
    pub secretcount: i32,

    /// Hint messages.
    pub message: Option<String>,

    /// For screen flashing (red or bright).
    pub damagecount: i32,
    pub bonuscount: i32,

    /// So gun flashes light up areas.
    pub extralight: i32,

    /// Current PLAYPAL, ???
    ///  can be set to REDCOLORMAP for pain, etc.
    pub fixedcolormap: i32,

    /// True if secret level has been done.
    pub didsecret: bool,

    /// Which of shotgun or super shotgun the shotgun key selects
    pub preferredshotgun: WeaponType,
    /// Which of fist or chainsaw the fist key selects
    pub fistorchainsaw: WeaponType,

    /// Tics spent dead, for the respawn delay on the fire button
    pub(crate) dead_tics: i32,
}

impl Default for Player {
    fn default() -> Self {
        Player::new()
    }
}

impl Player {
    pub const fn new() -> Player {
        Player {
            viewz: FixedPoint::ZERO,
            mobj: None,

            viewheight: VIEWHEIGHT,
            deltaviewheight: FixedPoint::ZERO,
            bob: FixedPoint::ZERO,
            onground: true,
            health: MAXHEALTH,
            armorpoints: 0,
            armortype: 0,
            ammo: [0; AmmoType::NumAmmo as usize],
            maxammo: [0; AmmoType::NumAmmo as usize],
            powers: [0; PowerType::NumPowers as usize],
            cards: [false; Card::NumCards as usize],
            backpack: false,
            attackdown: false,
            usedown: false,
            cheats: 0,
            refire: 0,

            killcount: 0,
            itemcount: 0,
            secretcount: 0,

            message: None,
            damagecount: 0,
            bonuscount: 0,

            didsecret: false,
            extralight: 0,
            fixedcolormap: 0,

            frags: [0; MAXPLAYERS],
            readyweapon: WeaponType::Pistol,
            pendingweapon: WeaponType::NoChange,
            weaponowned: [false; WeaponType::NumWeapons as usize],

            player_state: PlayerState::Reborn,
            cmd: TicCmd::new(),

            preferredshotgun: WeaponType::Shotgun,
            fistorchainsaw: WeaponType::Fist,
            dead_tics: 0,
        }
    }

    /// Doom function `G_PlayerFinishLevel`
    pub fn finish_level(&mut self, level: &mut Level) {
        self.powers = [0; PowerType::NumPowers as usize];
        self.cards = [false; Card::NumCards as usize];

        // cancel invisibility
        if let Some(mobj) = self
            .mobj
            .and_then(|id| level.thinkers.get_mut(id))
            .and_then(ThinkerData::mobj_mut)
        {
            mobj.flags &= !(MapObjFlag::Shadow as u32);
        }

        // cancel gun flashes
        self.extralight = 0;
        // cancel ir gogles
        self.fixedcolormap = 0;
        // no palette changes
        self.damagecount = 0;
        self.bonuscount = 0;

        info!("Reset level items and powers for player");
    }

    /// Called after a player dies, almost everything is cleared and
    /// initialized.
    ///
    /// Doom function `G_PlayerReborn`
    pub fn reborn(&mut self, game_mode: GameMode) {
        let frags = self.frags;
        let kill_count = self.killcount;
        let item_count = self.itemcount;
        let secret_count = self.secretcount;

        *self = Player::new();
        self.frags = frags;
        self.killcount = kill_count;
        self.itemcount = item_count;
        self.secretcount = secret_count;

        // don't do anything immediately
        self.usedown = true;
        self.attackdown = true;
        self.player_state = PlayerState::Live;
        self.health = MAXHEALTH;
        self.readyweapon = WeaponType::Pistol;
        self.pendingweapon = WeaponType::Pistol;
        self.weaponowned[WeaponType::Fist as usize] = true;
        self.weaponowned[WeaponType::Pistol as usize] = true;
        self.ammo[AmmoType::Clip as usize] = 50;
        self.maxammo.copy_from_slice(&MAX_AMMO);
        if game_mode == GameMode::Shareware {
            self.maxammo[AmmoType::Cell as usize] = 0;
        }
    }

    /// A new body was spawned for the player. The `P_SpawnPlayer` setup of
    /// the player half.
    pub(crate) fn spawned(&mut self, mobj: ThinkerId) {
        self.mobj = Some(mobj);
        self.player_state = PlayerState::Live;
        self.refire = 0;
        self.message = None;
        self.damagecount = 0;
        self.bonuscount = 0;
        self.extralight = 0;
        self.fixedcolormap = 0;
        self.viewheight = VIEWHEIGHT;
        self.deltaviewheight = FixedPoint::ZERO;
        self.dead_tics = 0;
    }

    fn body<'a>(&self, level: &'a Level) -> Option<&'a MapObject> {
        self.mobj
            .and_then(|id| level.thinkers.get(id))
            .and_then(ThinkerData::mobj)
    }

    fn body_mut<'a>(&self, level: &'a mut Level) -> Option<&'a mut MapObject> {
        self.mobj
            .and_then(|id| level.thinkers.get_mut(id))
            .and_then(ThinkerData::mobj_mut)
    }

    /// P_Thrust
    /// Moves the given origin along a given angle.
    fn thrust(mobj: &mut MapObject, angle: Angle, mv: FixedPoint) {
        mobj.momx += mv * angle.cos();
        mobj.momy += mv * angle.sin();
    }

    /// P_CalcHeight
    /// Calculate the walking / running height adjustment
    fn calc_height(&mut self, level: &Level) {
        let Some(mobj) = self.body(level) else {
            return;
        };
        // Regular movement bobbing
        // (needs to be calculated for gun swing
        // even if not on ground)
        self.bob = (mobj.momx * mobj.momx + mobj.momy * mobj.momy) >> 2;
        if self.bob > MAXBOB {
            self.bob = MAXBOB;
        }

        if self.cheats & PlayerCheat::NoMomentum as u32 != 0 || !self.onground {
            self.viewz = mobj.z + VIEWHEIGHT;
            if self.viewz > mobj.ceilingz - FixedPoint::from_int(4) {
                self.viewz = mobj.ceilingz - FixedPoint::from_int(4);
            }
            self.viewz = mobj.z + self.viewheight;
            return;
        }

        let angle = (FINEANGLES / 20).wrapping_mul(level.level_time as usize) & FINEMASK;
        let bob = (self.bob / 2) * FixedPoint::finesine(angle);

        // move viewheight
        if self.player_state == PlayerState::Live {
            self.viewheight += self.deltaviewheight;

            if self.viewheight > VIEWHEIGHT {
                self.viewheight = VIEWHEIGHT;
                self.deltaviewheight = FixedPoint::ZERO;
            }

            if self.viewheight < VIEWHEIGHT / 2 {
                self.viewheight = VIEWHEIGHT / 2;
                if self.deltaviewheight <= FixedPoint::ZERO {
                    self.deltaviewheight = FixedPoint::new(1);
                }
            }

            if !self.deltaviewheight.is_zero() {
                self.deltaviewheight += FixedPoint::UNIT / 4;
                if self.deltaviewheight.is_zero() {
                    self.deltaviewheight = FixedPoint::new(1);
                }
            }
        }

        self.viewz = mobj.z + self.viewheight + bob;
        if self.viewz > mobj.ceilingz - FixedPoint::from_int(4) {
            self.viewz = mobj.ceilingz - FixedPoint::from_int(4);
        }
    }

    /// P_MovePlayer
    fn move_player(&mut self, mobj: &mut MapObject) {
        mobj.angle += Angle::new(((self.cmd.angleturn as i32) << 16) as u32);

        // Do not let the player control movement
        //  if not onground.
        self.onground = mobj.z <= mobj.floorz;

        if self.cmd.forwardmove != 0 && self.onground {
            let angle = mobj.angle;
            Self::thrust(mobj, angle, FixedPoint::new(self.cmd.forwardmove as i32 * 2048));
        }

        if self.cmd.sidemove != 0 && self.onground {
            let angle = mobj.angle - Angle::new(ANG90);
            Self::thrust(mobj, angle, FixedPoint::new(self.cmd.sidemove as i32 * 2048));
        }
    }

    /// Apply what the world did to the body since the last think: steps,
    /// hard landings and crushing.
    fn absorb_world_effects(&mut self, num: usize, level: &mut Level) {
        let Some(mobj) = self.body_mut(level) else {
            return;
        };
        let step = std::mem::take(&mut mobj.view_step);
        let squat = mobj.view_squat.take();
        let pending = std::mem::take(&mut mobj.pending_damage);

        if !step.is_zero() {
            self.viewheight -= step;
            self.deltaviewheight = (VIEWHEIGHT - self.viewheight) >> 3;
        }
        if let Some(squat) = squat {
            self.deltaviewheight = squat;
        }
        if pending > 0 {
            self.damage(num, level, pending);
        }
    }

    /// Damage to the player from the world or something in it. Armour and
    /// god mode are applied here.
    ///
    /// Doom function `P_DamageMobj`, the player target half
    pub fn damage(&mut self, num: usize, level: &mut Level, mut damage: i32) {
        let Some(mobj) = self.body(level) else {
            return;
        };
        if !mobj.has_flag(MapObjFlag::Shootable) {
            // shouldn't happen...
            return;
        }
        let (sector, body_health) = (mobj.sector, mobj.health);

        if level.skill == Skill::Baby {
            // take half damage in trainer mode
            damage >>= 1;
        }
        // end of game hell hack
        if level.map_data.sectors[sector].special == 11 && damage >= body_health {
            damage = body_health - 1;
        }
        // Below certain threshold, ignore damage in GOD mode, or with INVUL power.
        if damage < 1000
            && (self.cheats & PlayerCheat::Godmode as u32 != 0
                || self.powers[PowerType::Invulnerability as usize] != 0)
        {
            return;
        }

        if self.armortype != 0 {
            let mut saved = if self.armortype == 1 {
                damage / 3
            } else {
                damage / 2
            };
            if self.armorpoints <= saved {
                // armor is used up
                saved = self.armorpoints;
                self.armortype = 0;
            }
            self.armorpoints -= saved;
            damage -= saved;
        }
        // mirror mobj health here for Dave
        self.health = (self.health - damage).max(0);
        // add damage after armor / invuln
        self.damagecount = (self.damagecount + damage).min(100);

        let Some(mobj) = self.body_mut(level) else {
            return;
        };
        mobj.health -= damage;
        if mobj.health <= 0 {
            mobj.kill();
            // count environment kills against you
            self.frags[num] += 1;
            self.player_state = PlayerState::Dead;
            info!("Player {} died", num + 1);
        }
    }

    /// Doom function name `P_PlayerInSpecialSector`
    fn in_special_sector(&mut self, num: usize, level: &mut Level) {
        let Some(mobj) = self.body(level) else {
            return;
        };
        let sector = mobj.sector;
        // Falling, not all the way down yet?
        if mobj.z != level.map_data.sectors[sector].floorheight {
            return;
        }

        let ironfeet = self.powers[PowerType::IronFeet as usize] != 0;
        match level.map_data.sectors[sector].special {
            // HELLSLIME DAMAGE
            5 => {
                if !ironfeet && level.level_time & 0x1f == 0 {
                    debug!("Hell-slime damage!");
                    self.damage(num, level, 10);
                }
            }
            // NUKAGE DAMAGE
            7 => {
                if !ironfeet && level.level_time & 0x1f == 0 {
                    debug!("Nukage damage!");
                    self.damage(num, level, 5);
                }
            }
            // SUPER HELLSLIME DAMAGE | STROBE HURT
            16 | 4 => {
                if (!ironfeet || p_random() < 5) && level.level_time & 0x1f == 0 {
                    debug!("Super hell-slime damage!");
                    self.damage(num, level, 20);
                }
            }
            // SECRET SECTOR
            9 => {
                info!("Found secret!");
                self.secretcount += 1;
                level.map_data.sectors[sector].special = 0;
            }
            // EXIT SUPER DAMAGE! (for E1M8 finale)
            11 => {
                self.cheats &= !(PlayerCheat::Godmode as u32);
                if level.level_time & 0x1f == 0 {
                    debug!("End of episode damage!");
                    self.damage(num, level, 20);
                }
                if self.health <= 10 {
                    level.do_exit_level();
                }
            }
            _ => {}
        }
    }

    /// Ammo required to bring the weapon up
    fn has_ammo_for(&self, weapon: WeaponType) -> bool {
        let ammo = WEAPON_AMMO[weapon as usize];
        if ammo == AmmoType::NoAmmo {
            return true;
        }
        let count = self.ammo[ammo as usize];
        match weapon {
            WeaponType::BFG => count >= BFGCELLS,
            WeaponType::SuperShotgun => count >= 2,
            _ => count > 0,
        }
    }

    /// Resolve a weapon key to the weapon it selects now
    fn weapon_for_slot(&mut self, slot: WeaponType) -> Option<WeaponType> {
        match slot {
            // the chainsaw has no key of its own
            WeaponType::Chainsaw => None,
            WeaponType::Fist => {
                let choice = if self.readyweapon == WeaponType::Fist
                    && self.weaponowned[WeaponType::Chainsaw as usize]
                {
                    WeaponType::Chainsaw
                } else if self.readyweapon == WeaponType::Chainsaw {
                    if self.powers[PowerType::Strength as usize] == 0 {
                        return None;
                    }
                    WeaponType::Fist
                } else {
                    self.fistorchainsaw
                };
                self.fistorchainsaw = choice;
                Some(choice)
            }
            WeaponType::Shotgun => {
                let ssg = self.weaponowned[WeaponType::SuperShotgun as usize]
                    && self.ammo[AmmoType::Shell as usize] >= 2;
                let has_sg = self.weaponowned[WeaponType::Shotgun as usize];
                let choice = if self.readyweapon == WeaponType::Shotgun && ssg {
                    WeaponType::SuperShotgun
                } else if self.readyweapon == WeaponType::SuperShotgun && has_sg {
                    WeaponType::Shotgun
                } else if self.preferredshotgun == WeaponType::SuperShotgun && ssg {
                    WeaponType::SuperShotgun
                } else if has_sg || !ssg {
                    WeaponType::Shotgun
                } else {
                    WeaponType::SuperShotgun
                };
                self.preferredshotgun = choice;
                Some(choice)
            }
            WeaponType::NumWeapons | WeaponType::NoChange => None,
            w => Some(w),
        }
    }

    /// Check for weapon change. Weapon bring-up is immediate: the pending
    /// weapon is made ready at the start of the next think.
    fn change_weapon(&mut self, game_mode: GameMode) {
        let Some(slot) = self.cmd.weapon_change() else {
            return;
        };
        let Some(new) = self.weapon_for_slot(WeaponType::from(slot)) else {
            return;
        };
        if !self.weaponowned[new as usize] || new == self.readyweapon || !self.has_ammo_for(new) {
            return;
        }
        // Do not go to plasma or BFG in shareware, even if cheated.
        if game_mode == GameMode::Shareware && matches!(new, WeaponType::Plasma | WeaponType::BFG) {
            return;
        }
        debug!("Weapon change to {new:?}");
        self.pendingweapon = new;
    }

    /// Tick the powerup timers and screen effects
    fn tick_powers(&mut self, level: &mut Level) {
        // Strength counts up to diminish fade.
        if self.powers[PowerType::Strength as usize] != 0 {
            self.powers[PowerType::Strength as usize] += 1;
        }
        if self.powers[PowerType::Invulnerability as usize] > 0 {
            self.powers[PowerType::Invulnerability as usize] -= 1;
        }
        if self.powers[PowerType::Invisibility as usize] > 0 {
            self.powers[PowerType::Invisibility as usize] -= 1;
            if self.powers[PowerType::Invisibility as usize] == 0 {
                if let Some(mobj) = self.body_mut(level) {
                    mobj.flags &= !(MapObjFlag::Shadow as u32);
                }
            }
        }
        if self.powers[PowerType::Infrared as usize] > 0 {
            self.powers[PowerType::Infrared as usize] -= 1;
        }
        if self.powers[PowerType::IronFeet as usize] > 0 {
            self.powers[PowerType::IronFeet as usize] -= 1;
        }
        if self.damagecount > 0 {
            self.damagecount -= 1;
        }
        if self.bonuscount > 0 {
            self.bonuscount -= 1;
        }

        // Handling colormaps.
        let invuln = self.powers[PowerType::Invulnerability as usize];
        let infra = self.powers[PowerType::Infrared as usize];
        self.fixedcolormap = if invuln != 0 {
            if invuln > 4 * 32 || invuln & 8 != 0 {
                INVERSECOLORMAP
            } else {
                0
            }
        } else if infra != 0 {
            // almost full bright
            if infra > 4 * 32 || infra & 8 != 0 { 1 } else { 0 }
        } else {
            0
        };
    }

    /// Doom function `P_PlayerThink`
    pub fn think(&mut self, num: usize, level: &mut Level) -> Result<(), LevelError> {
        if self.body(level).is_none() {
            return Ok(());
        }
        self.absorb_world_effects(num, level);
        self.take_pickups(num, level);

        let noclip = self.cheats & PlayerCheat::Noclip as u32 != 0;
        if let Some(mobj) = self.body_mut(level) {
            if noclip {
                mobj.flags |= MapObjFlag::Noclip as u32;
            } else {
                mobj.flags &= !(MapObjFlag::Noclip as u32);
            }
        }

        // A special command is not for the player
        if self.cmd.is_special() {
            self.cmd.buttons = 0;
        }

        if self.player_state == PlayerState::Dead {
            self.death_think(level);
            return Ok(());
        }

        if self.pendingweapon != WeaponType::NoChange {
            self.readyweapon = self.pendingweapon;
            self.pendingweapon = WeaponType::NoChange;
        }

        // Move around.
        // Reactiontime is used to prevent movement
        //  for a bit after a teleport.
        let reacting = self.body(level).is_some_and(|m| m.reactiontime > 0);
        if reacting {
            if let Some(mobj) = self.body_mut(level) {
                mobj.reactiontime -= 1;
            }
        } else if let Some(mobj) = self.mobj.and_then(|id| level.thinkers.get_mut(id)) {
            if let Some(mobj) = mobj.mobj_mut() {
                self.move_player(mobj);
            }
        }
        self.calc_height(level);

        self.in_special_sector(num, level);

        self.change_weapon(level.game_mode);

        // check for use
        if self.cmd.buttons & TIC_CMD_BUTTONS.bt_use != 0 {
            if !self.usedown {
                self.usedown = true;
                if let Some((x, y, angle)) = self.body(level).map(|m| (m.x, m.y, m.angle)) {
                    let uid = self.mobj.map(MapObject::sound_uid).unwrap_or_default();
                    level.use_lines(num, x, y, angle, uid)?;
                }
            }
        } else {
            self.usedown = false;
        }

        if self.cmd.buttons & TIC_CMD_BUTTONS.bt_attack != 0 {
            if !self.attackdown {
                self.attackdown = true;
            }
        } else {
            self.attackdown = false;
            self.refire = 0;
        }

        self.tick_powers(level);
        Ok(())
    }

    /// Fall on your face when dying.
    /// Decrease POV height to floor height.
    ///
    /// Doom function `P_DeathThink`
    fn death_think(&mut self, level: &mut Level) {
        self.dead_tics += 1;

        // fall to the ground
        if self.viewheight > FixedPoint::from_int(6) {
            self.viewheight -= FixedPoint::UNIT;
        }
        if self.viewheight < FixedPoint::from_int(6) {
            self.viewheight = FixedPoint::from_int(6);
        }
        self.deltaviewheight = FixedPoint::ZERO;
        if let Some(mobj) = self.body(level) {
            self.onground = mobj.z <= mobj.floorz;
        }
        self.calc_height(level);

        if self.damagecount > 0 {
            self.damagecount -= 1;
        }

        if self.cmd.buttons & TIC_CMD_BUTTONS.bt_use != 0
            || (self.cmd.buttons & TIC_CMD_BUTTONS.bt_attack != 0
                && self.damagecount == 0
                && self.dead_tics > 2 * TICRATE)
        {
            info!("Player respawning");
            self.player_state = PlayerState::Reborn;
        }
    }

    /// Collect the specials the body touched while moving.
    ///
    /// Doom function `P_TouchSpecialThing`
    fn take_pickups(&mut self, num: usize, level: &mut Level) {
        let mut touched = Vec::new();
        level.touched.retain(|&(p, id)| {
            if p == num {
                touched.push(id);
                false
            } else {
                true
            }
        });
        let Some(body) = self.body(level) else {
            return;
        };
        let (bz, bheight, bhealth, bx, by) = (body.z, body.height, body.health, body.x, body.y);

        for id in touched {
            let Some(special) = level.thinkers.get(id).and_then(ThinkerData::mobj) else {
                continue;
            };
            let delta = special.z - bz;
            if delta > bheight || delta < -FixedPoint::from_int(8) {
                // out of reach
                continue;
            }
            // dead thing touching, can happen with a sliding player corpse
            if bhealth <= 0 {
                return;
            }
            let (kind, flags) = (special.kind, special.flags);
            let Some(sound) = self.give_for_kind(num, kind, flags, level) else {
                continue;
            };
            if flags & MapObjFlag::Countitem as u32 != 0 {
                self.itemcount += 1;
            }
            level.thinkers.mark_remove(id);
            self.bonuscount += BONUSADD;
            let uid = self.mobj.map(MapObject::sound_uid).unwrap_or_default();
            level.start_sound(sound, bx, by, uid);
        }
    }

    /// Give whatever the thing is. None if it couldn't be picked up, and so
    /// stays in the level.
    fn give_for_kind(
        &mut self,
        num: usize,
        kind: i16,
        flags: u32,
        level: &mut Level,
    ) -> Option<SfxName> {
        let skill = level.skill;
        let dropped = flags & MapObjFlag::Dropped as u32 != 0;
        let mut sound = SfxName::Itemup;
        let msg = match kind {
            // armor
            2018 => {
                if !self.give_armour(1) {
                    return None;
                }
                GOTARMOR
            }
            2019 => {
                if !self.give_armour(2) {
                    return None;
                }
                GOTMEGA
            }
            // bonus items
            2014 => {
                // can go over 100%
                self.health = (self.health + 1).min(200);
                self.sync_body_health(level);
                GOTHTHBONUS
            }
            2015 => {
                self.armorpoints = (self.armorpoints + 1).min(200);
                if self.armortype == 0 {
                    self.armortype = 1;
                }
                GOTARMBONUS
            }
            2013 => {
                self.health = (self.health + 100).min(200);
                self.sync_body_health(level);
                sound = SfxName::Getpow;
                GOTSUPER
            }
            83 => {
                if level.game_mode != GameMode::Commercial {
                    return None;
                }
                self.health = 200;
                self.sync_body_health(level);
                self.give_armour(2);
                sound = SfxName::Getpow;
                GOTMSPHERE
            }
            // cards, leave cards for everyone in a netgame
            5 | 6 | 13 | 38 | 39 | 40 => {
                let (card, msg) = match kind {
                    5 => (Card::Bluecard, GOTBLUECARD),
                    6 => (Card::Yellowcard, GOTYELWCARD),
                    13 => (Card::Redcard, GOTREDCARD),
                    40 => (Card::Blueskull, GOTBLUESKUL),
                    39 => (Card::Yellowskull, GOTYELWSKUL),
                    _ => (Card::Redskull, GOTREDSKULL),
                };
                if !self.cards[card as usize] {
                    self.message = Some(msg.to_string());
                }
                self.give_key(card);
                if level.netgame {
                    return None;
                }
                return Some(sound);
            }
            // medikits, heals
            2011 => {
                if !self.give_body(10, level) {
                    return None;
                }
                GOTSTIM
            }
            2012 => {
                if !self.give_body(25, level) {
                    return None;
                }
                if self.health < 25 {
                    GOTMEDINEED
                } else {
                    GOTMEDIKIT
                }
            }
            // power ups
            2022 | 2023 | 2024 | 2025 | 2026 | 2045 => {
                let (power, msg) = match kind {
                    2022 => (PowerType::Invulnerability, GOTINVUL),
                    2023 => (PowerType::Strength, GOTBERSERK),
                    2024 => (PowerType::Invisibility, GOTINVIS),
                    2025 => (PowerType::IronFeet, GOTSUIT),
                    2026 => (PowerType::Allmap, GOTMAP),
                    _ => (PowerType::Infrared, GOTVISOR),
                };
                if !self.give_power(power, level) {
                    return None;
                }
                if power == PowerType::Strength && self.readyweapon != WeaponType::Fist {
                    self.pendingweapon = WeaponType::Fist;
                }
                if power == PowerType::Invisibility {
                    if let Some(mobj) = self.body_mut(level) {
                        mobj.flags |= MapObjFlag::Shadow as u32;
                    }
                }
                sound = SfxName::Getpow;
                msg
            }
            // ammo
            2007 => {
                let num = if dropped { 0 } else { 1 };
                if !self.give_ammo(AmmoType::Clip, num, skill) {
                    return None;
                }
                GOTCLIP
            }
            2048 => {
                if !self.give_ammo(AmmoType::Clip, 5, skill) {
                    return None;
                }
                GOTCLIPBOX
            }
            2010 => {
                if !self.give_ammo(AmmoType::Missile, 1, skill) {
                    return None;
                }
                GOTROCKET
            }
            2046 => {
                if !self.give_ammo(AmmoType::Missile, 5, skill) {
                    return None;
                }
                GOTROCKBOX
            }
            2047 => {
                if !self.give_ammo(AmmoType::Cell, 1, skill) {
                    return None;
                }
                GOTCELL
            }
            17 => {
                if !self.give_ammo(AmmoType::Cell, 5, skill) {
                    return None;
                }
                GOTCELLBOX
            }
            2008 => {
                if !self.give_ammo(AmmoType::Shell, 1, skill) {
                    return None;
                }
                GOTSHELLS
            }
            2049 => {
                if !self.give_ammo(AmmoType::Shell, 5, skill) {
                    return None;
                }
                GOTSHELLBOX
            }
            8 => {
                if !self.backpack {
                    for max in self.maxammo.iter_mut() {
                        *max *= 2;
                    }
                    self.backpack = true;
                }
                for ammo in [AmmoType::Clip, AmmoType::Shell, AmmoType::Cell, AmmoType::Missile] {
                    self.give_ammo(ammo, 1, skill);
                }
                GOTBACKPACK
            }
            // weapons
            2006 | 2002 | 2005 | 2003 | 2004 | 2001 | 82 => {
                let (weapon, msg) = match kind {
                    2006 => (WeaponType::BFG, GOTBFG9000),
                    2002 => (WeaponType::Chaingun, GOTCHAINGUN),
                    2005 => (WeaponType::Chainsaw, GOTCHAINSAW),
                    2003 => (WeaponType::Missile, GOTLAUNCHER),
                    2004 => (WeaponType::Plasma, GOTPLASMA),
                    2001 => (WeaponType::Shotgun, GOTSHOTGUN),
                    _ => (WeaponType::SuperShotgun, GOTSHOTGUN2),
                };
                let taken = self.give_weapon(weapon, dropped, level);
                self.message = Some(msg.to_string());
                if !taken {
                    return None;
                }
                return Some(SfxName::Wpnup);
            }
            _ => {
                error!("P_SpecialThing: unknown gettable thing {kind} for player {num}");
                return None;
            }
        };
        self.message = Some(msg.to_string());
        Some(sound)
    }

    fn sync_body_health(&self, level: &mut Level) {
        let health = self.health;
        if let Some(mobj) = self.body_mut(level) {
            mobj.health = health;
        }
    }

    /// Num is the number of clip loads, not the individual count (0 = 1/2
    /// clip). Returns false if the ammo can't be picked up at all
    pub(crate) fn give_ammo(&mut self, ammo: AmmoType, mut num: u32, skill: Skill) -> bool {
        if ammo == AmmoType::NoAmmo {
            return false;
        }
        if ammo == AmmoType::NumAmmo {
            error!("Tried to give AmmoType::NumAmmo");
            return false;
        }

        if self.ammo[ammo as usize] == self.maxammo[ammo as usize] {
            return false;
        }

        if num != 0 {
            num *= CLIP_AMMO[ammo as usize];
        } else {
            num = CLIP_AMMO[ammo as usize] / 2;
        }

        if skill == Skill::Baby || skill == Skill::Nightmare {
            // Double ammo for trainer mode + nightmare
            num <<= 1;
        }

        let old_ammo = self.ammo[ammo as usize];
        self.ammo[ammo as usize] = (old_ammo + num).min(self.maxammo[ammo as usize]);

        // If non zero ammo, don't change up weapons, player was lower on purpose.
        if old_ammo != 0 {
            return true;
        }

        // We were down to zero, so select a new weapon.
        match ammo {
            AmmoType::Clip => {
                if self.readyweapon == WeaponType::Fist {
                    if self.weaponowned[WeaponType::Chaingun as usize] {
                        self.pendingweapon = WeaponType::Chaingun;
                    } else {
                        self.pendingweapon = WeaponType::Pistol;
                    }
                }
            }
            AmmoType::Shell => {
                if (self.readyweapon == WeaponType::Fist || self.readyweapon == WeaponType::Pistol)
                    && self.weaponowned[WeaponType::Shotgun as usize]
                {
                    self.pendingweapon = WeaponType::Shotgun;
                }
            }
            AmmoType::Cell => {
                if (self.readyweapon == WeaponType::Fist || self.readyweapon == WeaponType::Pistol)
                    && self.weaponowned[WeaponType::Plasma as usize]
                {
                    self.pendingweapon = WeaponType::Plasma;
                }
            }
            AmmoType::Missile => {
                if self.readyweapon == WeaponType::Fist
                    && self.weaponowned[WeaponType::Missile as usize]
                {
                    self.pendingweapon = WeaponType::Missile;
                }
            }
            _ => {}
        }
        true
    }

    /// The weapon name may have a MF_DROPPED flag ored in.
    ///
    /// Doom function `P_GiveWeapon`
    fn give_weapon(&mut self, weapon: WeaponType, dropped: bool, level: &mut Level) -> bool {
        let ammo = WEAPON_AMMO[weapon as usize];
        if level.netgame && !level.deathmatch && !dropped {
            // leave placed weapons forever on net games
            if self.weaponowned[weapon as usize] {
                return false;
            }
            self.bonuscount += BONUSADD;
            self.weaponowned[weapon as usize] = true;
            self.give_ammo(ammo, 2, level.skill);
            self.pendingweapon = weapon;
            let uid = self.mobj.map(MapObject::sound_uid).unwrap_or_default();
            if let Some((x, y)) = self.body(level).map(|m| (m.x, m.y)) {
                level.start_sound(SfxName::Wpnup, x, y, uid);
            }
            return false;
        }

        // give one clip with a dropped weapon, two clips with a found weapon
        let gave_ammo = ammo != AmmoType::NoAmmo
            && self.give_ammo(ammo, if dropped { 1 } else { 2 }, level.skill);

        let gave_weapon = if self.weaponowned[weapon as usize] {
            false
        } else {
            self.weaponowned[weapon as usize] = true;
            self.pendingweapon = weapon;
            true
        };
        gave_weapon || gave_ammo
    }

    pub(crate) fn give_armour(&mut self, armour: i32) -> bool {
        let hits = armour * 100;
        if self.armorpoints >= hits {
            // don't pick up
            return false;
        }

        self.armortype = armour;
        self.armorpoints = hits;
        true
    }

    pub(crate) fn give_key(&mut self, card: Card) {
        if self.cards[card as usize] {
            return;
        }
        self.bonuscount = BONUSADD;
        self.cards[card as usize] = true;
    }

    /// Returns false if the body isn't needed at all
    pub(crate) fn give_body(&mut self, num: i32, level: &mut Level) -> bool {
        if self.health >= MAXHEALTH {
            return false;
        }
        self.health = (self.health + num).min(MAXHEALTH);
        self.sync_body_health(level);
        true
    }

    pub(crate) fn give_power(&mut self, power: PowerType, level: &mut Level) -> bool {
        match power {
            PowerType::Invulnerability => {
                self.powers[power as usize] = power.duration();
                return true;
            }
            PowerType::Strength => {
                self.give_body(100, level);
                self.powers[power as usize] = 1;
                return true;
            }
            PowerType::Invisibility => {
                self.powers[power as usize] = power.duration();
                return true;
            }
            PowerType::IronFeet => {
                self.powers[power as usize] = power.duration();
                return true;
            }
            PowerType::Infrared => {
                self.powers[power as usize] = power.duration();
                return true;
            }
            _ => {}
        }

        if self.powers[power as usize] != 0 {
            return false; // Already got it
        }
        self.powers[power as usize] = 1;
        true
    }
}

#[cfg(test)]
mod tests {
    use math::FixedPoint;

    use super::{Player, PlayerCheat, PlayerState};
    use crate::{
        doom_def::{AmmoType, GameMode, MAX_AMMO, PowerType, WeaponType},
        level::tests::test_level_with_players,
        thinker::ThinkerData,
        tic_cmd::TIC_CMD_BUTTONS,
    };

    #[test]
    fn reborn_keeps_tallies() {
        let mut p = Player::new();
        p.killcount = 3;
        p.itemcount = 2;
        p.secretcount = 1;
        p.frags = [1, 0, 2, 0];
        p.health = 5;
        p.weaponowned[WeaponType::Shotgun as usize] = true;
        p.reborn(GameMode::Retail);

        assert_eq!(p.killcount, 3);
        assert_eq!(p.itemcount, 2);
        assert_eq!(p.secretcount, 1);
        assert_eq!(p.frags, [1, 0, 2, 0]);
        assert_eq!(p.health, 100);
        assert_eq!(p.player_state, PlayerState::Live);
        assert!(!p.weaponowned[WeaponType::Shotgun as usize]);
        assert!(p.weaponowned[WeaponType::Pistol as usize]);
        assert_eq!(p.ammo[AmmoType::Clip as usize], 50);
        assert_eq!(p.maxammo, MAX_AMMO);
        assert!(p.usedown && p.attackdown);

        p.reborn(GameMode::Shareware);
        assert_eq!(p.maxammo[AmmoType::Cell as usize], 0);
    }

    #[test]
    fn walk_forward() {
        let (mut level, mut players) = test_level_with_players();
        let id = players[0].mobj.unwrap();
        let start = level.thinkers.get(id).and_then(ThinkerData::mobj).unwrap().x;
        players[0].cmd.forwardmove = 0x19;
        for _ in 0..10 {
            players[0].think(0, &mut level).unwrap();
            level.run_thinkers().unwrap();
            level.level_time += 1;
        }
        let mobj = level.thinkers.get(id).and_then(ThinkerData::mobj).unwrap();
        // facing east, so x grows and the wall at 192 stops the body short
        assert!(mobj.x > start);
        assert!(mobj.x <= FixedPoint::from_int(192 - 16));
        assert!(players[0].viewz > FixedPoint::ZERO);
    }

    #[test]
    fn use_activates_lift() {
        let (mut level, mut players) = test_level_with_players();
        players[0].usedown = false;
        players[0].cmd.buttons = TIC_CMD_BUTTONS.bt_use;
        players[0].think(0, &mut level).unwrap();
        assert!(level.map_data.sectors[1].specialdata.is_some());
        // holding use doesn't retrigger
        let plats = level.active_platforms.len();
        players[0].think(0, &mut level).unwrap();
        assert_eq!(level.active_platforms.len(), plats);
    }

    #[test]
    fn damage_armour_and_death() {
        let (mut level, mut players) = test_level_with_players();
        let p = &mut players[0];
        p.armortype = 1;
        p.armorpoints = 100;
        p.damage(0, &mut level, 30);
        assert_eq!(p.armorpoints, 90);
        assert_eq!(p.health, 80);

        p.cheats |= PlayerCheat::Godmode as u32;
        p.damage(0, &mut level, 30);
        assert_eq!(p.health, 80);
        p.cheats = 0;

        p.damage(0, &mut level, 1000);
        assert_eq!(p.health, 0);
        assert_eq!(p.player_state, PlayerState::Dead);
        assert_eq!(p.frags[0], 1);

        // dead, use respawns
        p.cmd.buttons = TIC_CMD_BUTTONS.bt_use;
        p.think(0, &mut level).unwrap();
        assert_eq!(p.player_state, PlayerState::Reborn);
    }

    #[test]
    fn weapon_change_needs_ammo() {
        let mut p = Player::new();
        p.reborn(GameMode::Retail);
        p.readyweapon = WeaponType::Pistol;
        p.weaponowned[WeaponType::Shotgun as usize] = true;
        p.cmd.buttons = TIC_CMD_BUTTONS.bt_change | (2 << TIC_CMD_BUTTONS.bt_weaponshift);
        p.pendingweapon = WeaponType::NoChange;
        p.change_weapon(GameMode::Retail);
        assert_eq!(p.pendingweapon, WeaponType::NoChange);

        p.ammo[AmmoType::Shell as usize] = 4;
        p.change_weapon(GameMode::Retail);
        assert_eq!(p.pendingweapon, WeaponType::Shotgun);

        // fist key brings up the chainsaw when owned
        p.readyweapon = WeaponType::Fist;
        p.pendingweapon = WeaponType::NoChange;
        p.weaponowned[WeaponType::Chainsaw as usize] = true;
        p.cmd.buttons = TIC_CMD_BUTTONS.bt_change;
        p.change_weapon(GameMode::Retail);
        assert_eq!(p.pendingweapon, WeaponType::Chainsaw);

        // and not back to the fist without berserk
        p.readyweapon = WeaponType::Chainsaw;
        p.pendingweapon = WeaponType::NoChange;
        p.change_weapon(GameMode::Retail);
        assert_eq!(p.pendingweapon, WeaponType::NoChange);
        p.powers[PowerType::Strength as usize] = 1;
        p.change_weapon(GameMode::Retail);
        assert_eq!(p.pendingweapon, WeaponType::Fist);
    }

    #[test]
    fn secret_sector() {
        let (mut level, mut players) = test_level_with_players();
        level.map_data.sectors[0].special = 9;
        players[0].think(0, &mut level).unwrap();
        assert_eq!(players[0].secretcount, 1);
        assert_eq!(level.map_data.sectors[0].special, 0);
    }

    #[test]
    fn pick_up_health_bonus() {
        let (mut level, mut players) = test_level_with_players();
        let id = players[0].mobj.unwrap();
        // put the body next to the bonus at (448, 64)
        {
            let body = level
                .thinkers
                .get_mut(id)
                .and_then(ThinkerData::mobj_mut)
                .unwrap();
            body.x = FixedPoint::from_int(420);
            body.y = FixedPoint::from_int(64);
            body.sector = 0;
            body.momx = FixedPoint::from_int(2);
        }
        level.run_thinkers().unwrap();
        players[0].think(0, &mut level).unwrap();
        assert_eq!(players[0].health, 101);
        assert_eq!(players[0].itemcount, 1);
        assert_eq!(players[0].message.as_deref(), Some(super::GOTHTHBONUS));
        level.run_thinkers().unwrap();
        let items = level
            .thinkers
            .iter()
            .filter(|(_, t)| t.mobj().is_some_and(|m| m.kind == 2014))
            .count();
        assert_eq!(items, 0);
    }

    #[test]
    fn powers_run_their_time() {
        let (mut level, mut players) = test_level_with_players();
        let p = &mut players[0];
        assert!(p.give_power(PowerType::IronFeet, &mut level));
        assert!(p.give_power(PowerType::Invisibility, &mut level));
        assert_eq!(p.powers[PowerType::IronFeet as usize], 60 * 35);
        assert_eq!(p.powers[PowerType::Invisibility as usize], 60 * 35);
        p.think(0, &mut level).unwrap();
        assert_eq!(p.powers[PowerType::IronFeet as usize], 60 * 35 - 1);
    }
}
