//! Map objects: anything in a level with a position. Players, monsters, items
//! and decorations are all a `MapObject` running as a thinker.
//!
//! Movement is brute force against every line of the map, there is no
//! blockmap. Collision, stepping and crossing specials follow `p_map`.
//!
//! Doom source name `p_mobj`

use log::{debug, trace, warn};
use math::{Angle, FixedPoint, FRACUNIT};
use sound_traits::SfxName;
use wad::lumps::WadThing;

use crate::{
    Skill,
    doom_def::{MAX_DEATHMATCH_STARTS, MAXPLAYERS, MAXSTEPHEIGHT, MTF_AMBUSH, MTF_SINGLE_PLAYER},
    env::specials::LineTrigger,
    level::{Level, LevelError, flags::LineDefFlags, map_data::MapData},
    player::{Player, PlayerState},
    thinker::{Think, ThinkerData, ThinkerId},
};

pub const MAXMOVE: FixedPoint = FixedPoint::from_int(30);
pub const GRAVITY: FixedPoint = FixedPoint::UNIT;
pub const FRICTION: FixedPoint = FixedPoint::new(0xe800);
pub const STOPSPEED: FixedPoint = FixedPoint::new(0x1000);

/// The doomednum all player bodies are spawned as
pub const PLAYER_KIND: i16 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapObjFlag {
    /// Call P_SpecialThing when touched.
    Special = 1,
    /// Blocks.
    Solid = 2,
    /// Can be hit.
    Shootable = 4,
    /// Don't use the sector links (invisible but touchable).
    Nosector = 8,
    /// Don't use the block links (inert but displayable)
    Noblockmap = 16,
    /// Not to be activated by sound, deaf monster.
    Ambush = 32,
    /// On level spawning (initial position), hang from ceiling instead of stand
    /// on floor.
    Spawnceiling = 256,
    /// Don't apply gravity (every tic), that is, object will float, keeping
    /// current height  or changing it actively.
    Nogravity = 512,
    /// This allows jumps from high places.
    Dropoff = 0x400,
    /// For players, will pick up items.
    Pickup = 0x800,
    /// Player cheat.
    Noclip = 0x1000,
    /// Allow moves to any height, no gravity. For active floaters, e.g.
    /// cacodemons, pain elementals.
    Float = 0x4000,
    /// Don't cross lines or look at heights on teleport.
    Teleport = 0x8000,
    /// Don't hit same species, explode on block. Player missiles as well as
    /// fireballs of various kinds.
    Missile = 0x10000,
    /// Dropped by a demon, not level spawned. E.g. ammo clips dropped by dying
    /// former humans.
    Dropped = 0x20000,
    /// Use fuzzy draw (shadow demons or spectres),  temporary player
    /// invisibility powerup.
    Shadow = 0x40000,
    /// Flag: don't bleed when shot (use puff),  barrels and shootable furniture
    /// shall not bleed.
    Noblood = 0x80000,
    /// Don't stop moving halfway off a step, that is, have dead bodies slide
    /// down all the way.
    Corpse = 0x100000,
    /// On kill, count this enemy object towards intermission kill total. Happy
    /// gathering.
    Countkill = 0x400000,
    /// On picking up, count this item object towards intermission item total.
    Countitem = 0x800000,
    /// Special handling: skull in flight. Neither a cacodemon nor a missile.
    Skullfly = 0x1000000,
    /// Don't spawn this object in death match mode (e.g. key cards).
    Notdmatch = 0x2000000,
}

/// The spawn parameters for a kind of thing
#[derive(Debug)]
pub struct MapObjInfo {
    pub doomednum: i16,
    pub spawnhealth: i32,
    pub radius: FixedPoint,
    pub height: FixedPoint,
    pub flags: u32,
}

const fn info(doomednum: i16, spawnhealth: i32, radius: i32, height: i32, flags: u32) -> MapObjInfo {
    MapObjInfo {
        doomednum,
        spawnhealth,
        radius: FixedPoint::from_int(radius),
        height: FixedPoint::from_int(height),
        flags,
    }
}

const MONSTER: u32 =
    MapObjFlag::Solid as u32 | MapObjFlag::Shootable as u32 | MapObjFlag::Countkill as u32;
const FLOATER: u32 = MONSTER | MapObjFlag::Float as u32 | MapObjFlag::Nogravity as u32;
const PICKUP: u32 = MapObjFlag::Special as u32;
const ARTIFACT: u32 = MapObjFlag::Special as u32 | MapObjFlag::Countitem as u32;
const KEY: u32 = MapObjFlag::Special as u32 | MapObjFlag::Notdmatch as u32;

/// Everything the simulation needs to know about the things it can spawn.
/// Decorations not listed here spawn as inert, non-blocking objects.
pub const MOBJINFO: &[MapObjInfo] = &[
    info(
        PLAYER_KIND,
        100,
        16,
        56,
        MapObjFlag::Solid as u32
            | MapObjFlag::Shootable as u32
            | MapObjFlag::Dropoff as u32
            | MapObjFlag::Pickup as u32
            | MapObjFlag::Notdmatch as u32,
    ),
    // monsters
    info(3004, 20, 20, 56, MONSTER),
    info(9, 30, 20, 56, MONSTER),
    info(64, 700, 20, 56, MONSTER),
    info(3001, 60, 20, 56, MONSTER),
    info(3002, 150, 30, 56, MONSTER),
    info(58, 150, 30, 56, MONSTER | MapObjFlag::Shadow as u32),
    info(3005, 400, 31, 56, FLOATER),
    info(3003, 1000, 24, 64, MONSTER),
    info(69, 500, 24, 64, MONSTER),
    info(
        3006,
        100,
        16,
        56,
        MapObjFlag::Solid as u32
            | MapObjFlag::Shootable as u32
            | MapObjFlag::Float as u32
            | MapObjFlag::Nogravity as u32,
    ),
    info(68, 500, 64, 64, MONSTER),
    info(71, 400, 31, 56, FLOATER),
    info(84, 50, 20, 56, MONSTER),
    info(65, 70, 20, 56, MONSTER),
    info(66, 300, 20, 56, MONSTER),
    info(67, 600, 48, 64, MONSTER),
    info(16, 4000, 40, 110, MONSTER),
    info(7, 3000, 128, 100, MONSTER),
    info(88, 250, 16, 16, MapObjFlag::Solid as u32 | MapObjFlag::Shootable as u32),
    info(
        2035,
        20,
        10,
        42,
        MapObjFlag::Solid as u32 | MapObjFlag::Shootable as u32 | MapObjFlag::Noblood as u32,
    ),
    // artifacts, counted for the intermission
    info(2014, 1000, 20, 16, ARTIFACT),
    info(2015, 1000, 20, 16, ARTIFACT),
    info(2013, 1000, 20, 16, ARTIFACT),
    info(2022, 1000, 20, 16, ARTIFACT),
    info(2023, 1000, 20, 16, ARTIFACT),
    info(2024, 1000, 20, 16, ARTIFACT),
    info(2025, 1000, 20, 16, PICKUP),
    info(2026, 1000, 20, 16, ARTIFACT),
    info(2045, 1000, 20, 16, ARTIFACT),
    info(83, 1000, 20, 16, ARTIFACT),
    // pickups
    info(2011, 1000, 20, 16, PICKUP),
    info(2012, 1000, 20, 16, PICKUP),
    info(2018, 1000, 20, 16, PICKUP),
    info(2019, 1000, 20, 16, PICKUP),
    info(2007, 1000, 20, 16, PICKUP),
    info(2048, 1000, 20, 16, PICKUP),
    info(2008, 1000, 20, 16, PICKUP),
    info(2049, 1000, 20, 16, PICKUP),
    info(2010, 1000, 20, 16, PICKUP),
    info(2046, 1000, 20, 16, PICKUP),
    info(2047, 1000, 20, 16, PICKUP),
    info(17, 1000, 20, 16, PICKUP),
    info(8, 1000, 20, 16, PICKUP),
    info(2001, 1000, 20, 16, PICKUP),
    info(82, 1000, 20, 16, PICKUP),
    info(2002, 1000, 20, 16, PICKUP),
    info(2003, 1000, 20, 16, PICKUP),
    info(2004, 1000, 20, 16, PICKUP),
    info(2006, 1000, 20, 16, PICKUP),
    info(2005, 1000, 20, 16, PICKUP),
    info(5, 1000, 20, 16, KEY),
    info(6, 1000, 20, 16, KEY),
    info(13, 1000, 20, 16, KEY),
    info(38, 1000, 20, 16, KEY),
    info(39, 1000, 20, 16, KEY),
    info(40, 1000, 20, 16, KEY),
];

const DECORATION: MapObjInfo = info(0, 1000, 20, 16, 0);

pub fn info_for_kind(doomednum: i16) -> &'static MapObjInfo {
    MOBJINFO
        .iter()
        .find(|i| i.doomednum == doomednum)
        .unwrap_or(&DECORATION)
}

/// Where to put a new thing vertically
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpawnZ {
    OnFloor,
    OnCeiling,
    At(FixedPoint),
}

#[derive(Debug, Clone)]
pub struct MapObject {
    pub x: FixedPoint,
    pub y: FixedPoint,
    pub z: FixedPoint,
    pub angle: Angle,
    pub momx: FixedPoint,
    pub momy: FixedPoint,
    pub momz: FixedPoint,
    /// The closest interval over all contacted sectors.
    pub floorz: FixedPoint,
    pub ceilingz: FixedPoint,
    pub radius: FixedPoint,
    pub height: FixedPoint,
    pub health: i32,
    pub flags: u32,
    /// The doomednum it was spawned as
    pub kind: i16,
    /// Sector the thing's centre is in
    pub sector: usize,
    /// Index of the owning player, if any
    pub player: Option<usize>,
    /// If >0, the target will be chased no matter what (even if shot), or
    /// for players, no movement input is taken
    pub reactiontime: i32,
    /// For nightmare respawn and saves
    pub spawnpoint: WadThing,
    /// Player view adjustments recorded by z movement, consumed by the
    /// owning player's next think: how far the floor stepped up under the
    /// body, and the squat from a hard landing.
    pub view_step: FixedPoint,
    pub view_squat: Option<FixedPoint>,
    /// Damage done to a player body by the world, applied through the
    /// player (armour, god mode) on its next think
    pub pending_damage: i32,
}

impl MapObject {
    /// Create, but don't add to the level. Doom function `P_SpawnMobj` without
    /// the thinker registration.
    pub fn new(map: &MapData, x: FixedPoint, y: FixedPoint, z: SpawnZ, kind: i16) -> Self {
        let info = info_for_kind(kind);
        let sector = map.point_in_sector(x, y);
        let (floorz, ceilingz) = map
            .sectors
            .get(sector)
            .map(|s| (s.floorheight, s.ceilingheight))
            .unwrap_or_default();
        let z = match z {
            SpawnZ::OnFloor => floorz,
            SpawnZ::OnCeiling => ceilingz - info.height,
            SpawnZ::At(z) => z,
        };
        MapObject {
            x,
            y,
            z,
            angle: Angle::default(),
            momx: FixedPoint::ZERO,
            momy: FixedPoint::ZERO,
            momz: FixedPoint::ZERO,
            floorz,
            ceilingz,
            radius: info.radius,
            height: info.height,
            health: info.spawnhealth,
            flags: info.flags,
            kind,
            sector,
            player: None,
            reactiontime: 8,
            spawnpoint: WadThing::new(0, 0, 0, kind, 0),
            view_step: FixedPoint::ZERO,
            view_squat: None,
            pending_damage: 0,
        }
    }

    /// Doom function `P_SpawnMobj`
    pub fn spawn(level: &mut Level, x: FixedPoint, y: FixedPoint, z: SpawnZ, kind: i16) -> ThinkerId {
        let mobj = MapObject::new(&level.map_data, x, y, z, kind);
        level.thinkers.push(ThinkerData::MapObject(mobj))
    }

    pub fn has_flag(&self, flag: MapObjFlag) -> bool {
        self.flags & flag as u32 != 0
    }

    /// A unique-ish id for sound tracking
    pub fn sound_uid(id: ThinkerId) -> usize {
        id.index()
    }

    /// Damage from the world (crushers, floors). Players take it through
    /// `Player::damage` on their next think; anything else takes it now.
    /// Returns true if this killed the thing.
    pub(crate) fn take_world_damage(&mut self, damage: i32) -> bool {
        if !self.has_flag(MapObjFlag::Shootable) {
            return false;
        }
        if self.player.is_some() {
            self.pending_damage += damage;
            return false;
        }
        self.health -= damage;
        if self.health <= 0 {
            self.kill();
            return true;
        }
        false
    }

    /// Doom function `P_KillMobj`, the parts that apply to the body
    pub(crate) fn kill(&mut self) {
        debug!("Killed thing {} at ({}, {})", self.kind, self.x, self.y);
        self.flags &= !(MapObjFlag::Shootable as u32
            | MapObjFlag::Float as u32
            | MapObjFlag::Skullfly as u32);
        self.flags |= MapObjFlag::Corpse as u32 | MapObjFlag::Dropoff as u32;
        if self.player.is_some() {
            self.flags &= !(MapObjFlag::Solid as u32);
        }
        self.height = self.height >> 2;
    }

    /// The floor and ceiling the thing would have at (x, y) from the lines
    /// it touches, and whether any line blocks it.
    ///
    /// Doom function `P_CheckPosition`, the line half
    fn check_lines(&self, map: &MapData, x: FixedPoint, y: FixedPoint) -> MoveCheck {
        let sector = map.point_in_sector(x, y);
        let (floor, ceiling) = map
            .sectors
            .get(sector)
            .map(|s| (s.floorheight, s.ceilingheight))
            .unwrap_or_default();
        let mut ctrl = MoveCheck {
            sector,
            floorz: floor,
            ceilingz: ceiling,
            dropoffz: floor,
            blocked: false,
            spec_hits: Vec::new(),
        };
        if self.has_flag(MapObjFlag::Noclip) {
            return ctrl;
        }

        let left = x - self.radius;
        let right = x + self.radius;
        let bottom = y - self.radius;
        let top = y + self.radius;

        for (num, line) in map.linedefs.iter().enumerate() {
            let (lx1, lx2) = min_max(line.v1.x, line.v2.x);
            let (ly1, ly2) = min_max(line.v1.y, line.v2.y);
            if right <= lx1 || left >= lx2 || top <= ly1 || bottom >= ly2 {
                continue;
            }
            // box on line side
            let s = line.point_on_side(left, top);
            if [(right, top), (left, bottom), (right, bottom)]
                .iter()
                .all(|&(px, py)| line.point_on_side(px, py) == s)
            {
                continue;
            }

            // PIT_CheckLine
            let Some(back) = line.backsector else {
                ctrl.blocked = true;
                return ctrl;
            };
            if !self.has_flag(MapObjFlag::Missile) {
                if line.flags & LineDefFlags::Blocking as i16 != 0 {
                    ctrl.blocked = true;
                    return ctrl;
                }
                if line.flags & LineDefFlags::BlockMonsters as i16 != 0
                    && self.player.is_none()
                {
                    ctrl.blocked = true;
                    return ctrl;
                }
            }

            let front = &map.sectors[line.frontsector];
            let back = &map.sectors[back];
            let opentop = front.ceilingheight.min(back.ceilingheight);
            let openbottom = front.floorheight.max(back.floorheight);
            let lowfloor = front.floorheight.min(back.floorheight);
            if opentop < ctrl.ceilingz {
                ctrl.ceilingz = opentop;
            }
            if openbottom > ctrl.floorz {
                ctrl.floorz = openbottom;
            }
            if lowfloor < ctrl.dropoffz {
                ctrl.dropoffz = lowfloor;
            }
            if line.special != 0 {
                ctrl.spec_hits.push(num);
            }
        }
        ctrl
    }

    /// The thing half of `P_CheckPosition`. Returns false if a solid thing
    /// is in the way. Touched specials are recorded for pickup.
    fn check_things(&self, level: &mut Level, x: FixedPoint, y: FixedPoint) -> bool {
        if self.has_flag(MapObjFlag::Noclip) {
            return true;
        }
        let mut touched = Vec::new();
        let mut clear = true;
        for (id, data) in level.thinkers.iter() {
            let Some(other) = data.mobj() else {
                continue;
            };
            if other.flags
                & (MapObjFlag::Solid as u32 | MapObjFlag::Special as u32 | MapObjFlag::Shootable as u32)
                == 0
            {
                continue;
            }
            let blockdist = other.radius + self.radius;
            if (other.x - x).abs() >= blockdist || (other.y - y).abs() >= blockdist {
                continue;
            }
            if other.has_flag(MapObjFlag::Special) {
                if self.has_flag(MapObjFlag::Pickup) {
                    touched.push(id);
                }
                if other.has_flag(MapObjFlag::Solid) {
                    clear = false;
                    break;
                }
                continue;
            }
            if other.has_flag(MapObjFlag::Solid) {
                clear = false;
                break;
            }
        }
        if let Some(player) = self.player {
            for id in touched {
                level.touch_special(player, id);
            }
        }
        clear
    }

    /// Attempt to move to a new position, crossing special lines unless
    /// `Teleport` is set.
    ///
    /// Doom function `P_TryMove`
    pub(crate) fn try_move(
        &mut self,
        level: &mut Level,
        x: FixedPoint,
        y: FixedPoint,
    ) -> Result<bool, LevelError> {
        let ctrl = self.check_lines(&level.map_data, x, y);
        if ctrl.blocked || !self.check_things(level, x, y) {
            return Ok(false);
        }

        if !self.has_flag(MapObjFlag::Noclip) {
            if ctrl.ceilingz - ctrl.floorz < self.height {
                return Ok(false); // doesn't fit
            }
            if !self.has_flag(MapObjFlag::Teleport) && ctrl.ceilingz - self.z < self.height {
                return Ok(false); // mobj must lower itself to fit
            }
            if !self.has_flag(MapObjFlag::Teleport) && ctrl.floorz - self.z > MAXSTEPHEIGHT {
                return Ok(false); // too big a step up
            }
            if self.flags & (MapObjFlag::Dropoff as u32 | MapObjFlag::Float as u32) == 0
                && ctrl.floorz - ctrl.dropoffz > MAXSTEPHEIGHT
            {
                return Ok(false); // don't stand over a dropoff
            }
        }

        let (oldx, oldy) = (self.x, self.y);
        self.floorz = ctrl.floorz;
        self.ceilingz = ctrl.ceilingz;
        self.x = x;
        self.y = y;
        self.sector = ctrl.sector;

        if self.flags & (MapObjFlag::Teleport as u32 | MapObjFlag::Noclip as u32) == 0 {
            for ld in ctrl.spec_hits {
                let line = &level.map_data.linedefs[ld];
                let side = line.point_on_side(self.x, self.y);
                let old_side = line.point_on_side(oldx, oldy);
                if side != old_side && line.special != 0 {
                    level.activate_line_special(ld, old_side, self.player, LineTrigger::Cross)?;
                }
            }
        }
        Ok(true)
    }

    /// Doom function `P_XYMovement`
    fn xy_movement(&mut self, level: &mut Level) -> Result<(), LevelError> {
        if self.momx.is_zero() && self.momy.is_zero() {
            if self.has_flag(MapObjFlag::Skullfly) {
                self.flags &= !(MapObjFlag::Skullfly as u32);
                self.momx = FixedPoint::ZERO;
                self.momy = FixedPoint::ZERO;
                self.momz = FixedPoint::ZERO;
            }
            return Ok(());
        }

        self.momx = self.momx.clamp(-MAXMOVE, MAXMOVE);
        self.momy = self.momy.clamp(-MAXMOVE, MAXMOVE);

        let mut xmove = self.momx;
        let mut ymove = self.momy;
        loop {
            let (ptryx, ptryy);
            if xmove > MAXMOVE / 2 || ymove > MAXMOVE / 2 {
                ptryx = self.x + xmove / 2;
                ptryy = self.y + ymove / 2;
                xmove = xmove >> 1;
                ymove = ymove >> 1;
            } else {
                ptryx = self.x + xmove;
                ptryy = self.y + ymove;
                xmove = FixedPoint::ZERO;
                ymove = FixedPoint::ZERO;
            }

            if !self.try_move(level, ptryx, ptryy)? {
                if self.player.is_some() {
                    self.slide_move(level, ptryx, ptryy)?;
                } else {
                    self.momx = FixedPoint::ZERO;
                    self.momy = FixedPoint::ZERO;
                }
            }

            if xmove.is_zero() && ymove.is_zero() {
                break;
            }
        }

        // slow down
        if self.flags & (MapObjFlag::Missile as u32 | MapObjFlag::Skullfly as u32) != 0 {
            return Ok(()); // no friction for missiles ever
        }
        if self.z > self.floorz {
            return Ok(()); // no friction when airborne
        }

        if self.has_flag(MapObjFlag::Corpse) {
            // do not stop sliding if halfway off a step with some momentum
            let quarter = FixedPoint::new(FRACUNIT / 4);
            if (self.momx > quarter || self.momx < -quarter || self.momy > quarter || self.momy < -quarter)
                && self.floorz != level.map_data.sectors[self.sector].floorheight
            {
                return Ok(());
            }
        }

        let no_input = match self.player {
            Some(p) => {
                let cmd = &level.player_cmds[p];
                cmd.forwardmove == 0 && cmd.sidemove == 0
            }
            None => true,
        };
        if self.momx > -STOPSPEED
            && self.momx < STOPSPEED
            && self.momy > -STOPSPEED
            && self.momy < STOPSPEED
            && no_input
        {
            self.momx = FixedPoint::ZERO;
            self.momy = FixedPoint::ZERO;
        } else {
            self.momx = self.momx * FRICTION;
            self.momy = self.momy * FRICTION;
        }
        Ok(())
    }

    /// Players slide along walls rather than stopping dead. This tries each
    /// axis of the move on its own.
    fn slide_move(&mut self, level: &mut Level, ptryx: FixedPoint, ptryy: FixedPoint) -> Result<(), LevelError> {
        if self.try_move(level, self.x, ptryy)? {
            self.momx = FixedPoint::ZERO;
            return Ok(());
        }
        if self.try_move(level, ptryx, self.y)? {
            self.momy = FixedPoint::ZERO;
            return Ok(());
        }
        self.momx = FixedPoint::ZERO;
        self.momy = FixedPoint::ZERO;
        Ok(())
    }

    /// Doom function `P_ZMovement`
    fn z_movement(&mut self, level: &Level, id: ThinkerId) {
        // check for smooth step up
        if self.player.is_some() && self.z < self.floorz {
            self.view_step += self.floorz - self.z;
        }

        // adjust height
        self.z += self.momz;

        // clip movement
        if self.z <= self.floorz {
            // hit the floor
            if self.has_flag(MapObjFlag::Skullfly) {
                // the skull slammed into something
                self.momz = -self.momz;
            }

            if self.momz < FixedPoint::ZERO {
                if self.player.is_some() && self.momz < -(GRAVITY * 8) {
                    // Squat down. Decrease viewheight for a moment after
                    // hitting the ground (hard), and utter appropriate sound.
                    self.view_squat = Some(self.momz >> 3);
                    level.start_sound(SfxName::Oof, self.x, self.y, MapObject::sound_uid(id));
                }
                self.momz = FixedPoint::ZERO;
            }
            self.z = self.floorz;
        } else if !self.has_flag(MapObjFlag::Nogravity) {
            if self.momz.is_zero() {
                self.momz = -(GRAVITY * 2);
            } else {
                self.momz -= GRAVITY;
            }
        }

        if self.z + self.height > self.ceilingz {
            // hit the ceiling
            if self.momz > FixedPoint::ZERO {
                self.momz = FixedPoint::ZERO;
            }
            self.z = self.ceilingz - self.height;
            if self.has_flag(MapObjFlag::Skullfly) {
                self.momz = -self.momz;
            }
        }
    }

    /// Re-fit the thing to the floor and ceiling after a sector height change.
    /// Returns true if it still fits.
    ///
    /// Doom function `P_ThingHeightClip`
    pub(crate) fn height_clip(&mut self, map: &MapData) -> bool {
        let onfloor = self.z == self.floorz;
        let ctrl = self.check_lines(map, self.x, self.y);
        self.floorz = ctrl.floorz;
        self.ceilingz = ctrl.ceilingz;

        if onfloor {
            // walking monsters rise and fall with the floor
            self.z = self.floorz;
        } else if self.z + self.height > self.ceilingz {
            // don't adjust a floating monster unless forced to
            self.z = self.ceilingz - self.height;
        }

        self.ceilingz - self.floorz >= self.height
    }
}

/// Doom function `P_MobjThinker`, minus the state machine
impl Think for MapObject {
    fn think(&mut self, id: ThinkerId, level: &mut Level) -> Result<(), LevelError> {
        if !self.momx.is_zero() || !self.momy.is_zero() || self.has_flag(MapObjFlag::Skullfly) {
            self.xy_movement(level)?;
        }
        if self.z != self.floorz || !self.momz.is_zero() {
            self.z_movement(level, id);
        }
        trace!("Thing {} think at ({}, {}, {})", self.kind, self.x, self.y, self.z);
        Ok(())
    }
}

/// The result of checking a position against lines
#[derive(Debug)]
struct MoveCheck {
    sector: usize,
    floorz: FixedPoint,
    ceilingz: FixedPoint,
    dropoffz: FixedPoint,
    blocked: bool,
    spec_hits: Vec<usize>,
}

fn min_max(a: FixedPoint, b: FixedPoint) -> (FixedPoint, FixedPoint) {
    if a < b { (a, b) } else { (b, a) }
}

/// Spawn flags bit for the skill. Easy and Baby share a bit, as do Hard and
/// Nightmare.
pub const fn skill_bit(skill: Skill) -> i16 {
    match skill {
        Skill::Baby | Skill::Easy => 1,
        Skill::Medium => 2,
        Skill::Hard | Skill::Nightmare => 4,
    }
}

impl Level {
    /// Spawn everything in the map lump, players included.
    ///
    /// Doom function `P_LoadThings`
    pub fn spawn_things(
        &mut self,
        players: &mut [Player; MAXPLAYERS],
        player_in_game: &[bool; MAXPLAYERS],
    ) {
        let things = self.map_data.things().to_vec();
        for thing in things {
            self.spawn_map_thing(thing, players, player_in_game);
        }

        if self.deathmatch {
            for i in 0..MAXPLAYERS {
                if player_in_game[i] {
                    self.deathmatch_spawn_player(i, players);
                }
            }
        }
    }

    /// Doom function `P_SpawnMapThing`
    pub fn spawn_map_thing(
        &mut self,
        mthing: WadThing,
        players: &mut [Player; MAXPLAYERS],
        player_in_game: &[bool; MAXPLAYERS],
    ) {
        // count deathmatch start positions
        if mthing.kind == 11 {
            if self.deathmatch_starts.len() < MAX_DEATHMATCH_STARTS {
                self.deathmatch_starts.push(mthing);
            }
            return;
        }

        // check for players specially
        if (1..=4).contains(&mthing.kind) {
            let p = (mthing.kind - 1) as usize;
            // save spots for respawning in network games
            self.player_starts[p] = Some(mthing);
            if !self.deathmatch && player_in_game[p] {
                self.spawn_player(&mthing, p, &mut players[p]);
            }
            return;
        }

        // check for appropriate skill level
        if !self.netgame && mthing.flags & MTF_SINGLE_PLAYER != 0 {
            return;
        }
        if mthing.flags & skill_bit(self.skill) == 0 {
            return;
        }

        let info = info_for_kind(mthing.kind);
        if info.doomednum == 0 {
            trace!("P_SpawnMapThing: no info for type {}, spawning inert", mthing.kind);
        }
        // don't spawn keycards and players in deathmatch
        if self.deathmatch && info.flags & MapObjFlag::Notdmatch as u32 != 0 {
            return;
        }
        // don't spawn any monsters if -nomonsters
        if self.nomonsters && (mthing.kind == 3006 || info.flags & MapObjFlag::Countkill as u32 != 0) {
            return;
        }

        let z = if info.flags & MapObjFlag::Spawnceiling as u32 != 0 {
            SpawnZ::OnCeiling
        } else {
            SpawnZ::OnFloor
        };
        let mut mobj = MapObject::new(
            &self.map_data,
            FixedPoint::from_int(mthing.x as i32),
            FixedPoint::from_int(mthing.y as i32),
            z,
            mthing.kind,
        );
        if mobj.has_flag(MapObjFlag::Countkill) {
            self.total_kills += 1;
        }
        if mobj.has_flag(MapObjFlag::Countitem) {
            self.total_items += 1;
        }
        mobj.angle = Angle::from_map_degrees(mthing.angle);
        if mthing.flags & MTF_AMBUSH != 0 {
            mobj.flags |= MapObjFlag::Ambush as u32;
        }
        mobj.spawnpoint = mthing;
        self.thinkers.push(ThinkerData::MapObject(mobj));
    }

    /// Called when a player is spawned on the level. Most of the player
    /// structure stays unchanged between levels.
    ///
    /// Doom function `P_SpawnPlayer`
    pub fn spawn_player(&mut self, mthing: &WadThing, num: usize, player: &mut Player) {
        if player.player_state == PlayerState::Reborn {
            player.reborn(self.game_mode);
        }

        let mut mobj = MapObject::new(
            &self.map_data,
            FixedPoint::from_int(mthing.x as i32),
            FixedPoint::from_int(mthing.y as i32),
            SpawnZ::OnFloor,
            PLAYER_KIND,
        );
        mobj.angle = Angle::from_map_degrees(mthing.angle);
        mobj.player = Some(num);
        mobj.health = player.health;
        mobj.reactiontime = 0;
        mobj.spawnpoint = *mthing;

        let id = self.thinkers.push(ThinkerData::MapObject(mobj));
        player.spawned(id);
        debug!("Spawned player {} at ({}, {})", num + 1, mthing.x, mthing.y);
    }

    /// Returns false if the player cannot be respawned at the given spot
    /// because something is occupying it.
    ///
    /// Doom function `G_CheckSpot`
    pub fn check_spot(&self, mthing: &WadThing) -> bool {
        let x = FixedPoint::from_int(mthing.x as i32);
        let y = FixedPoint::from_int(mthing.y as i32);
        let radius = info_for_kind(PLAYER_KIND).radius;
        !self.thinkers.iter().any(|(_, d)| {
            d.mobj().is_some_and(|m| {
                m.has_flag(MapObjFlag::Solid)
                    && (m.x - x).abs() < m.radius + radius
                    && (m.y - y).abs() < m.radius + radius
            })
        })
    }

    /// Spawns a player at one of the random death match spots. Falls back to
    /// the player's own start if the spots are all occupied.
    ///
    /// Doom function `G_DeathMatchSpawnPlayer`
    pub fn deathmatch_spawn_player(&mut self, num: usize, players: &mut [Player; MAXPLAYERS]) {
        let selections = self.deathmatch_starts.len();
        if selections < 4 {
            warn!("Only {selections} deathmatch spots, 4 required");
        }
        if selections > 0 {
            for _ in 0..20 {
                let i = math::p_random() as usize % selections;
                let mut spot = self.deathmatch_starts[i];
                if self.check_spot(&spot) {
                    spot.kind = num as i16 + 1;
                    self.spawn_player(&spot, num, &mut players[num]);
                    return;
                }
            }
        }
        if let Some(start) = self.player_starts[num] {
            self.spawn_player(&start, num, &mut players[num]);
        }
    }

    /// Respawn a dead netgame player without reloading the level. The old body
    /// stays behind as a corpse.
    ///
    /// Doom function `G_DoReborn`, the netgame half
    pub fn respawn_player(&mut self, num: usize, players: &mut [Player; MAXPLAYERS]) {
        // dissasociate the corpse
        if let Some(id) = players[num].mobj {
            if let Some(mobj) = self.thinkers.get_mut(id).and_then(|d| d.mobj_mut()) {
                mobj.player = None;
            }
        }

        if self.deathmatch {
            self.deathmatch_spawn_player(num, players);
            return;
        }

        if let Some(start) = self.player_starts[num] {
            if self.check_spot(&start) {
                self.spawn_player(&start, num, &mut players[num]);
                return;
            }
        }

        // try to spawn at one of the other players spots
        for i in 0..MAXPLAYERS {
            if let Some(mut start) = self.player_starts[i] {
                if self.check_spot(&start) {
                    // fake as other player
                    start.kind = num as i16 + 1;
                    self.spawn_player(&start, num, &mut players[num]);
                    return;
                }
            }
        }

        // he's going to be inside something. Too bad.
        if let Some(start) = self.player_starts[num] {
            self.spawn_player(&start, num, &mut players[num]);
        }
    }
}

#[cfg(test)]
mod tests {
    use math::FixedPoint;

    use super::{MapObjFlag, MapObject, PLAYER_KIND, SpawnZ};
    use crate::{
        Skill,
        level::tests::{new_level, test_level, test_level_with_players, test_players},
        thinker::ThinkerData,
    };

    #[test]
    fn spawn_counts_and_skill() {
        let level = test_level();
        // zombieman and the health bonus both spawn on medium
        assert_eq!(level.total_kills, 1);
        assert_eq!(level.total_items, 1);
        assert_eq!(level.deathmatch_starts.len(), 1);
        assert!(level.player_starts[0].is_some());
        assert!(level.player_starts[1].is_some());
    }

    #[test]
    fn nomonsters() {
        let mut players = test_players();
        let mut level = new_level(Skill::Medium);
        level.nomonsters = true;
        level.spawn_things(&mut players, &[true, false, false, false]);
        assert_eq!(level.total_kills, 0);
        assert_eq!(level.total_items, 1);
    }

    #[test]
    fn walk_into_wall() {
        let mut level = test_level();
        let f = FixedPoint::from_int;
        let mut mobj = MapObject::new(&level.map_data, f(100), f(100), SpawnZ::OnFloor, 3004);
        assert_eq!(mobj.sector, 0);
        // open floor
        assert!(mobj.try_move(&mut level, f(110), f(100)).unwrap());
        // through the outer wall
        assert!(!mobj.try_move(&mut level, f(10), f(100)).unwrap());
        // step of 64 on to the lift is too high
        assert!(!mobj.try_move(&mut level, f(200), f(256)).unwrap());
        mobj.flags |= MapObjFlag::Noclip as u32;
        assert!(mobj.try_move(&mut level, f(256), f(256)).unwrap());
        assert_eq!(mobj.sector, 1);
    }

    #[test]
    fn solid_things_block() {
        let mut level = test_level();
        let f = FixedPoint::from_int;
        let mut mobj = MapObject::new(&level.map_data, f(400), f(448), SpawnZ::OnFloor, 3004);
        // zombieman stands at (448, 448)
        assert!(!mobj.try_move(&mut level, f(420), f(448)).unwrap());
        assert!(mobj.try_move(&mut level, f(400), f(400)).unwrap());
    }

    #[test]
    fn friction_and_stop() {
        let mut level = test_level();
        let f = FixedPoint::from_int;
        let id = MapObject::spawn(&mut level, f(100), f(100), SpawnZ::OnFloor, 3004);
        {
            let mobj = level.thinkers.get_mut(id).unwrap().mobj_mut().unwrap();
            mobj.momx = f(4);
        }
        for _ in 0..200 {
            level.run_thinkers().unwrap();
        }
        let mobj = level.thinkers.get(id).unwrap().mobj().unwrap();
        assert!(mobj.momx.is_zero());
        assert!(mobj.x > f(100));
        assert_eq!(mobj.y, f(100));
    }

    #[test]
    fn gravity_lands() {
        let mut level = test_level();
        let f = FixedPoint::from_int;
        let id = MapObject::spawn(&mut level, f(100), f(100), SpawnZ::At(f(60)), 3004);
        for _ in 0..20 {
            level.run_thinkers().unwrap();
        }
        let mobj = level.thinkers.get(id).unwrap().mobj().unwrap();
        assert_eq!(mobj.z, FixedPoint::ZERO);
        assert!(mobj.momz.is_zero());
    }

    #[test]
    fn world_damage() {
        let mut level = test_level();
        let f = FixedPoint::from_int;
        let mut mobj = MapObject::new(&level.map_data, f(100), f(100), SpawnZ::OnFloor, 3004);
        assert!(!mobj.take_world_damage(10));
        assert!(mobj.take_world_damage(10));
        assert!(!mobj.has_flag(MapObjFlag::Shootable));
        assert!(mobj.has_flag(MapObjFlag::Corpse));

        let mut body = MapObject::new(&level.map_data, f(100), f(100), SpawnZ::OnFloor, PLAYER_KIND);
        body.player = Some(0);
        assert!(!body.take_world_damage(10));
        assert_eq!(body.pending_damage, 10);
        assert_eq!(body.health, 100);

        body.pending_damage = 0;
        level.thinkers.push(ThinkerData::MapObject(body));
        assert_eq!(level.thinkers.len(), 4);
    }

    #[test]
    fn netgame_respawn() {
        let (mut level, mut players) = test_level_with_players();
        let old = players[0].mobj.unwrap();
        level.respawn_player(0, &mut players);
        let new = players[0].mobj.unwrap();
        assert_ne!(old, new);
        // the corpse is left behind without an owner, the new body is at the start
        assert_eq!(level.thinkers.get(old).unwrap().mobj().unwrap().player, None);
        // the old body still occupies player 1's start, so player 2's was used
        let body = level.thinkers.get(new).unwrap().mobj().unwrap();
        assert_eq!(body.player, Some(0));
        assert_eq!(body.x, FixedPoint::from_int(64));
    }
}
