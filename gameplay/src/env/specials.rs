//! Sector plane movement and line specials: the things a player triggers by
//! walking over, using, or shooting a line.
//!
//! Doom source name `p_spec`, `p_floor` (move_plane), `p_switch`

use log::{debug, error, trace};
use math::{Angle, FixedPoint};
use sound_traits::SfxName;

use crate::{
    doom_def::{TICRATE, USERANGE},
    env::platforms::{PlatKind, ev_do_platform, ev_stop_platform},
    level::{Level, LevelError, map_data::MapData},
    thing::MapObjFlag,
};

/// How a line special was triggered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineTrigger {
    /// Walked over
    Cross,
    /// Pressed "use" on it
    Use,
    /// Hit by a hitscan attack
    Shoot,
}

/// Tics before a repeatable switch pops back out
pub const BUTTONTIME: i32 = TICRATE;

/// Which sidedef texture a switch uses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonWhere {
    Top,
    Middle,
    Bottom,
}

/// A pressed repeatable switch waiting to reset
#[derive(Debug, Clone)]
pub struct Button {
    pub line: usize,
    pub bwhere: ButtonWhere,
    pub texture: String,
    pub timer: i32,
}

/// Get the sector on the other side of a two-sided line, if any.
///
/// Doom function name `getNextSector`
pub fn get_next_sector(map: &MapData, line: usize, sector: usize) -> Option<usize> {
    let line = &map.linedefs[line];
    if !line.is_two_sided() {
        return None;
    }
    if line.frontsector == sector {
        return line.backsector;
    }
    Some(line.frontsector)
}

fn neighbours(map: &MapData, sector: usize) -> impl Iterator<Item = usize> + '_ {
    map.sectors[sector]
        .lines
        .iter()
        .filter_map(move |&l| get_next_sector(map, l, sector))
}

/// P_FindLowestCeilingSurrounding
pub fn find_lowest_ceiling_surrounding(map: &MapData, sector: usize) -> FixedPoint {
    let mut height = FixedPoint::MAX;
    for other in neighbours(map, sector) {
        height = height.min(map.sectors[other].ceilingheight);
    }
    height
}

/// P_FindHighestCeilingSurrounding
pub fn find_highest_ceiling_surrounding(map: &MapData, sector: usize) -> FixedPoint {
    let mut height = FixedPoint::ZERO;
    for other in neighbours(map, sector) {
        height = height.max(map.sectors[other].ceilingheight);
    }
    height
}

/// P_FindLowestFloorSurrounding
pub fn find_lowest_floor_surrounding(map: &MapData, sector: usize) -> FixedPoint {
    let mut floor = map.sectors[sector].floorheight;
    for other in neighbours(map, sector) {
        floor = floor.min(map.sectors[other].floorheight);
    }
    floor
}

/// P_FindHighestFloorSurrounding
pub fn find_highest_floor_surrounding(map: &MapData, sector: usize) -> FixedPoint {
    let mut floor = FixedPoint::from_int(-500);
    for other in neighbours(map, sector) {
        floor = floor.max(map.sectors[other].floorheight);
    }
    floor
}

/// The lowest neighbouring floor above `current`, or `current` if there is
/// none.
///
/// P_FindNextHighestFloor
pub fn find_next_highest_floor(map: &MapData, sector: usize, current: FixedPoint) -> FixedPoint {
    neighbours(map, sector)
        .map(|other| map.sectors[other].floorheight)
        .filter(|&h| h > current)
        .min()
        .unwrap_or(current)
}

/// Re-fit everything touching the sector after one of its planes moved.
/// Returns true if something no longer fits.
///
/// Doom function `P_ChangeSector`
pub fn change_sector(level: &mut Level, sector: usize, crunch: bool) -> bool {
    let mut no_fit = false;
    let mut remove = Vec::new();
    let mut kills = 0;

    let Level {
        map_data,
        thinkers,
        level_time,
        ..
    } = level;

    let (min, max) = sector_bbox(map_data, sector);
    for (id, data) in thinkers.iter_mut() {
        let Some(thing) = data.mobj_mut() else {
            continue;
        };
        if thing.sector != sector
            && (thing.x + thing.radius <= min.0
                || thing.x - thing.radius >= max.0
                || thing.y + thing.radius <= min.1
                || thing.y - thing.radius >= max.1)
        {
            continue;
        }
        trace!("Thing type {:?} is in affected sector", thing.kind);

        // PIT_ChangeSector
        if thing.height_clip(map_data) {
            continue;
        }
        // crunch bodies to giblets
        if thing.health <= 0 {
            thing.flags &= !(MapObjFlag::Solid as u32);
            thing.height = FixedPoint::ZERO;
            thing.radius = FixedPoint::ZERO;
            continue;
        }
        // crunch dropped items
        if thing.has_flag(MapObjFlag::Dropped) {
            remove.push(id);
            continue;
        }
        if !thing.has_flag(MapObjFlag::Shootable) {
            continue;
        }

        no_fit = true;
        if crunch && *level_time & 3 == 0 && thing.take_world_damage(10) {
            if thing.has_flag(MapObjFlag::Countkill) {
                kills += 1;
            }
        }
    }

    for id in remove {
        level.thinkers.mark_remove(id);
    }
    for _ in 0..kills {
        level.add_unowned_kill();
    }
    no_fit
}

fn sector_bbox(map: &MapData, sector: usize) -> ((FixedPoint, FixedPoint), (FixedPoint, FixedPoint)) {
    let mut min = (FixedPoint::MAX, FixedPoint::MAX);
    let mut max = (FixedPoint::MIN, FixedPoint::MIN);
    for &l in map.sectors[sector].lines.iter() {
        let line = &map.linedefs[l];
        for v in [line.v1, line.v2] {
            min = (min.0.min(v.x), min.1.min(v.y));
            max = (max.0.max(v.x), max.1.max(v.y));
        }
    }
    (min, max)
}

/// The result of raising a plane. `PastDest` = stop, `Crushed` = should crush all in sector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaneResult {
    Ok,
    Crushed,
    PastDest,
}

/// Move a floor (`floor_or_ceiling == 0`) or ceiling (`1`) by `speed` toward
/// `dest`, in `direction` -1 or 1.
///
/// Doom function `T_MovePlane`
pub fn move_plane(
    level: &mut Level,
    sector: usize,
    speed: FixedPoint,
    dest: FixedPoint,
    crush: bool,
    floor_or_ceiling: i32,
    direction: i32,
) -> PlaneResult {
    match floor_or_ceiling {
        0 => {
            // FLOOR
            let height = level.map_data.sectors[sector].floorheight;
            match direction {
                -1 => {
                    // DOWN
                    trace!("move_plane: floor: down: {height} to {dest} at speed {speed}");
                    if height - speed < dest {
                        level.map_data.sectors[sector].floorheight = dest;
                        if change_sector(level, sector, crush) {
                            level.map_data.sectors[sector].floorheight = height;
                            change_sector(level, sector, crush);
                        }
                        return PlaneResult::PastDest;
                    } else {
                        // COULD GET CRUSHED
                        level.map_data.sectors[sector].floorheight = height - speed;
                        if change_sector(level, sector, crush) {
                            if crush {
                                return PlaneResult::Crushed;
                            }
                            level.map_data.sectors[sector].floorheight = height;
                            change_sector(level, sector, crush);
                            return PlaneResult::Crushed;
                        }
                    }
                }
                1 => {
                    // UP
                    trace!("move_plane: floor: up: {height} to {dest} at speed {speed}");
                    if height + speed > dest {
                        level.map_data.sectors[sector].floorheight = dest;
                        if change_sector(level, sector, crush) {
                            level.map_data.sectors[sector].floorheight = height;
                            change_sector(level, sector, crush);
                        }
                        return PlaneResult::PastDest;
                    } else {
                        // COULD GET CRUSHED
                        level.map_data.sectors[sector].floorheight = height + speed;
                        if change_sector(level, sector, crush) {
                            if crush {
                                return PlaneResult::Crushed;
                            }
                            level.map_data.sectors[sector].floorheight = height;
                            change_sector(level, sector, crush);
                            return PlaneResult::Crushed;
                        }
                    }
                }
                _ => error!("Invalid floor direction: {direction}"),
            }
        }
        1 => {
            // CEILING
            let height = level.map_data.sectors[sector].ceilingheight;
            match direction {
                -1 => {
                    // DOWN
                    trace!("move_plane: ceiling: down: {height} to {dest} at speed {speed}");
                    if height - speed < dest {
                        level.map_data.sectors[sector].ceilingheight = dest;
                        if change_sector(level, sector, crush) {
                            level.map_data.sectors[sector].ceilingheight = height;
                            change_sector(level, sector, crush);
                        }
                        return PlaneResult::PastDest;
                    } else {
                        // COULD GET CRUSHED
                        level.map_data.sectors[sector].ceilingheight = height - speed;
                        if change_sector(level, sector, crush) {
                            if crush {
                                return PlaneResult::Crushed;
                            }
                            level.map_data.sectors[sector].ceilingheight = height;
                            change_sector(level, sector, crush);
                            return PlaneResult::Crushed;
                        }
                    }
                }
                1 => {
                    // UP
                    trace!("move_plane: ceiling: up: {height} to {dest} at speed {speed}");
                    if height + speed > dest {
                        level.map_data.sectors[sector].ceilingheight = dest;
                        if change_sector(level, sector, crush) {
                            level.map_data.sectors[sector].ceilingheight = height;
                            change_sector(level, sector, crush);
                        }
                        return PlaneResult::PastDest;
                    } else {
                        level.map_data.sectors[sector].ceilingheight = height + speed;
                        change_sector(level, sector, crush);
                    }
                }
                _ => error!("Invalid ceiling direction: {direction}"),
            }
        }
        _ => error!("Invalid floor_or_ceiling: {floor_or_ceiling}"),
    }

    PlaneResult::Ok
}

impl Level {
    /// Trigger the special on a line. `side` is the side of the line the
    /// activator is on (for crossing, the side it came from), `player` is the
    /// activating player if there is one. Returns true if the special was
    /// recognised for this trigger.
    ///
    /// Doom functions `P_CrossSpecialLine`, `P_UseSpecialLine` and
    /// `P_ShootSpecialLine`
    pub fn activate_line_special(
        &mut self,
        line: usize,
        side: usize,
        player: Option<usize>,
        trigger: LineTrigger,
    ) -> Result<bool, LevelError> {
        let special = self.map_data.linedefs[line].special;
        debug!("Line {line} special {special} triggered by {trigger:?}, player {player:?}");
        match trigger {
            LineTrigger::Cross => self.cross_special_line(line, player),
            LineTrigger::Use => self.use_special_line(line, side, player),
            LineTrigger::Shoot => self.shoot_special_line(line, player),
        }
    }

    fn cross_special_line(&mut self, line: usize, player: Option<usize>) -> Result<bool, LevelError> {
        let special = self.map_data.linedefs[line].special;
        // Triggers that other things can activate
        if player.is_none() && !matches!(special, 39 | 97 | 125 | 126 | 4 | 10 | 88) {
            return Ok(false);
        }

        match special {
            // TRIGGERS: all from here till the exits can trigger once only
            10 => {
                ev_do_platform(self, line, PlatKind::DownWaitUpStay, 0)?;
                self.map_data.linedefs[line].special = 0;
            }
            22 => {
                ev_do_platform(self, line, PlatKind::RaiseToNearestAndChange, 0)?;
                self.map_data.linedefs[line].special = 0;
            }
            53 => {
                ev_do_platform(self, line, PlatKind::PerpetualRaise, 0)?;
                self.map_data.linedefs[line].special = 0;
            }
            54 => {
                ev_stop_platform(self, line);
                self.map_data.linedefs[line].special = 0;
            }
            121 => {
                ev_do_platform(self, line, PlatKind::BlazeDWUS, 0)?;
                self.map_data.linedefs[line].special = 0;
            }
            52 => self.do_exit_level(),
            124 => self.do_secret_exit_level(),
            // RETRIGGERS
            87 => {
                ev_do_platform(self, line, PlatKind::PerpetualRaise, 0)?;
            }
            88 => {
                ev_do_platform(self, line, PlatKind::DownWaitUpStay, 0)?;
            }
            89 => ev_stop_platform(self, line),
            95 => {
                ev_do_platform(self, line, PlatKind::RaiseToNearestAndChange, 0)?;
            }
            120 => {
                ev_do_platform(self, line, PlatKind::BlazeDWUS, 0)?;
            }
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn use_special_line(
        &mut self,
        line: usize,
        side: usize,
        player: Option<usize>,
    ) -> Result<bool, LevelError> {
        let special = self.map_data.linedefs[line].special;
        // Err...
        // Use the back sides of VERY SPECIAL lines...
        if side != 0 && special != 124 {
            return Ok(false);
        }

        // Switches that other things can activate. Only doors, which are not
        // simulated here.
        if player.is_none() {
            return Ok(false);
        }

        let (kind, amount, use_again) = match special {
            11 => {
                self.change_switch_texture(line, false, true);
                self.do_exit_level();
                return Ok(true);
            }
            51 => {
                self.change_switch_texture(line, false, true);
                self.do_secret_exit_level();
                return Ok(true);
            }
            // SWITCHES
            14 => (PlatKind::RaiseAndChange, 32, false),
            15 => (PlatKind::RaiseAndChange, 24, false),
            20 => (PlatKind::RaiseToNearestAndChange, 0, false),
            21 => (PlatKind::DownWaitUpStay, 0, false),
            122 => (PlatKind::BlazeDWUS, 0, false),
            // BUTTONS
            62 => (PlatKind::DownWaitUpStay, 1, true),
            66 => (PlatKind::RaiseAndChange, 24, true),
            67 => (PlatKind::RaiseAndChange, 32, true),
            68 => (PlatKind::RaiseToNearestAndChange, 0, true),
            123 => (PlatKind::BlazeDWUS, 0, true),
            _ => return Ok(false),
        };

        if ev_do_platform(self, line, kind, amount)? {
            self.change_switch_texture(line, use_again, false);
        }
        Ok(true)
    }

    fn shoot_special_line(&mut self, line: usize, player: Option<usize>) -> Result<bool, LevelError> {
        let special = self.map_data.linedefs[line].special;
        // Impacts that other things can activate.
        if player.is_none() && special != 46 {
            return Ok(false);
        }
        match special {
            47 => {
                // RAISE FLOOR NEAR AND CHANGE
                if ev_do_platform(self, line, PlatKind::RaiseToNearestAndChange, 0)? {
                    self.change_switch_texture(line, false, false);
                }
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Flip the switch texture on the line's front side. One-shot switches
    /// lose their special; repeatable ones get a timer to pop back out.
    ///
    /// Doom function `P_ChangeSwitchTexture`
    pub fn change_switch_texture(&mut self, line: usize, use_again: bool, exit: bool) {
        if !use_again {
            self.map_data.linedefs[line].special = 0;
        }
        let sfx = if exit { SfxName::Swtchx } else { SfxName::Swtchn };

        let (sidedef, frontsector) = {
            let l = &self.map_data.linedefs[line];
            (l.front_sidedef, l.frontsector)
        };
        let pressed = {
            let side = &mut self.map_data.sidedefs[sidedef];
            let slots = [
                (ButtonWhere::Top, &mut side.toptexture),
                (ButtonWhere::Middle, &mut side.midtexture),
                (ButtonWhere::Bottom, &mut side.bottomtexture),
            ];
            slots.into_iter().find_map(|(bwhere, tex)| {
                let flipped = flip_switch_name(tex)?;
                Some((bwhere, std::mem::replace(tex, flipped)))
            })
        };

        // Not a switch texture still makes the noise
        self.start_sector_sound(sfx, frontsector);
        if let Some((bwhere, texture)) = pressed {
            if use_again {
                self.buttons.push(Button {
                    line,
                    bwhere,
                    texture,
                    timer: BUTTONTIME,
                });
            }
        }
    }

    /// Count down the pressed buttons and pop them back out.
    ///
    /// Doom function `P_UpdateSpecials`, the button half
    pub fn update_specials(&mut self) {
        let mut i = 0;
        while i < self.buttons.len() {
            self.buttons[i].timer -= 1;
            if self.buttons[i].timer > 0 {
                i += 1;
                continue;
            }
            let button = self.buttons.swap_remove(i);
            let line = &self.map_data.linedefs[button.line];
            let (sidedef, frontsector) = (line.front_sidedef, line.frontsector);
            let side = &mut self.map_data.sidedefs[sidedef];
            match button.bwhere {
                ButtonWhere::Top => side.toptexture = button.texture,
                ButtonWhere::Middle => side.midtexture = button.texture,
                ButtonWhere::Bottom => side.bottomtexture = button.texture,
            }
            self.start_sector_sound(SfxName::Swtchn, frontsector);
        }
    }

    /// Looks for special lines in front of the player to activate. Walks the
    /// lines crossed by a USERANGE ray from the player, nearest first.
    ///
    /// Doom function `P_UseLines`
    pub fn use_lines(
        &mut self,
        player: usize,
        x: FixedPoint,
        y: FixedPoint,
        angle: Angle,
        uid: usize,
    ) -> Result<(), LevelError> {
        let x2 = x + USERANGE * angle.cos();
        let y2 = y + USERANGE * angle.sin();

        let mut hits: Vec<(i64, usize)> = self
            .map_data
            .linedefs
            .iter()
            .enumerate()
            .filter_map(|(i, l)| {
                intercept_fraction((x, y), (x2, y2), (l.v1.x, l.v1.y), (l.v2.x, l.v2.y))
                    .map(|f| (f, i))
            })
            .collect();
        hits.sort_unstable();

        for (_, l) in hits {
            // PTR_UseTraverse
            let line = &self.map_data.linedefs[l];
            if line.special == 0 {
                if self.line_openrange(l) <= FixedPoint::ZERO {
                    self.start_sound(SfxName::Noway, x, y, uid);
                    // can't use through a wall
                    return Ok(());
                }
                // not a special line, but keep checking
                continue;
            }
            let side = line.point_on_side(x, y);
            self.activate_line_special(l, side, Some(player), LineTrigger::Use)?;
            // can't use for than one special line in a row
            return Ok(());
        }
        Ok(())
    }

    /// The vertical gap through a line. Zero for one-sided lines.
    ///
    /// Doom function `P_LineOpening`
    pub fn line_openrange(&self, line: usize) -> FixedPoint {
        let line = &self.map_data.linedefs[line];
        let Some(back) = line.backsector else {
            return FixedPoint::ZERO;
        };
        let front = &self.map_data.sectors[line.frontsector];
        let back = &self.map_data.sectors[back];
        let opentop = front.ceilingheight.min(back.ceilingheight);
        let openbottom = front.floorheight.max(back.floorheight);
        opentop - openbottom
    }
}

/// SW1 and SW2 prefixed textures are the two states of a switch
fn flip_switch_name(name: &str) -> Option<String> {
    if let Some(rest) = name.strip_prefix("SW1") {
        Some(format!("SW2{rest}"))
    } else {
        name.strip_prefix("SW2").map(|rest| format!("SW1{rest}"))
    }
}

/// Where along the segment `p0`..`p1` it crosses `a`..`b`, as a 16.16
/// fraction, or `None` if they don't cross.
fn intercept_fraction(
    p0: (FixedPoint, FixedPoint),
    p1: (FixedPoint, FixedPoint),
    a: (FixedPoint, FixedPoint),
    b: (FixedPoint, FixedPoint),
) -> Option<i64> {
    let dx = (p1.0 - p0.0).raw() as i128;
    let dy = (p1.1 - p0.1).raw() as i128;
    let ex = (b.0 - a.0).raw() as i128;
    let ey = (b.1 - a.1).raw() as i128;
    let den = dx * ey - dy * ex;
    if den == 0 {
        return None;
    }
    let ax = (a.0 - p0.0).raw() as i128;
    let ay = (a.1 - p0.1).raw() as i128;
    let t = ax * ey - ay * ex;
    let u = ax * dy - ay * dx;
    let (t, u, den) = if den < 0 { (-t, -u, -den) } else { (t, u, den) };
    if t < 0 || t > den || u < 0 || u > den {
        return None;
    }
    Some(((t << 16) / den) as i64)
}
