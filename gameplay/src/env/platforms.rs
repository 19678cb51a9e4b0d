//! Platform movement thinker: raise and lower. Can be crushers and can be repeating movements.
//!
//! Doom source name `p_plats`

use log::{debug, warn};
use math::{FixedPoint, p_random};
use sound_traits::SfxName;

use crate::{
    doom_def::TICRATE,
    env::specials::{
        PlaneResult, find_highest_floor_surrounding, find_lowest_floor_surrounding,
        find_next_highest_floor, move_plane,
    },
    level::{Level, LevelError},
    thinker::{Think, ThinkerData, ThinkerId},
};

pub const PLATSPEED: FixedPoint = FixedPoint::UNIT;
pub const PLATWAIT: i32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd)]
pub enum PlatStatus {
    Up,
    Down,
    Waiting,
    InStasis,
}

impl PlatStatus {
    pub fn to_byte(self) -> u8 {
        self as u8
    }

    pub fn from_byte(b: u8) -> Option<Self> {
        match b {
            0 => Some(PlatStatus::Up),
            1 => Some(PlatStatus::Down),
            2 => Some(PlatStatus::Waiting),
            3 => Some(PlatStatus::InStasis),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatKind {
    PerpetualRaise,
    DownWaitUpStay,
    RaiseAndChange,
    RaiseToNearestAndChange,
    BlazeDWUS,
}

impl PlatKind {
    pub fn to_byte(self) -> u8 {
        self as u8
    }

    pub fn from_byte(b: u8) -> Option<Self> {
        match b {
            0 => Some(PlatKind::PerpetualRaise),
            1 => Some(PlatKind::DownWaitUpStay),
            2 => Some(PlatKind::RaiseAndChange),
            3 => Some(PlatKind::RaiseToNearestAndChange),
            4 => Some(PlatKind::BlazeDWUS),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Platform {
    pub sector: usize,
    pub speed: FixedPoint,
    pub low: FixedPoint,
    pub high: FixedPoint,
    pub wait: i32,
    pub count: i32,
    pub status: PlatStatus,
    pub old_status: PlatStatus,
    pub crush: bool,
    pub tag: i16,
    pub kind: PlatKind,
}

/// The set of platforms that can be stopped and restarted by tag. Movers
/// that run to completion are removed as they finish.
#[derive(Debug, Default)]
pub struct PlatformRegistry {
    active: Vec<ThinkerId>,
    capacity: usize,
}

impl PlatformRegistry {
    pub fn new(capacity: usize) -> Self {
        Self {
            active: Vec::with_capacity(capacity),
            capacity,
        }
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    pub fn contains(&self, id: ThinkerId) -> bool {
        self.active.contains(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ThinkerId> {
        self.active.iter()
    }

    pub fn clear(&mut self) {
        self.active.clear();
    }
}

/// Stop the first moving platform tagged like the line
pub fn ev_stop_platform(level: &mut Level, line: usize) {
    let tag = level.map_data.linedefs[line].tag;
    level.stop_platform(tag);
}

/// Start a platform on every free sector tagged like `line`. Returns true if
/// any sector got one.
///
/// Doom function `EV_DoPlat`
pub fn ev_do_platform(
    level: &mut Level,
    line: usize,
    kind: PlatKind,
    amount: i32,
) -> Result<bool, LevelError> {
    let mut ret = false;
    let tag = level.map_data.linedefs[line].tag;
    let front_floorpic = level.map_data.sectors[level.map_data.linedefs[line].frontsector].floorpic;

    // Activate all <type> plats that are in_stasis
    if kind == PlatKind::PerpetualRaise {
        level.activate_in_stasis(tag);
    }

    let tagged: Vec<usize> = level
        .map_data
        .sectors
        .iter()
        .filter(|s| s.tag == tag)
        .map(|s| s.num)
        .collect();

    for secnum in tagged {
        if level.map_data.sectors[secnum].specialdata.is_some() {
            continue;
        }
        ret = true;

        let floorheight = level.map_data.sectors[secnum].floorheight;
        let mut platform = Platform {
            sector: secnum,
            speed: PLATSPEED,
            low: floorheight,
            high: FixedPoint::ZERO,
            wait: 0,
            count: 0,
            status: PlatStatus::InStasis,
            old_status: PlatStatus::InStasis,
            crush: false,
            tag,
            kind,
        };

        let sfx = match kind {
            PlatKind::RaiseToNearestAndChange => {
                platform.speed = PLATSPEED / 2;
                platform.high = find_next_highest_floor(&level.map_data, secnum, floorheight);
                platform.wait = 0;
                platform.status = PlatStatus::Up;
                let sec = &mut level.map_data.sectors[secnum];
                // no more damage, if applicable
                sec.special = 0;
                sec.floorpic = front_floorpic;
                SfxName::Stnmov
            }
            PlatKind::RaiseAndChange => {
                platform.speed = PLATSPEED / 2;
                platform.high = floorheight + FixedPoint::from_int(amount);
                platform.wait = 0;
                platform.status = PlatStatus::Up;
                level.map_data.sectors[secnum].floorpic = front_floorpic;
                SfxName::Stnmov
            }
            PlatKind::DownWaitUpStay | PlatKind::BlazeDWUS => {
                platform.speed = if kind == PlatKind::BlazeDWUS {
                    PLATSPEED * 8
                } else {
                    PLATSPEED * 4
                };
                platform.low = find_lowest_floor_surrounding(&level.map_data, secnum).min(floorheight);
                platform.high = floorheight;
                platform.wait = TICRATE * PLATWAIT;
                platform.status = PlatStatus::Down;
                SfxName::Pstart
            }
            PlatKind::PerpetualRaise => {
                platform.low = find_lowest_floor_surrounding(&level.map_data, secnum).min(floorheight);
                platform.high = find_highest_floor_surrounding(&level.map_data, secnum).max(floorheight);
                platform.wait = TICRATE * PLATWAIT;
                platform.status = if p_random() & 1 == 0 {
                    PlatStatus::Up
                } else {
                    PlatStatus::Down
                };
                SfxName::Pstart
            }
        };
        level.start_sector_sound(sfx, secnum);

        debug!(
            "Platform {:?} on sector {secnum}: low {}, high {}",
            kind, platform.low, platform.high
        );
        let id = level.thinkers.push(ThinkerData::Platform(platform));
        level.map_data.sectors[secnum].specialdata = Some(id);
        level.add_active_platform(id)?;
    }
    Ok(ret)
}

impl Think for Platform {
    /// Move a plat up and down
    ///
    /// Doom function `T_PlatRaise`
    fn think(&mut self, id: ThinkerId, level: &mut Level) -> Result<(), LevelError> {
        match self.status {
            PlatStatus::Up => {
                let res = move_plane(level, self.sector, self.speed, self.high, self.crush, 0, 1);

                if matches!(
                    self.kind,
                    PlatKind::RaiseAndChange | PlatKind::RaiseToNearestAndChange
                ) && level.level_time & 7 == 0
                    && level.map_data.sectors[self.sector].floorheight != self.high
                {
                    level.start_sector_sound(SfxName::Stnmov, self.sector);
                }

                if res == PlaneResult::Crushed && !self.crush {
                    self.count = self.wait;
                    self.status = PlatStatus::Down;
                    level.start_sector_sound(SfxName::Pstart, self.sector);
                } else if res == PlaneResult::PastDest {
                    self.count = self.wait;
                    self.status = PlatStatus::Waiting;
                    level.start_sector_sound(SfxName::Pstop, self.sector);

                    match self.kind {
                        PlatKind::BlazeDWUS
                        | PlatKind::DownWaitUpStay
                        | PlatKind::RaiseAndChange
                        | PlatKind::RaiseToNearestAndChange => {
                            level.remove_active_platform(id);
                        }
                        PlatKind::PerpetualRaise => {}
                    }
                }
            }
            PlatStatus::Down => {
                let res = move_plane(level, self.sector, self.speed, self.low, false, 0, -1);

                if res == PlaneResult::PastDest {
                    self.count = self.wait;
                    self.status = PlatStatus::Waiting;
                    level.start_sector_sound(SfxName::Pstop, self.sector);
                }
            }
            PlatStatus::Waiting => {
                self.count -= 1;
                if self.count == 0 {
                    if level.map_data.sectors[self.sector].floorheight == self.low {
                        self.status = PlatStatus::Up;
                    } else {
                        self.status = PlatStatus::Down;
                    }
                    level.start_sector_sound(SfxName::Pstart, self.sector);
                }
            }
            PlatStatus::InStasis => {}
        }
        Ok(())
    }
}

impl Level {
    /// Track a platform so it can be stopped and started by tag.
    ///
    /// Doom function `P_AddActivePlat`
    pub fn add_active_platform(&mut self, id: ThinkerId) -> Result<(), LevelError> {
        if self.active_platforms.active.len() >= self.active_platforms.capacity {
            warn!("No more platforms, {} active", self.active_platforms.len());
            return Err(LevelError::PlatformTableFull(self.active_platforms.len()));
        }
        self.active_platforms.active.push(id);
        Ok(())
    }

    /// Finished with the platform: free its sector and remove the thinker.
    ///
    /// Doom function `P_RemoveActivePlat`
    pub fn remove_active_platform(&mut self, id: ThinkerId) {
        if let Some(pos) = self.active_platforms.active.iter().position(|p| *p == id) {
            self.active_platforms.active.remove(pos);
        }
        // The platform may be mid-think and so not resolvable, find the
        // sector by its claim instead
        for sector in self.map_data.sectors.iter_mut() {
            if sector.specialdata == Some(id) {
                sector.specialdata = None;
            }
        }
        self.thinkers.mark_remove(id);
    }

    /// Restart every parked platform with this tag.
    ///
    /// Doom function `P_ActivateInStasis`
    pub fn activate_in_stasis(&mut self, tag: i16) {
        for id in self.active_platforms.active.clone() {
            if let Some(platform) = self.thinkers.get_mut(id).and_then(|t| t.platform_mut()) {
                if platform.tag == tag && platform.status == PlatStatus::InStasis {
                    platform.status = platform.old_status;
                }
            }
        }
    }

    /// Park the first moving platform with this tag.
    ///
    /// Doom function `EV_StopPlat`
    pub fn stop_platform(&mut self, tag: i16) {
        for id in self.active_platforms.active.clone() {
            if let Some(platform) = self.thinkers.get_mut(id).and_then(|t| t.platform_mut()) {
                if platform.status != PlatStatus::InStasis && platform.tag == tag {
                    platform.old_status = platform.status;
                    platform.status = PlatStatus::InStasis;
                    return;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc::channel;

    use math::FixedPoint;
    use sound_traits::{SfxName, SoundAction};

    use super::{PlatKind, PlatStatus, ev_do_platform};
    use crate::{
        LevelLimits,
        level::{LevelError, tests::test_level},
        thing::{MapObject, SpawnZ},
        thinker::ThinkerData,
    };

    fn lift_floor(level: &crate::Level) -> FixedPoint {
        level.map_data.sectors[1].floorheight
    }

    #[test]
    fn down_wait_up_stay_cycle() {
        let mut level = test_level();
        assert!(ev_do_platform(&mut level, 4, PlatKind::DownWaitUpStay, 0).unwrap());
        let id = level.map_data.sectors[1].specialdata.unwrap();

        // 64 units at 4 per tic, the last tic hits the destination
        for _ in 0..17 {
            level.run_thinkers().unwrap();
            level.level_time += 1;
        }
        assert_eq!(lift_floor(&level), FixedPoint::ZERO);
        let plat = level.thinkers.get(id).and_then(ThinkerData::platform).unwrap();
        assert_eq!(plat.status, PlatStatus::Waiting);
        assert_eq!(plat.count, 105);

        for _ in 0..105 {
            level.run_thinkers().unwrap();
            level.level_time += 1;
        }
        let plat = level.thinkers.get(id).and_then(ThinkerData::platform).unwrap();
        assert_eq!(plat.status, PlatStatus::Up);

        for _ in 0..17 {
            level.run_thinkers().unwrap();
            level.level_time += 1;
        }
        assert_eq!(lift_floor(&level), FixedPoint::from_int(64));
        // done, so removed and the sector is free again
        assert!(level.thinkers.get(id).is_none());
        assert!(level.map_data.sectors[1].specialdata.is_none());
        assert!(level.active_platforms.is_empty());
    }

    #[test]
    fn one_mover_per_sector() {
        let mut level = test_level();
        assert!(ev_do_platform(&mut level, 4, PlatKind::DownWaitUpStay, 0).unwrap());
        assert!(!ev_do_platform(&mut level, 4, PlatKind::BlazeDWUS, 0).unwrap());
        assert_eq!(level.active_platforms.len(), 1);
        let platforms = level
            .thinkers
            .iter()
            .filter(|(_, t)| t.platform().is_some())
            .count();
        assert_eq!(platforms, 1);
    }

    #[test]
    fn raise_and_change_copies_pic() {
        let mut level = test_level();
        level.map_data.sectors[1].floorheight = FixedPoint::ZERO;
        assert!(ev_do_platform(&mut level, 4, PlatKind::RaiseAndChange, 24).unwrap());
        let id = level.map_data.sectors[1].specialdata.unwrap();
        assert_eq!(level.map_data.sectors[1].floorpic, level.map_data.sectors[0].floorpic);
        let plat = level.thinkers.get(id).and_then(ThinkerData::platform).unwrap();
        assert_eq!(plat.high, FixedPoint::from_int(24));
        assert_eq!(plat.speed, FixedPoint::new(0x8000));
    }

    #[test]
    fn blocked_raise_returns_to_start() {
        let mut level = test_level();
        let f = FixedPoint::from_int;
        // 56 high in 64 of headroom, the floor can only rise 8
        MapObject::spawn(&mut level, f(256), f(256), SpawnZ::OnFloor, 3004);
        assert!(ev_do_platform(&mut level, 4, PlatKind::RaiseAndChange, 24).unwrap());
        let id = level.map_data.sectors[1].specialdata.unwrap();
        let plat = level.thinkers.get(id).and_then(ThinkerData::platform).unwrap();
        assert_eq!(plat.low, f(64));

        for _ in 0..60 {
            level.run_thinkers().unwrap();
            level.level_time += 1;
        }
        assert_eq!(lift_floor(&level), f(64));
        let plat = level.thinkers.get(id).and_then(ThinkerData::platform).unwrap();
        assert_eq!(plat.status, PlatStatus::Waiting);
    }

    #[test]
    fn no_move_sound_at_the_top() {
        let mut level = test_level();
        let (tx, rx) = channel();
        level.snd_command = tx;
        assert!(ev_do_platform(&mut level, 4, PlatKind::RaiseAndChange, 8).unwrap());
        rx.try_iter().for_each(drop);

        // 16 tics of rising then a 17th that finds the top, on leveltime 16
        level.level_time = 0;
        for _ in 0..17 {
            level.run_thinkers().unwrap();
            level.level_time += 1;
        }
        assert_eq!(lift_floor(&level), FixedPoint::from_int(72));
        let sounds: Vec<SfxName> = rx
            .try_iter()
            .filter_map(|a| match a {
                SoundAction::StartSfx { sfx, .. } => Some(sfx),
                _ => None,
            })
            .collect();
        let moving = sounds.iter().filter(|s| **s == SfxName::Stnmov).count();
        assert_eq!(moving, 2);
        assert_eq!(sounds.last(), Some(&SfxName::Pstop));
    }

    #[test]
    fn stop_and_restart() {
        let mut level = test_level();
        ev_do_platform(&mut level, 4, PlatKind::PerpetualRaise, 0).unwrap();
        let id = level.map_data.sectors[1].specialdata.unwrap();
        let before = level.thinkers.get(id).and_then(ThinkerData::platform).unwrap().status;

        level.stop_platform(1);
        let plat = level.thinkers.get(id).and_then(ThinkerData::platform).unwrap();
        assert_eq!(plat.status, PlatStatus::InStasis);
        assert_eq!(plat.old_status, before);

        // parked platforms keep their sector, a new perpetual raise wakes them
        assert!(!ev_do_platform(&mut level, 4, PlatKind::PerpetualRaise, 0).unwrap());
        let plat = level.thinkers.get(id).and_then(ThinkerData::platform).unwrap();
        assert_eq!(plat.status, before);
    }

    #[test]
    fn registry_full() {
        let mut level = test_level();
        level.limits = LevelLimits { max_platforms: 0 };
        level.active_platforms = super::PlatformRegistry::new(0);
        assert_eq!(
            ev_do_platform(&mut level, 4, PlatKind::DownWaitUpStay, 0),
            Err(LevelError::PlatformTableFull(0))
        );
    }
}
