//! Save game archive codec. A save is a fixed header followed by the players,
//! the world geometry, the map objects and the active movers, each section in
//! the order the game unarchives them, and a single EOF byte.
//!
//! All multi-byte values are little-endian except the level time in the
//! header, which is three bytes big-endian.
//!
//! Doom source name `p_saveg`

use std::{error::Error, fmt};

use log::{debug, warn};
use math::{Angle, FixedPoint};
use wad::lumps::WadThing;

use crate::{
    Skill,
    doom_def::{AmmoType, Card, DOOM_VERSION, GameMission, MAXPLAYERS, PowerType, WeaponType},
    env::platforms::{PlatKind, PlatStatus, Platform},
    level::{Level, LevelError},
    player::{Player, PlayerState},
    thing::{MapObject, SpawnZ},
    thinker::ThinkerData,
};

pub const SAVESTRINGSIZE: usize = 24;
pub const VERSIONSIZE: usize = 16;
/// Maximum size of a save
pub const SAVEGAMESIZE: usize = 0x2c0000;
pub const SAVE_EOF: u8 = 0x1d;

const TC_END: u8 = 0;
const TC_MOBJ: u8 = 1;
const TC_PLAT: u8 = 3;
const TC_ENDSPECIALS: u8 = 7;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveError {
    /// Version string or header bytes don't match
    BadHeader(String),
    /// Ran out of data at this offset
    UnexpectedEnd(usize),
    /// An unknown thinker tag at this offset
    BadRecord { tag: u8, pos: usize },
    /// The archive outgrew `SAVEGAMESIZE`
    Overrun(usize),
    /// The last byte wasn't `SAVE_EOF`
    BadEof,
    /// The restored level couldn't take a record
    Level(LevelError),
}

impl Error for SaveError {}

impl fmt::Display for SaveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SaveError::BadHeader(m) => write!(f, "Bad savegame header: {m}"),
            SaveError::UnexpectedEnd(p) => write!(f, "Savegame ended early at byte {p}"),
            SaveError::BadRecord { tag, pos } => {
                write!(f, "Unknown tclass {tag} in savegame at byte {pos}")
            }
            SaveError::Overrun(s) => write!(f, "Savegame buffer overrun ({s} bytes)"),
            SaveError::BadEof => write!(f, "Bad savegame"),
            SaveError::Level(e) => write!(f, "Savegame restore failed: {e}"),
        }
    }
}

impl From<LevelError> for SaveError {
    fn from(e: LevelError) -> Self {
        SaveError::Level(e)
    }
}

/// The `"version 109"` string, zero padded to `VERSIONSIZE`
pub fn version_bytes() -> [u8; VERSIONSIZE] {
    let mut bytes = [0u8; VERSIONSIZE];
    let text = format!("version {DOOM_VERSION}");
    for (b, c) in bytes.iter_mut().zip(text.bytes()) {
        *b = c;
    }
    bytes
}

/// Growable output buffer for an archive
#[derive(Debug, Default)]
pub struct SaveWriter {
    buf: Vec<u8>,
}

impl SaveWriter {
    pub fn new() -> Self {
        Self {
            buf: Vec::with_capacity(0x10000),
        }
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn write_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    pub fn write_bool(&mut self, v: bool) {
        self.buf.push(v as u8);
    }

    pub fn write_i16(&mut self, v: i16) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    pub fn write_i32(&mut self, v: i32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    pub fn write_u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    pub fn write_fixed(&mut self, v: FixedPoint) {
        self.write_i32(v.raw());
    }

    pub fn write_bytes(&mut self, v: &[u8]) {
        self.buf.extend_from_slice(v);
    }

    /// Zero padded or truncated to `len`
    pub fn write_padded(&mut self, s: &str, len: usize) {
        let mut bytes = s.as_bytes().to_vec();
        bytes.resize(len, 0);
        self.buf.extend_from_slice(&bytes);
    }

    /// Add the EOF marker and hand over the bytes, if they fit.
    pub fn finish(mut self) -> Result<Vec<u8>, SaveError> {
        self.buf.push(SAVE_EOF);
        if self.buf.len() > SAVEGAMESIZE {
            return Err(SaveError::Overrun(self.buf.len()));
        }
        Ok(self.buf)
    }
}

/// Cursor over a save's bytes
#[derive(Debug)]
pub struct SaveReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> SaveReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    fn take<const N: usize>(&mut self) -> Result<[u8; N], SaveError> {
        let end = self.pos + N;
        let slice = self
            .data
            .get(self.pos..end)
            .ok_or(SaveError::UnexpectedEnd(self.pos))?;
        let mut out = [0u8; N];
        out.copy_from_slice(slice);
        self.pos = end;
        Ok(out)
    }

    pub fn read_u8(&mut self) -> Result<u8, SaveError> {
        Ok(self.take::<1>()?[0])
    }

    pub fn read_bool(&mut self) -> Result<bool, SaveError> {
        Ok(self.read_u8()? != 0)
    }

    pub fn read_i16(&mut self) -> Result<i16, SaveError> {
        Ok(i16::from_le_bytes(self.take()?))
    }

    pub fn read_i32(&mut self) -> Result<i32, SaveError> {
        Ok(i32::from_le_bytes(self.take()?))
    }

    pub fn read_u32(&mut self) -> Result<u32, SaveError> {
        Ok(u32::from_le_bytes(self.take()?))
    }

    pub fn read_fixed(&mut self) -> Result<FixedPoint, SaveError> {
        Ok(FixedPoint::new(self.read_i32()?))
    }

    /// A zero padded string of `len` bytes
    pub fn read_padded(&mut self, len: usize) -> Result<String, SaveError> {
        let end = self.pos + len;
        let slice = self
            .data
            .get(self.pos..end)
            .ok_or(SaveError::UnexpectedEnd(self.pos))?;
        self.pos = end;
        let text: Vec<u8> = slice.iter().copied().take_while(|b| *b != 0).collect();
        Ok(String::from_utf8_lossy(&text).into_owned())
    }

    /// Checks the trailing marker.
    pub fn read_eof(&mut self) -> Result<(), SaveError> {
        match self.read_u8() {
            Ok(SAVE_EOF) => Ok(()),
            _ => Err(SaveError::BadEof),
        }
    }
}

/// Everything in the header of a save
#[derive(Debug, Clone, PartialEq)]
pub struct SaveHeader {
    pub description: String,
    pub skill: Skill,
    pub episode: i32,
    pub map: i32,
    pub mission: GameMission,
    pub player_in_game: [bool; MAXPLAYERS],
    pub level_time: u32,
}

impl SaveHeader {
    pub fn write(&self, w: &mut SaveWriter) {
        w.write_padded(&self.description, SAVESTRINGSIZE);
        w.write_bytes(&version_bytes());
        w.write_u8(self.skill.to_byte());
        w.write_u8(self.episode as u8);
        w.write_u8(self.map as u8);
        w.write_u8(self.mission.to_byte());
        for p in self.player_in_game {
            w.write_bool(p);
        }
        w.write_u8((self.level_time >> 16) as u8);
        w.write_u8((self.level_time >> 8) as u8);
        w.write_u8(self.level_time as u8);
    }

    /// Read and validate the header. A failure here leaves the game as it
    /// was, nothing has been touched yet.
    pub fn read(r: &mut SaveReader) -> Result<Self, SaveError> {
        let description = r.read_padded(SAVESTRINGSIZE)?;
        let version = r.take::<VERSIONSIZE>()?;
        if version != version_bytes() {
            let found = String::from_utf8_lossy(&version)
                .trim_end_matches('\0')
                .to_string();
            return Err(SaveError::BadHeader(format!("wrong version: {found}")));
        }
        let skill = r.read_u8()?;
        let skill = Skill::from_byte(skill)
            .ok_or_else(|| SaveError::BadHeader(format!("bad skill {skill}")))?;
        let episode = r.read_u8()? as i32;
        let map = r.read_u8()? as i32;
        let mission = GameMission::from_byte(r.read_u8()?);
        let mut player_in_game = [false; MAXPLAYERS];
        for p in player_in_game.iter_mut() {
            *p = r.read_bool()?;
        }
        let [a, b, c] = r.take::<3>()?;
        let level_time = ((a as u32) << 16) | ((b as u32) << 8) | c as u32;
        Ok(Self {
            description,
            skill,
            episode,
            map,
            mission,
            player_in_game,
            level_time,
        })
    }
}

/// Doom function `P_ArchivePlayers`
pub fn archive_players(w: &mut SaveWriter, players: &[Player], in_game: &[bool; MAXPLAYERS]) {
    for (p, _) in players.iter().zip(in_game.iter()).filter(|(_, i)| **i) {
        w.write_u8(p.player_state.to_byte());
        w.write_fixed(p.viewz);
        w.write_fixed(p.viewheight);
        w.write_fixed(p.deltaviewheight);
        w.write_fixed(p.bob);
        w.write_bool(p.onground);
        w.write_i32(p.health);
        w.write_i32(p.armorpoints);
        w.write_i32(p.armortype);
        for v in p.powers {
            w.write_i32(v);
        }
        for v in p.cards {
            w.write_bool(v);
        }
        w.write_bool(p.backpack);
        for v in p.frags {
            w.write_i32(v);
        }
        w.write_u8(p.readyweapon as u8);
        w.write_u8(p.pendingweapon as u8);
        for v in p.weaponowned {
            w.write_bool(v);
        }
        for v in p.ammo {
            w.write_u32(v);
        }
        for v in p.maxammo {
            w.write_u32(v);
        }
        w.write_bool(p.attackdown);
        w.write_bool(p.usedown);
        w.write_u32(p.cheats);
        w.write_i32(p.refire);
        w.write_i32(p.killcount);
        w.write_i32(p.itemcount);
        w.write_i32(p.secretcount);
        w.write_i32(p.damagecount);
        w.write_i32(p.bonuscount);
        w.write_i32(p.extralight);
        w.write_i32(p.fixedcolormap);
        w.write_bool(p.didsecret);
        w.write_u8(p.preferredshotgun as u8);
        w.write_u8(p.fistorchainsaw as u8);
    }
}

/// The body link is restored with the thinkers.
///
/// Doom function `P_UnArchivePlayers`
pub fn unarchive_players(
    r: &mut SaveReader,
    players: &mut [Player],
    in_game: &[bool; MAXPLAYERS],
) -> Result<(), SaveError> {
    for (p, _) in players.iter_mut().zip(in_game.iter()).filter(|(_, i)| **i) {
        *p = Player::new();
        p.player_state = PlayerState::from_byte(r.read_u8()?);
        p.viewz = r.read_fixed()?;
        p.viewheight = r.read_fixed()?;
        p.deltaviewheight = r.read_fixed()?;
        p.bob = r.read_fixed()?;
        p.onground = r.read_bool()?;
        p.health = r.read_i32()?;
        p.armorpoints = r.read_i32()?;
        p.armortype = r.read_i32()?;
        for v in p.powers.iter_mut().take(PowerType::NumPowers as usize) {
            *v = r.read_i32()?;
        }
        for v in p.cards.iter_mut().take(Card::NumCards as usize) {
            *v = r.read_bool()?;
        }
        p.backpack = r.read_bool()?;
        for v in p.frags.iter_mut() {
            *v = r.read_i32()?;
        }
        p.readyweapon = WeaponType::from(r.read_u8()?);
        p.pendingweapon = WeaponType::from(r.read_u8()?);
        for v in p.weaponowned.iter_mut() {
            *v = r.read_bool()?;
        }
        for v in p.ammo.iter_mut().take(AmmoType::NumAmmo as usize) {
            *v = r.read_u32()?;
        }
        for v in p.maxammo.iter_mut() {
            *v = r.read_u32()?;
        }
        p.attackdown = r.read_bool()?;
        p.usedown = r.read_bool()?;
        p.cheats = r.read_u32()?;
        p.refire = r.read_i32()?;
        p.killcount = r.read_i32()?;
        p.itemcount = r.read_i32()?;
        p.secretcount = r.read_i32()?;
        p.damagecount = r.read_i32()?;
        p.bonuscount = r.read_i32()?;
        p.extralight = r.read_i32()?;
        p.fixedcolormap = r.read_i32()?;
        p.didsecret = r.read_bool()?;
        p.preferredshotgun = WeaponType::from(r.read_u8()?);
        p.fistorchainsaw = WeaponType::from(r.read_u8()?);
    }
    Ok(())
}

/// Doom function `P_ArchiveWorld`
pub fn archive_world(w: &mut SaveWriter, level: &Level) {
    for sec in level.map_data.sectors.iter() {
        w.write_fixed(sec.floorheight);
        w.write_fixed(sec.ceilingheight);
        w.write_i16(sec.floorpic as i16);
        w.write_i16(sec.ceilingpic as i16);
        w.write_i16(sec.lightlevel as i16);
        w.write_i16(sec.special);
        w.write_i16(sec.tag);
    }
    for line in level.map_data.linedefs.iter() {
        w.write_i16(line.flags);
        w.write_i16(line.special);
        w.write_i16(line.tag);
    }
}

/// Doom function `P_UnArchiveWorld`
pub fn unarchive_world(r: &mut SaveReader, level: &mut Level) -> Result<(), SaveError> {
    for sec in level.map_data.sectors.iter_mut() {
        sec.floorheight = r.read_fixed()?;
        sec.ceilingheight = r.read_fixed()?;
        sec.floorpic = r.read_i16()? as usize;
        sec.ceilingpic = r.read_i16()? as usize;
        sec.lightlevel = r.read_i16()? as i32;
        sec.special = r.read_i16()?;
        sec.tag = r.read_i16()?;
        sec.specialdata = None;
    }
    for line in level.map_data.linedefs.iter_mut() {
        line.flags = r.read_i16()?;
        line.special = r.read_i16()?;
        line.tag = r.read_i16()?;
    }
    Ok(())
}

fn write_mobj(w: &mut SaveWriter, m: &MapObject) {
    w.write_fixed(m.x);
    w.write_fixed(m.y);
    w.write_fixed(m.z);
    w.write_u32(m.angle.bam());
    w.write_fixed(m.momx);
    w.write_fixed(m.momy);
    w.write_fixed(m.momz);
    w.write_fixed(m.floorz);
    w.write_fixed(m.ceilingz);
    w.write_fixed(m.radius);
    w.write_fixed(m.height);
    w.write_i32(m.health);
    w.write_u32(m.flags);
    w.write_i16(m.kind);
    w.write_i32(m.reactiontime);
    w.write_u8(m.player.map(|p| p as u8 + 1).unwrap_or(0));
    let s = m.spawnpoint;
    for v in [s.x, s.y, s.angle, s.kind, s.flags] {
        w.write_i16(v);
    }
}

fn read_mobj(r: &mut SaveReader, level: &Level) -> Result<MapObject, SaveError> {
    let x = r.read_fixed()?;
    let y = r.read_fixed()?;
    let z = r.read_fixed()?;
    let angle = Angle::new(r.read_u32()?);
    let momx = r.read_fixed()?;
    let momy = r.read_fixed()?;
    let momz = r.read_fixed()?;
    let floorz = r.read_fixed()?;
    let ceilingz = r.read_fixed()?;
    let radius = r.read_fixed()?;
    let height = r.read_fixed()?;
    let health = r.read_i32()?;
    let flags = r.read_u32()?;
    let kind = r.read_i16()?;
    let reactiontime = r.read_i32()?;
    let player = match r.read_u8()? {
        0 => None,
        n => Some(n as usize - 1),
    };
    let spawnpoint = WadThing::new(
        r.read_i16()?,
        r.read_i16()?,
        r.read_i16()?,
        r.read_i16()?,
        r.read_i16()?,
    );

    let mut mobj = MapObject::new(&level.map_data, x, y, SpawnZ::At(z), kind);
    mobj.angle = angle;
    mobj.momx = momx;
    mobj.momy = momy;
    mobj.momz = momz;
    mobj.floorz = floorz;
    mobj.ceilingz = ceilingz;
    mobj.radius = radius;
    mobj.height = height;
    mobj.health = health;
    mobj.flags = flags;
    mobj.reactiontime = reactiontime;
    mobj.player = player;
    mobj.spawnpoint = spawnpoint;
    Ok(mobj)
}

/// Every map object, player bodies included. Each record carries the owning
/// player so the link can be rebuilt.
///
/// Doom function `P_ArchiveThinkers`
pub fn archive_thinkers(w: &mut SaveWriter, level: &Level) {
    for (_, thinker) in level.thinkers.iter() {
        if let Some(mobj) = thinker.mobj() {
            w.write_u8(TC_MOBJ);
            write_mobj(w, mobj);
        }
    }
    w.write_u8(TC_END);
}

/// Clears out every thinker in the level and rebuilds the map objects.
///
/// Doom function `P_UnArchiveThinkers`
pub fn unarchive_thinkers(
    r: &mut SaveReader,
    level: &mut Level,
    players: &mut [Player],
) -> Result<(), SaveError> {
    level.thinkers.clear();
    level.active_platforms.clear();
    level.touched.clear();
    for p in players.iter_mut() {
        p.mobj = None;
    }

    loop {
        let pos = r.pos();
        match r.read_u8()? {
            TC_END => break,
            TC_MOBJ => {
                let mobj = read_mobj(r, level)?;
                let owner = mobj.player;
                let id = level.thinkers.push(ThinkerData::MapObject(mobj));
                if let Some(p) = owner.and_then(|n| players.get_mut(n)) {
                    p.mobj = Some(id);
                }
            }
            tag => return Err(SaveError::BadRecord { tag, pos }),
        }
    }
    debug!("Unarchived {} thinkers", level.thinkers.len());
    Ok(())
}

/// Doom function `P_ArchiveSpecials`
pub fn archive_specials(w: &mut SaveWriter, level: &Level) {
    for (id, thinker) in level.thinkers.iter() {
        if let Some(plat) = thinker.platform() {
            w.write_u8(TC_PLAT);
            w.write_i32(plat.sector as i32);
            w.write_fixed(plat.speed);
            w.write_fixed(plat.low);
            w.write_fixed(plat.high);
            w.write_i32(plat.wait);
            w.write_i32(plat.count);
            w.write_u8(plat.status.to_byte());
            w.write_u8(plat.old_status.to_byte());
            w.write_bool(plat.crush);
            w.write_i16(plat.tag);
            w.write_u8(plat.kind.to_byte());
            w.write_bool(level.active_platforms.contains(id));
        }
    }
    w.write_u8(TC_ENDSPECIALS);
}

/// Doom function `P_UnArchiveSpecials`
pub fn unarchive_specials(r: &mut SaveReader, level: &mut Level) -> Result<(), SaveError> {
    loop {
        let pos = r.pos();
        match r.read_u8()? {
            TC_ENDSPECIALS => break,
            TC_PLAT => {
                let sector = r.read_i32()? as usize;
                let speed = r.read_fixed()?;
                let low = r.read_fixed()?;
                let high = r.read_fixed()?;
                let wait = r.read_i32()?;
                let count = r.read_i32()?;
                let status = PlatStatus::from_byte(r.read_u8()?)
                    .ok_or(SaveError::BadRecord { tag: TC_PLAT, pos })?;
                let old_status = PlatStatus::from_byte(r.read_u8()?)
                    .ok_or(SaveError::BadRecord { tag: TC_PLAT, pos })?;
                let crush = r.read_bool()?;
                let tag = r.read_i16()?;
                let kind = PlatKind::from_byte(r.read_u8()?)
                    .ok_or(SaveError::BadRecord { tag: TC_PLAT, pos })?;
                let registered = r.read_bool()?;

                if sector >= level.map_data.sectors.len() {
                    warn!("Platform for missing sector {sector} in savegame");
                    return Err(SaveError::BadRecord { tag: TC_PLAT, pos });
                }
                let id = level.thinkers.push(ThinkerData::Platform(Platform {
                    sector,
                    speed,
                    low,
                    high,
                    wait,
                    count,
                    status,
                    old_status,
                    crush,
                    tag,
                    kind,
                }));
                level.map_data.sectors[sector].specialdata = Some(id);
                if registered {
                    level.add_active_platform(id)?;
                }
            }
            tag => return Err(SaveError::BadRecord { tag, pos }),
        }
    }
    Ok(())
}

/// Write the whole level state after the header
pub fn archive_level(
    w: &mut SaveWriter,
    level: &Level,
    players: &[Player],
    in_game: &[bool; MAXPLAYERS],
) {
    archive_players(w, players, in_game);
    archive_world(w, level);
    archive_thinkers(w, level);
    archive_specials(w, level);
}

/// Restore the whole level state over a freshly loaded level. The EOF marker
/// is left for the caller to check.
pub fn unarchive_level(
    r: &mut SaveReader,
    level: &mut Level,
    players: &mut [Player],
    in_game: &[bool; MAXPLAYERS],
) -> Result<(), SaveError> {
    unarchive_players(r, players, in_game)?;
    unarchive_world(r, level)?;
    unarchive_thinkers(r, level, players)?;
    unarchive_specials(r, level)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use math::FixedPoint;

    use super::*;
    use crate::{
        env::platforms::ev_do_platform,
        level::tests::{new_level, test_level_with_players},
    };

    fn header() -> SaveHeader {
        SaveHeader {
            description: "slot one".to_string(),
            skill: Skill::Hard,
            episode: 1,
            map: 3,
            mission: GameMission::Doom,
            player_in_game: [true, false, false, false],
            level_time: 0x012345,
        }
    }

    #[test]
    fn header_layout() {
        let mut w = SaveWriter::new();
        header().write(&mut w);
        let bytes = w.finish().unwrap();
        assert_eq!(bytes.len(), SAVESTRINGSIZE + VERSIONSIZE + 4 + 4 + 3 + 1);
        assert_eq!(&bytes[SAVESTRINGSIZE..SAVESTRINGSIZE + 11], b"version 109");
        // big endian level time
        assert_eq!(&bytes[bytes.len() - 4..bytes.len() - 1], &[0x01, 0x23, 0x45]);

        let mut r = SaveReader::new(&bytes);
        assert_eq!(SaveHeader::read(&mut r).unwrap(), header());
        assert!(r.read_eof().is_ok());
    }

    #[test]
    fn wrong_version() {
        let mut w = SaveWriter::new();
        header().write(&mut w);
        let mut bytes = w.finish().unwrap();
        bytes[SAVESTRINGSIZE + 10] = b'5';
        let mut r = SaveReader::new(&bytes);
        assert!(matches!(SaveHeader::read(&mut r), Err(SaveError::BadHeader(_))));
    }

    #[test]
    fn short_data() {
        let mut r = SaveReader::new(&[1, 2]);
        assert_eq!(r.read_i32(), Err(SaveError::UnexpectedEnd(0)));
        let mut r = SaveReader::new(&[0x1c]);
        assert_eq!(r.read_eof(), Err(SaveError::BadEof));
    }

    #[test]
    fn level_restores() {
        let (mut level, mut players) = test_level_with_players();
        let in_game = [true, false, false, false];
        // start the lift so there's a mover to keep
        let line = level
            .map_data
            .linedefs
            .iter()
            .position(|l| l.special == 62)
            .unwrap();
        ev_do_platform(&mut level, line, PlatKind::DownWaitUpStay, 0).unwrap();
        for _ in 0..5 {
            level.run_thinkers().unwrap();
        }
        players[0].health = 77;
        players[0].killcount = 2;
        let body = players[0].mobj.unwrap();
        if let Some(m) = level.thinkers.get_mut(body).and_then(ThinkerData::mobj_mut) {
            m.momx = FixedPoint::from_int(3);
        }

        let mut w = SaveWriter::new();
        archive_level(&mut w, &level, &players, &in_game);
        let bytes = w.finish().unwrap();

        let mut fresh = new_level(Skill::Medium);
        let mut fresh_players = crate::level::tests::test_players();
        let mut r = SaveReader::new(&bytes);
        unarchive_level(&mut r, &mut fresh, &mut fresh_players, &in_game).unwrap();
        r.read_eof().unwrap();

        assert_eq!(fresh_players[0].health, 77);
        assert_eq!(fresh_players[0].killcount, 2);
        assert_eq!(fresh.thinkers.len(), level.thinkers.len());
        assert_eq!(
            fresh.map_data.sectors[1].floorheight,
            level.map_data.sectors[1].floorheight
        );
        assert!(fresh.map_data.sectors[1].specialdata.is_some());
        assert_eq!(fresh.active_platforms.len(), 1);

        let m = fresh_players[0]
            .mobj
            .and_then(|id| fresh.thinkers.get(id))
            .and_then(ThinkerData::mobj)
            .unwrap();
        assert_eq!(m.momx, FixedPoint::from_int(3));
        assert_eq!(m.player, Some(0));
    }

    #[test]
    fn unknown_tag() {
        let mut fresh = new_level(Skill::Medium);
        let mut players = crate::level::tests::test_players();
        let mut r = SaveReader::new(&[9]);
        assert_eq!(
            unarchive_thinkers(&mut r, &mut fresh, &mut players),
            Err(SaveError::BadRecord { tag: 9, pos: 0 })
        );
    }
}
