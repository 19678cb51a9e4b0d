//! Demo lumps: a short header describing the game followed by one record per
//! player per tic, ended with `DEMO_MARKER`.
//!
//! Version 109 demos store the turn as a single byte (`angleturn >> 8`), so
//! anything recorded is immediately read back to keep the live game exactly
//! in step with what playback will see. Version 111 ("long tics") keeps the
//! full 16 bit turn.

use gameplay::{DOOM_191_VERSION, DOOM_VERSION, MAXPLAYERS, Skill, TicCmd};

use crate::GameError;

pub const DEMO_MARKER: u8 = 0x80;
/// Bytes before the first tic record
pub const DEMO_HEADER_SIZE: usize = 9 + MAXPLAYERS;
/// Starting buffer size for a recording
const DEMO_BUFFER_SIZE: usize = 0x20000;

/// A readable name for a demo version byte, used in the error when a demo
/// can't be played.
pub fn demo_version_description(version: u8) -> String {
    match version {
        104 => "v1.4".to_string(),
        105 => "v1.5".to_string(),
        106 => "v1.6/v1.666".to_string(),
        107 => "v1.7/v1.7a".to_string(),
        108 => "v1.8".to_string(),
        109 => "v1.9".to_string(),
        111 => "v1.91 hack (long tics)".to_string(),
        // Perhaps a pre-v1.4 IWAD?
        0..=4 => "v1.0/v1.1/v1.2".to_string(),
        _ => format!("{}.{} (unknown)", version / 100, version % 100),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemoHeader {
    pub version: u8,
    pub skill: Skill,
    pub episode: i32,
    pub map: i32,
    pub deathmatch: bool,
    pub respawn: bool,
    pub fast: bool,
    pub nomonsters: bool,
    pub consoleplayer: usize,
    pub player_in_game: [bool; MAXPLAYERS],
}

impl DemoHeader {
    pub fn long_tics(&self) -> bool {
        self.version == DOOM_191_VERSION
    }

    fn write(&self, buf: &mut Vec<u8>) {
        buf.push(self.version);
        buf.push(self.skill.to_byte());
        buf.push(self.episode as u8);
        buf.push(self.map as u8);
        buf.push(self.deathmatch as u8);
        buf.push(self.respawn as u8);
        buf.push(self.fast as u8);
        buf.push(self.nomonsters as u8);
        buf.push(self.consoleplayer as u8);
        for p in self.player_in_game {
            buf.push(p as u8);
        }
    }
}

/// Plays back a demo lump one tic at a time
#[derive(Debug)]
pub struct DemoPlayer {
    data: Vec<u8>,
    pos: usize,
    long_tics: bool,
}

impl DemoPlayer {
    /// Doom function `G_DoPlayDemo`, the header part. Only the two versions
    /// this engine writes are accepted.
    pub fn read_header(data: Vec<u8>) -> Result<(DemoHeader, DemoPlayer), GameError> {
        let version = data.first().copied().unwrap_or(0);
        if version != DOOM_VERSION && version != DOOM_191_VERSION {
            return Err(GameError::DemoVersion {
                found: version,
                expected: DOOM_VERSION,
                description: demo_version_description(version),
            });
        }
        if data.len() < DEMO_HEADER_SIZE {
            return Err(GameError::MissingContent(format!(
                "demo header is {} bytes, need {DEMO_HEADER_SIZE}",
                data.len()
            )));
        }

        let skill = Skill::from_byte(data[1]).unwrap_or_default();
        let mut player_in_game = [false; MAXPLAYERS];
        for (i, p) in player_in_game.iter_mut().enumerate() {
            *p = data[9 + i] != 0;
        }
        let header = DemoHeader {
            version,
            skill,
            episode: data[2] as i32,
            map: data[3] as i32,
            deathmatch: data[4] != 0,
            respawn: data[5] != 0,
            fast: data[6] != 0,
            nomonsters: data[7] != 0,
            consoleplayer: (data[8] as usize).min(MAXPLAYERS - 1),
            player_in_game,
        };
        let player = DemoPlayer {
            data,
            pos: DEMO_HEADER_SIZE,
            long_tics: version == DOOM_191_VERSION,
        };
        Ok((header, player))
    }

    /// The next record, or `None` at the end marker or if the lump runs out
    ///
    /// Doom function `G_ReadDemoTiccmd`
    pub fn read_cmd(&mut self) -> Option<TicCmd> {
        let rec_len = if self.long_tics { 5 } else { 4 };
        let rec = self.data.get(self.pos..self.pos + rec_len)?;
        if rec[0] == DEMO_MARKER {
            return None;
        }
        let mut cmd = TicCmd::new();
        cmd.forwardmove = rec[0] as i8;
        cmd.sidemove = rec[1] as i8;
        if self.long_tics {
            cmd.angleturn = i16::from_le_bytes([rec[2], rec[3]]);
            cmd.buttons = rec[4];
        } else {
            cmd.angleturn = (rec[2] as i16) << 8;
            cmd.buttons = rec[3];
        }
        self.pos += rec_len;
        Some(cmd)
    }
}

/// Records the local game into an in-memory lump
#[derive(Debug)]
pub struct DemoRecorder {
    name: String,
    buffer: Vec<u8>,
    /// Write position. The buffer is kept larger than the data.
    pos: usize,
    long_tics: bool,
    started: bool,
}

impl DemoRecorder {
    /// Doom function `G_RecordDemo`
    pub fn new(name: &str, long_tics: bool) -> Self {
        Self {
            name: format!("{name}.lmp"),
            buffer: vec![0; DEMO_BUFFER_SIZE],
            pos: 0,
            long_tics,
            started: false,
        }
    }

    /// The file the demo is written to
    pub fn file_name(&self) -> &str {
        &self.name
    }

    pub fn started(&self) -> bool {
        self.started
    }

    pub fn long_tics(&self) -> bool {
        self.long_tics
    }

    /// Doom function `G_BeginRecording`
    pub fn begin(&mut self, header: &DemoHeader) {
        let mut head = Vec::with_capacity(DEMO_HEADER_SIZE);
        header.write(&mut head);
        self.buffer[..head.len()].copy_from_slice(&head);
        self.pos = head.len();
        self.started = true;
    }

    /// Record the command, then replace it with what playback would read.
    ///
    /// Doom function `G_WriteDemoTiccmd`
    pub fn write_cmd(&mut self, cmd: &mut TicCmd) {
        let start = self.pos;
        let mut rec = [0u8; 5];
        rec[0] = cmd.forwardmove as u8;
        rec[1] = cmd.sidemove as u8;
        let len = if self.long_tics {
            let [lo, hi] = cmd.angleturn.to_le_bytes();
            rec[2] = lo;
            rec[3] = hi;
            rec[4] = cmd.buttons;
            5
        } else {
            rec[2] = (cmd.angleturn >> 8) as u8;
            rec[3] = cmd.buttons;
            4
        };
        self.buffer[start..start + len].copy_from_slice(&rec[..len]);
        self.pos += len;

        if self.pos + 16 > self.buffer.len() {
            let new_len = self.buffer.len() * 2;
            self.buffer.resize(new_len, 0);
        }

        // make SURE it is exactly the same
        cmd.forwardmove = rec[0] as i8;
        cmd.sidemove = rec[1] as i8;
        if self.long_tics {
            cmd.angleturn = i16::from_le_bytes([rec[2], rec[3]]);
        } else {
            cmd.angleturn = (rec[2] as i16) << 8;
        }
        cmd.buttons = rec[len - 1];
    }

    /// Close the demo with the end marker and hand back the lump bytes
    pub fn finish(mut self) -> Vec<u8> {
        self.buffer.truncate(self.pos);
        self.buffer.push(DEMO_MARKER);
        self.buffer
    }

    #[cfg(test)]
    fn capacity(&self) -> usize {
        self.buffer.len()
    }
}

#[cfg(test)]
mod tests {
    use gameplay::{DOOM_191_VERSION, DOOM_VERSION, Skill, TicCmd};
    use wad::test_utils::test_demo;

    use super::*;

    fn header(version: u8) -> DemoHeader {
        DemoHeader {
            version,
            skill: Skill::Hard,
            episode: 1,
            map: 3,
            deathmatch: false,
            respawn: false,
            fast: false,
            nomonsters: true,
            consoleplayer: 0,
            player_in_game: [true, false, false, false],
        }
    }

    #[test]
    fn read_test_lump() {
        let (head, mut player) = DemoPlayer::read_header(test_demo()).unwrap();
        assert_eq!(head.skill, Skill::Medium);
        assert_eq!(head.episode, 1);
        assert_eq!(head.map, 1);
        assert_eq!(head.player_in_game, [true, false, false, false]);

        let mut count = 0;
        while let Some(cmd) = player.read_cmd() {
            assert_eq!(cmd.forwardmove, 0x19);
            count += 1;
        }
        assert_eq!(count, 35);
        // stays ended
        assert!(player.read_cmd().is_none());
    }

    #[test]
    fn short_tics_lose_low_turn() {
        let mut rec = DemoRecorder::new("short", false);
        rec.begin(&header(DOOM_VERSION));
        let mut cmd = TicCmd {
            forwardmove: -20,
            sidemove: 24,
            angleturn: 0x1234,
            buttons: 3,
            ..TicCmd::new()
        };
        rec.write_cmd(&mut cmd);
        assert_eq!(cmd.angleturn, 0x1200);
        assert_eq!(cmd.forwardmove, -20);

        let bytes = rec.finish();
        assert_eq!(bytes.len(), DEMO_HEADER_SIZE + 4 + 1);
        assert_eq!(*bytes.last().unwrap(), DEMO_MARKER);

        let (head, mut player) = DemoPlayer::read_header(bytes).unwrap();
        assert_eq!(head, header(DOOM_VERSION));
        assert_eq!(player.read_cmd(), Some(cmd));
        assert_eq!(player.read_cmd(), None);
    }

    #[test]
    fn long_tics_keep_turn() {
        let mut rec = DemoRecorder::new("long", true);
        rec.begin(&header(DOOM_191_VERSION));
        let mut cmd = TicCmd {
            angleturn: -0x0135,
            ..TicCmd::new()
        };
        rec.write_cmd(&mut cmd);
        assert_eq!(cmd.angleturn, -0x0135);

        let (head, mut player) = DemoPlayer::read_header(rec.finish()).unwrap();
        assert!(head.long_tics());
        assert_eq!(player.read_cmd().map(|c| c.angleturn), Some(-0x0135));
    }

    #[test]
    fn buffer_grows() {
        let mut rec = DemoRecorder::new("grow", false);
        rec.begin(&header(DOOM_VERSION));
        let start = rec.capacity();
        let mut cmd = TicCmd::new();
        for _ in 0..(start / 4) {
            rec.write_cmd(&mut cmd);
        }
        assert_eq!(rec.capacity(), start * 2);
        let bytes = rec.finish();
        assert_eq!(bytes.len(), DEMO_HEADER_SIZE + (start / 4) * 4 + 1);
    }

    #[test]
    fn wrong_version() {
        let mut demo = test_demo();
        demo[0] = 106;
        match DemoPlayer::read_header(demo) {
            Err(GameError::DemoVersion {
                found,
                expected,
                description,
            }) => {
                assert_eq!(found, 106);
                assert_eq!(expected, DOOM_VERSION);
                assert_eq!(description, "v1.6/v1.666");
            }
            other => panic!("expected a version error, got {other:?}"),
        }
    }

    #[test]
    fn version_names() {
        assert_eq!(demo_version_description(109), "v1.9");
        assert_eq!(demo_version_description(2), "v1.0/v1.1/v1.2");
        assert_eq!(demo_version_description(111), "v1.91 hack (long tics)");
        assert_eq!(demo_version_description(120), "1.20 (unknown)");
    }
}
