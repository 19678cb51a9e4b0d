use std::fmt;
use std::fs::File;
use std::io::prelude::*;
use std::path::PathBuf;

use log::{debug, info};

use crate::cache::LumpCache;

/// Errors raised while reading WAD files
#[derive(Debug)]
pub enum WadError {
    Io(std::io::Error),
    /// The header was not `IWAD`/`PWAD` or the directory is short
    BadHeader(String),
    /// A directory entry points outside the file
    LumpOutOfBounds(String),
}

impl std::error::Error for WadError {}

impl fmt::Display for WadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WadError::Io(e) => write!(f, "WAD IO error: {e}"),
            WadError::BadHeader(m) => write!(f, "Bad WAD header: {m}"),
            WadError::LumpOutOfBounds(n) => write!(f, "Lump {n} is outside the WAD data"),
        }
    }
}

impl From<std::io::Error> for WadError {
    fn from(e: std::io::Error) -> Self {
        WadError::Io(e)
    }
}

/// Used as an index to find a specific lump, typically combined
/// with an offset for example: find the index for lump named "E1M1"
/// in the directory then look for a `MapLump` following it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapLump {
    /// Position and angle for all monster, powerup and spawn location
    Things = 1,
    /// An array of lines referencing two vertices (Two vertexes are connected
    /// by one `LineDef`). Also points to one or two `SideDef` depending on if
    /// this line is a wall or a portal
    LineDefs,
    /// Defines upper, lower, and middle textures, plus the sector a side
    /// faces in to
    SideDefs,
    /// An array of signed short X, Y pairs. All coordinates in this map
    /// block are indexes into this array
    Vertexes,
    Segs,
    SubSectors,
    Nodes,
    /// Area surrounded by lines, with set ceiling and floor textures/heights
    /// with light level
    Sectors,
    Reject,
    Blockmap,
}

impl MapLump {
    pub const fn name(self) -> &'static str {
        match self {
            MapLump::Things => "THINGS",
            MapLump::LineDefs => "LINEDEFS",
            MapLump::SideDefs => "SIDEDEFS",
            MapLump::Vertexes => "VERTEXES",
            MapLump::Segs => "SEGS",
            MapLump::SubSectors => "SSECTORS",
            MapLump::Nodes => "NODES",
            MapLump::Sectors => "SECTORS",
            MapLump::Reject => "REJECT",
            MapLump::Blockmap => "BLOCKMAP",
        }
    }
}

/// A named chunk of bytes, plus which loaded file it came from
pub struct WadLump {
    pub name: String,
    /// Index of the file in load order, 0 is the IWAD
    pub file: usize,
    pub data: Vec<u8>,
}

impl fmt::Debug for WadLump {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WadLump")
            .field("name", &self.name)
            .field("file", &self.file)
            .field("size", &self.data.len())
            .finish()
    }
}

/// "Where's All (the) Data": contains every loaded WAD's lumps in load order.
/// Later files shadow earlier ones by name, which is how PWADs replace maps.
pub struct WadData {
    wad_type: [u8; 4],
    lumps: Vec<WadLump>,
    file_count: usize,
    pub(crate) cache: LumpCache,
}

impl fmt::Debug for WadData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "WadData {{ type: {}, files: {}, lumps: {} }}",
            String::from_utf8_lossy(&self.wad_type),
            self.file_count,
            self.lumps.len()
        )
    }
}

pub(crate) fn read_2_bytes(data: &[u8], offset: usize) -> i16 {
    i16::from_le_bytes([data[offset], data[offset + 1]])
}

fn read_4_bytes(data: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        data[offset],
        data[offset + 1],
        data[offset + 2],
        data[offset + 3],
    ])
}

/// Lump names are 8 bytes of ASCII, NUL padded
pub(crate) fn read_name(data: &[u8]) -> String {
    let end = data.iter().position(|b| *b == 0).unwrap_or(data.len());
    String::from_utf8_lossy(&data[..end]).to_ascii_uppercase()
}

impl WadData {
    pub fn new(file_path: PathBuf) -> Result<Self, WadError> {
        let bytes = Self::read_file(&file_path)?;
        info!("Loaded IWAD: {:?}", file_path);
        Self::from_bytes(bytes)
    }

    /// Parse a complete WAD held in memory
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, WadError> {
        let mut wad = WadData {
            wad_type: [0; 4],
            lumps: Vec::new(),
            file_count: 0,
            cache: LumpCache::default(),
        };
        wad.wad_type = wad.read_file_data(&bytes)?;
        Ok(wad)
    }

    /// Append a PWAD. Its lumps take priority over anything already loaded.
    pub fn add_file(&mut self, file_path: PathBuf) -> Result<(), WadError> {
        let bytes = Self::read_file(&file_path)?;
        self.add_bytes(bytes)?;
        info!("Added PWAD: {:?}", file_path);
        Ok(())
    }

    pub fn add_bytes(&mut self, bytes: Vec<u8>) -> Result<(), WadError> {
        self.read_file_data(&bytes)?;
        Ok(())
    }

    fn read_file(file_path: &PathBuf) -> Result<Vec<u8>, WadError> {
        let mut file = File::open(file_path)?;
        let mut bytes = Vec::with_capacity(file.metadata()?.len() as usize);
        file.read_to_end(&mut bytes)?;
        Ok(bytes)
    }

    fn read_file_data(&mut self, bytes: &[u8]) -> Result<[u8; 4], WadError> {
        if bytes.len() < 12 {
            return Err(WadError::BadHeader(format!("{} bytes is too short", bytes.len())));
        }
        let wad_type = [bytes[0], bytes[1], bytes[2], bytes[3]];
        if &wad_type != b"IWAD" && &wad_type != b"PWAD" {
            return Err(WadError::BadHeader(format!(
                "unknown type {}",
                String::from_utf8_lossy(&wad_type)
            )));
        }
        let dir_count = read_4_bytes(bytes, 4) as usize;
        let dir_offset = read_4_bytes(bytes, 8) as usize;
        if dir_offset + dir_count * 16 > bytes.len() {
            return Err(WadError::BadHeader("directory is truncated".to_string()));
        }

        let file = self.file_count;
        self.lumps.reserve(dir_count);
        for i in 0..dir_count {
            let entry = dir_offset + i * 16;
            let offset = read_4_bytes(bytes, entry) as usize;
            let size = read_4_bytes(bytes, entry + 4) as usize;
            let name = read_name(&bytes[entry + 8..entry + 16]);
            if offset + size > bytes.len() {
                return Err(WadError::LumpOutOfBounds(name));
            }
            self.lumps.push(WadLump {
                name,
                file,
                data: bytes[offset..offset + size].to_vec(),
            });
        }
        self.file_count += 1;
        debug!("WAD {} added {} lumps", file, dir_count);
        Ok(wad_type)
    }

    pub fn is_iwad(&self) -> bool {
        &self.wad_type == b"IWAD"
    }

    pub fn lump_exists(&self, name: &str) -> bool {
        self.lumps.iter().any(|l| l.name == name)
    }

    /// How many times a lump of this name was loaded across all files. More
    /// than one means a PWAD replaced it.
    pub fn lump_count(&self, name: &str) -> usize {
        self.lumps.iter().filter(|l| l.name == name).count()
    }

    /// Last one loaded wins
    pub fn get_lump(&self, name: &str) -> Option<&WadLump> {
        self.lumps.iter().rev().find(|l| l.name == name)
    }

    /// Find the lump of `kind` belonging to the newest copy of `map_name`
    pub fn find_lump_for_map(&self, map_name: &str, kind: MapLump) -> Option<&WadLump> {
        let marker = self.lumps.iter().rposition(|l| l.name == map_name)?;
        self.lumps
            .iter()
            .skip(marker + 1)
            .take(MapLump::Blockmap as usize)
            .find(|l| l.name == kind.name())
    }

    pub fn lumps(&self) -> &[WadLump] {
        &self.lumps
    }
}

#[cfg(test)]
mod tests {
    use crate::test_utils::{WadBuilder, test_room};
    use crate::wad::{MapLump, WadData, WadError};

    #[test]
    fn parse_in_memory_iwad() {
        let bytes = WadBuilder::iwad()
            .add_lump("TITLEPIC", vec![1, 2, 3])
            .add_map("E1M1", &test_room())
            .build();
        let wad = WadData::from_bytes(bytes).unwrap();
        assert!(wad.is_iwad());
        assert!(wad.lump_exists("TITLEPIC"));
        assert!(wad.lump_exists("E1M1"));
        assert!(!wad.lump_exists("E1M2"));
        assert_eq!(wad.get_lump("TITLEPIC").unwrap().data, vec![1, 2, 3]);
        assert!(wad.find_lump_for_map("E1M1", MapLump::Sectors).is_some());
    }

    #[test]
    fn pwad_shadows_iwad() {
        let mut wad = WadData::from_bytes(
            WadBuilder::iwad()
                .add_lump("DEMO1", vec![1])
                .add_map("E1M1", &test_room())
                .build(),
        )
        .unwrap();
        wad.add_bytes(
            WadBuilder::pwad()
                .add_lump("DEMO1", vec![2])
                .add_map("E1M1", &test_room())
                .build(),
        )
        .unwrap();

        assert_eq!(wad.get_lump("DEMO1").unwrap().data, vec![2]);
        assert_eq!(wad.lump_count("E1M1"), 2);
        assert_eq!(wad.find_lump_for_map("E1M1", MapLump::Things).unwrap().file, 1);
    }

    #[test]
    fn bad_header() {
        let res = WadData::from_bytes(b"JUNKJUNKJUNKJUNK".to_vec());
        assert!(matches!(res, Err(WadError::BadHeader(_))));
        let res = WadData::from_bytes(vec![0; 4]);
        assert!(matches!(res, Err(WadError::BadHeader(_))));
    }
}
