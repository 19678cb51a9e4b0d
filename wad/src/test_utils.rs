use crate::lumps::*;
use crate::wad::{MapLump, WadData, WadError};

/// The raw records of one map, in lump order
#[derive(Debug, Clone, Default)]
pub struct TestMap {
    pub things: Vec<WadThing>,
    pub linedefs: Vec<WadLineDef>,
    pub sidedefs: Vec<WadSideDef>,
    pub vertexes: Vec<WadVertex>,
    pub sectors: Vec<WadSector>,
}

/// Assemble a WAD file in memory
pub struct WadBuilder {
    wad_type: [u8; 4],
    lumps: Vec<(String, Vec<u8>)>,
}

impl WadBuilder {
    pub fn iwad() -> Self {
        Self {
            wad_type: *b"IWAD",
            lumps: Vec::new(),
        }
    }

    pub fn pwad() -> Self {
        Self {
            wad_type: *b"PWAD",
            lumps: Vec::new(),
        }
    }

    pub fn add_lump(mut self, name: &str, data: Vec<u8>) -> Self {
        self.lumps.push((name.to_ascii_uppercase(), data));
        self
    }

    /// Adds the map marker followed by the map lumps in WAD order
    pub fn add_map(mut self, name: &str, map: &TestMap) -> Self {
        self.lumps.push((name.to_ascii_uppercase(), Vec::new()));

        let mut things = Vec::new();
        map.things.iter().for_each(|t| t.write(&mut things));
        let mut lines = Vec::new();
        map.linedefs.iter().for_each(|l| l.write(&mut lines));
        let mut sides = Vec::new();
        map.sidedefs.iter().for_each(|s| s.write(&mut sides));
        let mut verts = Vec::new();
        map.vertexes.iter().for_each(|v| v.write(&mut verts));
        let mut sectors = Vec::new();
        map.sectors.iter().for_each(|s| s.write(&mut sectors));

        for (kind, data) in [
            (MapLump::Things, things),
            (MapLump::LineDefs, lines),
            (MapLump::SideDefs, sides),
            (MapLump::Vertexes, verts),
            (MapLump::Segs, Vec::new()),
            (MapLump::SubSectors, Vec::new()),
            (MapLump::Nodes, Vec::new()),
            (MapLump::Sectors, sectors),
            (MapLump::Reject, Vec::new()),
            (MapLump::Blockmap, Vec::new()),
        ] {
            self.lumps.push((kind.name().to_owned(), data));
        }
        self
    }

    pub fn build(self) -> Vec<u8> {
        let data_len: usize = self.lumps.iter().map(|(_, d)| d.len()).sum();
        let dir_offset = 12 + data_len;

        let mut out = Vec::with_capacity(dir_offset + self.lumps.len() * 16);
        out.extend_from_slice(&self.wad_type);
        out.extend_from_slice(&(self.lumps.len() as u32).to_le_bytes());
        out.extend_from_slice(&(dir_offset as u32).to_le_bytes());

        let mut offsets = Vec::with_capacity(self.lumps.len());
        for (_, data) in &self.lumps {
            offsets.push(out.len() as u32);
            out.extend_from_slice(data);
        }
        for ((name, data), offset) in self.lumps.iter().zip(offsets) {
            out.extend_from_slice(&offset.to_le_bytes());
            out.extend_from_slice(&(data.len() as u32).to_le_bytes());
            write_name(name, &mut out);
        }
        out
    }

    pub fn into_wad(self) -> Result<WadData, WadError> {
        WadData::from_bytes(self.build())
    }
}

/// A 512x512 room with a raised 128x128 lift in the middle.
///
/// - sector 0: the room, floor 0, ceiling 128
/// - sector 1: the lift, floor 64, ceiling 128, tag 1
/// - line 4 faces the room from the lift's west edge and carries special 62
///   (SR lift) on tag 1
/// - player 1 starts at (150, 256) facing east, 42 units from line 4
pub fn test_room() -> TestMap {
    TestMap {
        things: vec![
            WadThing::new(150, 256, 0, 1, 7),
            WadThing::new(64, 64, 90, 2, 7),
            WadThing::new(448, 448, 180, 3004, 7),
            WadThing::new(448, 64, 0, 2014, 7),
            WadThing::new(64, 448, 0, 11, 7),
        ],
        linedefs: vec![
            WadLineDef::new(0, 1, 1, 0, 0, 0, None),
            WadLineDef::new(1, 2, 1, 0, 0, 0, None),
            WadLineDef::new(2, 3, 1, 0, 0, 0, None),
            WadLineDef::new(3, 0, 1, 0, 0, 0, None),
            WadLineDef::new(5, 4, 4, 62, 1, 2, Some(1)),
            WadLineDef::new(5, 6, 4, 0, 0, 1, Some(2)),
            WadLineDef::new(6, 7, 4, 0, 0, 1, Some(2)),
            WadLineDef::new(7, 4, 4, 0, 0, 1, Some(2)),
        ],
        sidedefs: vec![
            WadSideDef::new(0, 0, "-", "-", "STARTAN3", 0),
            WadSideDef::new(0, 0, "-", "-", "-", 1),
            WadSideDef::new(0, 0, "-", "PLAT1", "-", 0),
        ],
        vertexes: vec![
            WadVertex::new(0, 0),
            WadVertex::new(0, 512),
            WadVertex::new(512, 512),
            WadVertex::new(512, 0),
            WadVertex::new(192, 192),
            WadVertex::new(192, 320),
            WadVertex::new(320, 320),
            WadVertex::new(320, 192),
        ],
        sectors: vec![
            WadSector::new(0, 128, "FLOOR4_8", "CEIL3_5", 160, 0, 0),
            WadSector::new(64, 128, "FLAT20", "CEIL3_5", 192, 0, 1),
        ],
    }
}

/// A short single player demo: E1M1, medium skill, one second of walking
/// forward.
pub fn test_demo() -> Vec<u8> {
    let mut demo = vec![109, 2, 1, 1, 0, 0, 0, 0, 0, 1, 0, 0, 0];
    for _ in 0..35 {
        demo.extend_from_slice(&[0x19, 0, 0, 0]);
    }
    demo.push(0x80);
    demo
}

/// Doom 1 style IWAD with all nine maps of episode 1 (so it identifies as
/// shareware) and a `DEMO1` lump.
pub fn shareware_bytes() -> Vec<u8> {
    let room = test_room();
    let mut builder = WadBuilder::iwad()
        .add_lump("TITLEPIC", vec![0])
        .add_lump("DEMO1", test_demo());
    for m in 1..=9 {
        builder = builder.add_map(&format!("E1M{m}"), &room);
    }
    builder.build()
}

/// Doom 2 style IWAD, maps 1 to 32
pub fn commercial_bytes() -> Vec<u8> {
    let room = test_room();
    let mut builder = WadBuilder::iwad().add_lump("TITLEPIC", vec![0]);
    for m in 1..=32 {
        builder = builder.add_map(&format!("MAP{m:02}"), &room);
    }
    builder.build()
}
