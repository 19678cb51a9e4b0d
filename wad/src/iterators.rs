use std::marker::PhantomData;

use log::warn;

use crate::lumps::*;
use crate::wad::{MapLump, WadData};

pub struct LumpIter<'a, T> {
    data: &'a [u8],
    item_size: usize,
    current: usize,
    transformer: fn(&[u8]) -> T,
    _phantom: PhantomData<T>,
}

impl<T> Iterator for LumpIter<'_, T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        let start = self.current * self.item_size;
        let end = start + self.item_size;
        if end <= self.data.len() {
            self.current += 1;
            return Some((self.transformer)(&self.data[start..end]));
        }
        None
    }
}

impl WadData {
    fn map_lump_iter<T>(
        &self,
        map_name: &str,
        kind: MapLump,
        item_size: usize,
        transformer: fn(&[u8]) -> T,
    ) -> LumpIter<'_, T> {
        let data: &[u8] = match self.find_lump_for_map(map_name, kind) {
            Some(lump) => lump.data.as_slice(),
            None => {
                warn!("{} has no {} lump", map_name, kind.name());
                &[]
            }
        };
        LumpIter {
            data,
            item_size,
            current: 0,
            transformer,
            _phantom: PhantomData,
        }
    }

    pub fn thing_iter(&self, map_name: &str) -> LumpIter<'_, WadThing> {
        self.map_lump_iter(map_name, MapLump::Things, WadThing::SIZE, WadThing::parse)
    }

    pub fn vertex_iter(&self, map_name: &str) -> LumpIter<'_, WadVertex> {
        self.map_lump_iter(map_name, MapLump::Vertexes, WadVertex::SIZE, WadVertex::parse)
    }

    pub fn sector_iter(&self, map_name: &str) -> LumpIter<'_, WadSector> {
        self.map_lump_iter(map_name, MapLump::Sectors, WadSector::SIZE, WadSector::parse)
    }

    pub fn sidedef_iter(&self, map_name: &str) -> LumpIter<'_, WadSideDef> {
        self.map_lump_iter(map_name, MapLump::SideDefs, WadSideDef::SIZE, WadSideDef::parse)
    }

    pub fn linedef_iter(&self, map_name: &str) -> LumpIter<'_, WadLineDef> {
        self.map_lump_iter(map_name, MapLump::LineDefs, WadLineDef::SIZE, WadLineDef::parse)
    }
}

#[cfg(test)]
mod tests {
    use crate::WadData;
    use crate::test_utils::{WadBuilder, test_room};

    #[test]
    fn iterate_room_records() {
        let room = test_room();
        let wad = WadData::from_bytes(WadBuilder::iwad().add_map("E1M1", &room).build()).unwrap();

        assert_eq!(wad.thing_iter("E1M1").count(), room.things.len());
        assert_eq!(wad.vertex_iter("E1M1").count(), room.vertexes.len());
        assert_eq!(wad.linedef_iter("E1M1").count(), room.linedefs.len());
        assert_eq!(wad.sidedef_iter("E1M1").count(), room.sidedefs.len());
        let sectors: Vec<_> = wad.sector_iter("E1M1").collect();
        assert_eq!(sectors, room.sectors);

        let player = wad.thing_iter("E1M1").find(|t| t.kind == 1).unwrap();
        assert_eq!(player, room.things[0]);
    }

    #[test]
    fn missing_map_is_empty() {
        let wad = WadData::from_bytes(WadBuilder::iwad().add_map("E1M1", &test_room()).build())
            .unwrap();
        assert_eq!(wad.linedef_iter("E1M9").count(), 0);
    }
}
