use log::{debug, warn};
#[cfg(feature = "hprof")]
use coarse_prof::profile;
use math::FixedPoint;
use wad::WadData;
use wad::lumps::{WadLineDef, WadSector, WadSideDef, WadThing, WadVertex};

use crate::level::LevelError;
use crate::level::flags::LineDefFlags;
use crate::level::map_defs::{LineDef, Sector, SideDef, Vertex};

/// A `Map` contains everything required for building the actual level the
/// player will be in, such as the lines and sectors, the `Things` to spawn,
/// and the flat names used by sectors.
#[derive(Debug, Default)]
pub struct MapData {
    name: String,
    things: Vec<WadThing>,
    pub vertexes: Vec<Vertex>,
    pub linedefs: Vec<LineDef>,
    pub sectors: Vec<Sector>,
    pub sidedefs: Vec<SideDef>,
    /// Flat names, indexed by `Sector::floorpic` and `Sector::ceilingpic`
    flats: Vec<String>,
}

impl MapData {
    /// Read the map lumps for `name` out of the WAD (last loaded wins)
    pub fn load(name: &str, wad: &WadData) -> Result<Self, LevelError> {
        #[cfg(feature = "hprof")]
        profile!("MapData::load");
        if !wad.lump_exists(name) {
            return Err(LevelError::MissingMap(name.to_owned()));
        }
        let map = Self::from_parts(
            name,
            wad.thing_iter(name).collect(),
            wad.vertex_iter(name).collect(),
            wad.linedef_iter(name).collect(),
            wad.sidedef_iter(name).collect(),
            wad.sector_iter(name).collect(),
        )?;
        debug!(
            "{}: loaded {} lines, {} sectors, {} things",
            name,
            map.linedefs.len(),
            map.sectors.len(),
            map.things.len()
        );
        Ok(map)
    }

    /// Build the runtime map from raw records, resolving all the cross
    /// references and validating indexes on the way.
    pub fn from_parts(
        name: &str,
        things: Vec<WadThing>,
        vertexes: Vec<WadVertex>,
        linedefs: Vec<WadLineDef>,
        sidedefs: Vec<WadSideDef>,
        sectors: Vec<WadSector>,
    ) -> Result<Self, LevelError> {
        let mut map = MapData {
            name: name.to_owned(),
            things,
            ..Default::default()
        };

        map.vertexes = vertexes
            .iter()
            .map(|v| Vertex::new(FixedPoint::from_int(v.x as i32), FixedPoint::from_int(v.y as i32)))
            .collect();

        for (num, s) in sectors.iter().enumerate() {
            let floorpic = map.flat_num_for_name(&s.floor_tex);
            let ceilingpic = map.flat_num_for_name(&s.ceil_tex);
            map.sectors.push(Sector::new(
                num,
                FixedPoint::from_int(s.floor_height as i32),
                FixedPoint::from_int(s.ceil_height as i32),
                floorpic,
                ceilingpic,
                s.light_level as i32,
                s.kind,
                s.tag,
            ));
        }

        for s in sidedefs.iter() {
            let sector = s.sector as usize;
            if s.sector < 0 || sector >= map.sectors.len() {
                return Err(LevelError::BadMap(format!(
                    "{name}: sidedef references sector {}",
                    s.sector
                )));
            }
            map.sidedefs.push(SideDef {
                textureoffset: FixedPoint::from_int(s.x_offset as i32),
                rowoffset: FixedPoint::from_int(s.y_offset as i32),
                toptexture: s.upper_tex.clone(),
                bottomtexture: s.lower_tex.clone(),
                midtexture: s.middle_tex.clone(),
                sector,
            });
        }

        for (num, l) in linedefs.iter().enumerate() {
            let v1 = *map
                .vertexes
                .get(l.start_vertex as usize)
                .ok_or_else(|| LevelError::BadMap(format!("{name}: line {num} bad vertex")))?;
            let v2 = *map
                .vertexes
                .get(l.end_vertex as usize)
                .ok_or_else(|| LevelError::BadMap(format!("{name}: line {num} bad vertex")))?;
            let front = map
                .sidedefs
                .get(l.front_sidedef as usize)
                .ok_or_else(|| LevelError::BadMap(format!("{name}: line {num} bad sidedef")))?;
            let frontsector = front.sector;

            let back_sidedef = l.back_sidedef.map(|s| s as usize);
            let backsector = match back_sidedef {
                Some(s) => Some(
                    map.sidedefs
                        .get(s)
                        .ok_or_else(|| {
                            LevelError::BadMap(format!("{name}: line {num} bad back sidedef"))
                        })?
                        .sector,
                ),
                None => None,
            };

            let mut flags = l.flags;
            if backsector.is_none() && flags & LineDefFlags::TwoSided as i16 != 0 {
                warn!("{name}: line {num} is flagged two sided but has no back");
                flags &= !(LineDefFlags::TwoSided as i16);
            }

            map.linedefs.push(LineDef {
                v1,
                v2,
                dx: v2.x - v1.x,
                dy: v2.y - v1.y,
                flags,
                special: l.special,
                tag: l.sector_tag,
                front_sidedef: l.front_sidedef as usize,
                back_sidedef,
                frontsector,
                backsector,
            });

            map.sectors[frontsector].lines.push(num);
            if let Some(back) = backsector {
                if back != frontsector {
                    map.sectors[back].lines.push(num);
                }
            }
        }

        Ok(map)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn things(&self) -> &[WadThing] {
        &self.things
    }

    pub fn flats(&self) -> &[String] {
        &self.flats
    }

    /// Interns the flat name. The index is stable for the life of the map.
    pub fn flat_num_for_name(&mut self, name: &str) -> usize {
        if let Some(i) = self.flats.iter().position(|f| f == name) {
            return i;
        }
        self.flats.push(name.to_owned());
        self.flats.len() - 1
    }

    /// Find the sector containing the point. Without a BSP this is an even-odd
    /// crossing test over each sector's bounding lines. If more than one sector
    /// claims the point the one with the smallest bounding box wins.
    ///
    /// Falls back to sector 0 if the point is outside the map.
    pub fn point_in_sector(&self, x: FixedPoint, y: FixedPoint) -> usize {
        let mut best: Option<(usize, i64)> = None;
        for sector in self.sectors.iter() {
            if !self.sector_contains(sector, x, y) {
                continue;
            }
            let area = self.sector_bbox_area(sector);
            if best.is_none_or(|(_, a)| area < a) {
                best = Some((sector.num, area));
            }
        }
        best.map(|(n, _)| n).unwrap_or(0)
    }

    fn sector_contains(&self, sector: &Sector, x: FixedPoint, y: FixedPoint) -> bool {
        let mut inside = false;
        for &l in sector.lines.iter() {
            let line = &self.linedefs[l];
            let (a, b) = (line.v1, line.v2);
            if (a.y > y) != (b.y > y) {
                // x coordinate of the edge at height y
                let t = (y - a.y).raw() as i64;
                let span = (b.y - a.y).raw() as i64;
                let ix = a.x.raw() as i64 + (b.x - a.x).raw() as i64 * t / span;
                if (x.raw() as i64) < ix {
                    inside = !inside;
                }
            }
        }
        inside
    }

    fn sector_bbox_area(&self, sector: &Sector) -> i64 {
        let mut min = (i32::MAX, i32::MAX);
        let mut max = (i32::MIN, i32::MIN);
        for &l in sector.lines.iter() {
            let line = &self.linedefs[l];
            for v in [line.v1, line.v2] {
                min = (min.0.min(v.x.to_int()), min.1.min(v.y.to_int()));
                max = (max.0.max(v.x.to_int()), max.1.max(v.y.to_int()));
            }
        }
        (max.0 - min.0) as i64 * (max.1 - min.1) as i64
    }
}

#[cfg(test)]
mod tests {
    use math::FixedPoint;
    use wad::test_utils::{WadBuilder, test_room};

    use super::MapData;
    use crate::level::LevelError;

    fn room() -> MapData {
        let r = test_room();
        MapData::from_parts("E1M1", r.things, r.vertexes, r.linedefs, r.sidedefs, r.sectors)
            .unwrap()
    }

    #[test]
    fn build_room() {
        let map = room();
        assert_eq!(map.linedefs.len(), 8);
        assert_eq!(map.sectors.len(), 2);
        // outer walls and one side of each lift line
        assert_eq!(map.sectors[0].lines, vec![0, 1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(map.sectors[1].lines, vec![4, 5, 6, 7]);
        assert_eq!(map.sectors[1].floorheight, FixedPoint::from_int(64));
        assert_eq!(map.flats()[map.sectors[1].floorpic], "FLAT20");
        assert_eq!(map.linedefs[4].special, 62);
        assert_eq!(map.linedefs[4].frontsector, 0);
        assert_eq!(map.linedefs[4].backsector, Some(1));
    }

    #[test]
    fn find_sector() {
        let map = room();
        let f = FixedPoint::from_int;
        assert_eq!(map.point_in_sector(f(100), f(100)), 0);
        assert_eq!(map.point_in_sector(f(256), f(256)), 1);
        assert_eq!(map.point_in_sector(f(150), f(256)), 0);
        assert_eq!(map.point_in_sector(f(330), f(256)), 0);
    }

    #[test]
    fn load_from_wad() {
        let wad = WadBuilder::iwad()
            .add_map("E1M1", &test_room())
            .into_wad()
            .unwrap();
        let map = MapData::load("E1M1", &wad).unwrap();
        assert_eq!(map.name(), "E1M1");
        assert_eq!(map.things().len(), 5);
        assert!(matches!(
            MapData::load("E1M2", &wad),
            Err(LevelError::MissingMap(_))
        ));
    }

    #[test]
    fn bad_sidedef_sector() {
        let mut r = test_room();
        r.sidedefs[0].sector = 9;
        assert!(matches!(
            MapData::from_parts("E1M1", r.things, r.vertexes, r.linedefs, r.sidedefs, r.sectors),
            Err(LevelError::BadMap(_))
        ));
    }
}
