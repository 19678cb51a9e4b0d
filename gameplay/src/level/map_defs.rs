use math::FixedPoint;

use crate::thinker::ThinkerId;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Vertex {
    pub x: FixedPoint,
    pub y: FixedPoint,
}

impl Vertex {
    pub const fn new(x: FixedPoint, y: FixedPoint) -> Self {
        Self { x, y }
    }
}

/// The SECTORS record, at runtime.
#[derive(Debug, Default, Clone)]
pub struct Sector {
    /// An incremented "ID" of sorts.
    pub num: usize,
    pub floorheight: FixedPoint,
    pub ceilingheight: FixedPoint,
    /// Index in to `MapData::flats`
    pub floorpic: usize,
    /// Index in to `MapData::flats`
    pub ceilingpic: usize,
    pub lightlevel: i32,
    pub special: i16,
    pub tag: i16,
    /// The mover that currently owns this sector. At most one at a time.
    pub specialdata: Option<ThinkerId>,
    /// Indexes of every line that borders this sector
    pub lines: Vec<usize>,
}

impl Sector {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        num: usize,
        floorheight: FixedPoint,
        ceilingheight: FixedPoint,
        floorpic: usize,
        ceilingpic: usize,
        lightlevel: i32,
        special: i16,
        tag: i16,
    ) -> Self {
        Self {
            num,
            floorheight,
            ceilingheight,
            floorpic,
            ceilingpic,
            lightlevel,
            special,
            tag,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone)]
pub struct SideDef {
    // add this to the calculated texture column
    pub textureoffset: FixedPoint,
    // add this to the calculated texture top
    pub rowoffset: FixedPoint,
    pub toptexture: String,
    pub bottomtexture: String,
    pub midtexture: String,
    /// Sector the SideDef is facing.
    pub sector: usize,
}

#[derive(Debug, Clone)]
pub struct LineDef {
    // Vertices, from v1 to v2.
    pub v1: Vertex,
    pub v2: Vertex,
    // Precalculated v2 - v1 for side checking.
    pub dx: FixedPoint,
    pub dy: FixedPoint,
    pub flags: i16,
    pub special: i16,
    pub tag: i16,
    pub front_sidedef: usize,
    pub back_sidedef: Option<usize>,
    // Front and back sector.
    pub frontsector: usize,
    pub backsector: Option<usize>,
}

impl LineDef {
    /// 0 for the front (right) side, 1 for the back.
    ///
    /// Doom function name `P_PointOnLineSide`
    pub fn point_on_side(&self, x: FixedPoint, y: FixedPoint) -> usize {
        if self.dx.is_zero() {
            if x <= self.v1.x {
                return (self.dy > FixedPoint::ZERO) as usize;
            }
            return (self.dy < FixedPoint::ZERO) as usize;
        }
        if self.dy.is_zero() {
            if y <= self.v1.y {
                return (self.dx < FixedPoint::ZERO) as usize;
            }
            return (self.dx > FixedPoint::ZERO) as usize;
        }

        let dx = x - self.v1.x;
        let dy = y - self.v1.y;
        let left = FixedPoint::new(self.dy.raw() >> 16) * dx;
        let right = dy * FixedPoint::new(self.dx.raw() >> 16);
        if right < left {
            // front side
            return 0;
        }
        1
    }

    pub fn is_two_sided(&self) -> bool {
        self.flags & super::flags::LineDefFlags::TwoSided as i16 != 0
    }
}

#[cfg(test)]
mod tests {
    use math::FixedPoint;

    use super::{LineDef, Vertex};

    fn line(x1: i32, y1: i32, x2: i32, y2: i32) -> LineDef {
        let v1 = Vertex::new(FixedPoint::from_int(x1), FixedPoint::from_int(y1));
        let v2 = Vertex::new(FixedPoint::from_int(x2), FixedPoint::from_int(y2));
        LineDef {
            v1,
            v2,
            dx: v2.x - v1.x,
            dy: v2.y - v1.y,
            flags: 0,
            special: 0,
            tag: 0,
            front_sidedef: 0,
            back_sidedef: None,
            frontsector: 0,
            backsector: None,
        }
    }

    #[test]
    fn sides() {
        let f = FixedPoint::from_int;
        // heading south, the front is west
        let l = line(192, 320, 192, 192);
        assert_eq!(l.point_on_side(f(150), f(256)), 0);
        assert_eq!(l.point_on_side(f(250), f(256)), 1);
        // heading east, the front is south
        let l = line(0, 0, 100, 0);
        assert_eq!(l.point_on_side(f(50), f(-10)), 0);
        assert_eq!(l.point_on_side(f(50), f(10)), 1);
        // diagonal north east, the front is south east
        let l = line(0, 0, 100, 100);
        assert_eq!(l.point_on_side(f(60), f(10)), 0);
        assert_eq!(l.point_on_side(f(10), f(60)), 1);
    }
}
