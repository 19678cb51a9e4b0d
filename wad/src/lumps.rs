use crate::wad::{read_2_bytes, read_name};

/// A `Thing` describes only the position, type, and angle + spawn flags
///
/// The data in the WAD lump is structured as follows:
///
/// | Field Size | Data Type | Content    |
/// |------------|-----------|------------|
/// |  0x00-0x01 |    i16    | X Position |
/// |  0x02-0x03 |    i16    | Y Position |
/// |  0x04-0x05 |    i16    | Angle      |
/// |  0x06-0x07 |    i16    | Type       |
/// |  0x08-0x09 |    i16    | Flags      |
///
/// Each `Thing` record is 10 bytes
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct WadThing {
    pub x: i16,
    pub y: i16,
    pub angle: i16,
    pub kind: i16,
    pub flags: i16,
}

impl WadThing {
    pub const SIZE: usize = 10;

    pub fn new(x: i16, y: i16, angle: i16, kind: i16, flags: i16) -> WadThing {
        WadThing {
            x,
            y,
            angle,
            kind,
            flags,
        }
    }

    pub(crate) fn parse(data: &[u8]) -> Self {
        WadThing::new(
            read_2_bytes(data, 0),
            read_2_bytes(data, 2),
            read_2_bytes(data, 4),
            read_2_bytes(data, 6),
            read_2_bytes(data, 8),
        )
    }

    pub(crate) fn write(&self, buf: &mut Vec<u8>) {
        for v in [self.x, self.y, self.angle, self.kind, self.flags] {
            buf.extend_from_slice(&v.to_le_bytes());
        }
    }
}

/// A `Vertex` is the basic struct used for any type of coordinate
/// in the game
///
/// | Field Size | Data Type | Content      |
/// |------------|-----------|--------------|
/// |  0x00-0x01 |    i16    | X Coordinate |
/// |  0x02-0x03 |    i16    | Y Coordinate |
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct WadVertex {
    pub x: i16,
    pub y: i16,
}

impl WadVertex {
    pub const SIZE: usize = 4;

    pub fn new(x: i16, y: i16) -> WadVertex {
        WadVertex { x, y }
    }

    pub(crate) fn parse(data: &[u8]) -> Self {
        WadVertex::new(read_2_bytes(data, 0), read_2_bytes(data, 2))
    }

    pub(crate) fn write(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(&self.x.to_le_bytes());
        buf.extend_from_slice(&self.y.to_le_bytes());
    }
}

/// Each linedef represents a line from one of the VERTEXES to another.
///
///| Field Size | Data Type      | Content                                   |
///|------------|----------------|-------------------------------------------|
///|  0x00-0x01 | Unsigned short | Start vertex                              |
///|  0x02-0x03 | Unsigned short | End vertex                                |
///|  0x04-0x05 | Unsigned short | Flags                                     |
///|  0x06-0x07 | Unsigned short | Line type / Action                        |
///|  0x08-0x09 | Unsigned short | Sector tag                                |
///|  0x0A-0x0B | Unsigned short | Front sidedef ( 0xFFFF side not present ) |
///|  0x0C-0x0D | Unsigned short | Back sidedef  ( 0xFFFF side not present ) |
///
/// A Linedef will always have at least one side. This first side is referred to
/// as either front or right. If you imagine a linedef starting from the bottom
/// of the screen travelling upwards then the right side of this line is the first
/// valid side (and is the front).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WadLineDef {
    pub start_vertex: u16,
    pub end_vertex: u16,
    /// The line attributes, see `LineDefFlags`
    pub flags: i16,
    pub special: i16,
    /// Ties this line's effect type to all SECTORS that have the same tag
    pub sector_tag: i16,
    pub front_sidedef: u16,
    /// `0xFFFF` in the lump means there is no sidedef
    pub back_sidedef: Option<u16>,
}

impl WadLineDef {
    pub const SIZE: usize = 14;

    pub fn new(
        start_vertex: u16,
        end_vertex: u16,
        flags: i16,
        special: i16,
        sector_tag: i16,
        front_sidedef: u16,
        back_sidedef: Option<u16>,
    ) -> WadLineDef {
        WadLineDef {
            start_vertex,
            end_vertex,
            flags,
            special,
            sector_tag,
            front_sidedef,
            back_sidedef,
        }
    }

    pub(crate) fn parse(data: &[u8]) -> Self {
        let back = read_2_bytes(data, 12) as u16;
        WadLineDef::new(
            read_2_bytes(data, 0) as u16,
            read_2_bytes(data, 2) as u16,
            read_2_bytes(data, 4),
            read_2_bytes(data, 6),
            read_2_bytes(data, 8),
            read_2_bytes(data, 10) as u16,
            (back != u16::MAX).then_some(back),
        )
    }

    pub(crate) fn write(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(&self.start_vertex.to_le_bytes());
        buf.extend_from_slice(&self.end_vertex.to_le_bytes());
        buf.extend_from_slice(&self.flags.to_le_bytes());
        buf.extend_from_slice(&self.special.to_le_bytes());
        buf.extend_from_slice(&self.sector_tag.to_le_bytes());
        buf.extend_from_slice(&self.front_sidedef.to_le_bytes());
        buf.extend_from_slice(&self.back_sidedef.unwrap_or(u16::MAX).to_le_bytes());
    }
}

/// Texture names and offsets for one side of a linedef, and the sector that
/// side faces.
///
/// | Field Size | Data Type | Content                |
/// |------------|-----------|------------------------|
/// |  0x00-0x01 |    i16    | X offset               |
/// |  0x02-0x03 |    i16    | Y offset               |
/// |  0x04-0x0B |  8 ASCII  | Upper texture          |
/// |  0x0C-0x13 |  8 ASCII  | Lower texture          |
/// |  0x14-0x1B |  8 ASCII  | Middle texture         |
/// |  0x1C-0x1D |    i16    | Sector this side faces |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WadSideDef {
    pub x_offset: i16,
    pub y_offset: i16,
    pub upper_tex: String,
    pub lower_tex: String,
    pub middle_tex: String,
    pub sector: i16,
}

impl WadSideDef {
    pub const SIZE: usize = 30;

    pub fn new(
        x_offset: i16,
        y_offset: i16,
        upper_tex: &str,
        lower_tex: &str,
        middle_tex: &str,
        sector: i16,
    ) -> WadSideDef {
        WadSideDef {
            x_offset,
            y_offset,
            upper_tex: upper_tex.to_owned(),
            lower_tex: lower_tex.to_owned(),
            middle_tex: middle_tex.to_owned(),
            sector,
        }
    }

    pub(crate) fn parse(data: &[u8]) -> Self {
        WadSideDef {
            x_offset: read_2_bytes(data, 0),
            y_offset: read_2_bytes(data, 2),
            upper_tex: read_name(&data[4..12]),
            lower_tex: read_name(&data[12..20]),
            middle_tex: read_name(&data[20..28]),
            sector: read_2_bytes(data, 28),
        }
    }

    pub(crate) fn write(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(&self.x_offset.to_le_bytes());
        buf.extend_from_slice(&self.y_offset.to_le_bytes());
        write_name(&self.upper_tex, buf);
        write_name(&self.lower_tex, buf);
        write_name(&self.middle_tex, buf);
        buf.extend_from_slice(&self.sector.to_le_bytes());
    }
}

/// A `Sector` is a horizontal (east-west and north-south) area of the map
/// where a floor height and ceiling height is defined.
///
/// | Field Size | Data Type | Content                  |
/// |------------|-----------|--------------------------|
/// |  0x00-0x01 |    i16    | Floor height             |
/// |  0x02-0x03 |    i16    | Ceiling height           |
/// |  0x04-0x0B |  8 ASCII  | Floor texture            |
/// |  0x0C-0x13 |  8 ASCII  | Ceiling texture          |
/// |  0x14-0x15 |    i16    | Light level              |
/// |  0x16-0x17 |    i16    | Special Type             |
/// |  0x18-0x19 |    i16    | Tag number               |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WadSector {
    pub floor_height: i16,
    pub ceil_height: i16,
    pub floor_tex: String,
    pub ceil_tex: String,
    pub light_level: i16,
    pub kind: i16,
    pub tag: i16,
}

impl WadSector {
    pub const SIZE: usize = 26;

    pub fn new(
        floor_height: i16,
        ceil_height: i16,
        floor_tex: &str,
        ceil_tex: &str,
        light_level: i16,
        kind: i16,
        tag: i16,
    ) -> WadSector {
        WadSector {
            floor_height,
            ceil_height,
            floor_tex: floor_tex.to_owned(),
            ceil_tex: ceil_tex.to_owned(),
            light_level,
            kind,
            tag,
        }
    }

    pub(crate) fn parse(data: &[u8]) -> Self {
        WadSector {
            floor_height: read_2_bytes(data, 0),
            ceil_height: read_2_bytes(data, 2),
            floor_tex: read_name(&data[4..12]),
            ceil_tex: read_name(&data[12..20]),
            light_level: read_2_bytes(data, 20),
            kind: read_2_bytes(data, 22),
            tag: read_2_bytes(data, 24),
        }
    }

    pub(crate) fn write(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(&self.floor_height.to_le_bytes());
        buf.extend_from_slice(&self.ceil_height.to_le_bytes());
        write_name(&self.floor_tex, buf);
        write_name(&self.ceil_tex, buf);
        buf.extend_from_slice(&self.light_level.to_le_bytes());
        buf.extend_from_slice(&self.kind.to_le_bytes());
        buf.extend_from_slice(&self.tag.to_le_bytes());
    }
}

pub(crate) fn write_name(name: &str, buf: &mut Vec<u8>) {
    let mut n = [0u8; 8];
    for (i, b) in name.bytes().take(8).enumerate() {
        n[i] = b;
    }
    buf.extend_from_slice(&n);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linedef_without_back_side() {
        let mut buf = Vec::new();
        WadLineDef::new(0, 1, 1, 0, 0, 3, None).write(&mut buf);
        assert_eq!(buf.len(), WadLineDef::SIZE);
        assert_eq!(&buf[12..14], &[0xff, 0xff]);
        let line = WadLineDef::parse(&buf);
        assert_eq!(line.back_sidedef, None);
        assert_eq!(line.front_sidedef, 3);
    }

    #[test]
    fn sector_names_are_nul_padded() {
        let mut buf = Vec::new();
        WadSector::new(-8, 128, "FLOOR4_8", "F_SKY1", 160, 9, 3).write(&mut buf);
        assert_eq!(buf.len(), WadSector::SIZE);
        let sector = WadSector::parse(&buf);
        assert_eq!(sector.floor_height, -8);
        assert_eq!(sector.floor_tex, "FLOOR4_8");
        assert_eq!(sector.ceil_tex, "F_SKY1");
        assert_eq!(sector.kind, 9);
    }
}
