use std::ops::{Add, AddAssign, Sub, SubAssign};

use crate::fixed_point::{ANGLETOFINESHIFT, FixedPoint};

pub const ANG45: u32 = 0x2000_0000;
pub const ANG90: u32 = 0x4000_0000;
pub const ANG180: u32 = 0x8000_0000;
pub const ANG270: u32 = 0xc000_0000;

/// Binary Angle Measure. The full `u32` range is one turn, so all maths wraps
/// naturally.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Angle(u32);

impl Angle {
    #[inline]
    pub const fn new(bam: u32) -> Self {
        Angle(bam)
    }

    #[inline]
    pub const fn bam(self) -> u32 {
        self.0
    }

    /// Map things store angles in degrees, snapped to 45 degree steps
    pub const fn from_map_degrees(degrees: i16) -> Self {
        Angle(ANG45.wrapping_mul((degrees as i32 / 45) as u32))
    }

    /// Index in to the fine trig tables
    #[inline]
    pub const fn fine_index(self) -> usize {
        (self.0 >> ANGLETOFINESHIFT) as usize
    }

    #[inline]
    pub fn sin(self) -> FixedPoint {
        FixedPoint::finesine(self.fine_index())
    }

    #[inline]
    pub fn cos(self) -> FixedPoint {
        FixedPoint::finecosine(self.fine_index())
    }
}

impl Add for Angle {
    type Output = Angle;

    fn add(self, rhs: Angle) -> Angle {
        Angle(self.0.wrapping_add(rhs.0))
    }
}

impl AddAssign for Angle {
    fn add_assign(&mut self, rhs: Angle) {
        self.0 = self.0.wrapping_add(rhs.0);
    }
}

impl Sub for Angle {
    type Output = Angle;

    fn sub(self, rhs: Angle) -> Angle {
        Angle(self.0.wrapping_sub(rhs.0))
    }
}

impl SubAssign for Angle {
    fn sub_assign(&mut self, rhs: Angle) {
        self.0 = self.0.wrapping_sub(rhs.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_past_full_turn() {
        let mut a = Angle::new(ANG270);
        a += Angle::new(ANG180);
        assert_eq!(a.bam(), ANG90);
        a -= Angle::new(ANG180);
        assert_eq!(a.bam(), ANG270);
    }

    #[test]
    fn map_degrees_snap() {
        assert_eq!(Angle::from_map_degrees(90).bam(), ANG90);
        assert_eq!(Angle::from_map_degrees(100).bam(), ANG90);
        assert_eq!(Angle::from_map_degrees(270).bam(), ANG270);
    }

    #[test]
    fn fine_index_quadrants() {
        assert_eq!(Angle::new(ANG90).fine_index(), 2048);
        assert!(Angle::new(ANG90).sin().raw() > 65500);
        assert!(Angle::new(0).cos().raw() > 65500);
    }
}
