use std::fmt;
use std::ops::{Add, AddAssign, Div, Mul, Neg, Shl, Shr, Sub, SubAssign};

use lazy_static::lazy_static;

pub const FRACBITS: i32 = 16;
pub const FRACUNIT: i32 = 1 << FRACBITS;

// Size of the angle table (fineangles)
pub const FINEANGLES: usize = 8192;
pub const FINEMASK: usize = FINEANGLES - 1;
/// Shift a 32bit BAM down to an index in the fine tables
pub const ANGLETOFINESHIFT: u32 = 19;

lazy_static! {
    /// Sine over 5/4 of a circle so that cosine is a quarter-turn offset in to
    /// the same table. Sampled at the centre of each fine angle as the id tables
    /// were.
    static ref FINESINE_TABLE: Vec<i32> = {
        let len = 5 * FINEANGLES / 4;
        let mut table = Vec::with_capacity(len);
        for i in 0..len {
            let a = (i as f64 + 0.5) * std::f64::consts::TAU / FINEANGLES as f64;
            table.push((a.sin() * FRACUNIT as f64) as i32);
        }
        table
    };
}

/// A Doom `fixed_t`: 16.16 signed fixed point. All arithmetic wraps the way
/// the C integer ops did, multiplication and division go through 64bit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FixedPoint(i32);

impl FixedPoint {
    pub const ZERO: Self = Self(0);
    pub const UNIT: Self = Self(FRACUNIT);
    pub const MAX: Self = Self(i32::MAX);
    pub const MIN: Self = Self(i32::MIN);

    /// From the raw bit pattern
    pub const fn new(raw: i32) -> Self {
        Self(raw)
    }

    /// From a whole number of map units
    pub const fn from_int(value: i32) -> Self {
        Self(value << FRACBITS)
    }

    pub const fn raw(self) -> i32 {
        self.0
    }

    /// Whole map units, rounding toward negative infinity
    pub const fn to_int(self) -> i32 {
        self.0 >> FRACBITS
    }

    pub const fn abs(self) -> Self {
        Self(self.0.wrapping_abs())
    }

    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub fn to_f32(self) -> f32 {
        self.0 as f32 / FRACUNIT as f32
    }

    /// `finesine[idx]`, the index is masked to the table
    pub fn finesine(idx: usize) -> Self {
        Self(FINESINE_TABLE[idx & FINEMASK])
    }

    /// `finecosine[idx]`, the index is masked to the table
    pub fn finecosine(idx: usize) -> Self {
        Self(FINESINE_TABLE[(idx & FINEMASK) + FINEANGLES / 4])
    }
}

impl fmt::Display for FixedPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}", self.to_f32())
    }
}

impl Add for FixedPoint {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0.wrapping_add(rhs.0))
    }
}

impl AddAssign for FixedPoint {
    fn add_assign(&mut self, rhs: Self) {
        self.0 = self.0.wrapping_add(rhs.0);
    }
}

impl Sub for FixedPoint {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self(self.0.wrapping_sub(rhs.0))
    }
}

impl SubAssign for FixedPoint {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 = self.0.wrapping_sub(rhs.0);
    }
}

impl Neg for FixedPoint {
    type Output = Self;

    fn neg(self) -> Self {
        Self(self.0.wrapping_neg())
    }
}

/// `FixedMul`
impl Mul for FixedPoint {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        Self(((self.0 as i64 * rhs.0 as i64) >> FRACBITS) as i32)
    }
}

/// Scale by a plain integer, e.g `speed * 4`
impl Mul<i32> for FixedPoint {
    type Output = Self;

    fn mul(self, rhs: i32) -> Self {
        Self(self.0.wrapping_mul(rhs))
    }
}

/// `FixedDiv`, including the overflow guard
impl Div for FixedPoint {
    type Output = Self;

    fn div(self, rhs: Self) -> Self {
        if (self.0.wrapping_abs() >> 14) >= rhs.0.wrapping_abs() {
            return if (self.0 ^ rhs.0) < 0 {
                Self::MIN
            } else {
                Self::MAX
            };
        }
        Self((((self.0 as i64) << FRACBITS) / rhs.0 as i64) as i32)
    }
}

/// Divide by a plain integer, truncating toward zero like C
impl Div<i32> for FixedPoint {
    type Output = Self;

    fn div(self, rhs: i32) -> Self {
        Self(self.0 / rhs)
    }
}

impl Shr<u32> for FixedPoint {
    type Output = Self;

    fn shr(self, rhs: u32) -> Self {
        Self(self.0 >> rhs)
    }
}

impl Shl<u32> for FixedPoint {
    type Output = Self;

    fn shl(self, rhs: u32) -> Self {
        Self(self.0.wrapping_shl(rhs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_mul_matches_c() {
        let a = FixedPoint::from_int(3);
        let b = FixedPoint::new(FRACUNIT / 2);
        assert_eq!((a * b).raw(), 3 * FRACUNIT / 2);
        assert_eq!((FixedPoint::new(0xe800) * FixedPoint::from_int(10)).raw(), 0x91000);
    }

    #[test]
    fn fixed_div_guards_overflow() {
        let big = FixedPoint::from_int(30000);
        let tiny = FixedPoint::new(1);
        assert_eq!(big / tiny, FixedPoint::MAX);
        assert_eq!(-big / tiny, FixedPoint::MIN);
        assert_eq!(
            FixedPoint::from_int(1) / FixedPoint::from_int(2),
            FixedPoint::new(FRACUNIT / 2)
        );
    }

    #[test]
    fn integer_div_truncates_toward_zero() {
        assert_eq!((FixedPoint::new(-3) / 2).raw(), -1);
        assert_eq!((FixedPoint::UNIT / 2).raw(), FRACUNIT / 2);
    }

    #[test]
    fn sine_table_layout() {
        assert_eq!(FixedPoint::finesine(0).raw(), 25);
        assert_eq!(FixedPoint::finesine(2047).raw(), 65535);
        assert_eq!(FixedPoint::finesine(4096).raw(), -25);
        assert_eq!(FixedPoint::finecosine(0), FixedPoint::finesine(2048));
        // masked
        assert_eq!(FixedPoint::finesine(FINEANGLES + 5), FixedPoint::finesine(5));
    }

    #[test]
    fn to_int_floors() {
        assert_eq!(FixedPoint::new(-1).to_int(), -1);
        assert_eq!(FixedPoint::from_int(41).to_int(), 41);
    }
}
