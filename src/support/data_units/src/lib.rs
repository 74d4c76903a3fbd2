use std::{
    fmt::Display,
    ops::{Add, AddAssign, Div, Mul, Rem, Sub, SubAssign},
};

pub const BITS_PER_BYTE: u64 = 8;

/// A quantity of whole bytes (sizes, alignments and byte offsets).
///
/// ```
/// # use data_units::ByteUnits;
/// assert_eq!(ByteUnits::of(9).align_to(ByteUnits::of(8)), ByteUnits::of(16));
/// assert_eq!(ByteUnits::of(2).to_bits().bits(), 16);
/// ```
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct ByteUnits {
    units: u64,
}

impl ByteUnits {
    pub const ZERO: Self = Self { units: 0 };
    pub const ONE: Self = Self { units: 1 };

    pub const fn of(value: u64) -> Self {
        Self { units: value }
    }

    pub const fn bytes(&self) -> u64 {
        self.units
    }

    pub fn to_bits(self) -> BitUnits {
        BitUnits::from(self)
    }

    /// Same as [`to_bits`](Self::to_bits), or `None` if the bit count overflows
    pub fn checked_to_bits(self) -> Option<BitUnits> {
        self.units.checked_mul(BITS_PER_BYTE).map(BitUnits::of)
    }
}

/// A quantity of bits, used for everything that can land inside a byte
/// (bitfield offsets, bitfield widths, padding inside storage units).
///
/// ```
/// # use data_units::{BitUnits, ByteUnits};
/// let cursor = BitUnits::of(10);
/// assert_eq!(cursor.ceil_bytes(), ByteUnits::of(2));
/// assert_eq!(cursor.whole_bytes(), ByteUnits::of(1));
/// assert_eq!(cursor.bits_into_byte(), 2);
/// assert_eq!(cursor.to_string(), "1.2");
/// ```
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct BitUnits {
    units: u64,
}

impl BitUnits {
    pub const ZERO: Self = Self { units: 0 };

    pub const fn of(value: u64) -> Self {
        Self { units: value }
    }

    pub const fn bits(&self) -> u64 {
        self.units
    }

    /// Number of whole bytes covered, rounding down
    pub const fn whole_bytes(&self) -> ByteUnits {
        ByteUnits::of(self.units / BITS_PER_BYTE)
    }

    /// Number of bytes needed to hold this many bits
    pub const fn ceil_bytes(&self) -> ByteUnits {
        ByteUnits::of(self.units.div_ceil(BITS_PER_BYTE))
    }

    pub const fn bits_into_byte(&self) -> u64 {
        self.units % BITS_PER_BYTE
    }

    pub const fn is_byte_aligned(&self) -> bool {
        self.bits_into_byte() == 0
    }
}

/// Renders as `bytes` or `bytes.bits`, the notation used by layout dumps.
impl Display for BitUnits {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let bytes = self.whole_bytes().bytes();

        match self.bits_into_byte() {
            0 => write!(f, "{}", bytes),
            bits => write!(f, "{}.{}", bytes, bits),
        }
    }
}

impl Display for ByteUnits {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.units)
    }
}

macro_rules! impl_units_from {
    ($units:ty, $ty:ty) => {
        impl From<$ty> for $units {
            fn from(value: $ty) -> Self {
                Self {
                    units: value.into(),
                }
            }
        }
    };
}

impl_units_from!(ByteUnits, u8);
impl_units_from!(ByteUnits, u16);
impl_units_from!(ByteUnits, u32);
impl_units_from!(ByteUnits, u64);

impl_units_from!(BitUnits, u8);
impl_units_from!(BitUnits, u16);
impl_units_from!(BitUnits, u32);
impl_units_from!(BitUnits, u64);

impl TryFrom<BitUnits> for ByteUnits {
    type Error = ();

    fn try_from(value: BitUnits) -> Result<Self, ()> {
        if value.is_byte_aligned() {
            Ok(value.whole_bytes())
        } else {
            Err(())
        }
    }
}

impl From<ByteUnits> for BitUnits {
    fn from(value: ByteUnits) -> Self {
        Self {
            units: value.bytes() * BITS_PER_BYTE,
        }
    }
}

macro_rules! impl_math_for {
    ($units:ty) => {
        impl $units {
            pub fn is_zero(&self) -> bool {
                self.units == 0
            }

            pub fn align_to(&self, align: $units) -> $units {
                let width = self.units;
                let align = align.units;

                assert_ne!(align, 0);
                Self::of((width + align - 1) & !(align - 1))
            }

            pub fn checked_align_to(&self, align: $units) -> Option<$units> {
                let align = align.units;

                assert_ne!(align, 0);
                self.units
                    .checked_add(align - 1)
                    .map(|width| Self::of(width & !(align - 1)))
            }

            pub fn checked_add(&self, rhs: $units) -> Option<$units> {
                self.units.checked_add(rhs.units).map(Self::of)
            }

            pub fn checked_mul(&self, rhs: u64) -> Option<$units> {
                self.units.checked_mul(rhs).map(Self::of)
            }

            pub fn is_power_of_2(&self) -> bool {
                self.units != 0 && (self.units & (self.units - 1)) == 0
            }
        }

        impl Add<$units> for $units {
            type Output = $units;

            fn add(self, rhs: $units) -> Self::Output {
                Self {
                    units: self.units + rhs.units,
                }
            }
        }

        impl AddAssign<$units> for $units {
            fn add_assign(&mut self, rhs: $units) {
                self.units += rhs.units
            }
        }

        impl Sub<$units> for $units {
            type Output = $units;

            fn sub(self, rhs: $units) -> Self::Output {
                Self {
                    units: self.units - rhs.units,
                }
            }
        }

        impl SubAssign<$units> for $units {
            fn sub_assign(&mut self, rhs: $units) {
                self.units -= rhs.units
            }
        }

        impl Mul<u64> for $units {
            type Output = $units;

            fn mul(self, rhs: u64) -> Self::Output {
                Self {
                    units: self.units * rhs,
                }
            }
        }

        impl Div<$units> for $units {
            type Output = u64;

            fn div(self, rhs: $units) -> Self::Output {
                self.units / rhs.units
            }
        }

        impl Rem<$units> for $units {
            type Output = $units;

            fn rem(self, rhs: $units) -> Self::Output {
                Self {
                    units: self.units % rhs.units,
                }
            }
        }

        impl std::iter::Sum for $units {
            fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
                iter.fold(Self::of(0), |total, next| total + next)
            }
        }
    };
}

impl_math_for!(ByteUnits);
impl_math_for!(BitUnits);

#[test]
fn test_bit_units_align_to_byte_alignment() {
    let cursor = BitUnits::of(3);
    assert_eq!(cursor.align_to(ByteUnits::of(1).to_bits()), BitUnits::of(8));
    assert_eq!(cursor.align_to(ByteUnits::of(8).to_bits()), BitUnits::of(64));
    assert_eq!(BitUnits::of(64).align_to(BitUnits::of(64)), BitUnits::of(64));
}

#[test]
fn test_bit_units_display() {
    assert_eq!(BitUnits::of(0).to_string(), "0");
    assert_eq!(BitUnits::of(3).to_string(), "0.3");
    assert_eq!(BitUnits::of(54).to_string(), "6.6");
    assert_eq!(BitUnits::of(136).to_string(), "17");
}

#[test]
fn test_byte_units_try_from_bits() {
    assert_eq!(ByteUnits::try_from(BitUnits::of(24)), Ok(ByteUnits::of(3)));
    assert_eq!(ByteUnits::try_from(BitUnits::of(25)), Err(()));
}

#[test]
fn test_power_of_two() {
    assert!(ByteUnits::of(1).is_power_of_2());
    assert!(ByteUnits::of(8).is_power_of_2());
    assert!(!ByteUnits::of(12).is_power_of_2());
    assert!(!ByteUnits::of(0).is_power_of_2());
}

#[test]
fn test_checked_arithmetic() {
    let huge = ByteUnits::of(1 << 61);
    assert_eq!(huge.checked_to_bits(), None);
    assert_eq!(huge.checked_mul(4), Some(ByteUnits::of(1 << 63)));
    assert_eq!(huge.checked_mul(8), None);
    assert_eq!(BitUnits::of(u64::MAX).checked_add(BitUnits::of(1)), None);
    assert_eq!(BitUnits::of(u64::MAX - 2).checked_align_to(BitUnits::of(8)), None);
    assert_eq!(
        ByteUnits::of(9).checked_align_to(ByteUnits::of(8)),
        Some(ByteUnits::of(16))
    );
}
