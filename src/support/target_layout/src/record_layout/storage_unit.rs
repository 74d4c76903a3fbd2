use data_units::BitUnits;
use primitives::Primitive;
use target::BitfieldPolicy;

const BYTE: BitUnits = BitUnits::of(8);

#[derive(Clone, Debug)]
struct OpenStorageUnit {
    underlying: Primitive,
    start: BitUnits,
    end: BitUnits,
}

/// Tracks where the next member of a struct goes, down to the bit.
///
/// Byte-sized members only ever see a byte-aligned cursor, bitfields are
/// packed according to the profile's [`BitfieldPolicy`]. Every placement
/// returns `None` once the cursor would no longer fit in 64 bits.
#[derive(Clone, Debug)]
pub struct BitCursor {
    policy: BitfieldPolicy,
    data_size: BitUnits,
    open_unit: Option<OpenStorageUnit>,
}

impl BitCursor {
    pub fn new(policy: BitfieldPolicy) -> Self {
        Self {
            policy,
            data_size: BitUnits::ZERO,
            open_unit: None,
        }
    }

    /// End of the last placed bit
    pub fn data_size(&self) -> BitUnits {
        self.data_size
    }

    /// Places a bitfield of `width` bits over `underlying` and returns its offset.
    pub fn place_bitfield(&mut self, underlying: &Primitive, width: BitUnits) -> Option<BitUnits> {
        let unit_bits = underlying.bits();
        let align_bits = underlying.alignment.to_bits();

        let offset = match self.policy {
            BitfieldPolicy::Itanium => {
                let offset = self.data_size;

                if (offset % align_bits) + width > unit_bits {
                    offset.checked_align_to(align_bits)?
                } else {
                    offset
                }
            }
            BitfieldPolicy::StrictUnits => match &self.open_unit {
                Some(unit)
                    if unit.underlying == *underlying
                        && self.data_size.checked_add(width)? <= unit.end =>
                {
                    self.data_size
                }
                _ => {
                    self.close_unit()?;
                    let start = self.data_size.checked_align_to(align_bits)?;

                    self.open_unit = Some(OpenStorageUnit {
                        underlying: underlying.clone(),
                        start,
                        end: start.checked_add(unit_bits)?,
                    });
                    start
                }
            },
        };

        self.data_size = offset.checked_add(width)?;
        Some(offset)
    }

    /// Handles `T : 0;`, which makes the next member start a fresh storage unit.
    pub fn skip_to_next_unit(&mut self, underlying: &Primitive) -> Option<()> {
        match self.policy {
            BitfieldPolicy::Itanium => {
                self.data_size = self
                    .data_size
                    .checked_align_to(underlying.alignment.to_bits())?;
                Some(())
            }
            BitfieldPolicy::StrictUnits => self.close_unit(),
        }
    }

    /// Ends any bitfield run, leaving the cursor on a byte boundary.
    pub fn close_unit(&mut self) -> Option<()> {
        match self.policy {
            BitfieldPolicy::Itanium => {
                self.data_size = self.data_size.checked_align_to(BYTE)?;
            }
            BitfieldPolicy::StrictUnits => {
                if let Some(unit) = self.open_unit.take() {
                    debug_assert!(unit.start <= self.data_size);
                    self.data_size = unit.end;
                }
            }
        }

        Some(())
    }

    /// Places a byte-sized member at `alignment` and returns its offset.
    pub fn place_bytes(&mut self, alignment: BitUnits, width: BitUnits) -> Option<BitUnits> {
        self.close_unit()?;

        let offset = self.data_size.checked_align_to(alignment)?;
        self.data_size = offset.checked_add(width)?;
        Some(offset)
    }
}
