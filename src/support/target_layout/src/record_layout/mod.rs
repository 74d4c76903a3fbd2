mod field;
mod itanium;
mod padding;
mod record_info;
mod storage_unit;
mod union;

use data_units::{BitUnits, ByteUnits};
use derive_more::IsVariant;
pub use itanium::ItaniumRecordLayoutBuilder;
pub use record_info::RecordInfo;
use std::fmt::Display;
use type_graph::RecordKind;
pub use union::UnionLayoutBuilder;

/// Which declaration of the owning record a member layout belongs to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, IsVariant)]
pub enum MemberRef {
    Base(usize),
    Field(usize),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, IsVariant)]
pub enum MemberExtent {
    Bits(BitUnits),
    /// A flexible array member, whose length is not known statically
    Unbounded,
}

impl MemberExtent {
    /// Bits counted towards the record size, with unbounded members counting as none
    pub fn counted_bits(&self) -> BitUnits {
        match self {
            Self::Bits(bits) => *bits,
            Self::Unbounded => BitUnits::ZERO,
        }
    }
}

impl Display for MemberExtent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bits(bits) => write!(f, "{}", bits),
            Self::Unbounded => f.write_str("??"),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct MemberLayout {
    pub member: MemberRef,
    pub bit_offset: BitUnits,
    pub bit_length: MemberExtent,
}

impl MemberLayout {
    pub fn end(&self) -> BitUnits {
        self.bit_offset + self.bit_length.counted_bits()
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PaddingRegion {
    pub bit_offset: BitUnits,
    pub bit_length: BitUnits,
}

impl PaddingRegion {
    pub fn end(&self) -> BitUnits {
        self.bit_offset + self.bit_length
    }
}

/// The resolved layout of one record.
///
/// Never mutated once published by a [`TypeLayoutCache`](crate::TypeLayoutCache).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordLayout {
    pub kind: RecordKind,
    pub size: ByteUnits,
    pub alignment: ByteUnits,
    /// Size without tail padding
    pub data_size: BitUnits,
    pub members: Vec<MemberLayout>,
    pub padding: Vec<PaddingRegion>,
    pub has_flexible_tail: bool,
}

impl RecordLayout {
    /// Whether the record holds no storage of its own
    pub fn is_empty(&self) -> bool {
        self.data_size.is_zero() && !self.has_flexible_tail
    }

    pub fn member(&self, member: MemberRef) -> Option<&MemberLayout> {
        self.members.iter().find(|layout| layout.member == member)
    }

    pub fn field(&self, index: usize) -> Option<&MemberLayout> {
        self.member(MemberRef::Field(index))
    }

    pub fn base(&self, index: usize) -> Option<&MemberLayout> {
        self.member(MemberRef::Base(index))
    }

    pub fn padding_bits(&self) -> BitUnits {
        self.padding.iter().map(|region| region.bit_length).sum()
    }

    /// Re-checks the invariants every computed layout must hold.
    pub fn verify(&self) -> Result<(), String> {
        if !self.alignment.is_power_of_2() {
            return Err(format!("alignment {} is not a power of two", self.alignment));
        }

        if !(self.size % self.alignment).is_zero() {
            return Err(format!(
                "size {} is not a multiple of alignment {}",
                self.size, self.alignment
            ));
        }

        let size_bits = self.size.to_bits();

        if let Some(region) = self.padding.iter().find(|region| region.end() > size_bits) {
            return Err(format!(
                "padding {}[{}] extends past size {}",
                region.bit_offset, region.bit_length, self.size
            ));
        }

        match self.kind {
            RecordKind::Union => {
                if let Some(member) = self.members.iter().find(|m| !m.bit_offset.is_zero()) {
                    return Err(format!(
                        "union member {:?} is not at offset zero",
                        member.member
                    ));
                }
            }
            RecordKind::Struct => {
                let mut end = BitUnits::ZERO;

                for member in self.members.iter() {
                    if member.bit_offset < end {
                        return Err(format!(
                            "member {:?} at {} overlaps the previous member",
                            member.member, member.bit_offset
                        ));
                    }
                    end = member.end();
                }

                let members = self
                    .members
                    .iter()
                    .map(|member| member.bit_length.counted_bits())
                    .sum::<BitUnits>();

                if members + self.padding_bits() != size_bits {
                    return Err(format!(
                        "members ({} bits) and padding ({} bits) do not tile {} bytes",
                        members.bits(),
                        self.padding_bits().bits(),
                        self.size
                    ));
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout(members: Vec<MemberLayout>, padding: Vec<PaddingRegion>) -> RecordLayout {
        RecordLayout {
            kind: RecordKind::Struct,
            size: ByteUnits::of(8),
            alignment: ByteUnits::of(4),
            data_size: BitUnits::of(40),
            members,
            padding,
            has_flexible_tail: false,
        }
    }

    fn member(index: usize, offset: u64, length: u64) -> MemberLayout {
        MemberLayout {
            member: MemberRef::Field(index),
            bit_offset: BitUnits::of(offset),
            bit_length: MemberExtent::Bits(BitUnits::of(length)),
        }
    }

    fn padding(offset: u64, length: u64) -> PaddingRegion {
        PaddingRegion {
            bit_offset: BitUnits::of(offset),
            bit_length: BitUnits::of(length),
        }
    }

    #[test]
    fn test_verify_accepts_tiling() {
        let layout = layout(
            vec![member(0, 0, 32), member(1, 32, 8)],
            vec![padding(40, 24)],
        );
        assert_eq!(layout.verify(), Ok(()));
    }

    #[test]
    fn test_verify_rejects_gaps_and_overlap() {
        let missing_padding = layout(vec![member(0, 0, 32), member(1, 32, 8)], vec![]);
        assert!(missing_padding.verify().is_err());

        let overlapping = layout(
            vec![member(0, 0, 32), member(1, 24, 8)],
            vec![padding(40, 24)],
        );
        assert!(overlapping.verify().is_err());
    }

    #[test]
    fn test_extent_display() {
        assert_eq!(MemberExtent::Bits(BitUnits::of(3)).to_string(), "0.3");
        assert_eq!(MemberExtent::Unbounded.to_string(), "??");
        assert_eq!(MemberExtent::Unbounded.counted_bits(), BitUnits::ZERO);
    }
}
