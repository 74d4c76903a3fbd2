use super::{MemberLayout, PaddingRegion};
use data_units::BitUnits;

/// Collects the gaps between consecutive struct members, plus the tail up to `size_bits`.
///
/// Members must be sorted by offset and must not overlap.
pub fn struct_padding(members: &[MemberLayout], size_bits: BitUnits) -> Vec<PaddingRegion> {
    let mut padding = Vec::new();
    let mut end = BitUnits::ZERO;

    for member in members {
        push_gap(&mut padding, end, member.bit_offset);
        end = end.max(member.end());
    }

    push_gap(&mut padding, end, size_bits);
    padding
}

fn push_gap(padding: &mut Vec<PaddingRegion>, from: BitUnits, to: BitUnits) {
    if to > from {
        padding.push(PaddingRegion {
            bit_offset: from,
            bit_length: to - from,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MemberExtent, MemberRef};

    #[test]
    fn test_gaps_between_bitfields() {
        let members = [
            MemberLayout {
                member: MemberRef::Field(0),
                bit_offset: BitUnits::of(0),
                bit_length: MemberExtent::Bits(BitUnits::of(3)),
            },
            MemberLayout {
                member: MemberRef::Field(2),
                bit_offset: BitUnits::of(8),
                bit_length: MemberExtent::Bits(BitUnits::of(2)),
            },
        ];

        assert_eq!(
            struct_padding(&members, BitUnits::of(64)),
            vec![
                PaddingRegion {
                    bit_offset: BitUnits::of(3),
                    bit_length: BitUnits::of(5),
                },
                PaddingRegion {
                    bit_offset: BitUnits::of(10),
                    bit_length: BitUnits::of(54),
                },
            ]
        );
    }

    #[test]
    fn test_empty_record_is_all_padding() {
        assert_eq!(
            struct_padding(&[], BitUnits::of(8)),
            vec![PaddingRegion {
                bit_offset: BitUnits::ZERO,
                bit_length: BitUnits::of(8),
            }]
        );
    }
}
