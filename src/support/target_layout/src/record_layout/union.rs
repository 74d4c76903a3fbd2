use super::{
    MemberExtent, MemberLayout, MemberRef, PaddingRegion, RecordInfo, RecordLayout,
    field::{FieldPlacement, classify_field, too_large},
};
use crate::{TargetLayout, TypeLayoutCache};
use data_units::{BitUnits, ByteUnits};
use type_graph::{LayoutError, RecordKind};

/// Lays out a union, every member starting at offset zero.
#[derive(Debug)]
pub struct UnionLayoutBuilder<'a> {
    pub type_layout_cache: &'a TypeLayoutCache<'a>,
    pub info: RecordInfo<'a>,
    pub size: ByteUnits,
    pub alignment: ByteUnits,
    pub data_size: BitUnits,
    pub members: Vec<MemberLayout>,
    pub has_flexible_tail: bool,
}

impl<'a> UnionLayoutBuilder<'a> {
    pub fn generate(
        type_layout_cache: &'a TypeLayoutCache<'a>,
        info: RecordInfo<'a>,
    ) -> Result<RecordLayout, LayoutError> {
        let mut builder = Self {
            type_layout_cache,
            info,
            size: ByteUnits::ZERO,
            alignment: ByteUnits::ONE,
            data_size: BitUnits::ZERO,
            members: Vec::with_capacity(info.field_count()),
            has_flexible_tail: false,
        };

        builder.layout_fields()?;
        builder.finish_layout()
    }

    fn layout_fields(&mut self) -> Result<(), LayoutError> {
        for (field_i, field) in self.info.iter() {
            let (bit_length, full_size, alignment) =
                match classify_field(self.type_layout_cache, &self.info, field_i, field)? {
                    FieldPlacement::ZeroWidth(_) => continue,
                    FieldPlacement::Bitfield(bitfield) => {
                        let width = BitUnits::of(bitfield.width);

                        // A bitfield opens a storage unit of its own, named or not
                        let full_size = bitfield.underlying.size;

                        let alignment = if field.name.is_some() {
                            bitfield.underlying.alignment
                        } else {
                            ByteUnits::ONE
                        };

                        (width, full_size, alignment)
                    }
                    FieldPlacement::Bytes(type_layout) => {
                        if type_layout.completeness.is_flexible_tail() {
                            self.has_flexible_tail = true;
                        }

                        (
                            type_layout.width.to_bits(),
                            type_layout.width,
                            type_layout.alignment,
                        )
                    }
                };

            self.members.push(MemberLayout {
                member: MemberRef::Field(field_i),
                bit_offset: BitUnits::ZERO,
                bit_length: MemberExtent::Bits(bit_length),
            });

            self.data_size = self.data_size.max(bit_length);
            self.size = self.size.max(full_size);
            self.alignment = self.alignment.max(alignment);
        }

        Ok(())
    }

    fn finish_layout(self) -> Result<RecordLayout, LayoutError> {
        let unpadded_size = self.size;

        let size = if unpadded_size.is_zero() {
            self.type_layout_cache.profile.empty_record_size()
        } else {
            unpadded_size
        }
        .checked_align_to(self.alignment)
        .filter(|size| size.checked_to_bits().is_some())
        .ok_or_else(|| too_large(&self.info, "<tail padding>".into()))?;

        // Each member's own tail stays implicit, only the rounding shows up
        let padding = (size > unpadded_size)
            .then(|| PaddingRegion {
                bit_offset: unpadded_size.to_bits(),
                bit_length: (size - unpadded_size).to_bits(),
            })
            .into_iter()
            .collect();

        Ok(RecordLayout {
            kind: RecordKind::Union,
            size,
            alignment: self.alignment,
            data_size: self.data_size,
            members: self.members,
            padding,
            has_flexible_tail: self.has_flexible_tail,
        })
    }
}
