use super::{
    MemberExtent, MemberLayout, MemberRef, RecordInfo, RecordLayout,
    field::{FieldPlacement, classify_field, failed_dependency, too_large},
    padding::struct_padding,
    storage_unit::BitCursor,
};
use crate::{TargetLayout, TypeLayout, TypeLayoutCache};
use data_units::{BitUnits, ByteUnits};
use diagnostics::{Diagnostics, Subject, WarningDiagnostic};
use std::sync::Arc;
use type_graph::{
    Bitfield, DefinitionError, Field, LayoutError, RecordKind, Type, UnsupportedConstruct,
};

/// Lays out a struct: bases first, then fields, in declaration order.
#[derive(Debug)]
pub struct ItaniumRecordLayoutBuilder<'a> {
    pub type_layout_cache: &'a TypeLayoutCache<'a>,
    pub info: RecordInfo<'a>,
    pub cursor: BitCursor,
    pub alignment: ByteUnits,
    pub members: Vec<MemberLayout>,
    pub has_flexible_tail: bool,
    pub friendly_record_name: &'a str,
    pub diagnostics: &'a Diagnostics,
}

impl<'a> ItaniumRecordLayoutBuilder<'a> {
    pub fn generate(
        type_layout_cache: &'a TypeLayoutCache<'a>,
        info: RecordInfo<'a>,
    ) -> Result<RecordLayout, LayoutError> {
        let mut builder = Self::new(type_layout_cache, info);
        builder.layout()?;
        builder.finish_layout()
    }

    pub fn new(type_layout_cache: &'a TypeLayoutCache<'a>, info: RecordInfo<'a>) -> Self {
        Self {
            type_layout_cache,
            info,
            cursor: BitCursor::new(type_layout_cache.profile.bitfield_policy),
            alignment: ByteUnits::ONE,
            members: Vec::with_capacity(info.bases().len() + info.field_count()),
            has_flexible_tail: false,
            friendly_record_name: info.name,
            diagnostics: type_layout_cache.diagnostics,
        }
    }

    pub fn layout(&mut self) -> Result<(), LayoutError> {
        self.layout_bases()?;
        self.layout_fields()
    }

    pub fn layout_bases(&mut self) -> Result<(), LayoutError> {
        let bases = self.info.bases();
        let mut base_layouts = Vec::with_capacity(bases.len());

        for (base_i, base) in bases.iter().enumerate() {
            let base_record = self.type_layout_cache.graph.record(base.record);

            if base.is_virtual {
                return Err(UnsupportedConstruct::VirtualBase {
                    record: self.friendly_record_name.into(),
                    base: base_record.display_name().into(),
                }
                .into());
            }

            let layout = self.type_layout_cache.record(base.record).map_err(|cause| {
                failed_dependency(
                    self.type_layout_cache,
                    &self.info,
                    &Type::Record(base.record),
                    cause,
                )
            })?;

            let is_last = base_i + 1 == bases.len() && self.info.field_count() == 0;

            if layout.has_flexible_tail && !is_last {
                return Err(DefinitionError::IncompleteNotTrailing {
                    record: self.friendly_record_name.into(),
                    field: format!("<base {}>", base_record.display_name()),
                }
                .into());
            }

            base_layouts.push(layout);
        }

        let non_empty = base_layouts
            .iter()
            .filter(|layout| !layout.is_empty())
            .count();

        if non_empty > 1 && !self.type_layout_cache.profile.allow_multiple_inheritance {
            return Err(UnsupportedConstruct::MultipleInheritance {
                record: self.friendly_record_name.into(),
                count: non_empty,
                profile: self.type_layout_cache.profile.name().into(),
            }
            .into());
        }

        for (base_i, layout) in base_layouts.into_iter().enumerate() {
            self.layout_base(base_i, &layout)?;
        }

        Ok(())
    }

    fn layout_base(
        &mut self,
        base_i: usize,
        layout: &Arc<RecordLayout>,
    ) -> Result<(), LayoutError> {
        // Bases never share tail padding with what follows them
        let offset = self
            .cursor
            .place_bytes(layout.alignment.to_bits(), layout.size.to_bits())
            .ok_or_else(|| {
                let base = self.info.bases()[base_i].record;
                let base_name = self.type_layout_cache.graph.record(base).display_name();
                too_large(&self.info, format!("<base {}>", base_name))
            })?;

        self.members.push(MemberLayout {
            member: MemberRef::Base(base_i),
            bit_offset: offset,
            bit_length: MemberExtent::Bits(layout.size.to_bits()),
        });

        self.has_flexible_tail = layout.has_flexible_tail;
        self.update_alignment(layout.alignment);
        Ok(())
    }

    pub fn layout_fields(&mut self) -> Result<(), LayoutError> {
        for (field_i, field) in self.info.iter() {
            match classify_field(self.type_layout_cache, &self.info, field_i, field)? {
                FieldPlacement::ZeroWidth(underlying) => {
                    self.cursor
                        .skip_to_next_unit(underlying)
                        .ok_or_else(|| too_large(&self.info, self.info.field_name(field_i)))?;
                }
                FieldPlacement::Bitfield(bitfield) => {
                    self.layout_bitfield(field, bitfield, field_i)?;
                }
                FieldPlacement::Bytes(type_layout) => {
                    self.layout_field(field, type_layout, field_i)?;
                }
            }
        }

        Ok(())
    }

    pub fn layout_bitfield(
        &mut self,
        field: &Field,
        bitfield: &Bitfield,
        field_i: usize,
    ) -> Result<(), LayoutError> {
        let unpadded_field_offset = self.cursor.data_size();
        let width = BitUnits::of(bitfield.width);
        let field_offset = self
            .cursor
            .place_bitfield(&bitfield.underlying, width)
            .ok_or_else(|| too_large(&self.info, self.info.field_name(field_i)))?;

        self.members.push(MemberLayout {
            member: MemberRef::Field(field_i),
            bit_offset: field_offset,
            bit_length: MemberExtent::Bits(width),
        });

        // Unnamed bitfields do not affect the alignment of the record
        if field.name.is_some() {
            self.update_alignment(bitfield.underlying.alignment);
        }

        self.check_field_padding(field_offset, unpadded_field_offset, true, field_i);
        Ok(())
    }

    pub fn layout_field(
        &mut self,
        _field: &Field,
        type_layout: TypeLayout,
        field_i: usize,
    ) -> Result<(), LayoutError> {
        let unpadded_field_offset = self.cursor.data_size();
        let is_flexible_array = type_layout.completeness.is_incomplete();

        let field_size = if is_flexible_array {
            ByteUnits::ZERO
        } else {
            type_layout.width
        };

        let field_offset = self
            .cursor
            .place_bytes(type_layout.alignment.to_bits(), field_size.to_bits())
            .ok_or_else(|| too_large(&self.info, self.info.field_name(field_i)))?;

        self.members.push(MemberLayout {
            member: MemberRef::Field(field_i),
            bit_offset: field_offset,
            bit_length: if is_flexible_array {
                MemberExtent::Unbounded
            } else {
                MemberExtent::Bits(field_size.to_bits())
            },
        });

        if type_layout.is_trailing_only() {
            self.has_flexible_tail = true;
        }

        self.update_alignment(type_layout.alignment);
        self.check_field_padding(field_offset, unpadded_field_offset, false, field_i);
        Ok(())
    }

    pub fn finish_layout(mut self) -> Result<RecordLayout, LayoutError> {
        let data_size = self.cursor.data_size();

        let mut size = self
            .cursor
            .close_unit()
            .map(|_| self.cursor.data_size().ceil_bytes())
            .ok_or_else(|| self.trailing_too_large())?;

        // Records always occupy storage
        if size.is_zero() {
            size = self.type_layout_cache.profile.empty_record_size();
        }

        let size = size
            .checked_align_to(self.alignment)
            .filter(|size| size.checked_to_bits().is_some())
            .ok_or_else(|| self.trailing_too_large())?;

        if size.to_bits() > data_size && self.diagnostics.flags().warn_padded_record {
            self.diagnostics.push(WarningDiagnostic::new(
                format!(
                    "Padded type '{}', with {} bits to alignment boundary",
                    self.friendly_record_name,
                    (size.to_bits() - data_size).bits()
                ),
                Subject::record(self.friendly_record_name),
            ));
        }

        Ok(RecordLayout {
            kind: RecordKind::Struct,
            size,
            alignment: self.alignment,
            data_size,
            padding: struct_padding(&self.members, size.to_bits()),
            members: self.members,
            has_flexible_tail: self.has_flexible_tail,
        })
    }

    fn trailing_too_large(&self) -> LayoutError {
        too_large(&self.info, "<tail padding>".into())
    }

    pub fn update_alignment(&mut self, new_alignment: ByteUnits) {
        if new_alignment > self.alignment {
            debug_assert!(new_alignment.is_power_of_2());
            self.alignment = new_alignment;
        }
    }

    fn check_field_padding(
        &self,
        field_offset: BitUnits,
        unpadded_field_offset: BitUnits,
        is_bitfield: bool,
        field_i: usize,
    ) {
        if field_offset <= unpadded_field_offset {
            return;
        }

        let flags = self.diagnostics.flags();

        let kind = if is_bitfield {
            if !flags.warn_padded_bitfield {
                return;
            }
            "bitfield"
        } else {
            if !flags.warn_padded_field {
                return;
            }
            "field"
        };

        self.diagnostics.push(WarningDiagnostic::new(
            format!(
                "Padded {} of '{}' at index {}",
                kind, self.friendly_record_name, field_i,
            ),
            Subject::member(self.friendly_record_name, self.info.field_name(field_i)),
        ));
    }
}
