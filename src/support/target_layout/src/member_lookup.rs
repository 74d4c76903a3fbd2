use crate::{MemberExtent, MemberRef, TypeLayoutCache};
use data_units::BitUnits;
use type_graph::{LayoutError, RecordId, Type};

/// Where a named member lives inside an outer record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MemberLocation {
    /// Members crossed to reach it, starting from the outer record
    pub path: Vec<MemberRef>,
    pub bit_offset: BitUnits,
    pub bit_length: MemberExtent,
    pub ty: Type,
}

impl TypeLayoutCache<'_> {
    /// Looks up a member by name the way C name lookup sees it.
    ///
    /// Members of anonymous structs and unions belong to the enclosing
    /// record, and bases are searched after the record's own fields.
    /// Offsets are relative to the start of `record`.
    pub fn find_member(
        &self,
        record: RecordId,
        name: &str,
    ) -> Result<Option<MemberLocation>, LayoutError> {
        let mut path = Vec::new();
        self.find_member_in(record, name, BitUnits::ZERO, &mut path)
    }

    fn find_member_in(
        &self,
        record: RecordId,
        name: &str,
        start: BitUnits,
        path: &mut Vec<MemberRef>,
    ) -> Result<Option<MemberLocation>, LayoutError> {
        let record_layout = self.record(record)?;
        let definition = self.graph.record(record);

        for (field_i, field) in definition.fields.iter().enumerate() {
            // Zero-width bitfields have no layout
            let Some(member) = record_layout.field(field_i) else {
                continue;
            };

            path.push(member.member);

            if field.name.as_deref() == Some(name) {
                return Ok(Some(MemberLocation {
                    path: path.clone(),
                    bit_offset: start + member.bit_offset,
                    bit_length: member.bit_length,
                    ty: field.ty.clone(),
                }));
            }

            if let Some(inner) = field.ty.as_record().filter(|_| field.is_anonymous) {
                if let Some(found) =
                    self.find_member_in(inner, name, start + member.bit_offset, path)?
                {
                    return Ok(Some(found));
                }
            }

            path.pop();
        }

        for (base_i, base) in definition.bases.iter().enumerate() {
            let Some(member) = record_layout.base(base_i) else {
                continue;
            };

            path.push(member.member);

            if let Some(found) =
                self.find_member_in(base.record, name, start + member.bit_offset, path)?
            {
                return Ok(Some(found));
            }

            path.pop();
        }

        Ok(None)
    }
}
