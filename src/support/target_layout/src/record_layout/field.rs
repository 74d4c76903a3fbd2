use super::RecordInfo;
use crate::{TypeLayout, TypeLayoutCache};
use primitives::Primitive;
use type_graph::{Bitfield, DefinitionError, Field, LayoutError, Type};

/// How a single field takes part in its record's layout.
#[derive(Debug)]
pub enum FieldPlacement<'g> {
    /// `T : 0;`, occupies no storage
    ZeroWidth(&'g Primitive),
    Bitfield(&'g Bitfield),
    Bytes(TypeLayout),
}

/// Resolves the layout of a field's type and rejects fields that cannot be placed.
pub fn classify_field<'g>(
    cache: &TypeLayoutCache,
    info: &RecordInfo,
    index: usize,
    field: &'g Field,
) -> Result<FieldPlacement<'g>, LayoutError> {
    if let Type::Bitfield(bitfield) = &field.ty {
        return classify_bitfield(info, index, field, bitfield);
    }

    check_array_elements(cache, info, index, &field.ty)?;

    let layout = member_layout(cache, info, index, &field.ty)?;

    if info.is_union() {
        if layout.completeness.is_incomplete() {
            return Err(DefinitionError::FlexibleArrayInUnion {
                record: info.name.into(),
                field: info.field_name(index),
            }
            .into());
        }
    } else if layout.is_trailing_only() && !info.is_last_field(index) {
        return Err(DefinitionError::IncompleteNotTrailing {
            record: info.name.into(),
            field: info.field_name(index),
        }
        .into());
    }

    Ok(FieldPlacement::Bytes(layout))
}

fn classify_bitfield<'g>(
    info: &RecordInfo,
    index: usize,
    field: &Field,
    bitfield: &'g Bitfield,
) -> Result<FieldPlacement<'g>, LayoutError> {
    let underlying = &bitfield.underlying;

    if !underlying.is_integer() {
        return Err(DefinitionError::NonIntegerBitfield {
            record: info.name.into(),
            field: info.field_name(index),
            underlying: underlying.to_string(),
        }
        .into());
    }

    if bitfield.is_unnamed_zero && bitfield.width != 0 {
        return Err(DefinitionError::MisdeclaredZeroWidthBitfield {
            record: info.name.into(),
            field: info.field_name(index),
            width: bitfield.width,
        }
        .into());
    }

    if bitfield.width == 0 {
        if field.name.is_some() {
            return Err(DefinitionError::NamedZeroWidthBitfield {
                record: info.name.into(),
                field: info.field_name(index),
            }
            .into());
        }

        return Ok(FieldPlacement::ZeroWidth(underlying));
    }

    let max = underlying.bits().bits();

    if bitfield.width > max {
        return Err(DefinitionError::BitfieldTooWide {
            record: info.name.into(),
            field: info.field_name(index),
            underlying: underlying.to_string(),
            width: bitfield.width,
            max,
        }
        .into());
    }

    Ok(FieldPlacement::Bitfield(bitfield))
}

fn check_array_elements(
    cache: &TypeLayoutCache,
    info: &RecordInfo,
    index: usize,
    ty: &Type,
) -> Result<(), LayoutError> {
    let mut ty = ty;

    while let Type::Array(array) = ty {
        let element = member_layout(cache, info, index, &array.element)?;

        if element.is_trailing_only() {
            return Err(DefinitionError::IncompleteElement {
                record: info.name.into(),
                field: info.field_name(index),
            }
            .into());
        }

        ty = &array.element;
    }

    Ok(())
}

/// Resolves the type of a member, telling apart records it depends on that
/// failed and a member type that is itself too large.
fn member_layout(
    cache: &TypeLayoutCache,
    info: &RecordInfo,
    index: usize,
    ty: &Type,
) -> Result<TypeLayout, LayoutError> {
    cache.get(ty).map_err(|cause| match cause {
        LayoutError::Definition(DefinitionError::TypeTooLarge { .. }) => {
            too_large(info, info.field_name(index))
        }
        cause => failed_dependency(cache, info, ty, cause),
    })
}

pub fn too_large(info: &RecordInfo, member: String) -> LayoutError {
    DefinitionError::RecordTooLarge {
        record: info.name.into(),
        field: member,
    }
    .into()
}

pub fn failed_dependency(
    cache: &TypeLayoutCache,
    info: &RecordInfo,
    dependency: &Type,
    cause: LayoutError,
) -> LayoutError {
    DefinitionError::FailedDependency {
        record: info.name.into(),
        dependency: cache.graph.type_name(dependency),
        cause: Box::new(cause),
    }
    .into()
}
