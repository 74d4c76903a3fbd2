use data_units::ByteUnits;
use derive_more::IsVariant;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, IsVariant)]
pub enum Completeness {
    #[default]
    Complete,
    /// A record ending in a flexible array member
    FlexibleTail,
    /// An array of unknown length, or of elements that cannot be sized
    Incomplete,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TypeLayout {
    pub width: ByteUnits,
    pub alignment: ByteUnits,
    pub completeness: Completeness,
}

impl TypeLayout {
    pub fn new(width: ByteUnits, alignment: ByteUnits) -> Self {
        Self {
            width,
            alignment,
            completeness: Completeness::Complete,
        }
    }

    pub fn basic(size: ByteUnits) -> Self {
        Self::new(size, size)
    }

    pub fn incomplete(alignment: ByteUnits) -> Self {
        Self {
            width: ByteUnits::ZERO,
            alignment,
            completeness: Completeness::Incomplete,
        }
    }

    /// Whether this type can only appear as the last member of a record
    pub fn is_trailing_only(&self) -> bool {
        !self.completeness.is_complete()
    }
}
