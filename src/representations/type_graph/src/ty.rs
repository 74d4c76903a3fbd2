use crate::RecordId;
use derive_more::IsVariant;
use primitives::Primitive;

#[derive(Clone, Debug, PartialEq, Eq, Hash, IsVariant)]
pub enum Type {
    Primitive(Primitive),
    Pointer(Pointer),
    Array(Box<Array>),
    Bitfield(Bitfield),
    Record(RecordId),
}

impl Type {
    pub fn pointer_to(pointee: Type) -> Self {
        Self::Pointer(Pointer {
            pointee: Some(Box::new(pointee)),
        })
    }

    pub fn void_pointer() -> Self {
        Self::Pointer(Pointer { pointee: None })
    }

    pub fn array(element: Type, count: u64) -> Self {
        Self::Array(Box::new(Array {
            element,
            count: Some(count),
        }))
    }

    /// An array of unknown length, only valid as a trailing member
    pub fn incomplete_array(element: Type) -> Self {
        Self::Array(Box::new(Array {
            element,
            count: None,
        }))
    }

    pub fn as_record(&self) -> Option<RecordId> {
        match self {
            Self::Record(record) => Some(*record),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Pointer {
    pub pointee: Option<Box<Type>>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Array {
    pub element: Type,
    pub count: Option<u64>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Bitfield {
    pub underlying: Primitive,
    pub width: u64,
    pub is_unnamed_zero: bool,
}

impl Bitfield {
    pub fn new(underlying: Primitive, width: u64) -> Self {
        Self {
            underlying,
            width,
            is_unnamed_zero: false,
        }
    }

    /// The `T : 0;` form that ends the current storage unit
    pub fn unnamed_zero(underlying: Primitive) -> Self {
        Self {
            underlying,
            width: 0,
            is_unnamed_zero: true,
        }
    }
}
