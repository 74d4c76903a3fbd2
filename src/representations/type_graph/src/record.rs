use crate::Type;
use derive_more::IsVariant;
use std::fmt::Display;

arena::new_id!(RecordId, u32);

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, IsVariant)]
pub enum RecordKind {
    Struct,
    Union,
}

impl Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Struct => "struct",
            Self::Union => "union",
        })
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Base {
    pub record: RecordId,
    pub is_virtual: bool,
}

impl Base {
    pub fn new(record: RecordId) -> Self {
        Self {
            record,
            is_virtual: false,
        }
    }

    pub fn virtual_base(record: RecordId) -> Self {
        Self {
            record,
            is_virtual: true,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Field {
    pub name: Option<String>,
    pub ty: Type,
    pub is_anonymous: bool,
}

impl Field {
    pub fn named(name: impl ToString, ty: Type) -> Self {
        Self {
            name: Some(name.to_string()),
            ty,
            is_anonymous: false,
        }
    }

    /// An unnamed field that still takes up space, e.g. `int : 3;`
    pub fn unnamed(ty: Type) -> Self {
        Self {
            name: None,
            ty,
            is_anonymous: false,
        }
    }

    /// An anonymous struct or union whose members belong to the parent
    pub fn anonymous(ty: Type) -> Self {
        Self {
            name: None,
            ty,
            is_anonymous: true,
        }
    }

    pub fn display_name(&self, index: usize) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => format!("#{}", index),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Record {
    pub name: Option<String>,
    pub kind: RecordKind,
    pub bases: Vec<Base>,
    pub fields: Vec<Field>,
}

impl Record {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("<anon>")
    }

    pub fn is_union(&self) -> bool {
        self.kind.is_union()
    }
}
