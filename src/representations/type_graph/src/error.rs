use itertools::Itertools;
use thiserror::Error;

/// A record that can never have a well-defined layout.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DefinitionError {
    #[error("Unknown base type `{name}`")]
    UnknownBaseType { name: String },
    #[error("Record `{record}` is declared but never defined")]
    UndefinedRecord { record: String },
    #[error("Record `{record}` is defined more than once")]
    RedefinedRecord { record: String },
    #[error("Anonymous member `{field}` of `{record}` must be an unnamed struct or union")]
    MalformedAnonymousField { record: String, field: String },
    #[error("Record `{record}` cannot inherit from union `{base}`")]
    UnionBase { record: String, base: String },
    #[error("Union `{record}` cannot have base classes")]
    UnionWithBases { record: String },
    #[error("Record `{record}` contains itself by value ({})", .path.iter().join(" -> "))]
    ValueCycle { record: String, path: Vec<String> },
    #[error(
        "Bitfield `{field}` of `{record}` is {width} bits wide, but `{underlying}` only holds {max} bits"
    )]
    BitfieldTooWide {
        record: String,
        field: String,
        underlying: String,
        width: u64,
        max: u64,
    },
    #[error("Bitfield `{field}` of `{record}` has zero width but is named")]
    NamedZeroWidthBitfield { record: String, field: String },
    #[error("Bitfield `{field}` of `{record}` has width {width} but is marked as an unnamed zero-width bitfield")]
    MisdeclaredZeroWidthBitfield {
        record: String,
        field: String,
        width: u64,
    },
    #[error("Bitfield `{field}` of `{record}` is declared over non-integer type `{underlying}`")]
    NonIntegerBitfield {
        record: String,
        field: String,
        underlying: String,
    },
    #[error("Member `{field}` of `{record}` has incomplete type but is not the trailing member")]
    IncompleteNotTrailing { record: String, field: String },
    #[error("Union `{record}` cannot have flexible array member `{field}`")]
    FlexibleArrayInUnion { record: String, field: String },
    #[error("Member `{field}` of `{record}` is an array of incomplete elements")]
    IncompleteElement { record: String, field: String },
    #[error("Type `{ty}` is too large to lay out")]
    TypeTooLarge { ty: String },
    #[error("Member `{field}` of `{record}` would end past the largest representable offset")]
    RecordTooLarge { record: String, field: String },
    #[error("Record `{record}` depends on `{dependency}`, which has no valid layout: {cause}")]
    FailedDependency {
        record: String,
        dependency: String,
        cause: Box<LayoutError>,
    },
}

/// A construct the layout model deliberately does not compute.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum UnsupportedConstruct {
    #[error("Record `{record}` has virtual base `{base}`, virtual inheritance is not supported")]
    VirtualBase { record: String, base: String },
    #[error("Record `{record}` has {count} non-empty bases, but the ABI profile `{profile}` only allows single inheritance")]
    MultipleInheritance {
        record: String,
        count: usize,
        profile: String,
    },
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum LayoutError {
    #[error(transparent)]
    Definition(#[from] DefinitionError),
    #[error(transparent)]
    Unsupported(#[from] UnsupportedConstruct),
}

impl LayoutError {
    /// Follows failed dependencies down to the error that started it
    pub fn root_cause(&self) -> &LayoutError {
        match self {
            Self::Definition(DefinitionError::FailedDependency { cause, .. }) => cause.root_cause(),
            _ => self,
        }
    }

    pub fn is_dependency_failure(&self) -> bool {
        matches!(
            self,
            Self::Definition(DefinitionError::FailedDependency { .. })
        )
    }
}
