mod bitfield_policy;
mod error;

pub use bitfield_policy::BitfieldPolicy;
pub use error::ProfileError;
use data_units::ByteUnits;
use indexmap::IndexMap;
use primitives::{Encoding, Primitive};
use std::{fmt::Display, sync::Arc};

/// One row of a base type table, as handed over by a front end.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BaseTypeRow<'a> {
    pub name: &'a str,
    pub size: u64,
    pub alignment: u64,
    pub encoding: Encoding,
}

impl<'a> BaseTypeRow<'a> {
    pub const fn new(name: &'a str, size: u64, alignment: u64, encoding: Encoding) -> Self {
        Self {
            name,
            size,
            alignment,
            encoding,
        }
    }

    fn to_primitive(self) -> Primitive {
        Primitive::new(
            self.name,
            ByteUnits::of(self.size),
            ByteUnits::of(self.alignment),
            self.encoding,
        )
    }
}

/// Base types of the LP64 (GCC x86-64) data model, named the way DWARF
/// producers name them.
pub const LP64_BASE_TYPES: &[BaseTypeRow<'static>] = &[
    BaseTypeRow::new("bool", 1, 1, Encoding::Boolean),
    BaseTypeRow::new("char", 1, 1, Encoding::SignedChar),
    BaseTypeRow::new("signed char", 1, 1, Encoding::SignedChar),
    BaseTypeRow::new("unsigned char", 1, 1, Encoding::UnsignedChar),
    BaseTypeRow::new("short int", 2, 2, Encoding::Signed),
    BaseTypeRow::new("short unsigned int", 2, 2, Encoding::Unsigned),
    BaseTypeRow::new("int", 4, 4, Encoding::Signed),
    BaseTypeRow::new("unsigned int", 4, 4, Encoding::Unsigned),
    BaseTypeRow::new("long int", 8, 8, Encoding::Signed),
    BaseTypeRow::new("long unsigned int", 8, 8, Encoding::Unsigned),
    BaseTypeRow::new("long long int", 8, 8, Encoding::Signed),
    BaseTypeRow::new("long long unsigned int", 8, 8, Encoding::Unsigned),
    BaseTypeRow::new("sizetype", 8, 8, Encoding::Unsigned),
    BaseTypeRow::new("float", 4, 4, Encoding::Float),
    BaseTypeRow::new("double", 8, 8, Encoding::Float),
];

/// The ABI a layout session computes against.
///
/// Nothing about base types is hard-coded in the engine: every scalar size,
/// alignment and encoding comes from this table.
#[derive(Clone, Debug)]
pub struct AbiProfile {
    name: Arc<str>,
    base_types: IndexMap<Arc<str>, Primitive>,
    pub pointer_size: ByteUnits,
    pub pointer_alignment: ByteUnits,
    pub bitfield_policy: BitfieldPolicy,
    pub allow_multiple_inheritance: bool,
    pub empty_record_size: ByteUnits,
}

impl AbiProfile {
    fn new(name: Arc<str>, pointer_size: ByteUnits) -> Self {
        Self {
            name,
            base_types: IndexMap::new(),
            pointer_size,
            pointer_alignment: pointer_size,
            bitfield_policy: BitfieldPolicy::default(),
            allow_multiple_inheritance: false,
            empty_record_size: ByteUnits::of(1),
        }
    }

    /// Builds a profile from a base type table supplied by a front end.
    ///
    /// Later rows replace earlier rows of the same name.
    pub fn from_table(
        name: impl Into<Arc<str>>,
        pointer_size: ByteUnits,
        rows: &[BaseTypeRow],
    ) -> Result<Self, ProfileError> {
        let name = name.into();

        if !pointer_size.is_power_of_2() || pointer_size.checked_to_bits().is_none() {
            return Err(ProfileError::PointerSize {
                profile: name.to_string(),
                size: pointer_size.bytes(),
            });
        }

        rows.iter()
            .try_fold(Self::new(name, pointer_size), |profile, row| {
                profile.with_base_type(row.to_primitive())
            })
    }

    pub fn lp64() -> Self {
        // Table validity is covered by test_lp64_table_is_valid
        LP64_BASE_TYPES
            .iter()
            .fold(Self::new("lp64".into(), ByteUnits::of(8)), |mut profile, row| {
                profile.insert_base_type(row.to_primitive());
                profile
            })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Adds a base type, replacing any previous entry with the same name.
    pub fn with_base_type(mut self, primitive: Primitive) -> Result<Self, ProfileError> {
        if !primitive.alignment.is_power_of_2() {
            return Err(ProfileError::BaseTypeAlignment {
                name: primitive.name.to_string(),
                alignment: primitive.alignment.bytes(),
            });
        }

        if primitive.size.checked_to_bits().is_none() {
            return Err(ProfileError::BaseTypeTooLarge {
                name: primitive.name.to_string(),
                size: primitive.size.bytes(),
            });
        }

        if !(primitive.size % primitive.alignment).is_zero() {
            return Err(ProfileError::BaseTypeSize {
                name: primitive.name.to_string(),
                size: primitive.size.bytes(),
                alignment: primitive.alignment.bytes(),
            });
        }

        self.insert_base_type(primitive);
        Ok(self)
    }

    fn insert_base_type(&mut self, primitive: Primitive) {
        self.base_types.insert(primitive.name.clone(), primitive);
    }

    pub fn with_bitfield_policy(mut self, policy: BitfieldPolicy) -> Self {
        self.bitfield_policy = policy;
        self
    }

    pub fn with_multiple_inheritance(mut self, allow: bool) -> Self {
        self.allow_multiple_inheritance = allow;
        self
    }

    pub fn base_type(&self, name: &str) -> Option<&Primitive> {
        self.base_types.get(name)
    }

    /// Base types in table order
    pub fn base_types(&self) -> impl Iterator<Item = &Primitive> {
        self.base_types.values()
    }
}

impl Default for AbiProfile {
    fn default() -> Self {
        Self::lp64()
    }
}

impl Display for AbiProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} ({}-byte pointers, {} base types)",
            self.name,
            self.pointer_size,
            self.base_types.len()
        )
    }
}

#[test]
fn test_lp64_matches_scalar_alignment_equals_size() {
    let profile = AbiProfile::lp64();

    for base_type in profile.base_types() {
        assert_eq!(base_type.size, base_type.alignment, "{}", base_type.name);
    }

    let long = profile.base_type("long int").unwrap();
    assert_eq!(long.size, ByteUnits::of(8));
    assert_eq!(long.encoding, Encoding::Signed);
    assert_eq!(profile.pointer_size, ByteUnits::of(8));
}

#[test]
fn test_from_table_replaces_duplicates() {
    let profile = AbiProfile::from_table(
        "llp64",
        ByteUnits::of(8),
        &[
            BaseTypeRow::new("long int", 8, 8, Encoding::Signed),
            BaseTypeRow::new("long int", 4, 4, Encoding::Signed),
        ],
    )
    .unwrap();

    assert_eq!(profile.base_types().count(), 1);
    assert_eq!(profile.base_type("long int").unwrap().size, ByteUnits::of(4));
    assert!(profile.base_type("short int").is_none());
}

#[test]
fn test_defaults_reject_multiple_inheritance() {
    let profile = AbiProfile::default();

    assert!(!profile.allow_multiple_inheritance);
    assert!(profile.bitfield_policy.is_itanium());
    assert!(AbiProfile::lp64().with_multiple_inheritance(true).allow_multiple_inheritance);
}

#[test]
fn test_lp64_table_is_valid() {
    let checked = AbiProfile::from_table("lp64", ByteUnits::of(8), LP64_BASE_TYPES).unwrap();
    let lp64 = AbiProfile::lp64();

    assert!(checked.base_types().eq(lp64.base_types()));
}

#[test]
fn test_from_table_rejects_malformed_rows() {
    let odd_alignment = AbiProfile::from_table(
        "odd",
        ByteUnits::of(8),
        &[BaseTypeRow::new("long double", 12, 3, Encoding::Float)],
    );
    assert_eq!(
        odd_alignment.unwrap_err(),
        ProfileError::BaseTypeAlignment {
            name: "long double".into(),
            alignment: 3,
        }
    );

    let ragged = AbiProfile::from_table(
        "ragged",
        ByteUnits::of(8),
        &[BaseTypeRow::new("int", 6, 4, Encoding::Signed)],
    );
    assert!(matches!(ragged, Err(ProfileError::BaseTypeSize { .. })));

    let huge = AbiProfile::from_table(
        "huge",
        ByteUnits::of(8),
        &[BaseTypeRow::new("int", 1 << 62, 1, Encoding::Signed)],
    );
    assert!(matches!(huge, Err(ProfileError::BaseTypeTooLarge { .. })));

    let pointers = AbiProfile::from_table("segmented", ByteUnits::of(6), &[]);
    assert!(matches!(pointers, Err(ProfileError::PointerSize { .. })));
}
