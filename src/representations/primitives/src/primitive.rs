use crate::Encoding;
use data_units::{BitUnits, ByteUnits};
use std::{fmt::Display, sync::Arc};

/// A base type with its size, alignment and encoding already resolved by
/// the ABI profile it came from.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Primitive {
    pub name: Arc<str>,
    pub size: ByteUnits,
    pub alignment: ByteUnits,
    pub encoding: Encoding,
}

impl Primitive {
    pub fn new(
        name: impl Into<Arc<str>>,
        size: ByteUnits,
        alignment: ByteUnits,
        encoding: Encoding,
    ) -> Self {
        Self {
            name: name.into(),
            size,
            alignment,
            encoding,
        }
    }

    pub fn bits(&self) -> BitUnits {
        self.size.to_bits()
    }

    pub fn is_integer(&self) -> bool {
        self.encoding.is_integer()
    }
}

impl Display for Primitive {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}

#[test]
fn test_char_encodings_are_integers() {
    assert!(Encoding::SignedChar.is_integer());
    assert!(Encoding::Boolean.is_integer());
    assert!(!Encoding::Float.is_integer());
    assert_eq!(Encoding::UnsignedChar.to_string(), "unsigned char");
}
