use derive_more::IsVariant;
use std::fmt::Display;

/// How the bits of a base type are interpreted.
///
/// Layout only cares whether an encoding is an integer (bitfields may only
/// be declared over integers), the character variants exist so reports can
/// name them the way debug info does.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, IsVariant)]
pub enum Encoding {
    Signed,
    Unsigned,
    SignedChar,
    UnsignedChar,
    Boolean,
    Float,
}

impl Encoding {
    pub fn is_integer(self) -> bool {
        !self.is_float()
    }
}

impl Display for Encoding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Signed => "signed",
            Self::Unsigned => "unsigned",
            Self::SignedChar => "signed char",
            Self::UnsignedChar => "unsigned char",
            Self::Boolean => "boolean",
            Self::Float => "float",
        })
    }
}
