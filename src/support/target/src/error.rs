use thiserror::Error;

/// A base type table that cannot describe a real ABI.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ProfileError {
    #[error("Alignment of base type `{name}` is {alignment}, which is not a power of two")]
    BaseTypeAlignment { name: String, alignment: u64 },
    #[error("Size of base type `{name}` is {size}, which is not a multiple of its alignment {alignment}")]
    BaseTypeSize {
        name: String,
        size: u64,
        alignment: u64,
    },
    #[error("Size of base type `{name}` is {size}, which does not fit in a 64-bit count of bits")]
    BaseTypeTooLarge { name: String, size: u64 },
    #[error("Pointer size of profile `{profile}` is {size}, which is not a power of two that fits in 64 bits")]
    PointerSize { profile: String, size: u64 },
}
