use core::fmt::Debug;

/// A trait for index types used in arenas.
///
/// An [`Id`] is both the position of a value inside an [`Arena`](crate::Arena)
/// and a type-level distinction between arenas that share a numeric index type.
pub trait Id: Copy + Ord + Debug {
    /// The maximum value (as a usize) this id type can represent.
    const MAX: usize;

    /// Converts a `usize` value to this id type.
    fn from_usize(idx: usize) -> Self;

    /// Converts this id type into a `usize`.
    fn into_usize(self) -> usize;
}
