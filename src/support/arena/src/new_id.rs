use crate::Id;

pub trait NewId: Id {}

/// Declares a newtype id usable as an arena key.
///
/// ```
/// arena::new_id!(ShapeId, u32);
///
/// let mut shapes = arena::Arena::<ShapeId, &str>::new();
/// let circle = shapes.alloc("circle");
/// assert_eq!(shapes[circle], "circle");
/// ```
#[macro_export]
macro_rules! new_id {
    ($name: ident, $ty: ty) => {
        #[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name($ty);

        impl ::arena::Id for $name {
            const MAX: usize = <$ty>::MAX as usize;

            #[inline]
            fn from_usize(idx: usize) -> Self {
                assert!(idx <= <Self as ::arena::Id>::MAX, "arena id overflowed");
                Self(idx as $ty)
            }

            #[inline]
            fn into_usize(self) -> usize {
                self.0 as usize
            }
        }

        impl ::arena::NewId for $name {}
    };
}
