#![no_std]

/*
    =======================  support/arena/src/lib.rs  ========================
    A small typed-id arena for graph nodes that refer to each other by id
    ---------------------------------------------------------------------------
*/

mod arena;
mod id;
mod impl_id;
mod new_id;

extern crate alloc;

pub use arena::{Arena, Iter};
pub use id::Id;
pub use new_id::NewId;
