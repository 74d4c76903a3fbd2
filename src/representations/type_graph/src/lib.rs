mod builder;
mod cycle;
mod error;
mod graph;
mod record;
mod ty;

pub use builder::TypeGraphBuilder;
pub use error::{DefinitionError, LayoutError, UnsupportedConstruct};
pub use graph::{Intrinsic, TypeGraph};
pub use record::{Base, Field, Record, RecordId, RecordKind};
pub use ty::{Array, Bitfield, Pointer, Type};
