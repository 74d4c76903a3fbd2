use crate::{Record, RecordId, Type};
use arena::Arena;
use data_units::ByteUnits;
use std::fmt::Display;

/// What the graph alone knows about the size of a type.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Intrinsic {
    Known {
        size: ByteUnits,
        alignment: ByteUnits,
    },
    /// Contains a record by value, so only a layout engine can size it
    RecordDependent,
    /// An array of unknown length (or of elements that are)
    Incomplete,
    /// An array whose size in bits does not fit in 64 bits
    TooLarge,
}

/// An immutable, acyclic set of records and the types that refer to them.
///
/// Built once through [`TypeGraphBuilder`](crate::TypeGraphBuilder) and never
/// mutated afterwards.
#[derive(Debug)]
pub struct TypeGraph {
    records: Arena<RecordId, Record>,
    pointer_size: ByteUnits,
    pointer_alignment: ByteUnits,
}

impl TypeGraph {
    pub(crate) fn new(
        records: Arena<RecordId, Record>,
        pointer_size: ByteUnits,
        pointer_alignment: ByteUnits,
    ) -> Self {
        Self {
            records,
            pointer_size,
            pointer_alignment,
        }
    }

    pub fn record(&self, record: RecordId) -> &Record {
        &self.records[record]
    }

    pub fn records(&self) -> impl Iterator<Item = (RecordId, &Record)> {
        self.records.iter()
    }

    pub fn intrinsic(&self, ty: &Type) -> Intrinsic {
        match ty {
            Type::Primitive(primitive) => Intrinsic::Known {
                size: primitive.size,
                alignment: primitive.alignment,
            },
            Type::Bitfield(bitfield) => Intrinsic::Known {
                size: bitfield.underlying.size,
                alignment: bitfield.underlying.alignment,
            },
            Type::Pointer(_) => Intrinsic::Known {
                size: self.pointer_size,
                alignment: self.pointer_alignment,
            },
            Type::Record(_) => Intrinsic::RecordDependent,
            Type::Array(array) => {
                let Some(count) = array.count else {
                    return Intrinsic::Incomplete;
                };

                match self.intrinsic(&array.element) {
                    Intrinsic::Known { size, alignment } => size
                        .checked_mul(count)
                        .filter(|size| size.checked_to_bits().is_some())
                        .map_or(Intrinsic::TooLarge, |size| Intrinsic::Known { size, alignment }),
                    other => other,
                }
            }
        }
    }

    /// Human readable name of a type, as reports print it
    pub fn type_name(&self, ty: &Type) -> String {
        TypeName { graph: self, ty }.to_string()
    }
}

struct TypeName<'g> {
    graph: &'g TypeGraph,
    ty: &'g Type,
}

impl Display for TypeName<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let graph = self.graph;

        match self.ty {
            Type::Primitive(primitive) => write!(f, "{}", primitive),
            Type::Bitfield(bitfield) => write!(f, "{}", bitfield.underlying),
            Type::Pointer(pointer) => match &pointer.pointee {
                Some(pointee) => write!(f, "* {}", TypeName { graph, ty: pointee }),
                None => f.write_str("* void"),
            },
            Type::Array(array) => {
                let element = TypeName {
                    graph,
                    ty: &array.element,
                };

                match array.count {
                    Some(count) => write!(f, "[{}; {}]", element, count),
                    None => write!(f, "[{}]", element),
                }
            }
            Type::Record(record) => {
                let record = graph.record(*record);
                write!(f, "{} {}", record.kind, record.display_name())
            }
        }
    }
}
