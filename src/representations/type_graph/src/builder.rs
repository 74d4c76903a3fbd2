use crate::{
    Base, Bitfield, DefinitionError, Field, Record, RecordId, RecordKind, Type, TypeGraph,
    cycle::check_value_cycles,
};
use arena::Arena;
use primitives::Primitive;
use target::AbiProfile;

#[derive(Debug)]
struct PendingRecord {
    name: Option<String>,
    kind: RecordKind,
    body: Option<(Vec<Base>, Vec<Field>)>,
}

impl PendingRecord {
    fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("<anon>")
    }
}

/// Assembles a [`TypeGraph`] for one ABI profile.
///
/// Records are declared first and defined later, so forward references and
/// pointer cycles can be expressed. Everything is checked once in
/// [`TypeGraphBuilder::build`].
#[derive(Debug)]
pub struct TypeGraphBuilder<'p> {
    profile: &'p AbiProfile,
    records: Arena<RecordId, PendingRecord>,
}

impl<'p> TypeGraphBuilder<'p> {
    pub fn new(profile: &'p AbiProfile) -> Self {
        Self {
            profile,
            records: Arena::new(),
        }
    }

    pub fn profile(&self) -> &'p AbiProfile {
        self.profile
    }

    pub fn base_type(&self, name: &str) -> Result<Primitive, DefinitionError> {
        self.profile
            .base_type(name)
            .cloned()
            .ok_or_else(|| DefinitionError::UnknownBaseType {
                name: name.to_string(),
            })
    }

    pub fn primitive(&self, name: &str) -> Result<Type, DefinitionError> {
        self.base_type(name).map(Type::Primitive)
    }

    pub fn bitfield(&self, name: &str, width: u64) -> Result<Type, DefinitionError> {
        Ok(Type::Bitfield(Bitfield::new(self.base_type(name)?, width)))
    }

    pub fn zero_width_bitfield(&self, name: &str) -> Result<Type, DefinitionError> {
        Ok(Type::Bitfield(Bitfield::unnamed_zero(self.base_type(name)?)))
    }

    pub fn declare(&mut self, kind: RecordKind, name: Option<&str>) -> RecordId {
        self.records.alloc(PendingRecord {
            name: name.map(str::to_string),
            kind,
            body: None,
        })
    }

    pub fn define(
        &mut self,
        record: RecordId,
        bases: Vec<Base>,
        fields: Vec<Field>,
    ) -> Result<(), DefinitionError> {
        let Some(pending) = self.records.get_mut(record) else {
            return Err(unknown_record(record));
        };

        if pending.body.is_some() {
            return Err(DefinitionError::RedefinedRecord {
                record: pending.display_name().to_string(),
            });
        }

        pending.body = Some((bases, fields));
        Ok(())
    }

    /// Declares and defines a record in one step
    pub fn record(
        &mut self,
        kind: RecordKind,
        name: Option<&str>,
        bases: Vec<Base>,
        fields: Vec<Field>,
    ) -> RecordId {
        let record = self.declare(kind, name);
        self.records[record].body = Some((bases, fields));
        record
    }

    pub fn structure(&mut self, name: &str, bases: Vec<Base>, fields: Vec<Field>) -> RecordId {
        self.record(RecordKind::Struct, Some(name), bases, fields)
    }

    pub fn union(&mut self, name: Option<&str>, fields: Vec<Field>) -> RecordId {
        self.record(RecordKind::Union, name, vec![], fields)
    }

    pub fn build(self) -> Result<TypeGraph, DefinitionError> {
        let records = self.records.try_map(|_, pending| {
            let Some((bases, fields)) = pending.body else {
                return Err(DefinitionError::UndefinedRecord {
                    record: pending.display_name().to_string(),
                });
            };

            Ok(Record {
                name: pending.name,
                kind: pending.kind,
                bases,
                fields,
            })
        })?;

        for (_, record) in records.iter() {
            if record.is_union() && !record.bases.is_empty() {
                return Err(DefinitionError::UnionWithBases {
                    record: record.display_name().to_string(),
                });
            }

            for base in record.bases.iter() {
                let Some(base_record) = records.get(base.record) else {
                    return Err(unknown_record(base.record));
                };

                if base_record.is_union() {
                    return Err(DefinitionError::UnionBase {
                        record: record.display_name().to_string(),
                        base: base_record.display_name().to_string(),
                    });
                }
            }

            for (index, field) in record.fields.iter().enumerate() {
                check_references(&records, &field.ty)?;

                if field.is_anonymous && (field.name.is_some() || !field.ty.is_record()) {
                    return Err(DefinitionError::MalformedAnonymousField {
                        record: record.display_name().to_string(),
                        field: field.display_name(index),
                    });
                }
            }
        }

        check_value_cycles(&records)?;

        Ok(TypeGraph::new(
            records,
            self.profile.pointer_size,
            self.profile.pointer_alignment,
        ))
    }
}

fn check_references(records: &Arena<RecordId, Record>, ty: &Type) -> Result<(), DefinitionError> {
    match ty {
        Type::Primitive(_) | Type::Bitfield(_) => Ok(()),
        Type::Pointer(pointer) => pointer
            .pointee
            .as_deref()
            .map_or(Ok(()), |pointee| check_references(records, pointee)),
        Type::Array(array) => check_references(records, &array.element),
        Type::Record(record) if records.contains_key(*record) => Ok(()),
        Type::Record(record) => Err(unknown_record(*record)),
    }
}

fn unknown_record(record: RecordId) -> DefinitionError {
    DefinitionError::UndefinedRecord {
        record: format!("#{:?}", record),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_cycle_is_rejected() {
        let profile = AbiProfile::lp64();
        let mut builder = TypeGraphBuilder::new(&profile);

        let a = builder.declare(RecordKind::Struct, Some("A"));
        let b = builder.declare(RecordKind::Struct, Some("B"));
        builder
            .define(a, vec![], vec![Field::named("b", Type::Record(b))])
            .unwrap();
        builder
            .define(b, vec![], vec![Field::named("a", Type::array(Type::Record(a), 2))])
            .unwrap();

        let Err(DefinitionError::ValueCycle { record, path }) = builder.build() else {
            panic!("expected a value cycle");
        };

        assert_eq!(record, "A");
        assert_eq!(path, vec!["A", "B", "A"]);
    }

    #[test]
    fn test_pointer_cycle_is_allowed() {
        let profile = AbiProfile::lp64();
        let mut builder = TypeGraphBuilder::new(&profile);

        let node = builder.declare(RecordKind::Struct, Some("Node"));
        let value = builder.primitive("int").unwrap();
        builder
            .define(
                node,
                vec![],
                vec![
                    Field::named("value", value),
                    Field::named("next", Type::pointer_to(Type::Record(node))),
                ],
            )
            .unwrap();

        let graph = builder.build().unwrap();
        assert_eq!(graph.record(node).fields.len(), 2);
        assert_eq!(
            graph.type_name(&graph.record(node).fields[1].ty),
            "* struct Node"
        );
    }

    #[test]
    fn test_self_inheritance_is_a_cycle() {
        let profile = AbiProfile::lp64();
        let mut builder = TypeGraphBuilder::new(&profile);

        let s = builder.declare(RecordKind::Struct, Some("S"));
        builder.define(s, vec![Base::new(s)], vec![]).unwrap();

        assert!(matches!(
            builder.build(),
            Err(DefinitionError::ValueCycle { .. })
        ));
    }

    #[test]
    fn test_undefined_and_redefined_records() {
        let profile = AbiProfile::lp64();

        let mut builder = TypeGraphBuilder::new(&profile);
        builder.declare(RecordKind::Struct, Some("Forward"));
        assert_eq!(
            builder.build().unwrap_err(),
            DefinitionError::UndefinedRecord {
                record: "Forward".into()
            }
        );

        let mut builder = TypeGraphBuilder::new(&profile);
        let s = builder.structure("S", vec![], vec![]);
        assert_eq!(
            builder.define(s, vec![], vec![]),
            Err(DefinitionError::RedefinedRecord { record: "S".into() })
        );
    }

    #[test]
    fn test_unknown_base_type() {
        let profile = AbiProfile::lp64();
        let builder = TypeGraphBuilder::new(&profile);

        assert_eq!(
            builder.primitive("__int256"),
            Err(DefinitionError::UnknownBaseType {
                name: "__int256".into()
            })
        );
    }

    #[test]
    fn test_union_base_and_anonymous_checks() {
        let profile = AbiProfile::lp64();

        let mut builder = TypeGraphBuilder::new(&profile);
        let u = builder.union(Some("U"), vec![]);
        builder.structure("S", vec![Base::new(u)], vec![]);
        assert!(matches!(
            builder.build(),
            Err(DefinitionError::UnionBase { .. })
        ));

        let mut builder = TypeGraphBuilder::new(&profile);
        let int = builder.primitive("int").unwrap();
        builder.structure("S", vec![], vec![Field::anonymous(int)]);
        assert!(matches!(
            builder.build(),
            Err(DefinitionError::MalformedAnonymousField { .. })
        ));
    }

    #[test]
    fn test_intrinsic_sizes() {
        let profile = AbiProfile::lp64();
        let mut builder = TypeGraphBuilder::new(&profile);
        let int = builder.primitive("int").unwrap();
        let s = builder.structure("S", vec![], vec![]);
        let graph = builder.build().unwrap();

        assert_eq!(
            graph.intrinsic(&Type::array(int.clone(), 3)),
            crate::Intrinsic::Known {
                size: data_units::ByteUnits::of(12),
                alignment: data_units::ByteUnits::of(4),
            }
        );
        assert_eq!(
            graph.intrinsic(&Type::array(int.clone(), 1 << 61)),
            crate::Intrinsic::TooLarge
        );
        assert_eq!(
            graph.intrinsic(&Type::array(Type::array(int.clone(), 1 << 31), 1 << 31)),
            crate::Intrinsic::TooLarge
        );
        assert_eq!(
            graph.intrinsic(&Type::incomplete_array(int)),
            crate::Intrinsic::Incomplete
        );
        assert_eq!(
            graph.intrinsic(&Type::array(Type::Record(s), 2)),
            crate::Intrinsic::RecordDependent
        );
        assert_eq!(
            graph.intrinsic(&Type::void_pointer()),
            crate::Intrinsic::Known {
                size: data_units::ByteUnits::of(8),
                alignment: data_units::ByteUnits::of(8),
            }
        );
    }
}
