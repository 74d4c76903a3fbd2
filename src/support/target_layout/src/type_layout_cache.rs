use crate::{
    Completeness, TypeLayout,
    record_layout::{ItaniumRecordLayoutBuilder, RecordInfo, RecordLayout, UnionLayoutBuilder},
};
use diagnostics::{Diagnostics, ErrorDiagnostic, Subject};
use once_map::sync::OnceMap;
use std::sync::Arc;
use target::AbiProfile;
use type_graph::{DefinitionError, Intrinsic, LayoutError, RecordId, Type, TypeGraph};

/// A layout session over one type graph.
///
/// Record layouts are computed at most once, failures included. Concurrent
/// requests for the same record wait on the thread computing it.
#[derive(Debug)]
pub struct TypeLayoutCache<'env> {
    memo: OnceMap<RecordId, Result<Arc<RecordLayout>, LayoutError>>,
    pub profile: &'env AbiProfile,
    pub graph: &'env TypeGraph,
    pub diagnostics: &'env Diagnostics,
}

impl<'env> TypeLayoutCache<'env> {
    pub fn new(
        profile: &'env AbiProfile,
        graph: &'env TypeGraph,
        diagnostics: &'env Diagnostics,
    ) -> Self {
        Self {
            memo: OnceMap::new(),
            profile,
            graph,
            diagnostics,
        }
    }

    pub fn get(&self, ty: &Type) -> Result<TypeLayout, LayoutError> {
        match (self.graph.intrinsic(ty), ty) {
            (Intrinsic::Known { size, alignment }, _) => Ok(TypeLayout::new(size, alignment)),
            (Intrinsic::TooLarge, _) => Err(DefinitionError::TypeTooLarge {
                ty: self.graph.type_name(ty),
            }
            .into()),
            (_, Type::Record(record)) => {
                let record_layout = self.record(*record)?;

                Ok(TypeLayout {
                    width: record_layout.size,
                    alignment: record_layout.alignment,
                    completeness: if record_layout.has_flexible_tail {
                        Completeness::FlexibleTail
                    } else {
                        Completeness::Complete
                    },
                })
            }
            (_, Type::Array(array)) => {
                let element_info = self.get(&array.element)?;

                match array.count {
                    Some(count) if element_info.completeness.is_complete() => element_info
                        .width
                        .checked_mul(count)
                        .filter(|width| width.checked_to_bits().is_some())
                        .map(|width| TypeLayout::new(width, element_info.alignment))
                        .ok_or_else(|| {
                            DefinitionError::TypeTooLarge {
                                ty: self.graph.type_name(ty),
                            }
                            .into()
                        }),
                    _ => Ok(TypeLayout::incomplete(element_info.alignment)),
                }
            }
            (_, Type::Primitive(_) | Type::Pointer(_) | Type::Bitfield(_)) => {
                unreachable!("scalar types always have an intrinsic layout")
            }
        }
    }

    pub fn record(&self, record: RecordId) -> Result<Arc<RecordLayout>, LayoutError> {
        self.memo.map_insert_ref(
            &record,
            |record| *record,
            |record| self.get_impl_record_layout(*record),
            |_k, v| v.clone(),
        )
    }

    /// Lays out every record of the graph, in declaration order.
    pub fn all(&self) -> Vec<(RecordId, Result<Arc<RecordLayout>, LayoutError>)> {
        self.graph
            .records()
            .map(|(record, _)| (record, self.record(record)))
            .collect()
    }

    fn get_impl_record_layout(&self, record: RecordId) -> Result<Arc<RecordLayout>, LayoutError> {
        let info = RecordInfo::from_graph(self.graph, record);

        let record_layout = if info.is_union() {
            UnionLayoutBuilder::generate(self, info)
        } else {
            ItaniumRecordLayoutBuilder::generate(self, info)
        };

        match record_layout {
            Ok(record_layout) => {
                debug_assert_eq!(
                    record_layout.verify(),
                    Ok(()),
                    "invalid layout computed for `{}`",
                    info.name
                );

                Ok(Arc::new(record_layout))
            }
            Err(error) => {
                // Dependents only wrap an error that was already reported
                if !error.is_dependency_failure() {
                    self.diagnostics
                        .push(ErrorDiagnostic::new(&error, Subject::record(info.name)));
                }

                Err(error)
            }
        }
    }
}
