use type_graph::{Base, Field, Record, RecordId, TypeGraph};

#[derive(Copy, Clone, Debug)]
pub struct RecordInfo<'g> {
    pub id: RecordId,
    pub record: &'g Record,
    pub name: &'g str,
}

impl<'g> RecordInfo<'g> {
    pub fn from_graph(graph: &'g TypeGraph, id: RecordId) -> Self {
        let record = graph.record(id);

        Self {
            id,
            record,
            name: record.display_name(),
        }
    }

    pub fn is_union(&self) -> bool {
        self.record.is_union()
    }

    pub fn bases(&self) -> &'g [Base] {
        &self.record.bases
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &'g Field)> + use<'g> {
        self.record.fields.iter().enumerate()
    }

    pub fn field_count(&self) -> usize {
        self.record.fields.len()
    }

    pub fn is_last_field(&self, index: usize) -> bool {
        index + 1 == self.field_count()
    }

    pub fn field_name(&self, index: usize) -> String {
        self.record.fields[index].display_name(index)
    }
}
