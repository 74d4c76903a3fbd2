use crate::{DefinitionError, Record, RecordId, Type};
use arena::{Arena, Id};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Visit {
    Unvisited,
    InProgress,
    Done,
}

/// Rejects records that contain themselves by value.
///
/// Edges are bases, record-typed fields and array elements. Pointers own
/// nothing, so they are never followed.
pub fn check_value_cycles(records: &Arena<RecordId, Record>) -> Result<(), DefinitionError> {
    let mut visits = vec![Visit::Unvisited; records.len()];
    let mut path = Vec::new();

    for record in records.keys() {
        visit(records, record, &mut visits, &mut path)?;
    }

    Ok(())
}

fn visit(
    records: &Arena<RecordId, Record>,
    record: RecordId,
    visits: &mut [Visit],
    path: &mut Vec<RecordId>,
) -> Result<(), DefinitionError> {
    match visits[record.into_usize()] {
        Visit::Done => return Ok(()),
        Visit::InProgress => {
            let start = path
                .iter()
                .position(|on_path| *on_path == record)
                .unwrap_or(0);

            let mut names = path[start..]
                .iter()
                .map(|id| records[*id].display_name().to_string())
                .collect::<Vec<_>>();
            names.push(records[record].display_name().to_string());

            return Err(DefinitionError::ValueCycle {
                record: records[record].display_name().to_string(),
                path: names,
            });
        }
        Visit::Unvisited => (),
    }

    visits[record.into_usize()] = Visit::InProgress;
    path.push(record);

    let definition = &records[record];

    for base in definition.bases.iter() {
        visit(records, base.record, visits, path)?;
    }

    for field in definition.fields.iter() {
        if let Some(contained) = contained_by_value(&field.ty) {
            visit(records, contained, visits, path)?;
        }
    }

    path.pop();
    visits[record.into_usize()] = Visit::Done;
    Ok(())
}

fn contained_by_value(ty: &Type) -> Option<RecordId> {
    match ty {
        Type::Record(record) => Some(*record),
        Type::Array(array) => contained_by_value(&array.element),
        Type::Primitive(_) | Type::Pointer(_) | Type::Bitfield(_) => None,
    }
}
