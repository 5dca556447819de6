//! Row projection: every requested field of every record, in order.

use std::collections::BTreeSet;

use crate::models::{Record, Row};

use super::field_path::FieldPath;
use super::flattener::flatten_cell;
use super::modifiers::ModifierPipeline;

/// Projects records onto a fixed list of field specs.
///
/// Field specs are parsed once, at construction.
#[derive(Debug, Clone)]
pub struct RowProjector {
    fields: Vec<FieldPath>,
    pipeline: ModifierPipeline,
}

impl RowProjector {
    pub fn new<S: AsRef<str>>(fields: &[S], pipeline: ModifierPipeline) -> Self {
        Self {
            fields: fields.iter().map(|f| FieldPath::parse(f.as_ref())).collect(),
            pipeline,
        }
    }

    pub fn fields(&self) -> &[FieldPath] {
        &self.fields
    }

    pub fn pipeline(&self) -> &ModifierPipeline {
        &self.pipeline
    }

    /// Flatten one record. The row has one cell per field.
    pub fn project_record(&self, record: &Record) -> Row {
        Row::new(
            self.fields
                .iter()
                .map(|path| flatten_cell(&self.pipeline.evaluate(path, record)))
                .collect(),
        )
    }

    /// Lazily project a record stream. Single pass; nothing is buffered.
    pub fn project<'a, I>(&'a self, records: I) -> impl Iterator<Item = Row> + 'a
    where
        I: IntoIterator + 'a,
        I::Item: AsRef<Record>,
    {
        records
            .into_iter()
            .map(move |record| self.project_record(record.as_ref()))
    }

    /// Like [`project`](Self::project) over fallible items. Errors from the
    /// source are passed through untouched.
    pub fn try_project<'a, I, R, E>(&'a self, records: I) -> impl Iterator<Item = Result<Row, E>> + 'a
    where
        I: IntoIterator<Item = Result<R, E>> + 'a,
        R: AsRef<Record>,
    {
        records
            .into_iter()
            .map(move |record| record.map(|r| self.project_record(r.as_ref())))
    }
}

/// Union of the top-level keys of all records.
///
/// Consumes the whole source; callers that also want to project must scan
/// twice or materialize the records.
pub fn discover_fields<I>(records: I) -> BTreeSet<String>
where
    I: IntoIterator,
    I::Item: AsRef<Record>,
{
    let mut fields = BTreeSet::new();
    for record in records {
        fields.extend(record.as_ref().keys().map(str::to_string));
    }
    fields
}
