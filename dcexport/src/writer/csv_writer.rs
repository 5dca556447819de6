//! CSV sink.

use std::io::Write;

use crate::error::{WriteError, WriteResult};
use crate::models::Row;

use super::TableWriter;

/// Writes a header line followed by one line per row.
pub struct CsvTableWriter<W: Write> {
    writer: csv::Writer<W>,
    width: Option<usize>,
}

impl<W: Write> CsvTableWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            writer: csv::WriterBuilder::new().flexible(false).from_writer(inner),
            width: None,
        }
    }

    /// Flush and hand back the underlying writer.
    pub fn into_inner(self) -> WriteResult<W> {
        self.writer
            .into_inner()
            .map_err(|e| WriteError::IoError(e.into_error()))
    }
}

impl<W: Write> TableWriter for CsvTableWriter<W> {
    fn write_headers(&mut self, headers: &[String]) -> WriteResult<()> {
        self.width = Some(headers.len());
        self.writer.write_record(headers)?;
        Ok(())
    }

    fn write_row(&mut self, row: &Row) -> WriteResult<()> {
        if let Some(expected) = self.width {
            if row.len() != expected {
                return Err(WriteError::RowWidth { expected, got: row.len() });
            }
        }
        self.writer.write_record(row.cells())?;
        Ok(())
    }

    fn finish(self: Box<Self>) -> WriteResult<()> {
        self.into_inner()?.flush()?;
        Ok(())
    }
}
