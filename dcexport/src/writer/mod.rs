//! Table sinks for projected rows.

pub mod csv_writer;
pub mod xml_writer;

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::error::WriteResult;
use crate::models::Row;

pub use csv_writer::CsvTableWriter;
pub use xml_writer::{xml_tag_name, XmlTableWriter};

/// Destination for a header line and a sequence of rows.
pub trait TableWriter {
    fn write_headers(&mut self, headers: &[String]) -> WriteResult<()>;

    fn write_row(&mut self, row: &Row) -> WriteResult<()>;

    /// Close the document and flush.
    fn finish(self: Box<Self>) -> WriteResult<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Csv,
    Xml,
}

impl OutputFormat {
    /// Wrap `inner` in the sink for this format.
    pub fn writer<'a, W: Write + 'a>(self, inner: W) -> Box<dyn TableWriter + 'a> {
        match self {
            OutputFormat::Csv => Box::new(CsvTableWriter::new(inner)),
            OutputFormat::Xml => Box::new(XmlTableWriter::new(inner)),
        }
    }
}

/// Open an output target; `None` means stdout.
pub fn open_output(path: Option<&Path>) -> WriteResult<Box<dyn Write>> {
    Ok(match path {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(BufWriter::new(io::stdout())),
    })
}

/// Interpret the CLI output argument: `-` is stdout.
pub fn output_path(arg: &str) -> Option<&Path> {
    if arg == "-" {
        None
    } else {
        Some(Path::new(arg))
    }
}

/// Sink of `format` over the file at `path` (or stdout).
pub fn create_writer(format: OutputFormat, path: Option<&Path>) -> WriteResult<Box<dyn TableWriter>> {
    Ok(format.writer(open_output(path)?))
}
