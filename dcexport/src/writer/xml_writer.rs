//! XML sink.
//!
//! Layout, one element per column:
//!
//! ```text
//! <?xml version="1.0" encoding="UTF-8"?>
//! <root>
//!   <item>
//!     <id>w1</id>
//!     <title>A | B</title>
//!   </item>
//! </root>
//! ```

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::io::Write;

use crate::error::{WriteError, WriteResult};
use crate::models::Row;

use super::TableWriter;

const ROOT_TAG: &str = "root";
const ITEM_TAG: &str = "item";

/// Writes rows as `<item>` elements under a single `<root>`.
pub struct XmlTableWriter<W: Write> {
    writer: Writer<W>,
    tags: Vec<String>,
    started: bool,
}

impl<W: Write> XmlTableWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            writer: Writer::new_with_indent(inner, b' ', 2),
            tags: Vec::new(),
            started: false,
        }
    }

    fn start_document(&mut self) -> WriteResult<()> {
        if !self.started {
            self.writer
                .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
            self.writer.write_event(Event::Start(BytesStart::new(ROOT_TAG)))?;
            self.started = true;
        }
        Ok(())
    }

    fn write_element(&mut self, tag: &str, text: &str) -> WriteResult<()> {
        self.writer.write_event(Event::Start(BytesStart::new(tag)))?;
        self.writer.write_event(Event::Text(BytesText::new(text)))?;
        self.writer.write_event(Event::End(BytesEnd::new(tag)))?;
        Ok(())
    }

    /// Close the document and hand back the underlying writer.
    pub fn into_inner(mut self) -> WriteResult<W> {
        self.start_document()?;
        self.writer.write_event(Event::End(BytesEnd::new(ROOT_TAG)))?;
        let mut inner = self.writer.into_inner();
        inner.write_all(b"\n")?;
        Ok(inner)
    }
}

impl<W: Write> TableWriter for XmlTableWriter<W> {
    fn write_headers(&mut self, headers: &[String]) -> WriteResult<()> {
        self.tags = headers.iter().map(|h| xml_tag_name(h)).collect();
        self.start_document()
    }

    fn write_row(&mut self, row: &Row) -> WriteResult<()> {
        if row.len() != self.tags.len() {
            return Err(WriteError::RowWidth { expected: self.tags.len(), got: row.len() });
        }
        self.start_document()?;

        self.writer.write_event(Event::Start(BytesStart::new(ITEM_TAG)))?;
        let tags = std::mem::take(&mut self.tags);
        let result = tags
            .iter()
            .zip(row.cells())
            .try_for_each(|(tag, cell)| self.write_element(tag, cell));
        self.tags = tags;
        result?;
        self.writer.write_event(Event::End(BytesEnd::new(ITEM_TAG)))?;
        Ok(())
    }

    fn finish(self: Box<Self>) -> WriteResult<()> {
        self.into_inner()?.flush()?;
        Ok(())
    }
}

/// Make a header usable as an element name.
///
/// Characters outside `[A-Za-z0-9_.-]` become `_`; names that cannot start an
/// element (digits, `-`, `.`, or `xml…`) get a leading `_`.
pub fn xml_tag_name(header: &str) -> String {
    let mut name: String = header
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-') { c } else { '_' })
        .collect();

    let bad_start = match name.chars().next() {
        None => true,
        Some(c) => !(c.is_ascii_alphabetic() || c == '_'),
    };
    if bad_start || name.to_ascii_lowercase().starts_with("xml") {
        name.insert(0, '_');
    }
    name
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> Row {
        Row::new(cells.iter().map(|c| c.to_string()).collect())
    }

    #[test]
    fn test_document_layout() {
        let mut writer = XmlTableWriter::new(Vec::new());
        writer.write_headers(&["id".to_string(), "title".to_string()]).unwrap();
        writer.write_row(&row(&["w1", "Fish & Chips"])).unwrap();
        writer.write_row(&row(&["w2", ""])).unwrap();

        let out = String::from_utf8(writer.into_inner().unwrap()).unwrap();
        assert!(out.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
        assert!(out.contains("<root>"));
        assert_eq!(out.matches("<item>").count(), 2);
        assert!(out.contains("<id>w1</id>"));
        assert!(out.contains("<title>Fish &amp; Chips</title>"));
        assert!(out.trim_end().ends_with("</root>"));
    }

    #[test]
    fn test_empty_export_is_valid_document() {
        let mut writer = XmlTableWriter::new(Vec::new());
        writer.write_headers(&["id".to_string()]).unwrap();
        let out = String::from_utf8(writer.into_inner().unwrap()).unwrap();
        assert!(out.contains("<root>"));
        assert!(out.contains("</root>"));
        assert!(!out.contains("<item>"));
    }

    #[test]
    fn test_xml_tag_name() {
        assert_eq!(xml_tag_name("title.primary"), "title.primary");
        assert_eq!(xml_tag_name("contributor-batch"), "contributor-batch");
        assert_eq!(xml_tag_name("my field"), "my_field");
        assert_eq!(xml_tag_name("1st"), "_1st");
        assert_eq!(xml_tag_name("xmlish"), "_xmlish");
        assert_eq!(xml_tag_name(""), "_");
    }
}
