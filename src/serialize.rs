//! Serialization matching Gradle's own metadata formatting.
//!
//! Gradle writes a double-quoted XML declaration, indents with three spaces
//! per level, keeps text content inline, closes empty elements as `<tag/>`,
//! and ends the file with a newline. Reproducing that exactly keeps the
//! committed file free of churn between regenerations.

use crate::document::{Document, Element, Node};
use crate::error::{MetadataError, Result};
use quick_xml::Writer;
use quick_xml::escape::partial_escape;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

/// Spaces per nesting level.
pub const INDENT_WIDTH: usize = 3;

impl Document {
    /// Serialize the document using Gradle's formatting conventions.
    ///
    /// # Errors
    ///
    /// Returns [`MetadataError::Serialize`] if the writer rejects an event.
    ///
    /// # Examples
    ///
    /// ```
    /// use verification_metadata::document::{Document, Element};
    ///
    /// let document = Document::new(Element::new("a").with_child(Element::new("b")));
    /// let bytes = document.to_bytes()?;
    /// assert_eq!(
    ///     String::from_utf8_lossy(&bytes),
    ///     "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<a>\n   <b/>\n</a>\n",
    /// );
    /// # Ok::<(), verification_metadata::error::MetadataError>(())
    /// ```
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', INDENT_WIDTH);
        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
            .map_err(MetadataError::serialize)?;
        write_element(&mut writer, self.root())?;

        let mut bytes = writer.into_inner();
        bytes.push(b'\n');
        Ok(bytes)
    }
}

fn write_element(writer: &mut Writer<Vec<u8>>, element: &Element) -> Result<()> {
    let mut start = BytesStart::new(element.name());
    for (key, value) in element.attributes() {
        let value = escape_attribute(value);
        start.push_attribute((key.as_bytes(), value.as_bytes()));
    }

    if element.children().is_empty() {
        return writer
            .write_event(Event::Empty(start))
            .map_err(MetadataError::serialize);
    }

    writer
        .write_event(Event::Start(start))
        .map_err(MetadataError::serialize)?;
    for child in element.children() {
        match child {
            Node::Element(nested) => write_element(writer, nested)?,
            Node::Text(text) => writer
                .write_event(Event::Text(BytesText::from_escaped(partial_escape(text))))
                .map_err(MetadataError::serialize)?,
        }
    }
    writer
        .write_event(Event::End(BytesEnd::new(element.name())))
        .map_err(MetadataError::serialize)
}

/// Escape an attribute value the way Gradle does: apostrophes stay literal.
fn escape_attribute(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            other => escaped.push(other),
        }
    }
    escaped
}
