//! Owned XML element tree for verification metadata.
//!
//! Gradle writes the metadata in a single default namespace, so the tree
//! keeps qualified names and namespace declarations verbatim and performs
//! lookups by local name. Whitespace-only text between elements is dropped
//! on parse; the serializer rebuilds indentation from the nesting depth.
//! Comments and processing instructions are not retained.

use crate::error::{MetadataError, Result};
use camino::Utf8Path;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

/// A child node of an [`Element`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// A nested element.
    Element(Element),
    /// Character data with entities already resolved.
    Text(String),
}

/// An XML element with ordered attributes and children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<Node>,
}

impl Element {
    /// Create an empty element with the given qualified name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Builder-style variant of [`Element::set_attribute`].
    #[must_use]
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attribute(key, value);
        self
    }

    /// Builder-style variant of [`Element::push_child`].
    #[must_use]
    pub fn with_child(mut self, child: Self) -> Self {
        self.push_child(child);
        self
    }

    /// The qualified name, including any namespace prefix.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The name with any namespace prefix removed.
    #[must_use]
    pub fn local_name(&self) -> &str {
        self.name
            .split_once(':')
            .map_or(self.name.as_str(), |(_, local)| local)
    }

    /// Qualify `local` with this element's namespace prefix, if it has one.
    ///
    /// New children created this way land in the same namespace as their
    /// parent.
    #[must_use]
    pub fn qualify(&self, local: &str) -> String {
        match self.name.split_once(':') {
            Some((prefix, _)) => format!("{prefix}:{local}"),
            None => local.to_owned(),
        }
    }

    /// Look up an attribute value by its qualified name.
    #[must_use]
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(candidate, _)| candidate == key)
            .map(|(_, value)| value.as_str())
    }

    /// Set an attribute, replacing the value in place if it already exists.
    pub fn set_attribute(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(candidate, _)| *candidate == key) {
            Some(existing) => existing.1 = value,
            None => self.attributes.push((key, value)),
        }
    }

    /// Iterate over attributes in document order.
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    /// All child nodes in document order.
    #[must_use]
    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Iterate over element children, skipping text.
    pub fn child_elements(&self) -> impl Iterator<Item = &Self> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(element) => Some(element),
            Node::Text(_) => None,
        })
    }

    /// Concatenated text content of this element's direct text children.
    #[must_use]
    pub fn text(&self) -> String {
        self.children
            .iter()
            .filter_map(|node| match node {
                Node::Text(text) => Some(text.as_str()),
                Node::Element(_) => None,
            })
            .collect()
    }

    /// First child element with the given local name.
    #[must_use]
    pub fn find_child(&self, local: &str) -> Option<&Self> {
        self.child_elements()
            .find(|element| element.local_name() == local)
    }

    /// Mutable access to the first child element with the given local name.
    pub fn find_child_mut(&mut self, local: &str) -> Option<&mut Self> {
        self.children.iter_mut().find_map(|node| match node {
            Node::Element(element) if element.local_name() == local => Some(element),
            _ => None,
        })
    }

    /// First child element named `local` whose `key` attribute equals `value`.
    #[must_use]
    pub fn find_child_with_attribute(&self, local: &str, key: &str, value: &str) -> Option<&Self> {
        self.child_elements().find(|element| {
            element.local_name() == local && element.attribute(key) == Some(value)
        })
    }

    /// Mutable variant of [`Element::find_child_with_attribute`].
    pub fn find_child_with_attribute_mut(
        &mut self,
        local: &str,
        key: &str,
        value: &str,
    ) -> Option<&mut Self> {
        self.children.iter_mut().find_map(|node| match node {
            Node::Element(element)
                if element.local_name() == local && element.attribute(key) == Some(value) =>
            {
                Some(element)
            }
            _ => None,
        })
    }

    /// Mutable access to a child element that must exist.
    ///
    /// # Errors
    ///
    /// Returns [`MetadataError::MissingElement`] when no child has the
    /// requested local name.
    pub fn require_child_mut(&mut self, local: &str) -> Result<&mut Self> {
        let parent = self.local_name().to_owned();
        self.find_child_mut(local)
            .ok_or_else(|| MetadataError::MissingElement {
                parent,
                element: local.to_owned(),
            })
    }

    /// Append a child element.
    pub fn push_child(&mut self, child: Self) {
        self.children.push(Node::Element(child));
    }

    /// Append a text node.
    pub fn push_text(&mut self, text: impl Into<String>) {
        self.children.push(Node::Text(text.into()));
    }

    /// Stable-sort child nodes by the value of attribute `key`.
    ///
    /// Nodes without the attribute, including text, sort first and keep
    /// their relative order.
    pub fn sort_children_by_attribute(&mut self, key: &str) {
        self.children.sort_by(|left, right| {
            sort_key(left, key).cmp(&sort_key(right, key))
        });
    }
}

fn sort_key<'a>(node: &'a Node, key: &str) -> Option<&'a str> {
    match node {
        Node::Element(element) => element.attribute(key),
        Node::Text(_) => None,
    }
}

/// A parsed verification metadata document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    root: Element,
}

impl Document {
    /// Wrap an existing root element.
    #[must_use]
    pub fn new(root: Element) -> Self {
        Self { root }
    }

    /// Parse a document from XML text.
    ///
    /// # Errors
    ///
    /// Returns [`MetadataError::Parse`] when the input is not well-formed or
    /// does not contain exactly one root element.
    ///
    /// # Examples
    ///
    /// ```
    /// use verification_metadata::document::Document;
    ///
    /// let document = Document::parse("<a><b>true</b></a>")?;
    /// let b = document.root().find_child("b").expect("b parsed");
    /// assert_eq!(b.text(), "true");
    /// # Ok::<(), verification_metadata::error::MetadataError>(())
    /// ```
    pub fn parse(input: &str) -> Result<Self> {
        let mut reader = Reader::from_str(input);

        let mut open: Vec<Element> = Vec::new();
        let mut root: Option<Element> = None;

        loop {
            match reader.read_event().map_err(MetadataError::parse)? {
                Event::Start(start) => open.push(element_from_start(&start)?),
                Event::Empty(start) => {
                    let element = element_from_start(&start)?;
                    attach(&mut open, &mut root, element)?;
                }
                Event::End(_) => {
                    let element = open.pop().ok_or_else(|| MetadataError::Parse {
                        reason: "closing tag without matching opening tag".to_owned(),
                    })?;
                    attach(&mut open, &mut root, element)?;
                }
                Event::Text(text) => {
                    let value = text.unescape().map_err(MetadataError::parse)?;
                    // Indentation only; the writer regenerates it.
                    if value.trim().is_empty() {
                        continue;
                    }
                    if let Some(parent) = open.last_mut() {
                        parent.push_text(value.into_owned());
                    }
                }
                Event::CData(data) => {
                    let value = std::str::from_utf8(&data).map_err(MetadataError::parse)?;
                    if let Some(parent) = open.last_mut() {
                        parent.push_text(value);
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if let Some(unclosed) = open.last() {
            return Err(MetadataError::Parse {
                reason: format!("element <{}> is never closed", unclosed.name()),
            });
        }

        root.map(Self::new).ok_or_else(|| MetadataError::Parse {
            reason: "document has no root element".to_owned(),
        })
    }

    /// Read and parse the document at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`MetadataError::Io`] if the file cannot be read, or a parse
    /// error as described in [`Document::parse`].
    pub fn load(path: &Utf8Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|source| MetadataError::Io {
            path: path.to_owned(),
            source,
        })?;
        log::debug!("parsing {} bytes of verification metadata from {path}", contents.len());
        Self::parse(&contents)
    }

    /// Serialize the document and write it to `path`.
    ///
    /// # Errors
    ///
    /// Returns [`MetadataError::Io`] if the file cannot be written, or a
    /// serialization error.
    pub fn save(&self, path: &Utf8Path) -> Result<()> {
        let bytes = self.to_bytes()?;
        std::fs::write(path, bytes).map_err(|source| MetadataError::Io {
            path: path.to_owned(),
            source,
        })
    }

    /// The root element.
    #[must_use]
    pub fn root(&self) -> &Element {
        &self.root
    }

    /// Mutable access to the root element.
    pub fn root_mut(&mut self) -> &mut Element {
        &mut self.root
    }
}

/// Place a completed element under its parent, or make it the root.
fn attach(open: &mut [Element], root: &mut Option<Element>, element: Element) -> Result<()> {
    if let Some(parent) = open.last_mut() {
        parent.push_child(element);
        return Ok(());
    }
    if root.is_some() {
        return Err(MetadataError::Parse {
            reason: format!("unexpected second root element <{}>", element.name()),
        });
    }
    *root = Some(element);
    Ok(())
}

fn element_from_start(start: &BytesStart<'_>) -> Result<Element> {
    let qname = start.name();
    let name = std::str::from_utf8(qname.as_ref()).map_err(MetadataError::parse)?;
    let mut element = Element::new(name);
    for attribute in start.attributes() {
        let attribute = attribute.map_err(MetadataError::parse)?;
        let key = std::str::from_utf8(attribute.key.as_ref()).map_err(MetadataError::parse)?;
        let value = attribute.unescape_value().map_err(MetadataError::parse)?;
        element.attributes.push((key.to_owned(), value.into_owned()));
    }
    Ok(element)
}
