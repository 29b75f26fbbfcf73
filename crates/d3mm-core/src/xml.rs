//! A small XML tree over quick-xml's event API.
//!
//! The catalog's XML dialect is attribute-heavy and strictly nested, so
//! entities parse from and serialize to this [`XmlElement`] tree instead of
//! driving the event reader in every entity. Element and attribute names
//! are all lowercase; text content only appears in leaf elements
//! (`<note>`).

use crate::error::CatalogError;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

/// One element: name, attributes in document order, children in document
/// order, and concatenated text content.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct XmlElement {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<XmlElement>,
    pub text: String,
}

impl XmlElement {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Set an attribute, returning self for chaining.
    pub fn attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    /// Set an attribute only when the optional is populated.
    pub fn optional_attribute(
        self,
        name: impl Into<String>,
        value: Option<impl Into<String>>,
    ) -> Self {
        match value {
            Some(value) => self.attribute(name, value),
            None => self,
        }
    }

    /// Append a child element.
    pub fn child(mut self, child: XmlElement) -> Self {
        self.children.push(child);
        self
    }

    /// Set text content.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Fetch an attribute value by name.
    pub fn attribute_value(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(attribute, _)| attribute == name)
            .map(|(_, value)| value.as_str())
    }

    /// Fetch a required attribute or fail naming `path`.
    pub fn require_attribute(&self, name: &str, path: &str) -> Result<String, CatalogError> {
        match self.attribute_value(name) {
            Some(value) if !value.trim().is_empty() => Ok(value.to_string()),
            Some(_) => Err(CatalogError::schema(
                format!("{path}@{name}"),
                "attribute must not be empty",
            )),
            None => Err(CatalogError::schema(
                format!("{path}@{name}"),
                "missing required attribute",
            )),
        }
    }

    /// Warn about attributes outside the known set.
    pub fn warn_unknown_attributes(&self, known: &[&str], path: &str) {
        for (name, _) in &self.attributes {
            if !known.iter().any(|known| known == name) {
                tracing::warn!("element '{path}' has unexpected attribute '{name}'");
            }
        }
    }

    /// First child element with the given name.
    pub fn first_child(&self, name: &str) -> Option<&XmlElement> {
        self.children.iter().find(|child| child.name == name)
    }

    /// All child elements with the given name.
    pub fn children_named<'e>(&'e self, name: &'e str) -> impl Iterator<Item = &'e XmlElement> {
        self.children.iter().filter(move |child| child.name == name)
    }

    /// Parse a document and return its root element.
    pub fn parse_document(data: &str) -> Result<XmlElement, CatalogError> {
        let mut reader = Reader::from_str(data);
        let mut stack: Vec<XmlElement> = Vec::new();

        loop {
            match reader.read_event() {
                Ok(Event::Start(start)) => {
                    stack.push(element_from_start(&start)?);
                }
                Ok(Event::Empty(start)) => {
                    let element = element_from_start(&start)?;
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(element),
                        None => return Ok(element),
                    }
                }
                Ok(Event::Text(text)) => {
                    let text = text.decode().map_err(|error| {
                        CatalogError::schema("document", format!("bad text content: {error}"))
                    })?;

                    if let Some(parent) = stack.last_mut() {
                        parent.text.push_str(text.trim());
                    }
                }
                Ok(Event::End(_)) => {
                    let element = stack
                        .pop()
                        .ok_or_else(|| CatalogError::schema("document", "unbalanced end tag"))?;

                    match stack.last_mut() {
                        Some(parent) => parent.children.push(element),
                        None => return Ok(element),
                    }
                }
                Ok(Event::Eof) => {
                    return Err(CatalogError::schema(
                        "document",
                        "unexpected end of document",
                    ));
                }
                // Declarations, comments, processing instructions.
                Ok(_) => {}
                Err(error) => {
                    return Err(CatalogError::schema(
                        "document",
                        format!("malformed XML: {error}"),
                    ));
                }
            }
        }
    }

    /// Serialize this element as a standalone indented document.
    pub fn to_document_string(&self) -> Result<String, CatalogError> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
            .map_err(write_error)?;

        self.write_into(&mut writer)?;

        String::from_utf8(writer.into_inner())
            .map_err(|error| CatalogError::schema("document", format!("non-UTF-8 output: {error}")))
    }

    fn write_into(&self, writer: &mut Writer<Vec<u8>>) -> Result<(), CatalogError> {
        let mut start = BytesStart::new(self.name.as_str());

        for (name, value) in &self.attributes {
            start.push_attribute((name.as_str(), value.as_str()));
        }

        if self.children.is_empty() && self.text.is_empty() {
            return writer.write_event(Event::Empty(start)).map_err(write_error);
        }

        writer.write_event(Event::Start(start)).map_err(write_error)?;

        if !self.text.is_empty() {
            writer
                .write_event(Event::Text(BytesText::new(&self.text)))
                .map_err(write_error)?;
        }

        for child in &self.children {
            child.write_into(writer)?;
        }

        writer
            .write_event(Event::End(BytesEnd::new(self.name.as_str())))
            .map_err(write_error)
    }
}

fn element_from_start(start: &BytesStart<'_>) -> Result<XmlElement, CatalogError> {
    let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    let mut element = XmlElement::new(name);

    for attribute in start.attributes() {
        let attribute = attribute.map_err(|error| {
            CatalogError::schema(&element.name, format!("bad attribute: {error}"))
        })?;

        let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
        let value = attribute
            .unescape_value()
            .map_err(|error| {
                CatalogError::schema(
                    format!("{}@{}", element.name, key),
                    format!("bad attribute value: {error}"),
                )
            })?
            .into_owned();

        element.attributes.push((key, value));
    }

    Ok(element)
}

fn write_error<E: std::fmt::Display>(error: E) -> CatalogError {
    CatalogError::schema("document", format!("write failed: {error}"))
}
